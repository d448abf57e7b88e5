use crate::terminal::TerminalSurface;
use anyhow::Result;
use bgg_catalog::CatalogService;
use bgg_search::{DisplayEntry, DisplaySurface, JobOutcome, SearchConfig, SearchSession};
use clap::Args;
use colored::Colorize;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Game name, or a BoardGameGeek id
    pub text: String,

    /// Print entries as JSON instead of a list
    #[arg(long)]
    pub json: bool,

    /// Maximum number of results to show (overrides resultCap)
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub limit: Option<u16>,
}

/// Keeps the last rendered entries.
#[derive(Default)]
struct Collected {
    entries: Vec<DisplayEntry>,
}

impl DisplaySurface for Collected {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn set_busy(&mut self, _busy: bool) {}

    fn show(&mut self, entries: Vec<DisplayEntry>) {
        self.entries = entries;
    }
}

pub async fn execute(
    args: QueryArgs,
    catalog: Rc<dyn CatalogService>,
    mut config: SearchConfig,
) -> Result<()> {
    if let Some(limit) = args.limit {
        config.result_cap = limit.into();
    }

    if args.json {
        let surface = Rc::new(RefCell::new(Collected::default()));
        let session = SearchSession::new(catalog, &config, surface.clone());
        session.search(&args.text).await;
        let entries = std::mem::take(&mut surface.borrow_mut().entries);
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let surface = Rc::new(RefCell::new(TerminalSurface::new(std::io::stdout())));
    let session = SearchSession::new(catalog, &config, surface);
    match session.search(&args.text).await {
        JobOutcome::Rendered { shown, total } if total > shown => {
            println!(
                "{}",
                format!("Showing {shown} of {total} results").dimmed()
            );
        }
        JobOutcome::Rendered { .. } | JobOutcome::Superseded => {}
        JobOutcome::Cleared => println!("{}", "Nothing to search for".dimmed()),
    }

    Ok(())
}
