use crate::terminal::TerminalSurface;
use anyhow::{Context, Result};
use bgg_catalog::CatalogService;
use bgg_search::{DisplaySurface, JobClock, SearchConfig, SearchSession};
use clap::Args;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Quiet period before a search starts, in milliseconds (overrides debounceMs)
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,
}

/// Every stdin line replaces the search text, as if typed into a search box.
/// Results print as each settled search completes.
pub async fn execute(
    args: WatchArgs,
    catalog: Rc<dyn CatalogService>,
    mut config: SearchConfig,
) -> Result<()> {
    if let Some(debounce_ms) = args.debounce_ms {
        config.debounce_ms = debounce_ms;
    }

    let surface = Rc::new(RefCell::new(TerminalSurface::new(std::io::stdout())));
    let mut session = SearchSession::new(catalog, &config, surface);

    feed_lines(BufReader::new(tokio::io::stdin()), &mut session)
        .await
        .context("Failed to read stdin")
}

/// Feeds each line of `input` to the session, then waits for the last search
/// to finish once input ends.
async fn feed_lines<R, S, C>(input: R, session: &mut SearchSession<S, C>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    S: DisplaySurface + 'static,
    C: JobClock + 'static,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        session.input(line.trim_end_matches('\r'));
    }

    session.settle().await;
    Ok(())
}
