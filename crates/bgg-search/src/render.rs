use crate::config::SearchConfig;
use crate::planner::canonical_decimal;
use bgg_catalog::Game;
use serde::Serialize;

/// One line of the result list: a link to the game page and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEntry {
    pub href: String,
    pub label: String,
}

/// Where rendered results go.
pub trait DisplaySurface {
    /// Remove every entry.
    fn clear(&mut self);

    /// Show or hide the busy indicator.
    fn set_busy(&mut self, busy: bool);

    /// Replace the current entries.
    fn show(&mut self, entries: Vec<DisplayEntry>);
}

/// How entry labels are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelStyle {
    NameOnly,
    NameWithYear { placeholder: String },
}

/// Link target for a game: the id as a decimal integer, `game/0` when the id
/// is not numeric.
pub fn game_href(id: &str) -> String {
    let numeric = canonical_decimal(id.trim()).unwrap_or_else(|| {
        log::debug!("Non-numeric game id {id:?}");
        "0".to_string()
    });
    format!("game/{numeric}")
}

pub struct Renderer {
    cap: usize,
    label_style: LabelStyle,
}

impl Renderer {
    pub fn new(cap: usize, label_style: LabelStyle) -> Self {
        Self { cap, label_style }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        let label_style = if config.show_year {
            LabelStyle::NameWithYear {
                placeholder: config.year_placeholder.clone(),
            }
        } else {
            LabelStyle::NameOnly
        };
        Self::new(config.result_cap, label_style)
    }

    pub fn label(&self, game: &Game) -> String {
        match &self.label_style {
            LabelStyle::NameOnly => game.name.clone(),
            LabelStyle::NameWithYear { placeholder } => format!(
                "{} ({})",
                game.name,
                game.year.as_deref().unwrap_or(placeholder)
            ),
        }
    }

    /// Entries for the first `cap` games, in order.
    pub fn entries(&self, games: &[Game]) -> Vec<DisplayEntry> {
        games
            .iter()
            .take(self.cap)
            .map(|game| DisplayEntry {
                href: game_href(&game.id),
                label: self.label(game),
            })
            .collect()
    }

    pub fn render(&self, surface: &mut dyn DisplaySurface, games: &[Game]) -> usize {
        let entries = self.entries(games);
        let shown = entries.len();
        surface.show(entries);
        shown
    }
}
