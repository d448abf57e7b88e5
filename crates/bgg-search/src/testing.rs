//! In-memory catalog and display doubles shared by the unit tests.

use crate::render::{DisplayEntry, DisplaySurface};
use async_trait::async_trait;
use bgg_catalog::{CatalogError, CatalogService, Game};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;
use std::time::Duration;

pub fn game(id: &str, name: &str) -> Game {
    Game {
        id: id.to_string(),
        name: name.to_string(),
        year: None,
    }
}

/// Games with ids `range`, named "Game <id>".
pub fn numbered(range: Range<u32>) -> Vec<Game> {
    range.map(|n| game(&n.to_string(), &format!("Game {n}"))).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Text { query: String, exact: bool },
    Id(String),
}

#[derive(Clone)]
struct Reply {
    /// `None` fails the call
    games: Option<Vec<Game>>,
    delay: Duration,
}

impl Reply {
    async fn resolve(self) -> Result<Vec<Game>, CatalogError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.games
            .ok_or_else(|| CatalogError::Xml("injected failure".to_string()))
    }
}

/// Unknown requests answer with no games and no delay.
#[derive(Default)]
pub struct FakeCatalog {
    text: HashMap<(String, bool), Reply>,
    ids: HashMap<String, Reply>,
    calls: RefCell<Vec<Call>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, query: &str, exact: bool, games: Vec<Game>) -> Self {
        self.text_after(query, exact, games, Duration::ZERO)
    }

    pub fn text_after(
        mut self,
        query: &str,
        exact: bool,
        games: Vec<Game>,
        delay: Duration,
    ) -> Self {
        self.text.insert(
            (query.to_string(), exact),
            Reply {
                games: Some(games),
                delay,
            },
        );
        self
    }

    pub fn failing_text(mut self, query: &str, exact: bool) -> Self {
        self.text.insert(
            (query.to_string(), exact),
            Reply {
                games: None,
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn id(self, id: &str, games: Vec<Game>) -> Self {
        self.id_after(id, games, Duration::ZERO)
    }

    pub fn id_after(mut self, id: &str, games: Vec<Game>, delay: Duration) -> Self {
        self.ids.insert(
            id.to_string(),
            Reply {
                games: Some(games),
                delay,
            },
        );
        self
    }

    pub fn failing_id(mut self, id: &str) -> Self {
        self.ids.insert(
            id.to_string(),
            Reply {
                games: None,
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl CatalogService for FakeCatalog {
    async fn search_by_text(&self, query: &str, exact: bool) -> Result<Vec<Game>, CatalogError> {
        self.calls.borrow_mut().push(Call::Text {
            query: query.to_string(),
            exact,
        });
        let reply = self.text.get(&(query.to_string(), exact)).cloned();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Vec<Game>, CatalogError> {
        self.calls.borrow_mut().push(Call::Id(id.to_string()));
        let reply = self.ids.get(id).cloned();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Clear,
    Busy(bool),
    Show(Vec<DisplayEntry>),
}

/// Display surface that records every call.
#[derive(Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
    pub busy: bool,
    pub entries: Vec<DisplayEntry>,
}

impl RecordingSurface {
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn shows(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Show(_)))
            .count()
    }
}

impl DisplaySurface for RecordingSurface {
    fn clear(&mut self) {
        self.entries.clear();
        self.events.push(SurfaceEvent::Clear);
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.events.push(SurfaceEvent::Busy(busy));
    }

    fn show(&mut self, entries: Vec<DisplayEntry>) {
        self.entries = entries.clone();
        self.events.push(SurfaceEvent::Show(entries));
    }
}
