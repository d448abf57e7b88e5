//! Incremental game search over the BoardGameGeek catalog.
//!
//! Architecture:
//! - One `LocalSet`, one thread: the only suspension points are catalog
//!   requests and the debounce timer
//! - Each settled input starts a job; a job that is no longer the latest when
//!   its results are ready is dropped instead of rendered
//!
//! Flow:
//! ```text
//! input ──► Debouncer ──► StalenessGuard::begin_job
//!                               │
//!                               ▼
//!            QueryPlanner ── id lookup ───────────────┐
//!                │                                    ├─► join ─► merge
//!                └────────── text search ─► exact? ───┘            │
//!                                                                  ▼
//!                              display ◄── Renderer ◄── is_superseded?
//! ```

pub mod config;
pub mod debounce;
pub mod merge;
pub mod planner;
pub mod render;
pub mod session;
pub mod staleness;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, SearchConfig};
pub use debounce::Debouncer;
pub use merge::merge;
pub use planner::{QueryPlanner, is_canonical_integer};
pub use render::{DisplayEntry, DisplaySurface, LabelStyle, Renderer, game_href};
pub use session::{JobOutcome, SearchSession};
pub use staleness::{JobClock, JobToken, MonotonicClock, StalenessGuard};
