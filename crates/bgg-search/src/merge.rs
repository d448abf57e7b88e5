use bgg_catalog::Game;
use std::collections::HashSet;

/// Deduplicate by game id, keeping the first occurrence.
///
/// Input order is priority order, so the surviving copy of a duplicated id is
/// the one from the highest-priority source.
pub fn merge(records: Vec<Game>) -> Vec<Game> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(records.len());

    for game in records {
        if seen.insert(game.id.clone()) {
            merged.push(game);
        }
    }

    merged
}
