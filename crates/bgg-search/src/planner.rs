use bgg_catalog::{CatalogError, CatalogService, Game};
use std::rc::Rc;

/// True when `query` is exactly the decimal form of an integer: no leading
/// zeros, whitespace, `+` sign or `-0`.
pub fn is_canonical_integer(query: &str) -> bool {
    canonical_decimal(query).as_deref() == Some(query)
}

/// `text` as a decimal integer without a `+` sign or leading zeros, or `None`
/// when it is not an integer. Any number of digits is accepted.
pub(crate) fn canonical_decimal(text: &str) -> Option<String> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    Some(match (negative, digits) {
        (_, "") => "0".to_string(),
        (true, digits) => format!("-{digits}"),
        (false, digits) => digits.to_string(),
    })
}

/// A failed call contributes nothing rather than failing the whole search.
fn contribution(kind: &str, query: &str, result: Result<Vec<Game>, CatalogError>) -> Vec<Game> {
    result.unwrap_or_else(|e| {
        log::warn!("{kind} for {query:?} failed: {e}");
        Vec::new()
    })
}

/// Decides which catalog calls a query needs and concatenates their results.
pub struct QueryPlanner {
    catalog: Rc<dyn CatalogService>,
    exact_match_threshold: usize,
}

impl QueryPlanner {
    pub fn new(catalog: Rc<dyn CatalogService>, exact_match_threshold: usize) -> Self {
        Self {
            catalog,
            exact_match_threshold,
        }
    }

    /// Results in priority order: id lookup, then exact matches, then the
    /// base text search. Duplicates are left for the merger.
    ///
    /// The id lookup runs alongside the text searches. The exact search only
    /// starts once the base search returned more than the threshold.
    pub async fn plan(&self, query: &str) -> Vec<Game> {
        if query.is_empty() {
            return Vec::new();
        }

        let by_id = async {
            if is_canonical_integer(query) {
                contribution("id lookup", query, self.catalog.lookup_by_id(query).await)
            } else {
                Vec::new()
            }
        };

        let by_text = async {
            let base = contribution(
                "text search",
                query,
                self.catalog.search_by_text(query, false).await,
            );
            let exact = if base.len() > self.exact_match_threshold {
                contribution(
                    "exact search",
                    query,
                    self.catalog.search_by_text(query, true).await,
                )
            } else {
                Vec::new()
            };
            (exact, base)
        };

        // Join point: every call has finished before results are combined
        let (mut planned, (exact, base)) = tokio::join!(by_id, by_text);
        log::debug!(
            "Planned {query:?}: {} by id, {} exact, {} base",
            planned.len(),
            exact.len(),
            base.len()
        );

        planned.extend(exact);
        planned.extend(base);
        planned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeCatalog, game, numbered};
    use std::time::Duration;

    fn planner(catalog: &Rc<FakeCatalog>) -> QueryPlanner {
        QueryPlanner::new(catalog.clone(), 50)
    }

    fn ids(games: &[Game]) -> Vec<String> {
        games.iter().map(|g| g.id.clone()).collect()
    }

    fn text_call(query: &str, exact: bool) -> Call {
        Call::Text {
            query: query.to_string(),
            exact,
        }
    }

    #[test]
    fn test_canonical_integer() {
        for query in ["0", "7", "13", "174430", "-5", "92233720368547758070"] {
            assert!(is_canonical_integer(query), "{query}");
        }
        for query in ["", "-", "007", "+7", "-0", " 7", "7 ", "1.0", "1e3", "catan", "0x1F"] {
            assert!(!is_canonical_integer(query), "{query}");
        }
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_calls() {
        let catalog = Rc::new(FakeCatalog::new());
        assert!(planner(&catalog).plan("").await.is_empty());
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_small_result_uses_base_only() {
        let catalog = Rc::new(FakeCatalog::new().text("catan", false, numbered(0..50)));
        let planned = planner(&catalog).plan("catan").await;

        assert_eq!(planned.len(), 50);
        assert_eq!(catalog.calls(), vec![text_call("catan", false)]);
    }

    #[tokio::test]
    async fn test_large_result_prepends_exact_matches() {
        let catalog = Rc::new(
            FakeCatalog::new()
                .text("catan", false, numbered(0..80))
                .text("catan", true, vec![game("13", "CATAN")]),
        );
        let planned = planner(&catalog).plan("catan").await;

        assert_eq!(planned.len(), 81);
        assert_eq!(planned[0], game("13", "CATAN"));
        assert_eq!(planned[1].id, "0");
        assert_eq!(
            catalog.calls(),
            vec![text_call("catan", false), text_call("catan", true)]
        );
    }

    #[tokio::test]
    async fn test_integer_query_prepends_id_lookup() {
        let catalog = Rc::new(
            FakeCatalog::new()
                .text("7", false, vec![game("100", "7 Wonders"), game("200", "Seven")])
                .id("7", vec![game("7", "Cave Troll")]),
        );
        let planned = planner(&catalog).plan("7").await;

        assert_eq!(ids(&planned), vec!["7", "100", "200"]);
        assert!(catalog.calls().contains(&Call::Id("7".to_string())));
    }

    #[tokio::test]
    async fn test_id_wider_than_64_bits_is_looked_up() {
        let id = "92233720368547758070";
        let catalog = Rc::new(FakeCatalog::new().id(id, vec![game(id, "Far Future")]));
        let planned = planner(&catalog).plan(id).await;

        assert_eq!(ids(&planned), vec![id]);
        assert!(catalog.calls().contains(&Call::Id(id.to_string())));
    }

    #[tokio::test]
    async fn test_non_canonical_integer_skips_id_lookup() {
        let catalog = Rc::new(FakeCatalog::new());
        planner(&catalog).plan("007").await;
        assert_eq!(catalog.calls(), vec![text_call("007", false)]);
    }

    #[tokio::test]
    async fn test_priority_order_keeps_duplicates() {
        let mut base = numbered(0..60);
        base.push(game("7", "Cave Troll"));
        let catalog = Rc::new(
            FakeCatalog::new()
                .text("7", false, base)
                .text("7", true, vec![game("3", "Game 3"), game("7", "Cave Troll")])
                .id("7", vec![game("7", "Cave Troll")]),
        );
        let planned = planner(&catalog).plan("7").await;

        assert_eq!(planned.len(), 1 + 2 + 61);
        assert_eq!(ids(&planned[..4]), vec!["7", "3", "7", "0"]);
    }

    #[tokio::test]
    async fn test_failed_exact_search_keeps_base() {
        let catalog = Rc::new(
            FakeCatalog::new()
                .text("catan", false, numbered(0..80))
                .failing_text("catan", true),
        );
        let planned = planner(&catalog).plan("catan").await;
        assert_eq!(ids(&planned), ids(&numbered(0..80)));
    }

    #[tokio::test]
    async fn test_failed_id_lookup_keeps_text_results() {
        let catalog = Rc::new(
            FakeCatalog::new()
                .text("42", false, vec![game("1", "Forty Two")])
                .failing_id("42"),
        );
        let planned = planner(&catalog).plan("42").await;
        assert_eq!(ids(&planned), vec!["1"]);
    }

    #[tokio::test]
    async fn test_failed_base_search_skips_exact() {
        let catalog = Rc::new(
            FakeCatalog::new()
                .failing_text("catan", false)
                .text("catan", true, vec![game("13", "CATAN")]),
        );
        assert!(planner(&catalog).plan("catan").await.is_empty());
        assert_eq!(catalog.calls(), vec![text_call("catan", false)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_id_lookup_runs_concurrently_with_text_search() {
        let delay = Duration::from_millis(300);
        let catalog = Rc::new(
            FakeCatalog::new()
                .text_after("13", false, vec![game("1", "Thirteen")], delay)
                .id_after("13", vec![game("13", "CATAN")], delay),
        );

        let start = tokio::time::Instant::now();
        let planned = planner(&catalog).plan("13").await;

        assert_eq!(ids(&planned), vec!["13", "1"]);
        assert!(start.elapsed() < delay * 2);
    }
}
