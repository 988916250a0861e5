use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::physics::NodeStore;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Indices of nodes whose name or url fuzzy-matches `query`.
pub(super) fn matching_indices(store: &NodeStore, query: &str) -> HashSet<usize> {
    let query = query.trim();
    if query.is_empty() {
        return HashSet::new();
    }

    let matcher = SkimMatcherV2::default();
    store
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            fuzzy_match_score(&matcher, &node.name, query).is_some()
                || fuzzy_match_score(&matcher, &node.url, query).is_some()
        })
        .map(|(index, _)| index)
        .collect()
}

/// Search results cached per store generation and query.
#[derive(Default)]
pub(super) struct SearchCache {
    key: Option<(u64, String)>,
    matches: HashSet<usize>,
}

impl SearchCache {
    pub(super) fn matches(
        &mut self,
        store: &NodeStore,
        generation: u64,
        query: &str,
    ) -> &HashSet<usize> {
        let fresh = self
            .key
            .as_ref()
            .is_some_and(|(cached_generation, cached_query)| {
                *cached_generation == generation && cached_query == query
            });
        if !fresh {
            self.matches = matching_indices(store, query);
            self.key = Some((generation, query.to_owned()));
        }
        &self.matches
    }
}
