use std::collections::{HashSet, VecDeque};

/// Tunable parameters of the genre diversification pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingConfig {
    /// How many recently emitted items are compared against each candidate
    pub window: usize,
    /// Penalty per genre shared with one item in the window
    pub penalty_weight: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            window: 3,
            penalty_weight: 2,
        }
    }
}

/// Greedy, windowed genre diversification over a single page
///
/// Each output slot goes to the remaining candidate that overlaps least with
/// the genres of the last `window` emitted items. The scan walks candidates in
/// their incoming order, stops at the first zero-penalty candidate, and keeps
/// the earliest candidate on ties. Locally good, not globally optimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiversityReranker {
    config: RankingConfig,
}

impl DiversityReranker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// Returns a permutation of `items`, reordered to spread out genres
    pub fn rerank<T, F>(&self, items: Vec<T>, genres_of: F) -> Vec<T>
    where
        F: Fn(&T) -> &[String],
    {
        let order = {
            let genre_sets: Vec<HashSet<&str>> = items
                .iter()
                .map(|item| genres_of(item).iter().map(String::as_str).collect())
                .collect();
            self.emission_order(&genre_sets)
        };

        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect()
    }

    /// Indices of `genre_sets` in emission order
    fn emission_order(&self, genre_sets: &[HashSet<&str>]) -> Vec<usize> {
        let mut remaining: Vec<usize> = (0..genre_sets.len()).collect();
        let mut history: VecDeque<usize> = VecDeque::with_capacity(self.config.window + 1);
        let mut order = Vec::with_capacity(genre_sets.len());

        while !remaining.is_empty() {
            let mut best_position = 0;
            let mut best_penalty = u32::MAX;

            for (position, &candidate) in remaining.iter().enumerate() {
                let penalty = self.penalty(&genre_sets[candidate], &history, genre_sets);
                if penalty < best_penalty {
                    best_penalty = penalty;
                    best_position = position;
                }
                if penalty == 0 {
                    break;
                }
            }

            // `remove` keeps the rest in original order for the next scan
            let chosen = remaining.remove(best_position);
            order.push(chosen);

            history.push_back(chosen);
            while history.len() > self.config.window {
                history.pop_front();
            }
        }

        order
    }

    /// Sum over window slots of the genres the candidate shares with that slot
    fn penalty(
        &self,
        candidate: &HashSet<&str>,
        history: &VecDeque<usize>,
        genre_sets: &[HashSet<&str>],
    ) -> u32 {
        history
            .iter()
            .map(|&slot| {
                let shared = candidate.intersection(&genre_sets[slot]).count() as u32;
                shared.saturating_mul(self.config.penalty_weight)
            })
            .fold(0u32, u32::saturating_add)
    }
}
