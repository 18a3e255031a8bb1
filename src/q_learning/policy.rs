//! ε-greedy action selection over the legal actions of a state

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::q_learning::q_table::QTable;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Outcome of one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub action: usize,
    /// Whether the action was drawn at random rather than taken greedily
    pub explored: bool,
}

/// ε-greedy selector owning its random stream.
///
/// One uniform draw `u ∈ [0, 1)` is made per selection. The selector explores
/// when `u < epsilon` and exploits when `u >= epsilon`, so the greedy action is
/// taken with probability `1 - epsilon`. Exploration draws uniformly among the
/// legal actions only.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    rng: StdRng,
    seed: Option<u64>,
}

impl EpsilonGreedy {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: build_rng(seed),
            seed,
        }
    }

    pub fn select(
        &mut self,
        table: &QTable,
        state: usize,
        legal_actions: &[usize],
        epsilon: f64,
    ) -> Selection {
        if self.rng.random::<f64>() < epsilon {
            // Explore: random legal action
            let action = legal_actions
                .choose(&mut self.rng)
                .copied()
                .unwrap_or_else(|| table.greedy_action(state, legal_actions));
            Selection {
                action,
                explored: true,
            }
        } else {
            // Exploit: greedy action based on Q-values
            Selection {
                action: table.greedy_action(state, legal_actions),
                explored: false,
            }
        }
    }

    /// Restart the random stream from the configured seed.
    pub fn reset(&mut self) {
        self.rng = build_rng(self.seed);
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_favourite() -> QTable {
        let mut table = QTable::new(1, 5, 0.5, 0.5, 0.0);
        table.set(0, 3, 1.0);
        table
    }

    #[test]
    fn test_zero_epsilon_always_greedy() {
        let table = table_with_favourite();
        let mut policy = EpsilonGreedy::new(Some(1));
        for _ in 0..200 {
            let selection = policy.select(&table, 0, &[0, 1, 2, 3, 4], 0.0);
            assert_eq!(selection.action, 3);
            assert!(!selection.explored);
        }
    }

    #[test]
    fn test_full_epsilon_explores_legal_only() {
        let table = table_with_favourite();
        let mut policy = EpsilonGreedy::new(Some(2));
        let legal = [0, 1, 4];
        let mut seen = [false; 5];
        for _ in 0..500 {
            let selection = policy.select(&table, 0, &legal, 1.0);
            assert!(selection.explored);
            assert!(legal.contains(&selection.action));
            seen[selection.action] = true;
        }
        assert!(seen[0] && seen[1] && seen[4]);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let table = table_with_favourite();
        let mut a = EpsilonGreedy::new(Some(9));
        let mut b = EpsilonGreedy::new(Some(9));
        for _ in 0..100 {
            assert_eq!(
                a.select(&table, 0, &[0, 1, 2, 3, 4], 0.5),
                b.select(&table, 0, &[0, 1, 2, 3, 4], 0.5)
            );
        }
    }

    #[test]
    fn test_reset_replays_stream() {
        let table = table_with_favourite();
        let mut policy = EpsilonGreedy::new(Some(4));
        let first: Vec<_> = (0..20)
            .map(|_| policy.select(&table, 0, &[0, 1, 2], 0.7))
            .collect();
        policy.reset();
        let second: Vec<_> = (0..20)
            .map(|_| policy.select(&table, 0, &[0, 1, 2], 0.7))
            .collect();
        assert_eq!(first, second);
    }
}
