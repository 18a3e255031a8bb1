//! Dense Q-table for temporal difference learning

use serde::{Deserialize, Serialize};

/// Q-table mapping (state index, action index) pairs to Q-values
///
/// Rows are states, columns are actions; storage is one contiguous
/// row-major buffer sized `num_states × num_actions` at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTable {
    /// Row-major Q-values
    q_values: Vec<f64>,
    num_actions: usize,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Optimistic value every entry starts from
    q_init: f64,
}

impl QTable {
    /// Create a new Q-table with every entry set to `q_init`
    pub fn new(
        num_states: usize,
        num_actions: usize,
        learning_rate: f64,
        discount_factor: f64,
        q_init: f64,
    ) -> Self {
        Self {
            q_values: vec![q_init; num_states * num_actions],
            num_actions,
            learning_rate,
            discount_factor,
            q_init,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.q_values[self.offset(state, action)]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: usize, action: usize, value: f64) {
        let offset = self.offset(state, action);
        self.q_values[offset] = value;
    }

    /// All action values of one state
    pub fn row(&self, state: usize) -> &[f64] {
        let start = state * self.num_actions;
        &self.q_values[start..start + self.num_actions]
    }

    /// Get maximum Q-value over legal actions in a state
    pub fn max_q(&self, state: usize, legal_actions: &[usize]) -> f64 {
        legal_actions
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Select greedy action (highest Q-value) from legal actions
    ///
    /// Ties go to the action listed first in `legal_actions`.
    pub fn greedy_action(&self, state: usize, legal_actions: &[usize]) -> usize {
        debug_assert!(!legal_actions.is_empty());
        let mut best = legal_actions[0];
        let mut best_q = self.get(state, best);
        for &action in &legal_actions[1..] {
            let q = self.get(state, action);
            if q > best_q {
                best = action;
                best_q = q;
            }
        }
        best
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Returns the TD error.
    pub fn q_learning_update(
        &mut self,
        state: usize,
        action: usize,
        reward: f64,
        next_state: usize,
        next_legal_actions: &[usize],
    ) -> f64 {
        let max_next_q = self.max_q(next_state, next_legal_actions);
        self.apply_target(state, action, reward + self.discount_factor * max_next_q)
    }

    /// SARSA update: on-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
    ///
    /// Returns the TD error.
    pub fn sarsa_update(
        &mut self,
        state: usize,
        action: usize,
        reward: f64,
        next_state: usize,
        next_action: usize,
    ) -> f64 {
        let next_q = self.get(next_state, next_action);
        self.apply_target(state, action, reward + self.discount_factor * next_q)
    }

    fn apply_target(&mut self, state: usize, action: usize, td_target: f64) -> f64 {
        let current_q = self.get(state, action);
        let td_error = td_target - current_q;
        self.set(state, action, current_q + self.learning_rate * td_error);
        td_error
    }

    /// Reset all Q-values to the optimistic initial value
    pub fn reset(&mut self) {
        self.q_values.fill(self.q_init);
    }

    pub fn q_init(&self) -> f64 {
        self.q_init
    }

    pub fn num_states(&self) -> usize {
        self.q_values.len() / self.num_actions
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Iterate over every stored Q-value
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.q_values.iter().copied()
    }

    fn offset(&self, state: usize, action: usize) -> usize {
        debug_assert!(action < self.num_actions);
        state * self.num_actions + action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new(16, 5, 0.5, 0.99, 10.0);
        assert_eq!(qtable.num_states(), 16);
        assert_eq!(qtable.num_actions(), 5);
        assert!(qtable.values().all(|q| q == 10.0));
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new(4, 3, 0.5, 0.99, 0.0);
        qtable.set(2, 1, 1.5);
        assert_eq!(qtable.get(2, 1), 1.5);
        assert_eq!(qtable.row(2), &[0.0, 1.5, 0.0]);
        assert_eq!(qtable.get(1, 1), 0.0);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::new(1, 3, 0.5, 0.99, 0.0);
        qtable.set(0, 0, 0.5);
        qtable.set(0, 1, 1.5);
        qtable.set(0, 2, 0.8);

        assert_eq!(qtable.max_q(0, &[0, 1, 2]), 1.5);
        // Masked actions are never considered
        assert_eq!(qtable.max_q(0, &[0, 2]), 0.8);
    }

    #[test]
    fn test_greedy_action() {
        let mut qtable = QTable::new(1, 3, 0.5, 0.99, 0.0);
        qtable.set(0, 0, 0.5);
        qtable.set(0, 1, 1.5);
        qtable.set(0, 2, 0.8);

        assert_eq!(qtable.greedy_action(0, &[0, 1, 2]), 1);
        assert_eq!(qtable.greedy_action(0, &[0, 2]), 2);
    }

    #[test]
    fn test_greedy_ties_pick_first_listed() {
        let mut qtable = QTable::new(1, 5, 0.5, 0.99, 10.0);
        assert_eq!(qtable.greedy_action(0, &[0, 1, 2, 3, 4]), 0);
        assert_eq!(qtable.greedy_action(0, &[1, 3]), 1);

        qtable.set(0, 2, 12.0);
        qtable.set(0, 4, 12.0);
        assert_eq!(qtable.greedy_action(0, &[0, 1, 2, 3, 4]), 2);
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new(2, 3, 0.5, 0.99, 0.0);

        // Set next state values
        qtable.set(1, 1, 1.0);
        qtable.set(1, 2, 2.0);

        let td_error = qtable.q_learning_update(0, 0, 0.0, 1, &[1, 2]);

        // Q(0,0) = 0.0 + 0.5 * (0.0 + 0.99 * 2.0 - 0.0) = 0.99
        assert!((qtable.get(0, 0) - 0.99).abs() < 1e-12);
        assert!((td_error - 1.98).abs() < 1e-12);
    }

    #[test]
    fn test_q_learning_update_respects_mask() {
        let mut qtable = QTable::new(2, 3, 1.0, 1.0, 0.0);
        qtable.set(1, 2, 100.0);
        qtable.set(1, 1, 1.0);

        qtable.q_learning_update(0, 0, 0.0, 1, &[0, 1]);
        assert_eq!(qtable.get(0, 0), 1.0);
    }

    #[test]
    fn test_sarsa_update() {
        let mut qtable = QTable::new(2, 3, 0.5, 0.99, 0.0);

        // Set next state value for actual action taken
        qtable.set(1, 1, 1.5);
        qtable.set(1, 2, 9.0);

        qtable.sarsa_update(0, 2, 0.0, 1, 1);

        // Q(0,2) = 0.0 + 0.5 * (0.0 + 0.99 * 1.5 - 0.0) = 0.7425
        assert!((qtable.get(0, 2) - 0.7425).abs() < 1e-12);
    }

    #[test]
    fn test_reset_restores_optimism() {
        let mut qtable = QTable::new(3, 3, 0.5, 0.99, 10.0);
        qtable.set(1, 1, -4.0);
        qtable.reset();
        assert!(qtable.values().all(|q| q == 10.0));
    }
}
