//! Knob adjustments and their legality mask
//!
//! Actions are indexed with a fixed convention so they can address columns
//! of the value table directly:
//!
//! | index | action |
//! |-------|--------|
//! | `0` | [`Action::None`] |
//! | `2i + 1` | [`Action::Increment`] of parameter `i` |
//! | `2i + 2` | [`Action::Decrement`] of parameter `i` |

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single control decision: hold, or move one parameter by one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    None,
    Increment(usize),
    Decrement(usize),
}

impl Action {
    /// Number of actions available with `num_params` parameters.
    pub const fn count(num_params: usize) -> usize {
        2 * num_params + 1
    }

    /// Table column for this action.
    pub const fn index(self) -> usize {
        match self {
            Action::None => 0,
            Action::Increment(param) => 2 * param + 1,
            Action::Decrement(param) => 2 * param + 2,
        }
    }

    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Action::None,
            i if i % 2 == 1 => Action::Increment((i - 1) / 2),
            i => Action::Decrement((i - 2) / 2),
        }
    }

    /// Parameter touched by this action, if any.
    pub const fn param(self) -> Option<usize> {
        match self {
            Action::None => None,
            Action::Increment(param) | Action::Decrement(param) => Some(param),
        }
    }

    /// Whether applying this action keeps every level inside its range.
    pub fn is_legal(self, levels: &[usize], ranges: &[usize]) -> bool {
        match self {
            Action::None => true,
            Action::Increment(param) => param < levels.len() && levels[param] + 1 < ranges[param],
            Action::Decrement(param) => param < levels.len() && levels[param] > 0,
        }
    }

    /// Apply the action to `levels` in place.
    ///
    /// The action must be legal for `levels`.
    pub fn apply(self, levels: &mut [usize]) {
        match self {
            Action::None => {}
            Action::Increment(param) => levels[param] += 1,
            Action::Decrement(param) => {
                debug_assert!(levels[param] > 0);
                levels[param] -= 1;
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::None => f.write_str("none"),
            Action::Increment(param) => write!(f, "+p{param}"),
            Action::Decrement(param) => write!(f, "-p{param}"),
        }
    }
}

/// Indices of the actions legal from `levels`, in enumeration order.
///
/// The order is `NONE`, then increment/decrement for each parameter in index
/// order. Greedy tie-breaking depends on it.
pub fn legal_actions(levels: &[usize], ranges: &[usize]) -> Vec<usize> {
    debug_assert_eq!(levels.len(), ranges.len());
    let mut legal = Vec::with_capacity(Action::count(levels.len()));
    legal.push(Action::None.index());
    for (param, (&level, &range)) in levels.iter().zip(ranges).enumerate() {
        if level + 1 < range {
            legal.push(Action::Increment(param).index());
        }
        if level > 0 {
            legal.push(Action::Decrement(param).index());
        }
    }
    legal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_convention() {
        assert_eq!(Action::None.index(), 0);
        assert_eq!(Action::Increment(0).index(), 1);
        assert_eq!(Action::Decrement(0).index(), 2);
        assert_eq!(Action::Increment(3).index(), 7);
        assert_eq!(Action::Decrement(3).index(), 8);
        for index in 0..Action::count(5) {
            assert_eq!(Action::from_index(index).index(), index);
        }
    }

    #[test]
    fn test_legal_actions_at_corners() {
        let ranges = [4, 4];
        assert_eq!(legal_actions(&[0, 0], &ranges), vec![0, 1, 3]);
        assert_eq!(legal_actions(&[3, 3], &ranges), vec![0, 2, 4]);
        assert_eq!(legal_actions(&[1, 2], &ranges), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_single_level_parameter_only_holds() {
        assert_eq!(legal_actions(&[0], &[1]), vec![0]);
    }

    #[test]
    fn test_legal_actions_agree_with_is_legal() {
        let ranges = [3, 2];
        for a in 0..3 {
            for b in 0..2 {
                let levels = [a, b];
                let expected: Vec<usize> = (0..Action::count(2))
                    .filter(|&i| Action::from_index(i).is_legal(&levels, &ranges))
                    .collect();
                assert_eq!(legal_actions(&levels, &ranges), expected);
            }
        }
    }

    #[test]
    fn test_apply() {
        let mut levels = vec![1, 1];
        Action::Increment(1).apply(&mut levels);
        assert_eq!(levels, vec![1, 2]);
        Action::Decrement(0).apply(&mut levels);
        assert_eq!(levels, vec![0, 2]);
        Action::None.apply(&mut levels);
        assert_eq!(levels, vec![0, 2]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::None.to_string(), "none");
        assert_eq!(Action::Increment(2).to_string(), "+p2");
        assert_eq!(Action::Decrement(0).to_string(), "-p0");
    }
}
