//! Mixed-radix state encoding
//!
//! A state is a vector of per-parameter levels. Parameter `i` takes levels
//! `0..ranges[i]`, and the whole vector is packed into a single table index:
//!
//! ```text
//! index = Σ levels[i] * stride[i],   stride[i] = Π_{j<i} ranges[j]
//! ```
//!
//! With a uniform range `r` this reduces to `Σ levels[i] * r^i`.
//!
//! The number of states grows as the product of all ranges, so the encoder
//! refuses to build a state space larger than a caller-supplied limit.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Bijection between level vectors and table indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEncoder {
    ranges: Vec<usize>,
    strides: Vec<usize>,
    num_states: usize,
}

impl StateEncoder {
    /// Build an encoder for the given per-parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `ranges` is empty or holds a
    /// zero, and [`Error::StateSpaceTooLarge`] if the product of the ranges
    /// overflows or exceeds `max_states`.
    pub fn new(ranges: &[usize], max_states: usize) -> Result<Self> {
        if ranges.is_empty() {
            return Err(Error::config("at least one parameter is required"));
        }
        if let Some(param) = ranges.iter().position(|&range| range == 0) {
            return Err(Error::config(format!(
                "parameter {param} has an empty level range"
            )));
        }

        let too_large = || Error::StateSpaceTooLarge {
            ranges: ranges.to_vec(),
            limit: max_states,
        };

        let mut strides = Vec::with_capacity(ranges.len());
        let mut num_states = 1usize;
        for &range in ranges {
            strides.push(num_states);
            num_states = num_states.checked_mul(range).ok_or_else(too_large)?;
        }
        if num_states > max_states {
            return Err(too_large());
        }

        Ok(Self {
            ranges: ranges.to_vec(),
            strides,
            num_states,
        })
    }

    /// Pack a level vector into its table index.
    ///
    /// Every level must lie inside its parameter's range.
    pub fn encode(&self, levels: &[usize]) -> usize {
        debug_assert_eq!(levels.len(), self.ranges.len());
        levels
            .iter()
            .zip(&self.ranges)
            .zip(&self.strides)
            .map(|((&level, &range), &stride)| {
                debug_assert!(level < range, "level {level} outside range {range}");
                level * stride
            })
            .sum()
    }

    /// Unpack a table index into its level vector.
    pub fn decode(&self, index: usize) -> Vec<usize> {
        debug_assert!(index < self.num_states);
        let mut remainder = index;
        self.ranges
            .iter()
            .map(|&range| {
                let level = remainder % range;
                remainder /= range;
                level
            })
            .collect()
    }

    /// Index distance moved by a single-level change of `param`.
    pub fn stride(&self, param: usize) -> usize {
        self.strides[param]
    }

    pub fn ranges(&self) -> &[usize] {
        &self.ranges
    }

    pub fn num_params(&self) -> usize {
        self.ranges.len()
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }
}
