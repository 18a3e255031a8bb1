//! Scripted performance source

use std::collections::VecDeque;

use crate::{Error, Result, ports::PerformanceSource};

/// Replays a fixed sequence of readings, ignoring the applied levels.
///
/// Records every level vector it was asked to measure.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    readings: VecDeque<f64>,
    applied: Vec<Vec<usize>>,
}

impl ReplaySource {
    pub fn new(readings: impl IntoIterator<Item = f64>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            applied: Vec::new(),
        }
    }

    /// Level vectors seen so far, in call order.
    pub fn applied(&self) -> &[Vec<usize>] {
        &self.applied
    }

    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl PerformanceSource for ReplaySource {
    fn measure(&mut self, levels: &[usize]) -> Result<f64> {
        let reading = self.readings.pop_front().ok_or_else(|| Error::Io {
            operation: "read scripted performance".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "readings exhausted"),
        })?;
        self.applied.push(levels.to_vec());
        Ok(reading)
    }

    fn name(&self) -> &str {
        "replay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order_then_fails() {
        let mut source = ReplaySource::new([5.0, 8.0]);
        assert_eq!(source.measure(&[0]).unwrap(), 5.0);
        assert_eq!(source.measure(&[1]).unwrap(), 8.0);
        assert!(matches!(source.measure(&[1]), Err(Error::Io { .. })));
        assert_eq!(source.applied(), &[vec![0], vec![1]]);
    }
}
