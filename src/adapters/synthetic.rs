//! Synthetic performance surface with a single peak

use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

use crate::{Error, Result, ports::PerformanceSource};

/// Performance `baseline - Σ |levels[i] - peak[i]|^exponent`, optionally
/// with zero-mean Gaussian measurement noise.
///
/// The default surface (`peak = [1, 3]`, `baseline = 100`, `exponent = 4`) is
/// the classic two-knob benchmark for cache-bandwidth priority tuning.
#[derive(Debug, Clone)]
pub struct PeakSurface {
    peak: Vec<usize>,
    baseline: f64,
    exponent: i32,
    noise: Option<(Normal<f64>, StdRng)>,
}

impl PeakSurface {
    pub fn new(peak: Vec<usize>, baseline: f64, exponent: i32) -> Self {
        Self {
            peak,
            baseline,
            exponent,
            noise: None,
        }
    }

    /// Add Gaussian noise with standard deviation `std_dev` to each reading.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `std_dev` is negative or not finite.
    pub fn with_noise(mut self, std_dev: f64, seed: Option<u64>) -> Result<Self> {
        let normal = Normal::new(0.0, std_dev).map_err(|e| Error::InvalidConfiguration {
            message: format!("noise standard deviation {std_dev}: {e}"),
        })?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        self.noise = Some((normal, rng));
        Ok(self)
    }

    /// Noise-free performance at `levels`.
    pub fn value(&self, levels: &[usize]) -> f64 {
        let penalty: f64 = levels
            .iter()
            .zip(&self.peak)
            .map(|(&level, &peak)| (level as f64 - peak as f64).abs().powi(self.exponent))
            .sum();
        self.baseline - penalty
    }

    pub fn peak(&self) -> &[usize] {
        &self.peak
    }
}

impl Default for PeakSurface {
    fn default() -> Self {
        Self::new(vec![1, 3], 100.0, 4)
    }
}

impl PerformanceSource for PeakSurface {
    fn measure(&mut self, levels: &[usize]) -> Result<f64> {
        if levels.len() != self.peak.len() {
            return Err(Error::config(format!(
                "surface has {} parameters but {} levels were applied",
                self.peak.len(),
                levels.len()
            )));
        }
        let mut reading = self.value(levels);
        if let Some((normal, rng)) = &mut self.noise {
            reading += normal.sample(rng);
        }
        Ok(reading)
    }

    fn name(&self) -> &str {
        "peak-surface"
    }
}
