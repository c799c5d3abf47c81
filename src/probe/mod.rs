//! Randomized exerciser for the checked accessors.
//!
//! Trials are split into batches that run in parallel. Each batch owns its own
//! array and its own seeded generator, so a given `(seed, batches)` pair always
//! produces the same report.

use std::fmt;

use anyhow::{bail, Result};
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

use crate::bounded::BoundedArray;
use crate::error::OutOfRangeError;

/// Array lengths the probe can be instantiated with from the command line.
pub const SUPPORTED_CAPACITIES: [usize; 4] = [1, 4, 16, 64];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    pub trials: usize,
    /// How far outside `[0, N)` indices are drawn, on both sides.
    pub span: u32,
    pub seed: u64,
    pub batches: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            span: 8,
            seed: 0,
            batches: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeReport {
    pub accepted: usize,
    pub rejected: usize,
    pub violations: usize,
}

impl ProbeReport {
    pub fn trials(&self) -> usize {
        self.accepted + self.rejected
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            accepted: self.accepted + other.accepted,
            rejected: self.rejected + other.rejected,
            violations: self.violations + other.violations,
        }
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trials: {}, accepted: {}, rejected: {}, violations: {}",
            self.trials(),
            self.accepted,
            self.rejected,
            self.violations
        )
    }
}

pub fn run_with_capacity(capacity: usize, config: &ProbeConfig) -> Result<ProbeReport> {
    let report = match capacity {
        1 => run::<1>(config),
        4 => run::<4>(config),
        16 => run::<16>(config),
        64 => run::<64>(config),
        other => bail!("unsupported capacity {other}, expected one of {SUPPORTED_CAPACITIES:?}"),
    };
    Ok(report)
}

pub fn run<const N: usize>(config: &ProbeConfig) -> ProbeReport {
    let batches = config.batches.max(1);
    let batch_size = config.trials / batches;
    (0..batches)
        .into_par_iter()
        .map(|batch| {
            let trials = if batch == batches - 1 {
                config.trials - batch * batch_size
            } else {
                batch_size
            };
            let seed = config.seed ^ (batch as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
            probe_batch::<N>(seed, trials, config.span)
        })
        .reduce(ProbeReport::default, ProbeReport::merge)
}

fn probe_batch<const N: usize>(seed: u64, trials: usize, span: u32) -> ProbeReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut a: BoundedArray<u64, N> = BoundedArray::default();
    let mut report = ProbeReport::default();

    let len = i64::try_from(N).unwrap_or(i64::MAX);
    let low = -i64::from(span);
    let high = len.saturating_add(i64::from(span));
    if low >= high {
        return report;
    }

    for _ in 0..trials {
        let index = rng.gen_range(low..high);
        let value: u64 = rng.gen();
        let before = a;
        match a.set_checked(index, value) {
            Ok(_) => {
                report.accepted += 1;
                if !(0..len).contains(&index) || a.get_checked(index) != Ok(&value) {
                    report.violations += 1;
                }
            }
            Err(err) => {
                report.rejected += 1;
                let expected = OutOfRangeError::new(index, N);
                if err != expected || a != before || a.get_checked(index) != Err(expected) {
                    report.violations += 1;
                }
            }
        }
    }
    debug!("batch seed {seed:#x}: {report}");
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_finds_no_violations() {
        let report = run::<4>(&ProbeConfig::default());
        assert_eq!(report.violations, 0);
        assert_eq!(report.trials(), 10_000);
        assert!(report.accepted > 0);
        assert!(report.rejected > 0);
    }

    #[test]
    fn test_probe_is_reproducible() {
        let config = ProbeConfig {
            trials: 1_000,
            seed: 17,
            ..ProbeConfig::default()
        };
        assert_eq!(run::<16>(&config), run::<16>(&config));
    }

    #[test]
    fn test_uneven_batches_cover_all_trials() {
        let config = ProbeConfig {
            trials: 1_003,
            batches: 7,
            ..ProbeConfig::default()
        };
        assert_eq!(run::<1>(&config).trials(), 1_003);
    }

    #[test]
    fn test_zero_span_only_accepts() {
        let config = ProbeConfig {
            trials: 500,
            span: 0,
            ..ProbeConfig::default()
        };
        let report = run::<4>(&config);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.accepted, 500);
    }

    #[test]
    fn test_unsupported_capacity() {
        assert!(run_with_capacity(3, &ProbeConfig::default()).is_err());
        assert!(run_with_capacity(64, &ProbeConfig::default()).is_ok());
    }
}
