//! The out-of-range write the original programs perform, through a
//! selectable access mode.

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use log::{debug, warn};

use crate::bounded::BoundedArray;
use crate::error::OutOfRangeError;

/// Index written by the original programs.
pub const ORIGINAL_INDEX: i128 = 3;
/// Value written by the original programs.
pub const ORIGINAL_VALUE: u64 = 0x7ffff7b36ceb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Access {
    /// Validate the index and report an error when it is out of range
    #[default]
    Checked,
    /// Validate the index and panic when it is out of range
    Panicking,
    /// Skip validation (undefined behaviour when out of range)
    Unchecked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The write landed and this value was read back.
    Stored(u64),
    /// The checked access refused the index.
    Rejected(OutOfRangeError),
}

#[derive(Debug, Clone, Copy)]
pub struct Demo {
    pub access: Access,
    pub index: i128,
    pub value: u64,
    /// Lets `Access::Unchecked` proceed with an out-of-range index.
    pub allow_undefined: bool,
}

impl Default for Demo {
    fn default() -> Self {
        Self {
            access: Access::default(),
            index: ORIGINAL_INDEX,
            value: ORIGINAL_VALUE,
            allow_undefined: false,
        }
    }
}

impl Demo {
    /// Writes `value` at `index` of a zeroed one-element array, reads it back
    /// and prints the result (or the diagnostic) to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<Outcome> {
        let mut a: BoundedArray<u64, 1> = BoundedArray::default();
        debug!(
            "writing {:#x} at index {} of a length {} array ({:?})",
            self.value,
            self.index,
            a.capacity(),
            self.access
        );

        let outcome = match self.access {
            Access::Checked => checked(&mut a, self.index, self.value),
            Access::Panicking => {
                let index = usize_index(self.index)?;
                a[index] = self.value;
                Outcome::Stored(a[index])
            }
            Access::Unchecked => {
                let index = usize_index(self.index)?;
                if index >= a.capacity() {
                    if !self.allow_undefined {
                        bail!(
                            "refusing unchecked access at index {index} (length {}) \
                             without --allow-undefined",
                            a.capacity()
                        );
                    }
                    warn!("unchecked write at index {index} is out of range (undefined behaviour)");
                }
                // SAFETY: only sound when `index < N`. `allow_undefined` deliberately
                // breaks that and makes this block unsound; it exists to reproduce the
                // out-of-bounds write and must never be set outside the demo binary.
                unsafe {
                    a.set_unchecked(index, self.value);
                    Outcome::Stored(*a.get_unchecked(index))
                }
            }
        };

        let written = match &outcome {
            Outcome::Stored(value) => writeln!(out, "{value}"),
            Outcome::Rejected(err) => writeln!(out, "error: {err}"),
        };
        written.context("failed to write demo output")?;
        Ok(outcome)
    }
}

fn usize_index(index: i128) -> Result<usize> {
    usize::try_from(index)
        .with_context(|| format!("index {index} cannot be used to index an array"))
}

fn checked(a: &mut BoundedArray<u64, 1>, index: i128, value: u64) -> Outcome {
    let stored = a
        .set_checked(index, value)
        .and_then(|_| a.get_checked(index).copied());
    match stored {
        Ok(value) => Outcome::Stored(value),
        Err(err) => {
            debug!("checked write rejected: {err}");
            Outcome::Rejected(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(demo: Demo) -> (Result<Outcome>, String) {
        let mut out = Vec::new();
        let res = demo.run(&mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_checked_default_is_rejected() {
        let (res, out) = run(Demo::default());
        assert_eq!(res.unwrap(), Outcome::Rejected(OutOfRangeError::new(3, 1)));
        assert_eq!(out, "error: index 3 is out of range for length 1\n");
    }

    #[test]
    fn test_checked_rejection_printed_once() {
        let (res, out) = run(Demo::default());
        assert!(matches!(res.unwrap(), Outcome::Rejected(_)));
        assert_eq!(out.lines().count(), 1);
        assert_eq!(out.matches("out of range").count(), 1);
    }

    #[test]
    fn test_checked_in_range_prints_value() {
        let (res, out) = run(Demo {
            index: 0,
            value: 42,
            ..Demo::default()
        });
        assert_eq!(res.unwrap(), Outcome::Stored(42));
        assert_eq!(out, "42\n");
    }

    #[test]
    fn test_checked_negative_index() {
        let (res, out) = run(Demo {
            index: -2,
            ..Demo::default()
        });
        assert_eq!(res.unwrap(), Outcome::Rejected(OutOfRangeError::new(-2, 1)));
        assert_eq!(out, "error: index -2 is out of range for length 1\n");
    }

    #[test]
    fn test_panicking_in_range() {
        let (res, out) = run(Demo {
            access: Access::Panicking,
            index: 0,
            ..Demo::default()
        });
        assert_eq!(res.unwrap(), Outcome::Stored(ORIGINAL_VALUE));
        assert_eq!(out, "140737349119211\n");
    }

    #[test]
    #[should_panic(expected = "index 3 is out of range for length 1")]
    fn test_panicking_out_of_range() {
        let _ = run(Demo {
            access: Access::Panicking,
            ..Demo::default()
        });
    }

    #[test]
    fn test_panicking_negative_is_error() {
        let (res, out) = run(Demo {
            access: Access::Panicking,
            index: -1,
            ..Demo::default()
        });
        assert!(res.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_unchecked_in_range() {
        let (res, _) = run(Demo {
            access: Access::Unchecked,
            index: 0,
            value: 9,
            ..Demo::default()
        });
        assert_eq!(res.unwrap(), Outcome::Stored(9));
    }

    #[test]
    fn test_unchecked_out_of_range_is_refused() {
        let (res, out) = run(Demo {
            access: Access::Unchecked,
            ..Demo::default()
        });
        let err = res.unwrap_err();
        assert!(err.to_string().contains("--allow-undefined"));
        assert!(out.is_empty());
    }
}
