//! Control functions: scalar curves that parameterize transforms over time.
//!
//! A [`ControlFunction`] maps a time in seconds (or a normalized axis position)
//! to a value. Transforms evaluate them many times and from several worker
//! threads at once, so implementations must be pure: the same input always
//! yields the same output, and evaluation has no side effects.
//!
//! Any `Fn(f64) -> f64 + Send + Sync` closure is a control function. The
//! standing curves below cover the common cases:
//!
//! - [`Constant`] - the same value everywhere
//! - [`Identity`] - returns its input (the identity warp)
//! - [`Breakpoints`] - piecewise-linear envelope through `(time, value)` points
//!
//! ```
//! use spectra_core::{Breakpoints, ControlFunction};
//!
//! let env = Breakpoints::new(vec![(0.0, 0.0), (1.0, 10.0)]).unwrap();
//! assert_eq!(env.eval(0.5), 5.0);
//! assert_eq!(env.eval(3.0), 10.0);
//! ```

use std::str::FromStr;

use crate::{Error, Result};

/// Pure scalar function of time or position.
pub trait ControlFunction: Send + Sync {
    fn eval(&self, t: f64) -> f64;
}

impl<F> ControlFunction for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    #[inline]
    fn eval(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Constant control value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl ControlFunction for Constant {
    #[inline]
    fn eval(&self, _t: f64) -> f64 {
        self.0
    }
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Identity;

impl ControlFunction for Identity {
    #[inline]
    fn eval(&self, t: f64) -> f64 {
        t
    }
}

/// Piecewise-linear envelope through `(time, value)` points.
///
/// Before the first point the first value holds; after the last point the last
/// value holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoints {
    points: Vec<(f64, f64)>,
}

impl Breakpoints {
    /// Build an envelope. Points must be finite, non-empty, and sorted by
    /// strictly increasing time.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidControl("breakpoint list is empty".into()));
        }
        if let Some(&(t, v)) = points.iter().find(|(t, v)| !t.is_finite() || !v.is_finite()) {
            return Err(Error::InvalidControl(format!(
                "non-finite breakpoint ({}, {})",
                t, v
            )));
        }
        if let Some(pair) = points.windows(2).find(|pair| pair[1].0 <= pair[0].0) {
            return Err(Error::InvalidControl(format!(
                "breakpoint times must increase: {} followed by {}",
                pair[0].0, pair[1].0
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

impl ControlFunction for Breakpoints {
    fn eval(&self, t: f64) -> f64 {
        // NaN fails both clamps below; pass it through for callers to reject
        if t.is_nan() {
            return f64::NAN;
        }
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        // First point strictly after t; the clamps above keep it in 1..len for non-NaN t
        let upper = self.points.partition_point(|&(time, _)| time <= t);
        let (t0, v0) = self.points[upper - 1];
        let (t1, v1) = self.points[upper];
        v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    }
}

/// Parses the plain-text breakpoint format: one `time value` pair per line,
/// separated by whitespace. Blank lines and `#` comments are ignored.
impl FromStr for Breakpoints {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut points = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(time), Some(value), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(Error::InvalidControl(format!(
                    "line {}: expected `time value`, found `{}`",
                    number + 1,
                    line
                )));
            };
            let parse = |field: &str| {
                field.parse::<f64>().map_err(|e| {
                    Error::InvalidControl(format!("line {}: `{}`: {}", number + 1, field, e))
                })
            };
            points.push((parse(time)?, parse(value)?));
        }
        Self::new(points)
    }
}
