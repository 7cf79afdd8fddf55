use crate::error::{ParameterError, SolveError};
use crate::traits::Scalar;
use serde::{Deserialize, Serialize};

/// Time horizon and fixed step size for one solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSettings<T = f64> {
    pub time: T,
    pub step: T,
}

impl Default for StepSettings<f64> {
    fn default() -> Self {
        Self {
            time: 1.0,
            step: 1e-3,
        }
    }
}

impl<T: Scalar> StepSettings<T> {
    pub fn new(time: T, step: T) -> Self {
        Self { time, step }
    }

    pub fn validate(&self) -> Result<(), SolveError> {
        if !(self.time.is_finite() && self.time > T::zero()) {
            return Err(ParameterError::Time(self.time.as_f64()).into());
        }
        if !(self.step.is_finite() && self.step > T::zero()) {
            return Err(ParameterError::Step(self.step.as_f64()).into());
        }
        if self.step > self.time {
            return Err(ParameterError::StepExceedsTime {
                step: self.step.as_f64(),
                time: self.time.as_f64(),
            }
            .into());
        }
        Ok(())
    }

    /// Number of trajectory points, `floor(time / step)`. Always at least one
    /// for valid settings.
    pub fn step_count(&self) -> Result<usize, SolveError> {
        self.validate()?;
        (self.time / self.step)
            .floor()
            .to_usize()
            .filter(|&count| count >= 1)
            .ok_or_else(|| {
                ParameterError::TooManySteps {
                    step: self.step.as_f64(),
                    time: self.time.as_f64(),
                }
                .into()
            })
    }
}
