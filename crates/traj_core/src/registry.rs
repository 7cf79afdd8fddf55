use crate::error::{ConfigurationError, SolveError};
use crate::state::TrajectoryPoint;
use crate::traits::Scalar;
use std::fmt;

/// Derivative of one state component, evaluated at a trajectory point.
pub type RhsFn<T> = Box<dyn Fn(&TrajectoryPoint<T>) -> T>;

/// One right-hand side per state dimension.
///
/// Slot `j` holds d(state[j])/dt. Functions are owned by the registry, so any
/// coefficients they use must be captured by value (`move` closures).
pub struct RhsRegistry<T: Scalar> {
    slots: Vec<Option<RhsFn<T>>>,
}

impl<T: Scalar> RhsRegistry<T> {
    /// Creates a registry with `dimension` unassigned slots.
    pub fn new(dimension: usize) -> Self {
        Self {
            slots: (0..dimension).map(|_| None).collect(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.slots.len()
    }

    /// Assigns the derivative of component `index`, replacing any previous one.
    pub fn set<F>(&mut self, index: usize, f: F) -> Result<(), SolveError>
    where
        F: Fn(&TrajectoryPoint<T>) -> T + 'static,
    {
        let dimension = self.dimension();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ConfigurationError::IndexOutOfRange { index, dimension })?;
        *slot = Some(Box::new(f));
        Ok(())
    }

    pub fn is_assigned(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    pub fn first_unassigned(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn is_complete(&self) -> bool {
        self.first_unassigned().is_none()
    }

    pub fn ensure_complete(&self) -> Result<(), SolveError> {
        match self.first_unassigned() {
            Some(index) => Err(ConfigurationError::UnassignedRhs { index }.into()),
            None => Ok(()),
        }
    }

    /// Evaluates slot `index` at `point`. The value is returned as computed,
    /// finite or not.
    pub fn evaluate(&self, index: usize, point: &TrajectoryPoint<T>) -> Result<T, SolveError> {
        let dimension = self.dimension();
        if point.dimension() != dimension {
            return Err(ConfigurationError::DimensionMismatch {
                expected: dimension,
                actual: point.dimension(),
            }
            .into());
        }
        match self.slots.get(index) {
            Some(Some(f)) => Ok(f(point)),
            Some(None) => Err(ConfigurationError::UnassignedRhs { index }.into()),
            None => Err(ConfigurationError::IndexOutOfRange { index, dimension }.into()),
        }
    }

    /// Evaluates every slot at the same point.
    /// out: buffer of length `dimension()`
    pub fn evaluate_all(
        &self,
        point: &TrajectoryPoint<T>,
        out: &mut [T],
    ) -> Result<(), SolveError> {
        self.check_buffer(out)?;
        for (index, value) in out.iter_mut().enumerate() {
            *value = self.evaluate(index, point)?;
        }
        Ok(())
    }

    fn check_buffer(&self, out: &[T]) -> Result<(), SolveError> {
        if out.len() != self.dimension() {
            return Err(ConfigurationError::DimensionMismatch {
                expected: self.dimension(),
                actual: out.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Evaluates slot `index` while computing point `target`, turning a
    /// non-finite derivative into a divergence.
    pub(crate) fn derivative(
        &self,
        index: usize,
        point: &TrajectoryPoint<T>,
        target: usize,
    ) -> Result<T, SolveError> {
        let value = self.evaluate(index, point)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(divergence(target, index))
        }
    }

    /// Stage evaluation: all slots at one point, before anything is mutated.
    pub(crate) fn derivatives(
        &self,
        point: &TrajectoryPoint<T>,
        target: usize,
        out: &mut [T],
    ) -> Result<(), SolveError> {
        self.check_buffer(out)?;
        for (index, value) in out.iter_mut().enumerate() {
            *value = self.derivative(index, point, target)?;
        }
        Ok(())
    }
}

pub(crate) fn divergence(index: usize, dimension: usize) -> SolveError {
    SolveError::NumericDivergence {
        index,
        dimension,
        last_valid: index.saturating_sub(1),
    }
}

impl<T: Scalar> fmt::Debug for RhsRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assigned: Vec<bool> = self.slots.iter().map(Option::is_some).collect();
        f.debug_struct("RhsRegistry")
            .field("assigned", &assigned)
            .finish()
    }
}
