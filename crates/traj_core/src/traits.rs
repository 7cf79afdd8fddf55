use crate::error::SolveError;
use crate::registry::RhsRegistry;
use crate::state::TrajectoryPoint;
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in trajectories.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {
    fn two() -> Self {
        Self::one() + Self::one()
    }

    fn half() -> Self {
        Self::one() / Self::two()
    }

    fn six() -> Self {
        Self::two() + Self::two() + Self::two()
    }

    /// Lossy view used in diagnostics and error payloads.
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Update rule for one transition of a fixed-step solver.
///
/// The driver owns the trajectory buffer and the loop; a rule only decides how
/// the next point is derived from the points already written.
pub trait StepRule<T: Scalar> {
    /// Rejects systems the rule cannot advance.
    /// dimension: number of state components in the registry
    fn check(&self, _dimension: usize) -> Result<(), SolveError> {
        Ok(())
    }

    /// Fills `next.state` for index `history.len()`.
    /// history: finalized points, never empty
    /// step: step size
    /// next: arrives with time `t_i + step` and a copy of the state at `i`
    fn advance(
        &mut self,
        rhs: &RhsRegistry<T>,
        history: &[TrajectoryPoint<T>],
        step: T,
        next: &mut TrajectoryPoint<T>,
    ) -> Result<(), SolveError>;
}
