//! The loop shared by every solver.

use crate::error::{ParameterError, SolveError};
use crate::registry::{divergence, RhsRegistry};
use crate::settings::StepSettings;
use crate::state::{StateVector, TrajectoryPoint};
use crate::traits::{Scalar, StepRule};
use log::debug;

/// Fills `points` with the trajectory of `initial` under `rule`.
///
/// Parameters and configuration are checked before anything is allocated. On
/// divergence `points` holds every point finalized so far and the error
/// names the index that could not be computed.
pub(crate) fn integrate<T, R>(
    rule: &mut R,
    rhs: &RhsRegistry<T>,
    initial: &StateVector<T>,
    settings: &StepSettings<T>,
    points: &mut Vec<TrajectoryPoint<T>>,
) -> Result<(), SolveError>
where
    T: Scalar,
    R: StepRule<T>,
{
    let count = settings.step_count()?;
    rule.check(rhs.dimension())?;
    rhs.ensure_complete()?;

    let step = settings.step;
    debug!(
        "integrating {} components over {} points (step {:?})",
        rhs.dimension(),
        count,
        step
    );

    let too_many = || ParameterError::TooManySteps {
        step: step.as_f64(),
        time: settings.time.as_f64(),
    };

    points.clear();
    points.try_reserve_exact(count).map_err(|_| too_many())?;
    points.push(TrajectoryPoint::new(T::zero(), initial.clone()));

    for i in 0..count - 1 {
        // t_i = i * step, never accumulated.
        let time = T::from_usize(i + 1).ok_or_else(too_many)? * step;
        let mut next = TrajectoryPoint::new(time, points[i].state().clone());

        rule.advance(rhs, points.as_slice(), step, &mut next)?;

        if let Some(dimension) = next.state().iter().position(|v| !v.is_finite()) {
            return Err(divergence(i + 1, dimension));
        }
        points.push(next);
    }

    Ok(())
}
