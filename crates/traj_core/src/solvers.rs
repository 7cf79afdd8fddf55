use crate::error::{ConfigurationError, SolveError};
use crate::registry::RhsRegistry;
use crate::state::TrajectoryPoint;
use crate::traits::{Scalar, StepRule};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed-step algorithms an integrator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    Euler,
    Rk4,
    Leapfrog,
}

impl SolverKind {
    pub(crate) fn build<T: Scalar>(self, dim: usize) -> InternalRule<T> {
        match self {
            SolverKind::Euler => InternalRule::Euler(Euler::new(dim)),
            SolverKind::Rk4 => InternalRule::Rk4(RK4::new(dim)),
            SolverKind::Leapfrog => InternalRule::Leapfrog(Leapfrog),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Euler => "euler",
            SolverKind::Rk4 => "rk4",
            SolverKind::Leapfrog => "leapfrog",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown solver \"{0}\" (expected euler, rk4 or leapfrog)")]
pub struct UnknownSolver(pub String);

impl FromStr for SolverKind {
    type Err = UnknownSolver;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(SolverKind::Euler),
            "rk4" | "runge-kutta" => Ok(SolverKind::Rk4),
            "leapfrog" => Ok(SolverKind::Leapfrog),
            _ => Err(UnknownSolver(s.to_string())),
        }
    }
}

pub(crate) enum InternalRule<T: Scalar> {
    Euler(Euler<T>),
    Rk4(RK4<T>),
    Leapfrog(Leapfrog),
}

impl<T: Scalar> StepRule<T> for InternalRule<T> {
    fn check(&self, dimension: usize) -> Result<(), SolveError> {
        match self {
            InternalRule::Euler(s) => StepRule::<T>::check(s, dimension),
            InternalRule::Rk4(s) => StepRule::<T>::check(s, dimension),
            InternalRule::Leapfrog(s) => StepRule::<T>::check(s, dimension),
        }
    }

    fn advance(
        &mut self,
        rhs: &RhsRegistry<T>,
        history: &[TrajectoryPoint<T>],
        step: T,
        next: &mut TrajectoryPoint<T>,
    ) -> Result<(), SolveError> {
        match self {
            InternalRule::Euler(s) => s.advance(rhs, history, step, next),
            InternalRule::Rk4(s) => s.advance(rhs, history, step, next),
            InternalRule::Leapfrog(s) => s.advance(rhs, history, step, next),
        }
    }
}

fn current<T>(history: &[TrajectoryPoint<T>]) -> &TrajectoryPoint<T> {
    &history[history.len() - 1]
}

/// Explicit (forward) Euler.
/// Every component of `i + 1` is computed from point `i` alone.
pub struct Euler<T: Scalar> {
    rates: Vec<T>,
}

impl<T: Scalar> Euler<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            rates: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> StepRule<T> for Euler<T> {
    fn advance(
        &mut self,
        rhs: &RhsRegistry<T>,
        history: &[TrajectoryPoint<T>],
        step: T,
        next: &mut TrajectoryPoint<T>,
    ) -> Result<(), SolveError> {
        let target = history.len();
        let point = current(history);

        rhs.derivatives(point, target, &mut self.rates)?;

        let state = next.state_mut();
        for j in 0..state.len() {
            state[j] = point[j] + step * self.rates[j];
        }
        Ok(())
    }
}

/// Classic Runge-Kutta 4th Order Solver
pub struct RK4<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    stage: TrajectoryPoint<T>,
}

impl<T: Scalar> RK4<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: vec![T::zero(); dim],
            k2: vec![T::zero(); dim],
            k3: vec![T::zero(); dim],
            k4: vec![T::zero(); dim],
            stage: TrajectoryPoint::new(T::zero(), vec![T::zero(); dim]),
        }
    }
}

impl<T: Scalar> StepRule<T> for RK4<T> {
    fn advance(
        &mut self,
        rhs: &RhsRegistry<T>,
        history: &[TrajectoryPoint<T>],
        step: T,
        next: &mut TrajectoryPoint<T>,
    ) -> Result<(), SolveError> {
        let half = T::half();
        let two = T::two();
        let target = history.len();
        let point = current(history);
        let t0 = point.time();
        let n = point.dimension();

        // k1 = f(t, y)
        rhs.derivatives(point, target, &mut self.k1)?;

        // k2 = f(t + dt/2, y + dt*k1/2)
        self.stage.set_time(t0 + step * half);
        let stage = self.stage.state_mut();
        for i in 0..n {
            stage[i] = point[i] + half * step * self.k1[i];
        }
        rhs.derivatives(&self.stage, target, &mut self.k2)?;

        // k3 = f(t + dt/2, y + dt*k2/2)
        let stage = self.stage.state_mut();
        for i in 0..n {
            stage[i] = point[i] + half * step * self.k2[i];
        }
        rhs.derivatives(&self.stage, target, &mut self.k3)?;

        // k4 = f(t + dt, y + dt*k3)
        self.stage.set_time(t0 + step);
        let stage = self.stage.state_mut();
        for i in 0..n {
            stage[i] = point[i] + step * self.k3[i];
        }
        rhs.derivatives(&self.stage, target, &mut self.k4)?;

        // y_next = y + dt/6 * (k1 + 2k2 + 2k3 + k4)
        let weight = step / T::six();
        let state = next.state_mut();
        for i in 0..n {
            state[i] = point[i]
                + weight * (self.k1[i] + two * self.k2[i] + two * self.k3[i] + self.k4[i]);
        }
        Ok(())
    }
}

/// Two-variable leapfrog for a position (0) / velocity (1) pair.
///
/// Point 1 is a plain Euler step. Afterwards
///   x_{i+1} = x_i + dt*f0(p_i) + dt^2/2 * f1(p_i)
///   v_{i+1} = v_i + dt/2 * (f1(p_i) + f1(t_{i+1}, x_{i+1}, v_i))
/// where the second f1 sees the new position and the old velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Leapfrog;

impl Leapfrog {
    pub const DIMENSION: usize = 2;
}

impl<T: Scalar> StepRule<T> for Leapfrog {
    fn check(&self, dimension: usize) -> Result<(), SolveError> {
        if dimension != Self::DIMENSION {
            return Err(ConfigurationError::SolverDimension {
                solver: SolverKind::Leapfrog,
                required: Self::DIMENSION,
                actual: dimension,
            }
            .into());
        }
        Ok(())
    }

    fn advance(
        &mut self,
        rhs: &RhsRegistry<T>,
        history: &[TrajectoryPoint<T>],
        step: T,
        next: &mut TrajectoryPoint<T>,
    ) -> Result<(), SolveError> {
        let half = T::half();
        let target = history.len();
        let point = current(history);
        let (x, v) = (point[0], point[1]);

        let f0 = rhs.derivative(0, point, target)?;
        let f1 = rhs.derivative(1, point, target)?;

        if target == 1 {
            let state = next.state_mut();
            state[0] = x + step * f0;
            state[1] = v + step * f1;
            return Ok(());
        }

        // next still carries v_i in slot 1.
        next.state_mut()[0] = x + step * f0 + half * step * step * f1;
        let f1_next = rhs.derivative(1, next, target)?;
        next.state_mut()[1] = v + half * step * (f1 + f1_next);
        Ok(())
    }
}
