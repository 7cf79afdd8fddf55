use crate::driver;
use crate::error::{ConfigurationError, SolveError};
use crate::registry::RhsRegistry;
use crate::settings::StepSettings;
use crate::solvers::SolverKind;
use crate::state::{StateVector, Status, Trajectory, TrajectoryPoint};
use crate::traits::Scalar;
use log::{debug, warn};

/// Initial value problem: initial state, one RHS per component, and the
/// trajectory from the most recent solve.
#[derive(Debug)]
pub struct Integrator<T: Scalar = f64> {
    initial: StateVector<T>,
    metadata: Vec<T>,
    registry: RhsRegistry<T>,
    trajectory: Option<Trajectory<T>>,
}

impl<T: Scalar> Integrator<T> {
    pub fn new(dimension: usize, initial: Vec<T>) -> Result<Self, SolveError> {
        Self::with_metadata(dimension, Vec::new(), initial)
    }

    /// Like [`Integrator::new`], additionally storing `metadata` for the
    /// caller. Solvers never read it.
    pub fn with_metadata(
        dimension: usize,
        metadata: Vec<T>,
        initial: Vec<T>,
    ) -> Result<Self, SolveError> {
        if dimension == 0 {
            return Err(ConfigurationError::ZeroDimension.into());
        }
        if initial.len() != dimension {
            return Err(ConfigurationError::DimensionMismatch {
                expected: dimension,
                actual: initial.len(),
            }
            .into());
        }
        if let Some(index) = initial.iter().position(|v| !v.is_finite()) {
            return Err(ConfigurationError::NonFiniteInitialState { index }.into());
        }

        Ok(Self {
            initial: StateVector::new(initial),
            metadata,
            registry: RhsRegistry::new(dimension),
            trajectory: None,
        })
    }

    pub fn dimension(&self) -> usize {
        self.initial.len()
    }

    pub fn initial_state(&self) -> &StateVector<T> {
        &self.initial
    }

    pub fn metadata(&self) -> &[T] {
        &self.metadata
    }

    pub fn registry(&self) -> &RhsRegistry<T> {
        &self.registry
    }

    /// Registers d(state[index])/dt.
    pub fn set_function<F>(&mut self, index: usize, f: F) -> Result<(), SolveError>
    where
        F: Fn(&TrajectoryPoint<T>) -> T + 'static,
    {
        self.registry.set(index, f)
    }

    pub fn euler_solve(&mut self, time: T, step: T) -> Result<&Trajectory<T>, SolveError> {
        self.solve(SolverKind::Euler, StepSettings::new(time, step))
    }

    pub fn rk4_solve(&mut self, time: T, step: T) -> Result<&Trajectory<T>, SolveError> {
        self.solve(SolverKind::Rk4, StepSettings::new(time, step))
    }

    /// Requires a two-component system (position, velocity).
    pub fn leapfrog_solve(&mut self, time: T, step: T) -> Result<&Trajectory<T>, SolveError> {
        self.solve(SolverKind::Leapfrog, StepSettings::new(time, step))
    }

    /// Runs `solver` over `settings`, replacing any previous trajectory.
    ///
    /// On [`SolveError::NumericDivergence`] the points computed before the
    /// failure stay available from [`Integrator::trajectory`], tagged
    /// [`Status::Truncated`].
    pub fn solve(
        &mut self,
        solver: SolverKind,
        settings: StepSettings<T>,
    ) -> Result<&Trajectory<T>, SolveError> {
        self.trajectory = None;

        let dim = self.dimension();
        let mut rule = solver.build::<T>(dim);
        let mut points = Vec::new();
        debug!("{} solve requested: time {:?}, step {:?}", solver, settings.time, settings.step);

        let status = match driver::integrate(
            &mut rule,
            &self.registry,
            &self.initial,
            &settings,
            &mut points,
        ) {
            Ok(()) => Status::Complete,
            Err(SolveError::NumericDivergence {
                index,
                dimension,
                last_valid,
            }) => {
                warn!(
                    "{} solve diverged computing point {} (dimension {}); keeping {} points",
                    solver,
                    index,
                    dimension,
                    points.len()
                );
                self.trajectory = Some(Trajectory::new(
                    solver,
                    settings.step,
                    dim,
                    Status::Truncated { last_valid },
                    points,
                ));
                return Err(SolveError::NumericDivergence {
                    index,
                    dimension,
                    last_valid,
                });
            }
            Err(err) => return Err(err),
        };

        let trajectory = Trajectory::new(solver, settings.step, dim, status, points);
        Ok(&*self.trajectory.insert(trajectory))
    }

    /// Trajectory from the last solve that got past validation, complete or
    /// truncated.
    pub fn trajectory(&self) -> Option<&Trajectory<T>> {
        self.trajectory.as_ref()
    }

    pub fn take_trajectory(&mut self) -> Option<Trajectory<T>> {
        self.trajectory.take()
    }
}
