mod driver;
pub mod error;
pub mod integrator;
pub mod registry;
pub mod settings;
pub mod solvers;
pub mod state;
/// The `traj_core` crate integrates initial value problems for systems of
/// first-order ODEs with fixed-step solvers and returns the whole trajectory.
/// It is generic over the scalar type (`f64` by default, `f32` also works).
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `StepRule` (per-step update of a solver).
/// - **Registry**: `RhsRegistry`, one owned derivative closure per state component.
/// - **Solvers**: explicit Euler, classic RK4 and a two-variable leapfrog.
/// - **Integrator**: owns the initial state and registry, runs a solver, keeps the trajectory.
/// - **State**: `TrajectoryPoint` and `Trajectory`, with column views for plotting code.
pub mod traits;

pub use error::{ConfigurationError, ParameterError, SolveError};
pub use integrator::Integrator;
pub use registry::{RhsFn, RhsRegistry};
pub use settings::StepSettings;
pub use solvers::{SolverKind, UnknownSolver};
pub use state::{StateVector, Status, Trajectory, TrajectoryPoint};
pub use traits::{Scalar, StepRule};
