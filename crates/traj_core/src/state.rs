//! State vectors, trajectory points and trajectories.

use crate::solvers::SolverKind;
use crate::traits::Scalar;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, Index};

/// Dependent variables at one instant. Its length is fixed by the integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateVector<T>(Vec<T>);

impl<T> StateVector<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> From<Vec<T>> for StateVector<T> {
    fn from(values: Vec<T>) -> Self {
        Self(values)
    }
}

impl<T> Deref for StateVector<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

/// A time stamp paired with the state at that time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint<T> {
    time: T,
    state: StateVector<T>,
}

impl<T: Scalar> TrajectoryPoint<T> {
    pub fn new(time: T, state: impl Into<StateVector<T>>) -> Self {
        Self {
            time,
            state: state.into(),
        }
    }

    pub fn time(&self) -> T {
        self.time
    }

    pub fn state(&self) -> &StateVector<T> {
        &self.state
    }

    pub fn dimension(&self) -> usize {
        self.state.len()
    }

    pub(crate) fn set_time(&mut self, time: T) {
        self.time = time;
    }

    pub(crate) fn state_mut(&mut self) -> &mut [T] {
        self.state.as_mut_slice()
    }
}

/// Shorthand for `point.state()[index]`, the form most RHS closures want.
impl<T> Index<usize> for TrajectoryPoint<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.state.0[index]
    }
}

/// How the solve that produced a trajectory ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Status {
    /// All `floor(time / step)` points were computed.
    Complete,
    /// The solve diverged; only points `0..=last_valid` are present.
    Truncated { last_valid: usize },
}

/// Ordered sequence of points produced by one solver invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory<T> {
    solver: SolverKind,
    step: T,
    dimension: usize,
    status: Status,
    points: Vec<TrajectoryPoint<T>>,
}

impl<T: Scalar> Trajectory<T> {
    pub(crate) fn new(
        solver: SolverKind,
        step: T,
        dimension: usize,
        status: Status,
        points: Vec<TrajectoryPoint<T>>,
    ) -> Self {
        Self {
            solver,
            step,
            dimension,
            status,
            points,
        }
    }

    pub fn solver(&self) -> SolverKind {
        self.solver
    }

    pub fn step(&self) -> T {
        self.step
    }

    /// Number of components in every point's state.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[TrajectoryPoint<T>] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&TrajectoryPoint<T>> {
        self.points.get(index)
    }

    pub fn first(&self) -> Option<&TrajectoryPoint<T>> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint<T>> {
        self.points.last()
    }

    /// Time stamps in trajectory order.
    pub fn times(&self) -> impl ExactSizeIterator<Item = T> + '_ {
        self.points.iter().map(|p| p.time)
    }

    /// Values of one state component in trajectory order, or `None` when
    /// `dimension` is out of range.
    pub fn column(&self, dimension: usize) -> Option<impl ExactSizeIterator<Item = T> + '_> {
        if dimension >= self.dimension {
            return None;
        }
        Some(self.points.iter().map(move |p| p.state.0[dimension]))
    }

    pub fn times_vec(&self) -> Vec<T> {
        self.times().collect()
    }

    pub fn column_vec(&self, dimension: usize) -> Option<Vec<T>> {
        self.column(dimension).map(Iterator::collect)
    }

    /// Every `stride`-th point starting from the first. A stride of zero is
    /// treated as one.
    pub fn every(&self, stride: usize) -> impl Iterator<Item = &TrajectoryPoint<T>> + '_ {
        self.points.iter().step_by(stride.max(1))
    }

    pub fn into_points(self) -> Vec<TrajectoryPoint<T>> {
        self.points
    }
}

impl<T> Index<usize> for Trajectory<T> {
    type Output = TrajectoryPoint<T>;

    fn index(&self, index: usize) -> &TrajectoryPoint<T> {
        &self.points[index]
    }
}

impl<'a, T> IntoIterator for &'a Trajectory<T> {
    type Item = &'a TrajectoryPoint<T>;
    type IntoIter = std::slice::Iter<'a, TrajectoryPoint<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
