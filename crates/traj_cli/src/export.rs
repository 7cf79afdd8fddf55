use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use traj_core::{SolverKind, Status, Trajectory};

use crate::systems::SystemName;

/// Column-oriented JSON document for a (possibly truncated) trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryExport {
    pub system: SystemName,
    pub solver: SolverKind,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_valid: Option<usize>,
    pub step: f64,
    pub every: usize,
    pub time: Vec<f64>,
    pub columns: Vec<Vec<f64>>,
}

impl TrajectoryExport {
    /// Samples every `every`-th point of `trajectory`, always starting at the
    /// initial point.
    pub fn new(system: SystemName, trajectory: &Trajectory<f64>, every: usize) -> Self {
        let every = every.max(1);
        let (status, last_valid) = match trajectory.status() {
            Status::Complete => ("complete", None),
            Status::Truncated { last_valid } => ("truncated", Some(last_valid)),
        };

        let mut time = Vec::new();
        let mut columns = vec![Vec::new(); trajectory.dimension()];
        for point in trajectory.every(every) {
            time.push(point.time());
            for (column, value) in columns.iter_mut().zip(point.state().iter()) {
                column.push(*value);
            }
        }

        Self {
            system,
            solver: trajectory.solver(),
            status,
            last_valid,
            step: trajectory.step(),
            every,
            time,
            columns,
        }
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).context("Unable to serialize trajectory")
    }

    /// Writes to `output`, or to stdout when no path is given.
    pub fn write_to(&self, output: Option<&Path>) -> Result<()> {
        match output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Unable to create output file '{}'", path.display()))?;
                let mut writer = BufWriter::new(file);
                self.write_json(&mut writer)?;
                writer.flush()?;
            }
            None => {
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                self.write_json(&mut writer)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}
