use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use traj_core::Integrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemName {
    Lorenz,
    Aizawa,
    Pendulum,
}

impl SystemName {
    pub const ALL: [SystemName; 3] = [
        SystemName::Lorenz,
        SystemName::Aizawa,
        SystemName::Pendulum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SystemName::Lorenz => "lorenz",
            SystemName::Aizawa => "aizawa",
            SystemName::Pendulum => "pendulum",
        }
    }
}

impl fmt::Display for SystemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SystemName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_ascii_lowercase();
        SystemName::ALL
            .iter()
            .copied()
            .find(|system| system.name() == lowered)
            .ok_or_else(|| {
                anyhow!("unknown system '{}'. Expected one of lorenz, aizawa, pendulum", s)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lorenz {
    pub sigma: f64,
    pub beta: f64,
    pub rho: f64,
    pub initial: [f64; 3],
}

impl Default for Lorenz {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            beta: 2.667,
            rho: 28.0,
            initial: [0.0, 1.0, 1.05],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aizawa {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub initial: [f64; 3],
}

impl Default for Aizawa {
    fn default() -> Self {
        Self {
            a: 0.95,
            b: 0.7,
            c: 0.6,
            d: 3.5,
            e: 0.25,
            f: 0.1,
            initial: [0.0, 1.0, 1.05],
        }
    }
}

/// Simple pendulum as (angle, angular velocity).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pendulum {
    pub g: f64,
    pub length: f64,
    /// Initial angle in degrees.
    pub angle: f64,
    pub velocity: f64,
}

impl Default for Pendulum {
    fn default() -> Self {
        Self {
            g: 9.81,
            length: 10.0,
            angle: 80.0,
            velocity: 0.0,
        }
    }
}

/// A sample system with its coefficients and initial conditions.
///
/// Read from JSON as `{"system": "lorenz", "sigma": 10.0, ...}`; missing
/// fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "lowercase")]
pub enum SystemConfig {
    Lorenz(Lorenz),
    Aizawa(Aizawa),
    Pendulum(Pendulum),
}

impl SystemConfig {
    pub fn preset(name: SystemName) -> Self {
        match name {
            SystemName::Lorenz => SystemConfig::Lorenz(Lorenz::default()),
            SystemName::Aizawa => SystemConfig::Aizawa(Aizawa::default()),
            SystemName::Pendulum => SystemConfig::Pendulum(Pendulum::default()),
        }
    }

    pub fn name(&self) -> SystemName {
        match self {
            SystemConfig::Lorenz(_) => SystemName::Lorenz,
            SystemConfig::Aizawa(_) => SystemName::Aizawa,
            SystemConfig::Pendulum(_) => SystemName::Pendulum,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file '{}'", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Invalid system configuration in '{}'", path.display()))
    }

    /// Registers the equations of motion on a fresh integrator.
    pub fn build(&self) -> Result<Integrator> {
        match *self {
            SystemConfig::Lorenz(params) => build_lorenz(params),
            SystemConfig::Aizawa(params) => build_aizawa(params),
            SystemConfig::Pendulum(params) => build_pendulum(params),
        }
    }
}

fn build_lorenz(params: Lorenz) -> Result<Integrator> {
    let Lorenz {
        sigma,
        beta,
        rho,
        initial,
    } = params;

    let mut integrator = Integrator::new(3, initial.to_vec())?;
    integrator.set_function(0, move |p| sigma * (p[1] - p[0]))?;
    integrator.set_function(1, move |p| p[0] * (rho - p[2]) - p[1])?;
    integrator.set_function(2, move |p| p[0] * p[1] - beta * p[2])?;
    Ok(integrator)
}

fn build_aizawa(params: Aizawa) -> Result<Integrator> {
    let Aizawa {
        a,
        b,
        c,
        d,
        e,
        f,
        initial,
    } = params;

    let mut integrator = Integrator::new(3, initial.to_vec())?;
    integrator.set_function(0, move |p| (p[2] - b) * p[0] - d * p[1])?;
    integrator.set_function(1, move |p| d * p[0] + (p[2] - b) * p[1])?;
    integrator.set_function(2, move |p| {
        let (x, y, z) = (p[0], p[1], p[2]);
        c + a * z - z.powi(3) / 3.0 - (x * x + y * y) * (1.0 + e * z) + f * z * x.powi(3)
    })?;
    Ok(integrator)
}

fn build_pendulum(params: Pendulum) -> Result<Integrator> {
    let Pendulum {
        g,
        length,
        angle,
        velocity,
    } = params;
    ensure!(
        length.is_finite() && length > 0.0,
        "Pendulum length must be positive, got {}",
        length
    );

    let mut integrator =
        Integrator::with_metadata(2, vec![length, g], vec![angle.to_radians(), velocity])?;
    integrator.set_function(0, |p| p[1])?;
    integrator.set_function(1, move |p| -(g / length) * p[0].sin())?;
    Ok(integrator)
}
