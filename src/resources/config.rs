//! Declarative vehicle descriptors loaded from YAML or JSON.
//!
//! A [`VehicleConfig`] carries everything [`CompositeFrame::build`] needs:
//! the system polar, the segment list, mass distribution, and the inflated
//! planform. It implements [`VehicleModel`] directly, so a file on disk is
//! interchangeable with the built-in vehicles.
//!
//! [`CompositeFrame::build`]: crate::resources::CompositeFrame::build

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::mass::validate_segments;
use crate::components::{AeroSegment, MassSegment, Polar};
use crate::error::{ModelError, Result};
use crate::resources::VehicleModel;
use crate::systems::physics::apparent_mass::Planform;

fn default_density() -> f64 {
    1.225
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub name: String,
    /// System polar used by segments without their own
    pub polar: Polar,
    /// Total system mass [kg]
    pub total_mass: f64,
    /// Scale from normalized positions to meters [m]
    pub reference_length: f64,
    /// Ambient air density [kg/m^3]
    #[serde(default = "default_density")]
    pub air_density: f64,
    /// Inflated planform for the apparent-mass model
    pub planform: Planform,
    pub segments: Vec<AeroSegment>,
    pub weight_segments: Vec<MassSegment>,
    /// Defaults to the weight distribution when omitted
    #[serde(default)]
    pub inertia_segments: Option<Vec<MassSegment>>,
}

impl VehicleConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.total_mass.is_finite() || self.total_mass <= 0.0 {
            return Err(ModelError::InvalidMass(format!(
                "total mass must be positive, got {}",
                self.total_mass
            )));
        }
        if !self.reference_length.is_finite() || self.reference_length <= 0.0 {
            return Err(ModelError::InvalidSegment(format!(
                "reference length must be positive, got {}",
                self.reference_length
            )));
        }
        for (name, value) in [
            ("span", self.planform.span),
            ("chord", self.planform.chord),
            ("thickness", self.planform.thickness),
            ("area", self.planform.area),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::InvalidSegment(format!(
                    "planform {} must be positive, got {}",
                    name, value
                )));
            }
        }
        self.polar.validate()?;
        for segment in &self.segments {
            if !segment.area.is_finite() || segment.area < 0.0 {
                return Err(ModelError::InvalidSegment(format!(
                    "segment '{}' has invalid area {}",
                    segment.name, segment.area
                )));
            }
            if let Some(polar) = &segment.polar {
                polar.validate()?;
            }
        }
        validate_segments(&self.weight_segments)?;
        if let Some(inertia) = &self.inertia_segments {
            validate_segments(inertia)?;
        }
        Ok(())
    }
}

impl VehicleModel for VehicleConfig {
    fn polar(&self) -> Polar {
        self.polar.clone()
    }

    fn segments(&self, _deployment: f64, _pivot: f64) -> Vec<AeroSegment> {
        self.segments.clone()
    }

    fn weight_segments(&self, _pivot: f64) -> Vec<MassSegment> {
        self.weight_segments.clone()
    }

    fn inertia_segments(&self, pivot: f64) -> Vec<MassSegment> {
        match &self.inertia_segments {
            Some(segments) => segments.clone(),
            None => self.weight_segments(pivot),
        }
    }

    fn planform(&self, _deployment: f64) -> Planform {
        self.planform
    }

    fn total_mass(&self) -> f64 {
        self.total_mass
    }

    fn reference_length(&self) -> f64 {
        self.reference_length
    }

    fn air_density(&self) -> f64 {
        self.air_density
    }
}
