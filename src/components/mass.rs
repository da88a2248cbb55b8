use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One point mass of the vehicle.
///
/// Weight segments feed the gravity model, inertia segments feed the
/// inertia tensor; the two sets overlap but are distinct. Inertia segments
/// may carry buoyant mass (enclosed air) that contributes rotational
/// inertia without weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MassSegment {
    pub name: String,
    /// Fraction of the total system mass
    pub fraction: f64,
    /// Normalized body-frame position
    pub position: Vector3<f64>,
}

impl MassSegment {
    pub fn new(name: impl Into<String>, fraction: f64, position: Vector3<f64>) -> Self {
        Self {
            name: name.into(),
            fraction,
            position,
        }
    }
}

/// Validate a mass-segment list at assembly time.
pub fn validate_segments(segments: &[MassSegment]) -> Result<()> {
    if segments.is_empty() {
        return Err(ModelError::InvalidMass("no mass segments".to_string()));
    }
    for segment in segments {
        if !segment.fraction.is_finite() || segment.fraction <= 0.0 {
            return Err(ModelError::InvalidMass(format!(
                "segment '{}' has non-positive mass fraction {}",
                segment.name, segment.fraction
            )));
        }
        if !segment.position.iter().all(|v| v.is_finite()) {
            return Err(ModelError::InvalidMass(format!(
                "segment '{}' has non-finite position",
                segment.name
            )));
        }
    }
    Ok(())
}

/// Mass-weighted average position of a segment list, in normalized units.
/// Returns the origin for an empty or massless list.
pub fn center_of_mass(segments: &[MassSegment]) -> Vector3<f64> {
    let total: f64 = segments.iter().map(|s| s.fraction).sum();
    if total <= f64::EPSILON {
        return Vector3::zeros();
    }
    let weighted: Vector3<f64> = segments.iter().map(|s| s.fraction * s.position).sum();
    weighted / total
}

/// Point-mass inertia tensor about `about` (normalized units) via the
/// standard parallel-axis sums, in [kg m^2].
///
/// Positions are scaled by `reference_length` and fractions by
/// `total_mass` before summation. The full tensor is returned; the
/// rotational equations of motion keep the Ixz coupling and assume
/// Ixy = Iyz = 0 for laterally symmetric arrangements.
pub fn inertia_tensor(
    segments: &[MassSegment],
    total_mass: f64,
    reference_length: f64,
    about: &Vector3<f64>,
) -> Matrix3<f64> {
    let mut inertia = Matrix3::zeros();
    for segment in segments {
        let mass = segment.fraction * total_mass;
        let r = (segment.position - about) * reference_length;
        let r2 = r.norm_squared();
        inertia += mass * (r2 * Matrix3::identity() - r * r.transpose());
    }
    inertia
}
