use std::f64::consts::PI;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Deployment fraction below which the displaced-air geometry stops
/// shrinking; a packed canopy still has a small inflated volume.
const MIN_DEPLOYMENT_SCALE: f64 = 0.05;

/// Inflated planform geometry used by the apparent-mass model [m].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Planform {
    pub span: f64,
    pub chord: f64,
    pub thickness: f64,
    pub area: f64,
}

/// One scalar per body axis; used for per-axis mass and inertia.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTriple {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AxisTriple {
    pub fn zeros() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub fn splat(value: f64) -> Self {
        Self {
            x: value,
            y: value,
            z: value,
        }
    }
}

/// Non-linear span scale of the inflating canopy, clamped to the packed
/// floor. Volume grows linearly with deployment; span takes the larger
/// share of that growth.
pub fn span_scale(deployment: f64) -> f64 {
    deployment.clamp(MIN_DEPLOYMENT_SCALE, 1.0).powf(2.0 / 3.0)
}

/// Non-linear chord/thickness scale of the inflating canopy.
pub fn chord_scale(deployment: f64) -> f64 {
    deployment.clamp(MIN_DEPLOYMENT_SCALE, 1.0).powf(1.0 / 3.0)
}

/// Apparent (added) mass per body axis from classical potential-flow disc
/// approximations for a thin planform, scaled by air density and
/// deployment state [kg].
///
/// The dominant term is the normal (z) direction: a disc of fluid with the
/// planform's chord as diameter, run along the span. Fore-aft and lateral
/// terms use the much smaller thickness-based discs.
pub fn apparent_mass(planform: &Planform, density: f64, deployment: f64) -> AxisTriple {
    let b = planform.span * span_scale(deployment);
    let c = planform.chord * chord_scale(deployment);
    let t = planform.thickness * chord_scale(deployment);

    AxisTriple {
        x: 0.25 * PI * density * t * t * b,
        y: 0.25 * PI * density * t * t * c,
        z: 0.25 * PI * density * c * c * b,
    }
}

/// Rotational apparent inertia per body axis via strip theory: the second
/// moment of the per-axis added-mass distribution [kg m^2].
pub fn apparent_inertia(planform: &Planform, density: f64, deployment: f64) -> AxisTriple {
    let b = planform.span * span_scale(deployment);
    let c = planform.chord * chord_scale(deployment);
    let t = planform.thickness * chord_scale(deployment);

    // Roll: spanwise strips of the normal-direction disc mass, second
    // moment over the span. Pitch: chordwise second moment of the same
    // distribution. Yaw: spanwise strips of the lateral disc mass.
    AxisTriple {
        x: 0.25 * PI * density * c * c * b.powi(3) / 12.0,
        y: PI * density * c.powi(4) * b / 48.0,
        z: 0.25 * PI * density * t * t * b.powi(3) / 12.0,
    }
}

/// Effective translational mass: physical plus apparent, per axis.
/// Cross-terms are assumed zero for laterally symmetric bodies.
pub fn effective_mass(physical: f64, apparent: &AxisTriple) -> AxisTriple {
    AxisTriple {
        x: physical + apparent.x,
        y: physical + apparent.y,
        z: physical + apparent.z,
    }
}

/// Effective inertia tensor: physical tensor with the apparent inertia
/// added on the diagonal only.
pub fn effective_inertia(physical: &Matrix3<f64>, apparent: &AxisTriple) -> Matrix3<f64> {
    let mut out = *physical;
    out[(0, 0)] += apparent.x;
    out[(1, 1)] += apparent.y;
    out[(2, 2)] += apparent.z;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn canopy_planform() -> Planform {
        Planform {
            span: 6.4,
            chord: 2.1,
            thickness: 0.45,
            area: 13.4,
        }
    }

    #[test]
    fn test_effective_mass_exact_addition() {
        let apparent = AxisTriple {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let effective = effective_mass(80.0, &apparent);
        assert_eq!(
            effective,
            AxisTriple {
                x: 81.0,
                y: 82.0,
                z: 83.0
            }
        );
    }

    #[test]
    fn test_normal_axis_dominates() {
        let planform = canopy_planform();
        let mass = apparent_mass(&planform, 1.225, 1.0);
        assert!(mass.z > mass.x);
        assert!(mass.z > mass.y);
        assert!(mass.x > 0.0 && mass.y > 0.0);
    }

    #[test]
    fn test_scales_linearly_with_density() {
        let planform = canopy_planform();
        let sea_level = apparent_mass(&planform, 1.225, 1.0);
        let thin_air = apparent_mass(&planform, 0.6125, 1.0);
        assert_relative_eq!(thin_air.z, 0.5 * sea_level.z, epsilon = 1e-12);
    }

    #[test]
    fn test_packed_canopy_displaces_little_air() {
        let planform = canopy_planform();
        let open = apparent_mass(&planform, 1.225, 1.0);
        let packed = apparent_mass(&planform, 1.225, 0.0);
        assert!(packed.z < 0.05 * open.z);
        assert!(packed.z > 0.0, "floored scale keeps a finite volume");
    }

    #[test]
    fn test_deployment_scale_clamped_and_monotonic() {
        assert_relative_eq!(span_scale(-0.5), span_scale(0.0));
        assert_relative_eq!(span_scale(1.5), 1.0);
        let mut previous = 0.0;
        for i in 0..=10 {
            let s = span_scale(i as f64 / 10.0);
            assert!(s >= previous);
            previous = s;
        }
    }

    #[test]
    fn test_apparent_inertia_roll_exceeds_yaw() {
        // The normal-direction disc mass is much larger than the lateral
        // one, so roll inertia dominates yaw for a thin planform.
        let inertia = apparent_inertia(&canopy_planform(), 1.225, 1.0);
        assert!(inertia.x > inertia.z);
    }

    #[test]
    fn test_effective_inertia_keeps_cross_terms() {
        let mut physical = Matrix3::from_diagonal(&nalgebra::Vector3::new(50.0, 60.0, 70.0));
        physical[(0, 2)] = -4.0;
        physical[(2, 0)] = -4.0;
        let apparent = AxisTriple {
            x: 5.0,
            y: 6.0,
            z: 7.0,
        };
        let effective = effective_inertia(&physical, &apparent);
        assert_relative_eq!(effective[(0, 0)], 55.0);
        assert_relative_eq!(effective[(1, 1)], 66.0);
        assert_relative_eq!(effective[(2, 2)], 77.0);
        assert_relative_eq!(effective[(0, 2)], -4.0);
    }
}
