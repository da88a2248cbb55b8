use log::{debug, warn};
use nalgebra::{Matrix3, Vector3};

use crate::components::{mass, AeroSegment, ControlInputs, MassSegment, Polar};
use crate::systems::aerodynamics::forces::SegmentContext;
use crate::systems::physics::apparent_mass::{
    apparent_inertia, apparent_mass, effective_inertia, effective_mass, AxisTriple, Planform,
};

/// Standard gravity used throughout the simulation [m/s^2].
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Default tolerance on deployment/pivot drift before a composite frame is
/// considered stale.
pub const DEFAULT_REBUILD_TOLERANCE: f64 = 1e-3;

/// Configuration recipe for one vehicle: everything the composite frame
/// needs to assemble segments and mass data for a given deployment and
/// pivot angle.
///
/// Base polars are defined first, assembly happens inside the trait
/// methods; there is no evaluation-order dependency between the two
/// phases.
pub trait VehicleModel {
    /// System polar used by segments without their own.
    fn polar(&self) -> Polar;

    /// Aerodynamic segments for the given deployment fraction and pivot
    /// angle.
    fn segments(&self, deployment: f64, pivot: f64) -> Vec<AeroSegment>;

    /// Mass segments carrying weight.
    fn weight_segments(&self, pivot: f64) -> Vec<MassSegment>;

    /// Mass segments contributing rotational inertia; may include buoyant
    /// mass that carries no weight.
    fn inertia_segments(&self, pivot: f64) -> Vec<MassSegment>;

    /// Inflated planform driving the apparent-mass model.
    fn planform(&self, deployment: f64) -> Planform;

    /// Total system mass [kg].
    fn total_mass(&self) -> f64;

    /// Scale from normalized positions to meters.
    fn reference_length(&self) -> f64;

    /// Ambient air density [kg/m^3].
    fn air_density(&self) -> f64 {
        1.225
    }
}

/// Cached per-configuration snapshot of the assembled vehicle.
///
/// Rebuilt only when deployment or pivot drift past a tolerance; reused
/// verbatim across integration steps otherwise. Rebuilding at integration
/// rate would dominate the step cost.
#[derive(Debug, Clone)]
pub struct CompositeFrame {
    pub deployment: f64,
    pub pivot: f64,
    pub segments: Vec<AeroSegment>,
    pub weight_segments: Vec<MassSegment>,
    pub inertia_segments: Vec<MassSegment>,
    /// System CG, normalized body frame
    pub cg: Vector3<f64>,
    /// Physical inertia tensor about the CG [kg m^2]
    pub inertia: Matrix3<f64>,
    pub planform: Planform,
    pub apparent_mass: AxisTriple,
    pub apparent_inertia: AxisTriple,
    /// Physical + apparent, per axis [kg]
    pub effective_mass: AxisTriple,
    /// Physical tensor with apparent inertia on the diagonal [kg m^2]
    pub effective_inertia: Matrix3<f64>,
    pub polar: Polar,
    pub mass: f64,
    pub reference_length: f64,
    pub density: f64,
}

impl CompositeFrame {
    /// Assemble the snapshot for the given live parameters.
    pub fn build(model: &dyn VehicleModel, deployment: f64, pivot: f64) -> Self {
        debug!(
            "rebuilding composite frame: deployment={:.3} pivot={:.3}",
            deployment, pivot
        );
        if !(0.0..=1.0).contains(&deployment) {
            warn!(
                "deployment {} outside [0, 1]; downstream scaling will clamp it",
                deployment
            );
        }
        let segments = model.segments(deployment, pivot);
        let weight_segments = model.weight_segments(pivot);
        let inertia_segments = model.inertia_segments(pivot);
        let mass = model.total_mass();
        let reference_length = model.reference_length();
        let density = model.air_density();

        let cg = mass::center_of_mass(&weight_segments);
        let inertia = mass::inertia_tensor(&inertia_segments, mass, reference_length, &cg);

        let planform = model.planform(deployment);
        let added_mass = apparent_mass(&planform, density, deployment);
        let added_inertia = apparent_inertia(&planform, density, deployment);

        Self {
            deployment,
            pivot,
            segments,
            weight_segments,
            inertia_segments,
            cg,
            inertia,
            planform,
            apparent_mass: added_mass,
            apparent_inertia: added_inertia,
            effective_mass: effective_mass(mass, &added_mass),
            effective_inertia: effective_inertia(&inertia, &added_inertia),
            polar: model.polar(),
            mass,
            reference_length,
            density,
        }
    }

    /// Explicit staleness predicate: true when the live parameters have
    /// drifted beyond the tolerance since this frame was built.
    pub fn is_stale(&self, deployment: f64, pivot: f64, tolerance: f64) -> bool {
        (deployment - self.deployment).abs() > tolerance || (pivot - self.pivot).abs() > tolerance
    }

    /// Flatten the snapshot plus live controls into the per-step
    /// configuration. `use_effective` selects effective (physical +
    /// apparent) mass and inertia for the equations of motion.
    pub fn step_config(&self, controls: ControlInputs, use_effective: bool) -> StepConfig {
        StepConfig {
            segments: self.segments.clone(),
            controls,
            polar: self.polar.clone(),
            cg: self.cg,
            inertia: if use_effective {
                self.effective_inertia
            } else {
                self.inertia
            },
            mass: self.mass,
            axis_mass: use_effective.then_some(self.effective_mass),
            reference_length: self.reference_length,
            density: self.density,
            gravity: STANDARD_GRAVITY,
        }
    }
}

/// Flat bundle consumed by one derivative evaluation. Constructed from a
/// [`CompositeFrame`] (or reused across steps) and never mutated mid-step.
#[derive(Debug, Clone)]
pub struct StepConfig {
    pub segments: Vec<AeroSegment>,
    pub controls: ControlInputs,
    pub polar: Polar,
    /// System CG, normalized body frame
    pub cg: Vector3<f64>,
    /// Inertia tensor used by the rotational equations [kg m^2]
    pub inertia: Matrix3<f64>,
    /// Physical mass [kg]; gravity always acts on this
    pub mass: f64,
    /// Per-axis effective mass; `Some` selects the anisotropic
    /// translational equations
    pub axis_mass: Option<AxisTriple>,
    pub reference_length: f64,
    pub density: f64,
    pub gravity: f64,
}

impl StepConfig {
    pub fn segment_context(&self) -> SegmentContext<'_> {
        SegmentContext {
            system_polar: &self.polar,
            controls: &self.controls,
            cg: self.cg,
            reference_length: self.reference_length,
            density: self.density,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicles::CanopySystem;
    use approx::assert_relative_eq;

    #[test]
    fn test_build_and_staleness() {
        let model = CanopySystem::default();
        let frame = CompositeFrame::build(&model, 1.0, 0.0);

        assert!(!frame.is_stale(1.0, 0.0, DEFAULT_REBUILD_TOLERANCE));
        assert!(!frame.is_stale(1.0 + 1e-4, 0.0, DEFAULT_REBUILD_TOLERANCE));
        assert!(frame.is_stale(0.5, 0.0, DEFAULT_REBUILD_TOLERANCE));
        assert!(frame.is_stale(1.0, 0.1, DEFAULT_REBUILD_TOLERANCE));
    }

    #[test]
    fn test_effective_exceeds_physical() {
        let model = CanopySystem::default();
        let frame = CompositeFrame::build(&model, 1.0, 0.0);
        assert!(frame.effective_mass.z > frame.mass);
        assert!(frame.effective_inertia[(0, 0)] > frame.inertia[(0, 0)]);
    }

    #[test]
    fn test_packed_canopy_smaller_apparent_mass() {
        let model = CanopySystem::default();
        let open = CompositeFrame::build(&model, 1.0, 0.0);
        let packed = CompositeFrame::build(&model, 0.0, 0.0);
        assert!(packed.apparent_mass.z < open.apparent_mass.z);
    }

    #[test]
    fn test_step_config_mass_toggle() {
        let model = CanopySystem::default();
        let frame = CompositeFrame::build(&model, 1.0, 0.0);

        let physical = frame.step_config(ControlInputs::default(), false);
        assert!(physical.axis_mass.is_none());
        assert_relative_eq!(physical.inertia[(0, 0)], frame.inertia[(0, 0)]);

        let effective = frame.step_config(ControlInputs::default(), true);
        let axis_mass = effective.axis_mass.unwrap();
        assert_relative_eq!(axis_mass.z, frame.mass + frame.apparent_mass.z);
        assert_relative_eq!(
            effective.inertia[(0, 0)],
            frame.inertia[(0, 0)] + frame.apparent_inertia.x
        );
    }
}
