use nalgebra::Vector3;

use crate::components::segment::{canopy_cell, lifting_body, parasitic_body, SegmentKind};
use crate::components::{AeroSegment, MassSegment, Polar, Side};
use crate::resources::VehicleModel;
use crate::systems::physics::apparent_mass::Planform;

/// Wingsuit pilot: a central lifting body flanked by arm wings and a leg
/// wing, plus parasitic head/gear drag. Positions are normalized by the
/// pilot height.
#[derive(Debug, Clone)]
pub struct Wingsuit {
    /// Clean body polar
    pub polar: Polar,
    /// Polar blended in by the dirty fraction
    pub dirty_polar: Polar,
    /// Total mass, pilot plus suit [kg]
    pub mass: f64,
    /// Pilot height, the position scale [m]
    pub height: f64,
    /// Air density [kg/m^3]
    pub density: f64,
    /// Body wing area [m^2]
    pub body_area: f64,
    /// Arm wing area, each side [m^2]
    pub arm_area: f64,
    /// Leg wing area [m^2]
    pub leg_area: f64,
}

impl Default for Wingsuit {
    fn default() -> Self {
        let polar = Polar {
            cl_alpha: 2.1,
            alpha_0: -0.12,
            cd_0: 0.09,
            k_induced: 0.12,
            stall_forward: 0.45,
            stall_backward: -0.35,
            cd_normal: 1.2,
            reference_area: 1.6,
            reference_chord: 1.1,
            reference_mass: 85.0,
            ..Polar::default()
        };
        let dirty_polar = Polar {
            cl_alpha: 1.5,
            cd_0: 0.22,
            ..polar.clone()
        };
        Self {
            polar,
            dirty_polar,
            mass: 85.0,
            height: 1.8,
            density: 1.225,
            body_area: 0.8,
            arm_area: 0.35,
            leg_area: 0.5,
        }
    }
}

impl VehicleModel for Wingsuit {
    fn polar(&self) -> Polar {
        self.polar.clone()
    }

    fn segments(&self, _deployment: f64, _pivot: f64) -> Vec<AeroSegment> {
        let mut segments = Vec::with_capacity(5);

        segments.push(
            lifting_body(
                "body",
                Vector3::zeros(),
                self.body_area,
                0.6,
                0.0,
                true,
                self.polar.clone(),
                Some(self.dirty_polar.clone()),
            )
            .expect("wingsuit body geometry is valid by construction"),
        );

        // Arm wings: slight dihedral, aileron-style riser routing, and
        // area collapse on unzip.
        for (name, y, side, arc) in [
            ("arm-left", -0.25, Side::Left, -0.15),
            ("arm-right", 0.25, Side::Right, 0.15),
        ] {
            let mut arm = canopy_cell(
                name,
                Vector3::new(0.05, y, 0.0),
                self.arm_area,
                0.5,
                arc,
                side,
            )
            .expect("arm wing geometry is valid by construction");
            if let SegmentKind::Cell {
                deployment_scaled,
                unzip_scaled,
                ..
            } = &mut arm.kind
            {
                *deployment_scaled = false;
                *unzip_scaled = true;
            }
            segments.push(arm);
        }

        let mut legs = canopy_cell(
            "leg-wing",
            Vector3::new(-0.35, 0.0, 0.0),
            self.leg_area,
            0.7,
            0.0,
            Side::Center,
        )
        .expect("leg wing geometry is valid by construction");
        if let SegmentKind::Cell {
            deployment_scaled, ..
        } = &mut legs.kind
        {
            *deployment_scaled = false;
        }
        segments.push(legs);

        segments.push(
            parasitic_body("head-gear", Vector3::new(0.3, 0.0, -0.05), 0.12, 0.9)
                .expect("head drag body is valid by construction"),
        );
        segments
    }

    fn weight_segments(&self, _pivot: f64) -> Vec<MassSegment> {
        vec![
            MassSegment::new("torso", 0.55, Vector3::new(0.05, 0.0, 0.0)),
            MassSegment::new("legs", 0.32, Vector3::new(-0.3, 0.0, 0.0)),
            MassSegment::new("head", 0.13, Vector3::new(0.3, 0.0, -0.03)),
        ]
    }

    fn inertia_segments(&self, pivot: f64) -> Vec<MassSegment> {
        self.weight_segments(pivot)
    }

    fn planform(&self, _deployment: f64) -> Planform {
        Planform {
            span: 1.7,
            chord: 0.9,
            thickness: 0.25,
            area: self.body_area + 2.0 * self.arm_area + self.leg_area,
        }
    }

    fn total_mass(&self) -> f64 {
        self.mass
    }

    fn reference_length(&self) -> f64 {
        self.height
    }

    fn air_density(&self) -> f64 {
        self.density
    }
}
