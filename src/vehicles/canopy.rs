use nalgebra::Vector3;

use crate::components::segment::{canopy_cell_with_flap, parasitic_body};
use crate::components::{AeroSegment, MassSegment, Polar, Side};
use crate::resources::VehicleModel;
use crate::systems::physics::apparent_mass::Planform;
use crate::vehicles::pitch_rotated;

/// Ram-air canopy with a suspended pilot.
///
/// Cells are spread along an anhedral arc, each paired with a brake flap;
/// the pilot hangs a line length below the canopy and swings with the
/// pivot angle. Positions are normalized by the line length.
#[derive(Debug, Clone)]
pub struct CanopySystem {
    pub polar: Polar,
    /// Number of cells; odd so one sits at the arc center
    pub cell_count: usize,
    /// Canopy span [m]
    pub span: f64,
    /// Canopy chord [m]
    pub chord: f64,
    /// Inflated rib thickness [m]
    pub thickness: f64,
    /// Total canopy area [m^2]
    pub area: f64,
    /// Arc angle of the outermost cells [rad]
    pub arc: f64,
    /// Total system mass [kg]
    pub mass: f64,
    /// Line length, the position scale [m]
    pub line_length: f64,
    /// Air density [kg/m^3]
    pub density: f64,
    /// Pilot drag area [m^2]
    pub pilot_drag_area: f64,
    /// Line-bundle drag area [m^2]
    pub line_drag_area: f64,
}

impl Default for CanopySystem {
    /// A mid-size sport canopy under a 90 kg exit weight.
    fn default() -> Self {
        Self {
            polar: Polar::default(),
            cell_count: 7,
            span: 6.4,
            chord: 2.1,
            thickness: 0.45,
            area: 13.4,
            arc: 0.55,
            mass: 90.0,
            line_length: 3.2,
            density: 1.225,
            pilot_drag_area: 0.5,
            line_drag_area: 0.12,
        }
    }
}

impl CanopySystem {
    fn side_of(&self, offset: f64) -> Side {
        if offset < -1e-9 {
            Side::Left
        } else if offset > 1e-9 {
            Side::Right
        } else {
            Side::Center
        }
    }
}

impl VehicleModel for CanopySystem {
    fn polar(&self) -> Polar {
        self.polar.clone()
    }

    fn segments(&self, _deployment: f64, _pivot: f64) -> Vec<AeroSegment> {
        // Cell areas taper toward the tips with the cosine of the arc
        // position so the arc carries a realistic load distribution.
        let n = self.cell_count.max(1);
        let half_span = 0.5 * self.span / self.line_length;
        let mut weights = Vec::with_capacity(n);
        for i in 0..n {
            let t = if n == 1 {
                0.0
            } else {
                2.0 * i as f64 / (n - 1) as f64 - 1.0
            };
            weights.push((t, (t * self.arc).cos()));
        }
        let weight_sum: f64 = weights.iter().map(|(_, w)| w).sum();

        let mut segments = Vec::with_capacity(2 * n + 2);
        for (i, (t, w)) in weights.iter().enumerate() {
            let arc_angle = t * self.arc;
            let y = t * half_span * arc_angle.cos();
            // Tips ride lower on the arc than the center cell.
            let z = -1.0 + half_span * (1.0 - arc_angle.cos());
            let area = self.area * w / weight_sum;
            let (cell, flap) = canopy_cell_with_flap(
                format!("cell-{}", i),
                Vector3::new(0.0, y, z),
                area,
                self.chord,
                arc_angle,
                self.side_of(*t),
            )
            .expect("canopy cell geometry is valid by construction");
            segments.push(cell);
            segments.push(flap);
        }

        segments.push(
            parasitic_body(
                "pilot",
                Vector3::new(0.0, 0.0, 0.95),
                self.pilot_drag_area,
                1.0,
            )
            .expect("pilot drag body is valid by construction"),
        );
        segments.push(
            parasitic_body(
                "lines",
                Vector3::new(0.0, 0.0, 0.0),
                self.line_drag_area,
                1.1,
            )
            .expect("line drag body is valid by construction"),
        );
        segments
    }

    fn weight_segments(&self, pivot: f64) -> Vec<MassSegment> {
        let pilot = pitch_rotated(&Vector3::new(0.0, 0.0, 0.95), pivot);
        vec![
            MassSegment::new("pilot", 0.92, pilot),
            MassSegment::new("canopy", 0.08, Vector3::new(0.0, 0.0, -1.0)),
        ]
    }

    fn inertia_segments(&self, pivot: f64) -> Vec<MassSegment> {
        let mut segments = self.weight_segments(pivot);
        // Air entrapped in the cells: buoyant, no weight, but it swings
        // with the canopy and adds rotational inertia.
        let entrapped = self.density * self.area * self.thickness / self.mass;
        segments.push(MassSegment::new(
            "entrapped-air",
            entrapped,
            Vector3::new(0.0, 0.0, -1.0),
        ));
        segments
    }

    fn planform(&self, _deployment: f64) -> Planform {
        Planform {
            span: self.span,
            chord: self.chord,
            thickness: self.thickness,
            area: self.area,
        }
    }

    fn total_mass(&self) -> f64 {
        self.mass
    }

    fn reference_length(&self) -> f64 {
        self.line_length
    }

    fn air_density(&self) -> f64 {
        self.density
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::segment::SegmentKind;
    use approx::assert_relative_eq;

    #[test]
    fn test_cell_areas_sum_to_canopy_area() {
        let model = CanopySystem::default();
        let total: f64 = model
            .segments(1.0, 0.0)
            .iter()
            .filter(|s| matches!(s.kind, SegmentKind::Cell { .. }))
            .map(|s| s.area)
            .sum();
        assert_relative_eq!(total, model.area, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_is_laterally_symmetric() {
        let model = CanopySystem::default();
        let segments = model.segments(1.0, 0.0);
        let lateral_sum: f64 = segments
            .iter()
            .filter(|s| matches!(s.kind, SegmentKind::Cell { .. }))
            .map(|s| s.position.y * s.area)
            .sum();
        assert_relative_eq!(lateral_sum, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_every_cell_has_a_flap() {
        let model = CanopySystem::default();
        let segments = model.segments(1.0, 0.0);
        let cells = segments
            .iter()
            .filter(|s| matches!(s.kind, SegmentKind::Cell { .. }))
            .count();
        let flaps = segments
            .iter()
            .filter(|s| matches!(s.kind, SegmentKind::Flap { .. }))
            .count();
        assert_eq!(cells, model.cell_count);
        assert_eq!(flaps, model.cell_count);
    }

    #[test]
    fn test_pivot_swings_pilot_forward() {
        let model = CanopySystem::default();
        let hanging = model.weight_segments(0.0);
        let swung = model.weight_segments(0.3);
        assert_relative_eq!(hanging[0].position.x, 0.0, epsilon = 1e-12);
        assert!(swung[0].position.x > 0.0);
    }

    #[test]
    fn test_entrapped_air_in_inertia_only() {
        let model = CanopySystem::default();
        let weight_total: f64 = model.weight_segments(0.0).iter().map(|s| s.fraction).sum();
        let inertia_total: f64 = model.inertia_segments(0.0).iter().map(|s| s.fraction).sum();
        assert_relative_eq!(weight_total, 1.0, epsilon = 1e-12);
        assert!(inertia_total > weight_total);
    }
}
