use nalgebra::Vector3;

use crate::components::{AeroSegment, ControlInputs, FlowAngles, Polar};

const MIN_AIRSPEED: f64 = 1e-6;
const MIN_DYNAMIC_PRESSURE: f64 = 1e-9;

/// Shared per-step inputs for segment force evaluation.
pub struct SegmentContext<'a> {
    pub system_polar: &'a Polar,
    pub controls: &'a ControlInputs,
    /// System CG, normalized body frame
    pub cg: Vector3<f64>,
    /// Scale from normalized positions to meters
    pub reference_length: f64,
    /// Air density [kg/m^3]
    pub density: f64,
}

/// Body-frame force and moment contribution of one segment, moment taken
/// about the system CG.
#[derive(Debug, Clone)]
pub struct SegmentForce {
    pub name: String,
    pub force: Vector3<f64>,
    pub moment: Vector3<f64>,
    /// Center-of-pressure position [m], body frame
    pub pressure_center: Vector3<f64>,
}

/// Summed force and moment of the whole assembly, body frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct AeroTotals {
    pub force: Vector3<f64>,
    pub moment: Vector3<f64>,
}

/// Result of one pass over the segment list: the threaded-forward
/// descriptors, the per-segment contributions, and their sum.
#[derive(Debug)]
pub struct SystemForces {
    pub segments: Vec<AeroSegment>,
    pub per_segment: Vec<SegmentForce>,
    pub totals: AeroTotals,
}

/// Analytic wind-frame basis in body axes for the given flow angles:
/// `(drag_dir, side_dir, lift_dir)`. Drag opposes the relative wind, lift
/// points "up" out of the wind plane, side completes the right-handed set.
pub fn wind_basis(alpha: f64, beta: f64) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
    let (sin_a, cos_a) = alpha.sin_cos();
    let (sin_b, cos_b) = beta.sin_cos();
    let wind = Vector3::new(cos_a * cos_b, sin_b, sin_a * cos_b);
    let side = Vector3::new(-cos_a * sin_b, cos_b, -sin_a * sin_b);
    let lift = Vector3::new(sin_a, 0.0, -cos_a);
    (-wind, side, lift)
}

fn flow_from_velocity(velocity: &Vector3<f64>) -> (f64, FlowAngles) {
    let airspeed = velocity.norm();
    if airspeed <= MIN_AIRSPEED {
        return (
            airspeed,
            FlowAngles {
                alpha: 0.0,
                beta: 0.0,
            },
        );
    }
    (
        airspeed,
        FlowAngles {
            alpha: velocity.z.atan2(velocity.x),
            beta: (velocity.y / airspeed).asin(),
        },
    )
}

/// Evaluate one segment against a local air-relative velocity.
fn evaluate_one(
    segment: &AeroSegment,
    velocity: &Vector3<f64>,
    ctx: &SegmentContext,
) -> (AeroSegment, SegmentForce) {
    let (airspeed, flow) = flow_from_velocity(velocity);
    let (updated, coeffs) = segment.evaluate(&flow, ctx.controls, ctx.system_polar);

    let q = 0.5 * ctx.density * airspeed * airspeed;
    if q <= MIN_DYNAMIC_PRESSURE {
        let zero = SegmentForce {
            name: updated.name.clone(),
            force: Vector3::zeros(),
            moment: Vector3::zeros(),
            pressure_center: updated.position * ctx.reference_length,
        };
        return (updated, zero);
    }

    let (drag_dir, side_dir, lift_dir) = wind_basis(flow.alpha, flow.beta);
    let qs = q * updated.area;
    let force = qs * (coeffs.cd * drag_dir + coeffs.cy * side_dir + coeffs.cl * lift_dir);

    // Intrinsic moments about the segment's own axes.
    let intrinsic = qs * updated.chord * Vector3::new(coeffs.cl_roll, coeffs.cm, coeffs.cn);

    // CP sits an along-chord offset aft of the aerodynamic center,
    // rotated by the segment's chord-pitch field. The same rotation is
    // used in both force paths.
    let (sin_p, cos_p) = updated.pitch.sin_cos();
    let aft = Vector3::new(-cos_p, 0.0, sin_p);
    let pressure_center = updated.position * ctx.reference_length
        + updated.chord * (coeffs.cp - 0.25) * aft;

    let lever = pressure_center - ctx.cg * ctx.reference_length;
    let moment = lever.cross(&force) + intrinsic;

    let out = SegmentForce {
        name: updated.name.clone(),
        force,
        moment,
        pressure_center,
    };
    (updated, out)
}

/// Sum per-segment contributions into system totals.
pub fn sum_system(per_segment: &[SegmentForce]) -> AeroTotals {
    let mut totals = AeroTotals::default();
    for contribution in per_segment {
        totals.force += contribution.force;
        totals.moment += contribution.moment;
    }
    totals
}

fn collect(
    segments: &[AeroSegment],
    ctx: &SegmentContext,
    mut velocity_at: impl FnMut(&AeroSegment) -> Vector3<f64>,
) -> SystemForces {
    let mut updated = Vec::with_capacity(segments.len());
    let mut per_segment = Vec::with_capacity(segments.len());
    for segment in segments {
        let velocity = velocity_at(segment);
        let (next, contribution) = evaluate_one(segment, &velocity, ctx);
        updated.push(next);
        per_segment.push(contribution);
    }
    let totals = sum_system(&per_segment);
    SystemForces {
        segments: updated,
        per_segment,
        totals,
    }
}

/// Static force pass: every segment sees the freestream flow.
pub fn static_forces(
    segments: &[AeroSegment],
    airspeed: f64,
    alpha: f64,
    beta: f64,
    ctx: &SegmentContext,
) -> SystemForces {
    let (sin_a, cos_a) = alpha.sin_cos();
    let (sin_b, cos_b) = beta.sin_cos();
    let velocity = airspeed * Vector3::new(cos_a * cos_b, sin_b, sin_a * cos_b);
    collect(segments, ctx, |_| velocity)
}

/// Rotation-corrected force pass: each segment sees the freestream plus
/// the velocity induced by the body rotation rate at its own position.
/// This is the sole source of roll/pitch/yaw rate damping; there are no
/// separate damping derivatives.
pub fn rotating_forces(
    segments: &[AeroSegment],
    velocity_body: &Vector3<f64>,
    omega: &Vector3<f64>,
    ctx: &SegmentContext,
) -> SystemForces {
    collect(segments, ctx, |segment| {
        let r = (segment.position - ctx.cg) * ctx.reference_length;
        velocity_body + omega.cross(&r)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::segment::{canopy_cell, canopy_cell_with_flap, parasitic_body};
    use crate::components::Side;
    use approx::assert_relative_eq;

    fn context<'a>(polar: &'a Polar, controls: &'a ControlInputs) -> SegmentContext<'a> {
        SegmentContext {
            system_polar: polar,
            controls,
            cg: Vector3::zeros(),
            reference_length: 2.0,
            density: 1.225,
        }
    }

    #[test]
    fn test_wind_basis_orthonormal() {
        for &(alpha, beta) in &[(0.0, 0.0), (0.2, 0.1), (-0.4, 0.3), (1.2, -0.8)] {
            let (drag, side, lift) = wind_basis(alpha, beta);
            assert_relative_eq!(drag.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(side.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(lift.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(drag.dot(&side), 0.0, epsilon = 1e-12);
            assert_relative_eq!(drag.dot(&lift), 0.0, epsilon = 1e-12);
            assert_relative_eq!(side.dot(&lift), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_wind_basis_at_zero_angles() {
        let (drag, side, lift) = wind_basis(0.0, 0.0);
        assert_relative_eq!((drag - Vector3::new(-1.0, 0.0, 0.0)).norm(), 0.0);
        assert_relative_eq!((side - Vector3::new(0.0, 1.0, 0.0)).norm(), 0.0);
        assert_relative_eq!((lift - Vector3::new(0.0, 0.0, -1.0)).norm(), 0.0);
    }

    #[test]
    fn test_zero_airspeed_zero_forces() {
        let polar = Polar::default();
        let controls = ControlInputs::default();
        let ctx = context(&polar, &controls);
        let cell =
            canopy_cell("c", Vector3::new(0.0, 0.0, -1.0), 3.0, 2.0, 0.0, Side::Center).unwrap();
        let result = static_forces(&[cell], 0.0, 0.0, 0.0, &ctx);
        assert_relative_eq!(result.totals.force.norm(), 0.0);
        assert_relative_eq!(result.totals.moment.norm(), 0.0);
    }

    #[test]
    fn test_static_matches_rotating_at_zero_omega() {
        let polar = Polar::default();
        let controls = ControlInputs {
            brake_left: 0.3,
            brake_right: 0.1,
            ..Default::default()
        };
        let ctx = context(&polar, &controls);
        let mut segments = Vec::new();
        for (i, y) in [-1.0, 0.0, 1.0].iter().enumerate() {
            let (cell, flap) = canopy_cell_with_flap(
                format!("c{}", i),
                Vector3::new(0.0, *y, -1.0),
                3.0,
                2.0,
                0.4 * y,
                if *y < 0.0 {
                    Side::Left
                } else if *y > 0.0 {
                    Side::Right
                } else {
                    Side::Center
                },
            )
            .unwrap();
            segments.push(cell);
            segments.push(flap);
        }
        segments.push(parasitic_body("lines", Vector3::new(0.0, 0.0, 1.0), 0.4, 1.1).unwrap());

        let airspeed = 12.0;
        let alpha: f64 = 0.12;
        let beta: f64 = 0.04;
        let (sin_a, cos_a) = alpha.sin_cos();
        let (sin_b, cos_b) = beta.sin_cos();
        let velocity = airspeed * Vector3::new(cos_a * cos_b, sin_b, sin_a * cos_b);

        let fixed = static_forces(&segments, airspeed, alpha, beta, &ctx);
        let rotating = rotating_forces(&segments, &velocity, &Vector3::zeros(), &ctx);

        assert_relative_eq!(
            (fixed.totals.force - rotating.totals.force).norm(),
            0.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            (fixed.totals.moment - rotating.totals.moment).norm(),
            0.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_roll_rate_damping() {
        // Outboard segments on both sides: a positive roll rate must
        // produce a strictly negative roll-moment increment.
        let polar = Polar::default();
        let controls = ControlInputs::default();
        let ctx = context(&polar, &controls);
        let segments = vec![
            canopy_cell("left", Vector3::new(0.0, -2.0, -1.0), 3.0, 2.0, -0.3, Side::Left)
                .unwrap(),
            canopy_cell("right", Vector3::new(0.0, 2.0, -1.0), 3.0, 2.0, 0.3, Side::Right)
                .unwrap(),
        ];
        let velocity = Vector3::new(15.0, 0.0, 1.5);

        let still = rotating_forces(&segments, &velocity, &Vector3::zeros(), &ctx);
        let rolling = rotating_forces(&segments, &velocity, &Vector3::new(0.8, 0.0, 0.0), &ctx);
        assert!(
            rolling.totals.moment.x < still.totals.moment.x,
            "positive roll rate must damp: {} >= {}",
            rolling.totals.moment.x,
            still.totals.moment.x
        );
    }

    #[test]
    fn test_drag_above_cg_pitches_nose_up() {
        let polar = Polar::default();
        let controls = ControlInputs::default();
        let ctx = context(&polar, &controls);
        let drag_body = parasitic_body("chute", Vector3::new(0.0, 0.0, -1.0), 1.0, 1.0).unwrap();
        let result = static_forces(&[drag_body], 10.0, 0.0, 0.0, &ctx);
        // Drag acts along -x at a point above the CG (z < 0, z is down):
        // the lever arm turns it into a positive (nose-up) pitch moment.
        assert!(result.totals.force.x < 0.0);
        assert!(result.totals.moment.y > 0.0);
    }

    #[test]
    fn test_cp_offset_shifts_moment() {
        let polar = Polar {
            cp_0: 0.25,
            cp_alpha: 0.0,
            ..Polar::default()
        };
        let polar_aft = Polar {
            cp_0: 0.45,
            cp_alpha: 0.0,
            ..Polar::default()
        };
        let controls = ControlInputs::default();
        let cell =
            canopy_cell("c", Vector3::new(0.0, 0.0, -1.0), 3.0, 2.0, 0.0, Side::Center).unwrap();

        let ctx_ac = context(&polar, &controls);
        let ctx_aft = context(&polar_aft, &controls);
        let at_ac = static_forces(std::slice::from_ref(&cell), 12.0, 0.1, 0.0, &ctx_ac);
        let aft = static_forces(std::slice::from_ref(&cell), 12.0, 0.1, 0.0, &ctx_aft);
        // Moving the CP aft moves the lift's lever arm, changing the pitch
        // moment while leaving the force untouched.
        assert_relative_eq!(
            (at_ac.totals.force - aft.totals.force).norm(),
            0.0,
            epsilon = 1e-9
        );
        assert!((at_ac.totals.moment.y - aft.totals.moment.y).abs() > 1e-6);
    }
}
