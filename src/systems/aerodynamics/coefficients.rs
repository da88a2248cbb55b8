use crate::components::Polar;

/// Exponent clamp keeping the logistic transitions finite for any input.
const MAX_SIGMOID_EXPONENT: f64 = 60.0;

/// Dimensionless aerodynamic coefficients of one surface at one flow
/// condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct AeroCoefficients {
    /// Lift coefficient
    pub cl: f64,
    /// Drag coefficient
    pub cd: f64,
    /// Side-force coefficient
    pub cy: f64,
    /// Pitching-moment coefficient about the aerodynamic center
    pub cm: f64,
    /// Yaw-moment coefficient
    pub cn: f64,
    /// Roll-moment coefficient
    pub cl_roll: f64,
    /// Center-of-pressure chord fraction, 0 = leading edge
    pub cp: f64,
}

fn sigmoid(exponent: f64) -> f64 {
    1.0 / (1.0 + exponent.clamp(-MAX_SIGMOID_EXPONENT, MAX_SIGMOID_EXPONENT).exp())
}

/// Flow-separation blending function f(alpha) in [0, 1].
///
/// Product of two independent logistic transitions: one decaying 1 -> 0
/// above the forward stall angle, one decaying 1 -> 0 below the backward
/// stall angle. f = 1 is fully attached flow, f = 0 a separated flat plate.
pub fn separation(polar: &Polar, alpha: f64) -> f64 {
    let forward = sigmoid(polar.stall_sharpness_forward * (alpha - polar.stall_forward));
    let backward = sigmoid(-polar.stall_sharpness_backward * (alpha - polar.stall_backward));
    forward * backward
}

/// Attached-flow lift and drag: CL = CLa sin(a - a0), CD = CD0 + k CL^2.
pub fn attached(polar: &Polar, alpha: f64) -> (f64, f64) {
    let cl = polar.cl_alpha * (alpha - polar.alpha_0).sin();
    let cd = polar.cd_0 + polar.k_induced * cl * cl;
    (cl, cd)
}

/// Separated flat-plate lift and drag:
/// CL = CDn sin(a) cos(a), CD = CDn sin^2(a) + CD0 cos^2(a).
pub fn flat_plate(polar: &Polar, alpha: f64) -> (f64, f64) {
    let (sin_a, cos_a) = alpha.sin_cos();
    let cl = polar.cd_normal * sin_a * cos_a;
    let cd = polar.cd_normal * sin_a * sin_a + polar.cd_0 * cos_a * cos_a;
    (cl, cd)
}

/// Evaluate an already-morphed polar at one (alpha, beta). Finite for all
/// alpha, beta in [-90 deg, 90 deg].
pub fn evaluate_morphed(polar: &Polar, alpha: f64, beta: f64) -> AeroCoefficients {
    let f = separation(polar, alpha);

    let (cl_attached, cd_attached) = attached(polar, alpha);
    let (cl_plate, cd_plate) = flat_plate(polar, alpha);
    let cl = f * cl_attached + (1.0 - f) * cl_plate;
    let cd = f * cd_attached + (1.0 - f) * cd_plate;

    // Moment and center of pressure blend with the same separation
    // function; the separated plate carries no intrinsic moment and loads
    // at mid-chord. CP is clamped before blending.
    let cm_attached = polar.cm_0 + polar.cm_alpha * (alpha - polar.alpha_0);
    let cp_attached = (polar.cp_0 + polar.cp_alpha * (alpha - polar.alpha_0)).clamp(0.0, 1.0);
    let cm = f * cm_attached;
    let cp = f * cp_attached + (1.0 - f) * 0.5;

    // Sideslip: cos^2 on the alpha-derived terms plus a broadside lateral
    // drag term; side force and the lateral moments are independent
    // sin(b)cos(b) derivatives.
    let (sin_b, cos_b) = beta.sin_cos();
    let cos2_b = cos_b * cos_b;
    let sincos_b = sin_b * cos_b;

    AeroCoefficients {
        cl: cl * cos2_b,
        cd: cd * cos2_b + polar.cd_lateral * sin_b * sin_b,
        cy: polar.cy_beta * sincos_b,
        cm: cm * cos2_b,
        cn: polar.cn_beta * sincos_b,
        cl_roll: polar.cl_beta * sincos_b,
        cp,
    }
}

/// Pure entry point for the chart/rendering layer: all coefficients at one
/// (alpha, beta, delta, dirty) point. Sweeps are caller-driven.
pub fn evaluate(polar: &Polar, alpha: f64, beta: f64, delta: f64, dirty: f64) -> AeroCoefficients {
    let morphed = polar.morphed(delta, dirty);
    evaluate_morphed(&morphed, alpha, beta)
}
