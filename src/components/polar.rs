use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Named control channel applying a brake-type camber morph.
pub const CHANNEL_DELTA: &str = "delta";
/// Named control channel applying a dirty-flying morph.
pub const CHANNEL_DIRTY: &str = "dirty";

/// Aerodynamic profile of one surface or the whole vehicle.
///
/// A polar is immutable by convention: control inputs produce morphed
/// copies via [`Polar::with_offset`], never in-place edits. Angles are in
/// radians, derivatives per radian.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polar {
    /// Lift-curve slope [1/rad]
    pub cl_alpha: f64,
    /// Zero-lift angle of attack [rad]
    pub alpha_0: f64,
    /// Parasitic drag coefficient
    pub cd_0: f64,
    /// Induced drag factor k in CD = CD0 + k CL^2
    pub k_induced: f64,
    /// Forward stall angle [rad]
    pub stall_forward: f64,
    /// Backward (negative-alpha) stall angle [rad]
    pub stall_backward: f64,
    /// Logistic sharpness of the forward stall transition [1/rad]
    pub stall_sharpness_forward: f64,
    /// Logistic sharpness of the backward stall transition [1/rad]
    pub stall_sharpness_backward: f64,
    /// Broadside normal-force coefficient of the separated flat plate
    pub cd_normal: f64,
    /// Lateral drag coefficient at full sideslip
    pub cd_lateral: f64,
    /// Side-force derivative per sin(beta)cos(beta)
    pub cy_beta: f64,
    /// Yaw-moment derivative per sin(beta)cos(beta)
    pub cn_beta: f64,
    /// Roll-moment derivative per sin(beta)cos(beta)
    pub cl_beta: f64,
    /// Pitching-moment coefficient at zero-lift alpha
    pub cm_0: f64,
    /// Pitching-moment slope [1/rad]
    pub cm_alpha: f64,
    /// Center-of-pressure chord fraction at zero-lift alpha
    pub cp_0: f64,
    /// Center-of-pressure slope [1/rad]
    pub cp_alpha: f64,
    /// Reference area [m^2]
    pub reference_area: f64,
    /// Reference chord [m]
    pub reference_chord: f64,
    /// Reference system mass [kg]
    pub reference_mass: f64,
    /// Named per-unit control derivative bundles
    #[serde(default)]
    pub controls: HashMap<String, ControlDerivatives>,
}

/// Additive per-unit offsets applied to a [`Polar`] by one control channel.
///
/// Every field is a derivative: the morphed polar adds `input * field` to
/// the matching base value. Fields default to zero so descriptors only
/// spell out the derivatives a channel actually has.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlDerivatives {
    pub cl_alpha: f64,
    pub alpha_0: f64,
    pub cd_0: f64,
    pub k_induced: f64,
    pub cm_0: f64,
    pub cm_alpha: f64,
    pub cp_0: f64,
    pub stall_forward: f64,
    pub stall_backward: f64,
}

impl Polar {
    /// Check the construction-time shape of the polar. Malformed data is a
    /// programmer error and surfaces here, never during evaluation.
    pub fn validate(&self) -> Result<()> {
        if !self.reference_area.is_finite() || self.reference_area <= 0.0 {
            return Err(ModelError::InvalidPolar(format!(
                "reference area must be positive, got {}",
                self.reference_area
            )));
        }
        if !self.reference_chord.is_finite() || self.reference_chord <= 0.0 {
            return Err(ModelError::InvalidPolar(format!(
                "reference chord must be positive, got {}",
                self.reference_chord
            )));
        }
        if self.stall_forward <= self.stall_backward {
            return Err(ModelError::InvalidPolar(format!(
                "forward stall angle {} must exceed backward stall angle {}",
                self.stall_forward, self.stall_backward
            )));
        }
        if self.stall_sharpness_forward < 0.0 || self.stall_sharpness_backward < 0.0 {
            return Err(ModelError::InvalidPolar(
                "stall sharpness must be non-negative".to_string(),
            ));
        }
        if self.cd_normal < 0.0 || self.cd_0 < 0.0 {
            return Err(ModelError::InvalidPolar(
                "drag coefficients must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Morphed copy with `amount` units of one derivative bundle added.
    pub fn with_offset(&self, derivatives: &ControlDerivatives, amount: f64) -> Polar {
        let mut out = self.clone();
        out.cl_alpha += amount * derivatives.cl_alpha;
        out.alpha_0 += amount * derivatives.alpha_0;
        out.cd_0 += amount * derivatives.cd_0;
        out.k_induced += amount * derivatives.k_induced;
        out.cm_0 += amount * derivatives.cm_0;
        out.cm_alpha += amount * derivatives.cm_alpha;
        out.cp_0 += amount * derivatives.cp_0;
        out.stall_forward += amount * derivatives.stall_forward;
        out.stall_backward += amount * derivatives.stall_backward;
        out
    }

    /// Morphed copy for the standard brake (`delta`) and dirty-flying
    /// channels. Channels without a registered bundle are ignored.
    pub fn morphed(&self, delta: f64, dirty: f64) -> Polar {
        let mut out = self.clone();
        if delta != 0.0 {
            if let Some(derivs) = self.controls.get(CHANNEL_DELTA) {
                out = out.with_offset(derivs, delta);
            }
        }
        if dirty != 0.0 {
            if let Some(derivs) = self.controls.get(CHANNEL_DIRTY) {
                out = out.with_offset(derivs, dirty);
            }
        }
        out
    }

    /// Field-wise linear interpolation between two polars, `t` in [0, 1].
    /// Control bundles come from `self`.
    pub fn lerp(&self, other: &Polar, t: f64) -> Polar {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + t * (b - a);
        Polar {
            cl_alpha: mix(self.cl_alpha, other.cl_alpha),
            alpha_0: mix(self.alpha_0, other.alpha_0),
            cd_0: mix(self.cd_0, other.cd_0),
            k_induced: mix(self.k_induced, other.k_induced),
            stall_forward: mix(self.stall_forward, other.stall_forward),
            stall_backward: mix(self.stall_backward, other.stall_backward),
            stall_sharpness_forward: mix(
                self.stall_sharpness_forward,
                other.stall_sharpness_forward,
            ),
            stall_sharpness_backward: mix(
                self.stall_sharpness_backward,
                other.stall_sharpness_backward,
            ),
            cd_normal: mix(self.cd_normal, other.cd_normal),
            cd_lateral: mix(self.cd_lateral, other.cd_lateral),
            cy_beta: mix(self.cy_beta, other.cy_beta),
            cn_beta: mix(self.cn_beta, other.cn_beta),
            cl_beta: mix(self.cl_beta, other.cl_beta),
            cm_0: mix(self.cm_0, other.cm_0),
            cm_alpha: mix(self.cm_alpha, other.cm_alpha),
            cp_0: mix(self.cp_0, other.cp_0),
            cp_alpha: mix(self.cp_alpha, other.cp_alpha),
            reference_area: mix(self.reference_area, other.reference_area),
            reference_chord: mix(self.reference_chord, other.reference_chord),
            reference_mass: mix(self.reference_mass, other.reference_mass),
            controls: self.controls.clone(),
        }
    }
}

impl Default for Polar {
    /// A generic ram-air canopy profile, usable as a neutral starting point.
    fn default() -> Self {
        let mut controls = HashMap::new();
        controls.insert(
            CHANNEL_DELTA.to_string(),
            ControlDerivatives {
                cl_alpha: 0.25,
                alpha_0: -0.08,
                cd_0: 0.04,
                cm_0: -0.05,
                ..Default::default()
            },
        );
        controls.insert(
            CHANNEL_DIRTY.to_string(),
            ControlDerivatives {
                cd_0: 0.06,
                cl_alpha: -0.15,
                ..Default::default()
            },
        );
        Self {
            cl_alpha: 4.2,
            alpha_0: -0.05,
            cd_0: 0.06,
            k_induced: 0.07,
            stall_forward: 0.31,
            stall_backward: -0.22,
            stall_sharpness_forward: 28.0,
            stall_sharpness_backward: 22.0,
            cd_normal: 1.9,
            cd_lateral: 0.8,
            cy_beta: -0.9,
            cn_beta: 0.12,
            cl_beta: -0.08,
            cm_0: -0.06,
            cm_alpha: -0.35,
            cp_0: 0.28,
            cp_alpha: 0.18,
            reference_area: 23.0,
            reference_chord: 2.1,
            reference_mass: 90.0,
            controls,
        }
    }
}
