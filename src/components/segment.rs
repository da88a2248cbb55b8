use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::components::{ControlInputs, Polar, Side};
use crate::error::{ModelError, Result};
use crate::systems::aerodynamics::coefficients::{self, AeroCoefficients};

/// Default riser alpha offset per unit riser input [rad]
pub const DEFAULT_RISER_GAIN: f64 = 0.2;
/// Default brake camber morph per unit brake input
pub const DEFAULT_BRAKE_GAIN: f64 = 0.6;
/// Default flap growth per unit brake input
pub const DEFAULT_FLAP_SENSITIVITY: f64 = 1.2;
/// Default share of a cell's area ceded to its flap at full brake
pub const DEFAULT_FLAP_AREA_FRACTION: f64 = 0.25;
/// Default flap deflection angle at full brake [rad]
pub const DEFAULT_FLAP_DEFLECTION: f64 = 0.5;
/// Default flap fabric droop at full brake [rad]
pub const DEFAULT_FLAP_DROOP: f64 = 0.7;
/// Minimum-area floor on the deployment fraction
pub const DEFAULT_DEPLOYMENT_FLOOR: f64 = 0.05;

/// Freestream flow angles seen by a segment.
#[derive(Debug, Clone, Copy)]
pub struct FlowAngles {
    pub alpha: f64,
    pub beta: f64,
}

/// Construction-time geometry of a segment, kept so deployment rescaling
/// always starts from the as-built values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentGeometry {
    /// Normalized body-frame position
    pub position: Vector3<f64>,
    /// Reference area [m^2]
    pub area: f64,
    /// Reference chord [m]
    pub chord: f64,
}

/// Per-kind behavior of an aerodynamic segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Canopy cell: local arc-angle frame, riser alpha offset, side-routed
    /// brake camber, optional deployment rescaling with a minimum-area
    /// floor.
    Cell {
        side: Side,
        riser_gain: f64,
        brake_gain: f64,
        deployment_scaled: bool,
        deployment_floor: f64,
        /// Area share handed to the paired flap as it deploys
        flap_area_fraction: f64,
        /// Must match the paired flap's sensitivity for area conservation
        flap_response: f64,
        unzip_scaled: bool,
        base: SegmentGeometry,
    },
    /// Deflectable brake flap: grows from zero with brake input, migrates
    /// from trailing edge toward quarter-chord, droops, and deflects.
    Flap {
        side: Side,
        sensitivity: f64,
        max_deflection: f64,
        max_droop: f64,
        deployment_floor: f64,
        /// As-built area of the parent cell [m^2]
        cell_area: f64,
        /// Share of the parent cell's area at full extension
        area_fraction: f64,
        /// Chord at full extension [m]
        full_chord: f64,
        trailing_position: Vector3<f64>,
        forward_position: Vector3<f64>,
    },
    /// Lifting body with a (possibly pivoting) pitch offset and an optional
    /// second polar blended in by the dirty fraction.
    LiftingBody {
        pitch_offset: f64,
        pivots: bool,
        blend: Option<Box<Polar>>,
    },
    /// Constant-coefficient parasitic body; ignores all control input.
    Parasitic { cd: f64, cy: f64 },
}

/// One force-producing surface or body.
///
/// `position`, `area`, `chord`, `pitch` and `roll` are the live per-frame
/// values; evaluation returns an updated descriptor instead of mutating in
/// place, and callers must thread the update forward to see deployment and
/// brake deformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AeroSegment {
    pub name: String,
    /// Normalized body-frame position
    pub position: Vector3<f64>,
    /// Reference area [m^2]
    pub area: f64,
    /// Reference chord [m]
    pub chord: f64,
    /// Chord-pitch rotation, used for the along-chord CP offset [rad]
    pub pitch: f64,
    /// Local roll orientation of the lift plane [rad]
    pub roll: f64,
    /// Segment-owned polar; falls back to the system polar when absent
    pub polar: Option<Polar>,
    pub kind: SegmentKind,
}

impl AeroSegment {
    /// Evaluate the segment at the given freestream angles and controls.
    ///
    /// Pure with respect to `self`: the deformed geometry comes back in the
    /// returned descriptor.
    pub fn evaluate(
        &self,
        flow: &FlowAngles,
        controls: &ControlInputs,
        system_polar: &Polar,
    ) -> (AeroSegment, AeroCoefficients) {
        match &self.kind {
            SegmentKind::Cell {
                side,
                riser_gain,
                brake_gain,
                deployment_scaled,
                deployment_floor,
                flap_area_fraction,
                flap_response,
                unzip_scaled,
                base,
            } => {
                // Rotate the freestream angles into the cell's arc frame.
                let (sin_g, cos_g) = self.roll.sin_cos();
                let alpha_local =
                    flow.alpha * cos_g + flow.beta * sin_g + controls.riser(*side) * riser_gain;
                let beta_local = flow.beta * cos_g - flow.alpha * sin_g;

                let brake = controls.brake(*side).clamp(0.0, 1.0);
                let polar = self.polar.as_ref().unwrap_or(system_polar);
                let coeffs = coefficients::evaluate(
                    polar,
                    alpha_local,
                    beta_local,
                    brake * brake_gain,
                    controls.dirty,
                );

                let mut updated = self.clone();
                if *deployment_scaled {
                    let scale = controls.deployment.clamp(*deployment_floor, 1.0);
                    updated.area = base.area * scale;
                    updated.chord = base.chord * scale;
                    updated.position = base.position * scale;
                } else {
                    updated.area = base.area;
                    updated.chord = base.chord;
                    updated.position = base.position;
                }
                // Cede area to the paired flap as the brake deploys it.
                let extent = (brake * flap_response).clamp(0.0, 1.0);
                updated.area *= 1.0 - flap_area_fraction * extent;
                if *unzip_scaled {
                    updated.area *= (1.0 - controls.unzip).clamp(0.0, 1.0);
                }
                (updated, coeffs)
            }
            SegmentKind::Flap {
                side,
                sensitivity,
                max_deflection,
                max_droop,
                deployment_floor,
                cell_area,
                area_fraction,
                full_chord,
                trailing_position,
                forward_position,
            } => {
                let brake = controls.brake(*side).clamp(0.0, 1.0);
                let extent = (brake * sensitivity).clamp(0.0, 1.0);
                let deploy = controls.deployment.clamp(*deployment_floor, 1.0);

                let mut updated = self.clone();
                updated.area = cell_area * deploy * area_fraction * extent;
                updated.chord = full_chord * extent;
                updated.position =
                    trailing_position + (forward_position - trailing_position) * extent;
                updated.roll = max_droop * extent * side.lateral_sign();

                let alpha_local = flow.alpha + max_deflection * extent;
                let polar = self.polar.as_ref().unwrap_or(system_polar);
                let raw =
                    coefficients::evaluate(polar, alpha_local, flow.beta, 0.0, controls.dirty);

                // The rolled lift vector splits into a freestream-vertical
                // and a lateral component; the linear side-force derivative
                // alone underestimates the induced side force at deep
                // droop angles.
                let (sin_r, cos_r) = updated.roll.sin_cos();
                let coeffs = AeroCoefficients {
                    cl: raw.cl * cos_r,
                    cy: raw.cy - raw.cl * sin_r,
                    ..raw
                };
                (updated, coeffs)
            }
            SegmentKind::LiftingBody {
                pitch_offset,
                pivots,
                blend,
            } => {
                let offset = pitch_offset + if *pivots { controls.pilot_pitch } else { 0.0 };
                let alpha_local = flow.alpha - offset;
                let base_polar = self.polar.as_ref().unwrap_or(system_polar);

                let coeffs = match blend {
                    Some(other) if controls.dirty > 0.0 => {
                        let mixed = base_polar.lerp(other, controls.dirty);
                        coefficients::evaluate(&mixed, alpha_local, flow.beta, controls.elevator, 0.0)
                    }
                    _ => coefficients::evaluate(
                        base_polar,
                        alpha_local,
                        flow.beta,
                        controls.elevator,
                        controls.dirty,
                    ),
                };

                let mut updated = self.clone();
                updated.pitch = offset;
                (updated, coeffs)
            }
            SegmentKind::Parasitic { cd, cy } => {
                let coeffs = AeroCoefficients {
                    cd: *cd,
                    cy: *cy,
                    cp: 0.25,
                    ..Default::default()
                };
                (self.clone(), coeffs)
            }
        }
    }
}

/// Build a canopy cell without a brake flap.
pub fn canopy_cell(
    name: impl Into<String>,
    position: Vector3<f64>,
    area: f64,
    chord: f64,
    arc_angle: f64,
    side: Side,
) -> Result<AeroSegment> {
    if area <= 0.0 || chord <= 0.0 {
        return Err(ModelError::InvalidSegment(format!(
            "cell area/chord must be positive, got {} / {}",
            area, chord
        )));
    }
    Ok(AeroSegment {
        name: name.into(),
        position,
        area,
        chord,
        pitch: 0.0,
        roll: arc_angle,
        polar: None,
        kind: SegmentKind::Cell {
            side,
            riser_gain: DEFAULT_RISER_GAIN,
            brake_gain: DEFAULT_BRAKE_GAIN,
            deployment_scaled: true,
            deployment_floor: DEFAULT_DEPLOYMENT_FLOOR,
            flap_area_fraction: 0.0,
            flap_response: 0.0,
            unzip_scaled: false,
            base: SegmentGeometry {
                position,
                area,
                chord,
            },
        },
    })
}

/// Build a canopy cell paired with its brake flap.
///
/// The pair shares geometry so the cell's area plus the flap's effective
/// area stays constant over the whole brake range.
pub fn canopy_cell_with_flap(
    name: impl Into<String>,
    position: Vector3<f64>,
    area: f64,
    chord: f64,
    arc_angle: f64,
    side: Side,
) -> Result<(AeroSegment, AeroSegment)> {
    let name = name.into();
    let mut cell = canopy_cell(name.clone(), position, area, chord, arc_angle, side)?;
    if let SegmentKind::Cell {
        flap_area_fraction,
        flap_response,
        ..
    } = &mut cell.kind
    {
        *flap_area_fraction = DEFAULT_FLAP_AREA_FRACTION;
        *flap_response = DEFAULT_FLAP_SENSITIVITY;
    }

    // Trailing edge sits half a chord aft of the cell center; the flap
    // migrates forward to quarter-chord as it deploys.
    let trailing = position + Vector3::new(-0.5 * chord, 0.0, 0.0);
    let forward = position + Vector3::new(-0.25 * chord, 0.0, 0.0);
    let flap = AeroSegment {
        name: format!("{}-flap", name),
        position: trailing,
        area: 0.0,
        chord: 0.0,
        pitch: 0.0,
        roll: 0.0,
        polar: None,
        kind: SegmentKind::Flap {
            side,
            sensitivity: DEFAULT_FLAP_SENSITIVITY,
            max_deflection: DEFAULT_FLAP_DEFLECTION,
            max_droop: DEFAULT_FLAP_DROOP,
            deployment_floor: DEFAULT_DEPLOYMENT_FLOOR,
            cell_area: area,
            area_fraction: DEFAULT_FLAP_AREA_FRACTION,
            full_chord: 0.25 * chord,
            trailing_position: trailing,
            forward_position: forward,
        },
    };
    Ok((cell, flap))
}

/// Build a lifting body with its own polar and a pitch offset.
pub fn lifting_body(
    name: impl Into<String>,
    position: Vector3<f64>,
    area: f64,
    chord: f64,
    pitch_offset: f64,
    pivots: bool,
    polar: Polar,
    blend: Option<Polar>,
) -> Result<AeroSegment> {
    polar.validate()?;
    if let Some(other) = &blend {
        other.validate()?;
    }
    if area <= 0.0 || chord <= 0.0 {
        return Err(ModelError::InvalidSegment(format!(
            "lifting body area/chord must be positive, got {} / {}",
            area, chord
        )));
    }
    Ok(AeroSegment {
        name: name.into(),
        position,
        area,
        chord,
        pitch: pitch_offset,
        roll: 0.0,
        polar: Some(polar),
        kind: SegmentKind::LiftingBody {
            pitch_offset,
            pivots,
            blend: blend.map(Box::new),
        },
    })
}

/// Build a constant-coefficient parasitic body (lines, pilot drag, struts).
pub fn parasitic_body(
    name: impl Into<String>,
    position: Vector3<f64>,
    area: f64,
    cd: f64,
) -> Result<AeroSegment> {
    if area <= 0.0 || cd < 0.0 {
        return Err(ModelError::InvalidSegment(format!(
            "parasitic body needs positive area and non-negative cd, got {} / {}",
            area, cd
        )));
    }
    Ok(AeroSegment {
        name: name.into(),
        position,
        area,
        // Chord only matters for intrinsic moments, which a parasitic body
        // does not produce.
        chord: 1.0,
        pitch: 0.0,
        roll: 0.0,
        polar: None,
        kind: SegmentKind::Parasitic { cd, cy: 0.0 },
    })
}
