use serde::{Deserialize, Serialize};

/// Flat control-input bundle passed to every aerodynamic segment.
///
/// The bundle carries every channel the UI layer can produce; each segment
/// reads only the channels relevant to its kind and ignores the rest. All
/// inputs are dimensionless fractions unless noted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControlInputs {
    /// Left brake toggle [0, 1]
    pub brake_left: f64,
    /// Right brake toggle [0, 1]
    pub brake_right: f64,
    /// Left front-riser input [0, 1]
    pub riser_left: f64,
    /// Right front-riser input [0, 1]
    pub riser_right: f64,
    /// Left aileron-type input [-1, 1]
    pub aileron_left: f64,
    /// Right aileron-type input [-1, 1]
    pub aileron_right: f64,
    /// Elevator-type symmetric pitch input [-1, 1]
    pub elevator: f64,
    /// Rudder-type yaw input [-1, 1]
    pub rudder: f64,
    /// Symmetric flap input [0, 1]
    pub flap: f64,
    /// Pilot/pivot pitch angle [rad]
    pub pilot_pitch: f64,
    /// Canopy inflation state, 0 = packed, 1 = fully open
    pub deployment: f64,
    /// Dirty-flying fraction [0, 1]
    pub dirty: f64,
    /// Arm-wing unzip fraction [0, 1]
    pub unzip: f64,
}

impl Default for ControlInputs {
    fn default() -> Self {
        Self {
            brake_left: 0.0,
            brake_right: 0.0,
            riser_left: 0.0,
            riser_right: 0.0,
            aileron_left: 0.0,
            aileron_right: 0.0,
            elevator: 0.0,
            rudder: 0.0,
            flap: 0.0,
            pilot_pitch: 0.0,
            deployment: 1.0,
            dirty: 0.0,
            unzip: 0.0,
        }
    }
}

/// Lateral routing of per-side control channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Center,
}

impl Side {
    /// Sign of the lateral (body y) direction for this side, zero at center.
    pub fn lateral_sign(&self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
            Side::Center => 0.0,
        }
    }

    /// Route a per-side channel pair; center segments see the average.
    pub fn pick(&self, left: f64, right: f64) -> f64 {
        match self {
            Side::Left => left,
            Side::Right => right,
            Side::Center => 0.5 * (left + right),
        }
    }
}

impl ControlInputs {
    /// Brake input routed to one side of the canopy.
    pub fn brake(&self, side: Side) -> f64 {
        side.pick(self.brake_left, self.brake_right)
    }

    /// Riser input routed to one side of the canopy.
    pub fn riser(&self, side: Side) -> f64 {
        side.pick(self.riser_left, self.riser_right)
    }

    /// Aileron input routed to one side.
    pub fn aileron(&self, side: Side) -> f64 {
        side.pick(self.aileron_left, self.aileron_right)
    }
}
