use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

const MIN_AIRSPEED: f64 = 1e-6;

/// Rigid-body state of the vehicle: twelve scalars.
///
/// Attitude uses the yaw -> pitch -> roll Euler sequence; the vector stores
/// `(roll, pitch, yaw)`. Velocity and angular rates are body-frame, position
/// is inertial with z down.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RigidBodyState {
    /// Inertial position [m]
    pub position: Vector3<f64>,
    /// Body-frame velocity (u, v, w) [m/s]
    pub velocity: Vector3<f64>,
    /// Euler attitude (roll, pitch, yaw) [rad]
    pub attitude: Vector3<f64>,
    /// Body-frame angular rates (p, q, r) [rad/s]
    pub rates: Vector3<f64>,
}

impl Default for RigidBodyState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            attitude: Vector3::zeros(),
            rates: Vector3::zeros(),
        }
    }
}

/// Time derivative of a [`RigidBodyState`], produced once per integrator
/// stage.
#[derive(Debug, Clone, Copy)]
pub struct StateDerivative {
    pub position_dot: Vector3<f64>,
    pub velocity_dot: Vector3<f64>,
    pub attitude_dot: Vector3<f64>,
    pub rates_dot: Vector3<f64>,
}

impl StateDerivative {
    pub fn zeros() -> Self {
        Self {
            position_dot: Vector3::zeros(),
            velocity_dot: Vector3::zeros(),
            attitude_dot: Vector3::zeros(),
            rates_dot: Vector3::zeros(),
        }
    }

    /// Weighted 1:2:2:1 combination used by the RK4 step.
    pub fn weighted(
        k1: &StateDerivative,
        k2: &StateDerivative,
        k3: &StateDerivative,
        k4: &StateDerivative,
    ) -> StateDerivative {
        let combine = |a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>, d: Vector3<f64>| {
            (a + 2.0 * b + 2.0 * c + d) / 6.0
        };
        StateDerivative {
            position_dot: combine(
                k1.position_dot,
                k2.position_dot,
                k3.position_dot,
                k4.position_dot,
            ),
            velocity_dot: combine(
                k1.velocity_dot,
                k2.velocity_dot,
                k3.velocity_dot,
                k4.velocity_dot,
            ),
            attitude_dot: combine(
                k1.attitude_dot,
                k2.attitude_dot,
                k3.attitude_dot,
                k4.attitude_dot,
            ),
            rates_dot: combine(k1.rates_dot, k2.rates_dot, k3.rates_dot, k4.rates_dot),
        }
    }
}

impl RigidBodyState {
    pub fn new(
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        attitude: Vector3<f64>,
        rates: Vector3<f64>,
    ) -> Self {
        Self {
            position,
            velocity,
            attitude,
            rates,
        }
    }

    pub fn roll(&self) -> f64 {
        self.attitude.x
    }

    pub fn pitch(&self) -> f64 {
        self.attitude.y
    }

    pub fn yaw(&self) -> f64 {
        self.attitude.z
    }

    /// True airspeed from the body-frame velocity [m/s].
    pub fn airspeed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Angle of attack; zero when the airspeed is negligible.
    pub fn alpha(&self) -> f64 {
        if self.airspeed() > MIN_AIRSPEED {
            self.velocity.z.atan2(self.velocity.x)
        } else {
            0.0
        }
    }

    /// Sideslip angle; zero when the airspeed is negligible.
    pub fn beta(&self) -> f64 {
        let airspeed = self.airspeed();
        if airspeed > MIN_AIRSPEED {
            (self.velocity.y / airspeed).asin()
        } else {
            0.0
        }
    }

    /// One explicit-Euler update: `state + dt * derivative`.
    pub fn advanced(&self, derivative: &StateDerivative, dt: f64) -> RigidBodyState {
        RigidBodyState {
            position: self.position + dt * derivative.position_dot,
            velocity: self.velocity + dt * derivative.velocity_dot,
            attitude: self.attitude + dt * derivative.attitude_dot,
            rates: self.rates + dt * derivative.rates_dot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_alpha_beta_from_velocity() {
        let state = RigidBodyState {
            velocity: Vector3::new(30.0, 0.0, 3.0),
            ..Default::default()
        };
        assert_relative_eq!(state.alpha(), (3.0f64 / 30.0).atan(), epsilon = 1e-12);
        assert_relative_eq!(state.beta(), 0.0);

        let state = RigidBodyState {
            velocity: Vector3::new(30.0, 5.0, 0.0),
            ..Default::default()
        };
        assert!(state.beta() > 0.0);
    }

    #[test]
    fn test_alpha_beta_guarded_at_zero_airspeed() {
        let state = RigidBodyState::default();
        assert_eq!(state.alpha(), 0.0);
        assert_eq!(state.beta(), 0.0);
    }

    #[test]
    fn test_advanced_is_explicit_euler() {
        let state = RigidBodyState::default();
        let derivative = StateDerivative {
            position_dot: Vector3::new(1.0, 0.0, 0.0),
            velocity_dot: Vector3::new(0.0, 0.0, 9.81),
            attitude_dot: Vector3::new(0.1, 0.0, 0.0),
            rates_dot: Vector3::zeros(),
        };
        let next = state.advanced(&derivative, 0.5);
        assert_relative_eq!(next.position.x, 0.5);
        assert_relative_eq!(next.velocity.z, 4.905);
        assert_relative_eq!(next.attitude.x, 0.05);
    }

    #[test]
    fn test_weighted_combination_matches_rk4_weights() {
        let unit = StateDerivative {
            position_dot: Vector3::new(1.0, 0.0, 0.0),
            velocity_dot: Vector3::zeros(),
            attitude_dot: Vector3::zeros(),
            rates_dot: Vector3::zeros(),
        };
        let twice = StateDerivative {
            position_dot: Vector3::new(2.0, 0.0, 0.0),
            ..StateDerivative::zeros()
        };
        let combined = StateDerivative::weighted(&unit, &twice, &twice, &unit);
        // (1 + 2*2 + 2*2 + 1) / 6 = 10/6
        assert_relative_eq!(combined.position_dot.x, 10.0 / 6.0);
    }
}
