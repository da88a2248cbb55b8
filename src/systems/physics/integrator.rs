use crate::components::{RigidBodyState, StateDerivative};
use crate::resources::StepConfig;
use crate::systems::aerodynamics::forces;
use crate::systems::physics::eom;

/// Single derivative evaluation: rotation-corrected segment forces,
/// gravity, translational and rotational dynamics, Euler kinematics, and
/// inertial velocity.
pub fn derivative(state: &RigidBodyState, config: &StepConfig) -> StateDerivative {
    let ctx = config.segment_context();
    let aero = forces::rotating_forces(&config.segments, &state.velocity, &state.rates, &ctx);

    // Gravity acts on the physical mass only; entrained air carries no
    // weight.
    let gravity = eom::gravity_body(state.roll(), state.pitch(), config.gravity);
    let force = aero.totals.force + config.mass * gravity;

    let velocity_dot = match &config.axis_mass {
        Some(axis_mass) => {
            eom::translational_anisotropic(&force, axis_mass, &state.velocity, &state.rates)
        }
        None => eom::translational(&force, config.mass, &state.velocity, &state.rates),
    };
    let rates_dot = eom::rotational(&aero.totals.moment, &config.inertia, &state.rates);
    let attitude_dot = eom::euler_rates(&state.rates, state.roll(), state.pitch());
    let position_dot =
        eom::body_to_inertial(&state.velocity, state.roll(), state.pitch(), state.yaw());

    StateDerivative {
        position_dot,
        velocity_dot,
        attitude_dot,
        rates_dot,
    }
}

/// Forward Euler step: `state + dt * f(state)`.
pub fn forward_euler(state: &RigidBodyState, config: &StepConfig, dt: f64) -> RigidBodyState {
    let k = derivative(state, config);
    state.advanced(&k, dt)
}

/// Classic 4th-order Runge-Kutta step: four stage evaluations weighted
/// 1:2:2:1 and applied as one Euler step. Costs exactly four derivative
/// evaluations per step.
pub fn rk4_step(state: &RigidBodyState, config: &StepConfig, dt: f64) -> RigidBodyState {
    let k1 = derivative(state, config);
    let k2 = derivative(&state.advanced(&k1, 0.5 * dt), config);
    let k3 = derivative(&state.advanced(&k2, 0.5 * dt), config);
    let k4 = derivative(&state.advanced(&k3, dt), config);
    let combined = StateDerivative::weighted(&k1, &k2, &k3, &k4);
    state.advanced(&combined, dt)
}
