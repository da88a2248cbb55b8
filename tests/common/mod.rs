use glidesim::components::{ControlInputs, RigidBodyState};
use glidesim::resources::{CompositeFrame, StepConfig};
use glidesim::systems::physics::{forward_euler, rk4_step};
use glidesim::vehicles::CanopySystem;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fully-deployed sport canopy snapshot with effective (physical plus
/// apparent) mass and inertia.
pub fn canopy_step_config(controls: ControlInputs) -> StepConfig {
    init_logging();
    let frame = CompositeFrame::build(&CanopySystem::default(), 1.0, 0.0);
    frame.step_config(controls, true)
}

/// Forward flight roughly on the glide path, a realistic starting point
/// for closed-loop runs.
pub fn gliding_state() -> RigidBodyState {
    let mut state = RigidBodyState::default();
    state.velocity.x = 12.0;
    state.velocity.z = 3.0;
    state.attitude.y = -0.1;
    state
}

pub fn run_rk4(state: &RigidBodyState, config: &StepConfig, dt: f64, steps: usize) -> RigidBodyState {
    let mut current = state.clone();
    for _ in 0..steps {
        current = rk4_step(&current, config, dt);
    }
    current
}

pub fn run_euler(
    state: &RigidBodyState,
    config: &StepConfig,
    dt: f64,
    steps: usize,
) -> RigidBodyState {
    let mut current = state.clone();
    for _ in 0..steps {
        current = forward_euler(&current, config, dt);
    }
    current
}

pub fn assert_state_finite(state: &RigidBodyState) {
    for value in state
        .position
        .iter()
        .chain(state.velocity.iter())
        .chain(state.attitude.iter())
        .chain(state.rates.iter())
    {
        assert!(value.is_finite(), "non-finite state: {:?}", state);
    }
}
