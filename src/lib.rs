pub mod components;
pub mod error;
pub mod resources;
pub mod systems;
pub mod vehicles;

pub use components::{AeroSegment, ControlInputs, MassSegment, Polar, RigidBodyState, Side};
pub use error::{ModelError, Result};
pub use resources::{CompositeFrame, StepConfig, VehicleConfig, VehicleModel};
pub use systems::aerodynamics::AeroCoefficients;
pub use systems::physics::{forward_euler, rk4_step};
pub use vehicles::{CanopySystem, Wingsuit};
