pub mod config;
pub mod frame;

pub use config::VehicleConfig;
pub use frame::{
    CompositeFrame, StepConfig, VehicleModel, DEFAULT_REBUILD_TOLERANCE, STANDARD_GRAVITY,
};
