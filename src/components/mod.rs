pub mod controls;
pub mod mass;
pub mod polar;
pub mod segment;
pub mod spatial;

pub use controls::{ControlInputs, Side};
pub use mass::MassSegment;
pub use polar::{ControlDerivatives, Polar};
pub use segment::{AeroSegment, FlowAngles, SegmentGeometry, SegmentKind};
pub use spatial::{RigidBodyState, StateDerivative};
