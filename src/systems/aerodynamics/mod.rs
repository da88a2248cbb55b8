pub mod coefficients;
pub mod forces;

pub use coefficients::AeroCoefficients;
pub use forces::{SegmentContext, SegmentForce, SystemForces};
