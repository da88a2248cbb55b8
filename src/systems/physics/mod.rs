pub mod apparent_mass;
pub mod eom;
pub mod integrator;

pub use apparent_mass::{AxisTriple, Planform};
pub use integrator::{forward_euler, rk4_step};
