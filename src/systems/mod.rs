pub mod aerodynamics;
pub mod physics;
