mod canopy;
mod wingsuit;

pub use canopy::CanopySystem;
pub use wingsuit::Wingsuit;

use nalgebra::Vector3;

/// Rotate a body-frame position about the y axis (pitch) by `angle`.
pub(crate) fn pitch_rotated(position: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    let (sin_a, cos_a) = angle.sin_cos();
    Vector3::new(
        position.x * cos_a + position.z * sin_a,
        position.y,
        -position.x * sin_a + position.z * cos_a,
    )
}
