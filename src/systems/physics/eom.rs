use nalgebra::{Matrix3, Vector3};

use crate::systems::physics::apparent_mass::AxisTriple;

/// Determinant guard for the coupled roll/yaw equations.
const MIN_INERTIA_DETERMINANT: f64 = 1e-9;
/// Pitch-singularity guard for the Euler kinematic equations.
const MIN_COS_PITCH: f64 = 1e-6;

/// Gravity acceleration in the body frame from the roll/pitch Euler
/// angles [m/s^2].
pub fn gravity_body(roll: f64, pitch: f64, g: f64) -> Vector3<f64> {
    let (sin_phi, cos_phi) = roll.sin_cos();
    let (sin_theta, cos_theta) = pitch.sin_cos();
    g * Vector3::new(-sin_theta, sin_phi * cos_theta, cos_phi * cos_theta)
}

/// Translational dynamics with an isotropic mass: the cyclic
/// u_dot = Fx/m + rv - qw form.
pub fn translational(force: &Vector3<f64>, mass: f64, velocity: &Vector3<f64>, omega: &Vector3<f64>) -> Vector3<f64> {
    let (u, v, w) = (velocity.x, velocity.y, velocity.z);
    let (p, q, r) = (omega.x, omega.y, omega.z);
    Vector3::new(
        force.x / mass + r * v - q * w,
        force.y / mass + p * w - r * u,
        force.z / mass + q * u - p * v,
    )
}

/// Translational dynamics with per-axis effective mass in the
/// Lamb/Kirchhoff form: each Coriolis cross-term carries the mass of the
/// axis the velocity component belongs to. Required whenever apparent
/// mass differs per axis; reduces to the isotropic form when the three
/// masses are equal.
pub fn translational_anisotropic(
    force: &Vector3<f64>,
    mass: &AxisTriple,
    velocity: &Vector3<f64>,
    omega: &Vector3<f64>,
) -> Vector3<f64> {
    let (u, v, w) = (velocity.x, velocity.y, velocity.z);
    let (p, q, r) = (omega.x, omega.y, omega.z);
    Vector3::new(
        (force.x + mass.y * r * v - mass.z * q * w) / mass.x,
        (force.y + mass.z * p * w - mass.x * r * u) / mass.y,
        (force.z + mass.x * q * u - mass.y * p * v) / mass.z,
    )
}

/// Rotational dynamics: Euler's equation retaining the Ixz cross-coupling,
/// with Ixy = Iyz = 0 assumed. Roll and yaw are coupled through the
/// determinant Gamma = Ixx Izz - Ixz^2; pitch is decoupled. Returns zero
/// angular acceleration when the determinant degenerates.
pub fn rotational(moment: &Vector3<f64>, inertia: &Matrix3<f64>, omega: &Vector3<f64>) -> Vector3<f64> {
    let ixx = inertia[(0, 0)];
    let iyy = inertia[(1, 1)];
    let izz = inertia[(2, 2)];
    let ixz = inertia[(0, 2)];
    let (p, q, r) = (omega.x, omega.y, omega.z);
    let (l, m, n) = (moment.x, moment.y, moment.z);

    let gamma = ixx * izz - ixz * ixz;
    if gamma.abs() < MIN_INERTIA_DETERMINANT || iyy.abs() < MIN_INERTIA_DETERMINANT {
        return Vector3::zeros();
    }

    let p_dot = (izz * l + ixz * n + ixz * (ixx - iyy + izz) * p * q
        - (izz * (izz - iyy) + ixz * ixz) * q * r)
        / gamma;
    let q_dot = (m + (izz - ixx) * p * r - ixz * (p * p - r * r)) / iyy;
    let r_dot = (ixz * l + ixx * n + (ixx * (ixx - iyy) + ixz * ixz) * p * q
        - ixz * (ixx - iyy + izz) * q * r)
        / gamma;

    Vector3::new(p_dot, q_dot, r_dot)
}

/// Body angular rates to Euler-angle rates via the standard differential
/// kinematic matrix. Singular at +/-90 degrees pitch; the guard freezes
/// the yaw/roll rates near the singularity rather than blowing up.
pub fn euler_rates(omega: &Vector3<f64>, roll: f64, pitch: f64) -> Vector3<f64> {
    let (p, q, r) = (omega.x, omega.y, omega.z);
    let (sin_phi, cos_phi) = roll.sin_cos();
    let cos_theta = pitch.cos();
    if cos_theta.abs() < MIN_COS_PITCH {
        return Vector3::new(p, q * cos_phi - r * sin_phi, 0.0);
    }
    let tan_theta = pitch.tan();
    Vector3::new(
        p + (q * sin_phi + r * cos_phi) * tan_theta,
        q * cos_phi - r * sin_phi,
        (q * sin_phi + r * cos_phi) / cos_theta,
    )
}

/// Body-frame velocity to inertial velocity through the full direction
/// cosine matrix of the yaw -> pitch -> roll sequence.
pub fn body_to_inertial(velocity: &Vector3<f64>, roll: f64, pitch: f64, yaw: f64) -> Vector3<f64> {
    let (sin_phi, cos_phi) = roll.sin_cos();
    let (sin_theta, cos_theta) = pitch.sin_cos();
    let (sin_psi, cos_psi) = yaw.sin_cos();

    let dcm = Matrix3::new(
        cos_theta * cos_psi,
        sin_phi * sin_theta * cos_psi - cos_phi * sin_psi,
        cos_phi * sin_theta * cos_psi + sin_phi * sin_psi,
        cos_theta * sin_psi,
        sin_phi * sin_theta * sin_psi + cos_phi * cos_psi,
        cos_phi * sin_theta * sin_psi - sin_phi * cos_psi,
        -sin_theta,
        sin_phi * cos_theta,
        cos_phi * cos_theta,
    );
    dcm * velocity
}

/// Suspended-mass pendulum parameters.
#[derive(Debug, Clone, Copy)]
pub struct Pendulum {
    /// Suspended mass [kg]
    pub mass: f64,
    /// Pivot-to-mass arm length [m]
    pub arm: f64,
    /// Swing-rate damping coefficient [N m s/rad]
    pub damping: f64,
    /// Fraction of the parent body's pitch acceleration coupled into the
    /// swing
    pub coupling: f64,
}

impl Pendulum {
    /// Pitch acceleration of the suspended mass about the pivot
    /// [rad/s^2]: gravity-restoring torque, external aerodynamic torque,
    /// coupling from the parent's pitch acceleration, and swing-rate
    /// proportional damping.
    pub fn pitch_acceleration(
        &self,
        swing_angle: f64,
        swing_rate: f64,
        aero_torque: f64,
        parent_pitch_acceleration: f64,
        g: f64,
    ) -> f64 {
        let moment_of_inertia = self.mass * self.arm * self.arm;
        if moment_of_inertia < f64::EPSILON {
            return 0.0;
        }
        let gravity_torque = -self.mass * g * self.arm * swing_angle.sin();
        let damping_torque = -self.damping * swing_rate;
        (gravity_torque + aero_torque + damping_torque) / moment_of_inertia
            - self.coupling * parent_pitch_acceleration
    }
}
