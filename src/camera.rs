//! Pinhole camera producing world-space view directions.
//!
//! The look-at basis is stored as a 3x3 matrix with columns (right, up,
//! forward). The world is Y-up with +X lying to the right of +Z, so a camera
//! looking down +Z sees +X on the right of the image. With that convention the
//! basis is right-handed: `right × up = forward` and the determinant is +1.

use glam::{Mat3A, Quat, Vec3, Vec3A};

use crate::config::CameraConfig;
use crate::error::{Error, Result};

/// Cosine above which forward is considered parallel to world up.
pub const DEGENERATE_UP_COS: f32 = 0.999;

/// Pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3A,
    /// Point the camera looks at
    pub target: Vec3A,
    /// Roll around the view axis in radians
    pub roll: f32,
    /// Distance from the eye to the image plane; larger means narrower view
    pub focal_length: f32,
    /// View to world rotation, columns are (right, up, forward)
    pub look_at: Mat3A,
}

impl Camera {
    /// Build a camera. `position` and `target` must differ.
    pub fn new(position: Vec3A, target: Vec3A, focal_length: f32, roll: f32) -> Self {
        debug_assert!(position != target, "camera position and target coincide at {position}");
        Self {
            position,
            target,
            roll,
            focal_length,
            look_at: cam2world_matrix_with_roll(position, target, roll),
        }
    }

    /// Checked constructor for parameters coming from outside the program.
    pub fn try_new(position: Vec3A, target: Vec3A, focal_length: f32, roll: f32) -> Result<Self> {
        if !(position.is_finite() && target.is_finite() && focal_length.is_finite() && roll.is_finite()) {
            return Err(Error::DegenerateCamera("non-finite camera parameter".into()));
        }
        if (target - position).length_squared() <= f32::EPSILON {
            return Err(Error::DegenerateCamera(format!(
                "position {position} and target {target} coincide"
            )));
        }
        if focal_length <= 0.0 {
            return Err(Error::DegenerateCamera(format!("focal length {focal_length} must be positive")));
        }
        Ok(Self::new(position, target, focal_length, roll))
    }

    /// Build a camera from a position and a viewing direction.
    pub fn from_look_dir(position: Vec3A, look_dir: Vec3A, focal_length: f32, roll: f32) -> Result<Self> {
        Self::try_new(position, position + look_dir, focal_length, roll)
    }

    /// Build a camera from configuration values. A configured look direction
    /// takes precedence over the target point.
    pub fn from_config(config: &CameraConfig) -> Result<Self> {
        match config.look_dir {
            Some(look_dir) => Self::from_look_dir(config.position, look_dir, config.focal_length, config.roll),
            None => Self::try_new(config.position, config.target, config.focal_length, config.roll),
        }
    }

    /// Convert a view-space direction into world space.
    pub fn cam2world(&self, view_direction: Vec3A) -> Vec3A {
        self.look_at * view_direction
    }

    /// Unit vector pointing right in world space.
    pub fn right(&self) -> Vec3A {
        self.look_at.x_axis
    }

    /// Unit vector pointing up in world space.
    pub fn up(&self) -> Vec3A {
        self.look_at.y_axis
    }

    /// Unit vector pointing from the camera towards the target.
    pub fn forward(&self) -> Vec3A {
        self.look_at.z_axis
    }
}

/// Look-at basis from an explicit provisional up vector.
///
/// `provisional_up` must not be parallel to the viewing direction.
pub fn cam2world_matrix(cam_pos: Vec3A, target: Vec3A, provisional_up: Vec3A) -> Mat3A {
    let forward = (target - cam_pos).normalize();
    let right = provisional_up.cross(forward).normalize();
    let up = forward.cross(right);
    Mat3A::from_cols(right, up, forward)
}

/// Look-at basis with world +Y as up, rolled by `camera_roll` radians.
///
/// When the camera looks (almost) straight up or down, world +Y is replaced by
/// the Z axis pointing the way the top of the image should face: -Z when
/// looking down, +Z when looking up.
pub fn cam2world_matrix_with_roll(cam_pos: Vec3A, target: Vec3A, camera_roll: f32) -> Mat3A {
    let forward = (target - cam_pos).normalize();
    let base_up = if forward.dot(Vec3A::Y).abs() > DEGENERATE_UP_COS {
        Vec3A::new(0.0, 0.0, forward.y.signum())
    } else {
        Vec3A::Y
    };
    let provisional_up = Quat::from_axis_angle(Vec3::from(forward), camera_roll) * base_up;
    cam2world_matrix(cam_pos, target, provisional_up)
}
