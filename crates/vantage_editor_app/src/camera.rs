// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cameras, screen rays and the viewport orbit controls.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use vantage_editor_paths::Frame;

/// Rotation taking local +Z to `forward` and local +Y towards `up`
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut right = up.cross(forward);
    if right.length_squared() < 1e-12 {
        right = forward.any_orthonormal_vector();
    }
    let right = right.normalize();
    let up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize()
}

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the plane through `point` with `normal`, if hit in front
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<f32> {
        let denom = normal.dot(self.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Nearest distance to a sphere, if hit in front
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let to_origin = self.origin - center;
        let b = to_origin.dot(self.direction);
        let c = to_origin.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }
}

/// Perspective camera described by a look-at pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Display name
    pub name: String,
    /// Eye position
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width over height
    pub aspect_ratio: f32,
    /// Near clip distance
    pub near_z: f32,
    /// Far clip distance
    pub far_z: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y: 60f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near_z: 0.1,
            far_z: 1000.0,
        }
    }
}

impl Camera {
    /// Create a camera with default optics
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style pose setter
    pub fn looking_at(mut self, position: Vec3, target: Vec3, up: Vec3) -> Self {
        self.position = position;
        self.target = target;
        self.up = up;
        self
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Unit screen-right direction
    pub fn right(&self) -> Vec3 {
        let right = self.forward().cross(self.up);
        if right.length_squared() < 1e-12 {
            return self.forward().any_orthonormal_vector();
        }
        right.normalize()
    }

    /// Up direction orthogonal to the view direction
    pub fn true_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Current pose
    pub fn frame(&self) -> Frame {
        Frame::new(self.position, self.target, self.up)
    }

    /// Set the clip range; the far plane is kept beyond the near plane
    pub fn set_depth_range(&mut self, near_z: f32, far_z: f32) {
        self.near_z = near_z.max(1e-4);
        self.far_z = far_z.max(self.near_z + 1e-3);
    }

    /// World to view transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// View to clip transform
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near_z, self.far_z)
    }

    /// Ray through a screen point.
    ///
    /// `point` is normalized: (0, 0) is the top-left corner and (1, 1) the
    /// bottom-right.
    pub fn screen_ray(&self, point: Vec2) -> Ray {
        let ndc_x = point.x * 2.0 - 1.0;
        let ndc_y = 1.0 - point.y * 2.0;
        let tan_half = (self.fov_y * 0.5).tan();

        let direction = self.forward()
            + self.right() * (ndc_x * tan_half * self.aspect_ratio)
            + self.true_up() * (ndc_y * tan_half);
        Ray::new(self.position, direction)
    }
}

/// Orbit / pan / zoom controls for the editor viewport camera
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Orbit distance from the target
    pub distance: f32,
    /// Yaw angle in radians
    pub yaw: f32,
    /// Pitch angle in radians
    pub pitch: f32,
    /// Radians per unit of normalized pointer movement
    pub rotate_speed: f32,
    /// Pan distance per unit of pointer movement, scaled by distance
    pub pan_speed: f32,
    /// Zoom factor per wheel step
    pub zoom_speed: f32,
}

impl OrbitController {
    /// Derive orbit parameters from a camera pose
    pub fn from_camera(camera: &Camera, rotate_speed: f32, pan_speed: f32, zoom_speed: f32) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.length().max(0.1);
        Self {
            distance,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            rotate_speed,
            pan_speed,
            zoom_speed,
        }
    }

    /// Orbit around the target
    pub fn orbit(&mut self, camera: &mut Camera, delta: Vec2) {
        self.yaw -= delta.x * self.rotate_speed;
        self.pitch += delta.y * self.rotate_speed;

        // Stay clear of the poles.
        let limit = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = self.pitch.clamp(-limit, limit);

        self.update_position(camera);
    }

    /// Move the target in the view plane
    pub fn pan(&mut self, camera: &mut Camera, delta: Vec2) {
        let scale = self.distance * self.pan_speed;
        let offset = camera.right() * (-delta.x * scale) + camera.true_up() * (delta.y * scale);
        camera.target += offset;
        self.update_position(camera);
    }

    /// Move towards or away from the target
    pub fn zoom(&mut self, camera: &mut Camera, delta: f32) {
        self.distance *= 1.0 - delta * self.zoom_speed * 0.1;
        self.distance = self.distance.clamp(0.1, 10000.0);
        self.update_position(camera);
    }

    /// Re-center on a point
    pub fn focus(&mut self, camera: &mut Camera, target: Vec3, distance: Option<f32>) {
        camera.target = target;
        if let Some(d) = distance {
            self.distance = d.max(0.1);
        }
        self.update_position(camera);
    }

    fn update_position(&self, camera: &mut Camera) {
        let offset = Vec3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        );
        camera.position = camera.target + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_rotation_canonical_is_identity() {
        let rotation = look_rotation(Vec3::Z, Vec3::Y);
        assert!(rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));

        let rotation = look_rotation(Vec3::X, Vec3::Y);
        assert!((rotation * Vec3::Z).abs_diff_eq(Vec3::X, 1e-6));
        assert!((rotation * Vec3::Y).abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_center_ray_follows_forward() {
        let camera = Camera::new("Main").looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let ray = camera.screen_ray(Vec2::splat(0.5));
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-6));

        // Right half of the screen points towards +X for this camera.
        let ray = camera.screen_ray(Vec2::new(0.75, 0.5));
        assert!(ray.direction.x > 0.0);
        let ray = camera.screen_ray(Vec2::new(0.5, 0.25));
        assert!(ray.direction.y > 0.0);
    }

    #[test]
    fn test_ray_intersections() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        assert!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0).is_none());

        let t = ray.intersect_plane(Vec3::ZERO, Vec3::Z).unwrap();
        assert!((t - 10.0).abs() < 1e-5);
        assert!(ray.intersect_plane(Vec3::ZERO, Vec3::X).is_none());
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera::new("View").looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let mut orbit = OrbitController::from_camera(&camera, 3.0, 1.0, 1.0);
        orbit.orbit(&mut camera, Vec2::new(0.1, 0.05));
        assert!(((camera.position - camera.target).length() - 10.0).abs() < 1e-4);

        orbit.zoom(&mut camera, 1.0);
        assert!(((camera.position - camera.target).length() - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_depth_range_ordering() {
        let mut camera = Camera::default();
        camera.set_depth_range(5.0, 1.0);
        assert!(camera.far_z > camera.near_z);
    }
}
