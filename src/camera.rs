use glam::{Mat4, Vec2, Vec3};

use crate::math::ray::Ray;

/// Right-handed perspective camera looking down -Z by default, matching the
/// conventions of the scenes it renders.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn perspective(fov_y_degrees: f32, eye: Vec3) -> Self {
        Self {
            eye,
            target: eye + Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y_degrees,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn get_vp_matrix(&self, resolution: Vec2) -> Mat4 {
        let aspect = if resolution.y > 0.0 {
            resolution.x / resolution.y
        } else {
            1.0
        };
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space ray through a point given in normalized device
    /// coordinates of a viewport with the given resolution.
    pub fn ray_from_ndc(&self, ndc: Vec2, resolution: Vec2) -> Ray {
        let inverse = self.get_vp_matrix(resolution).inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_looks_forward() {
        let camera = Camera::perspective(75.0, Vec3::new(0.0, 0.0, 5.0));
        let ray = camera.ray_from_ndc(Vec2::ZERO, Vec2::new(1280.0, 720.0));
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-4));
        assert!((ray.origin.z - 4.9).abs() < 1e-3);
    }

    #[test]
    fn projected_point_round_trips_through_ray() {
        let camera = Camera::perspective(75.0, Vec3::new(0.0, 0.0, 3.0)).looking_at(Vec3::ZERO);
        let resolution = Vec2::new(240.0, 240.0);
        let point = Vec3::new(0.3, -0.2, 0.0);
        let clip = camera.get_vp_matrix(resolution).project_point3(point);

        let ray = camera.ray_from_ndc(clip.truncate(), resolution);
        let distance = (point - ray.origin).length();
        assert!(ray.at(distance).abs_diff_eq(point, 1e-3));
    }

    #[test]
    fn top_of_viewport_is_positive_y() {
        let camera = Camera::perspective(75.0, Vec3::new(0.0, 0.0, 5.0));
        let ray = camera.ray_from_ndc(Vec2::new(0.0, 1.0), Vec2::new(100.0, 100.0));
        assert!(ray.direction.y > 0.0);
    }
}
