use glam::{Mat4, Vec3};

use crate::math::ray::Ray;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Sphere around the box enclosing all points; `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<BoundingSphere> {
        let points: Vec<Vec3> = points.into_iter().collect();
        let aabb = AABB::from_points(points.iter().copied())?;
        let center = aabb.center();
        let radius = points
            .iter()
            .map(|point| point.distance(center))
            .fold(0.0, f32::max);

        Some(BoundingSphere { center, radius })
    }

    pub fn transform(&self, matrix: &Mat4) -> BoundingSphere {
        let center = matrix.transform_point3(self.center);
        let scale = matrix.to_scale_rotation_translation().0.abs();
        let radius = self.radius * scale.max_element();
        BoundingSphere { center, radius }
    }

    /// Distance along the ray to the first intersection, if any. A ray
    /// starting inside the sphere hits at distance 0.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let to_center = self.center - ray.origin;
        let along = to_center.dot(ray.direction);
        let distance_squared = to_center.length_squared() - along * along;
        let radius_squared = self.radius * self.radius;

        if distance_squared > radius_squared {
            return None;
        }

        let half_chord = (radius_squared - distance_squared).sqrt();
        let near = along - half_chord;
        let far = along + half_chord;

        if far < 0.0 {
            None
        } else {
            Some(near.max(0.0))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(point1: Vec3, point2: Vec3) -> AABB {
        let min = point1.min(point2);
        let max = point1.max(point2);
        AABB { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<AABB> {
        points.into_iter().fold(None, |aabb, point| {
            Some(match aabb {
                None => AABB::new(point, point),
                Some(AABB { min, max }) => AABB::new(min.min(point), max.max(point)),
            })
        })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_encloses_points() {
        let points = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 0.0)];
        let sphere = BoundingSphere::from_points(points).unwrap();
        assert_eq!(sphere.center, Vec3::new(0.0, 1.0, 0.0));
        assert!(points.iter().all(|p| p.distance(sphere.center) <= sphere.radius + 1e-6));
        assert!(BoundingSphere::from_points([]).is_none());
    }

    #[test]
    fn ray_hits_nearest_surface() {
        let sphere = BoundingSphere {
            center: Vec3::new(0.0, 0.0, -5.0),
            radius: 1.0,
        };
        let hit = sphere.intersect_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert!((hit - 4.0).abs() < 1e-5);

        assert!(sphere.intersect_ray(&Ray::new(Vec3::ZERO, Vec3::Z)).is_none());
        assert!(sphere
            .intersect_ray(&Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_Z))
            .is_none());
    }

    #[test]
    fn transform_scales_radius() {
        let sphere = BoundingSphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let moved = sphere.transform(&Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::IDENTITY,
            Vec3::new(0.0, 1.0, 0.0),
        ));
        assert!((moved.radius - 2.0).abs() < 1e-5);
        assert!(moved.center.abs_diff_eq(Vec3::Y, 1e-5));
    }
}
