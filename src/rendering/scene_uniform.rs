use bytemuck::{Pod, Zeroable};
use glam::{Mat4, UVec4, Vec3, Vec4};

use crate::camera::Camera;
use crate::scene_graph::light::LightKind;
use crate::scene_graph::scene::Scene;

pub const MAX_LIGHTS_PER_KIND: usize = 4;

type LightArray = [Vec4; MAX_LIGHTS_PER_KIND];

/// Camera and lights of one scene layer, laid out as `SceneUniform` in
/// `model.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: Mat4,
    pub camera_position: Vec4,
    pub ambient: Vec4,
    /// Directional, spot and point light counts.
    pub counts: UVec4,
    /// x: layer opacity.
    pub params: Vec4,
    pub directional_direction: LightArray,
    pub directional_color: LightArray,
    pub spot_position: LightArray,
    pub spot_direction: LightArray,
    pub spot_color: LightArray,
    pub spot_cone: LightArray,
    pub point_position: LightArray,
    pub point_color: LightArray,
}

impl SceneUniform {
    pub fn new(scene: &Scene, camera: &Camera, view_proj: Mat4, opacity: f32) -> Self {
        let mut uniform = SceneUniform::zeroed();
        uniform.view_proj = view_proj;
        uniform.camera_position = camera.eye.extend(1.0);
        uniform.params = Vec4::new(opacity, 0.0, 0.0, 0.0);

        let mut ambient = Vec3::ZERO;
        let (mut directional, mut spot, mut point) = (0usize, 0usize, 0usize);

        for (_, light) in scene.lights.iter() {
            let radiance = light.color * light.intensity;

            match light.kind {
                LightKind::Ambient => ambient += radiance,
                LightKind::Directional => {
                    if directional == MAX_LIGHTS_PER_KIND {
                        continue;
                    }
                    uniform.directional_direction[directional] = light.direction().extend(0.0);
                    uniform.directional_color[directional] = radiance.extend(1.0);
                    directional += 1;
                }
                LightKind::Spot {
                    angle,
                    penumbra,
                    distance,
                    decay,
                } => {
                    if spot == MAX_LIGHTS_PER_KIND {
                        continue;
                    }
                    uniform.spot_position[spot] = light.position.extend(distance);
                    uniform.spot_direction[spot] = light.direction().extend(decay);
                    uniform.spot_color[spot] = radiance.extend(1.0);
                    uniform.spot_cone[spot] = Vec4::new(
                        angle.cos(),
                        (angle * (1.0 - penumbra)).cos(),
                        0.0,
                        0.0,
                    );
                    spot += 1;
                }
                LightKind::Point { distance, decay } => {
                    if point == MAX_LIGHTS_PER_KIND {
                        continue;
                    }
                    uniform.point_position[point] = light.position.extend(distance);
                    uniform.point_color[point] = radiance.extend(decay);
                    point += 1;
                }
            }
        }

        uniform.ambient = ambient.extend(1.0);
        uniform.counts = UVec4::new(directional as u32, spot as u32, point as u32, 0);
        uniform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::light::Light;
    use std::f32::consts::PI;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 640);
    }

    #[test]
    fn lights_are_packed_by_kind() {
        let mut scene = Scene::new();
        scene.add_light(Light::ambient(0xffffff, 0.2));
        scene.add_light(Light::ambient(0xffffff, 0.1));
        scene.add_light(
            Light::spot(0xffffff, 25.0, Vec3::new(-1.5, 1.0, 4.83), PI / 4.0, 0.2, 10.0)
                .with_target(Vec3::new(-1.5, 0.0, 4.83)),
        );
        scene.add_light(Light::point(0xffffff, 8.0, Vec3::new(0.5, 0.0, 4.83), 8.0));
        for _ in 0..6 {
            scene.add_light(Light::directional(0xffffff, 1.0, Vec3::Y));
        }

        let camera = Camera::perspective(75.0, Vec3::new(0.0, 0.0, 5.0));
        let uniform = SceneUniform::new(&scene, &camera, Mat4::IDENTITY, 0.5);

        assert_eq!(uniform.counts, UVec4::new(4, 1, 1, 0));
        assert!((uniform.ambient.x - 0.3).abs() < 1e-6);
        assert_eq!(uniform.params.x, 0.5);
        assert_eq!(uniform.camera_position, Vec4::new(0.0, 0.0, 5.0, 1.0));

        assert_eq!(uniform.spot_color[0].x, 25.0);
        assert_eq!(uniform.spot_position[0].w, 10.0);
        assert!(uniform.spot_direction[0].truncate().abs_diff_eq(Vec3::NEG_Y, 1e-6));
        let cone = uniform.spot_cone[0];
        assert!((cone.x - (PI / 4.0).cos()).abs() < 1e-6);
        assert!((cone.y - (PI / 4.0 * 0.8).cos()).abs() < 1e-6);
        assert!(cone.y > cone.x);

        assert_eq!(uniform.point_position[0].w, 8.0);
        assert_eq!(uniform.point_color[0].w, 2.0);
        assert!(uniform.directional_direction[0]
            .truncate()
            .abs_diff_eq(Vec3::NEG_Y, 1e-6));
    }
}
