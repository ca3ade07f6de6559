use glam::{EulerRot, Quat, Vec3};

use crate::animation::{Animatable, Tween};
use crate::camera::Camera;
use crate::media::Assets;
use crate::scene_graph::object3d::ObjectId;
use crate::scene_graph::scene::Scene;

pub const CAN_MODEL: &str = "models/redbull.glb";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseKey {
    X,
    Y,
    Z,
    RotX,
    RotY,
    RotZ,
    Scale,
}

/// Position, Euler XYZ rotation and uniform scale of an animated object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale: 1.0,
        }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }
}

impl Animatable for Pose {
    type Key = PoseKey;

    fn get(&self, key: PoseKey) -> f32 {
        match key {
            PoseKey::X => self.position.x,
            PoseKey::Y => self.position.y,
            PoseKey::Z => self.position.z,
            PoseKey::RotX => self.rotation.x,
            PoseKey::RotY => self.rotation.y,
            PoseKey::RotZ => self.rotation.z,
            PoseKey::Scale => self.scale,
        }
    }

    fn set(&mut self, key: PoseKey, value: f32) {
        match key {
            PoseKey::X => self.position.x = value,
            PoseKey::Y => self.position.y = value,
            PoseKey::Z => self.position.z = value,
            PoseKey::RotX => self.rotation.x = value,
            PoseKey::RotY => self.rotation.y = value,
            PoseKey::RotZ => self.rotation.z = value,
            PoseKey::Scale => self.scale = value,
        }
    }
}

/// Looping offsets added on top of the scroll-driven pose.
#[derive(Debug, Clone, Default)]
pub struct IdleMotion {
    tweens: Vec<(PoseKey, Tween)>,
}

impl IdleMotion {
    pub fn with(mut self, key: PoseKey, tween: Tween) -> Self {
        self.tweens.push((key, tween));
        self
    }

    pub fn apply(&self, pose: &mut Pose, time: f32) {
        for (key, tween) in &self.tweens {
            pose.set(*key, pose.get(*key) + tween.sample(time));
        }
    }
}

/// A can model in its own scene, seen by a fixed camera.
pub struct FlavorRig {
    pub scene: Scene,
    pub camera: Camera,
    pub model: Option<ObjectId>,
    /// Scroll-driven pose, before idle motion.
    pub pose: Pose,
    idle: IdleMotion,
}

impl FlavorRig {
    /// A failed model load is logged and leaves the rig empty; lights and
    /// animation state still work.
    pub fn load(assets: &Assets, name: &str, pose: Pose) -> Self {
        let mut scene = Scene::new();
        let path = assets.path(CAN_MODEL);

        let model = match scene.load_gltf(&path, name) {
            Ok(root) => Some(root),
            Err(error) => {
                log::warn!("Model unavailable for {}: {:#}", name, error);
                None
            }
        };

        Self {
            scene,
            camera: Camera::perspective(75.0, Vec3::new(0.0, 0.0, 5.0)),
            model,
            pose,
            idle: IdleMotion::default(),
        }
    }

    pub fn with_idle(mut self, idle: IdleMotion) -> Self {
        self.idle = idle;
        self
    }

    /// Pose after idle motion at `time`.
    pub fn animated_pose(&self, time: f32) -> Pose {
        let mut pose = self.pose;
        self.idle.apply(&mut pose, time);
        pose
    }

    /// Writes the animated pose into the scene and updates world matrices.
    pub fn apply(&mut self, time: f32) {
        let Some(model) = self.model else {
            return;
        };

        let pose = self.animated_pose(time);
        self.scene
            .set_object_transform(model, pose.position, pose.quat(), Vec3::splat(pose.scale));
        self.scene.update();
    }
}
