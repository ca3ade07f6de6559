use anyhow::Context;
use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;
use std::collections::HashMap;
use std::path::Path;

use crate::asset_pipeline::materials::{load_materials, MaterialData, MaterialId};
use crate::math::ray::Ray;
use crate::model::{Buffers, Model};
use crate::scene_graph::light::{Light, LightId};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId};

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<SceneModel>,
    pub materials: Arena<MaterialData>,
    pub lights: Arena<Light>,
    gltf_mesh_to_model: HashMap<(String, usize), SceneModelId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
            materials: Arena::new(),
            lights: Arena::new(),
            gltf_mesh_to_model: HashMap::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn add_model(&mut self, model: SceneModel) -> SceneModelId {
        self.models.alloc(model)
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.alloc(light)
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id)
    }

    /// Imports a glTF file under a new root group named `name`, which is what
    /// gets animated as a whole.
    pub fn load_gltf(&mut self, path: &Path, name: &str) -> anyhow::Result<ObjectId> {
        let (document, buffers, mut images) = gltf::import(path)
            .with_context(|| format!("Failed to import glTF {}", path.display()))?;

        let materials = load_materials(&document, &mut images)
            .with_context(|| format!("Failed to load materials of {}", path.display()))?
            .into_iter()
            .map(|material| self.materials.alloc(material))
            .collect::<Vec<MaterialId>>();

        let gltf_scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .with_context(|| format!("No scenes in {}", path.display()))?;

        let root = self.add_object(Object3D {
            name: name.to_string(),
            ..Default::default()
        });

        let file_name = path.to_string_lossy().to_string();
        for node in gltf_scene.nodes() {
            self.spawn_gltf_node(&file_name, &buffers, &materials, &node, root)?;
        }

        log::info!(
            "Loaded {} ({} objects, {} materials)",
            path.display(),
            self.objects.len(),
            materials.len()
        );

        Ok(root)
    }

    fn spawn_gltf_node(
        &mut self,
        file_name: &str,
        buffers: Buffers,
        materials: &[MaterialId],
        node: &gltf::Node,
        parent: ObjectId,
    ) -> anyhow::Result<ObjectId> {
        let mut object = Object3D::default();
        let node_name = node.name().unwrap_or("Unnamed").to_string();
        object.name = node_name.clone();
        let (translation, rotation, scale) = node.transform().decomposed();

        object.transform.set_transform(
            translation.into(),
            Quat::from_array(rotation),
            scale.into(),
        );

        if let Some(mesh) = node.mesh() {
            let key = (file_name.to_string(), mesh.index());

            let model_id = match self.gltf_mesh_to_model.get(&key).copied() {
                Some(model_id) => model_id,
                None => {
                    let mesh_name = mesh
                        .name()
                        .map(String::from)
                        .unwrap_or_else(|| format!("{} (Mesh)", node_name));

                    let model = Model::from_gltf(mesh_name, mesh, buffers, materials)
                        .with_context(|| format!("Failed to create model for {node_name}"))?;
                    let model_id = self.add_model(SceneModel::new(model));
                    self.gltf_mesh_to_model.insert(key, model_id);

                    model_id
                }
            };

            object.model_id = Some(model_id);
        }

        let object_id = self.add_object(object);
        self.set_object_parent(object_id, Some(parent));

        for child in node.children() {
            self.spawn_gltf_node(file_name, buffers, materials, &child, object_id)?;
        }

        Ok(object_id)
    }

    fn update_transforms(&self) {
        let root_objects = self
            .objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
            .map(|(id, _)| id);

        for root_id in root_objects {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY, false);
        }
    }

    fn update_object_transform_recursive(
        &self,
        object_id: ObjectId,
        parent_world_matrix: Mat4,
        parent_changed: bool,
    ) {
        let Some(object) = self.objects.get(object_id) else {
            return;
        };

        let local_matrix = *object.transform.get_local_matrix();
        let changed = parent_changed || object.transform.is_world_dirty();
        if changed {
            object
                .transform
                .set_world_matrix(parent_world_matrix * local_matrix);
        }

        let world_matrix = *object.transform.get_world_matrix();
        for &child_id in &object.child_ids {
            self.update_object_transform_recursive(child_id, world_matrix, changed);
        }
    }

    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(old_parent_id) = self.objects.get(child_id).and_then(|child| child.parent_id) {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent) = new_parent_id.and_then(|id| self.objects.get_mut(id)) {
                new_parent.child_ids.push(child_id);
            }
        }

        self.invalidate_object_hierarchy(child_id);
    }

    pub fn set_object_transform(
        &mut self,
        object_id: ObjectId,
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_transform(translation, rotation, scale);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    /// Applies a hover tint to an object and everything below it.
    pub fn set_highlight(&mut self, object_id: ObjectId, highlight: f32) {
        let Some(object) = self.objects.get_mut(object_id) else {
            return;
        };
        object.highlight = highlight;

        let children = object.child_ids.clone();
        for child_id in children {
            self.set_highlight(child_id, highlight);
        }
    }

    /// Objects that carry a model, with that model.
    pub fn renderables(&self) -> impl Iterator<Item = (&Object3D, &SceneModel)> {
        self.objects.iter().filter_map(|(_, object)| {
            let model = self.models.get(object.model_id?)?;
            Some((object, model))
        })
    }

    /// Nearest model-bearing object hit by `ray`, by bounding sphere, with
    /// the hit distance. Uses world matrices from the last `update`.
    pub fn pick(&self, ray: &Ray) -> Option<(ObjectId, f32)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| {
                let model = self.models.get(object.model_id?)?;
                let bounds = model
                    .bounds?
                    .transform(&object.transform.get_world_matrix());
                bounds.intersect_ray(ray).map(|distance| (id, distance))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    pub fn update(&mut self) {
        self.update_transforms();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelPrimitive, Vertex};
    use glam::Vec2;

    fn cube_model(name: &str) -> Model {
        let corners = [Vec3::splat(-0.5), Vec3::splat(0.5)];
        Model {
            name: name.to_string(),
            primitives: vec![ModelPrimitive {
                index: 0,
                vertices: corners
                    .iter()
                    .map(|&position| Vertex {
                        position,
                        normal: Vec3::Y,
                        tex_coords: Vec2::ZERO,
                    })
                    .collect(),
                indices: vec![0, 1, 0],
                material: None,
            }],
        }
    }

    fn spawn(scene: &mut Scene, name: &str, parent: Option<ObjectId>, model: bool) -> ObjectId {
        let model_id = model.then(|| scene.add_model(SceneModel::new(cube_model(name))));
        let id = scene.add_object(Object3D {
            name: name.to_string(),
            model_id,
            ..Default::default()
        });
        scene.set_object_parent(id, parent);
        id
    }

    #[test]
    fn children_inherit_parent_transform() {
        let mut scene = Scene::new();
        let root = spawn(&mut scene, "root", None, false);
        let child = spawn(&mut scene, "child", Some(root), true);

        scene.set_object_transform(child, Vec3::X, Quat::IDENTITY, Vec3::ONE);
        scene.set_object_transform(root, Vec3::new(0.0, 0.0, 4.3), Quat::IDENTITY, Vec3::splat(2.0));
        scene.update();

        let world = *scene.get_object(child).unwrap().transform.get_world_matrix();
        let origin = world.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(2.0, 0.0, 4.3), 1e-5));

        scene.set_object_transform(root, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
        scene.update();
        let world = *scene.get_object(child).unwrap().transform.get_world_matrix();
        assert!(world.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn pick_returns_nearest_hit() {
        let mut scene = Scene::new();
        let near = spawn(&mut scene, "near", None, true);
        let far = spawn(&mut scene, "far", None, true);
        scene.set_object_transform(near, Vec3::new(0.0, 0.0, -2.0), Quat::IDENTITY, Vec3::ONE);
        scene.set_object_transform(far, Vec3::new(0.0, 0.0, -6.0), Quat::IDENTITY, Vec3::ONE);
        scene.update();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let (hit, _) = scene.pick(&ray).unwrap();
        assert_eq!(hit, near);
        assert_eq!(scene.get_object_by_name("far"), Some(far));

        let miss = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z);
        assert!(scene.pick(&miss).is_none());
    }

    #[test]
    fn highlight_propagates_to_descendants() {
        let mut scene = Scene::new();
        let root = spawn(&mut scene, "root", None, false);
        let child = spawn(&mut scene, "child", Some(root), true);

        scene.set_highlight(root, 0.5);
        assert_eq!(scene.get_object(child).unwrap().highlight, 0.5);
        assert_eq!(scene.renderables().count(), 1);
    }
}
