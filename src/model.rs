use anyhow::Context;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use gltf::buffer;
use itertools::izip;

use crate::asset_pipeline::materials::MaterialId;
use crate::math::bounds::BoundingSphere;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

pub struct ModelPrimitive {
    pub index: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: Option<MaterialId>,
}

pub struct Model {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
}

pub type Buffers<'a> = &'a [buffer::Data];

impl Model {
    /// `materials` maps glTF material indices to the ids they were stored
    /// under.
    pub fn from_gltf(
        name: impl Into<String>,
        mesh: gltf::Mesh,
        buffers: Buffers,
        materials: &[MaterialId],
    ) -> anyhow::Result<Model> {
        let mut model = Model {
            name: name.into(),
            primitives: Vec::new(),
        };

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                return Err(anyhow::anyhow!(
                    "Unsupported primitive mode: {:?}",
                    primitive.mode()
                ));
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .with_context(|| format!("Primitive without positions in {}", model.name))?
                .collect();
            let normals = reader
                .read_normals()
                .with_context(|| format!("Primitive without normals in {}", model.name))?;
            let tex_coords: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
                Some(tex_coords) => tex_coords.into_f32().collect(),
                None => vec![[0.0; 2]; positions.len()],
            };

            let vertices = izip!(positions.iter(), normals, tex_coords)
                .map(|(pos, normal, tex_coords)| Vertex {
                    position: Vec3::from(*pos),
                    normal: Vec3::from(normal),
                    tex_coords: Vec2::from(tex_coords),
                })
                .collect::<Vec<Vertex>>();

            let indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect::<Vec<u32>>(),
                None => (0..vertices.len() as u32).collect(),
            };

            let material = primitive
                .material()
                .index()
                .and_then(|index| materials.get(index).copied());

            model.primitives.push(ModelPrimitive {
                index: primitive.index(),
                vertices,
                indices,
                material,
            });
        }

        if model.primitives.is_empty() {
            return Err(anyhow::anyhow!("Mesh without primitives: {}", model.name));
        }

        Ok(model)
    }

    pub fn bounds(&self) -> Option<BoundingSphere> {
        BoundingSphere::from_points(
            self.primitives
                .iter()
                .flat_map(|primitive| primitive.vertices.iter().map(|vertex| vertex.position)),
        )
    }
}
