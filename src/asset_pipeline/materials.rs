use anyhow::Context;
use glam::Vec4;
use id_arena::Id;

pub type MaterialId = Id<MaterialData>;

#[derive(Debug, Clone)]
pub struct MaterialData {
    pub name: String,
    pub base_color_factor: Vec4,
    /// RGBA8, sRGB encoded.
    pub base_color: Option<gltf::image::Data>,
}

/// Extracts every material of a glTF document, in document order. Base color
/// images are moved out of `images`.
pub fn load_materials(
    document: &gltf::Document,
    images: &mut [gltf::image::Data],
) -> anyhow::Result<Vec<MaterialData>> {
    document
        .materials()
        .map(|material| -> anyhow::Result<MaterialData> {
            let name = material.name().unwrap_or("Unnamed material").to_string();
            let pbr = material.pbr_metallic_roughness();

            let base_color = pbr
                .base_color_texture()
                .map(|texture_info| -> anyhow::Result<gltf::image::Data> {
                    let image_index = texture_info.texture().source().index();
                    let image = images
                        .get_mut(image_index)
                        .with_context(|| format!("Image index out of bounds in {name}"))?;
                    convert_image_data_to_rgba(std::mem::replace(image, empty_image()))
                })
                .transpose()?;

            Ok(MaterialData {
                name,
                base_color_factor: Vec4::from(pbr.base_color_factor()),
                base_color,
            })
        })
        .collect()
}

fn empty_image() -> gltf::image::Data {
    gltf::image::Data {
        pixels: Vec::new(),
        format: gltf::image::Format::R8G8B8,
        width: 0,
        height: 0,
    }
}

fn convert_image_data_to_rgba(data: gltf::image::Data) -> anyhow::Result<gltf::image::Data> {
    if data.format == gltf::image::Format::R8G8B8A8 {
        return Ok(data);
    }

    if data.format != gltf::image::Format::R8G8B8 {
        anyhow::bail!("Unsupported image format: {:?}", data.format);
    }

    let mut rgba_data = Vec::with_capacity(data.pixels.len() / 3 * 4);

    for pixel in data.pixels.chunks(3) {
        rgba_data.extend_from_slice(pixel);
        rgba_data.push(255);
    }

    Ok(gltf::image::Data {
        pixels: rgba_data,
        format: gltf::image::Format::R8G8B8A8,
        width: data.width,
        height: data.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_images_gain_an_opaque_alpha_channel() {
        let rgb = gltf::image::Data {
            pixels: vec![10, 20, 30, 40, 50, 60],
            format: gltf::image::Format::R8G8B8,
            width: 2,
            height: 1,
        };
        let rgba = convert_image_data_to_rgba(rgb).unwrap();
        assert_eq!(rgba.pixels, vec![10, 20, 30, 255, 40, 50, 60, 255]);
        assert_eq!(rgba.format, gltf::image::Format::R8G8B8A8);
    }

    #[test]
    fn other_formats_are_rejected() {
        let gray = gltf::image::Data {
            pixels: vec![1, 2],
            format: gltf::image::Format::R8,
            width: 2,
            height: 1,
        };
        assert!(convert_image_data_to_rgba(gray).is_err());
    }
}
