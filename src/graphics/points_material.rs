use super::shader_types::PointsParams;
use crate::prelude::*;
use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey},
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::{Indices, MeshVertexBufferLayoutRef, PrimitiveTopology},
        render_asset::RenderAssetUsages,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
        },
    },
};

const SHADER_ASSET_PATH: &str = "shaders/galaxy_points.wgsl";

/// Quad corners, expanded around the point centre in the vertex shader.
const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Turns a point cloud into a mesh of camera-facing quads. Every vertex of a
/// quad carries the point centre as its position.
pub fn build_point_mesh(cloud: &PointCloud) -> Mesh {
    let vertex_count = cloud.len() * CORNERS.len();

    let mut positions = Vec::with_capacity(vertex_count);
    let mut corners = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(cloud.len() * QUAD_INDICES.len());

    for (i, (position, color)) in cloud.positions.iter().zip(&cloud.colors).enumerate() {
        let base = (i * CORNERS.len()) as u32;
        for corner in CORNERS {
            positions.push(*position);
            corners.push(corner);
            colors.push([color[0], color[1], color[2], 1.0]);
        }
        indices.extend(QUAD_INDICES.iter().map(|index| base + index));
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

/// Additive, vertex-coloured point sprites that never write depth.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
#[bind_group_data(GalaxyPointsKey)]
pub struct GalaxyPointsMaterial {
    #[uniform(0)]
    pub params: PointsParams,
    pub size_attenuation: bool,
    alpha_mode: AlphaMode,
}

impl GalaxyPointsMaterial {
    pub fn new(config: &GalaxyConfig) -> Self {
        Self {
            params: PointsParams::read(config),
            size_attenuation: config.size_attenuation,
            alpha_mode: AlphaMode::Add,
        }
    }
}

impl Material for GalaxyPointsMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
            Mesh::ATTRIBUTE_COLOR.at_shader_location(2),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];

        if key.bind_group_data.size_attenuation {
            descriptor.vertex.shader_defs.push("SIZE_ATTENUATION".into());
        }
        descriptor.primitive.cull_mode = None;
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}

#[derive(Eq, PartialEq, Hash, Clone)]
pub struct GalaxyPointsKey {
    size_attenuation: bool,
}

impl From<&GalaxyPointsMaterial> for GalaxyPointsKey {
    fn from(material: &GalaxyPointsMaterial) -> Self {
        Self {
            size_attenuation: material.size_attenuation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn two_points() -> PointCloud {
        PointCloud {
            positions: vec![[1.0, 2.0, 3.0], [-4.0, 0.5, 0.0]],
            colors: vec![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    #[test]
    fn mesh_has_one_quad_per_point() {
        let mesh = build_point_mesh(&two_points());

        assert_eq!(mesh.count_vertices(), 8);
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        assert_eq!(indices, &vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn quad_vertices_share_point_centre_and_colour() {
        let mesh = build_point_mesh(&two_points());

        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        let Some(VertexAttributeValues::Float32x4(colors)) = mesh.attribute(Mesh::ATTRIBUTE_COLOR)
        else {
            panic!("missing colors");
        };

        assert!(positions[..4].iter().all(|p| *p == [1.0, 2.0, 3.0]));
        assert!(positions[4..].iter().all(|p| *p == [-4.0, 0.5, 0.0]));
        assert!(colors[4..].iter().all(|c| *c == [0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn material_follows_config() {
        let config = GalaxyConfig {
            size: 0.05,
            size_attenuation: false,
            ..default()
        };
        let material = GalaxyPointsMaterial::new(&config);

        assert_eq!(material.params.size, 0.05);
        assert!(!GalaxyPointsKey::from(&material).size_attenuation);
        assert_eq!(material.alpha_mode(), AlphaMode::Add);
    }
}
