use crate::prelude::*;
use bevy::{prelude::*, render::render_resource::ShaderType};

// Duplicated in galaxy_points.wgsl, so make sure to update both
#[derive(ShaderType, Clone, Copy, Debug, Default, PartialEq)]
pub struct PointsParams {
    pub size: f32,
    pad: Vec3,
}

impl PointsParams {
    pub fn read(config: &GalaxyConfig) -> Self {
        Self {
            size: config.size,
            pad: Vec3::ZERO,
        }
    }
}
