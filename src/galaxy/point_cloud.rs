use super::GalaxyConfig;
use bevy::prelude::*;
use rand::prelude::*;
use std::f32::consts::TAU;

/// Generated particles: index-aligned positions and linear RGB colours.
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as a flat `x, y, z, x, y, z, ...` buffer.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colours as a flat `r, g, b, r, g, b, ...` buffer.
    pub fn color_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Angle of the arm a point belongs to. Points are dealt to arms round-robin
/// by index, so `i` and `i + branches` always share an arm.
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    (index % branches) as f32 / branches as f32 * TAU
}

/// Uniform direction on the unit sphere, scaled by `length`.
///
/// The polar angle comes from `acos(2u - 1)` so the directions do not bunch up
/// at the poles.
fn sample_sphere_offset<R: Rng>(rng: &mut R, length: f32) -> Vec3 {
    let azimuth = rng.random::<f32>() * TAU;
    let polar = (rng.random::<f32>() * 2.0 - 1.0).acos();

    vec3(
        polar.sin() * azimuth.cos(),
        polar.sin() * azimuth.sin(),
        polar.cos(),
    ) * length
}

/// Interpolates between two linear colours, exact at both ends.
pub fn mix_color(inside: LinearRgba, outside: LinearRgba, t: f32) -> [f32; 3] {
    let s = 1.0 - t;
    [
        inside.red * s + outside.red * t,
        inside.green * s + outside.green * t,
        inside.blue * s + outside.blue * t,
    ]
}

/// Builds a full point cloud for `config`. Every point takes fresh uniform
/// draws for its radius, jitter direction and jitter length.
pub fn generate_points<R: Rng>(config: &GalaxyConfig, rng: &mut R) -> PointCloud {
    let count = config.count as usize;
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);

    let inside = LinearRgba::from(config.inside_color);
    let outside = LinearRgba::from(config.outside_color);

    for i in 0..config.count {
        let radius = rng.random::<f32>().powf(config.radius_bias) * config.radius;

        let spin_angle = radius * config.spin;
        let angle = branch_angle(i, config.branches) + spin_angle;

        let jitter_length =
            rng.random::<f32>().powf(config.randomness_power) * config.randomness;
        let jitter = sample_sphere_offset(rng, jitter_length);

        positions.push([
            angle.cos() * radius + jitter.x,
            jitter.y,
            angle.sin() * radius + jitter.z,
        ]);
        colors.push(mix_color(inside, outside, radius / config.radius));
    }

    PointCloud { positions, colors }
}
