use bevy::prelude::*;

mod galaxy_config;
mod galaxy_generator;
mod point_cloud;

pub use galaxy_config::{GalaxyAnimation, GalaxyConfig, GalaxyConfigPlugin};
pub use galaxy_generator::{GalaxyGenerator, GalaxyGeneratorPlugin};
pub use point_cloud::{generate_points, PointCloud};

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((GalaxyConfigPlugin, GalaxyGeneratorPlugin));
    }
}
