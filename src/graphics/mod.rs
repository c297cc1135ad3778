use bevy::prelude::*;

mod points_material;
mod shader_types;

pub use points_material::{build_point_mesh, GalaxyPointsMaterial};

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<GalaxyPointsMaterial>::default())
            .insert_resource(ClearColor(Color::BLACK));
    }
}
