use super::{generate_points, GalaxyAnimation, GalaxyConfig};
use crate::graphics::{build_point_mesh, GalaxyPointsMaterial};
use bevy::{
    ecs::system::SystemParam,
    pbr::{NotShadowCaster, NotShadowReceiver},
    prelude::*,
    render::view::NoFrustumCulling,
};
use rand::prelude::*;
use std::time::Instant;

pub struct GalaxyGeneratorPlugin;

impl Plugin for GalaxyGeneratorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalaxyGenerator>()
            .add_systems(Update, (regenerate_galaxy, spin_galaxy).chain());
    }
}

/// Marks the entity displaying the current point cloud.
#[derive(Component)]
pub struct GalaxyPoints;

/// Everything the renderer holds for one generated cloud.
#[derive(Debug)]
pub struct PointCloudHandle {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<GalaxyPointsMaterial>,
    pub count: u32,
}

#[derive(SystemParam)]
pub struct PointCloudAssets<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<GalaxyPointsMaterial>>,
}

/// Owns the most recently generated cloud. Each rebuild hands the previous
/// cloud back to the renderer before the new one is built.
#[derive(Resource)]
pub struct GalaxyGenerator {
    generation: i32,
    current: Option<PointCloudHandle>,
    generated: u32,
    released: u32,
}

impl Default for GalaxyGenerator {
    fn default() -> Self {
        Self {
            generation: -1,
            current: None,
            generated: 0,
            released: 0,
        }
    }
}

impl GalaxyGenerator {
    pub fn current(&self) -> Option<&PointCloudHandle> {
        self.current.as_ref()
    }

    pub fn generated(&self) -> u32 {
        self.generated
    }

    pub fn released(&self) -> u32 {
        self.released
    }

    /// Despawns the current cloud and drops its mesh and material assets.
    pub fn release(&mut self, assets: &mut PointCloudAssets) {
        let Some(old) = self.current.take() else {
            return;
        };
        assets.commands.entity(old.entity).despawn();
        assets.meshes.remove(&old.mesh);
        assets.materials.remove(&old.material);
        self.released += 1;
        debug!("Released galaxy with {} points", old.count);
    }

    pub fn regenerate<R: Rng>(
        &mut self,
        config: &GalaxyConfig,
        rng: &mut R,
        assets: &mut PointCloudAssets,
    ) -> Entity {
        self.release(assets);

        let start = Instant::now();
        let cloud = generate_points(config, rng);
        let mesh = assets.meshes.add(build_point_mesh(&cloud));
        let material = assets.materials.add(GalaxyPointsMaterial::new(config));

        let entity = assets
            .commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::IDENTITY,
                GalaxyPoints,
                NoFrustumCulling,
                NotShadowCaster,
                NotShadowReceiver,
            ))
            .id();

        self.current = Some(PointCloudHandle {
            entity,
            mesh,
            material,
            count: config.count,
        });
        self.generation = config.generation;
        self.generated += 1;

        info!(
            "Generated galaxy {} with {} points in {:.1?}",
            config.generation,
            config.count,
            start.elapsed()
        );
        entity
    }
}

fn regenerate_galaxy(
    galaxy_config: Res<GalaxyConfig>,
    mut generator: ResMut<GalaxyGenerator>,
    mut assets: PointCloudAssets,
) {
    if generator.generation == galaxy_config.generation {
        return;
    }
    let mut rng = rand::rng();
    generator.regenerate(&galaxy_config, &mut rng, &mut assets);
}

fn spin_galaxy(
    time: Res<Time>,
    animation: Res<GalaxyAnimation>,
    mut query: Query<&mut Transform, With<GalaxyPoints>>,
) {
    for mut transform in &mut query {
        transform.rotation = Quat::from_rotation_y(time.elapsed_secs() * animation.rotation_speed);
    }
}
