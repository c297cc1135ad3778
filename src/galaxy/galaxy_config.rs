use bevy::prelude::*;

/// Parameters of the procedural galaxy. Editing any field through the panel
/// bumps `generation`, which causes the point cloud to be rebuilt.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct GalaxyConfig {
    pub generation: i32,

    pub count: u32,
    pub size: f32,
    pub radius: f32,
    pub radius_bias: f32,
    pub branches: u32,
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Srgba,
    pub outside_color: Srgba,
    pub size_attenuation: bool,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            generation: 1,
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            radius_bias: 2.5,
            branches: 3,
            spin: 1.0,
            randomness: 0.9,
            randomness_power: 3.0,
            inside_color: Srgba::rgb_u8(0xff, 0xa5, 0x00),
            outside_color: Srgba::rgb_u8(0x00, 0x00, 0xff),
            size_attenuation: true,
        }
    }
}

impl GalaxyConfig {
    pub const MIN: Self = Self {
        generation: 0,
        count: 100,
        size: 0.001,
        radius: 0.001,
        radius_bias: 0.1,
        branches: 2,
        spin: -5.0,
        randomness: 0.0,
        randomness_power: 0.01,
        inside_color: Srgba::BLACK,
        outside_color: Srgba::BLACK,
        size_attenuation: false,
    };
    pub const MAX: Self = Self {
        generation: i32::MAX,
        count: 1_000_000,
        size: 0.1,
        radius: 20.0,
        radius_bias: 10.0,
        branches: 20,
        spin: 5.0,
        randomness: 2.0,
        randomness_power: 10.0,
        inside_color: Srgba::WHITE,
        outside_color: Srgba::WHITE,
        size_attenuation: true,
    };
    /// Slider increments, only the numeric fields are meaningful.
    pub const STEP: Self = Self {
        generation: 1,
        count: 100,
        size: 0.001,
        radius: 0.01,
        radius_bias: 0.1,
        branches: 1,
        spin: 0.001,
        randomness: 0.001,
        randomness_power: 0.001,
        inside_color: Srgba::NONE,
        outside_color: Srgba::NONE,
        size_attenuation: true,
    };

    /// Copy of the config with every numeric field forced into `[MIN, MAX]`.
    pub fn clamped(&self) -> Self {
        let (min, max) = (&Self::MIN, &Self::MAX);
        Self {
            generation: self.generation,
            count: self.count.clamp(min.count, max.count),
            size: self.size.clamp(min.size, max.size),
            radius: self.radius.clamp(min.radius, max.radius),
            radius_bias: self.radius_bias.clamp(min.radius_bias, max.radius_bias),
            branches: self.branches.clamp(min.branches, max.branches),
            spin: self.spin.clamp(min.spin, max.spin),
            randomness: self.randomness.clamp(min.randomness, max.randomness),
            randomness_power: self
                .randomness_power
                .clamp(min.randomness_power, max.randomness_power),
            inside_color: self.inside_color,
            outside_color: self.outside_color,
            size_attenuation: self.size_attenuation,
        }
    }

    /// Same parameters, ignoring the generation counter.
    pub fn same_parameters(&self, other: &Self) -> bool {
        Self {
            generation: other.generation,
            ..self.clone()
        } == *other
    }
}

/// Last committed parameter set, used to tell real edits from no-op writes.
#[derive(Resource)]
struct GalaxyConfigOld(GalaxyConfig);

impl Default for GalaxyConfigOld {
    fn default() -> Self {
        Self(GalaxyConfig {
            generation: -1,
            ..default()
        })
    }
}

/// Spin of the whole point cloud about the Y axis. Not part of the generated
/// geometry, so changing it never triggers a rebuild.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct GalaxyAnimation {
    pub rotation_speed: f32,
}

impl Default for GalaxyAnimation {
    fn default() -> Self {
        Self {
            rotation_speed: 0.5,
        }
    }
}

pub struct GalaxyConfigPlugin;

impl Plugin for GalaxyConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalaxyConfig>()
            .init_resource::<GalaxyAnimation>()
            .insert_resource(GalaxyConfigOld::default())
            .add_systems(PreUpdate, apply_config_updates);
    }
}

fn apply_config_updates(
    mut galaxy_config_old: ResMut<GalaxyConfigOld>,
    mut galaxy_config: ResMut<GalaxyConfig>,
) {
    if !galaxy_config.is_changed() {
        return;
    }
    let clamped = galaxy_config.clamped();
    if clamped != *galaxy_config {
        *galaxy_config = clamped;
    }
    if galaxy_config.same_parameters(&galaxy_config_old.0) {
        // a forced regeneration moves the counter on its own
        if galaxy_config.generation == galaxy_config_old.0.generation {
            return;
        }
    } else if galaxy_config.generation == galaxy_config_old.0.generation {
        galaxy_config.generation += 1;
    }
    galaxy_config_old.0 = galaxy_config.clone();
}
