use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};
use bevy_egui::EguiContexts;
use std::f32::consts::{FRAC_PI_2, TAU};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(PostUpdate, camera_control_system);
    }
}

fn spawn_camera(mut commands: Commands) {
    let eye = Vec3::new(0.0, 3.0, 2.0);
    commands.spawn((
        Camera3d::default(),
        Projection::from(camera_projection()),
        Transform::from_translation(eye).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::looking_from(eye, Vec3::ZERO),
    ));
}

/// Point sprites take their world width from `clip_from_view[1][1]`, which
/// for this projection is `1 / tan(fov / 2)`.
pub fn camera_projection() -> PerspectiveProjection {
    PerspectiveProjection {
        fov: 75f32.to_radians(),
        near: 0.1,
        far: 100.0,
        ..default()
    }
}

/// Orbit controls with damping: input adds to a pending delta, and each frame
/// only a fraction of that delta is applied.
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_delta: f32,
    pitch_delta: f32,
    smooth_zoom_buffer: f32,
}

impl OrbitCamera {
    const DAMPING: f32 = 0.05;
    const MIN_DISTANCE: f32 = 0.5;
    const MAX_DISTANCE: f32 = 50.0;
    const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(Self::MIN_DISTANCE);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            smooth_zoom_buffer: 0.0,
        }
    }

    pub fn translation(&self) -> Vec3 {
        let direction = vec3(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + direction * self.distance
    }

    /// Queues a rotation from a mouse drag; a drag across the full viewport
    /// height turns the camera once around.
    pub fn rotate(&mut self, drag: Vec2, viewport_height: f32) {
        let scale = TAU / viewport_height.max(1.0);
        self.yaw_delta -= drag.x * scale;
        self.pitch_delta += drag.y * scale;
    }

    pub fn zoom(&mut self, amount: f32) {
        self.smooth_zoom_buffer += amount;
    }

    /// Applies one frame of the pending motion.
    pub fn step(&mut self) {
        self.yaw += self.yaw_delta * Self::DAMPING;
        self.pitch = (self.pitch + self.pitch_delta * Self::DAMPING)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.yaw_delta *= 1.0 - Self::DAMPING;
        self.pitch_delta *= 1.0 - Self::DAMPING;

        let zoom_amount = self.smooth_zoom_buffer * 0.2;
        self.distance = (self.distance * 0.95f32.powf(zoom_amount))
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
        self.smooth_zoom_buffer -= zoom_amount;
    }
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    windows: Query<&Window>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut orbit)) = query.single_mut() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    // the panel keeps its own pointer input
    let over_panel = contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area());

    let drag: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    if !over_panel && mouse_buttons.pressed(MouseButton::Left) {
        orbit.rotate(drag, window.height());
    }

    for ev in scroll_evr.read() {
        if over_panel {
            continue;
        }
        match ev.unit {
            MouseScrollUnit::Line => orbit.zoom(ev.y),
            MouseScrollUnit::Pixel => orbit.zoom(ev.y * 0.05),
        }
    }

    orbit.step();
    transform.translation = orbit.translation();
    transform.look_at(orbit.target, Vec3::Y);
}
