use crate::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

pub struct FpsWidgetPlugin;

impl Plugin for FpsWidgetPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_widget)
            .add_systems(Update, update_widget_system)
            .add_plugins(FrameTimeDiagnosticsPlugin::default());
    }
}

#[derive(Component)]
struct FpsText;

#[derive(Component)]
struct PointCountText;

fn setup_widget(mut commands: Commands) {
    let font = TextFont {
        font_size: 16.0,
        ..default()
    };
    commands
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                position_type: PositionType::Absolute,
                width: Val::Px(240.),
                right: Val::Percent(1.),
                top: Val::Percent(1.),
                padding: UiRect::all(Val::Px(4.0)),
                ..default()
            },
            BackgroundColor(Color::linear_rgba(0.0, 0.03, 0.08, 0.5)),
            GlobalZIndex(i32::MAX - 1),
        ))
        .with_children(|parent| {
            parent.spawn((FpsText, Text(" N/A".to_string()), font.clone()));
            parent.spawn((PointCountText, Text::default(), font));
        });
}

fn format_fps(fps: f64, frame_time: f64) -> String {
    let fps_str = format!("{fps:.1} ({frame_time:.2} ms)");
    format!("{:>6} {:<8}", "FPS: ", fps_str)
}

fn update_widget_system(
    diagnostics: Res<DiagnosticsStore>,
    generator: Res<GalaxyGenerator>,
    mut fps_query: Query<&mut Text, (With<FpsText>, Without<PointCountText>)>,
    mut count_query: Query<&mut Text, (With<PointCountText>, Without<FpsText>)>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(|frame_time| frame_time.smoothed())
        .unwrap_or(0.0);

    for mut text in &mut fps_query {
        text.0 = format_fps(fps, frame_time);
    }

    if generator.is_changed() {
        let count = generator.current().map_or(0, |current| current.count);
        for mut text in &mut count_query {
            text.0 = format!("{:>6} {count}", "Points:");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_line_shows_rate_and_frame_time() {
        assert_eq!(format_fps(59.94, 16.683), " FPS:  59.9 (16.68 ms)");
    }
}
