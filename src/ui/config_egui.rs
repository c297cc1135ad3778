use crate::prelude::*;
use bevy::{color::ColorToPacked, prelude::*};
use bevy_egui::{egui, EguiContexts};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalaxyConfigUi>()
            .add_systems(Startup, configure_visuals_system)
            .add_systems(
                Update,
                (
                    sync_draft_system.run_if(resource_changed::<GalaxyConfig>),
                    ui_system,
                )
                    .chain(),
            );
    }
}

/// Values shown in the panel. They are copied into `GalaxyConfig` only once
/// an edit is finished, so a drag rebuilds the galaxy once.
#[derive(Resource, Default)]
pub struct GalaxyConfigUi {
    pub config: GalaxyConfig,
    pending: bool,
}

impl GalaxyConfigUi {
    /// Panel values with the generation of the live config.
    pub fn committed(&self, live: &GalaxyConfig) -> GalaxyConfig {
        GalaxyConfig {
            generation: live.generation,
            ..self.config.clone()
        }
    }

    /// Edits stay pending while any pointer button is held, so a press, a
    /// drag and a colour picker gesture each finish on release.
    fn settle(&mut self, changed: bool, pointer_down: bool) -> bool {
        self.pending |= changed;
        if self.pending && !pointer_down {
            self.pending = false;
            return true;
        }
        false
    }

    /// Shows the editing widgets for the draft. Returns true on the frame an
    /// edit is finished.
    pub fn edit(
        &mut self,
        ui: &mut egui::Ui,
        add_contents: impl FnOnce(&mut GalaxyConfig, &mut egui::Ui) -> bool,
    ) -> bool {
        let changed = add_contents(&mut self.config, ui);
        let pointer_down = ui.ctx().input(|i| i.pointer.any_down());
        self.settle(changed, pointer_down)
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    ctx.set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

fn sync_draft_system(galaxy_config: Res<GalaxyConfig>, mut draft: ResMut<GalaxyConfigUi>) {
    draft.config = galaxy_config.clone();
}

fn color_edit(ui: &mut egui::Ui, color: &mut Srgba, label: &str) -> egui::Response {
    let [r, g, b, _] = color.to_u8_array();
    let mut rgb = [r, g, b];
    let response = ui
        .horizontal(|ui| {
            let response = ui.color_edit_button_srgb(&mut rgb);
            ui.label(label);
            response
        })
        .inner;
    if response.changed() {
        *color = Srgba::rgb_u8(rgb[0], rgb[1], rgb[2]);
    }
    response
}

fn parameter_ui(config: &mut GalaxyConfig, ui: &mut egui::Ui) -> bool {
    let (min, max, step) = (
        &GalaxyConfig::MIN,
        &GalaxyConfig::MAX,
        &GalaxyConfig::STEP,
    );
    let responses = [
        ui.add(
            egui::Slider::new(&mut config.count, min.count..=max.count)
                .step_by(step.count as f64)
                .logarithmic(true)
                .text("Count"),
        ),
        ui.add(
            egui::Slider::new(&mut config.size, min.size..=max.size)
                .step_by(step.size as f64)
                .text("Size"),
        ),
        ui.add(
            egui::Slider::new(&mut config.radius, min.radius..=max.radius)
                .step_by(step.radius as f64)
                .text("Radius"),
        ),
        ui.add(
            egui::Slider::new(&mut config.radius_bias, min.radius_bias..=max.radius_bias)
                .step_by(step.radius_bias as f64)
                .text("Radius Bias"),
        ),
        ui.add(
            egui::Slider::new(&mut config.branches, min.branches..=max.branches)
                .step_by(step.branches as f64)
                .text("Branches"),
        ),
        ui.add(
            egui::Slider::new(&mut config.spin, min.spin..=max.spin)
                .step_by(step.spin as f64)
                .text("Spin"),
        ),
        ui.add(
            egui::Slider::new(&mut config.randomness, min.randomness..=max.randomness)
                .step_by(step.randomness as f64)
                .text("Randomness"),
        ),
        ui.add(
            egui::Slider::new(
                &mut config.randomness_power,
                min.randomness_power..=max.randomness_power,
            )
            .step_by(step.randomness_power as f64)
            .text("Randomness Power"),
        ),
        color_edit(ui, &mut config.inside_color, "Inside Color"),
        color_edit(ui, &mut config.outside_color, "Outside Color"),
        ui.checkbox(&mut config.size_attenuation, "Size Attenuation"),
    ];

    responses.iter().any(egui::Response::changed)
}

fn ui_system(
    mut contexts: EguiContexts,
    mut draft: ResMut<GalaxyConfigUi>,
    mut galaxy_config: ResMut<GalaxyConfig>,
    mut animation: ResMut<GalaxyAnimation>,
    generator: Res<GalaxyGenerator>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    let mut commit = false;
    let mut regenerate = false;

    egui::SidePanel::left("side_panel")
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");

            egui::CollapsingHeader::new("Generation")
                .default_open(true)
                .show(ui, |ui| {
                    commit = draft.edit(ui, parameter_ui);
                    regenerate = ui.button("Regenerate").clicked();
                });
            ui.separator();

            egui::CollapsingHeader::new("Animation").show(ui, |ui| {
                ui.add(
                    egui::Slider::new(&mut animation.rotation_speed, -2.0..=2.0)
                        .text("Rotation Speed"),
                );
            });
            ui.separator();

            if let Some(current) = generator.current() {
                ui.label(format!("Points: {}", current.count));
            }
            ui.label(format!(
                "Built: {}  Released: {}",
                generator.generated(),
                generator.released()
            ));
        });

    if commit {
        let committed = draft.committed(&galaxy_config);
        galaxy_config.set_if_neq(committed);
    }
    if regenerate {
        galaxy_config.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Event, Modifiers, PointerButton, Pos2, RawInput, Rect};

    /// Runs egui frames over a draft, counting finished edits.
    struct PanelHarness {
        ctx: egui::Context,
        draft: GalaxyConfigUi,
        commits: u32,
        widget_rect: Rect,
    }

    impl PanelHarness {
        fn new() -> Self {
            Self {
                ctx: egui::Context::default(),
                draft: GalaxyConfigUi::default(),
                commits: 0,
                widget_rect: Rect::NOTHING,
            }
        }

        fn frame(
            &mut self,
            events: Vec<Event>,
            mut add_contents: impl FnMut(&mut GalaxyConfig, &mut egui::Ui) -> egui::Response,
        ) {
            let input = RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0))),
                events,
                ..Default::default()
            };
            let (draft, commits, widget_rect) =
                (&mut self.draft, &mut self.commits, &mut self.widget_rect);
            let _ = self.ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    let committed = draft.edit(ui, |config, ui| {
                        let response = add_contents(config, ui);
                        *widget_rect = response.rect;
                        response.changed()
                    });
                    if committed {
                        *commits += 1;
                    }
                });
            });
        }
    }

    fn press(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    fn spin_slider(config: &mut GalaxyConfig, ui: &mut egui::Ui) -> egui::Response {
        ui.add(egui::Slider::new(&mut config.spin, -5.0..=5.0).show_value(false))
    }

    #[test]
    fn committed_keeps_live_generation() {
        let draft = GalaxyConfigUi {
            config: GalaxyConfig {
                generation: 3,
                spin: -1.5,
                ..default()
            },
            ..default()
        };
        let live = GalaxyConfig {
            generation: 9,
            ..default()
        };

        let committed = draft.committed(&live);
        assert_eq!(committed.generation, 9);
        assert_eq!(committed.spin, -1.5);
    }

    #[test]
    fn held_changes_settle_once_on_release() {
        let mut draft = GalaxyConfigUi::default();

        let held: Vec<bool> = (0..20).map(|_| draft.settle(true, true)).collect();
        assert!(held.iter().all(|committed| !committed));
        assert!(draft.settle(false, false));
        assert!(!draft.settle(false, false));
    }

    #[test]
    fn change_without_pointer_settles_immediately() {
        let mut draft = GalaxyConfigUi::default();

        assert!(draft.settle(true, false));
        assert!(!draft.settle(false, false));
    }

    #[test]
    fn slider_press_and_drag_commits_once() {
        let mut panel = PanelHarness::new();
        panel.frame(vec![], spin_slider);
        let rect = panel.widget_rect;
        let start = rect.left_center() + egui::vec2(4.0, 0.0);

        panel.frame(vec![Event::PointerMoved(start), press(start, true)], spin_slider);
        for step in 1..=20 {
            let pos = start + egui::vec2(step as f32 * rect.width() / 25.0, 0.0);
            panel.frame(vec![Event::PointerMoved(pos)], spin_slider);
        }
        assert_eq!(panel.commits, 0);

        let end = start + egui::vec2(rect.width() * 0.8, 0.0);
        panel.frame(vec![press(end, false)], spin_slider);
        panel.frame(vec![], spin_slider);

        assert_eq!(panel.commits, 1);
        assert!(panel.draft.config.spin > GalaxyConfig::default().spin);
    }

    #[test]
    fn picker_style_gesture_commits_once() {
        // reports a change on every held frame without ever being dragged,
        // the way a colour button does while its popup is edited
        let picker = |config: &mut GalaxyConfig, ui: &mut egui::Ui| {
            let mut response =
                ui.allocate_response(egui::vec2(40.0, 20.0), egui::Sense::click());
            if ui.ctx().input(|i| i.pointer.primary_down()) {
                config.inside_color.red = (config.inside_color.red + 0.01).min(1.0);
                response.mark_changed();
            }
            response
        };

        let mut panel = PanelHarness::new();
        panel.frame(vec![], picker);
        let pos = panel.widget_rect.center();

        panel.frame(vec![Event::PointerMoved(pos), press(pos, true)], picker);
        for step in 1..=20 {
            let moved = pos + egui::vec2(step as f32, 0.0);
            panel.frame(vec![Event::PointerMoved(moved)], picker);
        }
        assert_eq!(panel.commits, 0);

        panel.frame(vec![press(pos, false)], picker);
        panel.frame(vec![], picker);
        assert_eq!(panel.commits, 1);
    }

    #[test]
    fn checkbox_click_commits_on_release() {
        let checkbox = |config: &mut GalaxyConfig, ui: &mut egui::Ui| {
            ui.checkbox(&mut config.size_attenuation, "Size Attenuation")
        };

        let mut panel = PanelHarness::new();
        panel.frame(vec![], checkbox);
        let pos = panel.widget_rect.left_center() + egui::vec2(6.0, 0.0);

        panel.frame(vec![Event::PointerMoved(pos), press(pos, true)], checkbox);
        assert_eq!(panel.commits, 0);
        panel.frame(vec![press(pos, false)], checkbox);

        assert_eq!(panel.commits, 1);
        assert!(!panel.draft.config.size_attenuation);
    }

    #[test]
    fn draft_follows_committed_config() {
        let mut app = App::new();
        app.init_resource::<GalaxyConfig>()
            .init_resource::<GalaxyConfigUi>()
            .add_systems(
                Update,
                sync_draft_system.run_if(resource_changed::<GalaxyConfig>),
            );
        app.update();

        app.world_mut().resource_mut::<GalaxyConfig>().radius = 12.0;
        app.update();

        assert_eq!(app.world().resource::<GalaxyConfigUi>().config.radius, 12.0);
    }
}
