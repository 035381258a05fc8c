// Main tally window

use crate::counter::{Confirm, CounterEngine};
use crate::export::{CsvExporter, ExportKind, ExportSink, export_file_name};
use crate::session::store::{LoadOutcome, StateStore};
use crate::session::types::Category;
use crate::ui::notification::{Notification, NotificationLevel};
use crate::ui::pulse::PulseTracker;
use crate::ui::view::TallyView;
use eframe::egui;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_NOTIFICATIONS: usize = 10;
const NOTIFICATION_TTL_MS: u64 = 5_000;
const PULSE_FRAME: Duration = Duration::from_millis(16);

/// Reset confirmation through a native modal message box
#[derive(Debug, Default)]
pub struct DialogConfirm;

impl Confirm for DialogConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let result = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Reset")
            .set_description(prompt)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        matches!(result, rfd::MessageDialogResult::Yes)
    }
}

/// Binds the counter engine to the window
///
/// The `on_*` handlers are what the buttons call; they never panic and turn
/// storage or export failures into status bar notifications. Handlers that
/// can mutate the session return whether it changed.
pub struct TallyApp<S: StateStore, K: ExportSink> {
    engine: CounterEngine<S>,
    exporter: CsvExporter,
    sink: K,
    confirm: Box<dyn Confirm>,
    pulses: PulseTracker,
    notifications: VecDeque<Notification>,
}

impl<S: StateStore, K: ExportSink> TallyApp<S, K> {
    pub fn new(engine: CounterEngine<S>, sink: K, pulse_duration: Duration) -> Self {
        let load_warning = match engine.load_outcome() {
            LoadOutcome::Migrated => {
                Some("Loaded counts-only data; the event history starts empty")
            }
            LoadOutcome::Discarded => Some("Saved data was unreadable and has been ignored"),
            LoadOutcome::Empty | LoadOutcome::Loaded => None,
        };

        let mut app = Self {
            engine,
            exporter: CsvExporter::new(),
            sink,
            confirm: Box::new(DialogConfirm),
            pulses: PulseTracker::new(pulse_duration),
            notifications: VecDeque::new(),
        };
        if let Some(message) = load_warning {
            app.notify(Notification::warning(message.to_string()));
        }
        app
    }

    /// Replace the reset confirmation (the default is a native dialog)
    pub fn with_confirm(mut self, confirm: Box<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn engine(&self) -> &CounterEngine<S> {
        &self.engine
    }

    pub fn view(&self) -> TallyView {
        TallyView::from_state(self.engine.state())
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Always changes the session; a failed write still leaves the new count
    pub fn on_category(&mut self, category: Category, now: Instant) -> bool {
        if let Err(e) = self.engine.record_event(category) {
            self.notify(Notification::error(format!("Could not save: {}", e)));
        }
        self.pulses.trigger(category, now);
        true
    }

    pub fn on_undo(&mut self) -> bool {
        match self.engine.undo_last() {
            Ok(undone) => undone.is_some(),
            // The event was already removed in memory
            Err(e) => {
                self.notify(Notification::error(format!("Could not save: {}", e)));
                true
            }
        }
    }

    pub fn on_reset(&mut self) -> bool {
        match self.engine.reset_all(self.confirm.as_mut()) {
            Ok(true) => {
                self.notify(Notification::info("All counts cleared".to_string()));
                true
            }
            Ok(false) => false,
            Err(e) => {
                self.notify(Notification::error(format!("Could not save: {}", e)));
                true
            }
        }
    }

    pub fn on_export(&mut self, kind: ExportKind) {
        let file_name = export_file_name(kind, chrono::Utc::now());
        let result = self
            .exporter
            .render(self.engine.state(), kind)
            .and_then(|bytes| self.sink.deliver(&file_name, &bytes));

        match result {
            Ok(path) => self.notify(Notification::info(format!(
                "Exported {}",
                path.display()
            ))),
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.notify(Notification::error(format!("Export failed: {}", e)));
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        if self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
    }

    fn draw_totals(&self, ui: &mut egui::Ui, view: &TallyView) {
        ui.vertical_centered(|ui| {
            ui.label("Total");
            ui.label(egui::RichText::new(view.total.to_string()).size(48.0).strong());
            ui.horizontal(|ui| {
                ui.label(format!("Folded: {}", view.folded));
                ui.add_space(20.0);
                ui.label(format!("Unfolded: {}", view.unfolded));
            });
        });
    }

    fn draw_counters(&mut self, ui: &mut egui::Ui, view: &TallyView) -> bool {
        let now = Instant::now();
        let mut pressed = None;

        egui::Grid::new("counter_grid")
            .num_columns(2)
            .spacing([12.0, 12.0])
            .show(ui, |ui| {
                for (i, (category, count)) in view.counts.iter().enumerate() {
                    let base = if category.is_folded() {
                        egui::Color32::from_rgb(70, 110, 170)
                    } else {
                        egui::Color32::from_rgb(160, 100, 60)
                    };
                    let fill = blend(base, egui::Color32::WHITE, self.pulses.intensity(*category, now));

                    let label = egui::RichText::new(format!("{}\n{}", category.display_name(), count))
                        .size(22.0)
                        .color(egui::Color32::WHITE);
                    let button = egui::Button::new(label)
                        .fill(fill)
                        .min_size(egui::vec2(200.0, 110.0));

                    if ui.add(button).clicked() {
                        pressed = Some(*category);
                    }
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });

        match pressed {
            Some(category) => self.on_category(category, now),
            None => false,
        }
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui, view: &TallyView) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            if ui.add_enabled(view.undo_enabled, egui::Button::new("↶ Undo")).clicked() {
                changed |= self.on_undo();
            }
            if ui.button("Reset").clicked() {
                changed |= self.on_reset();
            }
            if ui.button("Export CSV").clicked() {
                self.on_export(ExportKind::Log);
            }
            if ui
                .button("Export summary")
                .on_hover_text("Counts only, without the event log")
                .clicked()
            {
                self.on_export(ExportKind::Report);
            }
        });
        changed
    }

    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            let recent: Vec<&Notification> = self
                .notifications
                .iter()
                .rev()
                .filter(|n| n.is_recent(NOTIFICATION_TTL_MS))
                .take(3)
                .collect();

            if recent.is_empty() {
                ui.label(format!("{} events recorded", self.engine.log().len()));
                return;
            }

            for notification in recent {
                let color = match notification.level {
                    NotificationLevel::Info => egui::Color32::from_rgb(100, 150, 255),
                    NotificationLevel::Warning => egui::Color32::from_rgb(255, 165, 0),
                    NotificationLevel::Error => egui::Color32::RED,
                };
                ui.colored_label(color, &notification.message);
                ui.add_space(10.0);
            }
        });
    }
}

fn blend(from: egui::Color32, to: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    egui::Color32::from_rgb(mix(from.r(), to.r()), mix(from.g(), to.g()), mix(from.b(), to.b()))
}

impl<S: StateStore, K: ExportSink> eframe::App for TallyApp<S, K> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut changed = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Voting Tally");
            ui.separator();

            let view = self.view();
            self.draw_totals(ui, &view);
            ui.add_space(10.0);
            changed |= self.draw_counters(ui, &view);
            ui.add_space(10.0);

            // Buttons above may have changed the session
            let view = self.view();
            changed |= self.draw_controls(ui, &view);

            ui.add_space(10.0);
            self.draw_status_bar(ui);
        });

        // Labels drawn earlier in this frame show the old counts
        if changed {
            ctx.request_repaint();
        }

        if self.pulses.is_animating(Instant::now()) {
            ctx.request_repaint_after(PULSE_FRAME);
        } else if self.notifications.iter().any(|n| n.is_recent(NOTIFICATION_TTL_MS)) {
            // Let expired notifications disappear without input
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}
