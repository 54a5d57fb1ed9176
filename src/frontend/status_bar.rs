//! Status bar panel, bottom bar showing session status and errors.

use egui::{Color32, RichText, Ui};

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub status: &'a str,
    pub selection_label: &'a str,
    pub target_count: usize,
    pub frame: f64,
    pub last_error: Option<&'a str>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label(RichText::new(ctx.status).small().color(Color32::from_gray(136)));

        ui.separator();
        ui.label(RichText::new(ctx.selection_label).small());

        ui.separator();
        let target_color = if ctx.target_count > 0 {
            Color32::from_rgb(100, 255, 100)
        } else {
            Color32::GRAY
        };
        ui.colored_label(
            target_color,
            RichText::new(format!("Targets: {}", ctx.target_count)).small(),
        );

        ui.separator();
        ui.label(RichText::new(format!("Frame: {}", ctx.frame)).small());

        if let Some(error) = ctx.last_error {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(Color32::RED, RichText::new(error).small());
            });
        }
    });
}
