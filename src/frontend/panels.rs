//! Panel components for the transfer panel UI
//!
//! Each panel renders one section of the window and returns the
//! [`AppAction`]s the user triggered.
//!
//! # Panels
//!
//! - [`SourcePanel`] - Source path field with pick and clear buttons
//! - [`ParameterTablePanel`] - Filter bar, check buttons and the parameter table
//! - [`TargetPanel`] - Target node list
//! - [`OptionsPanel`] - Transfer option checkboxes
//! - [`ScenePanel`] - Node list standing in for the host's network editor

use std::collections::BTreeSet;

use crate::session::TransferSession;
use crate::transfer::TransferOptions;
use crate::types::NodeId;
use egui::{Color32, RichText, Ui};

use super::state::AppAction;

/// Renders the source node picker
pub struct SourcePanel;

impl SourcePanel {
    pub fn render(ui: &mut Ui, path_input: &mut String, invalid: bool) -> Vec<AppAction> {
        let mut actions = Vec::new();
        ui.horizontal(|ui| {
            ui.add_sized([80.0, 20.0], egui::Label::new("Source Node:"));

            let mut edit = egui::TextEdit::singleline(path_input)
                .hint_text("Enter node path or pick from selection...")
                .desired_width(ui.available_width() - 150.0);
            if invalid {
                edit = edit.background_color(Color32::from_rgb(0x66, 0x22, 0x22));
            }
            let response = ui.add(edit);
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                actions.push(AppAction::SetSourcePath(path_input.clone()));
            }

            if ui
                .button("◎ Pick")
                .on_hover_text("Pick from current network selection")
                .clicked()
            {
                actions.push(AppAction::PickSource);
            }
            if ui.button("✕").on_hover_text("Clear selection").clicked() {
                actions.push(AppAction::ClearSource);
            }
        });
        actions
    }
}

/// Display data for one visible row, copied out so the table can be
/// mutated after rendering
struct RowView {
    name: String,
    label: String,
    value: String,
    status: String,
    tooltip: String,
    checked: bool,
    modified: bool,
    driven: bool,
}

const MODIFIED_COLOR: Color32 = Color32::from_rgb(255, 204, 102);
const DRIVEN_COLOR: Color32 = Color32::from_rgb(150, 200, 255);

/// Value column tint; animated and expression-driven rows win over modified
fn value_color(modified: bool, driven: bool) -> Option<Color32> {
    if driven {
        Some(DRIVEN_COLOR)
    } else if modified {
        Some(MODIFIED_COLOR)
    } else {
        None
    }
}

/// Renders the filter bar and the parameter table
pub struct ParameterTablePanel;

impl ParameterTablePanel {
    pub fn render(ui: &mut Ui, session: &mut TransferSession) -> Vec<AppAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.label("Filter:");
            let mut filter = session.table().filter().to_string();
            if ui
                .add(
                    egui::TextEdit::singleline(&mut filter)
                        .hint_text("Type to filter parameters...")
                        .desired_width(ui.available_width() - 260.0),
                )
                .changed()
            {
                session.table_mut().set_filter(filter);
            }

            let mut only_modified = session.table().show_only_modified();
            if ui.checkbox(&mut only_modified, "Show only modified").changed() {
                session.table_mut().set_show_only_modified(only_modified);
            }

            if ui.button("⟳ Refresh").clicked() {
                actions.push(AppAction::Refresh);
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Select All Visible").clicked() {
                session.table_mut().check_all_visible();
            }
            if ui.button("Select None").clicked() {
                session.table_mut().uncheck_all();
            }
            if ui.button("Select Modified").clicked() {
                session.table_mut().check_non_default();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(session.selection_label());
            });
        });

        let rows: Vec<RowView> = session
            .table()
            .visible_rows()
            .map(|row| RowView {
                name: row.descriptor.name().to_string(),
                label: row.descriptor.label().to_string(),
                value: row.descriptor.value_display().to_string(),
                status: row.descriptor.status(),
                tooltip: row.descriptor.tooltip(),
                checked: row.checked,
                modified: !row.descriptor.is_at_default(),
                driven: row.descriptor.has_keyframes() || row.descriptor.has_expression(),
            })
            .collect();

        let mut toggled = Vec::new();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height(ui.available_height() - 180.0)
            .show(ui, |ui| {
                egui::Grid::new("parameter_table")
                    .striped(true)
                    .num_columns(4)
                    .min_col_width(24.0)
                    .show(ui, |ui| {
                        ui.label("✓");
                        ui.strong("Parameter");
                        ui.strong("Value");
                        ui.strong("Status");
                        ui.end_row();

                        for row in &rows {
                            let mut checked = row.checked;
                            if ui.checkbox(&mut checked, "").changed() {
                                toggled.push((row.name.clone(), checked));
                            }
                            ui.label(format!("{} ({})", row.label, row.name))
                                .on_hover_text(&row.tooltip);
                            let mut value = RichText::new(&row.value);
                            if let Some(color) = value_color(row.modified, row.driven) {
                                value = value.color(color);
                            }
                            ui.label(value).on_hover_text(&row.tooltip);
                            ui.label(RichText::new(&row.status).small());
                            ui.end_row();
                        }
                    });
            });

        for (name, checked) in toggled {
            session.table_mut().set_checked(&name, checked);
        }

        actions
    }
}

/// Renders the target node list
pub struct TargetPanel;

impl TargetPanel {
    pub fn render(
        ui: &mut Ui,
        target_paths: &[String],
        selected: &mut BTreeSet<usize>,
    ) -> Vec<AppAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.label("Target Nodes:");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Clear All").clicked() {
                    actions.push(AppAction::ClearTargets);
                }
                if ui.button("◎ Add from Selection").clicked() {
                    actions.push(AppAction::AddTargetsFromSelection);
                }
            });
        });

        egui::ScrollArea::vertical()
            .id_salt("target_list")
            .max_height(100.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for (i, path) in target_paths.iter().enumerate() {
                    let is_selected = selected.contains(&i);
                    let response = ui.selectable_label(is_selected, path);
                    if response.clicked() {
                        if is_selected {
                            selected.remove(&i);
                        } else {
                            selected.insert(i);
                        }
                    }
                    response.context_menu(|ui| {
                        if ui.button("Remove Selected").clicked() {
                            let mut positions: Vec<usize> = selected.iter().copied().collect();
                            if positions.is_empty() {
                                positions.push(i);
                            }
                            actions.push(AppAction::RemoveTargets(positions));
                            ui.close();
                        }
                    });
                }
            });

        actions
    }
}

/// Renders the transfer option checkboxes
pub struct OptionsPanel;

impl OptionsPanel {
    pub fn render(ui: &mut Ui, options: &mut TransferOptions) {
        ui.horizontal(|ui| {
            ui.checkbox(&mut options.copy_expressions, "Copy Expressions")
                .on_hover_text("Copy expressions instead of evaluated values");
            ui.checkbox(&mut options.copy_keyframes, "Copy Keyframes")
                .on_hover_text("Copy all keyframes instead of the current value");
            ui.checkbox(&mut options.skip_locked, "Skip Locked")
                .on_hover_text("Skip parameters that are locked on either side");
        });
    }
}

/// Renders the node list used as the network editor selection
pub struct ScenePanel;

impl ScenePanel {
    pub fn render(
        ui: &mut Ui,
        nodes: &[(NodeId, String)],
        selection: &[NodeId],
        frame: f64,
    ) -> Vec<AppAction> {
        let mut actions = Vec::new();

        ui.heading("Network");
        ui.label(RichText::new("Ctrl-click to select several nodes").small());
        ui.separator();

        for (id, path) in nodes {
            let is_selected = selection.contains(id);
            let response = ui.selectable_label(is_selected, path);
            if response.clicked() {
                let additive = ui.input(|i| i.modifiers.command);
                let mut next: Vec<NodeId> = if additive {
                    selection.to_vec()
                } else {
                    Vec::new()
                };
                if additive && is_selected {
                    next.retain(|n| n != id);
                } else if !next.contains(id) {
                    next.push(*id);
                }
                actions.push(AppAction::SelectNodes(next));
            }
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Frame:");
            let mut value = frame;
            if ui
                .add(egui::DragValue::new(&mut value).speed(1.0).range(1.0..=240.0))
                .changed()
            {
                actions.push(AppAction::SetFrame(value));
            }
        });

        actions
    }
}
