//! Frontend module for egui UI
//!
//! The window renders a [`TransferSession`] against a [`MemoryScene`]. All
//! work happens on the UI thread: a batch runs to completion inside the
//! frame that confirmed it.
//!
//! # Main Types
//!
//! - [`ParmTransferApp`] - Main application state implementing [`eframe::App`]
//!
//! # Submodules
//!
//! - [`dialogs`] - Confirmation and notice dialogs
//! - `panels` - Source picker, parameter table, targets, options, network list
//! - [`state`] - Actions emitted by panels
//! - [`status_bar`] - Bottom status line

pub mod dialogs;
mod panels;
pub mod state;
pub mod status_bar;

pub use panels::*;
pub use state::AppAction;

use std::collections::BTreeSet;

use dialogs::{
    show_dialog, ConfirmTransferAction, ConfirmTransferDialog, ConfirmTransferState,
    NoticeDialog, NoticeState,
};
use status_bar::{render_status_bar, StatusBarContext};

use crate::config::AppConfig;
use crate::error::ParmTransferError;
use crate::scene::{MemoryScene, SceneApi};
use crate::session::{notice_for, TransferSession};
use crate::types::NodeId;

/// Main application state for the transfer panel
pub struct ParmTransferApp {
    scene: MemoryScene,
    session: TransferSession,

    // === Widget state ===
    source_path_input: String,
    target_selection: BTreeSet<usize>,
    last_error: Option<String>,

    // === Dialogs ===
    confirm_open: bool,
    confirm_state: ConfirmTransferState,
    notice_open: bool,
    notice_state: NoticeState,
}

impl ParmTransferApp {
    pub fn new(scene: MemoryScene, config: &AppConfig) -> Self {
        Self {
            scene,
            session: TransferSession::new(config.transfer, config.ui.show_only_modified),
            source_path_input: String::new(),
            target_selection: BTreeSet::new(),
            last_error: None,
            confirm_open: false,
            confirm_state: ConfirmTransferState::default(),
            notice_open: false,
            notice_state: NoticeState::default(),
        }
    }

    pub fn session(&self) -> &TransferSession {
        &self.session
    }

    pub fn scene(&self) -> &MemoryScene {
        &self.scene
    }

    fn show_notice(&mut self, title: &'static str, message: impl Into<String>) {
        self.notice_state = NoticeState::new(title, message);
        self.notice_open = true;
    }

    fn report(&mut self, error: ParmTransferError) {
        tracing::debug!("{}", error);
        let (title, message) = notice_for(&error);
        self.show_notice(title, message);
    }

    fn sync_source_input(&mut self) {
        self.source_path_input = self.session.source_path().to_string();
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::SetSourcePath(path) => {
                match self.session.set_source_path(&self.scene, &path) {
                    Ok(()) => {
                        self.last_error = None;
                        self.sync_source_input();
                    }
                    Err(e) => self.last_error = Some(e.to_string()),
                }
            }
            AppAction::PickSource => {
                match self.session.pick_source_from_selection(&self.scene) {
                    Ok(()) => {
                        self.last_error = None;
                        self.sync_source_input();
                    }
                    Err(e) => self.report(e),
                }
            }
            AppAction::ClearSource => {
                self.session.clear_source();
                self.sync_source_input();
            }
            AppAction::Refresh => {
                if let Err(e) = self.session.refresh(&self.scene) {
                    self.last_error = Some(e.to_string());
                }
                self.sync_source_input();
            }
            AppAction::AddTargetsFromSelection => {
                if let Err(e) = self.session.add_targets_from_selection(&self.scene) {
                    self.report(e);
                }
            }
            AppAction::RemoveTargets(positions) => {
                self.session.targets_mut().remove_at(&positions);
                self.target_selection.clear();
            }
            AppAction::ClearTargets => {
                self.session.targets_mut().clear();
                self.target_selection.clear();
            }
            AppAction::RequestTransfer => match self.session.prepare_transfer(&self.scene) {
                Ok(pending) => {
                    self.confirm_state = ConfirmTransferState::with_pending(pending);
                    self.confirm_open = true;
                }
                Err(e) => self.report(e),
            },
            AppAction::SelectNodes(nodes) => {
                self.scene.select(&nodes);
            }
            AppAction::SetFrame(frame) => {
                self.scene.set_frame(frame);
                if let Err(e) = self.session.refresh(&self.scene) {
                    self.last_error = Some(e.to_string());
                }
            }
        }
    }

    fn handle_confirm(&mut self, action: ConfirmTransferAction) {
        match action {
            ConfirmTransferAction::Confirm(pending) => {
                match self.session.execute(&mut self.scene, &pending) {
                    Ok(summary) => {
                        self.target_selection.clear();
                        if let Err(e) = self.session.refresh(&self.scene) {
                            tracing::warn!("Failed to refresh source after transfer: {}", e);
                        }
                        self.show_notice("Transfer Complete", summary.completion_message());
                    }
                    Err(e) => self.report(e),
                }
            }
        }
    }
}

impl eframe::App for ParmTransferApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            render_status_bar(
                ui,
                &StatusBarContext {
                    status: self.session.status(),
                    selection_label: &self.session.selection_label(),
                    target_count: self.session.targets().len(),
                    frame: self.scene.frame(),
                    last_error: self.last_error.as_deref(),
                },
            );
        });

        egui::SidePanel::left("network")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                let nodes: Vec<(NodeId, String)> = self
                    .scene
                    .nodes()
                    .map(|(id, node)| (id, node.path.clone()))
                    .collect();
                let selection = self.scene.selected_nodes();
                actions.extend(ScenePanel::render(ui, &nodes, &selection, self.scene.frame()));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Parameter Transfer");
            ui.separator();

            actions.extend(SourcePanel::render(
                ui,
                &mut self.source_path_input,
                self.session.source_path_invalid(),
            ));
            ui.separator();

            actions.extend(ParameterTablePanel::render(ui, &mut self.session));
            ui.separator();

            let target_paths = self.session.targets().paths(&self.scene);
            actions.extend(TargetPanel::render(
                ui,
                &target_paths,
                &mut self.target_selection,
            ));
            ui.separator();

            OptionsPanel::render(ui, self.session.options_mut());

            ui.add_space(4.0);
            let button = egui::Button::new(egui::RichText::new("⇒ Transfer Parameters").strong())
                .min_size(egui::vec2(ui.available_width(), 32.0));
            if ui.add(button).clicked() {
                actions.push(AppAction::RequestTransfer);
            }
        });

        for action in actions {
            self.handle_action(action);
        }

        if let Some(action) =
            show_dialog::<ConfirmTransferDialog>(ctx, &mut self.confirm_open, &mut self.confirm_state)
        {
            self.handle_confirm(action);
        }

        show_dialog::<NoticeDialog>(ctx, &mut self.notice_open, &mut self.notice_state);
    }
}
