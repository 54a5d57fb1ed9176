//! Transfer confirmation dialog
//!
//! Shown after the preconditions pass; nothing is written until the user
//! confirms.

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use crate::session::PendingTransfer;
use egui::Ui;

#[derive(Debug, Default)]
pub struct ConfirmTransferState {
    pub pending: Option<PendingTransfer>,
}

impl DialogState for ConfirmTransferState {
    fn reset(&mut self) {
        self.pending = None;
    }
}

impl ConfirmTransferState {
    pub fn with_pending(pending: PendingTransfer) -> Self {
        Self {
            pending: Some(pending),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConfirmTransferAction {
    /// User confirmed the batch
    Confirm(PendingTransfer),
}

pub struct ConfirmTransferDialog;

impl Dialog for ConfirmTransferDialog {
    type State = ConfirmTransferState;
    type Action = ConfirmTransferAction;

    fn title(_state: &Self::State) -> &'static str {
        "Confirm Transfer"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::centered(420.0)
    }

    fn render(state: &mut Self::State, ui: &mut Ui) -> DialogAction<Self::Action> {
        let Some(pending) = state.pending.as_ref() else {
            return DialogAction::Close;
        };

        ui.label(pending.prompt.trim_end());
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Transfer").clicked() {
                if let Some(pending) = state.pending.take() {
                    return DialogAction::CloseWithAction(ConfirmTransferAction::Confirm(pending));
                }
            }
            if ui.button("Cancel").clicked() {
                return DialogAction::Close;
            }
            DialogAction::None
        })
        .inner
    }
}
