//! Informational notice with a single OK button
//!
//! Used for precondition failures, empty selections and the completion
//! report.

use super::{Dialog, DialogAction, DialogState};
use egui::Ui;

#[derive(Debug, Default)]
pub struct NoticeState {
    pub title: &'static str,
    pub message: String,
}

impl DialogState for NoticeState {}

impl NoticeState {
    pub fn new(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
        }
    }
}

pub struct NoticeDialog;

impl Dialog for NoticeDialog {
    type State = NoticeState;
    type Action = ();

    fn title(state: &Self::State) -> &'static str {
        state.title
    }

    fn render(state: &mut Self::State, ui: &mut Ui) -> DialogAction<Self::Action> {
        ui.label(state.message.trim_end());
        ui.separator();
        if ui.button("OK").clicked() {
            return DialogAction::Close;
        }
        DialogAction::None
    }
}
