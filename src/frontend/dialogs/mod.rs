//! Dialog trait system for unified dialog management
//!
//! Each dialog implements the [`Dialog`] trait, encapsulating its state,
//! actions and rendering. [`show_dialog`] drives the window lifecycle.

use egui::{Align2, Context, Ui};

pub mod confirm_transfer;
pub mod notice;

pub use confirm_transfer::{ConfirmTransferAction, ConfirmTransferDialog, ConfirmTransferState};
pub use notice::{NoticeDialog, NoticeState};

/// Actions that a dialog can return after rendering
#[derive(Debug, Clone, Default)]
pub enum DialogAction<A> {
    /// Keep the dialog open, no action needed
    #[default]
    None,
    /// Close the dialog without performing any action
    Close,
    /// Close the dialog and perform the specified action
    CloseWithAction(A),
}

impl<A> DialogAction<A> {
    /// Check if the action indicates the dialog should close
    pub fn should_close(&self) -> bool {
        matches!(self, DialogAction::Close | DialogAction::CloseWithAction(_))
    }

    /// Extract the action if present
    pub fn into_action(self) -> Option<A> {
        match self {
            DialogAction::CloseWithAction(a) => Some(a),
            _ => None,
        }
    }
}

/// Trait for dialog state management
pub trait DialogState: Default {
    /// Reset the dialog state to its default values
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Configuration for dialog window appearance and behavior
#[derive(Debug, Clone)]
pub struct DialogWindowConfig {
    pub default_width: f32,
    pub resizable: bool,
    pub collapsible: bool,
    /// Optional anchor position (alignment and offset)
    pub anchor: Option<(Align2, [f32; 2])>,
}

impl Default for DialogWindowConfig {
    fn default() -> Self {
        Self {
            default_width: 400.0,
            resizable: true,
            collapsible: false,
            anchor: None,
        }
    }
}

impl DialogWindowConfig {
    /// Create a centered, fixed-size dialog configuration
    pub fn centered(width: f32) -> Self {
        Self {
            default_width: width,
            resizable: false,
            collapsible: false,
            anchor: Some((Align2::CENTER_CENTER, [0.0, 0.0])),
        }
    }
}

/// Main dialog trait
///
/// # Example
///
/// ```ignore
/// pub struct MyDialog;
///
/// impl Dialog for MyDialog {
///     type State = MyDialogState;
///     type Action = MyDialogAction;
///
///     fn title(_state: &Self::State) -> &'static str { "My Dialog" }
///
///     fn render(state: &mut Self::State, ui: &mut Ui) -> DialogAction<Self::Action> {
///         DialogAction::None
///     }
/// }
/// ```
pub trait Dialog {
    /// The state type for this dialog
    type State: DialogState;

    /// The action type this dialog can produce
    type Action;

    /// Get the window title for this dialog
    fn title(state: &Self::State) -> &'static str;

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::centered(380.0)
    }

    /// Render the dialog content and report what should happen next
    fn render(state: &mut Self::State, ui: &mut Ui) -> DialogAction<Self::Action>;
}

/// Show a dialog using the Dialog trait
///
/// Only renders while `is_open` is true. Closing resets the state.
/// Returns `Some(action)` if the dialog produced an action.
pub fn show_dialog<D: Dialog>(
    ctx: &Context,
    is_open: &mut bool,
    state: &mut D::State,
) -> Option<D::Action> {
    if !*is_open {
        return None;
    }

    let config = D::window_config();
    let mut result = DialogAction::None;

    let mut window = egui::Window::new(D::title(state))
        .collapsible(config.collapsible)
        .resizable(config.resizable)
        .default_width(config.default_width);

    if let Some((align, offset)) = config.anchor {
        window = window.anchor(align, offset);
    }

    window.show(ctx, |ui| {
        result = D::render(state, ui);
    });

    if result.should_close() {
        *is_open = false;
        let action = result.into_action();
        state.reset();
        return action;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_action_close() {
        assert!(!DialogAction::<u8>::None.should_close());
        assert!(DialogAction::<u8>::Close.should_close());
        assert_eq!(DialogAction::CloseWithAction(3u8).into_action(), Some(3));
        assert_eq!(DialogAction::<u8>::Close.into_action(), None);
    }
}
