//! Login page for unauthenticated users.

use egui::{Response, ScrollArea, Ui};

use crate::{state::State, widgets};

/// Renders the login form, scrollable on small windows.
pub fn login_page(state: &mut State, ui: &mut Ui) -> Response {
    ScrollArea::vertical()
        .show(ui, |ui| widgets::login_widget(&mut state.ctx, ui))
        .inner
}
