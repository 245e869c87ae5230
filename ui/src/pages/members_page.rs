//! Members area, shown once the login succeeded.

use egui::{Align, Layout, Response, RichText, Ui};
use rendezvous_business::{AuthCompute, LogoutCommand};

use crate::{state::State, utils::colors::COLOR_GREEN};

pub fn members_page(state: &mut State, ui: &mut Ui) -> Response {
    let username = state
        .ctx
        .cached::<AuthCompute>()
        .and_then(AuthCompute::username)
        .unwrap_or("member")
        .to_owned();

    let mut logout = false;
    let response = ui
        .with_layout(Layout::top_down(Align::Center), |ui| {
            ui.add_space(20.0);
            ui.heading("Members");
            ui.add_space(24.0);
            ui.label(
                RichText::new(format!("Welcome, {username}!"))
                    .size(20.0)
                    .color(COLOR_GREEN),
            );
            ui.add_space(16.0);
            logout = ui.button("Logout").clicked();
        })
        .response;

    if logout {
        state.ctx.enqueue_command::<LogoutCommand>();
    }

    response
}
