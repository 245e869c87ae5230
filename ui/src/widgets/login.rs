//! Login form widget.
//!
//! Renders the form from the [`LoginInput`] state, writes edits back and
//! queues the matching business commands. Commands run when the app flushes
//! them at the end of the frame.

use egui::{Align, Button, Key, Layout, Response, RichText, TextEdit, Ui};
use rendezvous_business::{
    AuthCompute, ClearMessagesCommand, FacebookLoginCommand, Field, ForgotPasswordCommand,
    GoogleLoginCommand, LoginCommand, LoginInput, LoginMessages, validate,
};
use rendezvous_states::StateCtx;

use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

const FIELD_WIDTH: f32 = 260.0;

/// What the user asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    Submit,
    ForgotPassword,
    GoogleLogin,
    FacebookLogin,
}

pub fn login_widget(state_ctx: &mut StateCtx, ui: &mut Ui) -> Response {
    let mut input = state_ctx.state::<LoginInput>().clone();
    let messages = state_ctx.state::<LoginMessages>().clone();
    let loading = state_ctx
        .cached::<AuthCompute>()
        .is_some_and(AuthCompute::is_loading);

    let mut edited = false;
    let mut action = None;

    let response = ui
        .with_layout(Layout::top_down(Align::Center), |ui| {
            ui.add_space(20.0);
            ui.heading("Welcome Back");
            ui.label("Sign in to Rendezvous");
            ui.add_space(16.0);

            if let Some(success) = &messages.success {
                ui.label(RichText::new(success).color(COLOR_GREEN));
                ui.add_space(8.0);
            }
            if let Some(error) = &messages.error {
                ui.label(RichText::new(error).color(COLOR_RED));
                ui.add_space(8.0);
            }

            // Username
            ui.label("Username");
            let mut username = input.username.clone();
            let username_response = ui.add(
                TextEdit::singleline(&mut username)
                    .hint_text("Enter your username")
                    .desired_width(FIELD_WIDTH),
            );
            if username_response.changed() {
                edited |= input.set_value(Field::Username, username);
            }
            if username_response.lost_focus() {
                input.mark_touched(Field::Username);
            }
            field_error(ui, &input, Field::Username);

            ui.add_space(8.0);

            // Password with show/hide toggle
            ui.label("Password");
            let mut password = input.password.clone();
            let mut toggle_visibility = false;
            let password_response = ui
                .horizontal(|ui| {
                    let response = ui.add(
                        TextEdit::singleline(&mut password)
                            .password(!input.show_password)
                            .hint_text("Enter your password")
                            .desired_width(FIELD_WIDTH - 60.0),
                    );
                    let toggle = if input.show_password { "Hide" } else { "Show" };
                    toggle_visibility = ui.button(toggle).clicked();
                    response
                })
                .inner;
            if password_response.changed() {
                edited |= input.set_value(Field::Password, password);
            }
            if password_response.lost_focus() {
                input.mark_touched(Field::Password);
                if ui.input(|i| i.key_pressed(Key::Enter)) {
                    action = Some(FormAction::Submit);
                }
            }
            if toggle_visibility {
                input.toggle_password_visibility();
            }
            field_error(ui, &input, Field::Password);

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                edited |= ui.checkbox(&mut input.remember_me, "Remember me").changed();
                if ui.link("Forgot password?").clicked() {
                    action = Some(FormAction::ForgotPassword);
                }
            });

            ui.add_space(16.0);

            // banners and field errors come and go above, keep the id fixed
            ui.push_id("login_submit", |ui| {
                if loading {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.add_enabled(false, Button::new("Signing in..."));
                    });
                } else if ui.button("Login").clicked() {
                    action = Some(FormAction::Submit);
                }
            });

            ui.add_space(16.0);
            ui.separator();
            ui.label("or continue with");
            ui.horizontal(|ui| {
                if ui.button("Google").clicked() {
                    action = Some(FormAction::GoogleLogin);
                }
                if ui.button("Facebook").clicked() {
                    action = Some(FormAction::FacebookLogin);
                }
            });
        })
        .response;

    if state_ctx.state::<LoginInput>() != &input {
        *state_ctx.state_mut::<LoginInput>() = input;
    }
    if edited {
        state_ctx.enqueue_command::<ClearMessagesCommand>();
    }

    match action {
        Some(FormAction::Submit) => state_ctx.enqueue_command::<LoginCommand>(),
        Some(FormAction::ForgotPassword) => state_ctx.enqueue_command::<ForgotPasswordCommand>(),
        Some(FormAction::GoogleLogin) => state_ctx.enqueue_command::<GoogleLoginCommand>(),
        Some(FormAction::FacebookLogin) => state_ctx.enqueue_command::<FacebookLoginCommand>(),
        None => {}
    }

    response
}

/// Validates the value as edited this frame, so errors never lag behind.
fn field_error(ui: &mut Ui, input: &LoginInput, field: Field) {
    let validation = validate(input);
    if validation.is_field_invalid(input, field) {
        ui.label(
            RichText::new(validation.field_error_message(field))
                .small()
                .color(COLOR_RED),
        );
    }
}
