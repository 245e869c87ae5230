//! Model of the Rendezvous login screen.
//!
//! Everything here runs on a [`StateCtx`] and is independent of the UI.
//! [`register_login_screen`] wires the whole screen into a context.

mod coming_soon;
mod config;
mod login_state;
mod messages;
mod notify;
mod remember;
mod route;
mod validation;

pub use coming_soon::{
    COMING_SOON_TITLE, FACEBOOK_LOGIN_MESSAGE, FORGOT_PASSWORD_MESSAGE, FacebookLoginCommand,
    ForgotPasswordCommand, GOOGLE_LOGIN_MESSAGE, GoogleLoginCommand,
};
pub use config::BusinessConfig;
pub use login_state::{
    AuthCompute, AuthStatus, FieldMarks, LOGIN_FAILED_MESSAGE, LOGIN_FAILED_TITLE, LoginCommand,
    LoginFailure, LoginInput, LoginRequest, LoginResponse, LogoutCommand, classify_response,
};
pub use messages::{
    ClearMessagesCommand, ERROR_DISPLAY_MS, ExpireLoginMessagesCommand, LOGIN_SUCCESS_MESSAGE,
    LoginMessages, REDIRECT_DELAY_MS,
};
pub use notify::{Notifier, Toast, ToastLevel, ToastReceiver};
pub use remember::{REMEMBERED_USER_KEY, RememberedUser, RestoreRememberedUserCommand};
pub use route::Route;
pub use validation::{
    Field, FieldError, LoginValidation, PASSWORD_MIN_LEN, USERNAME_MIN_LEN, validate,
    validate_field,
};

use log::{error, info};
use rendezvous_states::{StateCtx, Time};

/// Registers every state, compute and command of the login screen, then
/// restores the remembered user into the form.
pub fn register_login_screen(
    ctx: &mut StateCtx,
    config: BusinessConfig,
    remembered: RememberedUser,
    notifier: Notifier,
) {
    info!("Registering login screen, api: {}", config.api_url());

    ctx.add_state(Time::now());
    ctx.add_state(config);
    ctx.add_state(LoginInput::default());
    ctx.add_state(LoginMessages::default());
    ctx.add_state(Route::default());
    ctx.add_state(remembered);
    ctx.add_state(notifier);

    ctx.record_compute(AuthCompute::default());

    ctx.record_command(LoginCommand);
    ctx.record_command(LogoutCommand);
    ctx.record_command(ClearMessagesCommand);
    ctx.record_command(ExpireLoginMessagesCommand);
    ctx.record_command(RestoreRememberedUserCommand);
    ctx.record_command(ForgotPasswordCommand);
    ctx.record_command(GoogleLoginCommand);
    ctx.record_command(FacebookLoginCommand);

    if let Err(err) = ctx.verify_deps() {
        error!("Login screen computes form a cycle: {err}");
    }

    ctx.dispatch::<RestoreRememberedUserCommand>();
    ctx.sync_computes();
    ctx.run_computed();
    ctx.sync_computes();
}
