//! Login form state and the authentication call.
//!
//! This module tracks:
//! - the form value (username, password, remember me) and per-field marks
//! - the password visibility flag
//! - the authentication status, which doubles as the loading flag
//!
//! [`LoginCommand`] posts the credentials to `{api}/account/login`. On
//! success it stores the remembered user (or forgets it), shows the success
//! message and schedules the redirect to the members area. On failure it maps
//! the cause to a [`LoginFailure`], shows it inline for a few seconds and
//! raises an error toast.

use std::any::Any;

use chrono::Utc;
use log::{error, info, warn};
use rendezvous_states::{Command, Compute, ComputeDeps, ComputeStage, Dep, State, Updater};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    BusinessConfig, Field, LoginMessages, LoginValidation, Notifier, RememberedUser, Route,
};

pub const LOGIN_FAILED_TITLE: &str = "Login Failed";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

/// Request payload for the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body returned by the login endpoint on success.
///
/// Every field is optional; a bare `200 OK` counts as a successful login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    pub username: Option<String>,
    pub token: Option<String>,
}

/// Error body some failures carry.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Interaction marks of one text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMarks {
    /// The user changed the value.
    pub dirty: bool,
    /// The user left the field, or a submit was attempted.
    pub touched: bool,
}

/// Input state of the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
    pub show_password: bool,
    pub username_marks: FieldMarks,
    pub password_marks: FieldMarks,
}

impl LoginInput {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
        }
    }

    pub fn marks(&self, field: Field) -> FieldMarks {
        match field {
            Field::Username => self.username_marks,
            Field::Password => self.password_marks,
        }
    }

    fn marks_mut(&mut self, field: Field) -> &mut FieldMarks {
        match field {
            Field::Username => &mut self.username_marks,
            Field::Password => &mut self.password_marks,
        }
    }

    /// User edit. Returns `true` when the value actually changed.
    pub fn set_value(&mut self, field: Field, value: String) -> bool {
        let slot = match field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        self.marks_mut(field).dirty = true;
        true
    }

    pub fn mark_touched(&mut self, field: Field) {
        self.marks_mut(field).touched = true;
    }

    pub fn mark_all_touched(&mut self) {
        for field in Field::ALL {
            self.mark_touched(field);
        }
    }

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Pre-fills the form from a remembered user. Does not mark anything dirty.
    pub fn patch_remembered(&mut self, username: &str) {
        self.username = username.to_owned();
        self.remember_me = true;
    }

    pub fn request(&self) -> LoginRequest {
        LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

impl State for LoginInput {}

/// Result/status of authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    /// Not authenticated yet.
    #[default]
    NotAuthenticated,
    /// Login request in flight; the form is in its loading state.
    Authenticating,
    /// Successfully authenticated.
    Authenticated {
        /// The username of the authenticated user.
        username: String,
        /// Token returned by the backend, if any.
        token: Option<String>,
    },
    /// Authentication failed with a user-facing message.
    Failed(String),
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Authenticating)
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Authenticated { username, .. } => Some(username.as_str()),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { token, .. } => token.as_deref(),
            _ => None,
        }
    }
}

/// Compute-shaped cache for authentication status.
///
/// `compute()` is a no-op; the value is replaced by [`LoginCommand`] and
/// [`LogoutCommand`] through `Updater::set(...)`.
#[derive(Default, Debug, Clone)]
pub struct AuthCompute {
    pub status: AuthStatus,
}

impl AuthCompute {
    pub fn is_authenticated(&self) -> bool {
        self.status.is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn username(&self) -> Option<&str> {
        self.status.username()
    }

    pub fn token(&self) -> Option<&str> {
        self.status.token()
    }
}

impl Compute for AuthCompute {
    fn deps(&self) -> ComputeDeps {
        (vec![], vec![])
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) -> ComputeStage {
        ComputeStage::Finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Why a login attempt failed. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginFailure {
    #[error("Invalid username or password. Please try again.")]
    Unauthorized,
    #[error("Unable to connect to server. Please check your internet connection.")]
    Unreachable(String),
    #[error("{}", .message.as_deref().unwrap_or(LOGIN_FAILED_MESSAGE))]
    Rejected { status: u16, message: Option<String> },
    #[error("Login failed. Please try again.")]
    MalformedResponse(String),
}

/// Extracts the server's `message` field; empty messages count as absent.
fn extract_error_message(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
}

/// Maps the raw HTTP outcome onto a login result.
pub fn classify_response(result: ehttp::Result<ehttp::Response>) -> Result<LoginResponse, LoginFailure> {
    let response = result.map_err(LoginFailure::Unreachable)?;

    if response.ok {
        if response.bytes.is_empty() {
            return Ok(LoginResponse::default());
        }
        return serde_json::from_slice::<LoginResponse>(&response.bytes)
            .map_err(|e| LoginFailure::MalformedResponse(e.to_string()));
    }

    match response.status {
        401 => Err(LoginFailure::Unauthorized),
        0 => Err(LoginFailure::Unreachable(response.status_text)),
        status => Err(LoginFailure::Rejected {
            status,
            message: extract_error_message(&response.bytes),
        }),
    }
}

/// Manual-only command that submits the login form.
///
/// ## Flow
///
/// 1. If the form is invalid or a login is already in flight, marks every
///    field touched so their errors show, and stops
/// 2. Sets status to `Authenticating` and clears both messages
/// 3. POSTs `{"username", "password"}` to `{api}/account/login`
/// 4. On success: `Authenticated`, success message, remember-me, redirect
///    scheduled
/// 5. On failure: `Failed`, error message with expiry, error toast
///
/// Dispatch explicitly via `ctx.dispatch::<LoginCommand>()`.
#[derive(Default, Debug)]
pub struct LoginCommand;

impl Command for LoginCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let input = deps.get_state_ref::<LoginInput>();
        let auth = deps.get_compute_ref::<AuthCompute>();
        let messages = deps.get_state_ref::<LoginMessages>();
        let config = deps.get_state_ref::<BusinessConfig>();
        let notifier = deps.get_state_ref::<Notifier>().clone();

        let valid = LoginValidation::of(input).is_valid();
        if !valid || auth.is_loading() {
            info!(
                "LoginCommand: not submitting (valid: {valid}, loading: {})",
                auth.is_loading()
            );
            let mut touched = input.clone();
            touched.mark_all_touched();
            updater.set_state(touched);
            return;
        }

        let request = input.request();
        let remember_me = input.remember_me;
        info!("LoginCommand: signing in user '{}'", request.username);

        updater.set(AuthCompute {
            status: AuthStatus::Authenticating,
        });
        updater.set_state(messages.cleared());

        let url = format!("{}/account/login", config.api_url());
        let body = match serde_json::to_vec(&request) {
            Ok(body) => body,
            Err(e) => {
                error!("LoginCommand: Failed to serialize LoginRequest: {e}");
                fail(&updater, &notifier, &LoginFailure::MalformedResponse(e.to_string()));
                return;
            }
        };

        let mut http_request = ehttp::Request::post(&url, body);
        http_request
            .headers
            .insert("Content-Type", "application/json");

        let username = request.username;
        ehttp::fetch(http_request, move |result| match classify_response(result) {
            Ok(response) => {
                info!("LoginCommand: user '{username}' signed in");

                // remember what was typed, not what the server echoes back
                let remembered = if remember_me {
                    RememberedUser::remember(&username)
                } else {
                    RememberedUser::default()
                };
                updater.set_state(remembered);
                updater.set_state(LoginMessages::succeeded(Utc::now()));
                updater.set(AuthCompute {
                    status: AuthStatus::Authenticated {
                        username: response.username.unwrap_or(username),
                        token: response.token,
                    },
                });
            }
            Err(failure) => {
                match &failure {
                    LoginFailure::Unreachable(detail) => {
                        error!("LoginCommand: server unreachable: {detail}");
                    }
                    LoginFailure::MalformedResponse(detail) => {
                        warn!("LoginCommand: unreadable success body: {detail}");
                    }
                    LoginFailure::Unauthorized | LoginFailure::Rejected { .. } => {
                        info!("LoginCommand: login rejected: {failure:?}");
                    }
                }
                fail(&updater, &notifier, &failure);
            }
        });
    }
}

fn fail(updater: &Updater, notifier: &Notifier, failure: &LoginFailure) {
    let message = failure.to_string();
    updater.set(AuthCompute {
        status: AuthStatus::Failed(message.clone()),
    });
    updater.set_state(LoginMessages::failed(message.clone(), Utc::now()));
    notifier.error(LOGIN_FAILED_TITLE, message);
}

/// Manual-only command that leaves the members area.
///
/// Resets auth and the form, then pre-fills the form again from the
/// remembered user.
#[derive(Default, Debug)]
pub struct LogoutCommand;

impl Command for LogoutCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let remembered = deps.get_state_ref::<RememberedUser>();
        info!("LogoutCommand: user logged out");

        let mut input = LoginInput::default();
        if let Some(username) = remembered.username() {
            input.patch_remembered(username);
        }

        updater.set(AuthCompute::default());
        updater.set_state(input);
        updater.set_state(LoginMessages::default());
        updater.set_state(Route::Login);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ehttp::Response {
        ehttp::Response {
            url: "http://localhost/api/account/login".to_owned(),
            ok: (200..300).contains(&status),
            status,
            status_text: String::new(),
            headers: ehttp::Headers::default(),
            bytes: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_auth_status_authenticated() {
        let status = AuthStatus::Authenticated {
            username: "test_user".to_owned(),
            token: Some("test_token".to_owned()),
        };

        assert!(status.is_authenticated());
        assert!(!status.is_loading());
        assert_eq!(status.username(), Some("test_user"));
        assert_eq!(status.token(), Some("test_token"));
    }

    #[test]
    fn test_auth_status_authenticating_is_loading() {
        let status = AuthStatus::Authenticating;
        assert!(status.is_loading());
        assert!(!status.is_authenticated());
        assert_eq!(status.username(), None);
    }

    #[test]
    fn test_login_request_serialization() {
        let mut input = LoginInput::default();
        input.set_value(Field::Username, "lisa".to_owned());
        input.set_value(Field::Password, "Pa$$w0rd".to_owned());
        input.remember_me = true;

        let json = serde_json::to_value(input.request()).expect("Should serialize");
        assert_eq!(
            json,
            serde_json::json!({"username": "lisa", "password": "Pa$$w0rd"})
        );
    }

    #[test]
    fn set_value_marks_dirty_only_on_change() {
        let mut input = LoginInput::default();
        assert!(!input.set_value(Field::Username, String::new()));
        assert!(!input.marks(Field::Username).dirty);

        assert!(input.set_value(Field::Username, "bob".to_owned()));
        assert!(input.marks(Field::Username).dirty);
        assert!(!input.marks(Field::Password).dirty);
    }

    #[test]
    fn patch_remembered_is_not_a_user_edit() {
        let mut input = LoginInput::default();
        input.patch_remembered("todd");
        assert_eq!(input.username, "todd");
        assert!(input.remember_me);
        assert_eq!(input.marks(Field::Username), FieldMarks::default());
    }

    #[test]
    fn toggle_password_visibility_flips() {
        let mut input = LoginInput::default();
        assert!(!input.show_password);
        input.toggle_password_visibility();
        assert!(input.show_password);
        input.toggle_password_visibility();
        assert!(!input.show_password);
    }

    #[test]
    fn classify_success_with_token() {
        let result = classify_response(Ok(response(200, r#"{"username":"lisa","token":"jwt"}"#)));
        let login = result.expect("200 should be a success");
        assert_eq!(login.username.as_deref(), Some("lisa"));
        assert_eq!(login.token.as_deref(), Some("jwt"));
    }

    #[test]
    fn classify_empty_success_body() {
        let login = classify_response(Ok(response(204, ""))).expect("204 should be a success");
        assert!(login.token.is_none());
    }

    #[test]
    fn classify_unreadable_success_body() {
        let failure = classify_response(Ok(response(200, "<html>"))).expect_err("not json");
        assert!(matches!(failure, LoginFailure::MalformedResponse(_)));
        assert_eq!(failure.to_string(), LOGIN_FAILED_MESSAGE);
    }

    #[test]
    fn classify_unauthorized() {
        let failure = classify_response(Ok(response(401, r#"{"message":"ignored"}"#)))
            .expect_err("401 should fail");
        assert_eq!(failure, LoginFailure::Unauthorized);
        assert_eq!(
            failure.to_string(),
            "Invalid username or password. Please try again."
        );
    }

    #[test]
    fn classify_transport_error_and_status_zero() {
        let failure = classify_response(Err("connection refused".to_owned()))
            .expect_err("transport error should fail");
        assert_eq!(
            failure.to_string(),
            "Unable to connect to server. Please check your internet connection."
        );

        let failure = classify_response(Ok(response(0, ""))).expect_err("status 0 should fail");
        assert!(matches!(failure, LoginFailure::Unreachable(_)));
    }

    #[test]
    fn classify_server_message_is_used() {
        let failure = classify_response(Ok(response(400, r#"{"message":"Account locked"}"#)))
            .expect_err("400 should fail");
        assert_eq!(failure.to_string(), "Account locked");
    }

    #[test]
    fn classify_falls_back_to_generic_message() {
        for body in ["", "plain text", r#"{"message":""}"#, r#"{"error":"x"}"#] {
            let failure = classify_response(Ok(response(500, body))).expect_err("500 should fail");
            assert_eq!(failure.to_string(), LOGIN_FAILED_MESSAGE, "body: {body}");
        }
    }
}
