mod login;
mod toasts;

pub use login::login_widget;
pub use toasts::ToastOverlay;
