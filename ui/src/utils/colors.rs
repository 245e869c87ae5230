//! Shared color constants for the UI.

use egui::Color32;

/// Forest green color for success messages.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Red color for errors and failed logins.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Blue color for informational toasts.
pub const COLOR_BLUE: Color32 = Color32::from_rgb(13, 110, 253);
