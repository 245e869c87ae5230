//! Route state for page navigation.

use rendezvous_states::State;

/// Represents the current page of the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    /// Login page - shown until a login succeeds
    #[default]
    Login,
    /// Members area - the destination after a successful login
    Members,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Members => "/members",
        }
    }
}

impl State for Route {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_default_is_login() {
        assert_eq!(Route::default(), Route::Login);
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Members.path(), "/members");
    }
}
