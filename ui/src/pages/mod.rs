//! Pages module for the application.
//!
//! One page per [`Route`](rendezvous_business::Route):
//! - `login_page`: the login form
//! - `members_page`: the members area reached after a successful login

mod login_page;
mod members_page;

pub use login_page::login_page;
pub use members_page::members_page;
