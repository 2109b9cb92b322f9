//! Session state: the currently logged-in identity.

mod state;

pub use state::SessionState;
