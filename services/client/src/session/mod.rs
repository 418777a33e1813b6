pub mod manager;

pub use manager::{AuthOutcome, SessionManager, TOKEN_KEY, USER_KEY};
