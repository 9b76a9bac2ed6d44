//! Authentication implementations.

mod static_token;

pub use static_token::StaticTokenAuthenticator;
