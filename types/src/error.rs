use reqwest::StatusCode;
use thiserror::Error;

pub const PHONE_MESSAGE: &str = "Phone number must be exactly 10 digits.";
pub const TERMS_MESSAGE: &str = "You must agree to the Terms of Service and Privacy Policy.";
pub const FALLBACK_MESSAGE: &str = "Registration failed";

/// Everything that can end a submission attempt. Each variant's
/// `Display` output is the text shown to the user.
#[derive(Debug, Error)]
pub enum SignupError {
    /// Caught locally before any request is sent.
    #[error("{0}")]
    Validation(String),
    /// The request never produced a response.
    #[error("Registration failed")]
    Transport(#[source] reqwest::Error),
    /// The server answered with a non-2xx status. `detail` is the
    /// server-supplied text when the body had one, otherwise the
    /// fallback message.
    #[error("{detail}")]
    Server { status: StatusCode, detail: String },
}
