use log::debug;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;

use types::domain::SignupRequest;
use types::error::{SignupError, FALLBACK_MESSAGE};

pub const BASE_URL_ENV: &str = "SIGNUP_API_BASE_URL";
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Deserialize)]
struct SignupResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

pub struct Client {
    pub client: ReqwestClient,
    base_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Builds a client pointed at `SIGNUP_API_BASE_URL`, falling back
    /// to localhost when the variable is unset.
    pub fn new() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: ReqwestClient::new(),
            base_url: base_url.into(),
        }
    }

    /// Submits the signup buffer. Validation failures short-circuit
    /// before any request is sent. On 2xx the server's `message` field
    /// is returned; on anything else the response's `detail` field (or
    /// the fallback text) comes back as a [`SignupError::Server`].
    pub async fn signup(&self, request: &SignupRequest) -> Result<String, SignupError> {
        request.validate_for_submit()?;
        let url = format!("{}/signup", self.base_url);
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(SignupError::Transport)?;
        let status = response.status();
        debug!("signup response status: {}", status);
        if status.is_success() {
            let body: SignupResponse =
                response.json().await.map_err(SignupError::Transport)?;
            Ok(body.message)
        } else {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            Err(SignupError::Server { status, detail })
        }
    }
}
