//! HTTP implementation of the identity boundary.
//!
//! Wire contract (backend API v1):
//! - `POST {base}/login/access-token` — form-encoded `username`/`password`
//!   (OAuth2 password form), returns `{"access_token": "..."}`.
//! - `GET {base}/users/me` — `Authorization: Bearer <token>`, returns the
//!   profile JSON.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use werkbank_core::UserProfile;
use werkbank_session::{Credential, IdentityError, IdentityService};

/// Identity boundary backed by the backend HTTP API.
#[derive(Debug, Clone)]
pub struct HttpIdentityService {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct AccessToken {
    access_token: String,
}

impl HttpIdentityService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use a pre-configured client (timeouts, proxies, extra headers).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn transport(err: reqwest::Error) -> IdentityError {
    IdentityError::Transport(err.to_string())
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn verify(&self, credential: &Credential) -> Result<UserProfile, IdentityError> {
        let response = self
            .client
            .get(self.url("/users/me"))
            .bearer_auth(credential.as_str())
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(IdentityError::Unauthorized),
            status if status.is_success() => {
                response.json::<UserProfile>().await.map_err(transport)
            }
            status => Err(IdentityError::Transport(format!(
                "unexpected status {status} from /users/me"
            ))),
        }
    }

    async fn exchange(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Credential, IdentityError> {
        // The backend speaks the OAuth2 password form and calls the field
        // `username` even though identifiers are email addresses.
        let form = [("username", identifier), ("password", secret)];

        let response = self
            .client
            .post(self.url("/login/access-token"))
            .form(&form)
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                Err(IdentityError::InvalidCredentials)
            }
            status if status.is_success() => {
                let body: AccessToken = response.json().await.map_err(transport)?;
                Ok(Credential::new(body.access_token))
            }
            status => Err(IdentityError::Transport(format!(
                "unexpected status {status} from /login/access-token"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped_from_the_base_url() {
        let service = HttpIdentityService::new("http://localhost:8000/api/v1///");
        assert_eq!(service.url("/users/me"), "http://localhost:8000/api/v1/users/me");
    }
}
