//! GitHub OAuth collaborator.
//!
//! A thin client for the three calls the login flow needs: building the
//! authorize redirect, exchanging the callback code for an access token, and
//! fetching the authenticated user (falling back to the primary verified
//! address from `/user/emails` when the profile email is private).

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::GithubOauthConfig;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_BASE: &str = "https://api.github.com";

/// Errors that can occur talking to GitHub.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The HTTP request itself failed.
    #[error("github request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub rejected the authorization code.
    #[error("github rejected the authorization code: {0}")]
    Exchange(String),
}

/// The GitHub identity attached to an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    /// GitHub login handle.
    pub login: String,
    /// Public display name, if set.
    pub name: Option<String>,
    /// Email address; `None` when the user keeps it private.
    pub email: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// Client for the GitHub OAuth and user APIs.
pub struct GithubClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
}

impl GithubClient {
    /// Create a new GitHub client.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::Http` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &GithubOauthConfig) -> Result<Self, GithubError> {
        // GitHub's API rejects requests without a User-Agent.
        let http = reqwest::Client::builder()
            .user_agent("clementine-api")
            .build()?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    /// The URL to redirect a user to for login.
    ///
    /// `state` is the CSRF token the callback must echo back.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        // Static base URL plus query pairs; this cannot fail to parse.
        Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("scope", "read:user user:email"),
                ("state", state),
            ],
        )
        .map_or_else(|_| AUTHORIZE_URL.to_owned(), Into::into)
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::Exchange` if GitHub rejects the code and
    /// `GithubError::Http` for transport failures.
    pub async fn exchange_code(&self, code: &str) -> Result<String, GithubError> {
        let response: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("code", code),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.access_token.ok_or_else(|| {
            GithubError::Exchange(
                response
                    .error_description
                    .or(response.error)
                    .unwrap_or_else(|| "no access token in response".to_owned()),
            )
        })
    }

    /// Fetch the authenticated user for an access token.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::Http` for transport or API failures.
    pub async fn fetch_user(&self, access_token: &str) -> Result<GithubUser, GithubError> {
        let mut user: GithubUser = self
            .http
            .get(format!("{API_BASE}/user"))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Users with a private profile email still expose verified addresses
        // through /user/emails with the user:email scope.
        if user.email.is_none() {
            user.email = self.fetch_primary_email(access_token).await?;
        }

        Ok(user)
    }

    async fn fetch_primary_email(&self, access_token: &str) -> Result<Option<String>, GithubError> {
        let emails: Vec<UserEmail> = self
            .http
            .get(format!("{API_BASE}/user/emails"))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(emails
            .into_iter()
            .find(|e| e.primary && e.verified)
            .map(|e| e.email))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> GithubClient {
        GithubClient::new(&GithubOauthConfig {
            client_id: "Iv1.test-client".to_owned(),
            client_secret: SecretString::from("kY8#mQ2$vX9!pL4@"),
        })
        .unwrap()
    }

    #[test]
    fn test_authorize_url_carries_client_id_and_state() {
        let url = client().authorize_url("csrf-token-123");

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=Iv1.test-client"));
        assert!(url.contains("state=csrf-token-123"));
        assert!(url.contains("user%3Aemail"));
    }
}
