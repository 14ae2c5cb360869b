use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Url};

use crate::{
    config,
    error::PipelineError,
    spotify::client::{self, TOKEN_EXCHANGE_TIMEOUT},
    types::TokenResponse,
};

/// OAuth client for the Spotify accounts service.
///
/// Implements the confidential-client authorization-code flow: the service
/// redirects the listener to the authorization URL, exchanges the returned
/// code for a token pair, and later renews expired access tokens through the
/// refresh-token grant. Both token-exchange calls authenticate with a Basic
/// header built from the client id and secret and run under the 5-second
/// token-exchange timeout.
#[derive(Debug, Clone)]
pub struct SpotifyAuth {
    pub http: Client,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
}

impl SpotifyAuth {
    pub fn from_env() -> Self {
        SpotifyAuth {
            http: Client::new(),
            auth_url: config::spotify_auth_url(),
            token_url: config::spotify_token_url(),
            redirect_uri: config::spotify_redirect_uri(),
            client_id: config::spotify_client_id(),
            client_secret: config::spotify_client_secret(),
            scope: config::spotify_scope(),
        }
    }

    /// Builds the authorization URL the listener is sent to.
    ///
    /// The `state` nonce ties the eventual callback back to the user record
    /// that initiated the flow.
    ///
    /// # Panics
    ///
    /// Panics if the configured authorization URL cannot be parsed; that is
    /// a configuration error on the same level as a missing client id.
    pub fn authorize_url(&self, state: &str) -> String {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("scope", self.scope.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
            ],
        )
        .expect("invalid SPOTIFY_AUTH_URL")
        .to_string()
    }

    /// Exchanges an authorization code for an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// Returns the classified upstream error on a non-2xx response, or
    /// `UpstreamTimeout`/`Transport` when the exchange call itself fails.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, PipelineError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.redirect_uri),
        ])
        .await
    }

    /// Obtains a fresh access token through the refresh-token grant.
    ///
    /// The response may omit the refresh token; the token lifecycle manager
    /// keeps the previous one in that case.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, PipelineError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, PipelineError> {
        let response = self
            .http
            .post(&self.token_url)
            .header("Authorization", self.basic_auth())
            .form(form)
            .timeout(TOKEN_EXCHANGE_TIMEOUT)
            .send()
            .await
            .map_err(PipelineError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(client::classify_status(status, body));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(PipelineError::from_transport)
    }

    fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}
