use crate::config::Config;
use crate::error::{auth_error, config_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Seconds of validity a token needs left to be used as is
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth client id and secret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Shape of the client secret file downloaded from the Google console
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientCredentials>,
    web: Option<ClientCredentials>,
}

impl ClientCredentials {
    /// Credentials from the environment, falling back to `credentials.json`
    pub fn load(config: &Config) -> AppResult<Self> {
        if let (Some(client_id), Some(client_secret)) = (
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
        ) {
            return Ok(Self {
                client_id,
                client_secret,
            });
        }

        let path = config.credentials_path();
        let content = fs::read_to_string(&path).map_err(|e| {
            config_error(&format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> AppResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(content)?;
        file.installed
            .or(file.web)
            .ok_or_else(|| config_error("credentials.json has no installed or web client"))
    }
}

/// Token cache persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp
    pub expires_at: i64,
}

impl StoredToken {
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at > now + EXPIRY_MARGIN_SECS
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_stored(self, previous_refresh: Option<String>) -> StoredToken {
        StoredToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expires_at: Utc::now().timestamp() + self.expires_in.unwrap_or(3600),
        }
    }
}

/// Hands out a valid access token, refreshing or re-authorizing as needed
#[derive(Clone)]
pub struct TokenManager {
    token_path: PathBuf,
    credentials: ClientCredentials,
    redirect_port: u16,
    client: Client,
}

impl TokenManager {
    pub fn new(config: &Config, client: Client) -> AppResult<Self> {
        Ok(Self {
            token_path: config.token_path(),
            credentials: ClientCredentials::load(config)?,
            redirect_port: config.redirect_port,
            client,
        })
    }

    /// Get a usable token from the cache, refreshing or asking for consent when needed
    pub async fn get_token(&self) -> AppResult<StoredToken> {
        match self.load()? {
            Some(token) if token.is_valid_at(Utc::now().timestamp()) => Ok(token),
            Some(token) if token.refresh_token.is_some() => self.refresh_token(&token).await,
            _ => {
                info!("No usable token, starting authorization");
                self.authorize().await
            }
        }
    }

    /// Read the cached token, if any
    pub fn load(&self) -> AppResult<Option<StoredToken>> {
        match fs::read_to_string(&self.token_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(token) => Ok(Some(token)),
                Err(e) => {
                    warn!("Ignoring unreadable token file {}: {}", self.token_path.display(), e);
                    Ok(None)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, token: &StoredToken) -> AppResult<()> {
        fs::write(&self.token_path, serde_json::to_string_pretty(token)?)?;
        info!("Saved token to {}", self.token_path.display());
        Ok(())
    }

    /// Refresh an expired token
    async fn refresh_token(&self, token: &StoredToken) -> AppResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| auth_error("No refresh token in token data"))?;

        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let new_token = self.request_token(&params).await?.into_stored(Some(refresh_token));
        self.save(&new_token)?;
        Ok(new_token)
    }

    fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.redirect_port)
    }

    /// Browser URL for the consent screen
    pub fn authorization_url(&self, state: &str) -> AppResult<Url> {
        Url::parse_with_params(
            AUTH_URL,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", self.redirect_uri().as_str()),
                ("response_type", "code"),
                ("access_type", "offline"),
                ("prompt", "consent"),
                ("scope", SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| auth_error(&format!("Failed to build authorization URL: {}", e)))
    }

    /// Interactive consent flow: open the browser, wait for the redirect,
    /// exchange the code and save the resulting token
    pub async fn authorize(&self) -> AppResult<StoredToken> {
        // Random state guards against forged callbacks
        let state = uuid::Uuid::new_v4().to_string();
        let auth_url = self.authorization_url(&state)?;

        info!("Opening browser for Google Calendar authorization...");
        if let Err(e) = webbrowser::open(auth_url.as_str()) {
            warn!("Could not open a browser ({}), visit this URL: {}", e, auth_url);
        }

        let port = self.redirect_port;
        let code = tokio::task::spawn_blocking(move || wait_for_callback(port, &state))
            .await
            .map_err(|e| auth_error(&format!("Callback listener failed: {}", e)))??;

        let redirect_uri = self.redirect_uri();
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let token = self.request_token(&params).await?.into_stored(None);
        self.save(&token)?;
        Ok(token)
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> AppResult<TokenResponse> {
        let response = self
            .client
            .post(TOKEN_URL)
            .form(params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to reach token endpoint: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Token request failed: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))
    }
}

/// Block until the browser is redirected back with an authorization code
fn wait_for_callback(port: u16, expected_state: &str) -> AppResult<String> {
    let server = tiny_http::Server::http(("127.0.0.1", port))
        .map_err(|e| auth_error(&format!("Failed to listen on port {}: {}", port, e)))?;
    info!("Waiting for authorization callback on port {}...", port);

    let request = server.recv()?;
    let result = parse_callback(request.url(), expected_state);

    let message = match &result {
        Ok(_) => "Authorization successful! You can close this window.",
        Err(_) => "Authorization failed. Check the terminal for details.",
    };
    if let Err(e) = request.respond(tiny_http::Response::from_string(message)) {
        warn!("Failed to answer the browser: {}", e);
    }

    result
}

/// Pull the code out of a callback path like `/?state=...&code=...`
pub fn parse_callback(path: &str, expected_state: &str) -> AppResult<String> {
    let url = Url::parse(&format!("http://localhost{}", path))
        .map_err(|e| auth_error(&format!("Malformed callback URL: {}", e)))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(auth_error(&format!("Consent was not granted: {}", error)));
    }
    if state.as_deref() != Some(expected_state) {
        return Err(auth_error("Callback state does not match"));
    }
    code.ok_or_else(|| auth_error("No authorization code found in callback"))
}
