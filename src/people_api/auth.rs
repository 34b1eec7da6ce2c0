use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use yup_oauth2::storage::{TokenInfo, TokenStorage};
use yup_oauth2::{ApplicationSecret, InstalledFlowAuthenticator, InstalledFlowReturnMethod};

use crate::config::AuthConfig;
use crate::error::AuthError;

// Treat tokens this close to expiry as already expired.
const EXPIRY_SKEW_SECS: i64 = 60;

/// OAuth credential as persisted in the token file.
///
/// Field names follow the "authorized user" JSON that Google's client
/// libraries write, so token files are interchangeable with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(rename = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .map_or(false, |expiry| now + Duration::seconds(EXPIRY_SKEW_SECS) >= expiry)
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && !self.is_expired(now)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().map_or(false, |t| !t.is_empty())
    }
}

/// Outcome of reading the token file.
#[derive(Debug)]
pub enum StoredCredential {
    Loaded(Credential),
    Missing,
    Unreadable(std::io::Error),
    Undecodable(serde_json::Error),
}

impl StoredCredential {
    pub fn parse(contents: &str) -> Self {
        match serde_json::from_str(contents) {
            Ok(credential) => StoredCredential::Loaded(credential),
            Err(e) => StoredCredential::Undecodable(e),
        }
    }
}

// Define a trait for token file operations to allow mocking
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    fn read(&self) -> std::io::Result<Option<String>>;
    fn write(&self, contents: &str) -> std::io::Result<()>;
    fn remove(&self) -> std::io::Result<()>;
}

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> std::io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        fs::write(&self.path, contents)
    }

    fn remove(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

// Define a trait for the interactive authorization step to allow mocking
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    async fn authorize(
        &self,
        secret: ApplicationSecret,
        scopes: Vec<String>,
    ) -> Result<Credential, AuthError>;
}

// yup-oauth2 keeps the refresh token to itself; this storage lets us see it.
#[derive(Clone, Default)]
struct CapturedToken(Arc<Mutex<Option<TokenInfo>>>);

impl CapturedToken {
    fn refresh_token(&self) -> Option<String> {
        self.0
            .lock()
            .ok()
            .and_then(|info| info.as_ref().and_then(|i| i.refresh_token.clone()))
    }
}

#[async_trait]
impl TokenStorage for CapturedToken {
    async fn set(&self, _scopes: &[&str], token: TokenInfo) -> anyhow::Result<()> {
        let mut slot = self
            .0
            .lock()
            .map_err(|_| anyhow::anyhow!("captured token lock poisoned"))?;
        *slot = Some(token);
        Ok(())
    }

    async fn get(&self, _scopes: &[&str]) -> Option<TokenInfo> {
        self.0.lock().ok().and_then(|info| info.clone())
    }
}

/// Installed-app flow with a local redirect listener on a fixed port.
pub struct InstalledAppFlow {
    port: u16,
}

impl InstalledAppFlow {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait]
impl AuthorizationFlow for InstalledAppFlow {
    async fn authorize(
        &self,
        secret: ApplicationSecret,
        scopes: Vec<String>,
    ) -> Result<Credential, AuthError> {
        let captured = CapturedToken::default();
        let auth = InstalledFlowAuthenticator::builder(
            secret.clone(),
            InstalledFlowReturnMethod::HTTPPortRedirect(self.port),
        )
        .with_storage(Box::new(captured.clone()))
        .build()
        .await
        .map_err(|e| AuthError::Flow(e.to_string()))?;

        let scopes_refs: Vec<&str> = scopes.iter().map(|s| s.as_str()).collect();
        let token = auth
            .token(&scopes_refs)
            .await
            .map_err(|e| AuthError::Flow(e.to_string()))?;

        let access_token = token
            .token()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Flow("authorization returned no access token".into()))?
            .to_string();
        let expiry = token
            .expiration_time()
            .and_then(|t| DateTime::<Utc>::from_timestamp(t.unix_timestamp(), 0));

        Ok(Credential {
            access_token,
            refresh_token: captured.refresh_token(),
            token_uri: secret.token_uri,
            client_id: secret.client_id,
            client_secret: secret.client_secret,
            scopes,
            expiry,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

/// Loads, refreshes, or interactively obtains the OAuth credential.
pub struct CredentialStore<S: TokenStore, F: AuthorizationFlow> {
    config: AuthConfig,
    storage: S,
    flow: F,
    client: reqwest::Client,
}

impl<S: TokenStore, F: AuthorizationFlow> CredentialStore<S, F> {
    pub fn new(config: AuthConfig, storage: S, flow: F, client: reqwest::Client) -> Self {
        Self {
            config,
            storage,
            flow,
            client,
        }
    }

    pub fn load_stored(&self) -> StoredCredential {
        match self.storage.read() {
            Ok(Some(contents)) => StoredCredential::parse(&contents),
            Ok(None) => StoredCredential::Missing,
            Err(e) => StoredCredential::Unreadable(e),
        }
    }

    pub async fn obtain_credential(&self) -> Result<Credential, AuthError> {
        let stored = match self.load_stored() {
            StoredCredential::Loaded(credential) => Some(credential),
            StoredCredential::Missing => None,
            StoredCredential::Unreadable(e) => {
                warn!(path = %self.config.token_file.display(), error = %e, "Could not read token file; re-authorizing");
                None
            }
            StoredCredential::Undecodable(e) => {
                warn!(path = %self.config.token_file.display(), error = %e, "Ignoring malformed token file; re-authorizing");
                None
            }
        };

        let now = Utc::now();
        let credential = match stored {
            Some(credential) if credential.is_valid(now) => {
                debug!("Using stored credential");
                return Ok(credential);
            }
            Some(credential) if credential.is_expired(now) && credential.can_refresh() => {
                self.refresh(credential).await?
            }
            _ => self.run_authorization_flow().await?,
        };

        self.persist(&credential)?;
        Ok(credential)
    }

    async fn refresh(&self, credential: Credential) -> Result<Credential, AuthError> {
        let refresh_token = credential.refresh_token.clone().unwrap_or_default();
        info!("Access token expired; refreshing");

        let response = self
            .client
            .post(&credential.token_uri)
            .form(&[
                ("client_id", credential.client_id.as_str()),
                ("client_secret", credential.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Refresh(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Refresh(format!("{}: {}", status, body)));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Refresh(format!("malformed token response: {}", e)))?;

        let scopes = match token_response.scope {
            Some(scope) => scope.split_whitespace().map(str::to_string).collect(),
            None => credential.scopes,
        };

        let expiry = match token_response.expires_in {
            Some(secs) => Some(
                Duration::try_seconds(secs)
                    .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
                    .ok_or_else(|| {
                        AuthError::Refresh(format!("invalid expires_in in token response: {}", secs))
                    })?,
            ),
            None => None,
        };

        Ok(Credential {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token.or(Some(refresh_token)),
            expiry,
            scopes,
            ..credential
        })
    }

    async fn run_authorization_flow(&self) -> Result<Credential, AuthError> {
        let path = &self.config.credentials_file;
        let secret = yup_oauth2::read_application_secret(path)
            .await
            .map_err(|source| AuthError::ClientSecret {
                path: path.display().to_string(),
                source,
            })?;

        info!(
            port = self.config.callback_port,
            "Starting interactive authorization; open the printed URL in a browser"
        );
        let credential = self
            .flow
            .authorize(secret, self.config.scopes.clone())
            .await?;
        info!("Authorization complete");
        Ok(credential)
    }

    fn persist(&self, credential: &Credential) -> Result<(), AuthError> {
        let persist_error = |source| AuthError::Persist {
            path: self.config.token_file.display().to_string(),
            source,
        };
        let json = serde_json::to_string(credential)
            .map_err(|e| persist_error(std::io::Error::new(ErrorKind::InvalidData, e)))?;
        self.storage.write(&json).map_err(persist_error)?;
        debug!(path = %self.config.token_file.display(), "Saved credential");
        Ok(())
    }
}

// Main authentication function
pub async fn try_authenticate(
    config: &AuthConfig,
    client: reqwest::Client,
) -> Result<Credential, AuthError> {
    let store = CredentialStore::new(
        config.clone(),
        FileTokenStore::new(&config.token_file),
        InstalledAppFlow::new(config.callback_port),
        client,
    );
    store.obtain_credential().await
}
