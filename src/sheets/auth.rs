/// Service-account authentication for the Google Sheets API
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Result, CollectorError};

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

// Refresh this many seconds before the token actually expires
const EXPIRY_MARGIN_SEC: i64 = 60;

/// Service-account key file (the JSON downloaded from the cloud console)
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CollectorError::ConfigError(format!("Failed to read credentials file {}: {}", path, e))
        })?;
        let key: ServiceAccountKey = serde_json::from_str(&content).map_err(|e| {
            CollectorError::ConfigError(format!("Failed to parse credentials file: {}", e))
        })?;
        Ok(key)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expiry: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expiry - Duration::seconds(EXPIRY_MARGIN_SEC)
    }
}

/// Lazily fetches and caches a bearer token for the Sheets API.
///
/// A failed exchange is returned to the caller as a recoverable error; the
/// scheduler retries on the next cycle instead of terminating.
pub struct TokenProvider {
    key: ServiceAccountKey,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(key: ServiceAccountKey) -> Self {
        TokenProvider {
            key,
            cached: RwLock::new(None),
        }
    }

    /// Get a valid bearer token, exchanging a fresh assertion if needed
    pub async fn bearer_token(&self, client: &Client) -> Result<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let token = self.exchange(client).await?;
        let access_token = token.access_token.clone();

        let mut cached = self.cached.write().await;
        *cached = Some(token);

        Ok(access_token)
    }

    async fn exchange(&self, client: &Client) -> Result<CachedToken> {
        debug!("Exchanging service-account assertion for access token");

        let now = Utc::now();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| CollectorError::AuthenticationFailed(format!("Invalid private key: {}", e)))?;

        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| CollectorError::AuthenticationFailed(format!("JWT signing failed: {}", e)))?;

        let response = client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| CollectorError::AuthenticationFailed(format!("Token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CollectorError::AuthenticationFailed(format!("Token response: {}", e)))?;

        if !status.is_success() {
            return Err(CollectorError::AuthenticationFailed(format!(
                "Token endpoint returned {}: {}", status, body
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| CollectorError::AuthenticationFailed(format!("Token parse error: {}", e)))?;

        let expiry = now + Duration::seconds(token.expires_in);
        info!("Sheets access token obtained, expires at {}", expiry);

        Ok(CachedToken {
            access_token: token.access_token,
            expiry,
        })
    }
}
