//! HTTP client for the superhero catalog.
//!
//! Wraps the catalog's static JSON endpoints (`/all.json`, `/id/{id}.json`)
//! using [`reqwest`]. Responses are returned as [`RawHero`] records; the
//! client never normalizes them.

use serde_json::Value;
use superheroes_core::hero::RawHero;
use superheroes_core::types::DbId;

/// Public mirror of the catalog.
pub const DEFAULT_API_URL: &str = "https://akabab.github.io/superhero-api/api";

/// All valid endpoint strings.
const VALID_ENDPOINT_STRINGS: &[&str] = &["all", "id"];

/// Which part of the catalog to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroSelector {
    All,
    ById(DbId),
}

impl HeroSelector {
    /// Parse an endpoint name plus optional id.
    ///
    /// `"all"` ignores any id. `"id"` requires one.
    pub fn from_str(endpoint: &str, id: Option<DbId>) -> Result<Self, SourceError> {
        match (endpoint, id) {
            ("all", _) => Ok(Self::All),
            ("id", Some(id)) => Ok(Self::ById(id)),
            ("id", None) => Err(SourceError::UnknownSelector(
                "endpoint 'id' requires a hero id".to_string(),
            )),
            _ => Err(SourceError::UnknownSelector(format!(
                "Invalid endpoint '{endpoint}'. Must be one of: {}",
                VALID_ENDPOINT_STRINGS.join(", ")
            ))),
        }
    }

    /// Path of this selector relative to the catalog base URL.
    pub fn path(&self) -> String {
        match self {
            Self::All => "/all.json".to_string(),
            Self::ById(id) => format!("/id/{id}.json"),
        }
    }
}

/// Errors from the catalog client.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The caller asked for an endpoint the catalog does not have.
    #[error("Unknown source selector: {0}")]
    UnknownSelector(String),

    /// The HTTP request failed or the body was not JSON.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The catalog returned a non-2xx status code.
    #[error("Catalog API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was JSON but not a hero or a list of heroes.
    #[error("Unexpected catalog response: {0}")]
    Decode(String),
}

/// HTTP client for the superhero catalog.
pub struct HeroSourceClient {
    client: reqwest::Client,
    api_url: String,
}

impl HeroSourceClient {
    /// Create a client for the catalog rooted at `api_url`
    /// (e.g. [`DEFAULT_API_URL`]).
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    /// Fetch one hero or the whole catalog.
    ///
    /// Always returns a list: a single-object response becomes a list of one.
    pub async fn fetch(&self, selector: HeroSelector) -> Result<Vec<RawHero>, SourceError> {
        let url = format!("{}{}", self.api_url, selector.path());
        tracing::info!(%url, "Querying hero catalog");

        let response = self.client.get(&url).send().await?;
        let response = Self::ensure_success(response).await?;
        let body: Value = response.json().await?;

        let heroes = decode_heroes(body)?;
        tracing::debug!(count = heroes.len(), "Catalog returned heroes");
        Ok(heroes)
    }

    /// Ensure the response has a success status code.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SourceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Decode a catalog body that is either one hero object or an array of them.
fn decode_heroes(body: Value) -> Result<Vec<RawHero>, SourceError> {
    let items = match body {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(SourceError::Decode(format!(
                "expected a hero object or array, got {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| SourceError::Decode(e.to_string()))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
