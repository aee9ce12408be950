//! Immutable run configuration.
//!
//! Everything configurable is resolved here, once, before any network
//! activity. Components receive a `&Config` (or the fields they need) from
//! their constructors and never read the environment themselves.

use crate::cli::Cli;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("admin API key is not in 'id:secret' format")]
    AdminKeyFormat,
    #[error("admin API key secret is not valid hex: {0}")]
    AdminKeySecret(#[from] hex::FromHexError),
    #[error("invalid Ghost base URL {url:?}: {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },
}

/// A Ghost admin API key, split into its key id and decoded secret.
///
/// The wire format is `<id>:<hex-secret>`; the hex half is decoded up front
/// so a malformed credential fails at startup, not mid-publish.
#[derive(Clone)]
pub struct AdminApiKey {
    pub id: String,
    pub secret: Vec<u8>,
}

impl FromStr for AdminApiKey {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (id, secret_hex) = raw.split_once(':').ok_or(ConfigError::AdminKeyFormat)?;
        if id.is_empty() || secret_hex.is_empty() {
            return Err(ConfigError::AdminKeyFormat);
        }
        Ok(Self {
            id: id.to_string(),
            secret: hex::decode(secret_hex)?,
        })
    }
}

/// Which input the punny-title prompt is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TitleStrategy {
    /// Derive the title from the narrative summary paragraph.
    Summary,
    /// Derive the title from the full classified headline list.
    Headlines,
}

/// The resolved, validated configuration for one run.
pub struct Config {
    pub news_api_key: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub admin_key: AdminApiKey,
    /// Ghost base URL, trailing slash trimmed.
    pub ghost_url: String,
    pub author_id: Option<String>,
    /// Fallback newsletter when the lookup finds no active one.
    pub newsletter_id: Option<String>,
    pub country: String,
    pub page_size: u32,
    pub category_cap: usize,
    pub other_cap: usize,
    pub title_strategy: TitleStrategy,
    pub dry_run: bool,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let admin_key: AdminApiKey = cli.ghost_admin_api_key.parse()?;
        let ghost_url = cli.ghost_url.trim_end_matches('/').to_string();
        Url::parse(&ghost_url).map_err(|source| ConfigError::BaseUrl {
            url: ghost_url.clone(),
            source,
        })?;

        Ok(Self {
            news_api_key: cli.news_api_key,
            gemini_api_key: cli.gemini_api_key,
            gemini_model: cli.gemini_model,
            admin_key,
            ghost_url,
            author_id: cli.author_id,
            newsletter_id: cli.newsletter_id,
            country: cli.country,
            page_size: cli.page_size,
            category_cap: cli.category_cap,
            other_cap: cli.other_cap,
            title_strategy: cli.title_strategy,
            dry_run: cli.dry_run,
        })
    }
}
