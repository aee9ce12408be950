//! Command-line interface definitions.
//!
//! All credentials and tunables are `clap` arguments backed by environment
//! variables, so a cron entry can pass nothing and let the environment
//! drive the run. Missing required configuration is rejected by clap before
//! the pipeline starts.

use crate::config::TitleStrategy;
use clap::Parser;

/// Command-line arguments for one pipeline run.
///
/// # Examples
///
/// ```sh
/// # Everything from the environment
/// cowsay-daily-news
///
/// # Preview the rendered HTML without touching the blog
/// cowsay-daily-news --dry-run
///
/// # A smaller run against UK headlines
/// cowsay-daily-news --country gb --page-size 10 --category-cap 4
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// News source API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    /// Gemini model id used for every prompt
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-2.5-flash")]
    pub gemini_model: String,

    /// Ghost admin API key in `id:secret` format
    #[arg(long, env = "GHOST_ADMIN_API_KEY", hide_env_values = true)]
    pub ghost_admin_api_key: String,

    /// Base URL of the Ghost instance (e.g. https://blog.example.com)
    #[arg(long, env = "GHOST_URL")]
    pub ghost_url: String,

    /// Optional author id attached to created posts
    #[arg(long, env = "GHOST_AUTHOR_ID")]
    pub author_id: Option<String>,

    /// Fallback newsletter id when no active newsletter is found
    #[arg(long, env = "GHOST_NEWSLETTER_ID")]
    pub newsletter_id: Option<String>,

    /// Country code passed to the top-headlines endpoint
    #[arg(long, default_value = "us")]
    pub country: String,

    /// Number of headlines requested from the news source
    #[arg(long, default_value_t = 20)]
    pub page_size: u32,

    /// Maximum headlines kept per named category
    #[arg(long, default_value_t = 8)]
    pub category_cap: usize,

    /// Maximum headlines kept in the Other bucket
    #[arg(long, default_value_t = 8)]
    pub other_cap: usize,

    /// What the punny title is derived from
    #[arg(long, value_enum, default_value_t = TitleStrategy::Summary)]
    pub title_strategy: TitleStrategy,

    /// Print the rendered HTML to stdout instead of publishing
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 9] = [
        "cowsay-daily-news",
        "--news-api-key",
        "news-key",
        "--gemini-api-key",
        "gemini-key",
        "--ghost-admin-api-key",
        "abc:feedbeef",
        "--ghost-url",
        "https://blog.example.com",
    ];

    #[test]
    fn parses_required_args_with_defaults() {
        let cli = Cli::parse_from(REQUIRED);
        assert_eq!(cli.country, "us");
        assert_eq!(cli.page_size, 20);
        assert_eq!(cli.category_cap, 8);
        assert_eq!(cli.other_cap, 8);
        assert_eq!(cli.title_strategy, TitleStrategy::Summary);
        assert!(!cli.dry_run);
    }

    #[test]
    fn parses_overrides() {
        let mut args: Vec<&str> = REQUIRED.to_vec();
        args.extend([
            "--country",
            "gb",
            "--page-size",
            "10",
            "--title-strategy",
            "headlines",
            "--dry-run",
        ]);
        let cli = Cli::parse_from(args);
        assert_eq!(cli.country, "gb");
        assert_eq!(cli.page_size, 10);
        assert_eq!(cli.title_strategy, TitleStrategy::Headlines);
        assert!(cli.dry_run);
    }
}
