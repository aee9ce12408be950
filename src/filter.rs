//! Headline normalization and filtering.
//!
//! Titles from the aggregation API arrive as `"Actual headline - Outlet
//! Name"`; the suffix is stripped before anything else looks at the title.
//! Blocklists then drop content nobody wants in a digest (horoscopes) and
//! links to domains the digest should not amplify. The keyword blocklist is
//! matched against the truncated title, so a keyword appearing only in the
//! stripped outlet suffix does not reject the story.

use crate::models::{CandidateHeadline, HeadlineRecord};
use tracing::debug;

/// The normalization and drop rules for one run.
///
/// Keywords and domains are matched as case-insensitive substrings; domain
/// matching is against the full URL rather than a parsed host, which also
/// catches subdomains and country-specific variants.
pub struct FilterRules {
    pub source_separator: String,
    pub blocked_keywords: Vec<String>,
    pub blocked_domains: Vec<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            source_separator: " - ".to_string(),
            blocked_keywords: vec!["horoscope".to_string()],
            blocked_domains: vec![
                "facebook.com".to_string(),
                "twitter.com".to_string(),
                "x.com".to_string(),
                "instagram.com".to_string(),
                "tiktok.com".to_string(),
                ".gov".to_string(),
            ],
        }
    }
}

/// Normalize raw records into candidates, dropping blocked ones.
///
/// Order is preserved; every surviving record maps 1:1 to a candidate.
pub fn normalize(records: Vec<HeadlineRecord>, rules: &FilterRules) -> Vec<CandidateHeadline> {
    records
        .into_iter()
        .filter_map(|record| {
            let HeadlineRecord { title, url, source } = record;
            let headline = match title.find(&rules.source_separator) {
                Some(idx) => title[..idx].trim_end().to_string(),
                None => title,
            };

            let lowered = headline.to_lowercase();
            if let Some(keyword) = rules
                .blocked_keywords
                .iter()
                .find(|k| lowered.contains(k.as_str()))
            {
                debug!(%headline, %keyword, "dropping headline on keyword blocklist");
                return None;
            }

            let url_lowered = url.to_lowercase();
            if let Some(domain) = rules
                .blocked_domains
                .iter()
                .find(|d| url_lowered.contains(d.as_str()))
            {
                debug!(%url, %domain, "dropping headline on domain blocklist");
                return None;
            }

            Some(CandidateHeadline {
                headline,
                source: source.name,
                url,
            })
        })
        .collect()
}
