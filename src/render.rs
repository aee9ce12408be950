//! HTML rendering of the classified digest.
//!
//! A pure function of its inputs: no I/O, no clock, no network. The output
//! is a self-contained fragment (scoped `<style>` block plus markup) that
//! renders correctly when embedded verbatim in a blog post.
//!
//! Every headline, source name, and URL is escaped before embedding. The
//! upstream aggregator relays third-party titles, so anything reaching this
//! module is untrusted.

use crate::models::ClassifiedGroups;
use html_escape::{encode_double_quoted_attribute, encode_text};

// CSS is scoped under .cow-post so the blog theme is left alone.
const STYLE: &str = r#"<style>
    .cow-post {
        max-width: 700px;
        margin: 2em auto;
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
        line-height: 1.6;
    }
    .cow-post .speech-bubble {
        background-color: #f8f9fa;
        border: 2px solid #dee2e6;
        border-radius: 15px;
        padding: 1.5em;
        position: relative;
        margin-bottom: 1.5em;
        box-shadow: 0 4px 12px rgba(0,0,0,0.05);
    }
    .cow-post .speech-bubble::after {
        content: '';
        position: absolute;
        bottom: -20px;
        left: 60px;
        border-width: 20px 20px 0 0;
        border-style: solid;
        border-color: #f8f9fa transparent transparent transparent;
        filter: drop-shadow(0 2px 0 #dee2e6);
        transform: rotate(15deg);
    }
    .cow-post h2 {
        font-size: 1.8em;
        margin-top: 0;
        color: #212529;
    }
    .cow-post h3 {
        font-size: 1.3em;
        border-bottom: 2px solid #e9ecef;
        padding-bottom: 5px;
        margin-top: 1.5em;
        color: #495057;
    }
    .cow-post .narrative {
        font-style: italic;
        color: #495057;
    }
    .cow-post ul {
        list-style-type: none;
        padding-left: 0;
    }
    .cow-post li {
        margin-bottom: 0.8em;
        padding-left: 1.2em;
        position: relative;
    }
    .cow-post li::before {
        content: '🐮';
        position: absolute;
        left: 0;
        top: 0;
        font-size: 0.8em;
    }
    .cow-post a {
        text-decoration: none;
        font-weight: 500;
        color: #007bff;
    }
    .cow-post a:hover {
        text-decoration: underline;
    }
    .cow-post .source {
        font-size: 0.9em;
        color: #6c757d;
    }
    .cow-post .cow-art {
        font-family: monospace, monospace;
        font-size: 1em;
        color: #495057;
        line-height: 1.2;
        text-align: left;
        margin-left: 1em;
        white-space: pre;
    }
</style>"#;

const GREETING: &str = "Moo-rning! Here's your daily news roundup...";

const COW_ART: &str = r"
        \   ^__^
         \  (oo)\_______
            (__)\       )\/\
                ||----w |
                ||     ||
";

/// Render the classified groups (and optional narrative) into the digest
/// fragment. Sections appear in category declaration order; categories with
/// no headlines are omitted entirely.
pub fn render_digest(groups: &ClassifiedGroups, narrative: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(STYLE);
    out.push('\n');
    out.push_str("<div class=\"cow-post\">\n");
    out.push_str("  <div class=\"speech-bubble\">\n");
    out.push_str(&format!("    <h2>{}</h2>\n", encode_text(GREETING)));

    if let Some(narrative) = narrative {
        out.push_str(&format!(
            "    <p class=\"narrative\">{}</p>\n",
            encode_text(narrative)
        ));
    }

    for (category, items) in groups.iter() {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "    <h3>{}</h3>\n",
            encode_text(&category.label().to_uppercase())
        ));
        out.push_str("    <ul>\n");
        for item in items {
            out.push_str("      <li>\n");
            out.push_str(&format!(
                "        <a href=\"{}\" target=\"_blank\">{}</a>\n",
                encode_double_quoted_attribute(&item.url),
                encode_text(&item.headline)
            ));
            out.push_str(&format!(
                "        <span class=\"source\"> ({})</span>\n",
                encode_text(&item.source)
            ));
            out.push_str("      </li>\n");
        }
        out.push_str("    </ul>\n");
    }

    out.push_str("  </div>\n");
    out.push_str(&format!(
        "  <pre class=\"cow-art\">{}</pre>\n",
        encode_text(COW_ART)
    ));
    out.push_str("</div>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateHeadline, Category};

    fn candidate(headline: &str, source: &str, url: &str) -> CandidateHeadline {
        CandidateHeadline {
            headline: headline.to_string(),
            source: source.to_string(),
            url: url.to_string(),
        }
    }

    fn sample_groups() -> ClassifiedGroups {
        let mut groups = ClassifiedGroups::new(8, 8);
        groups.assign(
            Category::Technology,
            candidate("Robots milk cows", "Tech Wire", "https://example.com/robots"),
        );
        groups.assign(
            Category::Politics,
            candidate("Farm bill passes", "Capitol News", "https://example.com/bill"),
        );
        groups
    }

    #[test]
    fn rendering_is_deterministic() {
        let groups = sample_groups();
        let first = render_digest(&groups, Some("A quiet day."));
        let second = render_digest(&groups, Some("A quiet day."));
        assert_eq!(first, second);
    }

    #[test]
    fn escapes_markup_in_headlines() {
        let mut groups = ClassifiedGroups::new(8, 8);
        groups.assign(
            Category::Other,
            candidate(
                "<script>alert('moo')</script>",
                "Sketchy Source",
                "https://example.com/x",
            ),
        );
        let html = render_digest(&groups, None);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn escapes_quotes_in_urls() {
        let mut groups = ClassifiedGroups::new(8, 8);
        groups.assign(
            Category::Other,
            candidate("Odd link", "X", "https://example.com/\"><script>"),
        );
        let html = render_digest(&groups, None);
        assert!(!html.contains("href=\"https://example.com/\"><script>"));
    }

    #[test]
    fn sections_follow_declaration_order() {
        let html = render_digest(&sample_groups(), None);
        let politics = html.find("POLITICS").unwrap();
        let technology = html.find("TECHNOLOGY").unwrap();
        assert!(politics < technology, "Politics must render before Technology");
    }

    #[test]
    fn empty_categories_are_omitted() {
        let html = render_digest(&sample_groups(), None);
        assert!(!html.contains("SPORTS"));
        assert!(!html.contains("OTHER"));
    }

    #[test]
    fn narrative_is_included_when_present() {
        let html = render_digest(&sample_groups(), Some("Big day for farm policy."));
        assert!(html.contains("Big day for farm policy."));
        let without = render_digest(&sample_groups(), None);
        assert!(!without.contains("class=\"narrative\""));
    }

    #[test]
    fn fragment_is_self_contained() {
        let html = render_digest(&sample_groups(), None);
        assert!(html.starts_with("<style>"));
        assert!(html.contains("class=\"cow-post\""));
        assert!(html.contains("^__^"));
        assert!(html.trim_end().ends_with("</div>"));
    }
}
