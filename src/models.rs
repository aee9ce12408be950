//! Data models for headlines as they move through the pipeline.
//!
//! - [`HeadlineRecord`]: a raw headline as returned by the news source
//! - [`CandidateHeadline`]: a headline that survived normalization/filtering
//! - [`Category`]: the closed set of topic labels, with [`Category::Other`]
//!   reserved as the overflow/unknown sink
//! - [`ClassifiedGroups`]: per-category accumulation with length caps
//! - [`DailySummary`]: the narrative paragraph and title for one run

use serde::Deserialize;
use std::fmt;

/// A raw headline record from the news source's top-headlines endpoint.
///
/// Deserialization is strict: a record missing its title or URL fails the
/// whole response decode. The source guarantees the shape, so a hole in it
/// is a defect to surface, not something to skip over quietly.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlineRecord {
    /// The full headline, possibly suffixed with `" - Source Name"`.
    pub title: String,
    /// Direct URL to the article.
    pub url: String,
    /// The publishing outlet.
    pub source: SourceRef,
}

/// The outlet that published a headline.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRef {
    pub name: String,
}

/// A headline that survived filtering and is eligible for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateHeadline {
    /// Normalized headline text (source suffix stripped).
    pub headline: String,
    /// The outlet name.
    pub source: String,
    /// Direct URL to the article.
    pub url: String,
}

/// The closed set of topic labels.
///
/// `Other` always exists and absorbs unrecognized labels and overflow.
/// [`Category::ALL`] fixes the declaration order used for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Politics,
    Technology,
    Health,
    Sports,
    Business,
    Entertainment,
    Other,
}

impl Category {
    /// Every category, in the fixed order sections are rendered in.
    pub const ALL: [Category; 7] = [
        Category::Politics,
        Category::Technology,
        Category::Health,
        Category::Sports,
        Category::Business,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Politics => "Politics",
            Category::Technology => "Technology",
            Category::Health => "Health",
            Category::Sports => "Sports",
            Category::Business => "Business",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// Parse a model-produced label. Case-insensitive, whitespace-tolerant.
    ///
    /// Returns `None` for anything outside the closed set; callers route
    /// unrecognized labels to [`Category::Other`] themselves so the fallback
    /// is visible at the call site.
    pub fn parse(label: &str) -> Option<Category> {
        let label = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }

    fn index(self) -> usize {
        match self {
            Category::Politics => 0,
            Category::Technology => 1,
            Category::Health => 2,
            Category::Sports => 3,
            Category::Business => 4,
            Category::Entertainment => 5,
            Category::Other => 6,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category headline accumulation with length caps.
///
/// Insertion order within a category is classification order. Named
/// categories share one cap; `Other` has its own. A candidate is moved into
/// exactly one group, so single assignment holds structurally.
pub struct ClassifiedGroups {
    named_cap: usize,
    other_cap: usize,
    groups: [Vec<CandidateHeadline>; Category::ALL.len()],
}

impl ClassifiedGroups {
    pub fn new(named_cap: usize, other_cap: usize) -> Self {
        Self {
            named_cap,
            other_cap,
            groups: std::array::from_fn(|_| Vec::new()),
        }
    }

    fn cap(&self, category: Category) -> usize {
        if category == Category::Other {
            self.other_cap
        } else {
            self.named_cap
        }
    }

    /// Append `candidate` to `category`'s group if it is below its cap.
    ///
    /// Returns `false` when the group is full and the candidate was dropped.
    /// Dropped candidates are gone; they are not retried elsewhere.
    pub fn assign(&mut self, category: Category, candidate: CandidateHeadline) -> bool {
        let cap = self.cap(category);
        let group = &mut self.groups[category.index()];
        if group.len() < cap {
            group.push(candidate);
            true
        } else {
            false
        }
    }

    pub fn get(&self, category: Category) -> &[CandidateHeadline] {
        &self.groups[category.index()]
    }

    /// Iterate groups in [`Category::ALL`] declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[CandidateHeadline])> {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// The two synthesized texts for one run.
pub struct DailySummary {
    pub narrative: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(n: usize) -> CandidateHeadline {
        CandidateHeadline {
            headline: format!("Headline {n}"),
            source: "Reuters".to_string(),
            url: format!("https://example.com/{n}"),
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Category::parse("Politics"), Some(Category::Politics));
        assert_eq!(Category::parse("technology"), Some(Category::Technology));
        assert_eq!(Category::parse("  SPORTS \n"), Some(Category::Sports));
    }

    #[test]
    fn parse_rejects_unknown_labels() {
        assert_eq!(Category::parse("Astrology"), None);
        assert_eq!(Category::parse(""), None);
        assert_eq!(Category::parse("Politics, Technology"), None);
    }

    #[test]
    fn declaration_order_ends_with_other() {
        assert_eq!(Category::ALL.last(), Some(&Category::Other));
        for (i, c) in Category::ALL.into_iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn assign_respects_named_cap() {
        let mut groups = ClassifiedGroups::new(2, 4);
        assert!(groups.assign(Category::Politics, candidate(1)));
        assert!(groups.assign(Category::Politics, candidate(2)));
        assert!(!groups.assign(Category::Politics, candidate(3)));
        assert_eq!(groups.get(Category::Politics).len(), 2);
    }

    #[test]
    fn assign_respects_other_cap() {
        let mut groups = ClassifiedGroups::new(8, 1);
        assert!(groups.assign(Category::Other, candidate(1)));
        assert!(!groups.assign(Category::Other, candidate(2)));
        assert_eq!(groups.get(Category::Other).len(), 1);
    }

    #[test]
    fn caps_bound_every_group() {
        let mut groups = ClassifiedGroups::new(3, 2);
        for n in 0..50 {
            let category = Category::ALL[n % Category::ALL.len()];
            groups.assign(category, candidate(n));
        }
        for (category, items) in groups.iter() {
            let cap = if category == Category::Other { 2 } else { 3 };
            assert!(items.len() <= cap, "{category} exceeded its cap");
        }
        assert!(groups.total() <= 6 * 3 + 2);
    }

    #[test]
    fn a_candidate_lands_in_exactly_one_group() {
        let mut groups = ClassifiedGroups::new(8, 8);
        groups.assign(Category::Health, candidate(1));
        let appearances: usize = groups
            .iter()
            .map(|(_, items)| items.iter().filter(|i| i.headline == "Headline 1").count())
            .sum();
        assert_eq!(appearances, 1);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut groups = ClassifiedGroups::new(8, 8);
        for n in [3, 1, 2] {
            groups.assign(Category::Business, candidate(n));
        }
        let headlines: Vec<&str> = groups
            .get(Category::Business)
            .iter()
            .map(|c| c.headline.as_str())
            .collect();
        assert_eq!(headlines, ["Headline 3", "Headline 1", "Headline 2"]);
    }
}
