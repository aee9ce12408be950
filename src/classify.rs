//! Per-headline topic classification with bounded accumulation.
//!
//! One model call per candidate, strictly sequential, with the fixed pacing
//! pause after every call. Classification failure is never fatal: a failed
//! or unrecognized reply lands the headline in [`Category::Other`] and the
//! run continues.

use crate::gemini::{MODEL_CALL_DELAY, TextModel};
use crate::models::{CandidateHeadline, Category, ClassifiedGroups};
use crate::pacing::Pacer;
use itertools::Itertools;
use tracing::{debug, info, warn};

pub struct Classifier<'a, M, P> {
    model: &'a M,
    pacer: &'a P,
}

fn classification_prompt(headline: &str) -> String {
    let labels = Category::ALL.iter().map(|c| c.label()).join(", ");
    format!(
        "Classify the following news headline into ONLY one of these categories:\n\
         {labels}\n\
         \n\
         Reply with the category name alone.\n\
         \n\
         Headline: \"{headline}\"\n\
         Category:"
    )
}

impl<'a, M, P> Classifier<'a, M, P>
where
    M: TextModel,
    P: Pacer,
{
    pub fn new(model: &'a M, pacer: &'a P) -> Self {
        Self { model, pacer }
    }

    /// Classify every candidate in order, accumulating into `groups`.
    ///
    /// Candidates arriving after their category fills its cap are dropped.
    pub async fn classify_all(
        &self,
        candidates: Vec<CandidateHeadline>,
        mut groups: ClassifiedGroups,
    ) -> ClassifiedGroups {
        let total = candidates.len();
        info!(total, "classifying headlines");
        for candidate in candidates {
            let category = self.classify_one(&candidate.headline).await;
            let headline = candidate.headline.clone();
            if groups.assign(category, candidate) {
                debug!(%category, %headline, "classified");
            } else {
                debug!(%category, %headline, "category at capacity; dropping headline");
            }
        }
        info!(kept = groups.total(), total, "classification complete");
        groups
    }

    async fn classify_one(&self, headline: &str) -> Category {
        let reply = self.model.generate(&classification_prompt(headline)).await;
        self.pacer.pause(MODEL_CALL_DELAY).await;
        match reply {
            Ok(label) => Category::parse(&label).unwrap_or_else(|| {
                warn!(%label, %headline, "unrecognized category label; routing to Other");
                Category::Other
            }),
            Err(e) => {
                warn!(error = %e, %headline, "classification call failed; routing to Other");
                Category::Other
            }
        }
    }
}
