//! Narrative summary and punny title generation.
//!
//! Two independent model calls over the finalized classified set. Both
//! degrade to fixed fallbacks on failure; neither can abort the run. An
//! empty classified set short-circuits both calls entirely: the summary
//! returns its sentinel and the title its deterministic date fallback,
//! without touching the model.

use crate::config::TitleStrategy;
use crate::gemini::{MODEL_CALL_DELAY, TextModel};
use crate::models::ClassifiedGroups;
use crate::pacing::Pacer;
use chrono::NaiveDate;
use itertools::Itertools;
use tracing::{info, warn};

/// Returned when there is nothing to summarize.
pub const EMPTY_SUMMARY: &str = "No notable headlines today.";

/// Returned when the summary call fails.
pub const FALLBACK_SUMMARY: &str =
    "Today's briefing could not be summarized; the full rundown is below.";

pub struct Synthesizer<'a, M, P> {
    model: &'a M,
    pacer: &'a P,
    strategy: TitleStrategy,
}

/// One line per classified headline, tagged with category and source.
fn tagged_headlines(groups: &ClassifiedGroups) -> String {
    groups
        .iter()
        .flat_map(|(category, items)| {
            items
                .iter()
                .map(move |item| format!("[{category}] {} ({})", item.headline, item.source))
        })
        .join("\n")
}

fn summary_prompt(groups: &ClassifiedGroups) -> String {
    format!(
        "You are writing the opening paragraph of a daily news digest.\n\
         Today's classified headlines:\n\
         {}\n\
         \n\
         Write a narrative summary of at most five sentences, leading with \
         the two or three most impactful stories. Reply with plain prose \
         only, no markdown.",
        tagged_headlines(groups)
    )
}

fn title_prompt(material: &str, today: NaiveDate) -> String {
    format!(
        "Today is {}. Write one short, punny title for a daily news digest, \
         prefixed with the date or the day name. Base the pun on this \
         material:\n\
         {material}\n\
         \n\
         Reply with the title alone, no quotes.",
        today.format("%A, %B %d, %Y")
    )
}

pub fn fallback_title(today: NaiveDate) -> String {
    format!("Your Daily Cowsay News - {}", today.format("%B %d, %Y"))
}

impl<'a, M, P> Synthesizer<'a, M, P>
where
    M: TextModel,
    P: Pacer,
{
    pub fn new(model: &'a M, pacer: &'a P, strategy: TitleStrategy) -> Self {
        Self {
            model,
            pacer,
            strategy,
        }
    }

    pub async fn summarize(&self, groups: &ClassifiedGroups) -> String {
        if groups.is_empty() {
            info!("no classified headlines; skipping summary call");
            return EMPTY_SUMMARY.to_string();
        }
        let reply = self.model.generate(&summary_prompt(groups)).await;
        self.pacer.pause(MODEL_CALL_DELAY).await;
        match reply {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                warn!("summary call returned empty text; using fallback");
                FALLBACK_SUMMARY.to_string()
            }
            Err(e) => {
                warn!(error = %e, "summary call failed; using fallback");
                FALLBACK_SUMMARY.to_string()
            }
        }
    }

    pub async fn title(
        &self,
        groups: &ClassifiedGroups,
        narrative: &str,
        today: NaiveDate,
    ) -> String {
        if groups.is_empty() {
            return fallback_title(today);
        }
        let material = match self.strategy {
            TitleStrategy::Summary => narrative.to_string(),
            TitleStrategy::Headlines => tagged_headlines(groups),
        };
        let reply = self.model.generate(&title_prompt(&material, today)).await;
        self.pacer.pause(MODEL_CALL_DELAY).await;
        match reply {
            Ok(title) if !title.is_empty() => title.trim_matches('"').to_string(),
            Ok(_) => fallback_title(today),
            Err(e) => {
                warn!(error = %e, "title call failed; using date fallback");
                fallback_title(today)
            }
        }
    }
}
