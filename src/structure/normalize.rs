use anyhow::{Context, Result};
use regex::Regex;

use super::model::NormalizedLine;

/// Outcome of normalizing one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Line(NormalizedLine),
    /// The raw line was empty after trimming. Kept as spacing inside schedules.
    Blank,
    /// Page numbers and lines that only held a URL or translation marker.
    Skip,
}

#[derive(Debug)]
pub struct LineNormalizer {
    page_number: Regex,
    url: Regex,
    translation: Regex,
}

impl LineNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            page_number: Regex::new(r"^\d+$").context("failed to compile page number regex")?,
            url: Regex::new(r"(?:https?://|www\.)\S+").context("failed to compile url regex")?,
            translation: Regex::new(r"(?i)\s*\((?:Official|Unofficial)\s+Translation\)\s*")
                .context("failed to compile translation marker regex")?,
        })
    }

    pub fn normalize(&self, raw: &str) -> Normalized {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Normalized::Blank;
        }
        if self.is_page_number(trimmed) {
            return Normalized::Skip;
        }

        let text = self.strip(trimmed);
        if text.is_empty() {
            return Normalized::Skip;
        }

        Normalized::Line(NormalizedLine {
            text,
            original: trimmed.to_string(),
        })
    }

    pub fn is_page_number(&self, trimmed: &str) -> bool {
        self.page_number.is_match(trimmed)
    }

    /// Removes URLs then translation annotations and re-trims. Inner spacing
    /// is kept so column gaps survive for table detection. Idempotent.
    pub fn strip(&self, text: &str) -> String {
        let without_urls = self.url.replace_all(text.trim(), "");
        self.translation
            .replace_all(without_urls.trim(), " ")
            .trim()
            .to_string()
    }
}
