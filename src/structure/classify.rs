use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::model::StructuralTag;

/// How a symbol-prefixed parenthesized marker such as `♦(3)` is classified.
///
/// Older converter output treated these as plain list items. Only one of the
/// two rules is ever installed in a classifier.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SymbolListPolicy {
    #[default]
    Heading,
    ListItem,
}

#[derive(Debug)]
pub struct ClassificationRule {
    pub name: &'static str,
    pattern: Regex,
    pub tag: StructuralTag,
}

impl ClassificationRule {
    fn new(name: &'static str, pattern: &str, tag: StructuralTag) -> Result<Self> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)
                .with_context(|| format!("failed to compile classification rule `{name}`"))?,
            tag,
        })
    }

    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// Ordered rule table; the first matching rule decides the tag.
#[derive(Debug)]
pub struct LineClassifier {
    rules: Vec<ClassificationRule>,
}

pub(crate) const DATE_OF_PATTERN: &str = r"(?i)^Date of (?:Authentication and Publication|Authentication|Publication|Royal Seal and Publication)\b";
pub(crate) const AMENDMENTS_PATTERN: &str = r"(?i)^Amendments\s*:?";

impl LineClassifier {
    pub fn new() -> Result<Self> {
        Self::with_policy(SymbolListPolicy::default())
    }

    pub fn with_policy(policy: SymbolListPolicy) -> Result<Self> {
        use StructuralTag::*;

        let mut rules = vec![
            ClassificationRule::new("notes", r"(?i)^Notes\s*:", Normal)?,
            ClassificationRule::new("symbol_section", r"^[♦◉]\s*\d+[A-Za-z]?\.", Heading3)?,
        ];
        if policy == SymbolListPolicy::ListItem {
            rules.push(ClassificationRule::new(
                "symbol_list_item",
                r"^[♦◉]\s*\(\d+\)",
                Normal,
            )?);
        }
        rules.extend([
            ClassificationRule::new("schedule", r"(?i)^Schedule\b", Heading5)?,
            ClassificationRule::new("act_title", r"(?i)^NEPAL.*ACT.*\d{4}", Title)?,
            ClassificationRule::new("date_of", DATE_OF_PATTERN, Subtitle)?,
            ClassificationRule::new("act_made_to", r"(?i)^AN ACT MADE TO", Subtitle)?,
            ClassificationRule::new("amendments", AMENDMENTS_PATTERN, Subtitle)?,
            ClassificationRule::new("preamble", r"(?i)^Preamble\s*:?", Heading1)?,
            ClassificationRule::new("chapter", r"(?i)^Chapter\s*[-–]?\s*\d+", Heading2)?,
        ]);
        if policy == SymbolListPolicy::Heading {
            rules.push(ClassificationRule::new(
                "symbol_marker",
                r"^[♦◉]\s*\(\d+\)",
                Heading3,
            )?);
        }
        rules.extend([
            ClassificationRule::new("numbered_section", r"^\d+[A-Za-z]?\.\s+", Heading3)?,
            ClassificationRule::new("numeric_marker", r"^\(\d+\)", Heading4)?,
            ClassificationRule::new("date_stamp", r"^\d{4}\.\d{1,2}\.\d{1,2}", Normal)?,
        ]);

        Ok(Self { rules })
    }

    pub fn classify(&self, line: &str) -> StructuralTag {
        self.matching_rule(line)
            .map(|rule| rule.tag)
            .unwrap_or(StructuralTag::Normal)
    }

    pub fn matching_rule(&self, line: &str) -> Option<&ClassificationRule> {
        let line = line.trim();
        self.rules.iter().find(|rule| rule.matches(line))
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }
}
