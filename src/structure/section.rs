use anyhow::{Context, Result};
use regex::Regex;

use super::model::ParsedHeading;

/// Splits section and chapter heading lines into number, title and any
/// subsection that shares the line.
#[derive(Debug)]
pub struct SectionParser {
    numbered: Regex,
    symbol: Regex,
    first_marker: Regex,
    subsection: Regex,
    chapter: Regex,
}

impl SectionParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            numbered: Regex::new(r"^(\d+[A-Za-z]?)\.\s*(.*)$")
                .context("failed to compile numbered section regex")?,
            symbol: Regex::new(r"^([♦◉])\s*(\d+[A-Za-z]?)\.?\s*(.*)$")
                .context("failed to compile symbol section regex")?,
            first_marker: Regex::new(r"\s*\(\d+\)").context("failed to compile marker regex")?,
            subsection: Regex::new(r"^\((\d+)\)\s*(.*)$")
                .context("failed to compile subsection regex")?,
            chapter: Regex::new(r"(?i)^Chapter\s*[-–]?\s*(\d+)\s*(.*)$")
                .context("failed to compile chapter regex")?,
        })
    }

    pub fn parse_section(&self, line: &str) -> Option<ParsedHeading> {
        let line = line.trim();
        let (number, body) = if let Some(captures) = self.numbered.captures(line) {
            (captures[1].to_string(), captures[2].trim().to_string())
        } else if let Some(captures) = self.symbol.captures(line) {
            (
                format!("{}{}", &captures[1], &captures[2]),
                captures[3].trim().to_string(),
            )
        } else {
            return None;
        };

        let (title, remainder) = match self.first_marker.find(&body) {
            Some(found) => (
                body[..found.start()].trim().to_string(),
                body[found.start()..].trim().to_string(),
            ),
            None => (body.clone(), String::new()),
        };

        let embedded_subsections = self
            .parse_subsection(&remainder)
            .into_iter()
            .collect::<Vec<(String, String)>>();

        Some(ParsedHeading {
            number,
            title,
            embedded_subsections,
        })
    }

    /// Parses `(n) text` into its marker number and body.
    pub fn parse_subsection(&self, line: &str) -> Option<(String, String)> {
        let captures = self.subsection.captures(line.trim())?;
        Some((captures[1].to_string(), captures[2].trim().to_string()))
    }

    /// Parses `Chapter-3 Title` into `("3", "Title")`.
    pub fn parse_chapter(&self, line: &str) -> Option<(String, String)> {
        let captures = self.chapter.captures(line.trim())?;
        Some((captures[1].trim().to_string(), captures[2].trim().to_string()))
    }
}

pub fn section_heading_text(number: &str, title: &str) -> String {
    labelled_heading("Section", number, title)
}

pub fn chapter_heading_text(number: &str, title: &str) -> String {
    labelled_heading("Chapter", number, title)
}

fn labelled_heading(label: &str, number: &str, title: &str) -> String {
    if title.is_empty() {
        format!("{label} {number}:")
    } else {
        format!("{label} {number}: {title}")
    }
}
