use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a raw line inside the extracted page stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePosition {
    pub page_index: usize,
    pub line_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub position: LinePosition,
    pub text: String,
}

impl RawLine {
    pub fn new(page_index: usize, line_index: usize, text: impl Into<String>) -> Self {
        Self {
            position: LinePosition {
                page_index,
                line_index,
            },
            text: text.into(),
        }
    }
}

/// A line after URL and translation-annotation stripping. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    /// Text after stripping; what the classifier sees.
    pub text: String,
    /// The trimmed raw line before any substitution. Used by the date merge.
    pub original: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructuralTag {
    #[serde(rename = "Title")]
    Title,
    #[serde(rename = "Subtitle")]
    Subtitle,
    #[serde(rename = "Heading 1")]
    Heading1,
    #[serde(rename = "Heading 2")]
    Heading2,
    #[serde(rename = "Heading 3")]
    Heading3,
    #[serde(rename = "Heading 4")]
    Heading4,
    #[serde(rename = "Heading 5")]
    Heading5,
    #[serde(rename = "Normal")]
    Normal,
}

impl StructuralTag {
    /// Style name understood by document writers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Subtitle => "Subtitle",
            Self::Heading1 => "Heading 1",
            Self::Heading2 => "Heading 2",
            Self::Heading3 => "Heading 3",
            Self::Heading4 => "Heading 4",
            Self::Heading5 => "Heading 5",
            Self::Normal => "Normal",
        }
    }

    pub fn is_heading(self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Tags that close an open section, lettered subsection or chapter scope.
    pub fn closes_section(self) -> bool {
        matches!(self, Self::Heading1 | Self::Heading2 | Self::Heading3)
    }
}

impl fmt::Display for StructuralTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a block stands for beyond its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockRole {
    #[default]
    Line,
    Chapter,
    Section,
    Subsection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub style: StructuralTag,
    pub text: String,
    pub indent: bool,
    #[serde(default)]
    pub role: BlockRole,
}

impl Block {
    /// `Heading 4` blocks start indented; everything else starts flush.
    pub fn new(style: StructuralTag, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
            indent: style == StructuralTag::Heading4,
            role: BlockRole::Line,
        }
    }

    pub fn indented(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_role(mut self, role: BlockRole) -> Self {
        self.role = role;
        self
    }

    pub fn first_line(&self) -> &str {
        self.text.lines().next().unwrap_or_default()
    }

    /// Appends a continuation line inside this block.
    pub fn extend_line(&mut self, line: &str) {
        self.text.push('\n');
        self.text.push_str(line);
    }
}

/// Decomposition of a numbered section line such as `5A. Powers (1) The ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeading {
    /// Digits plus optional letter suffix, prefixed by the symbol for `♦5.` forms.
    pub number: String,
    pub title: String,
    /// Only the first marker of the line is split off, so this holds at most one entry.
    pub embedded_subsections: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    pub rows: Vec<Vec<String>>,
    /// Number of blocks emitted before the table.
    pub position: usize,
}

impl TableGrid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCounts {
    pub title: usize,
    pub subtitle: usize,
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub h5: usize,
}

impl HeadingCounts {
    pub fn record(&mut self, style: StructuralTag) {
        match style {
            StructuralTag::Title => self.title += 1,
            StructuralTag::Subtitle => self.subtitle += 1,
            StructuralTag::Heading1 => self.h1 += 1,
            StructuralTag::Heading2 => self.h2 += 1,
            StructuralTag::Heading3 => self.h3 += 1,
            StructuralTag::Heading4 => self.h4 += 1,
            StructuralTag::Heading5 => self.h5 += 1,
            StructuralTag::Normal => {}
        }
    }

    pub fn count_for(&self, style: StructuralTag) -> usize {
        match style {
            StructuralTag::Title => self.title,
            StructuralTag::Subtitle => self.subtitle,
            StructuralTag::Heading1 => self.h1,
            StructuralTag::Heading2 => self.h2,
            StructuralTag::Heading3 => self.h3,
            StructuralTag::Heading4 => self.h4,
            StructuralTag::Heading5 => self.h5,
            StructuralTag::Normal => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub pages_processed: usize,
    pub total_pages: usize,
    pub sections_found: usize,
    pub tables_found: usize,
    pub headings: HeadingCounts,
}
