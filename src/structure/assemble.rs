use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::engine::EngineOutput;
use super::model::{Block, DocumentStats, HeadingCounts, StructuralTag, TableGrid};

/// One entry of the assembled document in reading order. Tables sit inline
/// at the point they were detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Block(Block),
    Table(TableGrid),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub title: Option<String>,
    pub elements: Vec<Element>,
    pub stats: DocumentStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

impl StructuredDocument {
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.elements.iter().filter_map(|element| match element {
            Element::Block(block) => Some(block),
            Element::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableGrid> {
        self.elements.iter().filter_map(|element| match element {
            Element::Table(table) => Some(table),
            Element::Block(_) => None,
        })
    }

    /// No processable line made it into the document.
    pub fn is_structurally_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

pub fn assemble(output: EngineOutput) -> StructuredDocument {
    let stats = compute_stats(
        &output.blocks,
        &output.tables,
        output.pages_with_text,
        output.total_pages,
    );
    let title = output
        .blocks
        .first()
        .filter(|block| block.style == StructuralTag::Title)
        .map(|block| block.text.clone());

    let mut elements = Vec::with_capacity(output.blocks.len() + output.tables.len());
    let mut tables = output.tables.into_iter().peekable();
    for (index, block) in output.blocks.into_iter().enumerate() {
        while let Some(table) = tables.next_if(|table| table.position <= index) {
            elements.push(Element::Table(table));
        }
        elements.push(Element::Block(block));
    }
    elements.extend(tables.map(Element::Table));
    if elements.is_empty() {
        warn!(
            total_pages = stats.total_pages,
            "document contains no processable lines"
        );
    }

    StructuredDocument {
        title,
        elements,
        stats,
        generated_at: None,
    }
}

/// Replays the block stream into counters. Every `Heading 3` block counts as
/// a section.
pub fn compute_stats(
    blocks: &[Block],
    tables: &[TableGrid],
    pages_processed: usize,
    total_pages: usize,
) -> DocumentStats {
    let mut headings = HeadingCounts::default();
    for block in blocks {
        headings.record(block.style);
    }

    DocumentStats {
        pages_processed,
        total_pages,
        sections_found: headings.h3,
        tables_found: tables.len(),
        headings,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    MissingHeading(StructuralTag),
    MissingTables { expected: usize },
    StatsMismatch { field: &'static str, recorded: usize, observed: usize },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeading(style) => {
                write!(f, "missing {style} elements that were in the source")
            }
            Self::MissingTables { expected } => {
                write!(f, "missing {expected} tables that were in the source")
            }
            Self::StatsMismatch {
                field,
                recorded,
                observed,
            } => write!(f, "stats field {field} records {recorded} but document has {observed}"),
        }
    }
}

/// Cross-checks recorded stats against the element stream. An empty result
/// means the document verified.
pub fn verify_integrity(document: &StructuredDocument) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();
    let mut observed = HeadingCounts::default();
    for block in document.blocks() {
        observed.record(block.style);
    }
    let recorded = &document.stats.headings;

    for style in [
        StructuralTag::Title,
        StructuralTag::Heading1,
        StructuralTag::Heading2,
        StructuralTag::Heading3,
    ] {
        if recorded.count_for(style) > 0 && observed.count_for(style) == 0 {
            issues.push(IntegrityIssue::MissingHeading(style));
        }
    }

    let table_count = document.tables().count();
    if document.stats.tables_found > 0 && table_count == 0 {
        issues.push(IntegrityIssue::MissingTables {
            expected: document.stats.tables_found,
        });
    } else if document.stats.tables_found != table_count {
        issues.push(IntegrityIssue::StatsMismatch {
            field: "tables_found",
            recorded: document.stats.tables_found,
            observed: table_count,
        });
    }

    if document.stats.sections_found != observed.h3 {
        issues.push(IntegrityIssue::StatsMismatch {
            field: "sections_found",
            recorded: document.stats.sections_found,
            observed: observed.h3,
        });
    }

    for issue in &issues {
        warn!(issue = %issue, "integrity check failed");
    }
    issues
}
