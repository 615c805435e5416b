//! Line classification and document reconstruction for extracted statute
//! text: raw page lines go in, styled blocks, inline tables and stats come out.

pub mod assemble;
pub mod classify;
pub mod engine;
pub mod input;
pub mod model;
pub mod normalize;
pub mod section;
pub mod table;

#[cfg(test)]
mod engine_tests;

pub use assemble::{
    Element, IntegrityIssue, StructuredDocument, assemble, compute_stats, verify_integrity,
};
pub use classify::{ClassificationRule, LineClassifier, SymbolListPolicy};
pub use engine::{DocumentEngine, EngineOptions, EngineOutput, EngineSession, EngineState};
pub use input::{ValidationOutcome, split_page_lines, split_pages, validate_pages};
pub use model::{
    Block, BlockRole, DocumentStats, HeadingCounts, LinePosition, NormalizedLine, ParsedHeading,
    RawLine, StructuralTag, TableGrid,
};
pub use normalize::{LineNormalizer, Normalized};
pub use section::SectionParser;
pub use table::TableDetector;
