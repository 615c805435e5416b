use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classify::{AMENDMENTS_PATTERN, DATE_OF_PATTERN, LineClassifier, SymbolListPolicy};
use super::model::{Block, BlockRole, LinePosition, NormalizedLine, RawLine, StructuralTag, TableGrid};
use super::normalize::{LineNormalizer, Normalized};
use super::section::{SectionParser, chapter_heading_text, section_heading_text};
use super::table::TableDetector;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Style lines after an `Amendments:` marker as one subtitle run.
    pub preserve_amendments: bool,
    /// Fold a date stamp into the preceding `Date of ...` subtitle.
    pub merge_dates: bool,
    pub symbol_list_policy: SymbolListPolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            preserve_amendments: true,
            merge_dates: true,
            symbol_list_policy: SymbolListPolicy::Heading,
        }
    }
}

/// Context carried across lines and pages of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub is_first_line: bool,
    pub within_schedule: bool,
    pub within_amendments: bool,
    pub within_lettered_subsection: bool,
    /// A section heading was emitted and no H1/H2/H3/H5 has closed it yet.
    pub within_section: bool,
    /// The open section already split off its first numeric subsection.
    pub section_subsection_taken: bool,
    /// Index of the last appended block.
    pub last_block: Option<usize>,
    pub last_block_tag: Option<StructuralTag>,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            is_first_line: true,
            within_schedule: false,
            within_amendments: false,
            within_lettered_subsection: false,
            within_section: false,
            section_subsection_taken: false,
            last_block: None,
            last_block_tag: None,
        }
    }

    fn close_section(&mut self) {
        self.within_section = false;
        self.section_subsection_taken = false;
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the engine produced for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    pub blocks: Vec<Block>,
    pub tables: Vec<TableGrid>,
    pub total_pages: usize,
    pub pages_with_text: usize,
}

/// Compiled rule set shared by every document. Holds no per-document state,
/// so one engine can serve many documents concurrently.
#[derive(Debug)]
pub struct DocumentEngine {
    normalizer: LineNormalizer,
    classifier: LineClassifier,
    tables: TableDetector,
    sections: SectionParser,
    options: EngineOptions,
    date_of: Regex,
    amendments: Regex,
    date_stamp: Regex,
    lettered_marker: Regex,
    numeric_marker: Regex,
}

impl DocumentEngine {
    pub fn new(options: EngineOptions) -> Result<Self> {
        Ok(Self {
            normalizer: LineNormalizer::new()?,
            classifier: LineClassifier::with_policy(options.symbol_list_policy)?,
            tables: TableDetector::new()?,
            sections: SectionParser::new()?,
            options,
            date_of: Regex::new(DATE_OF_PATTERN).context("failed to compile date-of regex")?,
            amendments: Regex::new(AMENDMENTS_PATTERN)
                .context("failed to compile amendments regex")?,
            date_stamp: Regex::new(r"^\d{4}\.\d{1,2}\.\d{1,2}")
                .context("failed to compile date stamp regex")?,
            lettered_marker: Regex::new(r"^\([a-z]\)")
                .context("failed to compile lettered marker regex")?,
            numeric_marker: Regex::new(r"^\(\d+\)")
                .context("failed to compile numeric marker regex")?,
        })
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn normalizer(&self) -> &LineNormalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Starts a document with fresh state.
    pub fn session(&self) -> EngineSession<'_> {
        EngineSession {
            engine: self,
            state: EngineState::new(),
            blocks: Vec::new(),
            tables: Vec::new(),
            total_pages: 0,
            pages_with_text: 0,
        }
    }

    pub fn process<S: AsRef<str>>(&self, pages: &[Vec<S>]) -> EngineOutput {
        let mut session = self.session();
        for page in pages {
            session.feed_page(page);
        }
        session.finish()
    }

    /// Processes a single page worth of lines.
    pub fn process_lines<S: AsRef<str>>(&self, lines: &[S]) -> EngineOutput {
        let mut session = self.session();
        session.feed_page(lines);
        session.finish()
    }
}

/// One document in flight. Callers may stop feeding pages at any page
/// boundary and still call [`EngineSession::finish`].
#[derive(Debug)]
pub struct EngineSession<'a> {
    engine: &'a DocumentEngine,
    state: EngineState,
    blocks: Vec<Block>,
    tables: Vec<TableGrid>,
    total_pages: usize,
    pages_with_text: usize,
}

impl EngineSession<'_> {
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn feed_page<S: AsRef<str>>(&mut self, lines: &[S]) {
        let page_index = self.total_pages;
        self.total_pages += 1;
        if lines.iter().any(|line| !line.as_ref().trim().is_empty()) {
            self.pages_with_text += 1;
        }

        let mut index = 0usize;
        while index < lines.len() {
            let raw = RawLine::new(page_index, index, lines[index].as_ref());
            let line = match self.engine.normalizer.normalize(&raw.text) {
                Normalized::Line(line) => line,
                Normalized::Blank => {
                    self.push_schedule_spacing();
                    index += 1;
                    continue;
                }
                Normalized::Skip => {
                    index += 1;
                    continue;
                }
            };

            if self.state.is_first_line {
                self.open_document(&line);
                index += 1;
                continue;
            }

            if self.engine.tables.is_table_row(&line.text)
                && let Some(consumed) = self.try_commit_table(lines, raw.position)
            {
                index += consumed;
                continue;
            }

            self.consume(&line);
            index += 1;
        }
    }

    pub fn finish(self) -> EngineOutput {
        EngineOutput {
            blocks: self.blocks,
            tables: self.tables,
            total_pages: self.total_pages,
            pages_with_text: self.pages_with_text,
        }
    }

    fn open_document(&mut self, line: &NormalizedLine) {
        self.push(Block::new(StructuralTag::Title, line.text.clone()));
        self.state.is_first_line = false;
        self.state.within_amendments = false;
        self.state.within_schedule = false;
    }

    fn try_commit_table<S: AsRef<str>>(&mut self, lines: &[S], position: LinePosition) -> Option<usize> {
        let candidates = lines[position.line_index..]
            .iter()
            .map(|line| self.engine.normalizer.strip(line.as_ref()))
            .collect::<Vec<String>>();
        let (rows, consumed) = self.engine.tables.extract_table(&candidates, 0);
        if rows.len() < 2 {
            return None;
        }

        let table = TableGrid {
            rows,
            position: self.blocks.len(),
        };
        debug!(
            page = position.page_index,
            line = position.line_index,
            rows = table.row_count(),
            columns = table.column_count(),
            "committed table"
        );
        self.tables.push(table);
        Some(consumed)
    }

    fn consume(&mut self, line: &NormalizedLine) {
        let engine = self.engine;
        let text = line.text.as_str();
        let mut tag = engine.classifier.classify(text);

        if engine.lettered_marker.is_match(text) {
            self.state.within_lettered_subsection = true;
        }
        if self.state.within_lettered_subsection && engine.numeric_marker.is_match(text) {
            tag = StructuralTag::Normal;
        }

        if self.state.within_amendments {
            let ends_block = matches!(
                tag,
                StructuralTag::Title | StructuralTag::Heading1 | StructuralTag::Heading2
            ) || (tag == StructuralTag::Subtitle && !engine.amendments.is_match(text));
            if !ends_block {
                self.push(Block::new(StructuralTag::Subtitle, text));
                return;
            }
            debug!(line = text, "amendments block closed");
            self.state.within_amendments = false;
        }

        if engine.options.merge_dates
            && engine.date_stamp.is_match(&line.original)
            && self.previous_is_date_subtitle()
            && let Some(last) = self.state.last_block.and_then(|index| self.blocks.get_mut(index))
        {
            last.extend_line(&line.original);
            return;
        }

        match tag {
            StructuralTag::Subtitle if engine.amendments.is_match(text) => {
                if engine.options.preserve_amendments {
                    debug!("amendments block opened");
                    self.state.within_amendments = true;
                }
                self.state.within_schedule = false;
                self.push(Block::new(tag, text));
            }
            StructuralTag::Heading5 => {
                debug!(line = text, "schedule opened");
                self.state.within_schedule = true;
                self.state.close_section();
                self.push(Block::new(tag, text));
            }
            StructuralTag::Normal => {
                let indent = self.state.within_schedule;
                self.push(Block::new(tag, text).indented(indent));
            }
            heading => {
                self.state.within_schedule = false;
                if heading.closes_section() {
                    self.state.within_lettered_subsection = false;
                    self.state.close_section();
                }

                match heading {
                    StructuralTag::Heading3 => self.emit_section(text),
                    StructuralTag::Heading2 => self.emit_chapter(text),
                    StructuralTag::Heading4 => self.emit_numeric_marker(text),
                    _ => self.push(Block::new(heading, text)),
                }
            }
        }
    }

    fn emit_section(&mut self, text: &str) {
        self.state.within_section = true;
        self.state.section_subsection_taken = false;

        let Some(parsed) = self.engine.sections.parse_section(text) else {
            self.push(Block::new(StructuralTag::Heading3, text));
            return;
        };

        self.push(
            Block::new(
                StructuralTag::Heading3,
                section_heading_text(&parsed.number, &parsed.title),
            )
            .with_role(BlockRole::Section),
        );

        for (number, body) in &parsed.embedded_subsections {
            self.state.section_subsection_taken = true;
            self.push_subsection(number, body);
        }
    }

    fn emit_chapter(&mut self, text: &str) {
        let block = match self.engine.sections.parse_chapter(text) {
            Some((number, title)) => Block::new(
                StructuralTag::Heading2,
                chapter_heading_text(&number, &title),
            )
            .with_role(BlockRole::Chapter),
            None => Block::new(StructuralTag::Heading2, text),
        };
        self.push(block);
    }

    /// A `(n)` line inside a section: the first one opens the section's
    /// subsection, later ones are prose.
    fn emit_numeric_marker(&mut self, text: &str) {
        if self.state.within_section {
            if self.state.section_subsection_taken {
                self.push(Block::new(StructuralTag::Normal, text));
                return;
            }
            if let Some((number, body)) = self.engine.sections.parse_subsection(text) {
                self.state.section_subsection_taken = true;
                self.push_subsection(&number, &body);
                return;
            }
        }

        self.push(Block::new(StructuralTag::Heading4, text));
    }

    fn push_subsection(&mut self, number: &str, body: &str) {
        self.push(
            Block::new(StructuralTag::Heading4, format!("Subsection ({number}):"))
                .with_role(BlockRole::Subsection),
        );
        self.push(Block::new(StructuralTag::Normal, body));
    }

    fn push_schedule_spacing(&mut self) {
        if self.state.within_schedule && !self.state.within_amendments {
            self.push(Block::new(StructuralTag::Normal, "").indented(true));
        }
    }

    fn previous_is_date_subtitle(&self) -> bool {
        if self.state.last_block_tag != Some(StructuralTag::Subtitle) {
            return false;
        }
        self.state
            .last_block
            .and_then(|index| self.blocks.get(index))
            .is_some_and(|block| self.engine.date_of.is_match(block.first_line().trim()))
    }

    fn push(&mut self, block: Block) {
        self.state.last_block_tag = Some(block.style);
        self.state.last_block = Some(self.blocks.len());
        self.blocks.push(block);
    }
}
