use anyhow::{Context, Result};
use regex::Regex;

/// Lexical table detection over already-extracted text lines.
#[derive(Debug)]
pub struct TableDetector {
    aligned_columns: Regex,
    column_gap: Regex,
}

impl TableDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            aligned_columns: Regex::new(r"\S+\s{2,}\S+\s{2,}\S+")
                .context("failed to compile aligned column regex")?,
            column_gap: Regex::new(r"\s{2,}").context("failed to compile column gap regex")?,
        })
    }

    pub fn is_table_row(&self, line: &str) -> bool {
        if line.matches('|').count() >= 2 {
            return true;
        }
        if line.contains('\t') {
            return true;
        }
        self.aligned_columns.is_match(line)
    }

    /// Greedily consumes table rows starting at `start`. Returns the
    /// rectangular grid and the number of lines consumed.
    pub fn extract_table<S: AsRef<str>>(&self, lines: &[S], start: usize) -> (Vec<Vec<String>>, usize) {
        let mut rows = Vec::<Vec<String>>::new();
        let mut index = start;

        while let Some(line) = lines.get(index) {
            let line = line.as_ref();
            if !self.is_table_row(line) {
                break;
            }
            rows.push(self.split_cells(line));
            index += 1;
        }

        rectangularize(&mut rows);
        (rows, index - start)
    }

    pub fn split_cells(&self, line: &str) -> Vec<String> {
        if line.contains('|') {
            let mut cells = line
                .split('|')
                .map(|cell| cell.trim().to_string())
                .collect::<Vec<String>>();
            if cells.first().is_some_and(String::is_empty) {
                cells.remove(0);
            }
            if cells.last().is_some_and(String::is_empty) {
                cells.pop();
            }
            return cells;
        }

        if line.contains('\t') {
            return line.split('\t').map(|cell| cell.trim().to_string()).collect();
        }

        self.column_gap
            .split(line.trim())
            .map(str::to_string)
            .collect()
    }
}

/// Pads every row to the widest row with empty cells.
pub fn rectangularize(rows: &mut [Vec<String>]) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(width, String::new());
    }
}
