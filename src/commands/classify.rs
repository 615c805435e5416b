use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use statute_structure::config::ConverterConfig;
use statute_structure::structure::{DocumentEngine, Normalized, split_page_lines};
use tracing::info;

use crate::cli::ClassifyArgs;

/// Prints `page:line<TAB>tag<TAB>rule<TAB>text` for every normalized line.
/// Stateless: shows what the rule table alone decides.
pub fn run(args: ClassifyArgs, config: ConverterConfig) -> Result<()> {
    let mut options = config.engine_options();
    if let Some(policy) = args.symbol_list_policy {
        options.symbol_list_policy = policy;
    }
    let engine = DocumentEngine::new(options)?;
    let normalizer = engine.normalizer();
    let classifier = engine.classifier();

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let pages = split_page_lines(&raw);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut classified = 0usize;
    for (page_index, page) in pages.iter().enumerate() {
        for (line_index, raw_line) in page.iter().enumerate() {
            let Normalized::Line(line) = normalizer.normalize(raw_line) else {
                continue;
            };
            let rule = classifier
                .matching_rule(&line.text)
                .map(|rule| rule.name)
                .unwrap_or("fallback");
            writeln!(
                out,
                "{}:{}\t{}\t{}\t{}",
                page_index + 1,
                line_index + 1,
                classifier.classify(&line.text),
                rule,
                line.text
            )
            .context("failed to write classification")?;
            classified += 1;
        }
    }

    info!(pages = pages.len(), lines = classified, "classified lines");
    Ok(())
}
