use anyhow::{Result, bail};
use statute_structure::structure::{StructuredDocument, compute_stats, verify_integrity};
use statute_structure::util::read_json;
use tracing::{info, warn};

use crate::cli::VerifyArgs;

pub fn run(args: VerifyArgs) -> Result<()> {
    let document: StructuredDocument = read_json(&args.document)?;
    info!(
        path = %args.document.display(),
        elements = document.elements.len(),
        "loaded structured document"
    );

    if document.is_structurally_empty() {
        bail!("{} contains no blocks or tables", args.document.display());
    }

    let blocks = document.blocks().cloned().collect::<Vec<_>>();
    let tables = document.tables().cloned().collect::<Vec<_>>();
    let replayed = compute_stats(
        &blocks,
        &tables,
        document.stats.pages_processed,
        document.stats.total_pages,
    );
    if replayed != document.stats {
        warn!(recorded = ?document.stats, replayed = ?replayed, "recorded stats differ from replay");
    }

    let issues = verify_integrity(&document);
    if !issues.is_empty() {
        bail!("{} failed {} integrity checks", args.document.display(), issues.len());
    }

    info!(
        sections = document.stats.sections_found,
        tables = document.stats.tables_found,
        "document structure verified"
    );
    Ok(())
}
