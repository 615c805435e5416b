use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use statute_structure::config::ConverterConfig;
use statute_structure::structure::{
    DocumentEngine, DocumentStats, StructuredDocument, ValidationOutcome, assemble,
    split_page_lines, validate_pages, verify_integrity,
};
use statute_structure::util::{now_utc_string, write_json_pretty};
use tracing::{error, info, warn};

use crate::cli::ConvertArgs;
use crate::model::{BatchSummary, ConversionReport, VerificationSummary};

pub fn run(args: ConvertArgs, mut config: ConverterConfig) -> Result<()> {
    if let Some(policy) = args.symbol_list_policy {
        config.symbol_list_policy = policy;
    }
    if args.no_verify {
        config.auto_verify = false;
    }
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.default_output_dir.clone());

    let engine = DocumentEngine::new(config.engine_options())?;
    info!(
        inputs = args.inputs.len(),
        options = ?engine.options(),
        "starting conversion"
    );

    let mut summary = BatchSummary {
        generated_at: now_utc_string(),
        converted: 0,
        warnings: 0,
        failed: 0,
        reports: Vec::new(),
    };

    for input in &args.inputs {
        let outcome = convert_one(
            &engine,
            &config,
            input,
            output_dir.as_deref(),
            args.max_pages_per_doc,
        );
        let (report_path, report) = match outcome {
            Ok(converted) => converted,
            Err(err) => {
                error!(input = %input.display(), error = %err, "conversion failed");
                let report = failure_report(input, format!("{err:#}"), None, DocumentStats::default());
                (error_report_path(input, output_dir.as_deref()), report)
            }
        };

        match report.status.as_str() {
            "success" => summary.converted += 1,
            "warning" => {
                summary.converted += 1;
                summary.warnings += 1;
            }
            _ => summary.failed += 1,
        }
        write_json_pretty(&report_path, &report)?;
        summary.reports.push(report_path.display().to_string());
    }

    if let Some(dir) = &output_dir {
        write_json_pretty(&dir.join("conversion_summary.json"), &summary)?;
    }

    info!(
        converted = summary.converted,
        warnings = summary.warnings,
        failed = summary.failed,
        "conversion finished"
    );

    if summary.failed > 0 {
        bail!(
            "{} of {} documents failed to convert",
            summary.failed,
            args.inputs.len()
        );
    }

    Ok(())
}

fn convert_one(
    engine: &DocumentEngine,
    config: &ConverterConfig,
    input: &Path,
    output_dir: Option<&Path>,
    max_pages: Option<usize>,
) -> Result<(PathBuf, ConversionReport)> {
    let pages = load_pages(input, max_pages)?;
    info!(input = %input.display(), pages = pages.len(), "loaded pages");

    let validation = validate_pages(&pages, config.min_page_text_chars);
    if !validation.valid {
        warn!(input = %input.display(), reason = %validation.reason, "input rejected");
        let report = failure_report(
            input,
            validation.reason.clone(),
            Some(validation),
            DocumentStats::default(),
        );
        return Ok((error_report_path(input, output_dir), report));
    }

    let mut document = assemble(engine.process(&pages));
    document.generated_at = Some(now_utc_string());

    if document.is_structurally_empty() {
        let stats = document.stats.clone();
        let report = failure_report(
            input,
            "document contains no processable lines".to_string(),
            Some(validation),
            stats,
        );
        return Ok((error_report_path(input, output_dir), report));
    }

    let output_path = output_path_for(input, output_dir, "_structured.json");
    write_json_pretty(&output_path, &document)?;
    info!(
        path = %output_path.display(),
        blocks = document.blocks().count(),
        tables = document.stats.tables_found,
        sections = document.stats.sections_found,
        "wrote structured document"
    );

    let verification = if config.auto_verify {
        verify_document(&document)
    } else {
        VerificationSummary::skipped()
    };
    let status = if verification.status == "warning" {
        warn!(input = %input.display(), issues = ?verification.issues, "verification failed");
        "warning"
    } else {
        "success"
    };

    let report = ConversionReport {
        source_file: input.display().to_string(),
        output_file: Some(output_path.display().to_string()),
        conversion_time: now_utc_string(),
        status: status.to_string(),
        message: verification.issues.first().cloned(),
        validation: Some(validation),
        verification,
        document_statistics: document.stats,
    };

    Ok((output_path_for(input, output_dir, "_report.json"), report))
}

fn verify_document(document: &StructuredDocument) -> VerificationSummary {
    let issues = verify_integrity(document)
        .iter()
        .map(ToString::to_string)
        .collect();
    VerificationSummary::from_issues(issues)
}

fn failure_report(
    input: &Path,
    message: String,
    validation: Option<ValidationOutcome>,
    stats: DocumentStats,
) -> ConversionReport {
    ConversionReport {
        source_file: input.display().to_string(),
        output_file: None,
        conversion_time: now_utc_string(),
        status: "error".to_string(),
        message: Some(message),
        validation,
        verification: VerificationSummary::skipped(),
        document_statistics: stats,
    }
}

fn load_pages(input: &Path, max_pages: Option<usize>) -> Result<Vec<Vec<String>>> {
    let is_pdf = input
        .extension()
        .and_then(|value| value.to_str())
        .is_some_and(|value| value.eq_ignore_ascii_case("pdf"));

    let raw = if is_pdf {
        extract_text_with_pdftotext(input, max_pages)?
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?
    };

    let mut pages = split_page_lines(&raw);
    if let Some(max_pages) = max_pages {
        pages.truncate(max_pages);
    }
    Ok(pages)
}

fn extract_text_with_pdftotext(pdf_path: &Path, max_pages: Option<usize>) -> Result<String> {
    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
    if let Some(max_pages) = max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn output_path_for(input: &Path, output_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let file_name = format!("{stem}{suffix}");

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

fn error_report_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    output_path_for(input, output_dir, "_error_report.json")
}
