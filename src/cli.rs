use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use statute_structure::config::DEFAULT_CONFIG_PATH;
use statute_structure::structure::SymbolListPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "statute-structure",
    version,
    about = "Rebuild statute structure from extracted text lines"
)]
pub struct Cli {
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Convert(ConvertArgs),
    Classify(ClassifyArgs),
    Verify(VerifyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Form-feed paged `.txt` files, or `.pdf` files handed to pdftotext.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub symbol_list_policy: Option<SymbolListPolicy>,

    #[arg(long, default_value_t = false)]
    pub no_verify: bool,

    #[arg(long)]
    pub max_pages_per_doc: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    pub input: PathBuf,

    #[arg(long, value_enum)]
    pub symbol_list_policy: Option<SymbolListPolicy>,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// A `<stem>_structured.json` document written by `convert`.
    pub document: PathBuf,
}
