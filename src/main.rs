//! docx-merge - combine multiple Word documents into one

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use docx_merge::{merge_to_file, BlockOrder, MergeOptions, SeparatorMode, StylePolicy};

const DEFAULT_OUTPUT: &str = "combined.docx";

/// Input ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortKey {
    /// Alphabetical by file name, ignoring case
    Name,
    /// Oldest modification time first
    Date,
}

/// Block order within each document
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OrderArg {
    /// Paragraphs and tables in the order they appear
    #[default]
    Document,
    /// All paragraphs, then all tables
    ParagraphsFirst,
}

/// Paragraph style handling
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum StylesArg {
    /// Keep style references and the first document's styles
    #[default]
    Verbatim,
    /// Drop references to styles the first document does not define
    DropUnknown,
    /// Write no styles part
    Bare,
}

impl From<OrderArg> for BlockOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Document => BlockOrder::Document,
            OrderArg::ParagraphsFirst => BlockOrder::ParagraphsThenTables,
        }
    }
}

impl From<StylesArg> for StylePolicy {
    fn from(arg: StylesArg) -> Self {
        match arg {
            StylesArg::Verbatim => StylePolicy::Verbatim,
            StylesArg::DropUnknown => StylePolicy::DropUnknown,
            StylesArg::Bare => StylePolicy::Bare,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "docx-merge")]
#[command(author, version, about = "Combine multiple Word documents (.docx) into a single document", long_about = None)]
struct Cli {
    /// One or more .docx files to combine
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file path [default: combined.docx in the current directory]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Separator between documents: page_break, newline or none
    #[arg(long, default_value = "page_break", value_parser = parse_separator)]
    separator: SeparatorMode,

    /// Sort input files; without it files are combined in the order given
    #[arg(long, value_enum)]
    sort: Option<SortKey>,

    /// Order of paragraphs and tables within each document
    #[arg(long, value_enum, default_value_t = OrderArg::Document)]
    order: OrderArg,

    /// How paragraph style references are handled
    #[arg(long, value_enum, default_value_t = StylesArg::Verbatim)]
    styles: StylesArg,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_separator(value: &str) -> std::result::Result<SeparatorMode, String> {
    value.parse().map_err(|e: docx_merge::Error| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<()> {
    validate_inputs(&cli.inputs)?;

    let inputs = match cli.sort {
        Some(key) => sort_inputs(cli.inputs, key)?,
        None => cli.inputs,
    };
    let cwd = env::current_dir().context("Failed to read current directory")?;
    let output = resolve_output(cli.output, &cwd);

    let options = MergeOptions::default()
        .separator(cli.separator)
        .order(cli.order.into())
        .styles(cli.styles.into());

    let summary = merge_to_file(&inputs, &output, &options)
        .context("Failed to combine documents")?;

    println!(
        "Successfully combined {} document(s) into {}",
        summary.documents,
        summary.output.display()
    );
    Ok(())
}

fn has_docx_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}

/// Every input must exist and be a .docx file
fn validate_inputs(inputs: &[PathBuf]) -> Result<()> {
    if inputs.is_empty() {
        bail!("At least one input file is required");
    }
    for path in inputs {
        if !path.exists() {
            bail!("{} does not exist", path.display());
        }
        if !has_docx_extension(path) {
            bail!("{} is not a .docx file", path.display());
        }
    }
    Ok(())
}

fn resolve_output(output: Option<PathBuf>, cwd: &Path) -> PathBuf {
    let mut path = output.unwrap_or_else(|| cwd.join(DEFAULT_OUTPUT));
    if !has_docx_extension(&path) {
        path.set_extension("docx");
    }
    path
}

fn sort_inputs(inputs: Vec<PathBuf>, key: SortKey) -> Result<Vec<PathBuf>> {
    match key {
        SortKey::Name => {
            let mut inputs = inputs;
            inputs.sort_by_cached_key(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().to_lowercase())
                    .unwrap_or_default()
            });
            Ok(inputs)
        }
        SortKey::Date => {
            let mut keyed = inputs
                .into_iter()
                .map(|p| {
                    let modified = fs::metadata(&p)
                        .and_then(|m| m.modified())
                        .with_context(|| {
                            format!("Failed to read modification time of {}", p.display())
                        })?;
                    Ok((modified, p))
                })
                .collect::<Result<Vec<_>>>()?;
            keyed.sort_by_key(|(modified, _)| *modified);
            Ok(keyed.into_iter().map(|(_, p)| p).collect())
        }
    }
}
