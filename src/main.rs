//! treesync command-line interface.
//!
//! Wires the parser, the diff/merge engine, the renderer and the writer
//! together: `diff` shows what changed between a synced snapshot and a
//! fetched one, `check` only answers whether anything changed, and `merge`
//! applies those changes onto the local copy.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::Level;
use treesync::{
    apply_with_report, compare, format_path, parse_file, print, write_file, DiffTree, Node,
    OutputFormat, OutputOptions, TreesyncError,
};

/// treesync - structural diff and merge for configuration trees
#[derive(Parser)]
#[command(name = "treesync")]
#[command(version)]
#[command(about = "Structural diff and merge for JSON, YAML and TOML trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress the summary line)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the differences between a baseline and a new version
    Diff {
        /// Baseline file (e.g. the last synced snapshot)
        #[arg(value_name = "BASE")]
        base: PathBuf,

        /// New file (e.g. the freshly fetched version)
        #[arg(value_name = "ACTUAL")]
        actual: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Exit with 1 if the new version differs from the baseline, 0 otherwise
    Check {
        #[arg(value_name = "BASE")]
        base: PathBuf,

        #[arg(value_name = "ACTUAL")]
        actual: PathBuf,
    },

    /// Apply the changes between BASE and ACTUAL onto TARGET
    Merge {
        #[arg(value_name = "BASE")]
        base: PathBuf,

        #[arg(value_name = "ACTUAL")]
        actual: PathBuf,

        /// The local copy to merge into
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Write the merged value here (format from the extension); stdout as JSON otherwise
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the diff to stderr before merging
        #[arg(long)]
        show_diff: bool,

        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Hide unchanged values
    #[arg(short, long)]
    compact: bool,

    /// Title shown in the diff header (defaults to the file name)
    #[arg(long)]
    title: Option<String>,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// JSON representation
    Json,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Diff {
            base,
            actual,
            render,
        } => {
            let diff = load_diff(&base, &actual)?;
            let title = render.title.clone().unwrap_or_else(|| file_title(&actual));
            let options = render_options(&render, cli.quiet);
            let format: OutputFormat = render.format.into();
            print(&title, &diff, &mut io::stdout().lock(), &format, &options)
                .context("Failed to format diff output")?;
            Ok(if diff.is_modified() { 1 } else { 0 })
        }
        Command::Check { base, actual } => {
            let diff = load_diff(&base, &actual)?;
            let modified = diff.is_modified();
            println!("{}", if modified { "modified" } else { "unchanged" });
            Ok(if modified { 1 } else { 0 })
        }
        Command::Merge {
            base,
            actual,
            target,
            output,
            show_diff,
            render,
        } => {
            let diff = load_diff(&base, &actual)?;
            let local = load(&target)
                .with_context(|| format!("Failed to parse target: {}", target.display()))?;

            if show_diff {
                let title = render.title.clone().unwrap_or_else(|| file_title(&target));
                let options = render_options(&render, cli.quiet);
                let format: OutputFormat = render.format.into();
                print(&title, &diff, &mut io::stderr().lock(), &format, &options)
                    .context("Failed to format diff output")?;
            }

            let report = apply_with_report(&diff, &local);
            for conflict in &report.conflicts {
                eprintln!(
                    "conflict at {}: expected {}, found {}; kept incoming {}",
                    format_path(&conflict.path),
                    describe(conflict.expected.as_ref()),
                    describe(conflict.found.as_ref()),
                    describe(Some(&conflict.resolved)),
                );
            }

            match output {
                Some(path) => write_file(&path, &report.value)
                    .with_context(|| format!("Failed to write merged value: {}", path.display()))?,
                None => {
                    let text = treesync::to_json_string(&report.value)?;
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(text.as_bytes())?;
                    stdout.flush()?;
                }
            }

            Ok(if report.has_conflict() { 1 } else { 0 })
        }
    }
}

fn load(path: &Path) -> Result<Node, TreesyncError> {
    Ok(parse_file(path)?)
}

fn load_diff(base: &Path, actual: &Path) -> Result<DiffTree> {
    tracing::debug!(base = %base.display(), actual = %actual.display(), "computing diff");
    let base_node =
        load(base).with_context(|| format!("Failed to parse baseline: {}", base.display()))?;
    let actual_node =
        load(actual).with_context(|| format!("Failed to parse new version: {}", actual.display()))?;
    Ok(compare(&actual_node, &base_node))
}

fn render_options(render: &RenderArgs, quiet: bool) -> OutputOptions {
    OutputOptions {
        compact: render.compact,
        summary: !quiet,
    }
}

fn file_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn describe(node: Option<&Node>) -> String {
    match node {
        Some(node) => node.to_json().to_string(),
        None => "nothing".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(
            OutputFormat::from(OutputFormatArg::Terminal),
            OutputFormat::Terminal
        );
        assert_eq!(OutputFormat::from(OutputFormatArg::Json), OutputFormat::Json);
        assert_eq!(OutputFormat::from(OutputFormatArg::Plain), OutputFormat::Plain);
    }

    #[test]
    fn test_file_title() {
        assert_eq!(file_title(Path::new("/tmp/egg.json")), "egg.json");
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(None), "nothing");
        assert_eq!(describe(Some(&Node::Number(2.0))), "2");
    }

    #[test]
    fn test_cli_parses_merge() {
        let cli = Cli::try_parse_from(["treesync", "merge", "a.json", "b.json", "c.json", "-o", "out.json"])
            .unwrap();
        assert!(matches!(cli.command, Command::Merge { output: Some(_), .. }));
    }
}
