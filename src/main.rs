//! linediff command line: compare two files, or apply a unified diff.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use linediff::diff::split_lines;
use linediff::{
    apply, apply_reverse, diff_text, write_diff, DiffOptions, Format, FormatOptions, Patch,
    Transform, Whitespace,
};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "linediff")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two files line by line
    Diff(DiffArgs),
    /// Apply a unified diff to a file
    Patch(PatchArgs),
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
struct DiffArgs {
    /// Unified output with 3 lines of context
    #[arg(short = 'u', group = "style")]
    unified: bool,

    /// Unified output with N lines of context
    #[arg(short = 'U', long = "unified", value_name = "N", group = "style")]
    unified_context: Option<usize>,

    /// Normal diff output (the default)
    #[arg(long, group = "style")]
    normal: bool,

    /// Output in two columns
    #[arg(short = 'y', long = "side-by-side", group = "style")]
    side_by_side: bool,

    /// Output an ed script
    #[arg(short = 'e', long = "ed", group = "style")]
    ed: bool,

    /// Ignore changes in the amount of whitespace
    #[arg(short = 'b', long = "ignore-space-change")]
    ignore_space_change: bool,

    /// Ignore all whitespace
    #[arg(short = 'w', long = "ignore-all-space")]
    ignore_all_space: bool,

    /// Ignore case differences
    #[arg(short = 'i', long = "ignore-case")]
    ignore_case: bool,

    /// Output at most N columns in side-by-side mode
    #[arg(short = 'W', long = "width", value_name = "N", default_value_t = 130)]
    width: usize,

    /// Use LABEL instead of the file name in unified headers (old, then new)
    #[arg(long = "label", value_name = "LABEL")]
    labels: Vec<String>,

    /// Old file, `-` for stdin
    old: PathBuf,

    /// New file, `-` for stdin
    new: PathBuf,
}

#[derive(Args)]
struct PatchArgs {
    /// Undo the patch instead of applying it
    #[arg(short = 'R', long = "reverse")]
    reverse: bool,

    /// Write the result here instead of over FILE
    #[arg(short = 'o', long = "output", value_name = "OUT")]
    output: Option<PathBuf>,

    /// File to patch
    file: PathBuf,

    /// Unified diff, `-` for stdin
    patch: PathBuf,
}

impl DiffArgs {
    fn format(&self) -> Format {
        if self.unified || self.unified_context.is_some() {
            Format::Unified
        } else if self.side_by_side {
            Format::SideBySide
        } else if self.ed {
            Format::Ed
        } else {
            Format::Classic
        }
    }

    fn transform(&self) -> Transform {
        let whitespace = if self.ignore_all_space {
            Whitespace::IgnoreAll
        } else if self.ignore_space_change {
            Whitespace::IgnoreChange
        } else {
            Whitespace::Exact
        };
        Transform::default()
            .whitespace(whitespace)
            .ignore_case(self.ignore_case)
    }

    fn format_options(&self) -> Result<FormatOptions> {
        let (old_label, new_label) = match self.labels.as_slice() {
            [] => (display_name(&self.old), display_name(&self.new)),
            [old] => (old.clone(), display_name(&self.new)),
            [old, new] => (old.clone(), new.clone()),
            _ => bail!("--label given more than twice"),
        };
        Ok(FormatOptions::default()
            .context(self.unified_context.unwrap_or(3))
            .width(self.width)
            .labels(old_label, new_label))
    }
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading standard input")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

/// Returns whether the two files differ.
fn run_diff(args: &DiffArgs) -> Result<bool> {
    if args.old == Path::new("-") && args.new == Path::new("-") {
        bail!("only one input can be read from standard input");
    }
    let old = read_input(&args.old)?;
    let new = read_input(&args.new)?;

    let options = DiffOptions::default().transform(args.transform());
    let script = diff_text(&old, &new, &options);
    info!(
        common = script.common_length(),
        inserted = script.insert_count(),
        deleted = script.delete_count(),
        "compared"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_diff(&mut out, &script, args.format(), &args.format_options()?)
        .context("writing diff")?;
    out.flush().context("writing diff")?;
    Ok(script.has_changes())
}

fn run_patch(args: &PatchArgs) -> Result<()> {
    let original = read_input(&args.file)?;
    let patch_text = read_input(&args.patch)?;

    let patch = Patch::parse(&patch_text)
        .with_context(|| format!("parsing {}", args.patch.display()))?;
    debug!(hunks = patch.hunks.len(), "patch parsed");
    let script = patch
        .to_script()
        .with_context(|| format!("reading hunks of {}", args.patch.display()))?;

    let lines = split_lines(&original);
    let patched = if args.reverse {
        apply_reverse(&lines, &script)
    } else {
        apply(&lines, &script)
    }
    .with_context(|| format!("patching {}", args.file.display()))?;

    let target = args.output.as_ref().unwrap_or(&args.file);
    if target == Path::new("-") {
        io::stdout()
            .write_all(patched.concat().as_bytes())
            .context("writing patched output")?;
    } else {
        fs::write(target, patched.concat())
            .with_context(|| format!("writing {}", target.display()))?;
    }
    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Diff(args) => run_diff(args).map(|differ| if differ { 1 } else { 0 }),
        Command::Patch(args) => run_patch(args).map(|()| 0),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("linediff: {e:#}");
            ExitCode::from(2)
        }
    }
}
