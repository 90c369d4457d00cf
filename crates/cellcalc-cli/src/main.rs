//! cellcalc CLI - evaluate and render sheet snapshots

use anyhow::{bail, Context, Result};
use cellcalc::prelude::*;
use cellcalc::{display, evaluate_formula};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellcalc")]
#[command(author, version, about = "Spreadsheet cell evaluation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    display: DisplayArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args)]
struct DisplayArgs {
    /// Locale for numbers, dates and currency placement
    #[arg(long, global = true, default_value = "en-US")]
    locale: Locale,

    /// Currency code for currency cells that name none
    #[arg(long, global = true, default_value = "USD")]
    currency: String,

    /// Column count for sheets without materialized cells
    #[arg(long, global = true, default_value_t = cellcalc::DEFAULT_COLUMN_COUNT)]
    columns: usize,
}

impl DisplayArgs {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            default_column_count: self.columns,
            display: DisplayOptions::new()
                .with_locale(self.locale)
                .with_default_currency(self.currency.clone()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render every cell of a sheet as tab-separated lines
    Render {
        /// Input sheet (.json storage shape, otherwise tab-delimited text)
        input: PathBuf,

        /// Prefix rows and columns with their labels
        #[arg(long)]
        headers: bool,
    },

    /// Print one cell
    Cell {
        /// Input sheet
        input: PathBuf,

        /// A1-style cell reference
        reference: String,

        /// Print the unevaluated cell text instead of its display value
        #[arg(long)]
        raw: bool,
    },

    /// Evaluate a standalone formula
    Eval {
        /// Formula source (leading '=' optional)
        formula: String,

        /// Sheet the formula's references resolve against
        #[arg(short, long)]
        sheet: Option<PathBuf>,
    },

    /// Show information about a sheet
    Info {
        /// Input sheet
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.display.render_options();
    match cli.command {
        Commands::Render { input, headers } => render(&input, headers, &options),
        Commands::Cell {
            input,
            reference,
            raw,
        } => show_cell(&input, &reference, raw, &options),
        Commands::Eval { formula, sheet } => eval(&formula, sheet.as_deref(), &options),
        Commands::Info { input } => show_info(&input, &options),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Load a sheet snapshot from JSON or tab-delimited text
fn load_sheet(path: &Path) -> Result<Sheet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let sheet = if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse '{}' as a sheet", path.display()))?
    } else {
        Sheet::from_delimited(&text)
    };

    tracing::debug!(
        path = %path.display(),
        rows = sheet.row_count(),
        "loaded sheet"
    );
    Ok(sheet)
}

fn render(input: &Path, headers: bool, options: &RenderOptions) -> Result<()> {
    let sheet = load_sheet(input)?;
    let grid = render_grid(&sheet, options);

    let mut out = String::new();
    if headers {
        let columns = sheet.column_count(options.default_column_count);
        let labels: Vec<String> = (0..columns).map(column_label).collect();
        out.push('\t');
        out.push_str(&labels.join("\t"));
        out.push('\n');
    }
    for (row, values) in grid.iter().enumerate() {
        if headers {
            out.push_str(&(row + 1).to_string());
            out.push('\t');
        }
        out.push_str(&values.join("\t"));
        out.push('\n');
    }

    io::stdout()
        .write_all(out.as_bytes())
        .context("Failed to write to stdout")
}

fn show_cell(input: &Path, reference: &str, raw: bool, options: &RenderOptions) -> Result<()> {
    let Some(addr) = parse_cell_ref(reference) else {
        bail!("Invalid cell reference '{}'", reference);
    };
    let sheet = load_sheet(input)?;

    let text = if raw {
        raw_cell_text(&sheet, addr.row, addr.col)
    } else {
        resolve_display_value(&sheet, addr.row, addr.col, options)
    };
    println!("{}", text);
    Ok(())
}

fn eval(formula: &str, sheet: Option<&Path>, options: &RenderOptions) -> Result<()> {
    let sheet = match sheet {
        Some(path) => load_sheet(path)?,
        None => Sheet::new(),
    };

    let mut session = EvaluationSession::new();
    let value = evaluate_formula(formula, &sheet, &mut session);
    println!("{}", display(&value, &FormatSpec::new(), &options.display));
    Ok(())
}

fn show_info(input: &Path, options: &RenderOptions) -> Result<()> {
    let sheet = load_sheet(input)?;
    let formula_count = sheet
        .rows()
        .iter()
        .flatten()
        .filter(|cell| cell.value().is_formula())
        .count();

    let mut renderer = SheetRenderer::with_options(&sheet, options.clone());
    let mut errors = 0;
    for (row, cells) in sheet.rows().iter().enumerate() {
        for col in 0..cells.len() {
            if renderer.value(row, col).is_error() {
                errors += 1;
            }
        }
    }
    let stats = renderer.stats();

    println!("File: {}", input.display());
    match sheet.extent() {
        Some(range) => println!(
            "Used range: {} ({} rows x {} columns)",
            range.to_a1_string(),
            range.row_count(),
            range.col_count()
        ),
        None => println!("Used range: empty"),
    }
    println!("Formulas: {}", formula_count);
    println!("Errors: {}", errors);
    println!(
        "Evaluations: {} ({} cache hits)",
        stats.evaluations, stats.cache_hits
    );
    Ok(())
}
