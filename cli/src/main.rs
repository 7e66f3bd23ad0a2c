//! formcheck CLI - programmatic checks for filled PDF forms

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use formcheck::checks::names;
use formcheck::{
    parse_check_list, parse_file_with_options, CheckOptions, CheckRegistry, CheckRunner,
    PageSelection, ParseOptions,
};

#[derive(Parser)]
#[command(name = "formcheck")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Run programmatic checks against filled PDF forms", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run checks against a PDF
    Check {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Checks to run, comma separated ("all" for every check)
        #[arg(short, long, default_value = names::ALL, env = "FORMCHECK_CHECKS")]
        checks: String,

        /// JSON file with check options
        #[arg(long, value_name = "FILE", env = "FORMCHECK_CONFIG")]
        config: Option<PathBuf>,

        /// Expected preparer name
        #[arg(long)]
        preparer: Option<String>,

        /// Reference date for recency checks (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        today: Option<String>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Continue past pages that fail to parse
        #[arg(long)]
        lenient: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available checks
    List,

    /// Print the text the checks see
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Find a phrase and print its bounding boxes
    Search {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Literal, case-sensitive text to find
        #[arg(value_name = "TEXT")]
        needle: String,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Exit code when checks report findings.
const EXIT_FINDINGS: u8 = 2;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            input,
            checks,
            config,
            preparer,
            today,
            pages,
            lenient,
            json,
        } => cmd_check(
            &input,
            &checks,
            config.as_deref(),
            preparer,
            today.as_deref(),
            pages.as_deref(),
            lenient,
            json,
        ),
        Commands::List => cmd_list().map(|_| true),
        Commands::Text {
            input,
            output,
            pages,
        } => cmd_text(&input, output.as_deref(), pages.as_deref()).map(|_| true),
        Commands::Search { input, needle } => cmd_search(&input, &needle).map(|_| true),
        Commands::Info { input } => cmd_info(&input).map(|_| true),
        Commands::Version => {
            cmd_version();
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FINDINGS),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn page_selection(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?),
        None => Ok(PageSelection::All),
    }
}

/// Returns `Ok(true)` when the document is clean.
#[allow(clippy::too_many_arguments)]
fn cmd_check(
    input: &Path,
    checks: &str,
    config: Option<&Path>,
    preparer: Option<String>,
    today: Option<&str>,
    pages: Option<&str>,
    lenient: bool,
    json: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut options = match config {
        Some(path) => CheckOptions::from_json_file(path)?,
        None => CheckOptions::default(),
    };
    if let Some(name) = preparer {
        options = options.with_preparer_name(name);
    }
    if let Some(date) = today {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| format!("Invalid date '{}': {}", date, e))?;
        options = options.with_reference_date(date);
    }
    options.validate()?;

    let mut parse_options = ParseOptions::new().with_pages(page_selection(pages)?);
    if lenient {
        parse_options = parse_options.lenient();
    }

    let requested = parse_check_list(checks);
    if requested.is_empty() {
        return Err("No checks requested".into());
    }

    let runner = CheckRunner::default()
        .with_options(options)
        .with_parse_options(parse_options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Checking {}...", input.display()));

    let bytes = fs::read(input);
    let report = bytes
        .map_err(formcheck::Error::from)
        .and_then(|bytes| runner.run(&bytes, &requested));
    pb.finish_and_clear();

    let mut report = report?;
    if let Some(name) = input.file_name() {
        report = report.with_filename(name.to_string_lossy());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_clean() {
        println!("{}", report.summary_message().as_str().green());
    } else {
        println!("{}", report.summary_message().as_str().yellow());
    }

    Ok(report.is_clean())
}

fn cmd_list() -> Result<(), Box<dyn std::error::Error>> {
    let registry = CheckRegistry::with_defaults();

    println!("{}", "Available Checks".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let width = registry.names().iter().map(|n| n.len()).max().unwrap_or(0);
    for (name, description) in registry.descriptions() {
        println!("{}  {}", format!("{:width$}", name, width = width).bold(), description);
    }
    println!();
    println!("Use {} to run every check.", names::ALL.green());

    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ParseOptions::new()
        .lenient()
        .with_pages(page_selection(pages)?);
    let doc = parse_file_with_options(input, options)?;
    let text = doc.plain_text();

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_search(input: &Path, needle: &str) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, ParseOptions::new().lenient())?;

    let mut count = 0;
    for page in &doc.pages {
        for rect in page.search(needle) {
            println!(
                "{} {}: ({:.1}, {:.1}, {:.1}, {:.1})",
                "Page".bold(),
                page.number,
                rect.x0,
                rect.y0,
                rect.x1,
                rect.y1
            );
            count += 1;
        }
    }

    if count == 0 {
        println!("{} '{}'", "No matches for".yellow(), needle);
    } else {
        println!("\n{} {} match(es)", "Done!".green().bold(), count);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient: metadata is still useful when some pages fail
    let options = ParseOptions::new().lenient();
    let doc = parse_file_with_options(input, options)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), doc.metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), doc.metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if doc.metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = doc.metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = doc.metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = doc.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    let lines: usize = doc.pages.iter().map(|p| p.lines.len()).sum();
    println!("{}: {}", "Lines".bold(), lines);
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "formcheck".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Programmatic checks for filled PDF forms");
    println!();
    println!("License: MIT");
}
