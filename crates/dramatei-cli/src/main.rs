//! Dramatei CLI - HTML-to-TEI drama converter
//!
//! Fetches a stage play spread across the pages of gutenberg.spiegel.de (or
//! reads page files), rebuilds its act/scene/speech structure and writes a
//! TEI-XML (or JSON) file named deterministically from author and title.

// clap requires owned strings and the single command handler is long by
// nature, matching the argument surface.
#![allow(clippy::too_many_lines, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use dramatei_backend::{ConvertOptions, PlayConverter};
use dramatei_core::{Drama, JsonSerializer, TeiSerializer};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if output should be shown (not quiet)
    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Check if verbose output is requested
    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Default log filter for this verbosity
    const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info",
            Self::Verbose => "debug",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
enum OutputFormat {
    /// TEI-XML output (default)
    Tei,
    /// JSON output of the drama model
    Json,
}

impl OutputFormat {
    const fn extension(self) -> &'static str {
        match self {
            Self::Tei => "xml",
            Self::Json => "json",
        }
    }

    const fn display_name(self) -> &'static str {
        match self {
            Self::Tei => "TEI-XML",
            Self::Json => "JSON",
        }
    }
}

/// Configuration file support for `.dramatei.toml`
///
/// Precedence order (highest to lowest):
/// 1. Command-line arguments (--format, --act-trigger, etc.)
/// 2. Project config (./.dramatei.toml)
/// 3. User config (~/.dramatei.toml)
/// 4. Built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
struct Config {
    /// Default act trigger word
    #[serde(skip_serializing_if = "Option::is_none")]
    act_trigger: Option<String>,

    /// Default scene trigger word
    #[serde(skip_serializing_if = "Option::is_none")]
    scene_trigger: Option<String>,

    /// Default output format (tei or json)
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,

    /// Default output directory
    #[serde(skip_serializing_if = "Option::is_none")]
    dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            // TOML errors include line/column information, preserve it
            eprintln!(
                "{} Failed to parse config file: {}",
                "Error:".red().bold(),
                path.display()
            );
            eprintln!("{} {}", "Parse error:".yellow().bold(), e);
            eprintln!();
            eprintln!("{} Configuration file syntax:", "Help:".cyan().bold());
            eprintln!("  act_trigger = \"Akt\"");
            eprintln!("  scene_trigger = \"Szene\"");
            eprintln!("  format = \"tei\"    # tei or json");
            eprintln!("  dir = \"./plays\"");
            anyhow::anyhow!("Failed to parse config file: {e}")
        })?;

        Ok(config)
    }

    /// Find and load configuration files
    /// Returns (`user_config`, `project_config`)
    fn discover_configs() -> (Option<Self>, Option<Self>) {
        (Self::load_user_config(), Self::load_project_config())
    }

    /// Load user config from ~/.dramatei.toml
    fn load_user_config() -> Option<Self> {
        let config_path = dirs::home_dir()?.join(".dramatei.toml");
        Self::load_if_present(&config_path)
    }

    /// Load project config from ./.dramatei.toml
    fn load_project_config() -> Option<Self> {
        Self::load_if_present(Path::new(".dramatei.toml"))
    }

    fn load_if_present(config_path: &Path) -> Option<Self> {
        if !config_path.exists() {
            return None;
        }
        match Self::load_from_file(config_path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!(
                    "{} Failed to load config from {}: {}",
                    "Warning:".yellow().bold(),
                    config_path.display(),
                    e
                );
                None
            }
        }
    }

    /// Merge configs with precedence: project config > user config
    fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let mut merged = user_config.unwrap_or_default();
        if let Some(project) = project_config {
            if let Some(act_trigger) = project.act_trigger {
                merged.act_trigger = Some(act_trigger);
            }
            if let Some(scene_trigger) = project.scene_trigger {
                merged.scene_trigger = Some(scene_trigger);
            }
            if let Some(format) = project.format {
                merged.format = Some(format);
            }
            if let Some(dir) = project.dir {
                merged.dir = Some(dir);
            }
        }
        merged
    }

    /// Resolve output format from CLI, config, or default
    fn resolve_output_format(
        cli_value: Option<OutputFormat>,
        config_value: Option<&str>,
    ) -> OutputFormat {
        if let Some(format) = cli_value {
            return format;
        }
        if let Some(format_str) = config_value {
            return match format_str.to_lowercase().as_str() {
                "json" => OutputFormat::Json,
                _ => OutputFormat::Tei,
            };
        }
        OutputFormat::Tei
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dramatei",
    about = "Convert a stage play from gutenberg.spiegel.de pages into TEI-XML",
    long_about = "Convert a stage play spread across multiple HTML pages into a \
                  TEI-XML document with acts, scenes, speakers, stage directions \
                  and numbered lines.\n\
                  \n\
                  The start location is the URL (or file path) of the first page and \
                  must end in the page number; subsequent pages are derived by \
                  incrementing it.\n\
                  \n\
                  Example:\n  \
                  dramatei \"https://gutenberg.spiegel.de/buch/die-weber-9199/4\" 5 \
                  \"Hauptmann, Gerhart\" \"Die Weber\"\n\
                  \n\
                  Defaults can be set via .dramatei.toml configuration file.",
    version
)]
struct Args {
    /// URL or file path of the first page (must end in the page number)
    #[arg(value_name = "START")]
    start: String,

    /// Number of pages to convert
    #[arg(value_name = "PAGES")]
    pages: usize,

    /// Author name in the format "Lastname, Firstname(s)" or "Name"
    #[arg(value_name = "AUTHOR")]
    author: String,

    /// Drama title
    #[arg(value_name = "TITLE")]
    title: String,

    /// Output directory (default: current directory, or from config)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Explicit output file path (overrides --dir and the generated name)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Trigger word in headings that opens a new act (default: "Akt", or from config)
    #[arg(long, value_name = "WORD")]
    act_trigger: Option<String>,

    /// Trigger word in headings that opens a new scene (default: "Szene", or from config)
    #[arg(long, value_name = "WORD")]
    scene_trigger: Option<String>,

    /// Output format (default: tei, or from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,

    /// Show what would be converted without fetching or writing anything
    #[arg(long)]
    dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
}

/// Deterministic output file name: the author's last name (the part before
/// the first ", "), lowercased, then the title lowercased with spaces as
/// underscores, then the format's extension.
fn output_filename(author: &str, title: &str, format: OutputFormat) -> String {
    let last_name = author.split(", ").next().unwrap_or(author).to_lowercase();
    let title_part = title.to_lowercase().replace(' ', "_");
    format!("{last_name}_{title_part}.{}", format.extension())
}

fn serialize_drama(drama: &Drama, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Tei => {
            let tree = TeiSerializer::new().serialize_drama(drama);
            tree.to_xml_document().context("Failed to encode TEI-XML")
        }
        OutputFormat::Json => {
            let json = JsonSerializer::new()
                .serialize_drama(drama)
                .context("Failed to serialize to JSON")?;
            Ok(json.into_bytes())
        }
    }
}

fn conversion_spinner(verbosity: Verbosity, start: &str, pages: usize) -> Option<ProgressBar> {
    if !verbosity.should_show_output() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("template is compile-time constant")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.set_message(format!("Converting {pages} pages starting at {start}..."));
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    Some(spinner)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);

    env_logger::Builder::from_env(Env::default().default_filter_or(verbosity.log_filter())).init();

    // Load configuration files (CLI args override config)
    let (user_config, project_config) = Config::discover_configs();
    let config = Config::merge(user_config, project_config);

    let format = Config::resolve_output_format(args.format, config.format.as_deref());
    let dir = args
        .dir
        .or(config.dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut options = ConvertOptions::new(args.author.as_str(), args.title.as_str());
    if let Some(trigger) = args.act_trigger.or(config.act_trigger) {
        options = options.with_act_trigger(trigger);
    }
    if let Some(trigger) = args.scene_trigger.or(config.scene_trigger) {
        options = options.with_scene_trigger(trigger);
    }

    let output_path = args
        .output
        .unwrap_or_else(|| dir.join(output_filename(&args.author, &args.title, format)));

    if args.dry_run {
        println!(
            "Would convert: {} ({} pages) → {} ({})",
            args.start,
            args.pages,
            output_path.display(),
            format.display_name()
        );
        return Ok(());
    }

    if output_path.exists() && !args.force {
        eprintln!(
            "{} Output file already exists: {}",
            "Error:".red().bold(),
            output_path.display()
        );
        eprintln!(
            "{} Use --force to overwrite existing files",
            "Help:".cyan().bold()
        );
        anyhow::bail!("Output file already exists: {}", output_path.display());
    }

    let spinner = conversion_spinner(verbosity, &args.start, args.pages);
    let start_time = std::time::Instant::now();

    let drama = PlayConverter::new()
        .convert(&args.start, args.pages, &options)
        .map_err(|e| {
            if let Some(s) = &spinner {
                s.finish_and_clear();
            }
            eprintln!("{} {e}", "Error:".red().bold());
            eprintln!(
                "{} Check that the start location ends in the page number and is reachable",
                "Help:".cyan().bold()
            );
            anyhow::anyhow!("Conversion failed: {e}")
        })?;

    if let Some(s) = &spinner {
        s.finish_and_clear();
    }

    if verbosity.is_verbose() {
        eprintln!(
            "{} Conversion completed in {:.2}s",
            "Info:".blue().bold(),
            start_time.elapsed().as_secs_f64()
        );
    }

    let bytes = serialize_drama(&drama, format)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(&output_path, bytes)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    if verbosity.should_show_output() {
        println!(
            "{} {} → {} ({} acts, {} scenes, {} speeches, {} lines)",
            "Converted".green().bold(),
            args.title,
            output_path.display(),
            drama.acts.len(),
            drama.total_scenes(),
            drama.total_speeches(),
            drama.total_lines()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_filename_splits_author_last_name() {
        assert_eq!(
            output_filename("Hauptmann, Gerhart", "Die Weber", OutputFormat::Tei),
            "hauptmann_die_weber.xml"
        );
    }

    #[test]
    fn test_output_filename_single_name_author() {
        assert_eq!(
            output_filename("Novalis", "Heinrich von Ofterdingen", OutputFormat::Tei),
            "novalis_heinrich_von_ofterdingen.xml"
        );
    }

    #[test]
    fn test_output_filename_json_extension() {
        assert_eq!(
            output_filename("Hauptmann, Gerhart", "Die Weber", OutputFormat::Json),
            "hauptmann_die_weber.json"
        );
    }

    #[test]
    fn test_config_merge_project_wins_per_key() {
        let user = Config {
            act_trigger: Some("Aufzug".to_string()),
            scene_trigger: Some("Auftritt".to_string()),
            format: None,
            dir: None,
        };
        let project = Config {
            act_trigger: Some("Akt".to_string()),
            scene_trigger: None,
            format: Some("json".to_string()),
            dir: None,
        };

        let merged = Config::merge(Some(user), Some(project));
        assert_eq!(merged.act_trigger.as_deref(), Some("Akt"));
        assert_eq!(merged.scene_trigger.as_deref(), Some("Auftritt"));
        assert_eq!(merged.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_resolve_output_format_cli_wins() {
        assert_eq!(
            Config::resolve_output_format(Some(OutputFormat::Json), Some("tei")),
            OutputFormat::Json
        );
        assert_eq!(
            Config::resolve_output_format(None, Some("json")),
            OutputFormat::Json
        );
        assert_eq!(Config::resolve_output_format(None, None), OutputFormat::Tei);
    }

    #[test]
    fn test_config_parses_from_toml() {
        let config: Config =
            toml::from_str("act_trigger = \"Aufzug\"\nformat = \"json\"").unwrap();
        assert_eq!(config.act_trigger.as_deref(), Some("Aufzug"));
        assert_eq!(config.scene_trigger, None);
        assert_eq!(config.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert!(!Verbosity::Quiet.should_show_output());
        assert!(Verbosity::Verbose.is_verbose());
    }
}
