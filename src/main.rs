//! Credence: credibility scoring CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use credence::analyzer::{ScoreCalculator, ScoringEngine};
use credence::config::{
    build_ignore_set, find_project_root, is_ignored, load_config, starter_config, LoadedConfig,
    CONFIG_FILENAME,
};
use credence::gateway::Gateway;
use credence::history::{HistoryStore, DEFAULT_LIST_LIMIT, HISTORY_FILENAME};
use credence::reporter::{ConsoleReporter, JsonReporter, LabeledResult};
use credence::ScoringInput;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

/// Credence: explainable credibility scoring for news and social content
#[derive(Parser, Debug)]
#[command(name = "credence")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Text to analyze (omit when using --file, --stdin or a subcommand)
    #[arg(required_unless_present_any = ["file", "stdin"], conflicts_with_all = ["file", "stdin"])]
    text: Option<String>,

    /// Read the text from a file
    #[arg(long, short, conflicts_with = "stdin")]
    file: Option<PathBuf>,

    /// Read the text from standard input
    #[arg(long)]
    stdin: bool,

    /// URL the text came from
    #[arg(long, short)]
    source_url: Option<String>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum score threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .credencerc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the result to the history store
    #[arg(long, requires = "owner")]
    save: bool,

    /// Owner id recorded with a saved analysis
    #[arg(long)]
    owner: Option<String>,

    /// Title recorded with a saved analysis
    #[arg(long)]
    title: Option<String>,

    /// History file (default: config "history", else .credence-history.json in the project root)
    #[arg(long)]
    history: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze every matching file under a directory
    Batch {
        /// File or directory to analyze
        path: PathBuf,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Number of parallel threads (default: number of CPU cores)
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Minimum average score (exit 1 if below)
        #[arg(long, short)]
        threshold: Option<u8>,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the stdio JSON-RPC gateway
    Serve {
        /// History file; the store is attached only when this or config "history" is set
        #[arg(long)]
        history: Option<PathBuf>,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Inspect saved analyses
    History {
        /// History file
        #[arg(long, global = true)]
        history: Option<PathBuf>,

        #[command(subcommand)]
        action: HistoryCommand,
    },

    /// Create .credencerc.json with the built-in rule tables
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List an owner's analyses, newest first
    List {
        #[arg(long)]
        owner: String,
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
        #[arg(long, short)]
        json: bool,
    },
    /// Show one analysis as JSON
    Show {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        id: String,
    },
    /// Delete one analysis
    Delete {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        id: String,
    },
    /// Verdict counts and average score
    Stats {
        #[arg(long)]
        owner: String,
        #[arg(long, short)]
        json: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let default_filter = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let mut args = Args::parse();
    init_logging(args.quiet, args.verbose);

    if let Some(cmd) = args.command.take() {
        return match cmd {
            Commands::Batch {
                path,
                json,
                jobs,
                threshold,
                config,
            } => run_batch(&path, json, jobs, threshold, config.as_deref()),
            Commands::Serve { history, config } => run_serve(history, config.as_deref()),
            Commands::History { history, action } => run_history(history, action),
            Commands::Init { threshold, dir } => run_init(threshold, dir.as_deref()),
        };
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let work_dir = match args.file.as_deref().and_then(Path::parent) {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => cwd,
    };

    let loaded = load_config(&work_dir, args.config.as_deref())?;
    let config = loaded.config.clone().merge_with_cli(args.threshold);
    let engine = ScoringEngine::with_rules(config.rule_set());

    let (label, text) = read_input(&args)?;
    let mut input = ScoringInput::new(text);
    if let Some(url) = args.source_url.clone() {
        input = input.with_source_url(url);
    }
    let result = engine.analyze(&input)?;

    if args.save {
        let owner = args.owner.as_deref().context("--save requires --owner")?;
        let path = resolve_history_path(args.history.as_deref(), &loaded, &work_dir);
        let mut store = HistoryStore::open(path);
        let record = store.save(owner, args.title.clone(), &input.text, result.clone())?;
        if !args.quiet {
            eprintln!(
                "{}: Saved analysis {} to {}",
                "Info".blue(),
                record.id,
                store.path().display()
            );
        }
    }

    let score = result.credibility_score;
    let labeled = LabeledResult::new(label, result);

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&labeled));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(&labeled);
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        reporter.report(&labeled);
    }

    Ok(threshold_exit(score, config.threshold, args.quiet || args.json))
}

/// Text to score plus the label it is reported under
fn read_input(args: &Args) -> Result<(String, String)> {
    if let Some(ref path) = args.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok((path.display().to_string(), text));
    }
    if args.stdin {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        return Ok(("stdin".to_string(), text));
    }
    Ok(("input".to_string(), args.text.clone().unwrap_or_default()))
}

fn threshold_exit(score: u8, threshold: Option<u8>, silent: bool) -> ExitCode {
    match threshold {
        Some(threshold) if score < threshold => {
            if !silent {
                eprintln!(
                    "\n{}: Score {} is below threshold {}",
                    "Failed".red().bold(),
                    score,
                    threshold
                );
            }
            ExitCode::from(1)
        }
        _ => ExitCode::SUCCESS,
    }
}

/// `--history`, then config "history", then the project root default
fn resolve_history_path(explicit: Option<&Path>, loaded: &LoadedConfig, work_dir: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = loaded
        .base_dir()
        .and_then(|dir| loaded.config.history_path(dir))
    {
        return path;
    }
    find_project_root(work_dir)
        .unwrap_or_else(|| work_dir.to_path_buf())
        .join(HISTORY_FILENAME)
}

fn run_batch(
    path: &Path,
    json: bool,
    jobs: Option<usize>,
    threshold: Option<u8>,
    config_path: Option<&Path>,
) -> Result<ExitCode> {
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path
    };
    let config = load_config(work_dir, config_path)?
        .config
        .merge_with_cli(threshold);

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let patterns = config.get_patterns();
    let files = collect_files(path, ignore_set.as_ref(), &patterns)?;

    if files.is_empty() {
        eprintln!("{}: No matching files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    if let Some(jobs) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = ScoringEngine::with_rules(config.rule_set());
    let (results, had_errors) = analyze_files_parallel(&engine, &files);

    if results.is_empty() {
        eprintln!("{}: No file had content to analyze", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = ScoreCalculator::aggregate(results.iter().map(|r| &r.result));

    if json {
        println!(
            "{}",
            JsonReporter::new().pretty().report_with_summary(&results, &stats)
        );
    } else {
        ConsoleReporter::new().report_many(&results, &stats);
    }

    if let Some(threshold) = config.threshold {
        if stats.average_score < f64::from(threshold) {
            if !json {
                eprintln!(
                    "\n{}: Average score {:.1} is below threshold {}",
                    "Failed".red().bold(),
                    stats.average_score,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn collect_files(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if !entry.file_type().is_file() || !matches_pattern(file_path, patterns) {
            continue;
        }
        if let Some(set) = ignore_set {
            if is_ignored(file_path, set) {
                continue;
            }
        }
        files.push(file_path.to_path_buf());
    }

    // Sort for consistent output
    files.sort();

    Ok(files)
}

fn matches_pattern(path: &Path, patterns: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name == CONFIG_FILENAME || name == HISTORY_FILENAME {
        return false;
    }
    patterns.iter().any(|p| name.ends_with(p))
}

fn analyze_files_parallel(engine: &ScoringEngine, files: &[PathBuf]) -> (Vec<LabeledResult>, bool) {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    let had_errors = AtomicBool::new(false);

    let results: Vec<_> = files
        .par_iter()
        .filter_map(|file| {
            let text = match std::fs::read_to_string(file) {
                Ok(text) => text,
                Err(e) => {
                    had_errors.store(true, Ordering::Relaxed);
                    eprintln!("{}: Failed to read {}: {}", "Error".red(), file.display(), e);
                    return None;
                }
            };
            match engine.analyze(&ScoringInput::new(text)) {
                Ok(result) => Some(LabeledResult::new(file.display().to_string(), result)),
                Err(e) => {
                    log::warn!("skipping {}: {}", file.display(), e);
                    None
                }
            }
        })
        .collect();

    (results, had_errors.load(Ordering::Relaxed))
}

fn run_serve(history: Option<PathBuf>, config_path: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let loaded = load_config(&cwd, config_path)?;
    let engine = ScoringEngine::with_rules(loaded.config.rule_set());

    let store_path = history.or_else(|| {
        loaded
            .base_dir()
            .and_then(|dir| loaded.config.history_path(dir))
    });

    let mut gateway = Gateway::new(engine);
    if let Some(path) = store_path {
        log::info!("gateway history at {}", path.display());
        gateway = gateway.with_history(HistoryStore::open(path));
    }

    gateway.serve()?;
    Ok(ExitCode::SUCCESS)
}

fn run_history(history: Option<PathBuf>, action: HistoryCommand) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let loaded = load_config(&cwd, None)?;
    let path = resolve_history_path(history.as_deref(), &loaded, &cwd);
    let mut store = HistoryStore::open(path);

    match action {
        HistoryCommand::List { owner, limit, json } => {
            let records = store.list(&owner, limit);
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                eprintln!("{}: No analyses for {}", "Info".blue(), owner);
            } else {
                for record in records {
                    println!(
                        "{}  {}  {:>3} ({})  {}",
                        record.id,
                        record.created_at.format("%Y-%m-%d %H:%M:%S"),
                        record.result.credibility_score,
                        record.result.verdict,
                        record.title.as_deref().unwrap_or("-")
                    );
                }
            }
        }
        HistoryCommand::Show { owner, id } => {
            let record = store.get(&owner, &id)?;
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        HistoryCommand::Delete { owner, id } => {
            let removed = store.delete(&owner, &id)?;
            println!("{}: Deleted analysis {}", "Done".green().bold(), removed.id);
        }
        HistoryCommand::Stats { owner, json } => {
            let stats = store.stats(&owner);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Total:         {}", stats.total);
                println!("Likely real:   {}", stats.real_news);
                println!("Uncertain:     {}", stats.uncertain);
                println!("Likely fake:   {}", stats.fake_news);
                println!("Average score: {:.1}", stats.average_score);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_init(threshold: Option<u8>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(70);
    let mut json = serde_json::to_string_pretty(&starter_config(threshold_value))?;
    json.push('\n');

    std::fs::write(&config_path, json)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    Ok(ExitCode::SUCCESS)
}
