//! Legalizer CLI - command-line interface for legal document analysis
//!
//! Usage: legalizer [OPTIONS] <COMMAND>
//!
//! Reads a PDF, extracts its text, and runs AI-backed analysis:
//! summaries, plain-language explanations, clause lookups, and free-form
//! questions. Supports JSON output for scripting. Without an API key all
//! commands run in demo mode and return canned responses.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use legalizer_lib::ai_client::{GeminiClient, GeminiConfig};
use legalizer_lib::analyzer::Analyzer;
use legalizer_lib::classification;
use legalizer_lib::prompts::ClauseType;
use legalizer_lib::section_parser::{MarkerSectionParser, ParsedSummary, SectionLabel, SummaryParser};
use legalizer_lib::session::DocumentSession;
use legalizer_lib::settings;
use chrono::{Datelike, Local, Timelike};
use serde_json::json;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ============================================================================
// Logging Infrastructure
// ============================================================================

static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// Initialize logging - creates log file and cleans old logs
fn init_logging() -> Option<PathBuf> {
    let log_dir = dirs::data_dir()
        .map(|p| p.join("legalizer").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));

    if fs::create_dir_all(&log_dir).is_err() {
        return None;
    }

    // Clean logs older than 7 days
    if let Ok(entries) = fs::read_dir(&log_dir) {
        let cutoff = Local::now() - chrono::Duration::days(7);
        for entry in entries.flatten() {
            let path = entry.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with("legalizer-") && name.ends_with(".log") {
                    // Parse date from filename: legalizer-YYYY-MM-DD.log
                    if let Some(date_str) =
                        name.strip_prefix("legalizer-").and_then(|s| s.strip_suffix(".log"))
                    {
                        if let Ok(date) = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
                            if date < cutoff.date_naive() {
                                let _ = fs::remove_file(&path);
                            }
                        }
                    }
                }
            }
        }
    }

    // Create today's log file
    let today = Local::now();
    let log_filename =
        format!("legalizer-{:04}-{:02}-{:02}.log", today.year(), today.month(), today.day());
    let log_path = log_dir.join(&log_filename);

    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
        *LOG_FILE.lock().unwrap() = Some(file);
        Some(log_path)
    } else {
        None
    }
}

/// Log to both terminal and file
fn log_both(msg: &str) {
    let now = Local::now();
    let timestamp = format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second());

    println!("{}", msg);

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "{} {}", timestamp, msg);
        }
    }
}

/// Log error to both terminal and file
fn elog_both(msg: &str) {
    let now = Local::now();
    let timestamp = format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second());

    eprintln!("{}", msg);

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "{} [ERROR] {}", timestamp, msg);
        }
    }
}

/// Macro for logging to both terminal and file
macro_rules! log {
    ($($arg:tt)*) => {
        log_both(&format!($($arg)*))
    };
}

/// Macro for error logging to both terminal and file
macro_rules! elog {
    ($($arg:tt)*) => {
        elog_both(&format!($($arg)*))
    };
}

// ============================================================================
// Main CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "legalizer")]
#[command(version, about = "AI legal document analyzer", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON for scripting
    #[arg(long, global = true)]
    json: bool,

    /// Suppress progress output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF without any AI analysis
    Extract {
        /// PDF file to read
        file: PathBuf,
    },
    /// Summarize a document: key clauses, parties, risks, obligations
    Analyze {
        /// PDF file to read
        file: PathBuf,
        /// Save the raw analysis as ai_analysis.txt in this directory
        #[arg(long)]
        save: Option<PathBuf>,
        /// Also print a plain-language explanation
        #[arg(long)]
        explain: bool,
    },
    /// Explain a document in very simple terms
    Simplify {
        /// PDF file to read
        file: PathBuf,
    },
    /// Ask a free-form question about a document
    Ask {
        /// PDF file to read
        file: PathBuf,
        /// The question to answer
        question: String,
    },
    /// Find clauses of a given type
    Clauses {
        /// PDF file to read
        file: PathBuf,
        /// Clause type: confidentiality, termination, liability,
        /// governing-law, payment-terms, force-majeure
        #[arg(long, short = 't')]
        clause_type: String,
    },
    /// Summarize a document and bucket the result into risk levels
    Risks {
        /// PDF file to read
        file: PathBuf,
    },
    /// Configuration settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all settings
    List,
    /// Get a setting value
    Get { key: String },
    /// Set a setting value
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() {
    if let Some(log_path) = init_logging() {
        eprintln!("Logging to: {}", log_path.display());
    }

    let cli = Cli::parse();

    if let Err(e) = run_cli(cli).await {
        elog!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_cli(cli: Cli) -> Result<(), String> {
    let config_dir = dirs::config_dir()
        .map(|p| p.join("legalizer"))
        .unwrap_or_else(|| PathBuf::from("."));
    settings::init(config_dir);

    // Handle completions first (no document needed)
    if let Commands::Completions { shell } = &cli.command {
        generate(*shell, &mut Cli::command(), "legalizer", &mut std::io::stdout());
        return Ok(());
    }

    match cli.command {
        Commands::Extract { file } => handle_extract(&file, cli.json, cli.quiet),
        Commands::Analyze { file, save, explain } => {
            handle_analyze(&file, save.as_deref(), explain, cli.json, cli.quiet).await
        }
        Commands::Simplify { file } => handle_simplify(&file, cli.json, cli.quiet).await,
        Commands::Ask { file, question } => handle_ask(&file, &question, cli.json, cli.quiet).await,
        Commands::Clauses { file, clause_type } => {
            handle_clauses(&file, &clause_type, cli.json, cli.quiet).await
        }
        Commands::Risks { file } => handle_risks(&file, cli.json, cli.quiet).await,
        Commands::Config { cmd } => handle_config(cmd, cli.json),
        Commands::Completions { .. } => Ok(()),
    }
}

// ============================================================================
// Document loading
// ============================================================================

/// Read a PDF and build a session around its extracted text.
fn load_session(file: &Path, quiet: bool) -> Result<DocumentSession, String> {
    let bytes =
        fs::read(file).map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;

    let mut session = DocumentSession::new();
    session.upload_pdf(&bytes).map_err(|e| e.to_string())?;

    if !quiet {
        if let Some(doc) = session.document() {
            log!("Extracted text from {} ({:.2} MB)", file.display(), doc.size_mb());
        }
    }

    Ok(session)
}

/// Build the analyzer from settings. Demo mode when no key is configured.
fn make_analyzer(quiet: bool) -> Analyzer {
    let config = GeminiConfig::from_settings();
    if config.api_key.is_none() && !quiet {
        log!("No API key configured. Using demo mode.");
    }
    Analyzer::with_document_cap(GeminiClient::new(config), settings::get_max_document_bytes())
}

// ============================================================================
// Command handlers
// ============================================================================

fn handle_extract(file: &Path, json: bool, quiet: bool) -> Result<(), String> {
    let session = load_session(file, quiet)?;
    let Some(doc) = session.document() else {
        return Err("No document loaded".to_string());
    };

    if json {
        println!("{}", json!({ "file": file.display().to_string(), "text": doc.text() }));
    } else {
        println!("{}", doc.text());
    }
    Ok(())
}

async fn handle_analyze(
    file: &Path,
    save: Option<&Path>,
    explain: bool,
    json: bool,
    quiet: bool,
) -> Result<(), String> {
    let mut session = load_session(file, quiet)?;
    let analyzer = make_analyzer(quiet);

    if !quiet {
        log!("Analyzing document...");
    }
    let raw = session.analyze(&analyzer).await.map_err(|e| e.to_string())?.to_string();

    let parsed = MarkerSectionParser.parse(&raw);

    if json {
        let sections = match &parsed {
            ParsedSummary::Sections(sections) => sections
                .iter()
                .map(|s| json!({ "label": s.label.heading(), "text": s.text }))
                .collect::<Vec<_>>(),
            ParsedSummary::Unstructured(_) => vec![],
        };
        println!("{}", json!({ "analysis": raw, "sections": sections }));
    } else {
        print_parsed_summary(&parsed);
    }

    if let Some(dir) = save {
        let path = session.save_analysis(dir).map_err(|e| e.to_string())?;
        if !quiet {
            log!("Analysis saved to {}", path.display());
        }
    }

    if explain {
        let simple = session.simplify(&analyzer).await.map_err(|e| e.to_string())?;
        if json {
            println!("{}", json!({ "explanation": simple }));
        } else {
            println!("\n== Simple Explanation ==");
            println!("{}", simple);
        }
    }

    Ok(())
}

fn print_parsed_summary(parsed: &ParsedSummary) {
    match parsed {
        ParsedSummary::Unstructured(text) => println!("{}", text),
        ParsedSummary::Sections(sections) => {
            for section in sections {
                if section.label == SectionLabel::Unlabeled {
                    println!("{}", section.text);
                } else {
                    println!("\n== {} ==", section.label.heading());
                    if !section.text.is_empty() {
                        println!("{}", section.text);
                    }
                }
            }
        }
    }
}

async fn handle_simplify(file: &Path, json: bool, quiet: bool) -> Result<(), String> {
    let session = load_session(file, quiet)?;
    let analyzer = make_analyzer(quiet);

    let simple = session.simplify(&analyzer).await.map_err(|e| e.to_string())?;

    if json {
        println!("{}", json!({ "explanation": simple }));
    } else {
        println!("{}", simple);
    }
    Ok(())
}

async fn handle_ask(file: &Path, question: &str, json: bool, quiet: bool) -> Result<(), String> {
    let session = load_session(file, quiet)?;
    let analyzer = make_analyzer(quiet);

    let answer = session.ask(&analyzer, question).await.map_err(|e| e.to_string())?;

    if json {
        println!("{}", json!({ "question": question, "answer": answer }));
    } else {
        println!("{}", answer);
    }
    Ok(())
}

async fn handle_clauses(
    file: &Path,
    clause_type: &str,
    json: bool,
    quiet: bool,
) -> Result<(), String> {
    let Some(clause) = ClauseType::from_str(clause_type) else {
        let valid: Vec<&str> = ClauseType::ALL.iter().map(|c| c.as_str()).collect();
        return Err(format!(
            "Unknown clause type '{}'. Valid types: {}",
            clause_type,
            valid.join(", ")
        ));
    };

    let session = load_session(file, quiet)?;
    let analyzer = make_analyzer(quiet);

    if !quiet {
        log!("Searching for {} clauses...", clause.as_str());
    }
    let result = session.find_clauses(&analyzer, clause).await.map_err(|e| e.to_string())?;

    if json {
        println!("{}", json!({ "clause_type": clause.as_str(), "result": result }));
    } else {
        println!("{}", result);
    }
    Ok(())
}

async fn handle_risks(file: &Path, json: bool, quiet: bool) -> Result<(), String> {
    let mut session = load_session(file, quiet)?;
    let analyzer = make_analyzer(quiet);

    if !quiet {
        log!("Analyzing document...");
    }
    let raw = session.analyze(&analyzer).await.map_err(|e| e.to_string())?.to_string();
    let report = classification::categorize_risks(&raw);

    if json {
        println!(
            "{}",
            json!({ "risk": report.risk, "attention": report.attention, "safe": report.safe })
        );
    } else {
        for (heading, lines) in [
            ("Risk", &report.risk),
            ("Attention", &report.attention),
            ("Safe", &report.safe),
        ] {
            if lines.is_empty() {
                continue;
            }
            println!("\n== {} ==", heading);
            for line in lines {
                println!("  {}", line);
            }
        }
    }
    Ok(())
}

fn handle_config(cmd: ConfigCommands, json: bool) -> Result<(), String> {
    match cmd {
        ConfigCommands::List => {
            let has_key = settings::has_api_key();
            let model = settings::get_model();
            let max_bytes = settings::get_max_document_bytes();
            let stats = settings::get_usage_stats();

            if json {
                println!(
                    "{}",
                    json!({
                        "gemini_api_key": has_key,
                        "model": model,
                        "max_document_bytes": max_bytes,
                        "dispatch_count": stats.dispatch_count,
                        "total_prompt_tokens": stats.total_prompt_tokens,
                        "total_response_tokens": stats.total_response_tokens,
                    })
                );
            } else {
                println!("gemini-api-key:     {}", if has_key { "set" } else { "not set" });
                println!("model:              {}", model);
                println!("max-document-bytes: {}", max_bytes);
                println!(
                    "usage:              {} dispatches, {} prompt tokens, {} response tokens",
                    stats.dispatch_count, stats.total_prompt_tokens, stats.total_response_tokens
                );
            }
        }
        ConfigCommands::Get { key } => {
            let value: String = match key.as_str() {
                "gemini-api-key" => {
                    settings::get_masked_api_key().unwrap_or_else(|| "not set".to_string())
                }
                "model" => settings::get_model(),
                "max-document-bytes" => settings::get_max_document_bytes().to_string(),
                _ => return Err(format!("Unknown config key: {}", key)),
            };

            if json {
                println!(r#"{{"{}":"{}"}}"#, key, value);
            } else {
                println!("{}", value);
            }
        }
        ConfigCommands::Set { key, value } => match key.as_str() {
            "gemini-api-key" => settings::set_api_key(value)?,
            "model" => settings::set_model(value)?,
            "max-document-bytes" => {
                let max_bytes: usize = value
                    .parse()
                    .map_err(|_| format!("Invalid byte count: {}", value))?;
                settings::set_max_document_bytes(max_bytes)?;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        },
    }
    Ok(())
}
