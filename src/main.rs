// src/main.rs
use std::io::Read;

use campaign_report::extractors::{ExtractorConfig, ReportExtractor};
use campaign_report::report::{filter_by_name, PortfolioSummary, ProcessedReport};
use campaign_report::storage::{FileStore, ReportCache};
use campaign_report::upstream::{find_report_by_id, ReportSource};
use campaign_report::utils::{self, match_debug, AppError};
use clap::{Parser, Subcommand};

/// Command Line Interface for campaign performance reports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the local report cache
    #[arg(long, env = "REPORTS_CACHE_DIR", default_value = "./cache", global = true)]
    cache_dir: String,

    /// Regex for the last retention checkpoint label (default matches "Até o final" / "Até 100%")
    #[arg(long, global = true)]
    final_checkpoint_label: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one report document and print it as JSON
    Parse {
        /// Report file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Write a per-field match trace of the document to this file
        #[arg(long)]
        debug_trace: Option<String>,
    },
    /// Load reports from the listing webhook and refresh the cache
    Fetch {
        #[arg(long, env = "REPORTS_WEBHOOK_URL")]
        webhook_url: String,
    },
    /// Ask the generation webhook for fresh reports and refresh the cache
    Generate {
        #[arg(long, env = "REPORTS_GENERATE_URL")]
        webhook_url: String,
    },
    /// Print one report by id, fetching first when nothing is cached
    Show {
        #[arg(long)]
        id: String,

        #[arg(long, env = "REPORTS_WEBHOOK_URL")]
        webhook_url: Option<String>,
    },
    /// List cached reports with portfolio totals
    List {
        /// Only show campaigns whose name contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Dispatch
    run(args).await?;

    tracing::info!("Processing finished.");
    Ok(())
}

async fn run(args: Args) -> Result<(), AppError> {
    let extractor = build_extractor(args.final_checkpoint_label.as_deref())?;

    match args.command {
        Command::Parse { input, debug_trace } => {
            let document = read_document(&input)?;
            tracing::info!("Read report document ({} bytes)", document.len());

            if let Some(path) = debug_trace {
                let traces = extractor.trace(&document);
                if let Err(e) = match_debug::save_trace(&document, &traces, &path) {
                    tracing::warn!("Failed to write match trace: {}", e);
                }
            }

            let report = extractor.parse(&document);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Fetch { webhook_url } | Command::Generate { webhook_url } => {
            let cache = open_cache(&args.cache_dir)?;
            let reports = refresh(extractor, &cache, &webhook_url).await?;
            println!("{}", serde_json::to_string_pretty(&PortfolioSummary::from_reports(&reports))?);
        }
        Command::Show { id, webhook_url } => {
            let cache = open_cache(&args.cache_dir)?;
            let reports = match cache.load()? {
                Some(reports) => reports,
                None => {
                    let url = webhook_url.ok_or_else(|| {
                        AppError::Config("No cached reports; pass --webhook-url to fetch them".to_string())
                    })?;
                    refresh(extractor, &cache, &url).await?
                }
            };
            let report = find_report_by_id(&reports, &id)
                .ok_or_else(|| AppError::NotFound(id.clone()))?;
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        Command::List { search } => {
            let cache = open_cache(&args.cache_dir)?;
            let reports = cache.load()?.unwrap_or_else(|| {
                tracing::warn!("No cached reports found in {}; run `fetch` first", args.cache_dir);
                Vec::new()
            });
            if let Some(meta) = cache.metadata()? {
                tracing::info!("Cache holds {} reports saved at {}", meta.report_count, meta.saved_at);
            }
            for report in filter_by_name(&reports, &search) {
                println!(
                    "{}\t{}\t{}",
                    report.id, report.report.settings.status, report.report.campaign_name
                );
            }
            println!("{}", serde_json::to_string_pretty(&PortfolioSummary::from_reports(&reports))?);
        }
    }
    Ok(())
}

/// Creates the cache directory on first use.
fn open_cache(cache_dir: &str) -> Result<ReportCache<FileStore>, AppError> {
    Ok(ReportCache::new(FileStore::new(cache_dir)?))
}

fn build_extractor(final_checkpoint_label: Option<&str>) -> Result<ReportExtractor, AppError> {
    match final_checkpoint_label {
        Some(label) => {
            let config = ExtractorConfig {
                final_checkpoint_label: label.to_string(),
                ..ExtractorConfig::default()
            };
            Ok(ReportExtractor::with_config(&config)?)
        }
        None => Ok(ReportExtractor::new()),
    }
}

fn read_document(input: &str) -> Result<String, AppError> {
    if input == "-" {
        let mut document = String::new();
        std::io::stdin().read_to_string(&mut document)?;
        Ok(document)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

async fn refresh(
    extractor: ReportExtractor,
    cache: &ReportCache<FileStore>,
    url: &str,
) -> Result<Vec<ProcessedReport>, AppError> {
    let source = ReportSource::new(extractor)?;
    let reports = source.fetch_reports(url).await?;
    let meta = cache.save(&reports)?;
    tracing::info!("Saved {} reports at {}", meta.report_count, meta.saved_at);
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_does_not_create_cache_dir() {
        let dir = std::env::temp_dir().join(format!("campaign_report_cli_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("report.txt");
        std::fs::write(&input, "Campanha: Natal\nGasto Total: R$ 10,00\n").unwrap();
        let cache_dir = dir.join("cache");

        let args = Args::parse_from([
            "campaign-report",
            "--cache-dir",
            cache_dir.to_str().unwrap(),
            "parse",
            "--input",
            input.to_str().unwrap(),
        ]);
        tokio_test::block_on(run(args)).unwrap();

        assert!(!cache_dir.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_list_creates_cache_dir() {
        let dir = std::env::temp_dir().join(format!("campaign_report_list_{}", std::process::id()));
        let cache_dir = dir.join("cache");

        let args = Args::parse_from(["campaign-report", "--cache-dir", cache_dir.to_str().unwrap(), "list"]);
        tokio_test::block_on(run(args)).unwrap();

        assert!(cache_dir.is_dir());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
