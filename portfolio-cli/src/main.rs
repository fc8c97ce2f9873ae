//! portfolio CLI
//!
//! Command-line interface for enriching the portfolio dataset with images
//! scraped from each person's site.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::sync::mpsc;

use portfolio_scraper::{ScrapeEvent, ScrapeOptions, SiteClient, dataset, scrape_portfolios};

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "Scrape portfolio sites for representative images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every dataset entry and download its best image
    Scrape {
        /// Path to the portfolio dataset
        #[arg(long, default_value = "data/portfolios.json")]
        data: PathBuf,

        /// Write the enriched dataset here instead of overwriting the input
        #[arg(long)]
        out: Option<PathBuf>,

        /// Directory downloaded images are written into
        #[arg(long, default_value = "public/portfolio-images")]
        images_dir: PathBuf,

        /// URL-path prefix recorded in each entry's localImage
        #[arg(long, default_value = "/portfolio-images")]
        image_route: String,

        /// Pause between entries, in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,

        /// Maximum number of entries to process
        #[arg(short, long)]
        limit: Option<usize>,

        /// Fetch and locate without downloading or writing the dataset
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Disable the scrape report file
        #[arg(long)]
        no_log: bool,
    },

    /// List dataset entries and their image status
    List {
        /// Path to the portfolio dataset
        #[arg(long, default_value = "data/portfolios.json")]
        data: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            data,
            out,
            images_dir,
            image_route,
            delay_ms,
            limit,
            dry_run,
            no_log,
        } => {
            let mut options = ScrapeOptions::new(data);
            if let Some(out) = out {
                options.output_path = out;
            }
            options.images_dir = images_dir;
            options.image_route = image_route;
            options.delay = Duration::from_millis(delay_ms);
            options.limit = limit;
            options.dry_run = dry_run;

            run_scrape(options, no_log)
        }
        Commands::List { data } => run_list(&data),
    }
}

/// Run the scrape command.
fn run_scrape(options: ScrapeOptions, no_log: bool) -> ExitCode {
    println!(
        "Scraping portfolios from: {}",
        options
            .dataset_path
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    if options.dry_run {
        println!(
            "{}",
            "Dry run: no files will be downloaded".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if let Some(n) = options.limit {
        println!(
            "{}",
            format!("Limit: {} entries", n).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    println!(
        "Images: {}",
        options
            .images_dir
            .display()
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    println!();

    let client = match SiteClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!(
                "{} Failed to build HTTP client: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            return ExitCode::FAILURE;
        }
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    rt.block_on(async {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("/-\\|"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let (tx, mut rx) = mpsc::unbounded_channel();

        let progress = async {
            let mut total = 0usize;
            while let Some(event) = rx.recv().await {
                match event {
                    ScrapeEvent::Started { total: t } => {
                        total = t;
                        pb.set_message(format!("Processing {} entries...", t));
                    }
                    ScrapeEvent::EntryStarted { index, name } => {
                        pb.set_message(format!("[{}/{}] Scraping {}", index + 1, total, name));
                    }
                    ScrapeEvent::EntryCompleted { name, .. } => {
                        pb.println(format!(
                            "  {} {}",
                            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                            name,
                        ));
                    }
                    ScrapeEvent::EntryNoImage { name, .. } => {
                        pb.println(format!(
                            "  {} {} (no image found)",
                            "?".if_supports_color(Stdout, |t| t.yellow()),
                            name,
                        ));
                    }
                    ScrapeEvent::EntryFailed { name, reason, .. } => {
                        pb.println(format!(
                            "  {} {}: {}",
                            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                            name,
                            reason,
                        ));
                    }
                    ScrapeEvent::Done => {
                        pb.finish_and_clear();
                    }
                }
            }
        };

        let (result, ()) = tokio::join!(scrape_portfolios(&client, &options, tx), progress);

        match result {
            Ok(outcome) => {
                let summary = outcome.report.summary();
                println!();
                println!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
                println!(
                    "  {} {} images downloaded",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    summary.with_image,
                );
                if summary.no_image > 0 {
                    println!(
                        "  {} {} without a suitable image",
                        "?".if_supports_color(Stdout, |t| t.yellow()),
                        summary.no_image,
                    );
                }
                if summary.errors > 0 {
                    println!(
                        "  {} {} errors",
                        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                        summary.errors,
                    );
                }

                if !no_log && !options.dry_run {
                    let report_dir = options
                        .output_path
                        .parent()
                        .filter(|p| !p.as_os_str().is_empty())
                        .map(PathBuf::from)
                        .unwrap_or_else(|| PathBuf::from("."));
                    let report_path = report_dir.join(format!(
                        "scrape-report-{}.txt",
                        chrono::Local::now().format("%Y%m%d-%H%M%S"),
                    ));
                    if let Err(e) = outcome.report.write_to_file(&report_path) {
                        eprintln!("Warning: could not write scrape report: {}", e);
                    } else {
                        println!(
                            "  Report written to {}",
                            report_path.display().if_supports_color(Stdout, |t| t.dimmed()),
                        );
                    }
                }

                ExitCode::SUCCESS
            }
            Err(e) => {
                pb.finish_and_clear();
                eprintln!(
                    "{} Scrape failed: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
                ExitCode::FAILURE
            }
        }
    })
}

/// Run the list command.
fn run_list(data: &PathBuf) -> ExitCode {
    let entries = match dataset::read_entries(data) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!(
                "{} Error reading dataset: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            return ExitCode::FAILURE;
        }
    };

    if entries.is_empty() {
        println!(
            "{}",
            "No entries in dataset.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return ExitCode::SUCCESS;
    }

    println!("{}", "Portfolio entries:".if_supports_color(Stdout, |t| t.bold()));
    println!();

    let mut with_image = 0usize;
    for entry in &entries {
        let marker = if entry.local_image.is_some() {
            with_image += 1;
            format!("{}", "\u{2714}".if_supports_color(Stdout, |t| t.green()))
        } else {
            format!("{}", "?".if_supports_color(Stdout, |t| t.yellow()))
        };
        println!(
            "  {} {} {}",
            marker,
            entry.name.if_supports_color(Stdout, |t| t.bold()),
            entry
                .portfolio_url
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
        if let Some(ref local) = entry.local_image {
            println!("      Image: {}", local);
        }
    }

    println!();
    println!("Total: {} entries, {} with images", entries.len(), with_image);
    ExitCode::SUCCESS
}
