use clap::{Parser, Subcommand};
use og_card::config::{self, CONFIG_FILE, CardConfig, ConfigOverrides};
use og_card::imaging::SkiaBackend;
use og_card::metadata::HtmlQuery;
use og_card::pipeline::{CardPipeline, resolve_text};
use og_card::report::{BuildReport, DocumentRecord, DocumentStatus};
use og_card::types::Document;
use og_card::{output, writer};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "og-card")]
#[command(about = "Generate Open Graph social cards for HTML documents")]
#[command(long_about = "\
Generate Open Graph social cards for HTML documents

For every HTML document, a 1200x620 PNG card is rendered from the page's
<title> and <meta name=\"description\">, written to the card directory, and
the document's og:image / twitter:image:src tags are pointed at it.

  <title>Hello World</title>             ┌──────────────────────────┐
  <meta name=\"description\"       →       │  Hello World             │
        content=\"...\">                   │  ...                     │
                                         └──────────────────────────┘
                                          {directory}/index.png
                                          {base}/index.png

Only existing tags are rewritten, and only when their current URL uses
letters, digits and ; : / ? . characters.

Run 'og-card gen-config' to generate a documented og-card.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Card output directory (overrides `directory` in the config)
    #[arg(long, global = true)]
    directory: Option<PathBuf>,

    /// Public URL prefix for cards (overrides `base` in the config)
    #[arg(long, global = true)]
    base: Option<String>,

    /// Background image drawn under the card text
    #[arg(long, global = true)]
    background_image: Option<PathBuf>,

    /// Log pipeline stages and cache activity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render cards for every HTML document under a directory
    Build {
        /// Directory of HTML documents
        #[arg(default_value = ".")]
        source: PathBuf,
        /// Write rewritten documents here instead of in place
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write a JSON report of the run
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Continue with the next document after a failure
        #[arg(long)]
        keep_going: bool,
    },
    /// Render the card for a single document
    Render {
        /// HTML document
        file: PathBuf,
        /// Write the rewritten document here instead of in place
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Resolve config and card text without rendering or writing
    Check {
        /// Directory of HTML documents
        #[arg(default_value = ".")]
        source: PathBuf,
    },
    /// Print a stock og-card.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = ConfigOverrides {
        directory: cli.directory.clone(),
        base: cli.base.clone(),
        background_image: cli.background_image.clone(),
    };

    match cli.command {
        Command::Build {
            source,
            output,
            manifest,
            keep_going,
        } => {
            let config = config::load_config(&cli.config, &overrides)?;
            let documents = find_documents(&source);
            println!("==> Rendering {} documents from {}", documents.len(), source.display());

            let mut pipeline = build_pipeline(&config, &source)?;
            let mut report = BuildReport::default();
            for path in documents {
                let target = destination(&source, &path, output.as_deref());
                let record = render_document(&mut pipeline, &path, &target)?;
                let failed = record.is_failed();
                report.push(record);
                if failed && !keep_going {
                    break;
                }
            }
            report.cache = pipeline.cache_stats().clone();

            output::print_report(&report);
            if let Some(path) = manifest {
                report.write_manifest(&path)?;
                println!("==> Manifest written to {}", path.display());
            }
            if report.has_failures() {
                return Err("one or more documents failed".into());
            }
        }
        Command::Render { file, output } => {
            let config = config::load_config(&cli.config, &overrides)?;
            let root = file.parent().unwrap_or(Path::new("."));
            let mut pipeline = build_pipeline(&config, root)?;
            let destination = output.unwrap_or_else(|| file.clone());

            let mut report = BuildReport::default();
            report.push(render_document(&mut pipeline, &file, &destination)?);
            report.cache = pipeline.cache_stats().clone();
            output::print_report(&report);
            if report.has_failures() {
                return Err("document failed".into());
            }
        }
        Command::Check { source } => {
            let config = config::load_config(&cli.config, &overrides)?;
            let options = config.render_options(&source)?;
            println!("==> Checking {}", source.display());

            let mut report = BuildReport::default();
            for path in find_documents(&source) {
                let doc = Document::read(&path)?;
                let query = HtmlQuery::parse(&doc.text());
                let text = resolve_text(&options, &doc, &query);
                report.push(DocumentRecord {
                    source: path,
                    status: DocumentStatus::Planned {
                        title: text.title,
                        description: text.description,
                        card: options.card_ref(&doc),
                    },
                });
            }
            output::print_report(&report);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "og_card=debug" } else { "og_card=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_pipeline(
    config: &CardConfig,
    source_root: &Path,
) -> Result<CardPipeline<SkiaBackend>, Box<dyn std::error::Error>> {
    let options = config.render_options(source_root)?;
    let fonts = config.font_book()?;
    Ok(CardPipeline::new(options, SkiaBackend::new(fonts)))
}

/// HTML documents under `root`, in a stable order.
fn find_documents(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        })
        .collect()
}

/// Where the rewritten copy of `path` goes: in place, or mirrored under `output`.
fn destination(source: &Path, path: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(out) => out.join(path.strip_prefix(source).unwrap_or(path)),
        None => path.to_path_buf(),
    }
}

/// Run one document through the pipeline and persist the rewritten document.
///
/// Pipeline failures become a failed record; failing to read or write the
/// document itself aborts the run.
fn render_document(
    pipeline: &mut CardPipeline<SkiaBackend>,
    path: &Path,
    destination: &Path,
) -> Result<DocumentRecord, Box<dyn std::error::Error>> {
    let doc = Document::read(path)?;
    let result = match pipeline.process(&doc) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(path = %path.display(), stage = %e.stage(), "card failed: {e}");
            return Ok(DocumentRecord::failed(path, &e));
        }
    };

    let Some(card) = result.card else {
        return Ok(DocumentRecord {
            source: path.to_path_buf(),
            status: DocumentStatus::Skipped,
        });
    };

    if destination != path || result.document != doc {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            writer::ensure_directory(parent)?;
        }
        let contents = result.document.contents.unwrap_or_default();
        writer::write_document(destination, &contents)?;
    }

    Ok(DocumentRecord {
        source: path.to_path_buf(),
        status: DocumentStatus::Rendered {
            title: result.text.title,
            description: result.text.description,
            card,
        },
    })
}
