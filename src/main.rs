use clap::{Parser, Subcommand};
use content_ops::{audit, collections, config, output, rewrite, scaffold, serve, sync, translations};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "content-ops")]
#[command(about = "Content operations toolkit for a CMS-driven marketing site")]
#[command(long_about = "\
Content operations toolkit for a CMS-driven marketing site

The site repository's content/ tree is the data source: localized Markdown
pages with front matter, JSON collection files, binary uploads.

Repository structure:

  <root>/
  ├── content-ops.toml             # Tool config (optional, stock defaults)
  ├── content/
  │   ├── pages/en/about.md        # Localized pages with front matter
  │   ├── products/index.json      # Collections: arrays of records
  │   ├── courses.json
  │   ├── templates/page-default.md
  │   └── uploads/                 # Binary assets
  ├── public/content/              # Build mirror (sync)
  ├── site/content/                # Visual-editor mirror (sync, no uploads)
  └── analytics/content-audit.json # Audit report output

Run 'content-ops gen-config' to print a documented content-ops.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site repository root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite data-nlv-field-path attributes into visual-editor spreads
    Rewrite {
        /// Source files to rewrite in place
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Mirror content/ into the configured build targets
    Sync,
    /// Bulk-edit status and scheduling across a collection
    SetStatus {
        /// Collection name (products, articles, courses, videos, training)
        #[arg(long)]
        collection: String,
        /// New status value (e.g. draft, published, scheduled)
        #[arg(long)]
        status: String,
        /// Set scheduling.publishAt on matched records
        #[arg(long)]
        publish_at: Option<String>,
        /// Set scheduling.unpublishAt on matched records
        #[arg(long)]
        unpublish_at: Option<String>,
        /// Restrict to records with these ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<String>>,
    },
    /// Write the content inventory report to analytics/
    Audit,
    /// Check required front-matter keys across locales
    CheckTranslations,
    /// Create a page from the content template
    NewPage {
        /// Page slug (filename without extension)
        #[arg(long)]
        slug: String,
        /// Target locale (defaults to the reference locale)
        #[arg(long)]
        locale: Option<String>,
        /// Page title (derived from the slug when omitted)
        #[arg(long)]
        title: Option<String>,
    },
    /// Serve the log/analytics HTTP endpoints
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a stock content-ops.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Rewrite { files } => {
            let mut changed = Vec::new();
            let mut unchanged = 0;
            for file in &files {
                if rewrite::rewrite_file(file)? {
                    changed.push(file.as_path());
                } else {
                    unchanged += 1;
                }
            }
            for line in output::format_rewrite_summary(&changed, unchanged) {
                println!("{line}");
            }
        }
        Command::Sync => {
            let config = config::load_config(&cli.root)?;
            let report = sync::sync_all(&cli.root, &config)?;
            for line in output::format_sync_report(&report) {
                println!("{line}");
            }
        }
        Command::SetStatus {
            collection,
            status,
            publish_at,
            unpublish_at,
            ids,
        } => {
            let config = config::load_config(&cli.root)?;
            let spec = collections::resolve(&config, &collection)?;
            let path = collections::file_path(&cli.root, spec);

            let ids = ids.map(|list| {
                list.iter()
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .collect::<Vec<_>>()
            });
            let update = collections::StatusUpdate {
                status,
                publish_at,
                unpublish_at,
                ids,
            };

            let outcome = collections::apply_update(&path, &spec.key, &update)?;
            let line = output::format_update_outcome(&collection, &spec.path, &outcome);
            match outcome {
                collections::UpdateOutcome::Updated(_) => println!("{line}"),
                _ => eprintln!("{line}"),
            }
        }
        Command::Audit => {
            let config = config::load_config(&cli.root)?;
            let run = audit::run(&cli.root, &config)?;
            for warning in &run.warnings {
                eprintln!("[content-audit] {warning}");
            }
            let path = audit::write_report(&cli.root, &config, &run.report)?;
            println!("[content-audit] Wrote {}", path.display());
        }
        Command::CheckTranslations => {
            let config = config::load_config(&cli.root)?;
            let issues = translations::check(&cli.root, &config)?;
            for line in output::format_translation_issues(&issues) {
                println!("{line}");
            }
            if !issues.is_empty() {
                std::process::exit(1);
            }
        }
        Command::NewPage {
            slug,
            locale,
            title,
        } => {
            let config = config::load_config(&cli.root)?;
            let page = scaffold::NewPage {
                locale: locale.unwrap_or_else(|| config.pages.reference_locale.clone()),
                slug,
                title,
            };
            let path = scaffold::create_page(&cli.root, &config, &page)?;
            println!("[new-page] Created {}", path.display());
        }
        Command::Serve { port } => {
            let mut config = config::load_config(&cli.root)?;
            if let Some(port) = port {
                config.serve.port = port;
            }
            serve::run(&config)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
