use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod db;
mod group;
mod models;
mod normalize;
mod report;
mod rollup;
mod sort;
mod source;
mod status;

use models::{AchievementRecord, TargetRecord};
use normalize::{MonthBucket, MonthLabel};
use rollup::{RecordFilter, View};

#[derive(Parser)]
#[command(name = "bd-rollup")]
#[command(about = "Business development targets vs achievements rollup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import projections and inquiries from CSV files
    Import {
        #[arg(long)]
        projections: Option<PathBuf>,
        #[arg(long)]
        inquiries: Option<PathBuf>,
    },
    /// Roll records up for one view
    Rollup {
        #[arg(long, value_enum, default_value_t = View::Performance)]
        view: View,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, value_enum, default_value_t = MonthLabel::Long)]
        label: MonthLabel,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Generate a markdown report with every view
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = MonthLabel::Long)]
        label: MonthLabel,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct FilterArgs {
    /// Salesperson id or name
    #[arg(long)]
    bd: Option<String>,
    /// Month as YYYY-MM
    #[arg(long)]
    month: Option<MonthBucket>,
}

impl FilterArgs {
    fn into_filter(self) -> RecordFilter {
        RecordFilter {
            salesperson: self.bd,
            month: self.month,
        }
    }
}

/// Reads JSON files when given, otherwise the database.
#[derive(Args)]
struct SourceArgs {
    /// JSON array of projection records
    #[arg(long)]
    targets: Option<PathBuf>,
    /// JSON array of inquiry records
    #[arg(long)]
    achievements: Option<PathBuf>,
}

impl SourceArgs {
    async fn load(&self) -> anyhow::Result<(Vec<TargetRecord>, Vec<AchievementRecord>)> {
        if self.targets.is_some() || self.achievements.is_some() {
            return source::load_files(self.targets.as_deref(), self.achievements.as_deref());
        }

        let pool = connect().await?;
        db::fetch_records(&pool).await
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("set DATABASE_URL or pass --targets/--achievements")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect().await?;
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import {
            projections,
            inquiries,
        } => {
            if projections.is_none() && inquiries.is_none() {
                anyhow::bail!("pass --projections and/or --inquiries");
            }

            let pool = connect().await?;
            if let Some(path) = projections {
                let inserted = db::import_projections(&pool, &path).await?;
                println!("Inserted {inserted} projections from {}.", path.display());
            }
            if let Some(path) = inquiries {
                let inserted = db::import_inquiries(&pool, &path).await?;
                println!("Inserted {inserted} inquiries from {}.", path.display());
            }
        }
        Commands::Rollup {
            view,
            format,
            limit,
            label,
            filter,
            source,
        } => {
            let (targets, achievements) = source.load().await?;
            let filter = filter.into_filter();
            let rows = rollup::compute_filtered(&targets, &achievements, view, label, &filter);

            match format {
                OutputFormat::Text => print!("{}", report::render_lines(&rows, view, limit)),
                OutputFormat::Json => {
                    let rows = &rows[..rows.len().min(limit)];
                    println!("{}", serde_json::to_string_pretty(rows)?);
                }
            }
        }
        Commands::Report {
            out,
            label,
            filter,
            source,
        } => {
            let (targets, achievements) = source.load().await?;
            let filter = filter.into_filter();
            let report = report::build_report(&targets, &achievements, &filter, label);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
