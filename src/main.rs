use analytics::{AxisScale, StatisticsEngine, monthly_revenue};
use analyzer::LeaderboardRanker;
use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand};
use configuration::{Config, Ranking, SortKey, load_config, load_config_from};
use core_types::{Currency, ExchangeRate, Store};
use database::{BlobStore, DataSource, RECENT_ACTIVITY_LIMIT, StoreUpdate, seed_demo_data};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod display;

/// The main entry point for the storefront leaderboard.
fn main() -> Result<()> {
    // Load LEADERBOARD_* overrides from a .env file when there is one
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;
    let blob = BlobStore::new(&config.storage.data_dir, config.ranking.exchange_rate);

    // Execute the appropriate command
    match cli.command {
        Commands::Seed(args) => handle_seed(args, &blob),
        Commands::Register(args) => handle_register(args, &blob),
        Commands::Update(args) => handle_update(args, &blob),
        Commands::Purchase(args) => handle_purchase(args, &blob),
        Commands::Delete(args) => handle_delete(args, &blob),
        Commands::Rate(args) => handle_rate(args, &blob),
        Commands::Stores => handle_stores(&blob, cli.json),
        Commands::Board(args) => handle_board(args, &config, &blob, cli.json),
        Commands::Stats(args) => handle_stats(args, &blob, cli.json),
        Commands::Monthly(args) => handle_monthly(args, &config, &blob, cli.json),
        Commands::Summary => handle_summary(&blob, cli.json),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A ranking and statistics engine for a multi-store storefront platform.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file (defaults to ./config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print reports as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill an empty data directory with demo stores and sales.
    Seed(SeedArgs),
    /// Register a new store.
    Register(RegisterArgs),
    /// Change the details of a registered store.
    Update(UpdateArgs),
    /// Record a sale for a store, dated now.
    Purchase(PurchaseArgs),
    /// Delete a store together with all of its sales.
    Delete(DeleteArgs),
    /// Set the USD to DOP exchange rate.
    Rate(RateArgs),
    /// List registered stores, newest first.
    Stores,
    /// Show the podium and the leaderboard table.
    Board(BoardArgs),
    /// Show the dashboard statistics of one store.
    Stats(StatsArgs),
    /// Show revenue per calendar month.
    Monthly(MonthlyArgs),
    /// Show platform-wide totals.
    Summary,
}

#[derive(Parser)]
struct SeedArgs {
    /// Seed for the random generator; the same seed yields the same data.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Parser)]
struct RegisterArgs {
    /// The store id (e.g. "1006").
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    url: String,
    /// DOP or USD.
    #[arg(long)]
    currency: Currency,
}

#[derive(Parser)]
struct UpdateArgs {
    #[arg(long)]
    store: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    currency: Option<Currency>,
}

#[derive(Parser)]
struct PurchaseArgs {
    #[arg(long)]
    store: String,
    /// Amount in the store's own currency.
    #[arg(long)]
    amount: Decimal,
}

#[derive(Parser)]
struct DeleteArgs {
    #[arg(long)]
    store: String,
}

#[derive(Parser)]
struct RateArgs {
    /// DOP per USD; must be positive.
    #[arg(long)]
    value: Decimal,
}

#[derive(Parser)]
struct BoardArgs {
    /// Overrides the configured sort key.
    #[arg(long, value_enum)]
    sort: Option<SortKey>,

    /// Award podium places by revenue milestones. Uses the configured targets,
    /// or the standard Diamond/Gold/Silver ones when none are configured.
    #[arg(long)]
    milestones: bool,
}

#[derive(Parser)]
struct StatsArgs {
    #[arg(long)]
    store: String,
}

#[derive(Parser)]
struct MonthlyArgs {
    /// Number of trailing months; defaults to the configured window.
    #[arg(long)]
    months: Option<u32>,
}

// ==============================================================================
// Registry Commands
// ==============================================================================

fn handle_seed(args: SeedArgs, blob: &BlobStore) -> Result<()> {
    let mut repo = blob.load()?;
    let created = seed_demo_data(&mut repo, args.seed, Utc::now())?;
    if created == 0 {
        println!("Data directory already has stores; nothing seeded.");
        return Ok(());
    }
    blob.save(&repo)?;
    println!(
        "Seeded {} stores and {} sales into {}",
        repo.stores().len(),
        created,
        blob.dir().display()
    );
    Ok(())
}

fn handle_register(args: RegisterArgs, blob: &BlobStore) -> Result<()> {
    let mut repo = blob.load()?;
    let store = Store::new(args.id, args.name, args.email, args.url, args.currency, Utc::now());
    let registered = repo.register_store(store)?.clone();
    blob.save(&repo)?;
    println!("Registered {} ({})", registered.name, registered.id);
    Ok(())
}

fn handle_update(args: UpdateArgs, blob: &BlobStore) -> Result<()> {
    let mut repo = blob.load()?;
    let update = StoreUpdate {
        name: args.name,
        email: args.email,
        url: args.url,
        currency: args.currency,
    };
    let updated = repo.update_store(&args.store, update)?;
    blob.save(&repo)?;
    println!("Updated {} ({})", updated.name, updated.id);
    Ok(())
}

fn handle_purchase(args: PurchaseArgs, blob: &BlobStore) -> Result<()> {
    let mut repo = blob.load()?;
    let tx = repo.record_transaction(&args.store, args.amount, Utc::now())?;
    blob.save(&repo)?;
    println!("Recorded {} for store {} ({})", tx.amount, tx.store_id, tx.id);
    Ok(())
}

fn handle_delete(args: DeleteArgs, blob: &BlobStore) -> Result<()> {
    let mut repo = blob.load()?;
    let removed = repo.delete_store(&args.store)?;
    blob.save(&repo)?;
    println!("Deleted store {} and {} sales", args.store, removed);
    Ok(())
}

fn handle_rate(args: RateArgs, blob: &BlobStore) -> Result<()> {
    let rate = ExchangeRate::new(args.value)?;
    let mut repo = blob.load()?;
    repo.set_exchange_rate(rate);
    blob.save(&repo)?;
    println!("Exchange rate set to {} DOP per USD", rate.as_decimal());
    Ok(())
}

fn handle_stores(blob: &BlobStore, json: bool) -> Result<()> {
    let repo = blob.load()?;
    let stores = repo.all_stores();
    if json {
        return print_json(&stores);
    }
    for store in stores {
        println!(
            "{:<6} {:<24} {:<4} {}",
            store.id,
            store.name,
            store.currency,
            display::display_url(&store.url)
        );
    }
    Ok(())
}

// ==============================================================================
// Report Commands
// ==============================================================================

fn handle_board(args: BoardArgs, config: &Config, blob: &BlobStore, json: bool) -> Result<()> {
    let mut ranking = config.ranking.clone();
    if let Some(sort) = args.sort {
        ranking.sort_key = sort;
    }
    if args.milestones && ranking.milestone_targets.is_empty() {
        ranking.milestone_targets = Ranking::default_milestones();
    }

    let board = LeaderboardRanker::new(ranking).run(blob, Utc::now())?;
    if json {
        return print_json(&board);
    }

    println!("Leaderboard by {}", board.sort_key);
    println!("{}", display::podium_table(&board));
    if !board.table.is_empty() {
        println!("{}", display::ranking_table(&board));
    }
    Ok(())
}

#[derive(Serialize)]
struct StatsReport<'a> {
    store: &'a Store,
    stats: analytics::StoreStats,
    recent_sales: Vec<&'a core_types::Transaction>,
}

fn handle_stats(args: StatsArgs, blob: &BlobStore, json: bool) -> Result<()> {
    let repo = blob.load()?;
    let store = repo
        .store_by_id(&args.store)
        .ok_or_else(|| anyhow!("Store '{}' is not registered", args.store))?;

    let stats = StatisticsEngine::new().compute_stats(
        &store.id,
        repo.stores(),
        repo.transactions(),
        repo.rate(),
    );
    let recent_sales = repo.recent_transactions(&store.id, RECENT_ACTIVITY_LIMIT);

    if json {
        return print_json(&StatsReport { store, stats, recent_sales });
    }
    println!("{}", display::stats_table(store, &stats));
    println!("Recent activity");
    println!("{}", display::recent_sales_table(store, &recent_sales));
    Ok(())
}

#[derive(Serialize)]
struct MonthlyReport {
    buckets: Vec<analytics::MonthlyBucket>,
    axis: AxisScale,
}

fn handle_monthly(args: MonthlyArgs, config: &Config, blob: &BlobStore, json: bool) -> Result<()> {
    let window = args.months.unwrap_or(config.monthly.window_months);
    let snapshot = blob.snapshot()?;
    let buckets = monthly_revenue(
        &snapshot.transactions,
        &snapshot.stores,
        snapshot.exchange_rate,
        window,
        Utc::now(),
    )?;
    let axis = AxisScale::for_buckets(&buckets, config.monthly.axis_floor);
    info!(window, ceiling = %axis.ceiling, "Monthly report built");

    if json {
        return print_json(&MonthlyReport { buckets, axis });
    }
    println!("{}", display::monthly_table(&buckets, &axis));
    println!("Axis: {}", axis.tick_labels().join(" | "));
    Ok(())
}

fn handle_summary(blob: &BlobStore, json: bool) -> Result<()> {
    let snapshot = blob.snapshot()?;
    let summary = StatisticsEngine::new().platform_summary(
        &snapshot.stores,
        &snapshot.transactions,
        snapshot.exchange_rate,
    );
    if json {
        return print_json(&summary);
    }
    println!("{}", display::summary_table(&summary));
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
