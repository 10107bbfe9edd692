use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use eztools_cli::config::AppConfig;
use eztools_cli::{app, logging, render};
use eztools_core::compute_tax;
use eztools_core::random::{NumberRequest, Wheel};
use tracing::debug;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Everyday Vietnamese payroll and random-choice tools.
///
/// Settings come from `eztools.toml` (or `--config`); flags override them.
#[derive(Debug, Parser)]
#[command(name = "eztools", version)]
struct Cli {
    /// Application config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Store connection string. For SQLite this is a file path
    /// (e.g. `eztools.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log level or EnvFilter directive, e.g. `debug`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide log output on the console.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Monthly personal income tax from gross salary.
    Tax {
        /// Gross monthly income, e.g. `40.000.000`.
        income: String,

        /// Number of registered dependents.
        #[arg(short, long, default_value_t = 0)]
        dependents: u32,

        /// Salary used for insurance, when it differs from gross income.
        #[arg(long)]
        insurance_base: Option<String>,

        /// Charge the trade union fee.
        #[arg(long)]
        union: bool,

        /// Print the per-bracket breakdown table.
        #[arg(long)]
        table: bool,

        /// Print a bar chart of tax per bracket.
        #[arg(long)]
        chart: bool,

        /// Rate table (TOML) to use instead of the stored or built-in one.
        #[arg(long)]
        tax_config: Option<PathBuf>,
    },

    /// Random integers from an inclusive range.
    Number {
        #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
        min: i64,

        #[arg(long, default_value_t = 100, allow_hyphen_values = true)]
        max: i64,

        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Never repeat a number.
        #[arg(short, long)]
        unique: bool,
    },

    /// Shuffle a list, one item per line.
    Shuffle {
        /// Items to shuffle.
        items: Vec<String>,

        /// Read items from a file instead.
        #[arg(short, long, conflicts_with = "items")]
        file: Option<PathBuf>,
    },

    /// Yes, no or maybe.
    Decide,

    /// Spin a wheel of items.
    Wheel {
        /// Wheel segments. Defaults to three numbered items.
        items: Vec<String>,

        /// Read segments from a file, one per line.
        #[arg(short, long, conflicts_with = "items")]
        file: Option<PathBuf>,

        /// Show the wheel slowing down before the result.
        #[arg(long)]
        animate: bool,
    },

    /// "Hôm nay ăn gì?" - what to eat today.
    Food {
        #[command(subcommand)]
        action: FoodAction,
    },

    /// Results of earlier random tools.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Debug, Subcommand)]
enum FoodAction {
    List,
    Add { name: String },
    /// Remove a dish by its number in `food list`.
    Remove { number: usize },
    Pick,
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    Show,
    Clear,
}

// ─── logging ─────────────────────────────────────────────────────────────────

/// Apply the logging settings. Flags win over the config file.
fn configure_logging(
    cli: &Cli,
    config: &AppConfig,
) -> Result<()> {
    if let Some(level) = config.log_level(cli.log_level.as_deref()) {
        logging::set_log_level(level)?;
    }
    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }
    if cli.quiet {
        logging::set_console_enabled(false)?;
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    configure_logging(&cli, &config)?;

    if let Some(backend) = &cli.backend {
        config.database.backend = backend.clone();
    }
    if let Some(db) = &cli.db {
        config.database.connection_string = db.clone();
    }

    debug!("connecting to {} backend", config.database.backend);
    let store = app::open_store(&config.database).await?;
    let mut app = app::App::new(store);

    match cli.command {
        Command::Tax {
            income,
            dependents,
            insurance_base,
            union,
            table,
            chart,
            tax_config,
        } => {
            let table_path = tax_config.or_else(|| config.tax_config_file());
            let tax_config = app::resolve_tax_config(app.store(), table_path.as_deref()).await?;
            let input = app::tax_input(&income, dependents, insurance_base.as_deref(), union);
            let result = compute_tax(&input, &tax_config);

            print!("{}", render::summary(&result));
            if table {
                println!();
                print!("{}", render::bracket_table(&result));
            }
            if chart {
                println!();
                print!("{}", render::chart(&result, 40));
            }
        }

        Command::Number {
            min,
            max,
            count,
            unique,
        } => {
            let request = NumberRequest {
                min,
                max,
                count,
                unique,
            };
            let numbers = app.numbers(&request).await?;
            if numbers.is_empty() {
                bail!("count must be at least 1");
            }
            let joined: Vec<String> = numbers.iter().map(i64::to_string).collect();
            println!("{}", joined.join(", "));
        }

        Command::Shuffle { items, file } => {
            let text = match file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to open: {}", path.display()))?,
                None => items.join("\n"),
            };
            match app.shuffle(&text).await? {
                Some(shuffled) => println!("{}", shuffled.join("\n")),
                None => bail!("nothing to shuffle"),
            }
        }

        Command::Decide => println!("{}", app.decide().await?),

        Command::Wheel {
            items,
            file,
            animate,
        } => {
            let wheel = match file {
                Some(path) => Wheel::from_lines(
                    &fs::read_to_string(&path)
                        .with_context(|| format!("Failed to open: {}", path.display()))?,
                ),
                None if items.is_empty() => Wheel::default(),
                None => Wheel::new(items),
            };
            let Some((spin, winner)) = app.spin(&wheel, &mut rand::thread_rng()).await? else {
                bail!("the wheel has no items");
            };
            if animate {
                let mut shown = std::time::Duration::ZERO;
                for (elapsed, label) in app::spin_frames(&wheel, &spin, 24) {
                    tokio::time::sleep(elapsed - shown).await;
                    shown = elapsed;
                    eprintln!("  ▶ {label}");
                }
            }
            println!("{winner}");
        }

        Command::Food { action } => match action {
            FoodAction::List => {
                for (i, dish) in app.foods().await?.items().iter().enumerate() {
                    println!("{:>2}. {dish}", i + 1);
                }
            }
            FoodAction::Add { name } => {
                if !app.add_food(&name).await? {
                    bail!("dish name is blank");
                }
                println!("Added {}", name.trim());
            }
            FoodAction::Remove { number } => match app.remove_food(number).await? {
                Some(dish) => println!("Removed {dish}"),
                None => bail!("no dish numbered {number}"),
            },
            FoodAction::Pick => match app.pick_food().await? {
                Some(dish) => println!("{dish}"),
                None => bail!("the food list is empty"),
            },
        },

        Command::History { action } => match action {
            HistoryAction::Show => print!("{}", render::history(&app.history().await?)),
            HistoryAction::Clear => {
                app.clear_history().await?;
                println!("History cleared");
            }
        },
    }

    Ok(())
}
