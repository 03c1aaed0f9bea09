use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use loadout_oracle::catalog::{Element, EquipSlot, WeaponFilter, WeaponType};
use loadout_oracle::config::{Config, ConfigOverrides};
use loadout_oracle::loadout::{Loadout, LoadoutDraft};
use loadout_oracle::output::csv::{recommendations_to_csv, weapons_to_csv};
use loadout_oracle::output::json::render_json;
use loadout_oracle::output::table::{
    render_champions_table, render_loadout_detail, render_loadouts_table,
    render_recommendations_table, render_surges_table, render_weapons_table,
};
use loadout_oracle::recommend::service::recommend;
use loadout_oracle::recommend::{Recommendation, RecommendationRequest};
use loadout_oracle::server::run_server;
use loadout_oracle::store::Store;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "loadout-oracle",
    about = "Loadout builder and surge/champion recommendations"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    user: Option<String>,
    #[arg(long)]
    db: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the default weapons, champions and surges into an empty catalog.
    Seed,
    Weapons {
        #[arg(long)]
        slot: Option<EquipSlot>,
        #[arg(long)]
        element: Option<Element>,
        #[arg(long = "weapon-type")]
        weapon_type: Option<WeaponType>,
    },
    Champions,
    Surges,
    Loadouts {
        #[command(subcommand)]
        command: LoadoutCommands,
    },
    /// Rank your loadouts for a surge and a set of champion ids.
    Recommend {
        #[arg(long)]
        surge: String,
        #[arg(long, value_delimiter = ',')]
        champions: Vec<i64>,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, Subcommand)]
enum LoadoutCommands {
    List,
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: i64,
    },
    Assign {
        id: i64,
        #[arg(long)]
        weapon: i64,
        #[arg(long)]
        slot: EquipSlot,
    },
    Unassign {
        id: i64,
        assignment: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        user_id: cli.user.clone(),
        db_path: cli.db.clone(),
    });

    if let Commands::Config { init, show } = &cli.command {
        return handle_config_command(*init, *show, &config, &config_path);
    }
    if let Commands::Serve { host, port } = &cli.command {
        let host = host.clone().unwrap_or_else(|| config.server.host.clone());
        let port = port.unwrap_or(config.server.port);
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, addr).await;
    }

    let store = Store::open(&config.resolved_db_path())?;
    if config.catalog.seed_on_start || matches!(cli.command, Commands::Seed) {
        let report = store.seed_reference_data()?;
        if matches!(cli.command, Commands::Seed) {
            println!(
                "Seeded {} weapons, {} champions, {} surges",
                report.weapons, report.champions, report.surges
            );
            return Ok(());
        }
    }

    let user = config.user.id.as_str();
    match cli.command {
        Commands::Seed => {}
        Commands::Weapons {
            slot,
            element,
            weapon_type,
        } => {
            let filter = WeaponFilter {
                slot,
                element,
                weapon_type,
            };
            let weapons = store.list_weapons(&filter)?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_weapons_table(&weapons)),
                OutputFormat::Json => println!("{}", render_json(&weapons)?),
                OutputFormat::Csv => println!("{}", weapons_to_csv(&weapons)?),
            }
        }
        Commands::Champions => {
            let champions = store.list_champions()?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_champions_table(&champions)),
                OutputFormat::Json | OutputFormat::Csv => {
                    csv_fallback(cli.output, "champions");
                    println!("{}", render_json(&champions)?);
                }
            }
        }
        Commands::Surges => {
            let surges = store.list_surges()?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_surges_table(&surges)),
                OutputFormat::Json | OutputFormat::Csv => {
                    csv_fallback(cli.output, "surges");
                    println!("{}", render_json(&surges)?);
                }
            }
        }
        Commands::Loadouts { command } => {
            handle_loadout_command(&store, user, command, cli.output)?;
        }
        Commands::Recommend { surge, champions } => {
            let request = RecommendationRequest {
                surge,
                champion_ids: champions,
            };
            let recommendations = recommend(&store, user, &request)?;
            print_recommendations(&recommendations, cli.output)?;
        }
        Commands::Config { .. } => {}
        Commands::Serve { .. } => unreachable!("serve command handled before dispatch"),
    }
    Ok(())
}

fn handle_loadout_command(
    store: &Store,
    user: &str,
    command: LoadoutCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        LoadoutCommands::List => {
            let loadouts = store.user_loadouts(user)?;
            match format {
                OutputFormat::Table => println!("{}", render_loadouts_table(&loadouts)),
                OutputFormat::Json | OutputFormat::Csv => {
                    csv_fallback(format, "loadouts");
                    println!("{}", render_json(&loadouts)?);
                }
            }
        }
        LoadoutCommands::Show { id } => {
            let loadout = require_loadout(store, id, user)?;
            print_loadout(&loadout, format)?;
        }
        LoadoutCommands::Create { name, description } => {
            let draft = draft(name, description);
            let loadout = store.create_loadout(user, &draft)?;
            info!(user, loadout_id = loadout.id, "loadout created");
            print_loadout(&loadout, format)?;
        }
        LoadoutCommands::Update {
            id,
            name,
            description,
        } => {
            if !store.update_loadout(id, user, &draft(name, description))? {
                bail!("loadout {id} not found");
            }
            print_loadout(&require_loadout(store, id, user)?, format)?;
        }
        LoadoutCommands::Delete { id } => {
            if !store.delete_loadout(id, user)? {
                bail!("loadout {id} not found");
            }
            println!("Deleted loadout {id}");
        }
        LoadoutCommands::Assign { id, weapon, slot } => {
            require_loadout(store, id, user)?;
            if store.weapon(weapon)?.is_none() {
                bail!("weapon {weapon} not found");
            }
            store.assign_weapon(id, weapon, slot, user)?;
            print_loadout(&require_loadout(store, id, user)?, format)?;
        }
        LoadoutCommands::Unassign { id, assignment } => {
            let loadout = require_loadout(store, id, user)?;
            if !loadout.weapons.iter().any(|a| a.id == assignment) {
                bail!("assignment {assignment} not found in loadout {id}");
            }
            store.unassign_weapon(assignment, user)?;
            print_loadout(&require_loadout(store, id, user)?, format)?;
        }
    }
    Ok(())
}

fn handle_config_command(init: bool, show: bool, config: &Config, config_path: &PathBuf) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn draft(name: String, description: Option<String>) -> LoadoutDraft {
    let draft = LoadoutDraft::new(name);
    match description {
        Some(description) => draft.with_description(description),
        None => draft,
    }
}

fn require_loadout(store: &Store, id: i64, user: &str) -> Result<Loadout> {
    store
        .loadout(id, user)?
        .ok_or_else(|| anyhow!("loadout {id} not found"))
}

fn print_loadout(loadout: &Loadout, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_loadout_detail(loadout)),
        OutputFormat::Json | OutputFormat::Csv => {
            csv_fallback(format, "loadout detail");
            println!("{}", render_json(loadout)?);
        }
    }
    Ok(())
}

fn print_recommendations(recommendations: &[Recommendation], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_recommendations_table(recommendations)),
        OutputFormat::Json => println!("{}", render_json(recommendations)?),
        OutputFormat::Csv => println!("{}", recommendations_to_csv(recommendations)?),
    }
    Ok(())
}

fn csv_fallback(format: OutputFormat, what: &str) {
    if matches!(format, OutputFormat::Csv) {
        warn!("CSV output for {what} not implemented, using JSON");
    }
}
