use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use planto::clock::{Clock, SystemClock};
use planto::config::{self, AppConfig};
use planto::models::*;
use planto::reminder::{NoopScheduler, ReminderFile, ReminderScheduler, ReminderSpool};
use planto::render;
use planto::store::PlantStore;

/// Overrides `data_dir` from the config file.
const DATA_DIR_ENV: &str = "PLANTO_DATA_DIR";

#[derive(Parser)]
#[command(name = "planto")]
#[command(about = "Keep your houseplants watered")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's watering checklist
    Today,
    /// List all plants with their positions and ids
    List,
    /// Add a plant and schedule its first reminder
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(long, default_value = "bedroom", value_parser = parse_room)]
        room: Room,
        #[arg(long, default_value = "full-sun", value_parser = parse_light)]
        light: Light,
        #[arg(long, default_value = "every-day", value_parser = parse_watering)]
        watering: WateringDays,
        #[arg(long, default_value = "20-50ml", value_parser = parse_water)]
        water: Water,
    },
    /// Edit a plant's details
    Edit {
        #[arg(long)]
        id: Uuid,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_room)]
        room: Option<Room>,
        #[arg(long, value_parser = parse_light)]
        light: Option<Light>,
        #[arg(long, value_parser = parse_watering)]
        watering: Option<WateringDays>,
        #[arg(long, value_parser = parse_water)]
        water: Option<Water>,
    },
    /// Delete a plant
    Remove {
        #[arg(long)]
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete plants by their position in `list`
    RemoveAt {
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Mark a plant watered today, or undo it
    Toggle {
        #[arg(long)]
        id: Uuid,
    },
    /// Show pending reminders
    Reminders {
        /// Print reminders that are due and remove them from the spool
        #[arg(long)]
        deliver: bool,
    },
    /// Show the effective configuration
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn parse_room(s: &str) -> Result<Room, String> {
    Room::from_slug(s).ok_or_else(|| choices(s, Room::ALL.iter().map(|r| r.slug())))
}

fn parse_light(s: &str) -> Result<Light, String> {
    Light::from_slug(s).ok_or_else(|| choices(s, Light::ALL.iter().map(|l| l.slug())))
}

fn parse_watering(s: &str) -> Result<WateringDays, String> {
    WateringDays::from_slug(s).ok_or_else(|| choices(s, WateringDays::ALL.iter().map(|d| d.slug())))
}

fn parse_water(s: &str) -> Result<Water, String> {
    Water::from_slug(s).ok_or_else(|| choices(s, Water::ALL.iter().map(|w| w.slug())))
}

fn choices<'a>(given: &str, valid: impl Iterator<Item = &'a str>) -> String {
    format!(
        "invalid value '{}', expected one of: {}",
        given,
        valid.collect::<Vec<_>>().join(", ")
    )
}

/// Logs go to stderr so command output stays clean on stdout.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "planto=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn warn_if_unsaved(store: &PlantStore) {
    if let Some(e) = store.last_save_error() {
        eprintln!("Warning: changes were not saved: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AppConfig::load();
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        config.data_dir = Some(dir.into());
    }
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let reminder_file = ReminderFile::new(config.reminder_path()?);

    let spool = config
        .reminders_enabled
        .then(|| ReminderSpool::start(reminder_file.clone(), clock.clone()));
    let scheduler: Arc<dyn ReminderScheduler> = match &spool {
        Some(spool) => Arc::new(spool.clone()),
        None => Arc::new(NoopScheduler),
    };
    scheduler.request_authorization();

    let snapshot_path = config.snapshot_path()?;
    let store = PlantStore::open(&snapshot_path, scheduler, clock.clone());
    if let Some(e) = store.load_error() {
        eprintln!(
            "Warning: saved plants could not be read ({}). Starting with an empty list.",
            e
        );
    }

    match cli.command.unwrap_or(Commands::Today) {
        Commands::Today => {
            print!("{}", render::render_today(&store.plants(), clock.now(), &*clock));
        }
        Commands::List => {
            let now = clock.now();
            let plants = store.plants();
            if plants.is_empty() {
                println!("No plants yet");
            }
            for (i, plant) in plants.iter().enumerate() {
                let mark = if plant.is_watered_today(now, &*clock) { "watered" } else { "thirsty" };
                println!(
                    "[{}] {}  {}  {}  {}",
                    i,
                    plant.id,
                    render::plant_line(plant),
                    plant.watering_days.title(),
                    mark
                );
            }
        }
        Commands::Add {
            name,
            room,
            light,
            watering,
            water,
        } => {
            if !is_valid_name(&name) {
                bail!("Please enter a plant name.");
            }
            let plant = store.add(CreatePlantInput {
                name: name.trim().to_string(),
                room,
                light,
                watering_days: watering,
                water,
            });
            warn_if_unsaved(&store);
            println!("Added {} ({})", plant.name, plant.id);
        }
        Commands::Edit {
            id,
            name,
            room,
            light,
            watering,
            water,
        } => {
            if let Some(name) = &name {
                if !is_valid_name(name) {
                    bail!("Please enter a plant name.");
                }
            }
            let input = UpdatePlantInput {
                name: name.map(|n| n.trim().to_string()),
                room,
                light,
                watering_days: watering,
                water,
            };
            if input.is_empty() {
                println!("No changes given");
                return Ok(());
            }

            let Some(mut plant) = store.get(id) else {
                bail!("No plant with id {}", id);
            };
            plant.apply(input);
            if !store.update(plant) {
                bail!("No plant with id {}", id);
            }
            warn_if_unsaved(&store);
            println!("Updated {}", id);
        }
        Commands::Remove { id, yes } => {
            let Some(plant) = store.get(id) else {
                bail!("No plant with id {}", id);
            };
            if !yes && !confirm(&format!("Delete the reminder for {}?", plant.name))? {
                println!("Kept {}", plant.name);
                return Ok(());
            }
            store.remove(id);
            warn_if_unsaved(&store);
            println!("Removed {}", plant.name);
        }
        Commands::RemoveAt { indices } => {
            let removed = store.remove_at(&indices)?;
            warn_if_unsaved(&store);
            for plant in removed {
                println!("Removed {}", plant.name);
            }
        }
        Commands::Toggle { id } => {
            let Some(watered) = store.toggle_watered(id) else {
                bail!("No plant with id {}", id);
            };
            warn_if_unsaved(&store);
            println!("{}", if watered { "Watered today" } else { "Not watered today" });
            if store.is_all_done() {
                println!("All Done! 🎉");
            }
        }
        Commands::Reminders { deliver } => {
            if let Some(spool) = &spool {
                spool.flush().await;
            }
            let now = clock.now();
            if deliver {
                let due = reminder_file
                    .take_due(now)
                    .context("Failed to read reminder spool")?;
                if due.is_empty() {
                    println!("No reminders due");
                }
                for reminder in due {
                    println!("{}: {}", reminder.title, reminder.body);
                }
            } else {
                let pending = reminder_file
                    .load()
                    .context("Failed to read reminder spool")?;
                if pending.is_empty() {
                    println!("No pending reminders");
                }
                for reminder in pending {
                    let state = if reminder.is_due(now) { "due" } else { "pending" };
                    println!(
                        "{}  {}  {}",
                        reminder.due_at.format("%Y-%m-%d %H:%M"),
                        state,
                        reminder.body
                    );
                }
            }
        }
        Commands::Config { init } => {
            let path = config::config_path()?;
            if init {
                config.save_to(&path)?;
                println!("Wrote {}", path.display());
            }
            println!("config:    {}", path.display());
            println!("snapshot:  {}", snapshot_path.display());
            println!("reminders: {}", reminder_file.path().display());
            println!(
                "reminders enabled: {}",
                if config.reminders_enabled { "yes" } else { "no" }
            );
        }
    }

    if let Some(spool) = &spool {
        spool.flush().await;
    }
    Ok(())
}
