use std::error::Error;

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use engine::{
    Currency, MaintenanceKind, SettingsProvider, StaticSettings, Vehicle, VehicleRepository,
};
use migration::MigratorTrait;
use sea_orm::Database;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "benzina")]
#[command(about = "Fuel, odometer and maintenance tracking for a single vehicle")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./benzina.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Vehicle(VehicleArgs),
    Fuel(FuelArgs),
    Maintenance(MaintenanceArgs),
    /// Monthly statistics: fuel used, fuel cost, distance, average consumption.
    Stats {
        #[arg(long)]
        month: u32,
        /// Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Args, Debug)]
struct VehicleArgs {
    #[command(subcommand)]
    command: VehicleCommand,
}

#[derive(Subcommand, Debug)]
enum VehicleCommand {
    /// Create a vehicle with its initial odometer reading and make it active.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = parse_date)]
        purchase_date: NaiveDateTime,
        #[arg(long)]
        mileage: i64,
    },
    /// Show the active vehicle and its history.
    Show,
    /// Delete the active vehicle and everything recorded for it.
    Delete,
    /// Flip the purchased flag of the active vehicle.
    Purchased {
        #[arg(long)]
        value: bool,
    },
}

#[derive(Args, Debug)]
struct FuelArgs {
    #[command(subcommand)]
    command: FuelCommand,
}

#[derive(Subcommand, Debug)]
enum FuelCommand {
    /// Record a fill-up (an odometer reading is created with it).
    Add {
        #[arg(long)]
        liters: f64,
        #[arg(long)]
        cost: f64,
        #[arg(long)]
        mileage: i64,
        /// Defaults to now.
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDateTime>,
        /// Tank not filled to capacity.
        #[arg(long)]
        partial: bool,
    },
    List,
    /// Change the partial-fill marker of a recorded fill-up.
    Partial {
        #[arg(long)]
        id: String,
        #[arg(long)]
        value: bool,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Delete every fill-up of the active vehicle.
    Reset,
}

#[derive(Args, Debug)]
struct MaintenanceArgs {
    #[command(subcommand)]
    command: MaintenanceCommand,
}

#[derive(Subcommand, Debug)]
enum MaintenanceCommand {
    Add {
        /// One of: tire_change, oil_change, brake_check, other.
        #[arg(long, value_parser = parse_kind)]
        kind: MaintenanceKind,
        #[arg(long, default_value_t = 0.0)]
        cost: f64,
        /// Warranty work or a favor; the cost is ignored.
        #[arg(long)]
        free: bool,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDateTime>,
        #[arg(long)]
        notes: Option<String>,
        /// Link the event to an existing odometer reading.
        #[arg(long)]
        mileage_id: Option<String>,
    },
    List,
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Delete every maintenance event of the active vehicle.
    Reset,
}

fn parse_date(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        .map_err(|err| format!("invalid date (expected YYYY-MM-DD): {err}"))
}

fn parse_kind(value: &str) -> Result<MaintenanceKind, String> {
    MaintenanceKind::try_from(value).map_err(|err| err.to_string())
}

fn format_cost(cost: f64, currency: Currency) -> String {
    format!(
        "{cost:.prec$} {}",
        currency.symbol(),
        prec = currency.minor_units() as usize
    )
}

fn distance_label(metric: bool) -> &'static str {
    if metric { "km" } else { "mi" }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "benzina={level},engine={level}",
            level = settings.level
        ))
        .init();

    let database = Database::connect(&cli.database_url).await?;
    migration::Migrator::up(&database, None).await?;

    let repository = VehicleRepository::builder().database(database).build();

    // Repair legacy records before anything else touches the store.
    let report = repository.migrate_vehicles().await?;
    if !report.is_clean() {
        tracing::info!(?report, "repaired legacy records");
    }

    let tracker = settings.tracker;
    match cli.command {
        Command::Vehicle(args) => run_vehicle(&repository, &tracker, args.command).await?,
        Command::Fuel(args) => run_fuel(&repository, &tracker, args.command).await?,
        Command::Maintenance(args) => run_maintenance(&repository, &tracker, args.command).await?,
        Command::Stats { month, year } => {
            let recap = repository.monthly_recap(month, year).await?;
            let unit = distance_label(tracker.is_using_metric());
            println!("Statistics for {:02}/{}", recap.month, recap.year);
            println!("  fuel used:   {:.2} L", recap.fuel_used);
            println!(
                "  fuel cost:   {}",
                format_cost(recap.fuel_cost, tracker.selected_currency())
            );
            println!("  driven:      {} {unit}", recap.km_driven);
            println!(
                "  consumption: {:.3} L/{unit}",
                recap.average_fuel_usage
            );
        }
    }

    Ok(())
}

async fn run_vehicle(
    repository: &VehicleRepository,
    tracker: &StaticSettings,
    command: VehicleCommand,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match command {
        VehicleCommand::Add {
            name,
            purchase_date,
            mileage,
        } => {
            let vehicle = repository
                .save_vehicle(&name, purchase_date, mileage)
                .await?;
            println!("Created vehicle \"{}\" ({})", vehicle.name, vehicle.id);
        }
        VehicleCommand::Show => match repository.load_active_vehicle().await? {
            Some(vehicle) => print_vehicle(&vehicle, tracker),
            None => println!("No active vehicle."),
        },
        VehicleCommand::Delete => {
            repository.delete_vehicle().await?;
            println!("Vehicle deleted.");
        }
        VehicleCommand::Purchased { value } => {
            repository.update_vehicle_purchase_status(value).await?;
            println!("Purchased flag set to {value}.");
        }
    }
    Ok(())
}

async fn run_fuel(
    repository: &VehicleRepository,
    tracker: &StaticSettings,
    command: FuelCommand,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match command {
        FuelCommand::Add {
            liters,
            cost,
            mileage,
            date,
            partial,
        } => {
            let date = date.unwrap_or_else(|| Local::now().naive_local());
            let fill = repository
                .save_fuel_usage(liters, cost, mileage, date)
                .await?;
            if partial {
                repository
                    .update_fuel_usage_partial_fill_status(&fill.id, true)
                    .await?;
            }
            println!("Recorded fill-up {}", fill.id);
        }
        FuelCommand::List => match repository.load_active_vehicle().await? {
            Some(vehicle) => {
                let unit = distance_label(tracker.is_using_metric());
                for fill in &vehicle.fuel_usages {
                    let at = fill
                        .mileage_id
                        .as_deref()
                        .and_then(|id| vehicle.mileage.iter().find(|m| m.id == id))
                        .map_or_else(String::new, |m| format!(" @ {} {unit}", m.value));
                    let marker = if fill.is_partial_fill { " (partial)" } else { "" };
                    println!(
                        "{}  {}  {:.2} L  {}{at}{marker}",
                        fill.id,
                        fill.date.date(),
                        fill.liters,
                        format_cost(fill.cost, tracker.selected_currency()),
                    );
                }
            }
            None => println!("No active vehicle."),
        },
        FuelCommand::Partial { id, value } => {
            repository
                .update_fuel_usage_partial_fill_status(&id, value)
                .await?;
            println!("Partial-fill flag set to {value}.");
        }
        FuelCommand::Delete { id } => {
            let fill = repository.get_fuel_usage(&id).await?;
            repository.delete_fuel_usage(&fill).await?;
            println!("Fill-up deleted.");
        }
        FuelCommand::Reset => {
            repository.reset_fuel_usage().await?;
            println!("All fill-ups deleted.");
        }
    }
    Ok(())
}

async fn run_maintenance(
    repository: &VehicleRepository,
    tracker: &StaticSettings,
    command: MaintenanceCommand,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match command {
        MaintenanceCommand::Add {
            kind,
            cost,
            free,
            date,
            notes,
            mileage_id,
        } => {
            let date = date.unwrap_or_else(|| Local::now().naive_local());
            let event = repository
                .save_maintenance(kind, cost, free, date, notes, mileage_id)
                .await?;
            println!("Recorded {} ({})", event.kind.as_str(), event.id);
        }
        MaintenanceCommand::List => match repository.load_active_vehicle().await? {
            Some(vehicle) => {
                for event in &vehicle.maintenance {
                    let cost = if event.is_free {
                        "free".to_string()
                    } else {
                        format_cost(event.cost, tracker.selected_currency())
                    };
                    let notes = event.notes.as_deref().unwrap_or("");
                    println!(
                        "{}  {}  {}  {cost}  {notes}",
                        event.id,
                        event.date.date(),
                        event.kind.as_str(),
                    );
                }
                print_due_hints(&vehicle, tracker);
            }
            None => println!("No active vehicle."),
        },
        MaintenanceCommand::Delete { id } => match repository.load_active_vehicle().await? {
            Some(vehicle) => match vehicle.maintenance.iter().find(|m| m.id == id) {
                Some(event) => {
                    repository.delete_maintenance(event).await?;
                    println!("Maintenance event deleted.");
                }
                None => println!("No maintenance event with id {id}."),
            },
            None => println!("No active vehicle."),
        },
        MaintenanceCommand::Reset => {
            repository.reset_maintenance().await?;
            println!("All maintenance events deleted.");
        }
    }
    Ok(())
}

fn print_vehicle(vehicle: &Vehicle, tracker: &StaticSettings) {
    let unit = distance_label(tracker.is_using_metric());
    println!("{} ({})", vehicle.name, vehicle.id);
    println!("  purchased: {}", vehicle.is_purchased);
    println!("  purchase date: {}", vehicle.purchase_date.date());
    match vehicle.latest_mileage() {
        Some(reading) => println!("  odometer: {} {unit} ({})", reading.value, reading.date.date()),
        None => println!("  odometer: no readings"),
    }
    println!(
        "  {} fill-ups, {} maintenance events",
        vehicle.fuel_usages.len(),
        vehicle.maintenance.len()
    );
}

/// Suggest upcoming services from the default intervals in the settings.
fn print_due_hints(vehicle: &Vehicle, tracker: &StaticSettings) {
    let Some(current) = vehicle.latest_mileage().map(|m| m.value) else {
        return;
    };
    let intervals = tracker.maintenance_intervals();
    let unit = distance_label(tracker.is_using_metric());

    for (kind, interval) in [
        (MaintenanceKind::TireChange, intervals.tire_km),
        (MaintenanceKind::OilChange, intervals.oil_km),
        (MaintenanceKind::BrakeCheck, intervals.brake_km),
    ] {
        let last_at = vehicle
            .maintenance
            .iter()
            .filter(|event| event.kind == kind)
            .filter_map(|event| {
                let id = event.mileage_id.as_deref()?;
                vehicle.mileage.iter().find(|m| m.id == id).map(|m| m.value)
            })
            .max();
        if let Some(last_at) = last_at {
            let due = last_at + interval;
            if due <= current {
                println!("  {} due ({due} {unit} reached)", kind.as_str());
            }
        }
    }
}
