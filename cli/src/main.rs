//! Predimaint CLI
//!
//! Command-line interface for the Predimaint maintenance registry. Works
//! directly on the JSON data file the API server uses.
//!
//! # Usage
//!
//! ```bash
//! predimaint --help
//! predimaint dashboard
//! predimaint units add "Bloco A"
//! predimaint chart --equipment 1712736000000 --metric temperature
//! predimaint report daily --date 2024-04-10
//! ```

#![deny(unsafe_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use shared::chart::{ChartDimensions, ChartOutcome};
use shared::models::{CollectionDraft, Criticality, EmployeeDraft, EquipmentDraft, MetricKey};
use shared::registry::Registry;
use shared::storage::FileKeyValueStore;

/// Predimaint CLI - predictive maintenance records from the command line
#[derive(Parser)]
#[command(name = "predimaint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Registry data file
    #[arg(
        short,
        long,
        env = "PREDIMAINT_DATA_FILE",
        default_value = "predimaint.json"
    )]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show record counts
    Dashboard,
    /// Manage units
    #[command(subcommand)]
    Units(UnitCommands),
    /// Manage equipment
    #[command(subcommand)]
    Equipment(EquipmentCommands),
    /// Manage employees
    #[command(subcommand)]
    Employees(EmployeeCommands),
    /// Record a data collection
    Collect(CollectArgs),
    /// List recorded collections, most recent first
    Collections {
        /// Only collections of this equipment
        #[arg(long)]
        equipment: Option<String>,
    },
    /// Compute the measurement history chart of one metric
    Chart {
        /// Equipment id
        #[arg(long)]
        equipment: String,
        /// Metric key: temperature, vibration, pressure or a custom field name
        #[arg(long, default_value = "temperature")]
        metric: String,
        /// Chart width in pixels
        #[arg(long, default_value_t = 500.0)]
        width: f64,
        /// Chart height in pixels
        #[arg(long, default_value_t = 250.0)]
        height: f64,
        /// Print the full layout as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print reports
    #[command(subcommand)]
    Report(ReportCommands),
}

#[derive(Subcommand)]
enum UnitCommands {
    /// List units
    List,
    /// Register a unit
    Add {
        /// Unit name
        name: String,
    },
    /// Delete a unit and all of its equipment
    Delete {
        /// Unit id
        id: String,
    },
}

#[derive(Subcommand)]
enum EquipmentCommands {
    /// List equipment
    List {
        /// Only equipment of this unit
        #[arg(long)]
        unit: Option<String>,
    },
    /// Register equipment; built-in types get their fields prefilled
    Add {
        /// Owning unit id
        #[arg(long)]
        unit: String,
        /// Equipment name
        #[arg(long)]
        name: String,
        /// Equipment type, e.g. "Motor Elétrico"
        #[arg(long = "type")]
        equipment_type: String,
        /// Serial number
        #[arg(long)]
        serial: String,
        /// Criticality: high, medium or low
        #[arg(long, default_value = "medium", value_parser = parse_criticality)]
        criticality: Criticality,
        /// Custom field as NAME or NAME:UNIT; replaces the type's fields
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Delete equipment (its collections are kept)
    Delete {
        /// Equipment id
        id: String,
    },
}

#[derive(Subcommand)]
enum EmployeeCommands {
    /// List employees
    List,
    /// Register an employee
    Add {
        /// Full name
        #[arg(long)]
        name: String,
        /// Job role
        #[arg(long)]
        role: String,
        /// Badge number
        #[arg(long)]
        badge: String,
        /// Contact e-mail
        #[arg(long)]
        email: String,
        /// Grant administrator rights
        #[arg(long)]
        admin: bool,
    },
    /// Delete an employee
    Delete {
        /// Employee id
        id: String,
    },
}

#[derive(clap::Args)]
struct CollectArgs {
    /// Equipment id
    #[arg(long)]
    equipment: String,
    /// Employee id
    #[arg(long)]
    employee: String,
    /// Vibration reading
    #[arg(long)]
    vibration: f64,
    /// Temperature reading (°C)
    #[arg(long)]
    temperature: f64,
    /// Pressure reading (bar)
    #[arg(long)]
    pressure: f64,
    /// Custom reading as NAME=VALUE
    #[arg(long = "value", value_parser = parse_custom_value)]
    values: Vec<(String, f64)>,
    /// Observations
    #[arg(long, default_value = "")]
    notes: String,
    /// Collection time (RFC 3339); defaults to now
    #[arg(long)]
    date: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum ReportCommands {
    /// Consolidated report of one day
    Daily {
        /// Day (YYYY-MM-DD, UTC); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print a mailto: link for this recipient instead of the text
        #[arg(long)]
        mailto: Option<String>,
    },
    /// Report of a single collection
    Collection {
        /// Collection id
        #[arg(long)]
        id: String,
        /// Print a mailto: link for this recipient instead of the text
        #[arg(long)]
        mailto: Option<String>,
    },
}

fn parse_criticality(value: &str) -> Result<Criticality, String> {
    match value.to_ascii_lowercase().as_str() {
        "high" | "alta" => Ok(Criticality::High),
        "medium" | "media" | "média" => Ok(Criticality::Medium),
        "low" | "baixa" => Ok(Criticality::Low),
        other => Err(format!("unknown criticality '{other}'")),
    }
}

fn parse_custom_value(value: &str) -> Result<(String, f64), String> {
    let (name, number) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{value}'"))?;
    let number = number
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_string(), number))
}

fn open_registry(path: &Path) -> Result<Registry> {
    let store = FileKeyValueStore::open(path)
        .with_context(|| format!("Failed to open data file {}", path.display()))?;
    Ok(Registry::new(Arc::new(store)))
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let Some(command) = cli.command else {
        writeln!(out, "Predimaint CLI v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "Use --help for usage information")?;
        return Ok(());
    };

    let registry = open_registry(&cli.data_file)?;
    tracing::debug!(data_file = %cli.data_file.display(), "Registry opened");

    match command {
        Commands::Dashboard => {
            let counts = registry.dashboard()?;
            writeln!(out, "Unidades:      {}", counts.units)?;
            writeln!(out, "Equipamentos:  {}", counts.equipment)?;
            writeln!(out, "Colaboradores: {}", counts.employees)?;
            writeln!(out, "Coletas:       {}", counts.collections)?;
        }
        Commands::Units(command) => run_units(&registry, command, out)?,
        Commands::Equipment(command) => run_equipment(&registry, command, out)?,
        Commands::Employees(command) => run_employees(&registry, command, out)?,
        Commands::Collect(args) => {
            let mut draft = CollectionDraft::new(args.equipment, args.employee)
                .with_measurements(args.vibration, args.temperature, args.pressure)
                .with_notes(args.notes);
            if let Some(date) = args.date {
                draft = draft.with_date(date);
            }
            for (name, value) in args.values {
                draft = draft.with_custom_value(name, value);
            }
            let collection = registry.record_collection(draft)?;
            writeln!(out, "{}", collection.id)?;
        }
        Commands::Collections { equipment } => {
            for view in registry.list_collections()? {
                if equipment
                    .as_deref()
                    .is_some_and(|id| id != view.collection.equipment_id)
                {
                    continue;
                }
                let m = &view.collection.measurements;
                writeln!(
                    out,
                    "{}  {}  {} / {}  {}  vib={} temp={} pres={}",
                    view.collection.id,
                    view.collection.date.format("%d/%m/%Y %H:%M"),
                    view.unit_name,
                    view.equipment_name,
                    view.employee_name,
                    m.vibration,
                    m.temperature,
                    m.pressure
                )?;
            }
        }
        Commands::Chart {
            equipment,
            metric,
            width,
            height,
            json,
        } => {
            let dims = ChartDimensions::new(width, height);
            if !dims.has_plot_area() {
                bail!("A {width}x{height} chart leaves no room inside its margins");
            }
            let outcome = registry.chart(&equipment, &MetricKey::parse(&metric), &dims)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
            } else {
                print_chart(&outcome, out)?;
            }
        }
        Commands::Report(ReportCommands::Daily { date, mailto }) => {
            let day = date.unwrap_or_else(|| Utc::now().date_naive());
            match registry.daily_report(day)? {
                Some(report) => match mailto {
                    Some(to) => writeln!(out, "{}", report.mailto(Some(to.as_str())))?,
                    None => writeln!(out, "{}\n\n{}", report.subject, report.body)?,
                },
                None => writeln!(out, "Nenhuma coleta registrada em {}", day.format("%d/%m/%Y"))?,
            }
        }
        Commands::Report(ReportCommands::Collection { id, mailto }) => {
            let report = registry.collection_report(&id)?;
            match mailto {
                Some(to) => writeln!(out, "{}", report.mailto(Some(to.as_str())))?,
                None => writeln!(out, "{}\n\n{}", report.subject, report.body)?,
            }
        }
    }

    Ok(())
}

fn run_units(registry: &Registry, command: UnitCommands, out: &mut dyn Write) -> Result<()> {
    match command {
        UnitCommands::List => {
            for unit in registry.list_units()? {
                writeln!(out, "{}  {}", unit.id, unit.name)?;
            }
        }
        UnitCommands::Add { name } => {
            let unit = registry.add_unit(&name)?;
            writeln!(out, "{}", unit.id)?;
        }
        UnitCommands::Delete { id } => {
            let removed = registry.delete_unit(&id)?;
            writeln!(out, "Unidade {id} excluída ({removed} equipamento(s) removido(s))")?;
        }
    }
    Ok(())
}

fn run_equipment(
    registry: &Registry,
    command: EquipmentCommands,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        EquipmentCommands::List { unit } => {
            for equipment in registry.list_equipment(unit.as_deref())? {
                writeln!(
                    out,
                    "{}  {}  {}  {}  [{}]",
                    equipment.id,
                    equipment.name,
                    equipment.equipment_type,
                    equipment.serial_number,
                    equipment.criticality
                )?;
            }
        }
        EquipmentCommands::Add {
            unit,
            name,
            equipment_type,
            serial,
            criticality,
            fields,
        } => {
            let mut draft =
                EquipmentDraft::new(name, equipment_type, serial).with_criticality(criticality);
            for field in &fields {
                let (name, field_unit) = field.split_once(':').unwrap_or((field.as_str(), ""));
                draft = draft.with_custom_field(name, field_unit);
            }
            let equipment = registry.add_equipment(&unit, draft)?;
            writeln!(out, "{}", equipment.id)?;
        }
        EquipmentCommands::Delete { id } => {
            registry.delete_equipment(&id)?;
            writeln!(out, "Equipamento {id} excluído")?;
        }
    }
    Ok(())
}

fn run_employees(
    registry: &Registry,
    command: EmployeeCommands,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        EmployeeCommands::List => {
            for employee in registry.list_employees()? {
                writeln!(
                    out,
                    "{}  {}  {}  {}  {}{}",
                    employee.id,
                    employee.employee_id,
                    employee.name,
                    employee.role,
                    employee.email,
                    if employee.is_admin { "  (admin)" } else { "" }
                )?;
            }
        }
        EmployeeCommands::Add {
            name,
            role,
            badge,
            email,
            admin,
        } => {
            let mut draft = EmployeeDraft::new(name, role, badge, email);
            if admin {
                draft = draft.admin();
            }
            let employee = registry.add_employee(draft)?;
            writeln!(out, "{}", employee.id)?;
        }
        EmployeeCommands::Delete { id } => {
            registry.delete_employee(&id)?;
            writeln!(out, "Colaborador {id} excluído")?;
        }
    }
    Ok(())
}

fn print_chart(outcome: &ChartOutcome, out: &mut dyn Write) -> Result<()> {
    let Some(layout) = outcome.layout() else {
        writeln!(out, "Dados insuficientes para gerar o gráfico.")?;
        return Ok(());
    };

    writeln!(
        out,
        "Faixa: {:.1} .. {:.1}  ({} pontos)",
        layout.frame.y_min,
        layout.frame.y_max,
        layout.points.len()
    )?;
    let y_labels: Vec<&str> = layout.y_ticks.iter().map(|t| t.label.as_str()).collect();
    writeln!(out, "Eixo Y: {}", y_labels.join(" | "))?;
    let x_labels: Vec<&str> = layout.x_ticks.iter().map(|t| t.label.as_str()).collect();
    writeln!(out, "Eixo X: {}", x_labels.join(" | "))?;
    writeln!(out, "Polyline: {}", layout.polyline())?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli, &mut std::io::stdout().lock())
}
