use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pf_core::CoreError;
use pf_core::units::{parse_pressure, parse_temperature};
use pf_species::{
    ConfigError, Conditions, Databank, Identifier, Phase, SpeciesConfig, SpeciesError,
};

type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Species(#[from] SpeciesError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "ProcFlow CLI - species setup and compound property lookup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the species collection from a config file and list its members
    Show {
        /// Path to the species YAML/JSON file
        config_path: PathBuf,
    },
    /// Read one property for the configured species
    Props {
        /// Path to the species YAML/JSON file
        config_path: PathBuf,
        /// Property name (e.g., Tb, MW, Psat, rho)
        property: String,
        /// Restrict to these identifiers (defaults to every member)
        #[arg(long = "id")]
        ids: Vec<String>,
        /// Temperature, with unit (e.g., "350 K", "25C")
        #[arg(long)]
        t: Option<String>,
        /// Pressure, with unit (e.g., "1 atm", "2 bar")
        #[arg(long)]
        p: Option<String>,
        /// Phase: s, l or g
        #[arg(long)]
        phase: Option<String>,
    },
    /// Resolve one identifier against the databank
    Resolve {
        /// Name, CAS number, InChI=..., InChIKey=..., PubChem=... or SMILES=...
        identifier: String,
        /// Extra databank file merged onto the built-in one
        #[arg(long)]
        databank: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { config_path } => cmd_show(&config_path),
        Commands::Props {
            config_path,
            property,
            ids,
            t,
            p,
            phase,
        } => {
            let conditions = parse_conditions(t.as_deref(), p.as_deref(), phase.as_deref())?;
            cmd_props(&config_path, &property, &ids, &conditions)
        }
        Commands::Resolve {
            identifier,
            databank,
        } => cmd_resolve(&identifier, databank.as_deref()),
    }
}

fn parse_conditions(t: Option<&str>, p: Option<&str>, phase: Option<&str>) -> CliResult<Conditions> {
    let mut conditions = Conditions::current();
    if let Some(t) = t {
        conditions = conditions.with_temperature(parse_temperature(t)?);
    }
    if let Some(p) = p {
        conditions = conditions.with_pressure(parse_pressure(p)?);
    }
    if let Some(phase) = phase {
        conditions = conditions.with_phase(phase.parse::<Phase>()?);
    }
    Ok(conditions)
}

fn cmd_show(config_path: &Path) -> CliResult<()> {
    let species = SpeciesConfig::load(config_path)?.build()?;
    tracing::debug!(path = %config_path.display(), count = species.len(), "species built");
    species.show();
    for (id, cas) in species.identifiers().zip(species.cas_numbers()) {
        println!("  {:<24} CAS {}", id, cas);
    }
    if species.is_frozen() {
        println!("(frozen)");
    }
    Ok(())
}

fn cmd_props(
    config_path: &Path,
    property: &str,
    ids: &[String],
    conditions: &Conditions,
) -> CliResult<()> {
    let species = SpeciesConfig::load(config_path)?.build()?;
    let selected: Vec<&str> = if ids.is_empty() {
        species.identifiers().collect()
    } else {
        ids.iter().map(String::as_str).collect()
    };

    let values = species.get_properties(selected.as_slice(), property, conditions)?;
    for (id, value) in selected.iter().zip(values) {
        println!("  {:<24} {} = {}", id, property, value);
    }
    Ok(())
}

fn cmd_resolve(identifier: &str, databank_path: Option<&Path>) -> CliResult<()> {
    let mut databank = Databank::builtin();
    if let Some(path) = databank_path {
        databank.extend(Databank::load(path)?)?;
    }

    let kind = Identifier::parse(identifier)?.kind();
    tracing::debug!(%identifier, %kind, records = databank.len(), "resolving");
    let record = databank.lookup(identifier)?;
    println!("{} ({})", identifier, kind);
    println!("  name:    {}", record.name);
    println!("  CAS:     {}", record.cas);
    println!("  formula: {}", record.formula);
    println!("  MW:      {} g/mol", record.mw);
    println!("  Tb:      {} K", record.tb);
    println!("  Tc:      {} K", record.tc);
    println!("  Pc:      {} Pa", record.pc);
    Ok(())
}
