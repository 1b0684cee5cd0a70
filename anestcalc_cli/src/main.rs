mod render;

use anestcalc_core::config::MIN_WEIGHT_KG;
use anestcalc_core::*;
use clap::{Parser, Subcommand, ValueEnum};
use render::TextOptions;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "anestcalc")]
#[command(about = "Maximum local anesthetic dose calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the maximum dose and cartridge count for a patient
    Calc {
        /// Anesthetic agent (lidocaine, mepivacaine, prilocaine, articaine, bupivacaine)
        #[arg(short, long)]
        agent: String,

        /// Concentration label offered for the agent, e.g. "2%"
        #[arg(short, long)]
        concentration: String,

        /// Patient weight in kg (defaults to patient.default_weight_kg)
        #[arg(short, long)]
        weight: Option<f64>,

        /// Vasoconstrictor formulation, e.g. "1:100000 epinefrina" ("none" for plain)
        #[arg(long)]
        vasoconstrictor: Option<String>,

        /// ASA class ("ASA I/II" or "ASA III/IV"), used with a vasoconstrictor
        #[arg(long)]
        asa: Option<String>,

        /// Output format (defaults to output.format)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Leave agent and vasoconstrictor notes out of text output
        #[arg(long)]
        no_notes: bool,
    },

    /// Print the built-in reference table
    Reference {
        /// Which part of the table to print
        #[arg(value_enum, default_value_t = Section::All)]
        section: Section,

        #[arg(long, value_enum, default_value_t = TableFormat::Text)]
        format: TableFormat,
    },

    /// List the accepted values for each input
    Options {
        /// Only list the concentrations offered for this agent
        #[arg(long)]
        agent: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Section {
    All,
    Agents,
    Vasoconstrictors,
}

#[derive(Clone, Copy, ValueEnum)]
enum TableFormat {
    Text,
    Json,
    Csv,
}

fn main() -> ExitCode {
    // Warn by default so stdout carries only results
    anestcalc_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let table = get_reference_table();
    let errors = table.validate();
    if !errors.is_empty() {
        eprintln!("Reference table validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid reference table".into()));
    }

    match cli.command {
        Commands::Calc {
            agent,
            concentration,
            weight,
            vasoconstrictor,
            asa,
            format,
            no_notes,
        } => cmd_calc(
            CalcArgs {
                agent,
                concentration,
                weight,
                vasoconstrictor,
                asa,
                format,
                no_notes,
            },
            &config,
        ),
        Commands::Reference { section, format } => cmd_reference(table, section, format),
        Commands::Options { agent } => cmd_options(table, agent.as_deref()),
    }
}

struct CalcArgs {
    agent: String,
    concentration: String,
    weight: Option<f64>,
    vasoconstrictor: Option<String>,
    asa: Option<String>,
    format: Option<FormatArg>,
    no_notes: bool,
}

fn cmd_calc(args: CalcArgs, config: &Config) -> Result<()> {
    let weight_kg = validate_weight(args.weight.unwrap_or(config.patient.default_weight_kg))?;
    if weight_kg > WEIGHT_CEILING_KG {
        tracing::info!(
            "Weight {} kg exceeds {} kg, dosing at the ceiling",
            weight_kg,
            WEIGHT_CEILING_KG
        );
    }

    let vasoconstrictor = args.vasoconstrictor.filter(|v| !is_no_vasoconstrictor(v));
    let asa_class = match (&vasoconstrictor, args.asa) {
        (Some(_), asa) => asa,
        (None, Some(asa)) => {
            tracing::debug!("Ignoring ASA class {:?} without a vasoconstrictor", asa);
            None
        }
        (None, None) => None,
    };
    if vasoconstrictor.is_some() && asa_class.is_none() {
        tracing::info!("No ASA class given, vasoconstrictor ceiling not applied");
    }

    let input = CalculationInput {
        agent: args.agent,
        concentration: args.concentration,
        weight_kg,
        vasoconstrictor,
        asa_class,
    };
    let result = input.compute()?;

    let format = args.format.map(OutputFormat::from).unwrap_or(config.output.format);
    match format {
        OutputFormat::Json => render::print_result_json(&input, &result)?,
        OutputFormat::Text => render::print_result_text(
            &input,
            &result,
            &TextOptions {
                show_notes: config.output.show_notes && !args.no_notes,
                show_reference: config.output.show_reference,
            },
        ),
    }

    Ok(())
}

fn cmd_reference(table: &ReferenceTable, section: Section, format: TableFormat) -> Result<()> {
    let agents = matches!(section, Section::All | Section::Agents);
    let vasoconstrictors = matches!(section, Section::All | Section::Vasoconstrictors);

    match format {
        TableFormat::Text => {
            if agents {
                render::print_agents_text(&table.agents);
            }
            if agents && vasoconstrictors {
                println!();
            }
            if vasoconstrictors {
                render::print_vasoconstrictors_text(&table.vasoconstrictors);
            }
        }
        TableFormat::Json => match section {
            Section::All => render::print_json(table)?,
            Section::Agents => render::print_json(&table.agents)?,
            Section::Vasoconstrictors => render::print_json(&table.vasoconstrictors)?,
        },
        TableFormat::Csv => {
            if agents {
                render::write_agents_csv(io::stdout(), &table.agents)?;
            }
            if agents && vasoconstrictors {
                render::blank_line()?;
            }
            if vasoconstrictors {
                render::write_vasoconstrictors_csv(io::stdout(), &table.vasoconstrictors)?;
            }
        }
    }

    Ok(())
}

fn cmd_options(table: &ReferenceTable, agent: Option<&str>) -> Result<()> {
    if let Some(agent) = agent {
        let concentrations = table.concentrations_for(agent);
        if concentrations.is_empty() {
            return Err(Error::InvalidInput(format!("unknown agent '{}'", agent)));
        }
        for c in concentrations {
            println!("{}", c);
        }
        return Ok(());
    }

    println!("Agents:");
    for profile in &table.agents {
        println!(
            "  {} ({}): {}",
            profile.agent.id(),
            profile.agent.alias(),
            profile.concentration_labels().join(", ")
        );
    }
    println!("Vasoconstrictors:");
    println!("  none");
    for name in table.vasoconstrictor_names() {
        println!("  {}", name);
    }
    println!("ASA classes:");
    for class in AsaClass::ALL {
        println!("  {}", class);
    }

    Ok(())
}

/// Reject weights the form would never produce; the ceiling is the core's job
fn validate_weight(weight_kg: f64) -> Result<f64> {
    if !weight_kg.is_finite() || weight_kg < MIN_WEIGHT_KG {
        return Err(Error::InvalidInput(format!(
            "weight must be at least {} kg, got {}",
            MIN_WEIGHT_KG, weight_kg
        )));
    }
    Ok(weight_kg)
}

/// "none" and the Portuguese "nenhum" both mean a plain solution
fn is_no_vasoconstrictor(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("nenhum")
}
