//! Output rendering for calculation results and the reference table.

use anestcalc_core::*;
use serde::Serialize;
use std::io::{self, Write};

/// Both halves of a calculation, for machine-readable output
#[derive(Serialize)]
struct CalculationReport<'a> {
    input: &'a CalculationInput,
    result: &'a CalculationResult,
}

/// What to include in the text rendering of a result
pub struct TextOptions {
    pub show_notes: bool,
    pub show_reference: bool,
}

pub fn print_result_json(input: &CalculationInput, result: &CalculationResult) -> Result<()> {
    let json = serde_json::to_string_pretty(&CalculationReport { input, result })?;
    println!("{}", json);
    Ok(())
}

pub fn print_result_text(input: &CalculationInput, result: &CalculationResult, options: &TextOptions) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  MAXIMUM DOSE");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {} {}", input.agent, input.concentration);
    if let Some(ref v) = input.vasoconstrictor {
        match input.asa_class {
            Some(ref asa) => println!("  with {} ({})", v, asa),
            None => println!("  with {}", v),
        }
    }
    println!();
    println!("  Maximum dose:       {:.2} mg", result.max_dose_mg);
    println!(
        "  Maximum cartridges: {} ({} mL each)",
        result.max_cartridges, CARTRIDGE_VOLUME_ML
    );
    if result.effective_weight_kg < input.weight_kg {
        println!(
            "  Weight used:        {:.2} kg (capped from {:.2} kg)",
            result.effective_weight_kg, input.weight_kg
        );
    } else {
        println!("  Weight used:        {:.2} kg", result.effective_weight_kg);
    }

    if options.show_notes {
        println!();
        println!("  Agent notes:");
        println!("    {}", result.agent_notes);
        if !result.vasoconstrictor_notes.is_empty() {
            println!();
            println!("  Vasoconstrictor notes:");
            println!("    {}", result.vasoconstrictor_notes);
        }
    }

    if options.show_reference {
        println!();
        println!("  ℹ Reference: {}", REFERENCE_CITATION);
    }

    println!();
}

// ============================================================================
// Reference table
// ============================================================================

#[derive(Serialize)]
struct AgentRow<'a> {
    agent: &'a str,
    concentration: &'a str,
    mg_per_ml: f64,
    max_dose_per_kg: f64,
    max_absolute_dose_mg: Option<f64>,
}

#[derive(Serialize)]
struct VasoconstrictorRow<'a> {
    vasoconstrictor: &'a str,
    asa_class: &'a str,
    /// Empty when unbounded
    max_cartridges: Option<f64>,
}

fn ceiling_text(ceiling: f64) -> String {
    if ceiling.is_infinite() {
        "unlimited".to_string()
    } else {
        ceiling.to_string()
    }
}

pub fn print_agents_text(agents: &[AgentProfile]) {
    println!("Agents (max mg/kg, absolute cap, concentrations):");
    for profile in agents {
        let cap = profile
            .max_absolute_dose_mg
            .map(|mg| format!("{} mg", mg))
            .unwrap_or_else(|| "none".to_string());
        let strengths: Vec<String> = profile
            .concentrations
            .iter()
            .map(|c| format!("{} = {} mg/mL", c.label, c.mg_per_ml))
            .collect();
        println!(
            "  {:<12} {:>4} mg/kg  cap {:<7}  {}",
            profile.agent.id(),
            profile.max_dose_per_kg,
            cap,
            strengths.join(", ")
        );
    }
}

pub fn print_vasoconstrictors_text(vasoconstrictors: &[VasoconstrictorProfile]) {
    println!("Vasoconstrictors (max cartridges by ASA class):");
    for v in vasoconstrictors {
        let ceilings: Vec<String> = AsaClass::ALL
            .iter()
            .map(|class| format!("{}: {}", class, ceiling_text(v.ceiling(*class))))
            .collect();
        println!("  {:<24} {}", v.name, ceilings.join(", "));
    }
}

pub fn write_agents_csv<W: Write>(out: W, agents: &[AgentProfile]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for profile in agents {
        for c in &profile.concentrations {
            writer.serialize(AgentRow {
                agent: profile.agent.id(),
                concentration: &c.label,
                mg_per_ml: c.mg_per_ml,
                max_dose_per_kg: profile.max_dose_per_kg,
                max_absolute_dose_mg: profile.max_absolute_dose_mg,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_vasoconstrictors_csv<W: Write>(
    out: W,
    vasoconstrictors: &[VasoconstrictorProfile],
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for v in vasoconstrictors {
        for class in AsaClass::ALL {
            let ceiling = v.ceiling(class);
            writer.serialize(VasoconstrictorRow {
                vasoconstrictor: &v.name,
                asa_class: class.label(),
                max_cartridges: ceiling.is_finite().then_some(ceiling),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn blank_line() -> Result<()> {
    writeln!(io::stdout())?;
    Ok(())
}
