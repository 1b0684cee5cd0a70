//! Built-in reference table of anesthetic agents and vasoconstrictors.
//!
//! The table is hand-curated and fixed; nothing in configuration can extend
//! or alter it.

use crate::notes;
use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};

/// Cached reference table - built once and shared read-only
static REFERENCE: Lazy<ReferenceTable> = Lazy::new(build_reference_table_internal);

/// Get a reference to the cached reference table
pub fn get_reference_table() -> &'static ReferenceTable {
    &REFERENCE
}

/// Builds a fresh copy of the reference table
///
/// **Note**: For production use, prefer `get_reference_table()`.
pub fn build_reference_table() -> ReferenceTable {
    build_reference_table_internal()
}

fn concentrations(entries: &[(&str, f64)]) -> Vec<Concentration> {
    entries
        .iter()
        .map(|(label, mg_per_ml)| Concentration {
            label: (*label).into(),
            mg_per_ml: *mg_per_ml,
        })
        .collect()
}

fn ceilings(asa_one_two: f64, asa_three_four: f64) -> BTreeMap<AsaClass, f64> {
    BTreeMap::from([
        (AsaClass::OneTwo, asa_one_two),
        (AsaClass::ThreeFour, asa_three_four),
    ])
}

fn agent_profile(
    agent: Agent,
    max_dose_per_kg: f64,
    strengths: &[(&str, f64)],
    max_absolute_dose_mg: Option<f64>,
) -> AgentProfile {
    AgentProfile {
        agent,
        max_dose_per_kg,
        concentrations: concentrations(strengths),
        max_absolute_dose_mg,
        notes: notes::agent_notes(agent).into(),
    }
}

fn build_reference_table_internal() -> ReferenceTable {
    // ========================================================================
    // Agents
    // ========================================================================

    let agents = vec![
        agent_profile(Agent::Lidocaine, 7.0, &[("2%", 20.0), ("3%", 30.0)], Some(500.0)),
        agent_profile(Agent::Mepivacaine, 6.6, &[("3%", 30.0), ("2%", 20.0)], Some(400.0)),
        agent_profile(Agent::Prilocaine, 8.0, &[("3%", 30.0), ("4%", 40.0)], Some(600.0)),
        agent_profile(Agent::Articaine, 7.0, &[("4%", 40.0)], None),
        agent_profile(Agent::Bupivacaine, 2.0, &[("0.5%", 5.0)], Some(90.0)),
    ];

    // ========================================================================
    // Vasoconstrictors (max cartridges for ASA I/II, ASA III/IV)
    // ========================================================================

    let vasoconstrictors = [
        ("1:50000 epinefrina", 5.5, 1.0),
        ("1:100000 epinefrina", 11.0, 2.0),
        ("1:200000 epinefrina", 22.0, 4.0),
        ("1:30000 noradrenalina", 5.5, 2.0),
        ("1:2500 fenilefrina", 5.5, 2.0),
        ("0.03UI/ml felipressina", f64::INFINITY, 5.0),
    ]
    .into_iter()
    .map(|(name, one_two, three_four)| VasoconstrictorProfile {
        name: name.into(),
        max_cartridges_by_asa: ceilings(one_two, three_four),
    })
    .collect();

    ReferenceTable {
        agents,
        vasoconstrictors,
        ingredient_notes: notes::ingredient_notes(),
    }
}

impl ReferenceTable {
    /// Profile for an agent identifier (canonical or alias)
    pub fn agent(&self, id: &str) -> Option<&AgentProfile> {
        let agent = Agent::from_id(id)?;
        self.agents.iter().find(|p| p.agent == agent)
    }

    /// Exact-name lookup of a vasoconstrictor formulation
    pub fn vasoconstrictor(&self, name: &str) -> Option<&VasoconstrictorProfile> {
        self.vasoconstrictors.iter().find(|v| v.name == name)
    }

    /// Concentration labels offered for an agent, in table order
    ///
    /// Unknown agents yield an empty list.
    pub fn concentrations_for(&self, id: &str) -> Vec<&str> {
        self.agent(id)
            .map(|p| p.concentration_labels())
            .unwrap_or_default()
    }

    pub fn vasoconstrictor_names(&self) -> Vec<&str> {
        self.vasoconstrictors.iter().map(|v| v.name.as_str()).collect()
    }

    /// Validate the table for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut seen_agents = HashSet::new();
        for profile in &self.agents {
            let id = profile.agent.id();
            if !seen_agents.insert(profile.agent) {
                errors.push(format!("Agent '{}' listed more than once", id));
            }
            if !(profile.max_dose_per_kg > 0.0) {
                errors.push(format!(
                    "Agent '{}': max dose per kg {} is not positive",
                    id, profile.max_dose_per_kg
                ));
            }
            if let Some(cap) = profile.max_absolute_dose_mg {
                if !(cap > 0.0) {
                    errors.push(format!(
                        "Agent '{}': absolute cap {} is not positive",
                        id, cap
                    ));
                }
            }
            if profile.concentrations.is_empty() {
                errors.push(format!("Agent '{}' has no concentrations", id));
            }
            if profile.notes.is_empty() {
                errors.push(format!("Agent '{}' has empty notes", id));
            }

            let mut labels = HashSet::new();
            for c in &profile.concentrations {
                if c.label.is_empty() {
                    errors.push(format!("Agent '{}' has an empty concentration label", id));
                }
                if !labels.insert(c.label.as_str()) {
                    errors.push(format!(
                        "Agent '{}': concentration '{}' listed more than once",
                        id, c.label
                    ));
                }
                if !(c.mg_per_ml > 0.0) {
                    errors.push(format!(
                        "Agent '{}': concentration '{}' has non-positive potency {}",
                        id, c.label, c.mg_per_ml
                    ));
                }
            }
        }

        for agent in Agent::ALL {
            if !seen_agents.contains(&agent) {
                errors.push(format!("Agent '{}' missing from table", agent));
            }
        }

        let mut seen_names = HashSet::new();
        for v in &self.vasoconstrictors {
            if v.name.is_empty() {
                errors.push("Vasoconstrictor has empty name".to_string());
            }
            if !seen_names.insert(v.name.as_str()) {
                errors.push(format!("Vasoconstrictor '{}' listed more than once", v.name));
            }
            for (class, ceiling) in &v.max_cartridges_by_asa {
                if ceiling.is_nan() || *ceiling < 0.0 {
                    errors.push(format!(
                        "Vasoconstrictor '{}': ceiling {} for {} is negative",
                        v.name, ceiling, class
                    ));
                }
            }
            if notes::match_ingredient_note(&self.ingredient_notes, &v.name).is_empty() {
                errors.push(format!(
                    "Vasoconstrictor '{}' matches no ingredient note",
                    v.name
                ));
            }
        }

        errors
    }
}

/// Agents in table order
pub fn agents() -> &'static [AgentProfile] {
    &get_reference_table().agents
}

/// Vasoconstrictor formulations in table order
pub fn vasoconstrictors() -> &'static [VasoconstrictorProfile] {
    &get_reference_table().vasoconstrictors
}

/// Concentration labels for an agent identifier, in table order
pub fn concentrations_for(agent: &str) -> Vec<&'static str> {
    get_reference_table().concentrations_for(agent)
}

/// ASA class labels accepted by the ceiling table
pub fn asa_classes() -> Vec<&'static str> {
    AsaClass::ALL.iter().map(|c| c.label()).collect()
}
