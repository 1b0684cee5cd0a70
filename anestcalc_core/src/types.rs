//! Core domain types for the anesthetic dose calculator.
//!
//! This module defines:
//! - Anesthetic agents and ASA physical-status classes
//! - Reference profiles for agents and vasoconstrictor formulations
//! - Per-call calculation input and result

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Agents
// ============================================================================

/// Local anesthetic salt covered by the reference table
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Agent {
    Lidocaine,
    Mepivacaine,
    Prilocaine,
    Articaine,
    Bupivacaine,
}

impl Agent {
    /// Every agent, in the order the reference table lists them
    pub const ALL: [Agent; 5] = [
        Agent::Lidocaine,
        Agent::Mepivacaine,
        Agent::Prilocaine,
        Agent::Articaine,
        Agent::Bupivacaine,
    ];

    /// Canonical identifier
    pub fn id(&self) -> &'static str {
        match self {
            Agent::Lidocaine => "lidocaine",
            Agent::Mepivacaine => "mepivacaine",
            Agent::Prilocaine => "prilocaine",
            Agent::Articaine => "articaine",
            Agent::Bupivacaine => "bupivacaine",
        }
    }

    /// Portuguese label used on Brazilian cartridge packaging
    pub fn alias(&self) -> &'static str {
        match self {
            Agent::Lidocaine => "lidocaina",
            Agent::Mepivacaine => "mepivacaina",
            Agent::Prilocaine => "prilocaina",
            Agent::Articaine => "articaina",
            Agent::Bupivacaine => "bupivacaina",
        }
    }

    /// Resolve an identifier (canonical or alias). Matching is exact.
    pub fn from_id(id: &str) -> Option<Agent> {
        Agent::ALL
            .into_iter()
            .find(|agent| agent.id() == id || agent.alias() == id)
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// ASA classification
// ============================================================================

/// ASA physical-status bucket used to pick a vasoconstrictor ceiling
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AsaClass {
    #[serde(rename = "ASA I/II")]
    OneTwo,
    #[serde(rename = "ASA III/IV")]
    ThreeFour,
}

impl AsaClass {
    pub const ALL: [AsaClass; 2] = [AsaClass::OneTwo, AsaClass::ThreeFour];

    pub fn label(&self) -> &'static str {
        match self {
            AsaClass::OneTwo => "ASA I/II",
            AsaClass::ThreeFour => "ASA III/IV",
        }
    }

    /// Exact label lookup; anything else has no ceiling entry
    pub fn from_label(label: &str) -> Option<AsaClass> {
        AsaClass::ALL.into_iter().find(|class| class.label() == label)
    }
}

impl fmt::Display for AsaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Reference profiles
// ============================================================================

/// One strength an agent is sold in
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Concentration {
    pub label: String,
    pub mg_per_ml: f64,
}

/// Pharmacological limits for one anesthetic salt
#[derive(Clone, Debug, Serialize)]
pub struct AgentProfile {
    pub agent: Agent,
    pub max_dose_per_kg: f64,
    /// Offered strengths, in display order
    pub concentrations: Vec<Concentration>,
    /// `None` means no absolute ceiling
    pub max_absolute_dose_mg: Option<f64>,
    pub notes: String,
}

impl AgentProfile {
    /// Potency in mg/mL for a concentration label, if this agent offers it
    pub fn potency(&self, label: &str) -> Option<f64> {
        self.concentrations
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.mg_per_ml)
    }

    pub fn concentration_labels(&self) -> Vec<&str> {
        self.concentrations.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Cartridge ceilings for one vasoconstrictor formulation
#[derive(Clone, Debug, Serialize)]
pub struct VasoconstrictorProfile {
    pub name: String,
    /// Infinite entries serialize as `null`
    pub max_cartridges_by_asa: BTreeMap<AsaClass, f64>,
}

impl VasoconstrictorProfile {
    /// Ceiling for an ASA class; missing entries are unbounded
    pub fn ceiling(&self, class: AsaClass) -> f64 {
        self.max_cartridges_by_asa
            .get(&class)
            .copied()
            .unwrap_or(f64::INFINITY)
    }
}

/// Descriptive text for an active ingredient, matched by substring
#[derive(Clone, Debug, Serialize)]
pub struct IngredientNote {
    pub ingredient: String,
    pub notes: String,
}

/// The complete, immutable reference table
#[derive(Clone, Debug, Serialize)]
pub struct ReferenceTable {
    pub agents: Vec<AgentProfile>,
    pub vasoconstrictors: Vec<VasoconstrictorProfile>,
    /// Scanned in order; first match wins
    pub ingredient_notes: Vec<IngredientNote>,
}

// ============================================================================
// Calculation input and result
// ============================================================================

/// The five caller-supplied values of one calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalculationInput {
    pub agent: String,
    pub concentration: String,
    pub weight_kg: f64,
    pub vasoconstrictor: Option<String>,
    /// Only consulted when a vasoconstrictor is present
    pub asa_class: Option<String>,
}

impl CalculationInput {
    pub fn new(agent: impl Into<String>, concentration: impl Into<String>, weight_kg: f64) -> Self {
        Self {
            agent: agent.into(),
            concentration: concentration.into(),
            weight_kg,
            vasoconstrictor: None,
            asa_class: None,
        }
    }

    pub fn with_vasoconstrictor(mut self, vasoconstrictor: impl Into<String>) -> Self {
        self.vasoconstrictor = Some(vasoconstrictor.into());
        self
    }

    pub fn with_asa_class(mut self, asa_class: impl Into<String>) -> Self {
        self.asa_class = Some(asa_class.into());
        self
    }

    /// Run the dose calculator on this input
    pub fn compute(&self) -> crate::Result<CalculationResult> {
        crate::engine::compute_max_dose(
            &self.agent,
            &self.concentration,
            self.weight_kg,
            self.vasoconstrictor.as_deref(),
            self.asa_class.as_deref(),
        )
    }
}

/// Outcome of a successful calculation
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CalculationResult {
    /// Not rounded; callers display two decimals
    pub max_dose_mg: f64,
    /// Truncated toward zero
    pub max_cartridges: u32,
    pub agent_notes: String,
    /// Empty when no ingredient note matched
    pub vasoconstrictor_notes: String,
    /// Weight after the 80 kg ceiling was applied
    pub effective_weight_kg: f64,
    pub max_volume_ml: f64,
}
