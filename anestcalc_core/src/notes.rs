//! Reference notes shown alongside a calculated dose.
//!
//! Agent notes are keyed by agent. Vasoconstrictor notes are keyed by the
//! active ingredient rather than the full formulation label, so the three
//! epinephrine dilutions share a single note.

use crate::types::{Agent, IngredientNote};

/// Bibliographic source of the dosing limits
pub const REFERENCE_CITATION: &str = "Malamed, Stanley F. Manual de anestesia local \
     [tradução Fernando Mundim et al.]. Rio de Janeiro: Elsevier, 2013.";

pub(crate) fn agent_notes(agent: Agent) -> &'static str {
    match agent {
        Agent::Lidocaine => {
            "Amide. Metabolized in the liver by microsomal oxidases (CYP1A2, CYP3A4); \
             metabolites and under 10% unchanged drug excreted by the kidneys. \
             Use with caution in significant hepatic disease and congestive heart failure."
        }
        Agent::Mepivacaine => {
            "Amide. Hepatic metabolism, renal excretion; mild vasodilating effect, \
             so the 3% plain solution is suited to patients in whom a vasoconstrictor \
             is contraindicated. Use with caution in significant hepatic disease."
        }
        Agent::Prilocaine => {
            "Amide. Metabolized mainly in the liver, also in the lungs and kidneys; \
             renal excretion. The metabolite o-toluidine can induce methemoglobinemia: \
             avoid in congenital or idiopathic methemoglobinemia, sickle cell anemia, \
             hypoxia and with acetaminophen or phenacetin."
        }
        Agent::Articaine => {
            "Amide with a thiophene ring and an ester side chain. Largely hydrolyzed \
             by plasma esterases (short half-life), remainder in the liver; renal \
             excretion. Higher reported paresthesia risk in inferior alveolar nerve \
             blocks; caution in atypical plasma cholinesterase."
        }
        Agent::Bupivacaine => {
            "Amide, long-acting. Hepatic metabolism, renal excretion. Greater \
             cardiotoxicity than other amides. Not recommended for children or \
             patients at risk of self-inflicted soft-tissue injury after treatment."
        }
    }
}

/// Ingredient keys in scan order, with their notes
pub(crate) fn ingredient_notes() -> Vec<IngredientNote> {
    let entries = [
        (
            "epinefrina",
            "Epinephrine: alpha and beta adrenergic agonist, inactivated by COMT and MAO. \
             Use with caution in cardiovascular disease, uncontrolled hyperthyroidism, \
             and with tricyclic antidepressants or non-selective beta-blockers.",
        ),
        (
            "noradrenalina",
            "Norepinephrine: predominantly alpha agonist. Marked rise in blood pressure \
             and risk of tissue ischemia or necrosis; avoid in hypertensive and \
             cardiovascular patients.",
        ),
        (
            "fenilefrina",
            "Phenylephrine: synthetic alpha agonist, weaker but longer-lasting than \
             epinephrine. May raise blood pressure with reflex bradycardia; caution \
             in cardiovascular disease.",
        ),
        (
            "felipressina",
            "Felypressin: synthetic vasopressin analogue acting on venous \
             microcirculation, no direct myocardial effect. Suitable when catecholamines \
             are contraindicated; avoid in pregnancy (oxytocic action).",
        ),
    ];

    entries
        .into_iter()
        .map(|(ingredient, notes)| IngredientNote {
            ingredient: ingredient.into(),
            notes: notes.into(),
        })
        .collect()
}

/// First ingredient note whose key appears in `vasoconstrictor`, ignoring case
///
/// Returns an empty string when nothing matches.
pub fn match_ingredient_note<'a>(notes: &'a [IngredientNote], vasoconstrictor: &str) -> &'a str {
    let haystack = vasoconstrictor.to_lowercase();
    notes
        .iter()
        .find(|note| haystack.contains(&note.ingredient.to_lowercase()))
        .map(|note| note.notes.as_str())
        .unwrap_or("")
}
