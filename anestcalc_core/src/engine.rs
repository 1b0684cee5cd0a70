//! Maximum dose calculator.
//!
//! Steps, in order:
//! 1. Clamp the patient weight to 80 kg
//! 2. Look up the agent and concentration together
//! 3. Dose = mg/kg limit x weight, capped by the agent's absolute limit
//! 4. Volume = dose / potency, cartridges = volume / 1.8 mL
//! 5. Apply the vasoconstrictor ceiling for the ASA class, if both are given
//! 6. Truncate the cartridge count and attach reference notes

use crate::notes::match_ingredient_note;
use crate::types::{AsaClass, CalculationResult, ReferenceTable};
use crate::{catalog, Error, Result};

/// Weights above this are dosed as if the patient weighed exactly this much
pub const WEIGHT_CEILING_KG: f64 = 80.0;

/// Volume of one standard dental cartridge
pub const CARTRIDGE_VOLUME_ML: f64 = 1.8;

/// Compute the maximum dose against the built-in reference table
///
/// The only error is [`Error::UnknownSelection`], returned when the agent is
/// not in the table or does not come in the requested concentration. An
/// unknown vasoconstrictor or ASA label is not an error; the ceiling is
/// simply skipped.
pub fn compute_max_dose(
    agent: &str,
    concentration: &str,
    weight_kg: f64,
    vasoconstrictor: Option<&str>,
    asa_class: Option<&str>,
) -> Result<CalculationResult> {
    compute_with_table(
        catalog::get_reference_table(),
        agent,
        concentration,
        weight_kg,
        vasoconstrictor,
        asa_class,
    )
}

/// Same as [`compute_max_dose`], against an explicit table
pub fn compute_with_table(
    table: &ReferenceTable,
    agent: &str,
    concentration: &str,
    weight_kg: f64,
    vasoconstrictor: Option<&str>,
    asa_class: Option<&str>,
) -> Result<CalculationResult> {
    let weight = clamp_weight(weight_kg);
    if weight != weight_kg {
        tracing::debug!(
            "Weight {} kg above ceiling, dosing for {} kg",
            weight_kg,
            weight
        );
    }

    let (profile, potency) = table
        .agent(agent)
        .and_then(|p| p.potency(concentration).map(|potency| (p, potency)))
        .ok_or_else(|| Error::UnknownSelection {
            agent: agent.to_string(),
            concentration: concentration.to_string(),
        })?;

    let absolute_cap = profile.max_absolute_dose_mg.unwrap_or(f64::INFINITY);
    let max_dose_mg = (profile.max_dose_per_kg * weight).min(absolute_cap);
    let max_volume_ml = max_dose_mg / potency;
    let mut cartridges = max_volume_ml / CARTRIDGE_VOLUME_ML;

    if let Some(ceiling) = vasoconstrictor_ceiling(table, vasoconstrictor, asa_class) {
        if ceiling < cartridges {
            tracing::debug!(
                "Vasoconstrictor ceiling {} cartridges below agent limit {:.2}",
                ceiling,
                cartridges
            );
        }
        cartridges = cartridges.min(ceiling);
    }

    let vasoconstrictor_notes = vasoconstrictor
        .map(|v| match_ingredient_note(&table.ingredient_notes, v))
        .unwrap_or("");

    let result = CalculationResult {
        max_dose_mg,
        max_cartridges: truncate_cartridges(cartridges),
        agent_notes: profile.notes.clone(),
        vasoconstrictor_notes: vasoconstrictor_notes.to_string(),
        effective_weight_kg: weight,
        max_volume_ml,
    };

    tracing::debug!(
        "{} {} at {} kg: {:.2} mg, {} cartridges",
        profile.agent,
        concentration,
        weight,
        result.max_dose_mg,
        result.max_cartridges
    );

    Ok(result)
}

/// Apply the weight ceiling; lower values pass through untouched
fn clamp_weight(weight_kg: f64) -> f64 {
    if weight_kg > WEIGHT_CEILING_KG {
        WEIGHT_CEILING_KG
    } else {
        weight_kg
    }
}

/// Ceiling from the vasoconstrictor table, when one applies
///
/// Requires a known formulation and an ASA class. A class label with no
/// entry in the formulation's table is unbounded.
fn vasoconstrictor_ceiling(
    table: &ReferenceTable,
    vasoconstrictor: Option<&str>,
    asa_class: Option<&str>,
) -> Option<f64> {
    let profile = table.vasoconstrictor(vasoconstrictor?)?;
    let label = asa_class?;

    Some(
        AsaClass::from_label(label)
            .map(|class| profile.ceiling(class))
            .unwrap_or(f64::INFINITY),
    )
}

/// Truncate toward zero; negative and NaN counts become 0
fn truncate_cartridges(cartridges: f64) -> u32 {
    cartridges.trunc() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Agent;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_lidocaine_without_vasoconstrictor() {
        let result = compute_max_dose("lidocaine", "2%", 70.0, None, None).unwrap();
        assert!(approx(result.max_dose_mg, 490.0));
        assert!(approx(result.max_volume_ml, 24.5));
        assert_eq!(result.max_cartridges, 13);
        assert_eq!(result.vasoconstrictor_notes, "");
    }

    #[test]
    fn test_articaine_weight_clamped_and_uncapped() {
        let result = compute_max_dose("articaine", "4%", 90.0, None, None).unwrap();
        assert!(approx(result.effective_weight_kg, 80.0));
        assert!(approx(result.max_dose_mg, 560.0));
        assert!(approx(result.max_volume_ml, 14.0));
        assert_eq!(result.max_cartridges, 7);
    }

    #[test]
    fn test_bupivacaine_limited_by_epinephrine_ceiling() {
        crate::logging::init_test();
        let result = compute_max_dose(
            "bupivacaine",
            "0.5%",
            80.0,
            Some("1:200000 epinefrina"),
            Some("ASA III/IV"),
        )
        .unwrap();
        assert!(approx(result.max_dose_mg, 90.0));
        assert!(approx(result.max_volume_ml, 18.0));
        assert_eq!(result.max_cartridges, 4);
        assert!(result.vasoconstrictor_notes.starts_with("Epinephrine"));
    }

    #[test]
    fn test_invalid_concentration_is_unknown_selection() {
        let err = compute_max_dose("lidocaine", "5%", 70.0, None, None).unwrap_err();
        assert!(err.is_unknown_selection());
        assert_eq!(err.to_string(), "unknown agent or concentration");
    }

    #[test]
    fn test_unknown_agent_is_unknown_selection() {
        let err = compute_max_dose("procaine", "2%", 70.0, None, None).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownSelection { ref agent, .. } if agent == "procaine"
        ));
    }

    #[test]
    fn test_felypressin_healthy_patient_has_no_ceiling() {
        let plain = compute_max_dose("prilocaine", "3%", 80.0, None, None).unwrap();
        let with_felypressin = compute_max_dose(
            "prilocaine",
            "3%",
            80.0,
            Some("0.03UI/ml felipressina"),
            Some("ASA I/II"),
        )
        .unwrap();
        assert_eq!(plain.max_cartridges, with_felypressin.max_cartridges);
        assert!(with_felypressin.vasoconstrictor_notes.starts_with("Felypressin"));
    }

    #[test]
    fn test_asa_ignored_without_vasoconstrictor() {
        let plain = compute_max_dose("lidocaine", "2%", 70.0, None, None).unwrap();
        let asa_only = compute_max_dose("lidocaine", "2%", 70.0, None, Some("ASA III/IV")).unwrap();
        assert_eq!(plain, asa_only);
    }

    #[test]
    fn test_vasoconstrictor_without_asa_only_adds_notes() {
        let plain = compute_max_dose("lidocaine", "2%", 70.0, None, None).unwrap();
        let epi = compute_max_dose("lidocaine", "2%", 70.0, Some("1:100000 epinefrina"), None)
            .unwrap();
        assert_eq!(plain.max_cartridges, epi.max_cartridges);
        assert!(!epi.vasoconstrictor_notes.is_empty());
    }

    #[test]
    fn test_unknown_vasoconstrictor_is_skipped() {
        let plain = compute_max_dose("lidocaine", "2%", 70.0, None, None).unwrap();
        let unknown = compute_max_dose(
            "lidocaine",
            "2%",
            70.0,
            Some("1:20000 levonordefrin"),
            Some("ASA III/IV"),
        )
        .unwrap();
        assert_eq!(plain.max_cartridges, unknown.max_cartridges);
        assert_eq!(unknown.vasoconstrictor_notes, "");
    }

    #[test]
    fn test_unlisted_vasoconstrictor_still_matches_ingredient_note() {
        // Not a table entry, so no ceiling, but the ingredient note applies
        let result = compute_max_dose(
            "lidocaine",
            "2%",
            70.0,
            Some("1:80000 epinefrina"),
            Some("ASA III/IV"),
        )
        .unwrap();
        assert_eq!(result.max_cartridges, 13);
        assert!(result.vasoconstrictor_notes.starts_with("Epinephrine"));
    }

    #[test]
    fn test_unknown_asa_label_is_unbounded() {
        let result = compute_max_dose(
            "lidocaine",
            "2%",
            70.0,
            Some("1:50000 epinefrina"),
            Some("ASA V"),
        )
        .unwrap();
        assert_eq!(result.max_cartridges, 13);
    }

    #[test]
    fn test_high_risk_epinephrine_ceiling() {
        let result = compute_max_dose(
            "lidocaine",
            "2%",
            70.0,
            Some("1:50000 epinefrina"),
            Some("ASA III/IV"),
        )
        .unwrap();
        assert_eq!(result.max_cartridges, 1);
        // Dose in mg is not reduced by the cartridge ceiling
        assert!(approx(result.max_dose_mg, 490.0));
    }

    #[test]
    fn test_absolute_caps() {
        let lidocaine = compute_max_dose("lidocaine", "3%", 80.0, None, None).unwrap();
        assert!(approx(lidocaine.max_dose_mg, 500.0));
        assert_eq!(lidocaine.max_cartridges, 9);

        let mepivacaine = compute_max_dose("mepivacaine", "3%", 70.0, None, None).unwrap();
        assert!(approx(mepivacaine.max_dose_mg, 400.0));
        assert_eq!(mepivacaine.max_cartridges, 7);

        let prilocaine = compute_max_dose("prilocaine", "4%", 80.0, None, None).unwrap();
        assert!(approx(prilocaine.max_dose_mg, 600.0));
        assert_eq!(prilocaine.max_cartridges, 8);
    }

    #[test]
    fn test_portuguese_alias_matches_canonical() {
        let canonical = compute_max_dose("lidocaine", "2%", 70.0, None, None).unwrap();
        let alias = compute_max_dose("lidocaina", "2%", 70.0, None, None).unwrap();
        assert_eq!(canonical, alias);
    }

    #[test]
    fn test_low_weight_not_rejected() {
        let result = compute_max_dose("lidocaine", "2%", 0.5, None, None).unwrap();
        assert!(approx(result.max_dose_mg, 3.5));
        assert_eq!(result.max_cartridges, 0);
    }

    #[test]
    fn test_agent_notes_attached() {
        let result = compute_max_dose("prilocaine", "4%", 60.0, None, None).unwrap();
        assert!(result.agent_notes.contains("methemoglobinemia"));
    }

    // ------------------------------------------------------------------------
    // Properties over every agent/concentration pair
    // ------------------------------------------------------------------------

    fn all_pairs() -> Vec<(&'static str, &'static str)> {
        catalog::agents()
            .iter()
            .flat_map(|p| {
                p.concentration_labels()
                    .into_iter()
                    .map(move |c| (p.agent.id(), c))
            })
            .collect()
    }

    #[test]
    fn test_results_non_negative() {
        for (agent, concentration) in all_pairs() {
            for weight in [1.0, 25.0, 80.0, 200.0] {
                let result = compute_max_dose(agent, concentration, weight, None, None).unwrap();
                assert!(result.max_dose_mg >= 0.0, "{} {}", agent, concentration);
                assert!(result.max_volume_ml >= 0.0);
            }
        }
    }

    #[test]
    fn test_weight_ceiling() {
        for (agent, concentration) in all_pairs() {
            let at_ceiling = compute_max_dose(
                agent,
                concentration,
                80.0,
                Some("1:100000 epinefrina"),
                Some("ASA I/II"),
            )
            .unwrap();
            let heavy = compute_max_dose(
                agent,
                concentration,
                1000.0,
                Some("1:100000 epinefrina"),
                Some("ASA I/II"),
            )
            .unwrap();
            assert_eq!(at_ceiling, heavy, "{} {}", agent, concentration);
        }
    }

    #[test]
    fn test_idempotent() {
        for (agent, concentration) in all_pairs() {
            let first =
                compute_max_dose(agent, concentration, 63.5, Some("1:2500 fenilefrina"), Some("ASA III/IV"))
                    .unwrap();
            let second =
                compute_max_dose(agent, concentration, 63.5, Some("1:2500 fenilefrina"), Some("ASA III/IV"))
                    .unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_ceiling_never_raises_count() {
        for (agent, concentration) in all_pairs() {
            for v in catalog::vasoconstrictors() {
                let without_asa =
                    compute_max_dose(agent, concentration, 72.0, Some(v.name.as_str()), None).unwrap();
                for asa in catalog::asa_classes() {
                    let with_asa =
                        compute_max_dose(agent, concentration, 72.0, Some(v.name.as_str()), Some(asa))
                            .unwrap();
                    assert!(without_asa.max_cartridges >= with_asa.max_cartridges);
                }
            }
        }
    }

    #[test]
    fn test_articaine_scales_linearly_to_ceiling() {
        let per_kg = catalog::get_reference_table()
            .agents
            .iter()
            .find(|p| p.agent == Agent::Articaine)
            .unwrap()
            .max_dose_per_kg;

        for weight in [10.0, 40.0, 79.0, 80.0] {
            let result = compute_max_dose("articaine", "4%", weight, None, None).unwrap();
            assert!(approx(result.max_dose_mg, per_kg * weight));
        }
        let heavy = compute_max_dose("articaine", "4%", 500.0, None, None).unwrap();
        assert!(approx(heavy.max_dose_mg, per_kg * WEIGHT_CEILING_KG));
    }

    #[test]
    fn test_every_invalid_pairing_is_rejected() {
        for agent in Agent::ALL {
            for label in ["1%", "5%", "", "2"] {
                let result = compute_max_dose(agent.id(), label, 70.0, None, None);
                assert!(result.unwrap_err().is_unknown_selection());
            }
        }
        assert!(compute_max_dose("articaine", "2%", 70.0, None, None).is_err());
        assert!(compute_max_dose("bupivacaine", "4%", 70.0, None, None).is_err());
    }
}
