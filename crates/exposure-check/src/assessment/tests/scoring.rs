use super::common::*;
use crate::assessment::domain::{
    AnswerField, AnswerRecord, EntitySize, GovernanceMaturity, ServiceSensitivity, Tier,
};
use crate::assessment::scoring::{
    breakdown, calculate_tier, capped_infrastructure_risk, evaluate, infrastructure_risk, score,
    tier_for_score, CompletedAnswers, ScoreFactor, INFRASTRUCTURE_CAP,
};

fn every_flag_combination() -> impl Iterator<Item = crate::assessment::InfrastructureFlags> {
    (0u8..16).map(|bits| {
        flags(
            bits & 0b0001 != 0,
            bits & 0b0010 != 0,
            bits & 0b0100 != 0,
            bits & 0b1000 != 0,
        )
    })
}

fn every_answer_set() -> Vec<CompletedAnswers> {
    let mut all = Vec::new();
    for entity_size in EntitySize::ordered() {
        for service_sensitivity in ServiceSensitivity::ordered() {
            for digital_infrastructure in every_flag_combination() {
                for governance_maturity in GovernanceMaturity::ordered() {
                    all.push(CompletedAnswers {
                        entity_size,
                        service_sensitivity,
                        digital_infrastructure,
                        governance_maturity,
                    });
                }
            }
        }
    }
    all
}

#[test]
fn calculator_is_total_and_deterministic_over_every_answer_set() {
    let all = every_answer_set();
    assert_eq!(all.len(), 3 * 3 * 16 * 4);

    for answers in &all {
        let first = calculate_tier(answers);
        assert_eq!(first, calculate_tier(answers));
        assert_eq!(first, tier_for_score(score(answers)));

        let total = score(answers);
        assert!((0..=11).contains(&total), "score {total} out of range");
    }
}

#[test]
fn breakdown_components_sum_to_total() {
    for answers in every_answer_set() {
        let scored = breakdown(&answers);
        let sum: i16 = scored.components.iter().map(|component| component.points).sum();
        assert_eq!(sum, scored.total_score);
        assert_eq!(scored.tier, calculate_tier(&answers));
        assert_eq!(scored.components.len(), 4);
    }
}

#[test]
fn increasing_size_or_sensitivity_never_lowers_the_score() {
    for answers in every_answer_set() {
        let sizes = EntitySize::ordered().map(|entity_size| {
            score(&CompletedAnswers {
                entity_size,
                ..answers
            })
        });
        assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]));

        let sensitivities = ServiceSensitivity::ordered().map(|service_sensitivity| {
            score(&CompletedAnswers {
                service_sensitivity,
                ..answers
            })
        });
        assert!(sensitivities.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}

#[test]
fn infrastructure_contribution_is_capped_at_three() {
    let risky = flags(true, false, false, false);
    assert_eq!(infrastructure_risk(risky), 5);
    assert_eq!(capped_infrastructure_risk(risky), 3);

    for combination in every_flag_combination() {
        let raw = infrastructure_risk(combination);
        let capped = capped_infrastructure_risk(combination);
        if raw > INFRASTRUCTURE_CAP {
            assert_eq!(capped, INFRASTRUCTURE_CAP);
        } else {
            assert_eq!(capped, raw);
        }
    }

    let scored = breakdown(&scenario_b());
    let infrastructure = scored
        .components
        .iter()
        .find(|component| component.factor == ScoreFactor::DigitalInfrastructure)
        .expect("infrastructure component present");
    assert_eq!(infrastructure.points, 3);
    assert!(infrastructure.notes.contains("capped"));
}

#[test]
fn thresholds_are_inclusive_lower_bounds() {
    let six = CompletedAnswers {
        entity_size: EntitySize::Large,
        service_sensitivity: ServiceSensitivity::Low,
        digital_infrastructure: flags(false, true, true, false),
        governance_maturity: GovernanceMaturity::None,
    };
    assert_eq!(score(&six), 6);
    assert_eq!(calculate_tier(&six), Tier::Tier3);

    let five = CompletedAnswers {
        governance_maturity: GovernanceMaturity::Basic,
        ..six
    };
    assert_eq!(score(&five), 5);
    assert_eq!(calculate_tier(&five), Tier::Tier2);

    let four = scenario_a();
    assert_eq!(score(&four), 4);
    assert_eq!(calculate_tier(&four), Tier::Tier2);

    let three = CompletedAnswers {
        entity_size: EntitySize::Small,
        service_sensitivity: ServiceSensitivity::Low,
        digital_infrastructure: flags(true, false, false, true),
        governance_maturity: GovernanceMaturity::Iso,
    };
    assert_eq!(score(&three), 3);
    assert_eq!(calculate_tier(&three), Tier::Tier1);
}

#[test]
fn documented_scenarios_land_in_expected_tiers() {
    let a = breakdown(&scenario_a());
    assert_eq!(a.total_score, 4);
    assert_eq!(a.tier, Tier::Tier2);

    let b = breakdown(&scenario_b());
    assert_eq!(b.total_score, 7);
    assert_eq!(b.tier, Tier::Tier3);
}

#[test]
fn evaluate_refuses_incomplete_records() {
    let record = AnswerRecord {
        entity_size: Some(EntitySize::Medium),
        ..AnswerRecord::default()
    };

    let err = evaluate(&record).expect_err("incomplete record rejected");
    assert_eq!(
        err.missing,
        vec![AnswerField::ServiceSensitivity, AnswerField::GovernanceMaturity]
    );
    assert!(err.to_string().contains("service_sensitivity, governance_maturity"));

    let complete: AnswerRecord = scenario_b().into();
    let scored = evaluate(&complete).expect("complete record scores");
    assert_eq!(scored.tier, Tier::Tier3);
}
