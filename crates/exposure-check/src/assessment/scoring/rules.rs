use super::super::domain::{EntitySize, GovernanceMaturity, InfrastructureFlags, ServiceSensitivity};
use super::{CompletedAnswers, ScoreComponent, ScoreFactor};

/// Maximum contribution of the infrastructure answers, however many risks fire.
pub const INFRASTRUCTURE_CAP: i16 = 3;

pub const fn size_weight(size: EntitySize) -> i16 {
    match size {
        EntitySize::Large => 3,
        EntitySize::Medium => 2,
        EntitySize::Small => 1,
    }
}

pub const fn sensitivity_weight(sensitivity: ServiceSensitivity) -> i16 {
    match sensitivity {
        ServiceSensitivity::High => 3,
        ServiceSensitivity::Medium => 2,
        ServiceSensitivity::Low => 1,
    }
}

/// Uncapped sum of the infrastructure risk conditions.
pub const fn infrastructure_risk(flags: InfrastructureFlags) -> i16 {
    let mut risk = 0;
    if flags.cloud {
        risk += 1;
    }
    if !flags.mfa {
        risk += 2;
    }
    if !flags.incident_process {
        risk += 2;
    }
    if flags.supply_chain {
        risk += 1;
    }
    risk
}

pub fn capped_infrastructure_risk(flags: InfrastructureFlags) -> i16 {
    infrastructure_risk(flags).min(INFRASTRUCTURE_CAP)
}

/// Signed adjustment for governance maturity; mature programs lower the score.
pub const fn governance_modifier(governance: GovernanceMaturity) -> i16 {
    match governance {
        GovernanceMaturity::None => 2,
        GovernanceMaturity::Basic => 1,
        GovernanceMaturity::Structured => -1,
        GovernanceMaturity::Iso => -2,
    }
}

pub(crate) fn score_components(answers: &CompletedAnswers) -> (Vec<ScoreComponent>, i16) {
    let size = size_weight(answers.entity_size);
    let sensitivity = sensitivity_weight(answers.service_sensitivity);
    let raw_infrastructure = infrastructure_risk(answers.digital_infrastructure);
    let infrastructure = capped_infrastructure_risk(answers.digital_infrastructure);
    let governance = governance_modifier(answers.governance_maturity);

    let infrastructure_notes = if raw_infrastructure > INFRASTRUCTURE_CAP {
        format!("{raw_infrastructure} risk points capped at {INFRASTRUCTURE_CAP}")
    } else {
        format!("{raw_infrastructure} risk points")
    };

    let components = vec![
        ScoreComponent {
            factor: ScoreFactor::EntitySize,
            points: size,
            notes: format!("entity size {}", answers.entity_size.wire_name()),
        },
        ScoreComponent {
            factor: ScoreFactor::ServiceSensitivity,
            points: sensitivity,
            notes: format!(
                "service sensitivity {}",
                answers.service_sensitivity.wire_name()
            ),
        },
        ScoreComponent {
            factor: ScoreFactor::DigitalInfrastructure,
            points: infrastructure,
            notes: infrastructure_notes,
        },
        ScoreComponent {
            factor: ScoreFactor::GovernanceMaturity,
            points: governance,
            notes: format!(
                "governance {}",
                answers.governance_maturity.wire_name()
            ),
        },
    ];

    let total = components.iter().map(|component| component.points).sum();
    (components, total)
}
