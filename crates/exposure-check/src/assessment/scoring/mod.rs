mod policy;
mod rules;

pub use policy::{tier_for_score, TIER2_THRESHOLD, TIER3_THRESHOLD};
pub use rules::{
    capped_infrastructure_risk, governance_modifier, infrastructure_risk, sensitivity_weight,
    size_weight, INFRASTRUCTURE_CAP,
};

use super::domain::{
    AnswerField, AnswerRecord, EntitySize, GovernanceMaturity, InfrastructureFlags,
    ServiceSensitivity, Tier,
};
use serde::{Deserialize, Serialize};

/// Answer record with every single-valued field known to be set.
///
/// The calculator only accepts this type, so scoring is total by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedAnswers {
    pub entity_size: EntitySize,
    pub service_sensitivity: ServiceSensitivity,
    pub digital_infrastructure: InfrastructureFlags,
    pub governance_maturity: GovernanceMaturity,
}

impl CompletedAnswers {
    pub fn from_record(record: &AnswerRecord) -> Result<Self, IncompleteAnswers> {
        match (
            record.entity_size,
            record.service_sensitivity,
            record.governance_maturity,
        ) {
            (Some(entity_size), Some(service_sensitivity), Some(governance_maturity)) => {
                Ok(Self {
                    entity_size,
                    service_sensitivity,
                    digital_infrastructure: record.digital_infrastructure,
                    governance_maturity,
                })
            }
            _ => Err(IncompleteAnswers {
                missing: record.missing_fields(),
            }),
        }
    }
}

impl From<CompletedAnswers> for AnswerRecord {
    fn from(answers: CompletedAnswers) -> Self {
        Self {
            entity_size: Some(answers.entity_size),
            service_sensitivity: Some(answers.service_sensitivity),
            digital_infrastructure: answers.digital_infrastructure,
            governance_maturity: Some(answers.governance_maturity),
        }
    }
}

/// Raised when a score is requested before all answers are in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("assessment is missing answers for: {}", format_missing(.missing))]
pub struct IncompleteAnswers {
    pub missing: Vec<AnswerField>,
}

fn format_missing(missing: &[AnswerField]) -> String {
    missing
        .iter()
        .map(|field| field.wire_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Questionnaire dimension contributing to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    EntitySize,
    ServiceSensitivity,
    DigitalInfrastructure,
    GovernanceMaturity,
}

/// Discrete contribution to a score, kept so results can be explained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: i16,
    pub notes: String,
}

/// Full scoring trail for a completed answer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub total_score: i16,
    pub tier: Tier,
}

pub fn score(answers: &CompletedAnswers) -> i16 {
    rules::score_components(answers).1
}

pub fn calculate_tier(answers: &CompletedAnswers) -> Tier {
    tier_for_score(score(answers))
}

pub fn breakdown(answers: &CompletedAnswers) -> ScoreBreakdown {
    let (components, total_score) = rules::score_components(answers);
    ScoreBreakdown {
        components,
        total_score,
        tier: tier_for_score(total_score),
    }
}

/// Scores a raw record, refusing to guess values for unanswered questions.
pub fn evaluate(record: &AnswerRecord) -> Result<ScoreBreakdown, IncompleteAnswers> {
    CompletedAnswers::from_record(record).map(|answers| breakdown(&answers))
}
