use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Screens of the questionnaire, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    EntitySize,
    ServiceSensitivity,
    DigitalInfrastructure,
    GovernanceMaturity,
    Results,
}

impl Step {
    /// Number of screens that collect input before the results screen.
    pub const INPUT_STEPS: u8 = 4;

    pub const fn ordered() -> [Self; 5] {
        [
            Self::EntitySize,
            Self::ServiceSensitivity,
            Self::DigitalInfrastructure,
            Self::GovernanceMaturity,
            Self::Results,
        ]
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::EntitySize => 1,
            Self::ServiceSensitivity => 2,
            Self::DigitalInfrastructure => 3,
            Self::GovernanceMaturity => 4,
            Self::Results => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::EntitySize => "Entity Size",
            Self::ServiceSensitivity => "Service Sensitivity",
            Self::DigitalInfrastructure => "Digital Infrastructure",
            Self::GovernanceMaturity => "Governance Maturity",
            Self::Results => "Results",
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::EntitySize => None,
            Self::ServiceSensitivity => Some(Self::EntitySize),
            Self::DigitalInfrastructure => Some(Self::ServiceSensitivity),
            Self::GovernanceMaturity => Some(Self::DigitalInfrastructure),
            Self::Results => Some(Self::GovernanceMaturity),
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::EntitySize => Some(Self::ServiceSensitivity),
            Self::ServiceSensitivity => Some(Self::DigitalInfrastructure),
            Self::DigitalInfrastructure => Some(Self::GovernanceMaturity),
            Self::GovernanceMaturity => Some(Self::Results),
            Self::Results => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Results)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.label())
    }
}

/// Headcount/turnover band reported on the first screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySize {
    Small,
    Medium,
    Large,
}

impl EntitySize {
    pub const fn ordered() -> [Self; 3] {
        [Self::Small, Self::Medium, Self::Large]
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "Small (fewer than 50 staff)",
            Self::Medium => "Medium (50 to 249 staff)",
            Self::Large => "Large (250 staff or more)",
        }
    }
}

/// How critical the services the organization delivers are to its users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceSensitivity {
    Low,
    Medium,
    High,
}

impl ServiceSensitivity {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low (internal or non-critical services)",
            Self::Medium => "Medium (customer-facing services)",
            Self::High => "High (essential or regulated services)",
        }
    }
}

/// Maturity of the security governance framework in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceMaturity {
    None,
    Basic,
    Structured,
    Iso,
}

impl GovernanceMaturity {
    pub const fn ordered() -> [Self; 4] {
        [Self::None, Self::Basic, Self::Structured, Self::Iso]
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Structured => "structured",
            Self::Iso => "iso",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "No formal governance",
            Self::Basic => "Basic policies",
            Self::Structured => "Structured security program",
            Self::Iso => "ISO 27001 certified or equivalent",
        }
    }
}

/// The four independent infrastructure answers collected on step 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureFlags {
    pub cloud: bool,
    pub mfa: bool,
    pub incident_process: bool,
    pub supply_chain: bool,
}

impl InfrastructureFlags {
    pub const FLAG_NAMES: [&'static str; 4] = ["cloud", "mfa", "incident_process", "supply_chain"];

    /// Names of the flags that are set, in declaration order.
    pub fn enabled(&self) -> Vec<&'static str> {
        [self.cloud, self.mfa, self.incident_process, self.supply_chain]
            .into_iter()
            .zip(Self::FLAG_NAMES)
            .filter_map(|(set, name)| set.then_some(name))
            .collect()
    }
}

impl FromStr for InfrastructureFlags {
    type Err = ParseAnswerError;

    /// Parses a comma separated list such as `cloud,mfa`. `none` or an empty string clears all flags.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut flags = Self::default();
        for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
            match token.to_ascii_lowercase().replace('-', "_").as_str() {
                "none" => {}
                "cloud" => flags.cloud = true,
                "mfa" => flags.mfa = true,
                "incident_process" | "incident" => flags.incident_process = true,
                "supply_chain" | "supply" => flags.supply_chain = true,
                _ => {
                    return Err(ParseAnswerError::Unknown {
                        field: "infrastructure flag",
                        value: token.to_string(),
                        expected: Self::FLAG_NAMES.join(", "),
                    })
                }
            }
        }
        Ok(flags)
    }
}

/// Accumulated answers for one assessment session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerRecord {
    pub entity_size: Option<EntitySize>,
    pub service_sensitivity: Option<ServiceSensitivity>,
    pub digital_infrastructure: InfrastructureFlags,
    pub governance_maturity: Option<GovernanceMaturity>,
}

impl AnswerRecord {
    pub fn missing_fields(&self) -> Vec<AnswerField> {
        let mut missing = Vec::new();
        if self.entity_size.is_none() {
            missing.push(AnswerField::EntitySize);
        }
        if self.service_sensitivity.is_none() {
            missing.push(AnswerField::ServiceSensitivity);
        }
        if self.governance_maturity.is_none() {
            missing.push(AnswerField::GovernanceMaturity);
        }
        missing
    }
}

/// Single-valued answer fields that can be left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerField {
    EntitySize,
    ServiceSensitivity,
    GovernanceMaturity,
}

impl AnswerField {
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::EntitySize => "entity_size",
            Self::ServiceSensitivity => "service_sensitivity",
            Self::GovernanceMaturity => "governance_maturity",
        }
    }
}

/// Answer chosen on one of the single-choice screens (steps 1, 2 and 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SingleAnswer {
    EntitySize(EntitySize),
    ServiceSensitivity(ServiceSensitivity),
    GovernanceMaturity(GovernanceMaturity),
}

impl SingleAnswer {
    /// The screen on which this answer is collected.
    pub const fn step(self) -> Step {
        match self {
            Self::EntitySize(_) => Step::EntitySize,
            Self::ServiceSensitivity(_) => Step::ServiceSensitivity,
            Self::GovernanceMaturity(_) => Step::GovernanceMaturity,
        }
    }
}

/// Discrete exposure category produced by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
}

impl Tier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Tier1, Self::Tier2, Self::Tier3]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tier1 => "Tier 1 - Low exposure",
            Self::Tier2 => "Tier 2 - Moderate exposure",
            Self::Tier3 => "Tier 3 - High exposure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAnswerError {
    #[error("unknown {field} '{value}' (expected one of: {expected})")]
    Unknown {
        field: &'static str,
        value: String,
        expected: String,
    },
}

fn parse_choice<T: Copy>(
    raw: &str,
    field: &'static str,
    choices: &[T],
    wire_name: fn(T) -> &'static str,
) -> Result<T, ParseAnswerError> {
    let needle = raw.trim().to_ascii_lowercase();
    choices
        .iter()
        .copied()
        .find(|choice| wire_name(*choice) == needle)
        .ok_or_else(|| ParseAnswerError::Unknown {
            field,
            value: raw.trim().to_string(),
            expected: choices
                .iter()
                .map(|choice| wire_name(*choice))
                .collect::<Vec<_>>()
                .join(", "),
        })
}

impl FromStr for EntitySize {
    type Err = ParseAnswerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_choice(raw, "entity size", &Self::ordered(), Self::wire_name)
    }
}

impl FromStr for ServiceSensitivity {
    type Err = ParseAnswerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_choice(raw, "service sensitivity", &Self::ordered(), Self::wire_name)
    }
}

impl FromStr for GovernanceMaturity {
    type Err = ParseAnswerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_choice(raw, "governance maturity", &Self::ordered(), Self::wire_name)
    }
}
