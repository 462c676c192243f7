use super::domain::Tier;
use serde::Serialize;

/// Static explanatory copy shown for a tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierContent {
    pub tier: Tier,
    pub label: &'static str,
    pub title: &'static str,
    pub implications: &'static str,
    pub obligations: &'static [&'static str],
    pub timeline: &'static str,
    pub accountability: &'static str,
    pub positioning: &'static str,
}

/// Tier computed for a session together with the copy to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierResult {
    pub tier: Tier,
    pub score: i16,
    pub content: &'static TierContent,
}

impl TierResult {
    pub fn new(tier: Tier, score: i16) -> Self {
        Self {
            tier,
            score,
            content: content_for(tier),
        }
    }

    pub fn label(&self) -> &'static str {
        self.content.label
    }
}

static TIER_CONTENT: [TierContent; 3] = [
    TierContent {
        tier: Tier::Tier1,
        label: Tier::Tier1.label(),
        title: "Limited exposure: maintain good hygiene",
        implications: "Your answers point to a modest attack surface and services whose disruption \
            would have a contained impact. Formal security obligations are unlikely to apply in full, \
            but customers and partners will still expect basic safeguards.",
        obligations: &[
            "Keep an up-to-date inventory of systems and suppliers",
            "Enforce multi-factor authentication on administrative accounts",
            "Document a lightweight incident contact procedure",
        ],
        timeline: "No fixed deadline. Review these answers annually or after a significant change \
            to your services or infrastructure.",
        accountability: "A named owner for security topics is sufficient; management should \
            receive a short yearly status update.",
        positioning: "Treat security as a quality signal: a concise statement of your practices \
            can shorten procurement conversations with larger clients.",
    },
    TierContent {
        tier: Tier::Tier2,
        label: Tier::Tier2.label(),
        title: "Moderate exposure: structure your approach",
        implications: "Your profile combines meaningful service sensitivity with gaps that an \
            incident could exploit. Expect supervisory interest or contractual security clauses \
            from clients, and plan for proportionate risk management measures.",
        obligations: &[
            "Run and document a risk assessment covering critical services",
            "Establish an incident handling process with defined notification steps",
            "Assess security requirements for key suppliers",
            "Roll out multi-factor authentication across remote access",
            "Train staff on security basics at least once a year",
        ],
        timeline: "Aim to close the highest-priority gaps within six months and to have a \
            documented program within twelve.",
        accountability: "Management should approve the risk management measures and follow \
            their implementation; assign a coordinator with the time to drive it.",
        positioning: "A structured program lets you answer client questionnaires consistently \
            and turns compliance effort into a competitive argument.",
    },
    TierContent {
        tier: Tier::Tier3,
        label: Tier::Tier3.label(),
        title: "High exposure: act now",
        implications: "Your size, the sensitivity of your services and your current controls \
            combine into a high exposure profile. A serious incident would likely affect users \
            beyond your organization, and comprehensive security obligations should be assumed.",
        obligations: &[
            "Adopt a formal information security management framework",
            "Maintain incident detection with early warning within 24 hours",
            "Produce incident notifications and final reports on a fixed schedule",
            "Secure the supply chain with contractual security requirements",
            "Test business continuity and crisis management plans",
            "Audit the effectiveness of security measures regularly",
        ],
        timeline: "Start immediately: incident reporting capability within three months and a \
            complete risk management program within a year.",
        accountability: "The management body is directly accountable: it must approve the \
            measures, oversee their implementation and follow security training itself.",
        positioning: "Demonstrable maturity is now a license to operate; invest in \
            certification to reassure regulators, clients and insurers.",
    },
];

/// Static copy for a tier. Every tier has exactly one entry.
pub fn content_for(tier: Tier) -> &'static TierContent {
    match tier {
        Tier::Tier1 => &TIER_CONTENT[0],
        Tier::Tier2 => &TIER_CONTENT[1],
        Tier::Tier3 => &TIER_CONTENT[2],
    }
}

pub fn all_tier_content() -> &'static [TierContent] {
    &TIER_CONTENT
}
