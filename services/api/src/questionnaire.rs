use clap::Args;
use exposure_check::assessment::{
    breakdown, AssessmentEvent, CompletedAnswers, EntitySize, GovernanceMaturity,
    InfrastructureFlags, ScoreBreakdown, ScoreResponse, ServiceSensitivity, SessionState,
    SingleAnswer, Step, TierResult,
};
use exposure_check::config::TelemetryConfig;
use exposure_check::error::AppError;
use exposure_check::telemetry;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::debug;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Entity size: small, medium or large
    #[arg(long)]
    pub(crate) size: EntitySize,
    /// Service sensitivity: low, medium or high
    #[arg(long)]
    pub(crate) sensitivity: ServiceSensitivity,
    /// Governance maturity: none, basic, structured or iso
    #[arg(long)]
    pub(crate) governance: GovernanceMaturity,
    /// Services run on public cloud infrastructure
    #[arg(long)]
    pub(crate) cloud: bool,
    /// Multi-factor authentication is enforced
    #[arg(long)]
    pub(crate) mfa: bool,
    /// A documented incident response process exists
    #[arg(long)]
    pub(crate) incident_process: bool,
    /// Critical suppliers have access to internal systems
    #[arg(long)]
    pub(crate) supply_chain: bool,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionnaireArgs {
    /// Print the final result as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    telemetry::init(&TelemetryConfig::default())?;

    let answers = CompletedAnswers {
        entity_size: args.size,
        service_sensitivity: args.sensitivity,
        digital_infrastructure: InfrastructureFlags {
            cloud: args.cloud,
            mfa: args.mfa,
            incident_process: args.incident_process,
            supply_chain: args.supply_chain,
        },
        governance_maturity: args.governance,
    };
    let scored = breakdown(&answers);
    let result = TierResult::new(scored.tier, scored.total_score);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let payload = ScoreResponse {
            breakdown: scored,
            result,
        };
        serde_json::to_writer_pretty(&mut out, &payload).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        render_result(&mut out, &result, Some(&scored))?;
    }
    Ok(())
}

pub(crate) fn run_questionnaire(args: QuestionnaireArgs) -> Result<(), AppError> {
    telemetry::init(&TelemetryConfig::default())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    questionnaire(stdin.lock(), &mut stderr.lock(), &mut stdout.lock(), args.json)
}

/// Interactive session wiring: with `json`, prompts go to `prompts` and `out` carries
/// only the final result document.
fn questionnaire<R, P, W>(input: R, prompts: &mut P, out: &mut W, json: bool) -> Result<(), AppError>
where
    R: BufRead,
    P: Write,
    W: Write,
{
    if !json {
        drive(input, out)?;
        return Ok(());
    }

    let result = drive(input, prompts)?;
    serde_json::to_writer_pretty(&mut *out, &result).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

/// Runs the questionnaire over line-based input until the user quits or input ends.
///
/// Returns the tier shown last, if the user reached the results screen.
pub(crate) fn drive<R, W>(input: R, out: &mut W) -> Result<Option<TierResult>, AppError>
where
    R: BufRead,
    W: Write,
{
    let mut state = SessionState::new();
    let mut lines = input.lines();

    loop {
        prompt(out, &state)?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();

        let event = match line.to_ascii_lowercase().as_str() {
            "q" | "quit" => break,
            "b" | "back" => AssessmentEvent::BackRequested,
            "r" | "restart" => AssessmentEvent::RestartRequested,
            _ => match parse_answer(state.current_step(), line) {
                Some(event) => event,
                None => {
                    writeln!(out, "Unrecognized answer '{line}', please try again.")?;
                    continue;
                }
            },
        };

        debug!(event = event.name(), "questionnaire input");
        match state.apply(event) {
            Ok(view) => {
                if let Some(result) = &view.result {
                    writeln!(out)?;
                    render_result(out, result, None)?;
                }
            }
            Err(err) => writeln!(out, "{err}")?,
        }
    }

    Ok(state.result().cloned())
}

fn parse_answer(step: Step, raw: &str) -> Option<AssessmentEvent> {
    let answer = match step {
        Step::EntitySize => SingleAnswer::EntitySize(pick(raw, &EntitySize::ordered())?),
        Step::ServiceSensitivity => {
            SingleAnswer::ServiceSensitivity(pick(raw, &ServiceSensitivity::ordered())?)
        }
        Step::GovernanceMaturity => {
            SingleAnswer::GovernanceMaturity(pick(raw, &GovernanceMaturity::ordered())?)
        }
        Step::DigitalInfrastructure => {
            let flags = raw.parse::<InfrastructureFlags>().ok()?;
            return Some(AssessmentEvent::InfrastructureFlagsSubmitted { flags });
        }
        Step::Results => return None,
    };
    Some(AssessmentEvent::SingleAnswerChosen { answer })
}

/// Accepts a 1-based menu number, otherwise the option's wire name.
fn pick<T: Copy + FromStr>(raw: &str, options: &[T]) -> Option<T> {
    match raw.parse::<usize>() {
        Ok(index) => index.checked_sub(1).and_then(|i| options.get(i)).copied(),
        Err(_) => raw.parse::<T>().ok(),
    }
}

fn prompt<W: Write>(out: &mut W, state: &SessionState) -> io::Result<()> {
    let step = state.current_step();
    if step.is_terminal() {
        return writeln!(out, "\n[r]estart, [b]ack or [q]uit");
    }

    writeln!(
        out,
        "\nStep {}/{} - {}",
        step.number(),
        Step::INPUT_STEPS,
        step.label()
    )?;
    match step {
        Step::EntitySize => {
            for (index, option) in EntitySize::ordered().into_iter().enumerate() {
                writeln!(out, "  {}) {}", index + 1, option.label())?;
            }
        }
        Step::ServiceSensitivity => {
            for (index, option) in ServiceSensitivity::ordered().into_iter().enumerate() {
                writeln!(out, "  {}) {}", index + 1, option.label())?;
            }
        }
        Step::DigitalInfrastructure => {
            writeln!(
                out,
                "  List what applies, comma separated ({}), or 'none'",
                InfrastructureFlags::FLAG_NAMES.join(", ")
            )?;
            let current = state.answers().digital_infrastructure.enabled();
            if !current.is_empty() {
                writeln!(out, "  Previously: {}", current.join(", "))?;
            }
        }
        Step::GovernanceMaturity => {
            for (index, option) in GovernanceMaturity::ordered().into_iter().enumerate() {
                writeln!(out, "  {}) {}", index + 1, option.label())?;
            }
        }
        Step::Results => {}
    }
    if step.previous().is_some() {
        write!(out, "[b]ack, [r]estart, [q]uit > ")?;
    } else {
        write!(out, "[q]uit > ")?;
    }
    out.flush()
}

pub(crate) fn render_result<W: Write>(
    out: &mut W,
    result: &TierResult,
    scored: Option<&ScoreBreakdown>,
) -> io::Result<()> {
    let content = result.content;
    writeln!(out, "{} (score {})", content.label, result.score)?;
    writeln!(out, "{}", content.title)?;

    if let Some(scored) = scored {
        writeln!(out, "\nScore components")?;
        for component in &scored.components {
            writeln!(
                out,
                "- {:?}: {:+} ({})",
                component.factor, component.points, component.notes
            )?;
        }
    }

    writeln!(out, "\nImplications\n{}", content.implications)?;
    writeln!(out, "\nObligations")?;
    for obligation in content.obligations {
        writeln!(out, "- {obligation}")?;
    }
    writeln!(out, "\nTimeline\n{}", content.timeline)?;
    writeln!(out, "\nAccountability\n{}", content.accountability)?;
    writeln!(out, "\nPositioning\n{}", content.positioning)
}
