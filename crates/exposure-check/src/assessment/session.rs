use serde::{Deserialize, Serialize};

use super::content::TierResult;
use super::domain::{AnswerRecord, InfrastructureFlags, SingleAnswer, Step};
use super::scoring::{breakdown, CompletedAnswers, IncompleteAnswers};

/// Discrete input events delivered by whatever collects the answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssessmentEvent {
    SingleAnswerChosen { answer: SingleAnswer },
    InfrastructureFlagsSubmitted { flags: InfrastructureFlags },
    BackRequested,
    RestartRequested,
}

impl AssessmentEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SingleAnswerChosen { .. } => "single_answer_chosen",
            Self::InfrastructureFlagsSubmitted { .. } => "infrastructure_flags_submitted",
            Self::BackRequested => "back_requested",
            Self::RestartRequested => "restart_requested",
        }
    }
}

/// Rejected event. The session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("{event} is only accepted on {expected}, session is on {current}")]
    WrongStep {
        event: &'static str,
        expected: Step,
        current: Step,
    },
    #[error(transparent)]
    Incomplete(#[from] IncompleteAnswers),
}

/// What the display side needs to render the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub step: Step,
    pub step_number: u8,
    pub step_label: &'static str,
    pub input_steps: u8,
    pub answers: AnswerRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TierResult>,
}

/// State of one questionnaire run: the current screen and the answers so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    current_step: Step,
    answers: AnswerRecord,
    result: Option<TierResult>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            current_step: Step::EntitySize,
            answers: AnswerRecord::default(),
            result: None,
        }
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    /// Present only while the session sits on the results screen.
    pub fn result(&self) -> Option<&TierResult> {
        self.result.as_ref()
    }

    pub fn apply(&mut self, event: AssessmentEvent) -> Result<StepView, TransitionError> {
        match event {
            AssessmentEvent::SingleAnswerChosen { answer } => {
                self.select_single_answer(answer)?;
            }
            AssessmentEvent::InfrastructureFlagsSubmitted { flags } => {
                self.set_infrastructure_flags(flags)?;
            }
            AssessmentEvent::BackRequested => {
                self.go_back();
            }
            AssessmentEvent::RestartRequested => self.restart(),
        }
        Ok(self.view())
    }

    /// Records the answer for the current screen and advances.
    ///
    /// Answering the governance question computes the tier and moves to the results screen.
    pub fn select_single_answer(&mut self, answer: SingleAnswer) -> Result<Step, TransitionError> {
        self.expect_step("single_answer_chosen", answer.step())?;

        let mut answers = self.answers;
        match answer {
            SingleAnswer::EntitySize(size) => answers.entity_size = Some(size),
            SingleAnswer::ServiceSensitivity(sensitivity) => {
                answers.service_sensitivity = Some(sensitivity)
            }
            SingleAnswer::GovernanceMaturity(governance) => {
                answers.governance_maturity = Some(governance)
            }
        }

        if answer.step() == Step::GovernanceMaturity {
            let completed = CompletedAnswers::from_record(&answers)?;
            let scored = breakdown(&completed);
            self.answers = answers;
            self.result = Some(TierResult::new(scored.tier, scored.total_score));
            self.current_step = Step::Results;
        } else {
            self.answers = answers;
            self.advance();
        }
        Ok(self.current_step)
    }

    /// Overwrites all four infrastructure answers at once and advances.
    pub fn set_infrastructure_flags(
        &mut self,
        flags: InfrastructureFlags,
    ) -> Result<Step, TransitionError> {
        self.expect_step("infrastructure_flags_submitted", Step::DigitalInfrastructure)?;
        self.answers.digital_infrastructure = flags;
        self.advance();
        Ok(self.current_step)
    }

    /// Moves one screen back, keeping recorded answers. No-op on the first screen.
    pub fn go_back(&mut self) -> Step {
        if let Some(previous) = self.current_step.previous() {
            self.current_step = previous;
            self.result = None;
        }
        self.current_step
    }

    pub fn restart(&mut self) {
        *self = Self::new();
    }

    pub fn view(&self) -> StepView {
        StepView {
            step: self.current_step,
            step_number: self.current_step.number(),
            step_label: self.current_step.label(),
            input_steps: Step::INPUT_STEPS,
            answers: self.answers,
            result: self.result.clone(),
        }
    }

    fn expect_step(&self, event: &'static str, expected: Step) -> Result<(), TransitionError> {
        if self.current_step == expected {
            Ok(())
        } else {
            Err(TransitionError::WrongStep {
                event,
                expected,
                current: self.current_step,
            })
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.current_step.next() {
            self.current_step = next;
        }
    }
}
