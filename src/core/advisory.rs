//! Advisory text collaborator
//!
//! An [`Advisor`] turns a prompt describing a finished plan into free-form
//! optimisation advice (typically a language-model call). The planner never
//! depends on the answer: failures are logged and recorded as a note.

use thiserror::Error;
use tracing::{info, warn};

use crate::core::planner::PlanOutcome;

/// Number of operations summarised in the prompt
const PROMPT_OPERATIONS: usize = 3;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("Advisory service timed out after {0}s")]
    Timeout(u64),

    #[error("Advisory service unavailable: {0}")]
    Unavailable(String),

    #[error("Advisory service returned an empty response")]
    Empty,
}

/// Text-in/text-out advisory service
pub trait Advisor {
    fn advise(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

impl<F> Advisor for F
where
    F: Fn(&str) -> Result<String, AdvisoryError>,
{
    fn advise(&self, prompt: &str) -> Result<String, AdvisoryError> {
        self(prompt)
    }
}

/// Prompt asking for optimisation advice on a plan
pub fn advisory_prompt(outcome: &PlanOutcome) -> String {
    let operations = outcome
        .plan
        .operations
        .iter()
        .take(PROMPT_OPERATIONS)
        .map(|op| format!("  - {}: {}", op.name, op.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Review this turning process plan for a lathe operation:\n\n\
         Part Specifications:\n\
         \x20 - Diameter: {:.1} mm\n\
         \x20 - Length: {:.1} mm\n\
         \x20 - Cylindrical faces: {}\n\
         \x20 - Machinability score: {}/100\n\
         \x20 - Workpiece material: {}\n\
         \x20 - Lathe machine profile: {}\n\n\
         Planned Operations:\n{}\n\n\
         Suggest optimizations for:\n\
         1. Tool selection improvements\n\
         2. Speed/feed optimization\n\
         3. Coolant strategy\n\
         4. Setup considerations\n\
         5. Quality improvements",
        outcome.dimensions.diameter,
        outcome.dimensions.length,
        outcome.cylindrical_faces,
        outcome.assessment.score,
        outcome.material.name,
        outcome.machine.name,
        operations
    )
}

/// Ask the advisor about a machinable plan and attach the answer
///
/// Not-machinable outcomes are left untouched.
pub fn attach_advice(outcome: &mut PlanOutcome, advisor: &dyn Advisor) {
    if !outcome.assessment.is_machinable {
        return;
    }

    let prompt = advisory_prompt(outcome);
    match advisor.advise(&prompt) {
        Ok(text) if !text.trim().is_empty() => {
            info!(chars = text.len(), "advisory text attached");
            outcome.advice = Some(text);
        }
        Ok(_) => {
            warn!("advisory service returned an empty response");
            outcome.notes.push(AdvisoryError::Empty.to_string());
        }
        Err(e) => {
            warn!(error = %e, "advisory service failed");
            outcome.notes.push(format!("Advisory text unavailable: {}", e));
        }
    }
}
