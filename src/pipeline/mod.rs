//! The outline → interview → write pipeline for one project.
//!
//! Each phase is an independent entry point that needs the previous phase's
//! artifact. A missing prerequisite aborts the phase; a failure on a single
//! outline point (no completion, unparsable questions) is logged and the phase
//! moves on to the next point.

mod answers;
mod status;

pub use answers::*;
pub use status::*;

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::{Completer, DEFAULT_MAX_RETRIES};
use crate::models::*;
use crate::prompts::{PromptBuilder, PromptError};
use crate::store::{Artifact, ArtifactError, ProjectStore};

/// Prompt shown after the generated questions for a point are answered.
pub const MORE_PROMPT: &str = "Anything else to add? (Or type 'done' to continue)";
/// Answer that ends the "tell me more" loop, compared case-insensitively.
pub const DONE_SENTINEL: &str = "done";

const RAW_TEXT_HINT: &str = "Please ensure you have a '00_raw_text.txt' file in your project directory.";
const OUTLINE_HINT: &str = "Please run the 'outline' command first.";
const INTERVIEW_HINT: &str = "Please run the 'interview' command first.";

/// Why a phase stopped before finishing.
#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("{artifact} not found at {}. {hint}", path.display())]
    PreconditionMissing {
        artifact: Artifact,
        path: PathBuf,
        hint: &'static str,
    },

    #[error(
        "no outline points found in {}. The outline might not be properly formatted; \
         looking for lines starting with '-' or '*'",
        path.display()
    )]
    NoOutlinePoints { path: PathBuf },

    #[error("no interview data to write from in {}", path.display())]
    NoInterviewRecords { path: PathBuf },

    #[error("failed to generate an outline; check that Ollama is running and the model is installed")]
    CompletionFailed,

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Storage(#[from] ArtifactError),

    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Result of a successful outline phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineReport {
    pub path: PathBuf,
    /// Bullet lines found in the saved outline.
    pub points: usize,
}

/// Per-point tally of an interview phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewReport {
    pub interviewed: usize,
    /// Points that already had a record.
    pub skipped: usize,
    /// Points with no completion or unparsable questions.
    pub failed: usize,
}

/// Per-record tally of a write phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub drafted: usize,
    pub failed: usize,
}

/// Drives the three phases against one project directory.
pub struct Pipeline<C> {
    store: ProjectStore,
    completer: C,
    prompts: PromptBuilder,
    max_retries: u32,
    draft_mode: DraftMode,
}

impl<C: Completer> Pipeline<C> {
    pub fn new(store: ProjectStore, completer: C, prompts: PromptBuilder) -> Self {
        Self {
            store,
            completer,
            prompts,
            max_retries: DEFAULT_MAX_RETRIES,
            draft_mode: DraftMode::default(),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_draft_mode(mut self, draft_mode: DraftMode) -> Self {
        self.draft_mode = draft_mode;
        self
    }

    pub fn completer(&self) -> &C {
        &self.completer
    }

    // ============================================================
    // Phase 1: outline
    // ============================================================

    /// Turn the raw text into an outline, overwriting any previous one.
    ///
    /// Nothing is written unless the model produces a completion.
    pub async fn outline(&self) -> Result<OutlineReport, PhaseError> {
        tracing::info!("Phase 1: Creating outline...");

        let raw_text = self.require(self.store.load_raw_text(), RAW_TEXT_HINT)?;
        let prompt = self.prompts.outline(&raw_text)?;

        let outline = self
            .completer
            .complete(&prompt, self.max_retries)
            .await
            .ok_or(PhaseError::CompletionFailed)?;

        self.store.save_outline(&outline)?;
        let path = self.store.path(Artifact::Outline);
        tracing::info!("Outline saved to {}", path.display());

        let points = parse_outline_points(&outline).len();
        if points == 0 {
            tracing::warn!("The outline has no lines starting with '-' or '*'; edit it before interviewing");
        }

        Ok(OutlineReport { path, points })
    }

    // ============================================================
    // Phase 2: interview
    // ============================================================

    /// Interview the author about every outline point that has no record yet.
    ///
    /// The full record sequence is saved after each completed point, so an
    /// interruption loses at most the point in progress.
    pub async fn interview<A>(&self, answers: &mut A) -> Result<InterviewReport, PhaseError>
    where
        A: AnswerProvider + ?Sized,
    {
        tracing::info!("Phase 2: Conducting interview...");

        let outline = self.require(self.store.load_outline(), OUTLINE_HINT)?;
        let points = parse_outline_points(&outline);
        if points.is_empty() {
            return Err(PhaseError::NoOutlinePoints {
                path: self.store.path(Artifact::Outline),
            });
        }

        let mut records = self.store.load_interview_records()?;
        let mut report = InterviewReport::default();

        for point in &points {
            if is_interviewed(&records, point) {
                tracing::info!("Skipping already interviewed point: {}", point);
                report.skipped += 1;
                continue;
            }

            tracing::info!("Interviewing for outline point: {}", point);
            let prompt = self.prompts.interview(point)?;

            let Some(raw) = self.completer.complete(&prompt, self.max_retries).await else {
                tracing::warn!("Failed to get questions from the model. Skipping this point.");
                report.failed += 1;
                continue;
            };

            let questions = match parse_questions(&raw) {
                Ok(questions) => questions,
                Err(e) => {
                    tracing::warn!("Failed to parse questions from the model: {}", e);
                    tracing::warn!("Raw response: {}", raw);
                    tracing::warn!("Skipping this point.");
                    report.failed += 1;
                    continue;
                }
            };

            let record = collect_answers(point, &questions, answers)?;
            records.push(record);
            self.store.save_interview_records(&records)?;
            tracing::info!("Saved progress.");
            report.interviewed += 1;
        }

        tracing::info!("Interview complete.");
        Ok(report)
    }

    // ============================================================
    // Phase 3: write
    // ============================================================

    /// Draft one scene per interview record, in record order.
    pub async fn write(&self) -> Result<WriteReport, PhaseError> {
        tracing::info!("Phase 3: Writing draft...");

        let path = self.store.path(Artifact::InterviewData);
        let records = match self.store.read_interview_records()? {
            Some(records) => records,
            None => {
                return Err(PhaseError::PreconditionMissing {
                    artifact: Artifact::InterviewData,
                    path,
                    hint: INTERVIEW_HINT,
                })
            }
        };
        if records.is_empty() {
            return Err(PhaseError::NoInterviewRecords { path });
        }

        if self.draft_mode == DraftMode::Overwrite {
            self.store.clear_draft()?;
            tracing::info!("Cleared existing draft");
        }

        let mut report = WriteReport::default();
        for record in &records {
            let point = &record.outline_point;
            let prompt = self.prompts.write(point, &record.qa_block())?;

            match self.completer.complete(&prompt, self.max_retries).await {
                Some(scene) => {
                    self.store.append_draft_scene(&scene_block(point, &scene))?;
                    tracing::info!("Drafted scene for: {}", point);
                    report.drafted += 1;
                }
                None => {
                    tracing::warn!("Failed to generate scene for: {}", point);
                    report.failed += 1;
                }
            }
        }

        tracing::info!("Draft writing complete.");
        Ok(report)
    }

    /// Convert a missing prerequisite into a phase abort with guidance.
    fn require<T>(
        &self,
        result: Result<T, ArtifactError>,
        hint: &'static str,
    ) -> Result<T, PhaseError> {
        result.map_err(|e| match e {
            ArtifactError::NotFound { artifact, path } => PhaseError::PreconditionMissing {
                artifact,
                path,
                hint,
            },
            other => PhaseError::Storage(other),
        })
    }
}

/// Ask every generated question, then keep asking for more until the author
/// answers with the sentinel.
fn collect_answers<A>(
    point: &str,
    questions: &[String],
    answers: &mut A,
) -> Result<InterviewRecord, AnswerError>
where
    A: AnswerProvider + ?Sized,
{
    let mut record = InterviewRecord::new(point);

    for question in questions {
        let answer = answers.ask(question)?;
        record.q_and_a.push(QaPair::new(question.as_str(), answer));
    }

    loop {
        let more = answers.ask(MORE_PROMPT)?;
        if is_done(&more) {
            break;
        }
        record.q_and_a.push(QaPair::new(TELL_ME_MORE, more));
    }

    Ok(record)
}

fn is_done(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(DONE_SENTINEL)
}
