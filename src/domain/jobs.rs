//! Trim ranges and the lifecycle of a trim or concat job.

use crate::error::VideoError;
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Time range of a trim, in seconds. Start is inclusive, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimRange {
    start: f64,
    end: f64,
}

impl TrimRange {
    pub fn new(start: f64, end: f64) -> Result<Self, VideoError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(VideoError::ClientInput(
                "trim_start and trim_end must be finite numbers".to_string(),
            ));
        }
        if start < 0.0 {
            return Err(VideoError::ClientInput(
                "trim_start must not be negative".to_string(),
            ));
        }
        if end <= start {
            return Err(VideoError::ClientInput(format!(
                "trim_end ({end}) must be greater than trim_start ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Trim,
    Concat,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Trim => write!(f, "trim"),
            JobKind::Concat => write!(f, "concat"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    Processing,
    Finalizing,
    Done,
    Failed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }

    fn can_move_to(&self, next: Phase) -> bool {
        match (self, next) {
            (Phase::Validating, Phase::Processing)
            | (Phase::Processing, Phase::Finalizing)
            | (Phase::Finalizing, Phase::Done) => true,
            (current, Phase::Failed) => !current.is_terminal(),
            _ => false,
        }
    }
}

/// One trim or concat request moving through
/// `Validating -> Processing -> Finalizing -> Done | Failed`.
#[derive(Debug)]
pub struct Job {
    pub id: Uuid,
    pub kind: JobKind,
    phase: Phase,
}

impl Job {
    pub fn new(kind: JobKind) -> Self {
        let job = Self {
            id: Uuid::new_v4(),
            kind,
            phase: Phase::Validating,
        };
        debug!(job = %job.id, kind = %kind, "job created");
        job
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start_processing(&mut self) {
        self.transition(Phase::Processing);
    }

    pub fn start_finalizing(&mut self) {
        self.transition(Phase::Finalizing);
    }

    pub fn complete(&mut self) {
        self.transition(Phase::Done);
    }

    pub fn fail(&mut self, reason: &VideoError) {
        debug!(job = %self.id, kind = %self.kind, error = %reason, "job failed in {:?}", self.phase);
        self.transition(Phase::Failed);
    }

    fn transition(&mut self, next: Phase) {
        if !self.phase.can_move_to(next) {
            warn!(
                job = %self.id,
                "ignoring illegal transition {:?} -> {:?}",
                self.phase,
                next
            );
            return;
        }
        debug!(job = %self.id, kind = %self.kind, "{:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}
