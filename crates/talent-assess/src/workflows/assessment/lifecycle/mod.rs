//! Draft autosave and one-way submission of candidate responses.

mod service;

use chrono::{DateTime, Utc};

use super::delivery::ValidationReport;
use super::domain::{Answers, Assessment, AssessmentId, CandidateId, PipelineStage};
use super::repository::RepositoryError;

pub use service::ResponseService;

/// Assessment plus whatever the candidate saved so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeState {
    pub assessment: Assessment,
    pub answers: Answers,
    pub last_saved: Option<DateTime<Utc>>,
    pub submitted: bool,
}

/// Operations the engine refuses instead of corrupting stored responses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleViolation {
    #[error("candidate {candidate_id} already submitted assessment {assessment_id}")]
    AlreadySubmitted {
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
    },
    #[error("assessment {0} does not exist")]
    UnknownAssessment(AssessmentId),
    #[error("no assessment exists for this job at stage {0}")]
    NoAssessmentForStage(PipelineStage),
    #[error("candidate {0} does not exist")]
    UnknownCandidate(CandidateId),
    #[error("candidate {candidate_id} at stage {candidate_stage} may not take assessment {assessment_id}")]
    CandidateNotEligible {
        candidate_id: CandidateId,
        candidate_stage: PipelineStage,
        assessment_id: AssessmentId,
    },
    #[error("response belongs to assessment {found}, not {expected}")]
    AssessmentMismatch {
        expected: AssessmentId,
        found: AssessmentId,
    },
    #[error("response is still a draft")]
    NotSubmitted,
}

/// Error raised by the response service.
#[derive(Debug, thiserror::Error)]
pub enum ResponseServiceError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("answers failed validation ({} error(s))", .0.error_count())]
    Invalid(ValidationReport),
}
