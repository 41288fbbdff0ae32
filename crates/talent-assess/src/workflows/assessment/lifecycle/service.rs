use std::sync::Arc;

use tracing::{debug, info};

use super::{LifecycleViolation, ResponseServiceError, ResumeState};
use crate::workflows::assessment::clock::{Clock, SystemClock};
use crate::workflows::assessment::delivery::validate_assessment;
use crate::workflows::assessment::directory::TalentDirectory;
use crate::workflows::assessment::domain::{
    Answers, Assessment, AssessmentId, CandidateId, JobId, PipelineStage, ResponseRecord,
    ResponseState,
};
use crate::workflows::assessment::repository::{
    AssessmentRepository, RepositoryError, ResponseRepository,
};

/// Service guarding the draft and submission lifecycle of responses.
pub struct ResponseService<A, R, D> {
    assessments: Arc<A>,
    responses: Arc<R>,
    directory: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<A, R, D> ResponseService<A, R, D>
where
    A: AssessmentRepository + 'static,
    R: ResponseRepository + 'static,
    D: TalentDirectory + 'static,
{
    pub fn new(assessments: Arc<A>, responses: Arc<R>, directory: Arc<D>) -> Self {
        Self::with_clock(assessments, responses, directory, Arc::new(SystemClock))
    }

    pub fn with_clock(
        assessments: Arc<A>,
        responses: Arc<R>,
        directory: Arc<D>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            assessments,
            responses,
            directory,
            clock,
        }
    }

    /// Replaces the candidate's current draft with `answers`.
    ///
    /// Repeated calls converge on exactly one draft row holding the latest answers.
    pub fn save_draft(
        &self,
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
        answers: Answers,
    ) -> Result<ResponseRecord, ResponseServiceError> {
        let assessment = self.eligible_assessment(candidate_id, assessment_id)?;
        self.reject_if_submitted(candidate_id, assessment_id)?;

        let now = self.clock.now();
        let draft = ResponseRecord {
            id: self.responses.next_response_id()?,
            candidate_id,
            assessment_id,
            job_id: assessment.job_id,
            stage: assessment.stage,
            answers,
            created_at: now,
            updated_at: now,
            state: ResponseState::Draft,
        };

        let stored = self.responses.replace_draft(draft)?;
        debug!(%candidate_id, %assessment_id, answers = stored.answers.len(), "draft saved");
        Ok(stored)
    }

    /// The most recently updated draft for the pair, if any.
    pub fn get_draft(
        &self,
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
    ) -> Result<Option<ResponseRecord>, ResponseServiceError> {
        Ok(self
            .responses
            .responses_for(candidate_id, assessment_id)?
            .into_iter()
            .filter(ResponseRecord::is_draft)
            .max_by_key(|record| record.updated_at))
    }

    pub fn has_submitted(
        &self,
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
    ) -> Result<bool, ResponseServiceError> {
        Ok(self.get_submitted(candidate_id, assessment_id)?.is_some())
    }

    pub fn get_submitted(
        &self,
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
    ) -> Result<Option<ResponseRecord>, ResponseServiceError> {
        Ok(self
            .responses
            .responses_for(candidate_id, assessment_id)?
            .into_iter()
            .find(ResponseRecord::is_submitted))
    }

    /// Stores the final answers and retires the draft.
    ///
    /// Callers validate first (see [`submit_validated`](Self::submit_validated)); a second
    /// submission for the pair is refused with [`LifecycleViolation::AlreadySubmitted`].
    pub fn submit(
        &self,
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
        answers: Answers,
    ) -> Result<ResponseRecord, ResponseServiceError> {
        let assessment = self.eligible_assessment(candidate_id, assessment_id)?;
        self.store_submission(&assessment, candidate_id, answers)
    }

    /// Validates every section, then submits.
    pub fn submit_validated(
        &self,
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
        answers: Answers,
    ) -> Result<ResponseRecord, ResponseServiceError> {
        let assessment = self.eligible_assessment(candidate_id, assessment_id)?;
        let report = validate_assessment(&assessment, &answers);
        if !report.is_valid() {
            debug!(
                %candidate_id,
                %assessment_id,
                errors = report.error_count(),
                "submission rejected by validation"
            );
            return Err(ResponseServiceError::Invalid(report));
        }
        self.store_submission(&assessment, candidate_id, answers)
    }

    /// Assessment for the candidate's job and stage with the saved draft answers.
    pub fn resume(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
        stage: PipelineStage,
    ) -> Result<ResumeState, ResponseServiceError> {
        let assessment = self
            .assessments
            .assessment_for(job_id, stage)?
            .ok_or(LifecycleViolation::NoAssessmentForStage(stage))?;
        let assessment = self.eligible_assessment(candidate_id, assessment.id)?;

        let submitted = self.has_submitted(candidate_id, assessment.id)?;
        let draft = self.get_draft(candidate_id, assessment.id)?;
        let last_saved = draft.as_ref().map(|record| record.updated_at);
        let answers = draft.map(|record| record.answers).unwrap_or_default();

        Ok(ResumeState {
            assessment,
            answers,
            last_saved,
            submitted,
        })
    }

    /// Every submitted row of an assessment, in storage order.
    pub fn submitted_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<ResponseRecord>, ResponseServiceError> {
        Ok(self
            .responses
            .responses_for_assessment(assessment_id)?
            .into_iter()
            .filter(ResponseRecord::is_submitted)
            .collect())
    }

    fn store_submission(
        &self,
        assessment: &Assessment,
        candidate_id: CandidateId,
        answers: Answers,
    ) -> Result<ResponseRecord, ResponseServiceError> {
        self.reject_if_submitted(candidate_id, assessment.id)?;

        let now = self.clock.now();
        let drafts: Vec<ResponseRecord> = self
            .responses
            .responses_for(candidate_id, assessment.id)?
            .into_iter()
            .filter(ResponseRecord::is_draft)
            .collect();
        let created_at = drafts
            .iter()
            .map(|draft| draft.created_at)
            .min()
            .unwrap_or(now);

        let record = ResponseRecord {
            id: self.responses.next_response_id()?,
            candidate_id,
            assessment_id: assessment.id,
            job_id: assessment.job_id,
            stage: assessment.stage,
            answers,
            created_at,
            updated_at: now,
            state: ResponseState::Submitted { submitted_at: now },
        };

        let stored = self
            .responses
            .insert_response(record)
            .map_err(|err| match err {
                RepositoryError::Conflict => {
                    ResponseServiceError::from(LifecycleViolation::AlreadySubmitted {
                        candidate_id,
                        assessment_id: assessment.id,
                    })
                }
                other => ResponseServiceError::Repository(other),
            })?;

        // A concurrent save may already have removed a draft; the submission stands.
        for draft in drafts {
            match self.responses.delete_response(draft.id) {
                Ok(()) | Err(RepositoryError::NotFound) => {}
                Err(err) => return Err(err.into()),
            }
        }

        info!(%candidate_id, assessment_id = %assessment.id, "response submitted");
        Ok(stored)
    }

    fn reject_if_submitted(
        &self,
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
    ) -> Result<(), ResponseServiceError> {
        if self.has_submitted(candidate_id, assessment_id)? {
            return Err(LifecycleViolation::AlreadySubmitted {
                candidate_id,
                assessment_id,
            }
            .into());
        }
        Ok(())
    }

    /// Resolves the assessment and checks the candidate sits at its job and stage.
    fn eligible_assessment(
        &self,
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
    ) -> Result<Assessment, ResponseServiceError> {
        let assessment = self
            .assessments
            .fetch_assessment(assessment_id)?
            .ok_or(LifecycleViolation::UnknownAssessment(assessment_id))?;
        let candidate = self
            .directory
            .candidate(candidate_id)?
            .ok_or(LifecycleViolation::UnknownCandidate(candidate_id))?;

        if candidate.stage != assessment.stage || candidate.job_id != assessment.job_id {
            return Err(LifecycleViolation::CandidateNotEligible {
                candidate_id,
                candidate_stage: candidate.stage,
                assessment_id,
            }
            .into());
        }
        Ok(assessment)
    }
}
