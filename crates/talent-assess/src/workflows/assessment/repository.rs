use super::domain::{
    Assessment, AssessmentId, CandidateId, JobId, PipelineStage, Question, QuestionCategory,
    ResponseId, ResponseRecord,
};

/// Storage for the question bank collection.
pub trait QuestionRepository: Send + Sync {
    /// Clears the collection and stores `questions` in its place.
    fn replace_questions(&self, questions: Vec<Question>) -> Result<(), RepositoryError>;
    fn question_count(&self) -> Result<usize, RepositoryError>;
    fn questions_in(&self, category: QuestionCategory) -> Result<Vec<Question>, RepositoryError>;
    fn all_questions(&self) -> Result<Vec<Question>, RepositoryError>;
}

/// Storage for assessments, unique per `(job, stage)`.
pub trait AssessmentRepository: Send + Sync {
    fn next_assessment_id(&self) -> Result<AssessmentId, RepositoryError>;
    /// Fails with [`RepositoryError::Conflict`] when the id or the `(job, stage)` pair is taken.
    fn insert_assessment(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
    fn update_assessment(&self, assessment: Assessment) -> Result<(), RepositoryError>;
    fn fetch_assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError>;
    fn assessment_for(
        &self,
        job_id: JobId,
        stage: PipelineStage,
    ) -> Result<Option<Assessment>, RepositoryError>;
    fn assessments_for_job(&self, job_id: JobId) -> Result<Vec<Assessment>, RepositoryError>;
    fn delete_assessment(&self, id: AssessmentId) -> Result<(), RepositoryError>;
}

/// Storage for draft and submitted responses.
///
/// Range queries return rows in insertion order.
pub trait ResponseRepository: Send + Sync {
    fn next_response_id(&self) -> Result<ResponseId, RepositoryError>;
    /// Fails with [`RepositoryError::Conflict`] when a second submitted row would exist for the
    /// same candidate and assessment.
    fn insert_response(&self, record: ResponseRecord) -> Result<ResponseRecord, RepositoryError>;
    fn delete_response(&self, id: ResponseId) -> Result<(), RepositoryError>;
    fn responses_for(
        &self,
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
    ) -> Result<Vec<ResponseRecord>, RepositoryError>;
    fn responses_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<ResponseRecord>, RepositoryError>;

    /// Removes every draft row of the record's candidate and assessment, then stores `draft`.
    ///
    /// Implementations that can do this under one lock should override the default.
    fn replace_draft(&self, draft: ResponseRecord) -> Result<ResponseRecord, RepositoryError> {
        for stale in self
            .responses_for(draft.candidate_id, draft.assessment_id)?
            .into_iter()
            .filter(ResponseRecord::is_draft)
        {
            self.delete_response(stale.id)?;
        }
        self.insert_response(draft)
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
