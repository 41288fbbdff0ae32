use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::domain::{
    Assessment, AssessmentId, CandidateId, JobId, PipelineStage, Question, QuestionCategory,
    QuestionId, ResponseId, ResponseRecord,
};
use super::repository::{
    AssessmentRepository, QuestionRepository, RepositoryError, ResponseRepository,
};

/// Serializable image of every collection plus the id counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
    #[serde(default)]
    pub responses: Vec<ResponseRecord>,
    #[serde(default)]
    pub last_assessment_id: u64,
    #[serde(default)]
    pub last_response_id: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    questions: BTreeMap<QuestionId, Question>,
    assessments: BTreeMap<AssessmentId, Assessment>,
    responses: BTreeMap<ResponseId, ResponseRecord>,
    last_assessment_id: u64,
    last_response_id: u64,
}

impl StoreState {
    fn insert_response(&mut self, record: ResponseRecord) -> Result<ResponseRecord, RepositoryError> {
        if self.responses.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        if record.is_submitted()
            && self.responses.values().any(|existing| {
                existing.candidate_id == record.candidate_id
                    && existing.assessment_id == record.assessment_id
                    && existing.is_submitted()
            })
        {
            return Err(RepositoryError::Conflict);
        }
        self.last_response_id = self.last_response_id.max(record.id.0);
        self.responses.insert(record.id, record.clone());
        Ok(record)
    }
}

/// In-memory implementation of all three repositories.
///
/// Clones share the same underlying state.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut state = StoreState {
            last_assessment_id: snapshot.last_assessment_id,
            last_response_id: snapshot.last_response_id,
            ..StoreState::default()
        };
        for question in snapshot.questions {
            state.questions.insert(question.id, question);
        }
        for assessment in snapshot.assessments {
            state.last_assessment_id = state.last_assessment_id.max(assessment.id.0);
            state.assessments.insert(assessment.id, assessment);
        }
        for record in snapshot.responses {
            state.last_response_id = state.last_response_id.max(record.id.0);
            state.responses.insert(record.id, record);
        }
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn snapshot(&self) -> Result<StoreSnapshot, RepositoryError> {
        let state = self.lock()?;
        Ok(StoreSnapshot {
            questions: state.questions.values().cloned().collect(),
            assessments: state.assessments.values().cloned().collect(),
            responses: state.responses.values().cloned().collect(),
            last_assessment_id: state.last_assessment_id,
            last_response_id: state.last_response_id,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }
}

impl QuestionRepository for MemoryStore {
    fn replace_questions(&self, questions: Vec<Question>) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        state.questions = questions
            .into_iter()
            .map(|question| (question.id, question))
            .collect();
        Ok(())
    }

    fn question_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.questions.len())
    }

    fn questions_in(&self, category: QuestionCategory) -> Result<Vec<Question>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .questions
            .values()
            .filter(|question| question.category == category)
            .cloned()
            .collect())
    }

    fn all_questions(&self) -> Result<Vec<Question>, RepositoryError> {
        Ok(self.lock()?.questions.values().cloned().collect())
    }
}

impl AssessmentRepository for MemoryStore {
    fn next_assessment_id(&self) -> Result<AssessmentId, RepositoryError> {
        let mut state = self.lock()?;
        state.last_assessment_id += 1;
        Ok(AssessmentId(state.last_assessment_id))
    }

    fn insert_assessment(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut state = self.lock()?;
        let taken = state.assessments.contains_key(&assessment.id)
            || state.assessments.values().any(|existing| {
                existing.job_id == assessment.job_id && existing.stage == assessment.stage
            });
        if taken {
            return Err(RepositoryError::Conflict);
        }
        state.last_assessment_id = state.last_assessment_id.max(assessment.id.0);
        state.assessments.insert(assessment.id, assessment.clone());
        Ok(assessment)
    }

    fn update_assessment(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let clashes = state.assessments.values().any(|existing| {
            existing.id != assessment.id
                && existing.job_id == assessment.job_id
                && existing.stage == assessment.stage
        });
        if clashes {
            return Err(RepositoryError::Conflict);
        }
        match state.assessments.get_mut(&assessment.id) {
            Some(slot) => {
                *slot = assessment;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(self.lock()?.assessments.get(&id).cloned())
    }

    fn assessment_for(
        &self,
        job_id: JobId,
        stage: PipelineStage,
    ) -> Result<Option<Assessment>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .assessments
            .values()
            .find(|assessment| assessment.job_id == job_id && assessment.stage == stage)
            .cloned())
    }

    fn assessments_for_job(&self, job_id: JobId) -> Result<Vec<Assessment>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .assessments
            .values()
            .filter(|assessment| assessment.job_id == job_id)
            .cloned()
            .collect())
    }

    fn delete_assessment(&self, id: AssessmentId) -> Result<(), RepositoryError> {
        self.lock()?
            .assessments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl ResponseRepository for MemoryStore {
    fn next_response_id(&self) -> Result<ResponseId, RepositoryError> {
        let mut state = self.lock()?;
        state.last_response_id += 1;
        Ok(ResponseId(state.last_response_id))
    }

    fn insert_response(&self, record: ResponseRecord) -> Result<ResponseRecord, RepositoryError> {
        self.lock()?.insert_response(record)
    }

    fn delete_response(&self, id: ResponseId) -> Result<(), RepositoryError> {
        self.lock()?
            .responses
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn responses_for(
        &self,
        candidate_id: CandidateId,
        assessment_id: AssessmentId,
    ) -> Result<Vec<ResponseRecord>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .responses
            .values()
            .filter(|record| {
                record.candidate_id == candidate_id && record.assessment_id == assessment_id
            })
            .cloned()
            .collect())
    }

    fn responses_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<ResponseRecord>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .responses
            .values()
            .filter(|record| record.assessment_id == assessment_id)
            .cloned()
            .collect())
    }

    fn replace_draft(&self, draft: ResponseRecord) -> Result<ResponseRecord, RepositoryError> {
        let mut state = self.lock()?;
        state.responses.retain(|_, existing| {
            !(existing.is_draft()
                && existing.candidate_id == draft.candidate_id
                && existing.assessment_id == draft.assessment_id)
        });
        state.insert_response(draft)
    }
}
