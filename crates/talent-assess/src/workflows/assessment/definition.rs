use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use super::clock::{Clock, SystemClock};
use super::domain::{
    AnswerKey, Assessment, AssessmentId, Difficulty, JobId, NewAssessment, PipelineStage,
    Question, QuestionCategory, QuestionId, QuestionKind, Section, ValidationRules,
    letter_index,
};
use super::repository::{AssessmentRepository, RepositoryError};

impl Question {
    /// Blank question of `kind` carrying the builder defaults for that type.
    pub fn template(id: QuestionId, kind: QuestionKind) -> Self {
        let mut question = Question {
            id,
            kind,
            category: QuestionCategory::Technical,
            tags: BTreeSet::new(),
            difficulty: Difficulty::Medium,
            text: String::new(),
            options: Vec::new(),
            correct_answer: None,
            required: false,
            validation: ValidationRules::default(),
            conditional: None,
        };

        match kind {
            QuestionKind::SingleChoice | QuestionKind::MultiChoice => {
                question.options = vec!["Option 1".to_string(), "Option 2".to_string()];
            }
            QuestionKind::ShortText => question.validation.max_length = Some(100),
            QuestionKind::LongText => question.validation.max_length = Some(500),
            QuestionKind::Numeric => {
                question.text = "How many years of experience do you have?".to_string();
                question.validation.min = Some(0.0);
                question.validation.max = Some(100.0);
            }
            QuestionKind::FileUpload => {
                question.validation.allowed_types =
                    [".pdf", ".doc", ".docx"].iter().map(|ext| ext.to_string()).collect();
            }
        }
        question
    }
}

/// A structural problem in an assessment definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("assessment has no sections")]
    NoSections,
    #[error("question {0:?} appears more than once")]
    DuplicateQuestion(QuestionId),
    #[error("answer key '{letter}' of question {question_id:?} is outside its options")]
    KeyOutOfBounds {
        question_id: QuestionId,
        letter: String,
    },
    #[error("question {0:?} has a multi-letter key but is not multi-choice")]
    MultipleKeysOnSingleAnswer(QuestionId),
    #[error("question {question_id:?} depends on {depends_on:?}, which does not appear before it")]
    DependencyNotEarlier {
        question_id: QuestionId,
        depends_on: QuestionId,
    },
}

impl Assessment {
    /// Lists every definition problem; an empty list means the assessment is well formed.
    pub fn check(&self) -> Vec<DefinitionError> {
        check_sections(&self.sections)
    }
}

pub(crate) fn check_sections(sections: &[Section]) -> Vec<DefinitionError> {
    let mut problems = Vec::new();
    if sections.is_empty() {
        problems.push(DefinitionError::NoSections);
    }

    let mut seen = BTreeSet::new();
    for question in sections.iter().flat_map(|section| section.questions.iter()) {
        if let Some(rule) = &question.conditional {
            if !seen.contains(&rule.depends_on) {
                problems.push(DefinitionError::DependencyNotEarlier {
                    question_id: question.id,
                    depends_on: rule.depends_on,
                });
            }
        }
        if !seen.insert(question.id) {
            problems.push(DefinitionError::DuplicateQuestion(question.id));
        }

        if let Some(key) = &question.correct_answer {
            if matches!(key, AnswerKey::Multiple(_)) && question.kind != QuestionKind::MultiChoice {
                problems.push(DefinitionError::MultipleKeysOnSingleAnswer(question.id));
            }
            for letter in key.letters() {
                let in_bounds = letter_index(letter)
                    .map(|index| index < question.options.len())
                    .unwrap_or(false);
                if !in_bounds {
                    problems.push(DefinitionError::KeyOutOfBounds {
                        question_id: question.id,
                        letter: letter.to_string(),
                    });
                }
            }
        }
    }
    problems
}

/// Storage-facing operations for hand-authored and generated assessments.
pub struct AssessmentCatalog<A> {
    repository: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<A> AssessmentCatalog<A>
where
    A: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<A>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn get(&self, id: AssessmentId) -> Result<Assessment, CatalogError> {
        Ok(self
            .repository
            .fetch_assessment(id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    pub fn for_job(
        &self,
        job_id: JobId,
        stage: PipelineStage,
    ) -> Result<Option<Assessment>, CatalogError> {
        Ok(self.repository.assessment_for(job_id, stage)?)
    }

    pub fn list_for_job(&self, job_id: JobId) -> Result<Vec<Assessment>, CatalogError> {
        Ok(self.repository.assessments_for_job(job_id)?)
    }

    /// Stores a hand-authored assessment after checking its definition.
    pub fn save_custom(&self, new: NewAssessment) -> Result<Assessment, CatalogError> {
        let problems = check_sections(&new.sections);
        if !problems.is_empty() {
            return Err(CatalogError::Invalid(problems));
        }

        let now = self.clock.now();
        let assessment = Assessment {
            id: self.repository.next_assessment_id()?,
            job_id: new.job_id,
            stage: new.stage,
            title: new.title,
            sections: new.sections,
            created_at: now,
            updated_at: now,
        };

        let stored = self
            .repository
            .insert_assessment(assessment)
            .map_err(|err| match err {
                RepositoryError::Conflict => CatalogError::AlreadyExists {
                    job_id: new.job_id,
                    stage: new.stage,
                },
                other => CatalogError::Repository(other),
            })?;
        info!(assessment_id = %stored.id, job_id = %stored.job_id, "custom assessment saved");
        Ok(stored)
    }

    /// Replaces the sections of a stored assessment and bumps `updated_at`.
    pub fn update_sections(
        &self,
        id: AssessmentId,
        sections: Vec<Section>,
    ) -> Result<Assessment, CatalogError> {
        let problems = check_sections(&sections);
        if !problems.is_empty() {
            return Err(CatalogError::Invalid(problems));
        }

        let mut assessment = self.get(id)?;
        assessment.sections = sections;
        assessment.updated_at = self.clock.now();
        self.repository.update_assessment(assessment.clone())?;
        Ok(assessment)
    }

    pub fn delete(&self, id: AssessmentId) -> Result<(), CatalogError> {
        self.repository.delete_assessment(id)?;
        info!(assessment_id = %id, "assessment deleted");
        Ok(())
    }
}

/// Error raised by the assessment catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("assessment definition has {} problem(s)", .0.len())]
    Invalid(Vec<DefinitionError>),
    #[error("an assessment already exists for job {job_id} at stage {stage}")]
    AlreadyExists { job_id: JobId, stage: PipelineStage },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
