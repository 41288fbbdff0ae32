use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use super::bank::{QuestionBank, GENERAL_TAG};
use super::clock::{Clock, SystemClock};
use super::directory::Job;
use super::domain::{Assessment, JobId, PipelineStage, Question, QuestionCategory, Section};
use super::repository::{AssessmentRepository, QuestionRepository, RepositoryError};
use super::shuffle::shuffle;

/// Section sizes and the technical backfill threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPlan {
    pub aptitude: usize,
    pub technical: usize,
    pub management: usize,
    /// Role-tagged technical questions below this count are topped up from `general` ones.
    pub technical_threshold: usize,
}

impl Default for GenerationPlan {
    fn default() -> Self {
        Self {
            aptitude: 10,
            technical: 20,
            management: 7,
            technical_threshold: 20,
        }
    }
}

/// Seed shared by every generation of the same `(job, stage)` pair.
pub fn stage_seed(job_id: JobId, stage: PipelineStage) -> u64 {
    job_id
        .0
        .wrapping_mul(1000)
        .wrapping_add(stage.label().len() as u64)
}

/// Composes and persists assessments from the question bank.
pub struct AssessmentGenerator<Q, A> {
    bank: QuestionBank<Q>,
    assessments: Arc<A>,
    clock: Arc<dyn Clock>,
    plan: GenerationPlan,
}

impl<Q, A> AssessmentGenerator<Q, A>
where
    Q: QuestionRepository + 'static,
    A: AssessmentRepository + 'static,
{
    pub fn new(questions: Arc<Q>, assessments: Arc<A>, plan: GenerationPlan) -> Self {
        Self::with_parts(
            QuestionBank::new(questions),
            assessments,
            Arc::new(SystemClock),
            plan,
        )
    }

    pub fn with_parts(
        bank: QuestionBank<Q>,
        assessments: Arc<A>,
        clock: Arc<dyn Clock>,
        plan: GenerationPlan,
    ) -> Self {
        Self {
            bank,
            assessments,
            clock,
            plan,
        }
    }

    pub fn bank(&self) -> &QuestionBank<Q> {
        &self.bank
    }

    pub fn plan(&self) -> GenerationPlan {
        self.plan
    }

    /// Generates and stores the assessment for `job` at `stage`.
    ///
    /// Fails with [`GenerationError::AlreadyGenerated`] when the pair already has one; use
    /// [`ensure_assessment`](Self::ensure_assessment) for the idempotent form.
    pub fn generate(&self, job: &Job, stage: PipelineStage) -> Result<Assessment, GenerationError> {
        if self.assessments.assessment_for(job.id, stage)?.is_some() {
            return Err(GenerationError::AlreadyGenerated {
                job_id: job.id,
                stage,
            });
        }

        let sections = self.compose(job, stage)?;
        let now = self.clock.now();
        let assessment = Assessment {
            id: self.assessments.next_assessment_id()?,
            job_id: job.id,
            stage,
            title: format!("{} Assessment", job.title),
            sections,
            created_at: now,
            updated_at: now,
        };

        let stored = self
            .assessments
            .insert_assessment(assessment)
            .map_err(|err| match err {
                RepositoryError::Conflict => GenerationError::AlreadyGenerated {
                    job_id: job.id,
                    stage,
                },
                other => GenerationError::Repository(other),
            })?;

        info!(
            job_id = %job.id,
            %stage,
            assessment_id = %stored.id,
            questions = stored.question_count(),
            "assessment generated"
        );
        Ok(stored)
    }

    /// Returns the stored assessment for the pair, generating it on first use.
    pub fn ensure_assessment(
        &self,
        job: &Job,
        stage: PipelineStage,
    ) -> Result<Assessment, GenerationError> {
        if let Some(existing) = self.assessments.assessment_for(job.id, stage)? {
            return Ok(existing);
        }
        match self.generate(job, stage) {
            Err(GenerationError::AlreadyGenerated { .. }) => self
                .assessments
                .assessment_for(job.id, stage)?
                .ok_or(GenerationError::Repository(RepositoryError::NotFound)),
            result => result,
        }
    }

    /// Generates the missing assessments for `jobs` at `stage`, returning only the new ones.
    pub fn ensure_for_jobs(
        &self,
        jobs: &[Job],
        stage: PipelineStage,
    ) -> Result<Vec<Assessment>, GenerationError> {
        let mut created = Vec::new();
        for job in jobs {
            if self.assessments.assessment_for(job.id, stage)?.is_some() {
                continue;
            }
            created.push(self.generate(job, stage)?);
        }
        info!(%stage, jobs = jobs.len(), created = created.len(), "assessment backfill finished");
        Ok(created)
    }

    /// Builds the three sections without storing anything.
    ///
    /// Seeds the bank first when it is empty; starved categories yield empty sections.
    pub fn compose(&self, job: &Job, stage: PipelineStage) -> Result<Vec<Section>, GenerationError> {
        if self.bank.ensure_seeded()? {
            warn!(job_id = %job.id, "question bank was empty; seeded before sampling");
        }

        let seed = stage_seed(job.id, stage);

        let aptitude = sample(
            self.bank.by_category(QuestionCategory::Aptitude)?,
            seed,
            self.plan.aptitude,
        );
        let technical = sample(
            self.technical_pool(job)?,
            seed.wrapping_add(1),
            self.plan.technical,
        );
        let management = sample(
            self.bank.by_category(QuestionCategory::Management)?,
            seed.wrapping_add(2),
            self.plan.management,
        );

        Ok(vec![
            section(1, "Aptitude", aptitude),
            section(2, "Technical", technical),
            section(3, "Management", management),
        ])
    }

    fn technical_pool(&self, job: &Job) -> Result<Vec<Question>, GenerationError> {
        let technical = self.bank.by_category(QuestionCategory::Technical)?;
        let mut pool: Vec<Question> = technical
            .iter()
            .filter(|question| question.has_tag(&job.title))
            .cloned()
            .collect();

        if pool.len() < self.plan.technical_threshold {
            let taken: BTreeSet<_> = pool.iter().map(|question| question.id).collect();
            pool.extend(
                technical
                    .into_iter()
                    .filter(|question| question.has_tag(GENERAL_TAG) && !taken.contains(&question.id)),
            );
        }
        Ok(pool)
    }
}

fn sample(questions: Vec<Question>, seed: u64, take: usize) -> Vec<Question> {
    shuffle(questions, seed).into_iter().take(take).collect()
}

fn section(id: u32, title: &str, questions: Vec<Question>) -> Section {
    Section {
        id,
        title: title.to_string(),
        questions,
    }
}

/// Error raised by the generator.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("assessment already exists for job {job_id} at stage {stage}")]
    AlreadyGenerated { job_id: JobId, stage: PipelineStage },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
