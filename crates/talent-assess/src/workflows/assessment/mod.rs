//! Candidate assessments: question bank, seeded generation, branching delivery, the
//! draft/submit lifecycle, scoring, and ranking.
//!
//! Storage and the job/candidate directory sit behind traits so the services run against
//! the in-memory implementations here or any other store.

pub mod bank;
pub mod clock;
pub mod definition;
pub mod delivery;
pub mod directory;
pub mod domain;
pub mod generator;
pub mod lifecycle;
pub mod ranking;
pub mod repository;
pub mod scoring;
pub mod shuffle;
pub mod store;

#[cfg(test)]
mod tests;

pub use bank::{standard_catalog, QuestionBank, GENERAL_TAG};
pub use clock::{Clock, SystemClock};
pub use definition::{AssessmentCatalog, CatalogError, DefinitionError};
pub use delivery::{
    progress, should_show, validate, validate_assessment, validate_section, visible_questions,
    FieldError, SectionReport, ValidationReport,
};
pub use directory::{Candidate, Job, MemoryDirectory, Roster, TalentDirectory};
pub use domain::{
    letter_index, AnswerKey, AnswerValue, Answers, Assessment, AssessmentId, CandidateId,
    ConditionOperator, ConditionalRule, Difficulty, JobId, NewAssessment, PipelineStage,
    Question, QuestionCategory, QuestionId, QuestionKind, ResponseId, ResponseRecord,
    ResponseState, Section, ValidationRules,
};
pub use generator::{stage_seed, AssessmentGenerator, GenerationError, GenerationPlan};
pub use lifecycle::{LifecycleViolation, ResponseService, ResponseServiceError, ResumeState};
pub use ranking::{
    deduplicate_and_rank, Exclusion, ExclusionReason, ExportError, Leaderboard,
    LeaderboardSummary, RankedEntry, RankingService,
};
pub use repository::{
    AssessmentRepository, QuestionRepository, RepositoryError, ResponseRepository,
};
pub use scoring::{percentage, QuestionOutcome, ScoreBand, ScoreCard, ScoringEngine};
pub use shuffle::{shuffle, SeededRandom};
pub use store::{MemoryStore, StoreSnapshot};
