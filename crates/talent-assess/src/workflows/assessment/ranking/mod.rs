//! Keep-latest deduplication and ranking of submitted responses.

mod export;
mod summary;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::directory::{Candidate, TalentDirectory};
use super::domain::{
    Assessment, AssessmentId, CandidateId, JobId, PipelineStage, ResponseId, ResponseRecord,
};
use super::repository::{AssessmentRepository, RepositoryError, ResponseRepository};
use super::scoring::{ScoreCard, ScoringEngine};

pub use export::ExportError;
pub use summary::LeaderboardSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based position after sorting.
    pub rank: usize,
    pub candidate: Candidate,
    pub response_id: ResponseId,
    pub submitted_at: DateTime<Utc>,
    pub score: ScoreCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    UnknownCandidate,
    MissingContactDetails,
}

/// A deduplicated submission left out of the ranking because its candidate does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub candidate_id: CandidateId,
    pub response_id: ResponseId,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub assessment_id: AssessmentId,
    pub entries: Vec<RankedEntry>,
    pub excluded: Vec<Exclusion>,
}

impl Leaderboard {
    pub fn summary(&self) -> LeaderboardSummary {
        LeaderboardSummary::from_entries(&self.entries)
    }
}

/// Keeps the latest submission per candidate, drops unresolvable candidates, and sorts by
/// percentage, highest first.
///
/// Drafts and rows of other assessments are ignored. Equal percentages keep the order in
/// which each candidate was first encountered, even when a later row replaced theirs.
pub fn deduplicate_and_rank(
    engine: &ScoringEngine,
    assessment: &Assessment,
    responses: Vec<ResponseRecord>,
    candidates: &[Candidate],
) -> Leaderboard {
    let mut latest: Vec<(CandidateId, DateTime<Utc>, ResponseRecord)> = Vec::new();
    let mut positions: HashMap<CandidateId, usize> = HashMap::new();
    for record in responses {
        if record.assessment_id != assessment.id {
            continue;
        }
        let Some(submitted_at) = record.submitted_at() else {
            continue;
        };
        match positions.get(&record.candidate_id) {
            Some(&index) => {
                if submitted_at > latest[index].1 {
                    latest[index] = (record.candidate_id, submitted_at, record);
                }
            }
            None => {
                positions.insert(record.candidate_id, latest.len());
                latest.push((record.candidate_id, submitted_at, record));
            }
        }
    }

    let directory: HashMap<CandidateId, &Candidate> = candidates
        .iter()
        .map(|candidate| (candidate.id, candidate))
        .collect();

    let mut excluded = Vec::new();
    let mut entries = Vec::new();
    for (candidate_id, submitted_at, record) in latest {
        let candidate = match directory.get(&candidate_id) {
            Some(candidate) if candidate.has_contact_details() => *candidate,
            found => {
                let reason = if found.is_some() {
                    ExclusionReason::MissingContactDetails
                } else {
                    ExclusionReason::UnknownCandidate
                };
                warn!(%candidate_id, response_id = record.id.0, ?reason, "submission excluded from ranking");
                excluded.push(Exclusion {
                    candidate_id,
                    response_id: record.id,
                    reason,
                });
                continue;
            }
        };

        entries.push(RankedEntry {
            rank: 0,
            candidate: candidate.clone(),
            response_id: record.id,
            submitted_at,
            score: engine.score(assessment, &record.answers),
        });
    }

    entries.sort_by(|a, b| b.score.percentage.cmp(&a.score.percentage));
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = position + 1;
    }

    Leaderboard {
        assessment_id: assessment.id,
        entries,
        excluded,
    }
}

/// Resolves a job's assessment and ranks its submissions against the directory.
pub struct RankingService<A, R, D> {
    assessments: Arc<A>,
    responses: Arc<R>,
    directory: Arc<D>,
    engine: ScoringEngine,
}

impl<A, R, D> RankingService<A, R, D>
where
    A: AssessmentRepository + 'static,
    R: ResponseRepository + 'static,
    D: TalentDirectory + 'static,
{
    pub fn new(assessments: Arc<A>, responses: Arc<R>, directory: Arc<D>) -> Self {
        Self {
            assessments,
            responses,
            directory,
            engine: ScoringEngine::new(),
        }
    }

    /// Leaderboard for the job's assessment at `stage`; `None` when no assessment exists.
    pub fn rank_job(
        &self,
        job_id: JobId,
        stage: PipelineStage,
    ) -> Result<Option<Leaderboard>, RepositoryError> {
        let Some(assessment) = self.assessments.assessment_for(job_id, stage)? else {
            return Ok(None);
        };
        let responses = self.responses.responses_for_assessment(assessment.id)?;
        let candidates = self.directory.candidates_for_job(job_id)?;

        let leaderboard = deduplicate_and_rank(&self.engine, &assessment, responses, &candidates);
        info!(
            %job_id,
            %stage,
            ranked = leaderboard.entries.len(),
            excluded = leaderboard.excluded.len(),
            "job ranked"
        );
        Ok(Some(leaderboard))
    }
}
