use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, JobId, PipelineStage};
use super::repository::RepositoryError;

/// Job posting fields this subsystem needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
}

/// Candidate fields this subsystem needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub job_id: JobId,
    pub name: String,
    pub email: String,
    pub stage: PipelineStage,
}

impl Candidate {
    /// Ranking only lists candidates with both a name and an email on file.
    pub fn has_contact_details(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Read-only view of the jobs and candidates subsystem.
pub trait TalentDirectory: Send + Sync {
    fn job(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;
    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn candidates_for_job(&self, job_id: JobId) -> Result<Vec<Candidate>, RepositoryError>;
    fn jobs(&self) -> Result<Vec<Job>, RepositoryError>;
}

/// Jobs and candidates loaded from a roster file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    jobs: BTreeMap<JobId, Job>,
    candidates: BTreeMap<CandidateId, Candidate>,
}

/// In-process directory used by the CLI and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl MemoryDirectory {
    pub fn from_roster(roster: Roster) -> Self {
        let state = DirectoryState {
            jobs: roster.jobs.into_iter().map(|job| (job.id, job)).collect(),
            candidates: roster
                .candidates
                .into_iter()
                .map(|candidate| (candidate.id, candidate))
                .collect(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn upsert_job(&self, job: Job) -> Result<(), RepositoryError> {
        self.write(|state| {
            state.jobs.insert(job.id, job);
        })
    }

    pub fn upsert_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        self.write(|state| {
            state.candidates.insert(candidate.id, candidate);
        })
    }

    fn write<T>(&self, f: impl FnOnce(&mut DirectoryState) -> T) -> Result<T, RepositoryError> {
        let mut state = self.lock()?;
        Ok(f(&mut state))
    }

    fn read<T>(&self, f: impl FnOnce(&DirectoryState) -> T) -> Result<T, RepositoryError> {
        let state = self.lock()?;
        Ok(f(&state))
    }

    fn lock(&self) -> Result<MutexGuard<'_, DirectoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("directory lock poisoned".to_string()))
    }
}

impl TalentDirectory for MemoryDirectory {
    fn job(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        self.read(|state| state.jobs.get(&id).cloned())
    }

    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.read(|state| state.candidates.get(&id).cloned())
    }

    fn candidates_for_job(&self, job_id: JobId) -> Result<Vec<Candidate>, RepositoryError> {
        self.read(|state| {
            state
                .candidates
                .values()
                .filter(|candidate| candidate.job_id == job_id)
                .cloned()
                .collect()
        })
    }

    fn jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        self.read(|state| state.jobs.values().cloned().collect())
    }
}
