use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use talent_assess::config::AppConfig;
use talent_assess::error::AppError;
use talent_assess::workflows::assessment::{
    Answers, GenerationPlan, MemoryDirectory, MemoryStore, NewAssessment, PipelineStage, Roster,
    StoreSnapshot,
};
use tracing::{debug, warn};

/// Store and directory hydrated from disk for the duration of one command.
pub(crate) struct Workspace {
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) directory: Arc<MemoryDirectory>,
    pub(crate) plan: GenerationPlan,
    data_path: PathBuf,
}

impl Workspace {
    pub(crate) fn open(config: &AppConfig) -> Result<Self, AppError> {
        let snapshot: StoreSnapshot = read_json_or_default(&config.storage.data_path)?;
        debug!(
            path = %config.storage.data_path.display(),
            assessments = snapshot.assessments.len(),
            responses = snapshot.responses.len(),
            "store loaded"
        );
        let roster: Roster = read_json_or_default(&config.storage.roster_path)?;
        if roster.jobs.is_empty() {
            warn!(path = %config.storage.roster_path.display(), "roster has no jobs");
        }

        Ok(Self {
            store: Arc::new(MemoryStore::from_snapshot(snapshot)),
            directory: Arc::new(MemoryDirectory::from_roster(roster)),
            plan: config.generation,
            data_path: config.storage.data_path.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn ephemeral(directory: MemoryDirectory) -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            directory: Arc::new(directory),
            plan: GenerationPlan::default(),
            data_path: PathBuf::new(),
        }
    }

    /// Writes the store back to its snapshot file.
    pub(crate) fn persist(&self) -> Result<(), AppError> {
        let snapshot = self.store.snapshot()?;
        let body = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.data_path, body)?;
        Ok(())
    }
}

fn read_json_or_default<T>(path: &Path) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    match fs::read_to_string(path) {
        Ok(body) => Ok(serde_json::from_str(&body)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(err.into()),
    }
}

/// Answers file: a JSON object keyed by question id.
pub(crate) fn read_answers(path: &Path) -> Result<Answers, AppError> {
    let body = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&body)?)
}

pub(crate) fn read_definition(path: &Path) -> Result<NewAssessment, AppError> {
    let body = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&body)?)
}

pub(crate) fn parse_stage(value: &str) -> Result<PipelineStage, String> {
    value.parse()
}
