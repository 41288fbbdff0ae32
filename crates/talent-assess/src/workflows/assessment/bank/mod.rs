//! Question bank: the catalog of evaluable prompts and its filtered lookups.

mod catalog;

use std::sync::Arc;

use tracing::info;

use super::domain::{Question, QuestionCategory};
use super::repository::{QuestionRepository, RepositoryError};

pub use catalog::{standard_catalog, GENERAL_TAG};

/// Read access to the bank plus the administrative reseed operations.
pub struct QuestionBank<R> {
    repository: Arc<R>,
    catalog: Vec<Question>,
}

impl<R> QuestionBank<R>
where
    R: QuestionRepository + 'static,
{
    /// Bank backed by the built-in catalog.
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_catalog(repository, standard_catalog())
    }

    pub fn with_catalog(repository: Arc<R>, catalog: Vec<Question>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    pub fn by_category(&self, category: QuestionCategory) -> Result<Vec<Question>, RepositoryError> {
        self.repository.questions_in(category)
    }

    /// Questions carrying at least one of `tags`.
    pub fn by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Result<Vec<Question>, RepositoryError> {
        Ok(self
            .repository
            .all_questions()?
            .into_iter()
            .filter(|question| tags.iter().any(|tag| question.has_tag(tag.as_ref())))
            .collect())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.repository.question_count()? == 0)
    }

    /// Clears the stored bank and writes the catalog in its place. Returns the stored count.
    pub fn reseed(&self) -> Result<usize, RepositoryError> {
        let count = self.catalog.len();
        self.repository.replace_questions(self.catalog.clone())?;
        info!(count, "question bank reseeded");
        Ok(count)
    }

    /// Reseeds only when the bank holds no questions. Returns whether a seed happened.
    pub fn ensure_seeded(&self) -> Result<bool, RepositoryError> {
        if self.is_empty()? {
            self.reseed()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
