use std::io::Write;

use serde::Serialize;

use super::Leaderboard;

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "failed to write leaderboard: {}", err),
            ExportError::Csv(err) => write!(f, "failed to encode leaderboard CSV: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Serialize)]
struct LeaderboardRow<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Candidate")]
    name: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Correct")]
    correct: u32,
    #[serde(rename = "Total")]
    total: u32,
    #[serde(rename = "Percentage")]
    percentage: u32,
    #[serde(rename = "Band")]
    band: &'static str,
    #[serde(rename = "Submitted At")]
    submitted_at: String,
}

impl Leaderboard {
    /// Writes one CSV row per ranked entry, headers first.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
        for entry in &self.entries {
            csv_writer.serialize(LeaderboardRow {
                rank: entry.rank,
                name: &entry.candidate.name,
                email: &entry.candidate.email,
                correct: entry.score.correct,
                total: entry.score.total,
                percentage: entry.score.percentage,
                band: entry.score.band().label(),
                submitted_at: entry.submitted_at.to_rfc3339(),
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
