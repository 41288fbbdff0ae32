use std::fmt;

use serde::Serialize;

use super::domain::{
    letter_index, AnswerKey, AnswerValue, Answers, Assessment, Question, QuestionId, QuestionKind,
    ResponseRecord,
};
use super::lifecycle::LifecycleViolation;

/// Lower-cased fragments marking a prompt as non-gradable whatever its type.
const UNGRADED_TERMS: [&str; 2] = ["experience", "resume"];

/// Grading result of one counted question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub correct: u32,
    pub wrong: u32,
    pub total: u32,
    pub percentage: u32,
    pub outcomes: Vec<QuestionOutcome>,
}

impl ScoreCard {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_percentage(self.percentage)
    }
}

/// `round(correct / total * 100)`, or 0 when nothing was counted.
pub fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(correct) / f64::from(total) * 100.0).round() as u32
}

/// Display buckets used by the ranking view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsReview,
}

impl ScoreBand {
    pub const EXCELLENT_FROM: u32 = 80;
    pub const PASS_FROM: u32 = 60;

    pub const fn for_percentage(percentage: u32) -> Self {
        if percentage >= Self::EXCELLENT_FROM {
            ScoreBand::Excellent
        } else if percentage >= Self::PASS_FROM {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsReview
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsReview => "Needs Review",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single grading routine shared by every consumer of scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Whether `question` counts toward the total.
    pub fn is_gradable(&self, question: &Question) -> bool {
        if question.kind == QuestionKind::FileUpload {
            return false;
        }
        let text = question.text.to_lowercase();
        if UNGRADED_TERMS.iter().any(|term| text.contains(term)) {
            return false;
        }
        question.kind.is_choice() && question.correct_answer.is_some() && !question.options.is_empty()
    }

    pub fn score(&self, assessment: &Assessment, answers: &Answers) -> ScoreCard {
        let outcomes: Vec<QuestionOutcome> = assessment
            .questions()
            .filter(|question| self.is_gradable(question))
            .map(|question| QuestionOutcome {
                question_id: question.id,
                correct: grade(question, answers.get(&question.id)),
            })
            .collect();

        let total = outcomes.len() as u32;
        let correct = outcomes.iter().filter(|outcome| outcome.correct).count() as u32;
        ScoreCard {
            correct,
            wrong: total - correct,
            total,
            percentage: percentage(correct, total),
            outcomes,
        }
    }

    /// Scores a stored submission, refusing drafts and rows of another assessment.
    pub fn score_response(
        &self,
        assessment: &Assessment,
        response: &ResponseRecord,
    ) -> Result<ScoreCard, LifecycleViolation> {
        if response.assessment_id != assessment.id {
            return Err(LifecycleViolation::AssessmentMismatch {
                expected: assessment.id,
                found: response.assessment_id,
            });
        }
        if !response.is_submitted() {
            return Err(LifecycleViolation::NotSubmitted);
        }
        Ok(self.score(assessment, &response.answers))
    }
}

fn option_text<'q>(question: &'q Question, letter: &str) -> Option<&'q str> {
    letter_index(letter)
        .and_then(|index| question.options.get(index))
        .map(String::as_str)
}

fn grade(question: &Question, answer: Option<&AnswerValue>) -> bool {
    let Some(key) = &question.correct_answer else {
        return false;
    };

    match question.kind {
        QuestionKind::SingleChoice => {
            let letter = match key {
                AnswerKey::Single(letter) => Some(letter.as_str()),
                AnswerKey::Multiple(letters) => letters.first().map(String::as_str),
            };
            let expected = letter.and_then(|letter| option_text(question, letter));
            match (expected, answer.and_then(AnswerValue::as_text)) {
                (Some(expected), Some(given)) => expected == given,
                _ => false,
            }
        }
        QuestionKind::MultiChoice => {
            let mut expected: Vec<&str> = key
                .letters()
                .into_iter()
                .filter_map(|letter| option_text(question, letter))
                .collect();
            let mut given: Vec<&str> = answer
                .and_then(AnswerValue::as_choices)
                .map(|choices| choices.iter().map(String::as_str).collect())
                .unwrap_or_default();
            expected.sort_unstable();
            given.sort_unstable();
            expected == given
        }
        _ => false,
    }
}
