use std::collections::BTreeMap;

use super::super::domain::{
    AnswerValue, Answers, Assessment, Question, QuestionId, QuestionKind, Section,
};
use super::branching::{should_show, visible_questions};

/// One human-readable problem with an answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,
    #[error("Maximum {max} characters allowed")]
    TooLong { max: usize },
    #[error("Must be a valid number")]
    NotANumber,
    #[error("Minimum value is {min}")]
    BelowMinimum { min: f64 },
    #[error("Maximum value is {max}")]
    AboveMaximum { max: f64 },
    #[error("File type must be one of {}", .allowed.join(", "))]
    FileTypeNotAllowed { allowed: Vec<String> },
}

/// Checks one answer against the question's type-specific rules.
///
/// Empty optional answers produce no errors.
pub fn validate(question: &Question, answer: Option<&AnswerValue>) -> Vec<FieldError> {
    let Some(value) = answer.filter(|value| !value.is_empty()) else {
        return if question.required {
            vec![FieldError::Required]
        } else {
            Vec::new()
        };
    };

    let mut errors = Vec::new();
    let rules = &question.validation;

    if let Some(max) = rules.max_length {
        let length = match value {
            AnswerValue::Text(text) => Some(text.chars().count()),
            AnswerValue::Choices(choices) => Some(choices.len()),
            AnswerValue::Number(_) => None,
        };
        if length.is_some_and(|length| length > max) {
            errors.push(FieldError::TooLong { max });
        }
    }

    if question.kind == QuestionKind::Numeric {
        match numeric_value(value) {
            None => errors.push(FieldError::NotANumber),
            Some(number) => {
                if let Some(min) = rules.min.filter(|min| number < *min) {
                    errors.push(FieldError::BelowMinimum { min });
                }
                if let Some(max) = rules.max.filter(|max| number > *max) {
                    errors.push(FieldError::AboveMaximum { max });
                }
            }
        }
    }

    if question.kind == QuestionKind::FileUpload && !rules.allowed_types.is_empty() {
        let accepted = value.as_text().is_some_and(|name| {
            let name = name.to_ascii_lowercase();
            rules
                .allowed_types
                .iter()
                .any(|ext| name.ends_with(&ext.to_ascii_lowercase()))
        });
        if !accepted {
            errors.push(FieldError::FileTypeNotAllowed {
                allowed: rules.allowed_types.clone(),
            });
        }
    }

    errors
}

fn numeric_value(value: &AnswerValue) -> Option<f64> {
    let number = match value {
        AnswerValue::Number(number) => *number,
        AnswerValue::Text(text) => text.trim().parse::<f64>().ok()?,
        AnswerValue::Choices(_) => return None,
    };
    number.is_finite().then_some(number)
}

/// Errors of the visible questions in one section; questions without errors are omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub section_id: u32,
    pub errors: BTreeMap<QuestionId, Vec<FieldError>>,
}

impl SectionReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub sections: Vec<SectionReport>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.sections.iter().all(SectionReport::is_valid)
    }

    /// Id of the first section holding an error, for jumping the candidate back to it.
    pub fn first_invalid_section(&self) -> Option<u32> {
        self.sections
            .iter()
            .find(|section| !section.is_valid())
            .map(|section| section.section_id)
    }

    pub fn errors_for(&self, question_id: QuestionId) -> &[FieldError] {
        self.sections
            .iter()
            .find_map(|section| section.errors.get(&question_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn error_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| section.errors.values())
            .map(Vec::len)
            .sum()
    }
}

/// Validates the currently visible questions of `section`; hidden ones are skipped.
pub fn validate_section(section: &Section, answers: &Answers) -> SectionReport {
    let errors = visible_questions(section, answers)
        .into_iter()
        .filter_map(|question| {
            let errors = validate(question, answers.get(&question.id));
            (!errors.is_empty()).then_some((question.id, errors))
        })
        .collect();

    SectionReport {
        section_id: section.id,
        errors,
    }
}

pub fn validate_assessment(assessment: &Assessment, answers: &Answers) -> ValidationReport {
    ValidationReport {
        sections: assessment
            .sections
            .iter()
            .map(|section| validate_section(section, answers))
            .collect(),
    }
}

/// Percent of visible questions holding a non-empty answer; 0 when nothing is visible.
pub fn progress(assessment: &Assessment, answers: &Answers) -> u32 {
    let visible: Vec<&Question> = assessment
        .questions()
        .filter(|question| should_show(question, answers))
        .collect();
    if visible.is_empty() {
        return 0;
    }

    let answered = visible
        .iter()
        .filter(|question| {
            answers
                .get(&question.id)
                .is_some_and(|answer| !answer.is_empty())
        })
        .count();
    (answered as f64 / visible.len() as f64 * 100.0).round() as u32
}
