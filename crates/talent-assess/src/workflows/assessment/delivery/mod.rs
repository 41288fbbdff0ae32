//! Branching and validation applied while a candidate works through an assessment.

mod branching;
mod validation;

pub use branching::{should_show, visible_questions};
pub use validation::{
    progress, validate, validate_assessment, validate_section, FieldError, SectionReport,
    ValidationReport,
};
