use super::super::domain::{AnswerValue, Answers, ConditionOperator, Question, Section};

/// Whether `question` is visible given the answers so far.
///
/// Only the direct dependency's answer is consulted; a hidden dependency does not hide its
/// dependents on its own.
pub fn should_show(question: &Question, answers: &Answers) -> bool {
    let Some(rule) = &question.conditional else {
        return true;
    };
    let answer = answers.get(&rule.depends_on);

    match rule.operator {
        ConditionOperator::Equals => answer == Some(&rule.value),
        ConditionOperator::NotEquals => answer != Some(&rule.value),
        ConditionOperator::Contains => match (answer, &rule.value) {
            (Some(AnswerValue::Choices(choices)), AnswerValue::Text(wanted)) => {
                choices.iter().any(|choice| choice == wanted)
            }
            _ => false,
        },
        ConditionOperator::Unknown => true,
    }
}

/// Questions of `section` that pass [`should_show`], in section order.
pub fn visible_questions<'a>(section: &'a Section, answers: &Answers) -> Vec<&'a Question> {
    section
        .questions
        .iter()
        .filter(|question| should_show(question, answers))
        .collect()
}
