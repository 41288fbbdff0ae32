use std::collections::BTreeSet;

use super::super::domain::{
    AnswerKey, Difficulty, Question, QuestionCategory, QuestionId, QuestionKind, ValidationRules,
};
use QuestionCategory::{Aptitude, Management, Technical};

/// Tag shared by technical questions that suit every role.
pub const GENERAL_TAG: &str = "general";

/// The built-in bank, ids assigned sequentially from 1.
pub fn standard_catalog() -> Vec<Question> {
    aptitude()
        .into_iter()
        .chain(frontend())
        .chain(backend())
        .chain(general_technical())
        .chain(management())
        .enumerate()
        .map(|(index, mut question)| {
            question.id = QuestionId(index as u32 + 1);
            question
        })
        .collect()
}

fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|tag| tag.to_string()).collect()
}

fn single(
    category: QuestionCategory,
    tag_values: &[&str],
    difficulty: Difficulty,
    text: &str,
    options: [&str; 4],
    key: &str,
) -> Question {
    Question {
        id: QuestionId(0),
        kind: QuestionKind::SingleChoice,
        category,
        tags: tags(tag_values),
        difficulty,
        text: text.to_string(),
        options: options.iter().map(|option| option.to_string()).collect(),
        correct_answer: Some(AnswerKey::Single(key.to_string())),
        required: false,
        validation: ValidationRules::default(),
        conditional: None,
    }
}

fn multi(
    category: QuestionCategory,
    tag_values: &[&str],
    difficulty: Difficulty,
    text: &str,
    options: [&str; 4],
    keys: &[&str],
) -> Question {
    Question {
        kind: QuestionKind::MultiChoice,
        correct_answer: Some(AnswerKey::Multiple(
            keys.iter().map(|key| key.to_string()).collect(),
        )),
        ..single(category, tag_values, difficulty, text, options, "A")
    }
}

fn open(
    kind: QuestionKind,
    category: QuestionCategory,
    tag_values: &[&str],
    text: &str,
    validation: ValidationRules,
) -> Question {
    Question {
        id: QuestionId(0),
        kind,
        category,
        tags: tags(tag_values),
        difficulty: Difficulty::Easy,
        text: text.to_string(),
        options: Vec::new(),
        correct_answer: None,
        required: false,
        validation,
        conditional: None,
    }
}

// Catalog tables below keep one question per line.
#[rustfmt::skip]
fn aptitude() -> Vec<Question> {
    use Difficulty::{Easy, Hard, Medium};
    vec![
        single(Aptitude, &[], Easy, "What is 15% of 200?", ["25", "30", "35", "40"], "B"),
        single(Aptitude, &[], Easy, "If 5 apples cost $10, what is the cost of 8 apples?", ["$14", "$16", "$18", "$20"], "B"),
        single(Aptitude, &[], Medium, "A train travels 240 km in 3 hours. What is its average speed?", ["70 km/h", "80 km/h", "90 km/h", "100 km/h"], "B"),
        single(Aptitude, &[], Medium, "What is the next number in the sequence: 2, 6, 18, 54, ?", ["108", "162", "216", "270"], "B"),
        single(Aptitude, &[], Hard, "If the ratio of boys to girls in a class is 3:2 and there are 15 boys, how many girls are there?", ["8", "10", "12", "15"], "B"),
        single(Aptitude, &[], Easy, "All cats are animals. Some animals are pets. Therefore:", ["All cats are pets", "Some cats may be pets", "No cats are pets", "All pets are cats"], "B"),
        single(Aptitude, &[], Medium, "If A > B and B > C, then:", ["A < C", "A = C", "A > C", "Cannot determine"], "C"),
        single(Aptitude, &[], Hard, "In a certain code, FLOWER is written as EKNVDQ. How is GARDEN written?", ["FZQCDM", "FZQCEN", "FZQDEM", "GZQDEM"], "A"),
        single(Aptitude, &[], Easy, "Choose the synonym of \"Abundant\":", ["Scarce", "Plentiful", "Limited", "Rare"], "B"),
        single(Aptitude, &[], Medium, "Choose the antonym of \"Optimistic\":", ["Hopeful", "Positive", "Pessimistic", "Confident"], "C"),
        single(Aptitude, &[], Easy, "What is 25% of 80?", ["15", "20", "25", "30"], "B"),
        single(Aptitude, &[], Medium, "Complete the pattern: 1, 4, 9, 16, ?", ["20", "25", "30", "36"], "B"),
        single(Aptitude, &[], Hard, "If it takes 5 machines 5 minutes to make 5 widgets, how long would it take 100 machines to make 100 widgets?", ["5 minutes", "20 minutes", "100 minutes", "500 minutes"], "A"),
        single(Aptitude, &[], Medium, "Choose the word that best completes: Book is to Reading as Fork is to ?", ["Eating", "Kitchen", "Spoon", "Food"], "A"),
        single(Aptitude, &[], Hard, "If some Bloops are Razzles and all Razzles are Lazzles, then some Bloops are definitely Lazzles.", ["True", "False", "Cannot be determined", "Insufficient information"], "A"),
    ]
}

#[rustfmt::skip]
fn frontend() -> Vec<Question> {
    use Difficulty::{Easy, Hard, Medium};
    let role = &["Frontend Developer"];
    vec![
        single(Technical, role, Easy, "What is HTML?", ["HyperText Markup Language", "High Tech Modern Language", "Home Tool Markup Language", "Hyperlink and Text Markup Language"], "A"),
        single(Technical, role, Easy, "What does CSS stand for?", ["Cascading Style Sheets", "Computer Style Sheets", "Creative Style Sheets", "Colorful Style Sheets"], "A"),
        single(Technical, role, Medium, "What is the Virtual DOM in React?", ["Virtual representation of DOM", "Database structure", "CSS framework", "Testing tool"], "A"),
        single(Technical, role, Medium, "How do you handle state in React?", ["useState and useReducer", "Only props", "Global variables", "Local storage"], "A"),
        single(Technical, role, Medium, "What is CSS Grid?", ["2D layout system", "1D layout system", "Animation library", "Color scheme"], "A"),
        single(Technical, role, Medium, "What is responsive design?", ["Design that adapts to screen sizes", "Fast loading design", "Interactive design", "Colorful design"], "A"),
        single(Technical, role, Hard, "What is JavaScript closure?", ["Function with access to outer scope", "Loop structure", "Data type", "Error handling"], "A"),
        single(Technical, role, Hard, "What is the difference between let and var?", ["let has block scope, var has function scope", "No difference", "var is newer", "let is faster"], "A"),
        single(Technical, role, Hard, "What is webpack?", ["Module bundler", "Testing framework", "Database", "CSS preprocessor"], "A"),
        single(Technical, role, Hard, "What is TypeScript?", ["JavaScript with static typing", "New programming language", "CSS framework", "Database query language"], "A"),
        single(Technical, role, Easy, "What is DOM?", ["Document Object Model", "Data Object Model", "Dynamic Object Model", "Database Object Model"], "A"),
        single(Technical, role, Medium, "What is SASS?", ["CSS preprocessor", "JavaScript framework", "Database", "Testing tool"], "A"),
        single(Technical, role, Medium, "What is JSX?", ["JavaScript XML", "Java Syntax Extension", "JSON XML", "JavaScript eXtension"], "A"),
        single(Technical, role, Hard, "What is Redux?", ["State management library", "CSS framework", "Database", "Testing framework"], "A"),
        single(Technical, role, Hard, "What is Next.js?", ["React framework", "CSS framework", "Database", "Testing tool"], "A"),
    ]
}

#[rustfmt::skip]
fn backend() -> Vec<Question> {
    use Difficulty::{Easy, Hard, Medium};
    let role = &["Backend Developer"];
    vec![
        single(Technical, role, Easy, "Which HTTP method is idempotent?", ["POST", "PUT", "PATCH", "CONNECT"], "B"),
        single(Technical, role, Medium, "What does an index on a database column primarily improve?", ["Write throughput", "Read lookups", "Disk usage", "Backup speed"], "B"),
        single(Technical, role, Medium, "Which status code signals a missing resource?", ["200", "301", "404", "500"], "C"),
        single(Technical, role, Hard, "What isolation anomaly does SERIALIZABLE prevent that REPEATABLE READ may allow?", ["Dirty reads", "Phantom reads", "Lost connections", "Deadlocks"], "B"),
        single(Technical, role, Medium, "What is connection pooling?", ["Reusing open database connections", "Sharding tables", "Caching HTTP responses", "Load balancing DNS"], "A"),
        single(Technical, role, Hard, "Which pattern keeps retries from creating duplicate side effects?", ["Idempotency keys", "Global locks", "Longer timeouts", "Bigger payloads"], "A"),
        multi(Technical, role, Medium, "Which are valid message delivery guarantees? (Select all that apply)", ["At-most-once", "At-least-once", "Exactly-once processing", "Never-once"], &["A", "B", "C"]),
    ]
}

#[rustfmt::skip]
fn general_technical() -> Vec<Question> {
    use Difficulty::{Easy, Hard, Medium};
    let general = &[GENERAL_TAG];
    vec![
        single(Technical, general, Easy, "What does version control primarily track?", ["Changes to files over time", "Network traffic", "CPU usage", "User sessions"], "A"),
        single(Technical, general, Easy, "What is the time complexity of binary search?", ["O(n)", "O(log n)", "O(n log n)", "O(1)"], "B"),
        single(Technical, general, Medium, "What is a unit test?", ["A test of one small piece of code in isolation", "A load test", "A manual QA checklist", "A database migration"], "A"),
        single(Technical, general, Medium, "What does API stand for?", ["Application Programming Interface", "Automated Program Integration", "Applied Protocol Index", "Advanced Programming Instruction"], "A"),
        single(Technical, general, Medium, "Which data structure is first-in, first-out?", ["Stack", "Queue", "Tree", "Graph"], "B"),
        single(Technical, general, Hard, "What is a race condition?", ["Outcome depends on timing of concurrent operations", "A slow network request", "A compiler warning", "An infinite loop"], "A"),
        single(Technical, general, Easy, "What is the purpose of code review?", ["Catch defects and share knowledge", "Slow down releases", "Assign blame", "Replace testing"], "A"),
        single(Technical, general, Medium, "What does CI stand for in software delivery?", ["Continuous Integration", "Code Inspection", "Centralized Infrastructure", "Compiled Interface"], "A"),
        multi(Technical, general, Medium, "Which practices improve code maintainability? (Select all that apply)", ["Clear naming", "Copy-pasting logic", "Automated tests", "Small focused functions"], &["A", "C", "D"]),
        open(
            QuestionKind::Numeric,
            Technical,
            general,
            "How many years of professional experience do you have?",
            ValidationRules {
                min: Some(0.0),
                max: Some(50.0),
                ..ValidationRules::default()
            },
        ),
        open(
            QuestionKind::FileUpload,
            Technical,
            general,
            "Upload your resume.",
            ValidationRules {
                allowed_types: vec![".pdf".to_string(), ".doc".to_string(), ".docx".to_string()],
                ..ValidationRules::default()
            },
        ),
    ]
}

#[rustfmt::skip]
fn management() -> Vec<Question> {
    use Difficulty::{Hard, Medium};
    let tag = &["management"];
    vec![
        single(Management, tag, Medium, "How do you handle a conflict between two team members?", ["Ignore it and hope it resolves", "Listen to both sides and mediate", "Take sides with the better performer", "Escalate to HR immediately"], "B"),
        single(Management, tag, Medium, "What is your approach to giving constructive feedback?", ["Only give positive feedback", "Be specific, timely, and actionable", "Give feedback only during reviews", "Focus on personality traits"], "B"),
        single(Management, tag, Medium, "How do you prioritize tasks when everything seems urgent?", ["Work on easiest tasks first", "Use impact vs effort matrix", "Work randomly", "Delegate everything"], "B"),
        single(Management, tag, Hard, "How do you motivate an underperforming team member?", ["Threaten termination", "Understand root causes and provide support", "Reduce their workload", "Ignore the issue"], "B"),
        single(Management, tag, Medium, "How do you communicate major changes to your team?", ["Send an email", "Hold a team meeting with Q&A", "Let them figure it out", "Use informal channels"], "B"),
        single(Management, tag, Medium, "How do you ensure project deadlines are met?", ["Work overtime", "Plan with buffer time and track progress", "Rush at the end", "Blame team members"], "B"),
        single(Management, tag, Hard, "How do you build trust within your team?", ["Be authoritative", "Be transparent and consistent", "Avoid difficult conversations", "Focus only on results"], "B"),
        single(Management, tag, Medium, "What is your approach to remote team management?", ["Micromanage everything", "Focus on outcomes and regular check-ins", "Let team work independently without guidance", "Only communicate through email"], "B"),
        single(Management, tag, Medium, "How do you handle team burnout?", ["Ignore it", "Redistribute workload and provide support", "Add more people to team", "Extend deadlines"], "B"),
        single(Management, tag, Hard, "What is your strategy for cross-functional collaboration?", ["Work in silos", "Regular alignment meetings and shared goals", "Compete with other teams", "Avoid other departments"], "B"),
        single(Management, tag, Medium, "How do you measure team performance?", ["Only track individual metrics", "Combine team goals with individual contributions", "Focus only on output quantity", "Use peer reviews only"], "B"),
        single(Management, tag, Hard, "How do you foster innovation in your team?", ["Stick to proven methods", "Encourage experimentation and learning from failures", "Punish mistakes", "Only follow company guidelines"], "B"),
        multi(Management, tag, Medium, "Which are effective leadership qualities? (Select all that apply)", ["Empathy", "Micromanagement", "Clear communication", "Adaptability"], &["A", "C", "D"]),
        multi(Management, tag, Medium, "Which are signs of a healthy team culture? (Select all that apply)", ["Open communication", "Fear of failure", "Collaboration", "Psychological safety"], &["A", "C", "D"]),
        open(
            QuestionKind::LongText,
            Management,
            tag,
            "Describe your experience leading a team through a difficult change.",
            ValidationRules {
                max_length: Some(500),
                ..ValidationRules::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::domain::letter_index;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_sequential() {
        let catalog = standard_catalog();
        let ids: HashSet<_> = catalog.iter().map(|question| question.id).collect();
        assert_eq!(ids.len(), catalog.len());
        assert_eq!(catalog.first().map(|q| q.id), Some(QuestionId(1)));
        assert_eq!(
            catalog.last().map(|q| q.id),
            Some(QuestionId(catalog.len() as u32))
        );
    }

    #[test]
    fn answer_keys_stay_within_options() {
        for question in standard_catalog() {
            if let Some(key) = &question.correct_answer {
                for letter in key.letters() {
                    let index = letter_index(letter).expect("uppercase letter");
                    assert!(
                        index < question.options.len(),
                        "question {:?} key {letter} out of bounds",
                        question.id
                    );
                }
            }
        }
    }

    #[test]
    fn categories_have_expected_sizes() {
        let catalog = standard_catalog();
        let count = |category| {
            catalog
                .iter()
                .filter(|question| question.category == category)
                .count()
        };
        assert_eq!(count(Aptitude), 15);
        assert_eq!(count(Management), 15);
        assert_eq!(
            catalog
                .iter()
                .filter(|question| question.has_tag("Frontend Developer"))
                .count(),
            15
        );
    }
}
