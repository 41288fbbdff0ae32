use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::assessment::bank::QuestionBank;
use crate::workflows::assessment::clock::Clock;
use crate::workflows::assessment::definition::AssessmentCatalog;
use crate::workflows::assessment::directory::{Candidate, Job, MemoryDirectory};
use crate::workflows::assessment::domain::{
    AnswerKey, AnswerValue, Assessment, AssessmentId, CandidateId, ConditionOperator,
    ConditionalRule, Difficulty, JobId, NewAssessment, PipelineStage, Question, QuestionCategory,
    QuestionId, QuestionKind, Section, ValidationRules,
};
use crate::workflows::assessment::generator::{AssessmentGenerator, GenerationPlan};
use crate::workflows::assessment::lifecycle::ResponseService;
use crate::workflows::assessment::store::MemoryStore;

/// Clock that only moves when told to.
pub(super) struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub(super) fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(super) fn advance_minutes(&self, minutes: i64) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += Duration::minutes(minutes);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn frontend_job() -> Job {
    Job {
        id: JobId(7),
        title: "Frontend Developer".to_string(),
    }
}

pub(super) fn candidate(id: u64, stage: PipelineStage) -> Candidate {
    Candidate {
        id: CandidateId(id),
        job_id: JobId(7),
        name: format!("Candidate {id}"),
        email: format!("candidate{id}@example.com"),
        stage,
    }
}

pub(super) fn single_choice(id: u32, text: &str, options: &[&str], key: &str) -> Question {
    Question {
        id: QuestionId(id),
        kind: QuestionKind::SingleChoice,
        category: QuestionCategory::Aptitude,
        tags: BTreeSet::new(),
        difficulty: Difficulty::Easy,
        text: text.to_string(),
        options: options.iter().map(|option| option.to_string()).collect(),
        correct_answer: Some(AnswerKey::Single(key.to_string())),
        required: true,
        validation: ValidationRules::default(),
        conditional: None,
    }
}

pub(super) fn multi_choice(id: u32, text: &str, options: &[&str], keys: &[&str]) -> Question {
    Question {
        kind: QuestionKind::MultiChoice,
        correct_answer: Some(AnswerKey::Multiple(
            keys.iter().map(|key| key.to_string()).collect(),
        )),
        ..single_choice(id, text, options, "A")
    }
}

pub(super) fn open_question(id: u32, kind: QuestionKind, text: &str) -> Question {
    Question {
        text: text.to_string(),
        required: false,
        ..Question::template(QuestionId(id), kind)
    }
}

pub(super) fn percent_question() -> Question {
    single_choice(1, "What is 15% of 200?", &["25", "30", "35", "40"], "B")
}

pub(super) fn leadership_question() -> Question {
    multi_choice(
        2,
        "Which are effective leadership qualities? (Select all that apply)",
        &["Empathy", "Micromanagement", "Clear communication", "Adaptability"],
        &["A", "C", "D"],
    )
}

pub(super) fn conditional_on(id: u32, depends_on: u32, operator: &str, value: AnswerValue) -> Question {
    Question {
        required: true,
        conditional: Some(ConditionalRule {
            depends_on: QuestionId(depends_on),
            operator: ConditionOperator::from(operator.to_string()),
            value,
        }),
        ..open_question(id, QuestionKind::ShortText, "Tell us more")
    }
}

/// Two gradable questions, one conditional follow-up, and three ungraded prompts.
pub(super) fn screening_sections() -> Vec<Section> {
    let relocate = Question {
        required: true,
        ..single_choice(3, "Are you willing to relocate?", &["Yes", "No"], "A")
    };
    vec![
        Section {
            id: 1,
            title: "Basics".to_string(),
            questions: vec![percent_question(), leadership_question()],
        },
        Section {
            id: 2,
            title: "Logistics".to_string(),
            questions: vec![
                Question {
                    correct_answer: None,
                    ..relocate
                },
                conditional_on(4, 3, "equals", AnswerValue::text("Yes")),
                open_question(5, QuestionKind::Numeric, "How many years of experience do you have?"),
                open_question(6, QuestionKind::FileUpload, "Upload your resume"),
            ],
        },
    ]
}

pub(super) fn screening_assessment() -> NewAssessment {
    NewAssessment {
        job_id: JobId(7),
        stage: PipelineStage::Applied,
        title: "Frontend Developer Screening".to_string(),
        sections: screening_sections(),
    }
}

pub(super) fn stored_assessment(id: u64) -> Assessment {
    let created = at(1, 9);
    Assessment {
        id: AssessmentId(id),
        job_id: JobId(7),
        stage: PipelineStage::Applied,
        title: "Frontend Developer Screening".to_string(),
        sections: screening_sections(),
        created_at: created,
        updated_at: created,
    }
}

/// Store, directory, and clock shared by the services under test.
pub(super) struct Harness {
    pub(super) store: Arc<MemoryStore>,
    pub(super) directory: Arc<MemoryDirectory>,
    pub(super) clock: Arc<FixedClock>,
}

impl Harness {
    pub(super) fn new() -> Self {
        let directory = MemoryDirectory::default();
        directory
            .upsert_job(frontend_job())
            .expect("job stored");
        Self {
            store: Arc::new(MemoryStore::default()),
            directory: Arc::new(directory),
            clock: Arc::new(FixedClock::starting_at(at(2, 9))),
        }
    }

    pub(super) fn generator(&self) -> AssessmentGenerator<MemoryStore, MemoryStore> {
        AssessmentGenerator::with_parts(
            QuestionBank::new(self.store.clone()),
            self.store.clone(),
            self.clock.clone(),
            GenerationPlan::default(),
        )
    }

    pub(super) fn responses(&self) -> ResponseService<MemoryStore, MemoryStore, MemoryDirectory> {
        ResponseService::with_clock(
            self.store.clone(),
            self.store.clone(),
            self.directory.clone(),
            self.clock.clone(),
        )
    }

    /// Stores the screening assessment and returns it.
    pub(super) fn with_screening(&self) -> Assessment {
        self.catalog()
            .save_custom(screening_assessment())
            .expect("screening assessment stores")
    }

    pub(super) fn catalog(&self) -> AssessmentCatalog<MemoryStore> {
        AssessmentCatalog::with_clock(self.store.clone(), self.clock.clone())
    }
}
