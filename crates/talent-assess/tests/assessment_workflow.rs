use std::sync::Arc;

use talent_assess::workflows::assessment::{
    letter_index, AnswerValue, Answers, Assessment, AssessmentGenerator, Candidate, CandidateId,
    ExclusionReason, GenerationPlan, Job, JobId, LifecycleViolation, MemoryDirectory, MemoryStore,
    PipelineStage, Question, QuestionKind, RankingService, ResponseService, ResponseServiceError,
    Roster, ScoreBand, ScoringEngine,
};

fn roster() -> Roster {
    let candidate = |id: u64, email: &str| Candidate {
        id: CandidateId(id),
        job_id: JobId(7),
        name: format!("Candidate {id}"),
        email: email.to_string(),
        stage: PipelineStage::Applied,
    };
    Roster {
        jobs: vec![Job {
            id: JobId(7),
            title: "Frontend Developer".to_string(),
        }],
        candidates: vec![
            candidate(1, "ada@example.com"),
            candidate(2, "grace@example.com"),
            candidate(3, ""),
        ],
    }
}

fn option_at(question: &Question, letter: &str) -> String {
    let index = letter_index(letter).expect("answer key uses letters");
    question.options[index].clone()
}

fn key_letters(question: &Question) -> Vec<String> {
    question
        .correct_answer
        .as_ref()
        .map(|key| key.letters().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Fills every question; choice questions get the keyed option when `correct` is set.
fn complete_answers(assessment: &Assessment, correct: bool) -> Answers {
    assessment
        .questions()
        .map(|question| {
            let letters = key_letters(question);
            let value = match question.kind {
                QuestionKind::SingleChoice => {
                    let keyed = letter_index(letters.first().map(String::as_str).unwrap_or("A"))
                        .unwrap_or(0);
                    let index = if correct {
                        keyed
                    } else {
                        (keyed + 1) % question.options.len()
                    };
                    AnswerValue::text(question.options[index].clone())
                }
                QuestionKind::MultiChoice if correct => AnswerValue::choices(
                    letters.iter().map(|letter| option_at(question, letter)),
                ),
                QuestionKind::MultiChoice => AnswerValue::choices([option_at(question, "A")]),
                QuestionKind::Numeric => AnswerValue::text("6"),
                QuestionKind::FileUpload => AnswerValue::text("resume.PDF"),
                QuestionKind::ShortText | QuestionKind::LongText => {
                    AnswerValue::text("Moved the team to trunk-based delivery.")
                }
            };
            (question.id, value)
        })
        .collect()
}

struct Platform {
    store: Arc<MemoryStore>,
    directory: Arc<MemoryDirectory>,
}

impl Platform {
    fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            directory: Arc::new(MemoryDirectory::from_roster(roster())),
        }
    }

    fn generator(&self) -> AssessmentGenerator<MemoryStore, MemoryStore> {
        AssessmentGenerator::new(
            self.store.clone(),
            self.store.clone(),
            GenerationPlan::default(),
        )
    }

    fn responses(&self) -> ResponseService<MemoryStore, MemoryStore, MemoryDirectory> {
        ResponseService::new(
            self.store.clone(),
            self.store.clone(),
            self.directory.clone(),
        )
    }

    fn ranking(&self) -> RankingService<MemoryStore, MemoryStore, MemoryDirectory> {
        RankingService::new(
            self.store.clone(),
            self.store.clone(),
            self.directory.clone(),
        )
    }

    fn generate_frontend(&self) -> Assessment {
        let job = roster().jobs.remove(0);
        self.generator()
            .generate(&job, PipelineStage::Applied)
            .expect("assessment generated")
    }
}

#[test]
fn generation_is_reproducible_across_stores() {
    let first = Platform::new().generate_frontend();
    let second = Platform::new().generate_frontend();

    let ids = |assessment: &Assessment| {
        assessment
            .questions()
            .map(|question| question.id)
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.title, "Frontend Developer Assessment");
    assert_eq!(
        first
            .sections
            .iter()
            .map(|section| (section.title.as_str(), section.questions.len()))
            .collect::<Vec<_>>(),
        vec![("Aptitude", 10), ("Technical", 20), ("Management", 7)]
    );
}

#[test]
fn candidates_flow_from_draft_to_leaderboard() {
    let platform = Platform::new();
    let assessment = platform.generate_frontend();
    let responses = platform.responses();

    let perfect = complete_answers(&assessment, true);
    let mut partial = perfect.clone();
    let first_question = assessment.sections[0].questions[0].id;
    partial.remove(&first_question);

    responses
        .save_draft(CandidateId(1), assessment.id, partial)
        .expect("partial draft saved");
    responses
        .save_draft(CandidateId(1), assessment.id, perfect.clone())
        .expect("full draft saved");

    let resumed = responses
        .resume(CandidateId(1), JobId(7), PipelineStage::Applied)
        .expect("candidate resumes");
    assert!(!resumed.submitted);
    assert_eq!(resumed.answers, perfect);
    assert!(resumed.last_saved.is_some());

    responses
        .submit_validated(CandidateId(1), assessment.id, resumed.answers)
        .expect("perfect answers submitted");
    responses
        .submit_validated(
            CandidateId(2),
            assessment.id,
            complete_answers(&assessment, false),
        )
        .expect("wrong answers still submit");
    responses
        .submit_validated(CandidateId(3), assessment.id, perfect.clone())
        .expect("candidate without email submits");

    assert!(responses
        .get_draft(CandidateId(1), assessment.id)
        .expect("draft lookup")
        .is_none());

    let card = ScoringEngine::new().score(&assessment, &perfect);
    assert_eq!(card.percentage, 100);
    assert_eq!(card.correct, card.total);
    assert_eq!(card.band(), ScoreBand::Excellent);

    let leaderboard = platform
        .ranking()
        .rank_job(JobId(7), PipelineStage::Applied)
        .expect("ranking runs")
        .expect("assessment exists");

    let ranked: Vec<(usize, CandidateId, u32)> = leaderboard
        .entries
        .iter()
        .map(|entry| (entry.rank, entry.candidate.id, entry.score.percentage))
        .collect();
    assert_eq!(
        ranked,
        vec![(1, CandidateId(1), 100), (2, CandidateId(2), 0)]
    );
    assert_eq!(leaderboard.excluded.len(), 1);
    assert_eq!(leaderboard.excluded[0].candidate_id, CandidateId(3));
    assert_eq!(
        leaderboard.excluded[0].reason,
        ExclusionReason::MissingContactDetails
    );

    let summary = leaderboard.summary();
    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.excellent, 1);
    assert_eq!(summary.needs_review, 1);
    assert_eq!(summary.pass_rate, 50);

    let mut csv = Vec::new();
    leaderboard.write_csv(&mut csv).expect("csv export");
    let csv = String::from_utf8(csv).expect("utf-8 csv");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Rank,Candidate,Email,Correct,Total,Percentage,Band,Submitted At")
    );
    assert!(lines
        .next()
        .expect("first row")
        .starts_with("1,Candidate 1,ada@example.com,"));
}

#[test]
fn submissions_are_final() {
    let platform = Platform::new();
    let assessment = platform.generate_frontend();
    let responses = platform.responses();
    let answers = complete_answers(&assessment, true);

    responses
        .submit_validated(CandidateId(2), assessment.id, answers.clone())
        .expect("first submission");

    match responses.submit_validated(CandidateId(2), assessment.id, answers.clone()) {
        Err(ResponseServiceError::Lifecycle(LifecycleViolation::AlreadySubmitted { .. })) => {}
        other => panic!("expected AlreadySubmitted, got {other:?}"),
    }
    match responses.save_draft(CandidateId(2), assessment.id, answers) {
        Err(ResponseServiceError::Lifecycle(LifecycleViolation::AlreadySubmitted { .. })) => {}
        other => panic!("expected AlreadySubmitted, got {other:?}"),
    }
}

#[test]
fn ranking_without_an_assessment_yields_nothing() {
    let platform = Platform::new();
    let leaderboard = platform
        .ranking()
        .rank_job(JobId(7), PipelineStage::Screen)
        .expect("ranking runs");
    assert!(leaderboard.is_none());
}
