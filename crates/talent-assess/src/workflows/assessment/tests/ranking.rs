use super::common::*;
use crate::workflows::assessment::directory::Candidate;
use crate::workflows::assessment::domain::{
    AnswerValue, Answers, AssessmentId, CandidateId, JobId, PipelineStage, QuestionId, ResponseId,
    ResponseRecord, ResponseState,
};
use crate::workflows::assessment::ranking::{
    deduplicate_and_rank, ExclusionReason, LeaderboardSummary, RankingService,
};
use crate::workflows::assessment::scoring::ScoringEngine;

/// Answers scoring 0, 50, or 100 on the screening assessment.
fn answers_scoring(percent: u32) -> Answers {
    let mut answers = Answers::new();
    let percent_answer = if percent >= 50 { "30" } else { "25" };
    answers.insert(QuestionId(1), AnswerValue::text(percent_answer));
    let leadership = if percent == 100 {
        AnswerValue::choices(["Empathy", "Clear communication", "Adaptability"])
    } else {
        AnswerValue::choices(["Micromanagement"])
    };
    answers.insert(QuestionId(2), leadership);
    answers
}

fn submission(id: u64, candidate: u64, day: u32, percent: u32) -> ResponseRecord {
    ResponseRecord {
        id: ResponseId(id),
        candidate_id: CandidateId(candidate),
        assessment_id: AssessmentId(1),
        job_id: JobId(7),
        stage: PipelineStage::Applied,
        answers: answers_scoring(percent),
        created_at: at(day, 8),
        updated_at: at(day, 9),
        state: ResponseState::Submitted {
            submitted_at: at(day, 9),
        },
    }
}

fn roster() -> Vec<Candidate> {
    (21..=25)
        .map(|id| candidate(id, PipelineStage::Applied))
        .collect()
}

#[test]
fn keeps_only_the_latest_submission_per_candidate() {
    let assessment = stored_assessment(1);
    let responses = vec![submission(2, 21, 5, 100), submission(1, 21, 3, 0)];

    let board = deduplicate_and_rank(&ScoringEngine::new(), &assessment, responses, &roster());

    assert_eq!(board.entries.len(), 1);
    assert_eq!(board.entries[0].response_id, ResponseId(2));
    assert_eq!(board.entries[0].submitted_at, at(5, 9));
    assert_eq!(board.entries[0].score.percentage, 100);
}

#[test]
fn sorts_by_percentage_and_keeps_ties_in_encounter_order() {
    let assessment = stored_assessment(1);
    let responses = vec![
        submission(1, 24, 3, 50),
        submission(2, 22, 3, 0),
        submission(3, 23, 3, 100),
        submission(4, 21, 3, 50),
    ];

    let board = deduplicate_and_rank(&ScoringEngine::new(), &assessment, responses, &roster());

    let order: Vec<(usize, u64, u32)> = board
        .entries
        .iter()
        .map(|entry| (entry.rank, entry.candidate.id.0, entry.score.percentage))
        .collect();
    assert_eq!(
        order,
        vec![(1, 23, 100), (2, 24, 50), (3, 21, 50), (4, 22, 0)]
    );
}

#[test]
fn replaced_submission_keeps_first_encounter_position() {
    let assessment = stored_assessment(1);
    let responses = vec![
        submission(1, 24, 3, 0),
        submission(2, 21, 3, 50),
        submission(3, 24, 5, 50),
    ];

    let board = deduplicate_and_rank(&ScoringEngine::new(), &assessment, responses, &roster());

    let order: Vec<(u64, ResponseId)> = board
        .entries
        .iter()
        .map(|entry| (entry.candidate.id.0, entry.response_id))
        .collect();
    assert_eq!(order, vec![(24, ResponseId(3)), (21, ResponseId(2))]);
}

#[test]
fn unresolvable_candidates_are_excluded_not_fatal() {
    let assessment = stored_assessment(1);
    let mut candidates = roster();
    candidates[1].email = "  ".to_string();
    let responses = vec![
        submission(1, 21, 3, 100),
        submission(2, 22, 3, 100),
        submission(3, 99, 3, 100),
    ];

    let board = deduplicate_and_rank(&ScoringEngine::new(), &assessment, responses, &candidates);

    assert_eq!(board.entries.len(), 1);
    assert_eq!(board.entries[0].candidate.id, CandidateId(21));
    let reasons: Vec<(u64, ExclusionReason)> = board
        .excluded
        .iter()
        .map(|exclusion| (exclusion.candidate_id.0, exclusion.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (22, ExclusionReason::MissingContactDetails),
            (99, ExclusionReason::UnknownCandidate),
        ]
    );
}

#[test]
fn drafts_and_other_assessments_are_ignored() {
    let assessment = stored_assessment(1);
    let mut draft = submission(1, 21, 3, 100);
    draft.state = ResponseState::Draft;
    let mut foreign = submission(2, 22, 3, 100);
    foreign.assessment_id = AssessmentId(2);

    let board = deduplicate_and_rank(
        &ScoringEngine::new(),
        &assessment,
        vec![draft, foreign],
        &roster(),
    );

    assert!(board.entries.is_empty());
    assert!(board.excluded.is_empty());
    assert_eq!(board.summary(), LeaderboardSummary::default());
}

#[test]
fn summary_counts_bands_and_rounds_mean() {
    let assessment = stored_assessment(1);
    let responses = vec![
        submission(1, 21, 3, 100),
        submission(2, 22, 3, 50),
        submission(3, 23, 3, 0),
    ];

    let summary =
        deduplicate_and_rank(&ScoringEngine::new(), &assessment, responses, &roster()).summary();

    assert_eq!(summary.candidates, 3);
    assert_eq!(summary.excellent, 1);
    assert_eq!(summary.passing, 1);
    assert_eq!(summary.needs_review, 2);
    assert_eq!(summary.mean_percentage, 50);
    assert_eq!(summary.pass_rate, 33);
}

#[test]
fn csv_export_lists_ranked_rows() {
    let assessment = stored_assessment(1);
    let board = deduplicate_and_rank(
        &ScoringEngine::new(),
        &assessment,
        vec![submission(1, 21, 3, 50), submission(2, 22, 3, 100)],
        &roster(),
    );

    let mut buffer = Vec::new();
    board.write_csv(&mut buffer).expect("csv writes");
    let text = String::from_utf8(buffer).expect("utf8 output");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "Rank,Candidate,Email,Correct,Total,Percentage,Band,Submitted At"
    );
    assert_eq!(
        lines[1],
        "1,Candidate 22,candidate22@example.com,2,2,100,Excellent,2025-06-03T09:00:00+00:00"
    );
    assert!(lines[2].starts_with("2,Candidate 21,candidate21@example.com,1,2,50,Needs Review,"));
}

#[test]
fn rank_job_resolves_assessment_and_directory() {
    let harness = Harness::new();
    for candidate in roster() {
        harness
            .directory
            .upsert_candidate(candidate)
            .expect("candidate stored");
    }
    let assessment = harness.with_screening();
    let responses = harness.responses();
    responses
        .submit(CandidateId(21), assessment.id, answers_scoring(50))
        .expect("first submission");
    responses
        .submit(CandidateId(22), assessment.id, answers_scoring(100))
        .expect("second submission");
    responses
        .save_draft(CandidateId(23), assessment.id, answers_scoring(100))
        .expect("draft only");

    let ranking = RankingService::new(
        harness.store.clone(),
        harness.store.clone(),
        harness.directory.clone(),
    );
    let board = ranking
        .rank_job(JobId(7), PipelineStage::Applied)
        .expect("ranking succeeds")
        .expect("assessment exists");

    let order: Vec<u64> = board
        .entries
        .iter()
        .map(|entry| entry.candidate.id.0)
        .collect();
    assert_eq!(order, vec![22, 21]);
    assert!(ranking
        .rank_job(JobId(7), PipelineStage::Offer)
        .expect("ranking succeeds")
        .is_none());
}
