use crate::infra::{parse_stage, read_answers, read_definition, Workspace};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use talent_assess::error::AppError;
use talent_assess::workflows::assessment::{
    progress, Assessment, AssessmentCatalog, AssessmentGenerator, AssessmentId,
    AssessmentRepository, CandidateId, CatalogError, Job, JobId, Leaderboard, LeaderboardSummary,
    MemoryDirectory, MemoryStore, NewAssessment, PipelineStage, QuestionBank, RankingService,
    ResponseService, ResponseServiceError, ScoringEngine, TalentDirectory, ValidationReport,
};

type Responses = ResponseService<MemoryStore, MemoryStore, MemoryDirectory>;

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Job to generate the assessment for
    #[arg(long)]
    pub(crate) job_id: u64,
    /// Job title; defaults to the roster entry for the job
    #[arg(long)]
    pub(crate) title: Option<String>,
    /// Pipeline stage the assessment belongs to
    #[arg(long, default_value = "applied", value_parser = parse_stage)]
    pub(crate) stage: PipelineStage,
}

#[derive(Args, Debug)]
pub(crate) struct BackfillArgs {
    /// Pipeline stage to backfill
    #[arg(long, default_value = "applied", value_parser = parse_stage)]
    pub(crate) stage: PipelineStage,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// JSON definition with job id, stage, title, and sections
    #[arg(long)]
    pub(crate) definition: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct DraftArgs {
    #[arg(long)]
    pub(crate) candidate: u64,
    #[arg(long)]
    pub(crate) assessment: u64,
    /// JSON object mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    #[arg(long)]
    pub(crate) candidate: u64,
    #[arg(long)]
    pub(crate) assessment: u64,
    /// Answers file; the saved draft is submitted when omitted
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    #[arg(long)]
    pub(crate) candidate: u64,
    #[arg(long)]
    pub(crate) assessment: u64,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    #[arg(long)]
    pub(crate) job_id: u64,
    #[arg(long, default_value = "applied", value_parser = parse_stage)]
    pub(crate) stage: PipelineStage,
    #[arg(long, value_enum, default_value_t = RankFormat::Json)]
    pub(crate) format: RankFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum RankFormat {
    Json,
    Csv,
}

#[derive(Serialize)]
struct RankReport<'a> {
    summary: LeaderboardSummary,
    #[serde(flatten)]
    leaderboard: &'a Leaderboard,
}

pub(crate) fn run_seed_bank(workspace: &Workspace) -> Result<(), AppError> {
    let bank = QuestionBank::new(workspace.store.clone());
    let count = bank.reseed()?;
    println!("Question bank reseeded with {count} questions");
    Ok(())
}

pub(crate) fn run_generate(workspace: &Workspace, args: GenerateArgs) -> Result<(), AppError> {
    let job_id = JobId(args.job_id);
    let job = match args.title {
        Some(title) => Job { id: job_id, title },
        None => workspace
            .directory
            .job(job_id)?
            .ok_or_else(|| AppError::Missing(format!("job {job_id} is not on the roster")))?,
    };

    let assessment = generator(workspace).generate(&job, args.stage)?;
    render_assessment(&assessment);
    Ok(())
}

pub(crate) fn run_backfill(workspace: &Workspace, args: BackfillArgs) -> Result<(), AppError> {
    let jobs = workspace.directory.jobs()?;
    let created = generator(workspace).ensure_for_jobs(&jobs, args.stage)?;
    println!(
        "Backfill for stage '{}': {} jobs, {} assessments created",
        args.stage,
        jobs.len(),
        created.len()
    );
    for assessment in &created {
        render_assessment(assessment);
    }
    Ok(())
}

pub(crate) fn run_import(workspace: &Workspace, args: ImportArgs) -> Result<(), AppError> {
    let definition = read_definition(&args.definition)?;
    let assessment = import_definition(workspace, definition)?;
    render_assessment(&assessment);
    Ok(())
}

/// Stores a hand-authored assessment, listing every definition problem on refusal.
fn import_definition(
    workspace: &Workspace,
    definition: NewAssessment,
) -> Result<Assessment, AppError> {
    match AssessmentCatalog::new(workspace.store.clone()).save_custom(definition) {
        Ok(assessment) => Ok(assessment),
        Err(CatalogError::Invalid(problems)) => {
            eprintln!("Definition has {} problems:", problems.len());
            for problem in &problems {
                eprintln!("  {problem}");
            }
            Err(CatalogError::Invalid(problems).into())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn run_draft(workspace: &Workspace, args: DraftArgs) -> Result<(), AppError> {
    let answers = read_answers(&args.answers)?;
    let draft = responses(workspace).save_draft(
        CandidateId(args.candidate),
        AssessmentId(args.assessment),
        answers,
    )?;

    let assessment = fetch_assessment(workspace, draft.assessment_id)?;
    println!(
        "Draft saved for candidate {} on assessment {} ({}% answered)",
        draft.candidate_id,
        draft.assessment_id,
        progress(&assessment, &draft.answers)
    );
    Ok(())
}

pub(crate) fn run_submit(workspace: &Workspace, args: SubmitArgs) -> Result<(), AppError> {
    let candidate_id = CandidateId(args.candidate);
    let assessment_id = AssessmentId(args.assessment);
    let service = responses(workspace);

    let answers = match args.answers {
        Some(path) => read_answers(&path)?,
        None => service
            .get_draft(candidate_id, assessment_id)?
            .map(|draft| draft.answers)
            .ok_or_else(|| {
                AppError::Missing(format!(
                    "no draft for candidate {candidate_id} on assessment {assessment_id}"
                ))
            })?,
    };

    match service.submit_validated(candidate_id, assessment_id, answers) {
        Ok(record) => {
            println!(
                "Submitted response {} for candidate {} at {}",
                record.id.0,
                record.candidate_id,
                format_timestamp(record.submitted_at())
            );
            Ok(())
        }
        Err(ResponseServiceError::Invalid(report)) => {
            render_validation(&report);
            Err(ResponseServiceError::Invalid(report).into())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn run_score(workspace: &Workspace, args: ScoreArgs) -> Result<(), AppError> {
    let candidate_id = CandidateId(args.candidate);
    let assessment_id = AssessmentId(args.assessment);

    let response = responses(workspace)
        .get_submitted(candidate_id, assessment_id)?
        .ok_or_else(|| {
            AppError::Missing(format!(
                "no submission for candidate {candidate_id} on assessment {assessment_id}"
            ))
        })?;
    let assessment = fetch_assessment(workspace, assessment_id)?;

    let card = ScoringEngine::new().score_response(&assessment, &response)?;
    println!("{}", serde_json::to_string_pretty(&card)?);
    Ok(())
}

pub(crate) fn run_rank(workspace: &Workspace, args: RankArgs) -> Result<(), AppError> {
    let job_id = JobId(args.job_id);
    let service = RankingService::new(
        workspace.store.clone(),
        workspace.store.clone(),
        workspace.directory.clone(),
    );
    let leaderboard = service.rank_job(job_id, args.stage)?.ok_or_else(|| {
        AppError::Missing(format!(
            "no assessment for job {job_id} at stage '{}'",
            args.stage
        ))
    })?;

    match args.format {
        RankFormat::Json => {
            let report = RankReport {
                summary: leaderboard.summary(),
                leaderboard: &leaderboard,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        RankFormat::Csv => leaderboard.write_csv(io::stdout().lock())?,
    }
    Ok(())
}

fn generator(workspace: &Workspace) -> AssessmentGenerator<MemoryStore, MemoryStore> {
    AssessmentGenerator::new(
        workspace.store.clone(),
        workspace.store.clone(),
        workspace.plan,
    )
}

fn responses(workspace: &Workspace) -> Responses {
    ResponseService::new(
        workspace.store.clone(),
        workspace.store.clone(),
        workspace.directory.clone(),
    )
}

fn fetch_assessment(workspace: &Workspace, id: AssessmentId) -> Result<Assessment, AppError> {
    workspace
        .store
        .fetch_assessment(id)?
        .ok_or_else(|| AppError::Missing(format!("assessment {id}")))
}

fn render_assessment(assessment: &Assessment) {
    println!(
        "Assessment {} \"{}\" for job {} ({})",
        assessment.id, assessment.title, assessment.job_id, assessment.stage
    );
    for section in &assessment.sections {
        let ids: Vec<String> = section
            .questions
            .iter()
            .map(|question| question.id.0.to_string())
            .collect();
        println!(
            "  {:<12} {:>2} questions [{}]",
            section.title,
            section.questions.len(),
            ids.join(", ")
        );
    }
}

fn render_validation(report: &ValidationReport) {
    eprintln!("Submission has {} invalid answers:", report.error_count());
    for section in report.sections.iter().filter(|section| !section.is_valid()) {
        for (question_id, errors) in &section.errors {
            for error in errors {
                eprintln!(
                    "  section {} question {}: {}",
                    section.section_id, question_id.0, error
                );
            }
        }
    }
}

fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}
