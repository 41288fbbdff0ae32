use crate::commands::{
    run_backfill, run_draft, run_generate, run_import, run_rank, run_score, run_seed_bank,
    run_submit, BackfillArgs, DraftArgs, GenerateArgs, ImportArgs, RankArgs, ScoreArgs,
    SubmitArgs,
};
use crate::infra::Workspace;
use clap::{Parser, Subcommand};
use talent_assess::config::AppConfig;
use talent_assess::error::AppError;
use talent_assess::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "talent-assess",
    about = "Administer candidate assessments: seed the bank, generate, collect, score, and rank",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clear the question bank and reload the built-in catalog
    SeedBank,
    /// Generate the assessment for one job and stage
    Generate(GenerateArgs),
    /// Generate missing assessments for every roster job
    Backfill(BackfillArgs),
    /// Store a hand-authored assessment definition
    Import(ImportArgs),
    /// Save a candidate's in-progress answers
    Draft(DraftArgs),
    /// Validate and submit a candidate's answers
    Submit(SubmitArgs),
    /// Print the score card of a submitted response
    Score(ScoreArgs),
    /// Rank a job's candidates by their latest submission
    Rank(RankArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let workspace = Workspace::open(&config)?;
    match cli.command {
        Command::SeedBank => run_seed_bank(&workspace)?,
        Command::Generate(args) => run_generate(&workspace, args)?,
        Command::Backfill(args) => run_backfill(&workspace, args)?,
        Command::Import(args) => run_import(&workspace, args)?,
        Command::Draft(args) => run_draft(&workspace, args)?,
        Command::Submit(args) => run_submit(&workspace, args)?,
        Command::Score(args) => run_score(&workspace, args)?,
        Command::Rank(args) => run_rank(&workspace, args)?,
    }
    workspace.persist()
}
