use crate::approval::{run_predict, run_train, PredictArgs, TrainArgs};
use crate::casework::{run_casework, CaseworkArgs};
use crate::compliance::{run_compliance, ComplianceArgs};
use crate::distribution::{run_distribution, DistributeArgs};
use clap::{Parser, Subcommand};
use collection_desk::config::AppConfig;
use collection_desk::error::AppError;
use collection_desk::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "Collection Desk",
    about = "Score, distribute, and review debt-collection work from snapshot files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assign open credits to operators for a working day
    Distribute(DistributeArgs),
    /// Check a call transcript or message against contact rules
    Compliance(ComplianceArgs),
    /// Profile a client and recommend the next action and recovery strategy
    Casework(CaseworkArgs),
    /// Train or query the loan-approval model
    Approval {
        #[command(subcommand)]
        command: ApprovalCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ApprovalCommand {
    /// Fit the model on labelled applications and save it
    Train(TrainArgs),
    /// Assess one application, falling back to rules without a model
    Predict(PredictArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = config.environment.label(), "configuration loaded");

    match cli.command {
        Command::Distribute(args) => run_distribution(args, &config),
        Command::Compliance(args) => run_compliance(args),
        Command::Casework(args) => run_casework(args, &config),
        Command::Approval {
            command: ApprovalCommand::Train(args),
        } => run_train(args),
        Command::Approval {
            command: ApprovalCommand::Predict(args),
        } => run_predict(args, &config),
    }
}
