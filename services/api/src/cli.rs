use crate::questionnaire::{run_questionnaire, run_score, QuestionnaireArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use exposure_check::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Exposure Check",
    about = "Score an organization's exposure tier from four questions, over HTTP or in the terminal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a complete set of answers given as flags
    Score(ScoreArgs),
    /// Walk through the questionnaire interactively
    Questionnaire(QuestionnaireArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Questionnaire(args) => run_questionnaire(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exposure_check::assessment::{EntitySize, GovernanceMaturity, ServiceSensitivity};

    #[test]
    fn parses_score_flags() {
        let cli = Cli::try_parse_from([
            "exposure-check",
            "score",
            "--size",
            "large",
            "--sensitivity",
            "HIGH",
            "--governance",
            "iso",
            "--mfa",
            "--incident-process",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.size, EntitySize::Large);
                assert_eq!(args.sensitivity, ServiceSensitivity::High);
                assert_eq!(args.governance, GovernanceMaturity::Iso);
                assert!(args.mfa && args.incident_process);
                assert!(!args.cloud && !args.supply_chain);
                assert!(args.json);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_choices() {
        let err = Cli::try_parse_from([
            "exposure-check",
            "score",
            "--size",
            "huge",
            "--sensitivity",
            "low",
            "--governance",
            "none",
        ])
        .expect_err("unknown size rejected");
        assert!(err.to_string().contains("huge"));
    }

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["exposure-check"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
