use std::path::PathBuf;

use ai_bos::config::{ApiConfig, AppConfig};
use ai_bos::error::AppError;
use ai_bos::export::ExportFormat;
use ai_bos::telemetry;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::commands;
use crate::infra::build_dashboard;
use crate::interactive;

#[derive(Parser, Debug)]
#[command(
    name = "ai-bos",
    about = "Calculate SLA delay penalties against the AI-BOS service from the terminal",
    version
)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug, Default)]
struct ConfigOverrides {
    /// Override the configured calculation service base URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Override the directory holding persisted history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Override the directory receiving saved results and exports
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive dashboard (default command)
    Interactive,
    /// Run a single calculation and print the result panel
    Calculate(CalculateArgs),
    /// List stored calculations, most recent first
    History(HistoryArgs),
    /// Redisplay a stored calculation by request id
    Show {
        /// Request id as listed by `history`
        id: String,
    },
    /// Export the full history with the threshold snapshot
    Export {
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,
    },
    /// Show the service's current penalty thresholds
    Thresholds,
    /// Calculate penalties for several delays in one service call
    Batch {
        /// Comma-separated delays in minutes, e.g. 15,45,90
        #[arg(long, value_delimiter = ',', required = true)]
        delays: Vec<u32>,
    },
}

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// Delay in minutes (0-1440)
    #[arg(long)]
    pub(crate) delay: String,
    /// Service tier the delay applies to
    #[arg(long, default_value = "standard")]
    pub(crate) service_type: String,
    /// Optional contract reference sent with the request
    #[arg(long)]
    pub(crate) contract_id: Option<String>,
    /// Save the result as a JSON file in the export directory
    #[arg(long)]
    pub(crate) save: bool,
    /// Copy a shareable summary of the result to stdout
    #[arg(long)]
    pub(crate) share: bool,
    /// Print the raw service response as JSON instead of the panel
    #[arg(long)]
    pub(crate) json: bool,
    /// Send a simulated notice to this email address
    #[arg(long)]
    pub(crate) notify_email: Option<String>,
    /// Send a simulated SMS notice to this phone number
    #[arg(long)]
    pub(crate) notify_phone: Option<String>,
    /// Recipient name used in the notice greeting
    #[arg(long)]
    pub(crate) notify_name: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryArgs {
    /// Only list this many entries
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub(crate) enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = load_config(cli.overrides)?;
    telemetry::init(&config.telemetry)?;
    debug!(?config.environment, api = %config.api.base_url, "configuration loaded");

    let mut dashboard = build_dashboard(&config)?;
    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => interactive::run(&mut dashboard).await,
        Command::Calculate(args) => commands::calculate(&mut dashboard, args).await,
        Command::History(args) => commands::history(&dashboard, args),
        Command::Show { id } => commands::show(&mut dashboard, &id),
        Command::Export { format } => commands::export(&dashboard, format.into()),
        Command::Thresholds => commands::thresholds(&mut dashboard).await,
        Command::Batch { delays } => commands::batch(&dashboard, &delays).await,
    }
}

fn load_config(overrides: ConfigOverrides) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;

    if let Some(url) = overrides.api_url {
        config.api = ApiConfig {
            timeout: config.api.timeout,
            ..ApiConfig::new(url)?
        };
    }
    if let Some(dir) = overrides.data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(dir) = overrides.export_dir {
        config.storage.export_dir = Some(dir);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive_session() {
        let cli = Cli::try_parse_from(["ai-bos"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn batch_splits_comma_separated_delays() {
        let cli = Cli::try_parse_from(["ai-bos", "batch", "--delays", "15,45,90"]).expect("parses");
        match cli.command {
            Some(Command::Batch { delays }) => assert_eq!(delays, vec![15, 45, 90]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_overrides_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "ai-bos",
            "calculate",
            "--delay",
            "45",
            "--api-url",
            "http://calc.internal:9000",
            "--save",
        ])
        .expect("parses");
        assert_eq!(
            cli.overrides.api_url.as_deref(),
            Some("http://calc.internal:9000")
        );
        match cli.command {
            Some(Command::Calculate(args)) => {
                assert_eq!(args.delay, "45");
                assert_eq!(args.service_type, "standard");
                assert!(args.save && !args.share);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
