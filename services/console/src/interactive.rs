//! Line-driven dashboard session over stdin.

use std::io::{self, Write};

use ai_bos::error::AppError;
use ai_bos::export::ExportFormat;
use ai_bos::form::CalculationForm;
use ai_bos::notice::Recipient;
use ai_bos::ui::terminal::{render_history, render_state, render_thresholds, render_welcome};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::commands::print_current;
use crate::infra::ConsoleDashboard;

const HELP: &str = "\
Commands:
  calc <minutes> [service_type] [contract_id]   calculate a penalty
  reset                                         clear the current result
  save                                          save the current result as JSON
  share                                         print a shareable summary
  export [json|csv]                             export the full history
  notify email=<addr> phone=<num> name=<name>   send a simulated notice
  history                                       list stored calculations
  show <request_id>                             redisplay a stored calculation
  thresholds                                    show penalty thresholds
  status                                        redraw the current panel
  help                                          show this list
  quit                                          leave the dashboard";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Calculate(CalculationForm),
    Reset,
    Save,
    Share,
    Export(ExportFormat),
    Notify(Recipient),
    History,
    Show(String),
    Thresholds,
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Input::Empty;
    };
    let rest: Vec<&str> = words.collect();

    match command.to_ascii_lowercase().as_str() {
        "calc" | "calculate" => {
            let delay = rest.first().copied().unwrap_or_default();
            let service_type = rest.get(1).copied().unwrap_or_default();
            let contract = rest.get(2).copied().unwrap_or_default();
            Input::Calculate(CalculationForm::new(delay, service_type).with_contract(contract))
        }
        "reset" => Input::Reset,
        "save" => Input::Save,
        "share" => Input::Share,
        "export" => match rest.first().map(|format| format.to_ascii_lowercase()) {
            None => Input::Export(ExportFormat::Json),
            Some(format) if format == "json" => Input::Export(ExportFormat::Json),
            Some(format) if format == "csv" => Input::Export(ExportFormat::Csv),
            Some(format) => Input::Unknown(format!("export {format}")),
        },
        "notify" => Input::Notify(parse_recipient(&rest)),
        "history" => Input::History,
        "show" => match rest.first() {
            Some(id) => Input::Show((*id).to_string()),
            None => Input::Unknown("show needs a request id".to_string()),
        },
        "thresholds" => Input::Thresholds,
        "status" => Input::Status,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

fn parse_recipient(words: &[&str]) -> Recipient {
    let mut recipient = Recipient::default();
    let mut name_parts = Vec::new();
    for word in words {
        match word.split_once('=') {
            Some(("email", value)) => recipient.email = Some(value.to_string()),
            Some(("phone", value)) => recipient.phone = Some(value.to_string()),
            Some(("name", value)) => name_parts.push(value.to_string()),
            _ if !name_parts.is_empty() => name_parts.push((*word).to_string()),
            _ => {}
        }
    }
    if !name_parts.is_empty() {
        recipient.name = Some(name_parts.join(" "));
    }
    recipient
}

pub(crate) async fn run(dashboard: &mut ConsoleDashboard) -> Result<(), AppError> {
    render_welcome(&mut io::stdout().lock())?;
    println!("Type 'help' for commands.");
    dashboard.load_thresholds().await;

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match dispatch(dashboard, parse_input(&line)).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(AppError::Io(err)) => return Err(AppError::Io(err)),
            // Already reported to the user as a toast.
            Err(err) => debug!(error = %err, "command failed"),
        }
    }
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

async fn dispatch(dashboard: &mut ConsoleDashboard, input: Input) -> Result<Flow, AppError> {
    let mut out = io::stdout();
    match input {
        Input::Calculate(form) => {
            dashboard.calculate(&form).await?;
            print_current(dashboard)?;
        }
        Input::Reset => {
            dashboard.reset()?;
            render_state(dashboard.ui().state(), &mut out)?;
        }
        Input::Save => {
            dashboard.save_result()?;
        }
        Input::Share => {
            dashboard.share_result()?;
        }
        Input::Export(format) => {
            dashboard.export_history(format)?;
        }
        Input::Notify(recipient) => {
            dashboard.send_notice(&recipient)?;
        }
        Input::History => render_history(dashboard.ui().history(), &mut out)?,
        Input::Show(id) => {
            dashboard.show_history_entry(&id)?;
            print_current(dashboard)?;
        }
        Input::Thresholds => {
            dashboard.load_thresholds().await;
            render_thresholds(dashboard.ui().thresholds(), &mut out)?;
        }
        Input::Status => render_state(dashboard.ui().state(), &mut out)?,
        Input::Help => writeln!(out, "{HELP}")?,
        Input::Quit => return Ok(Flow::Quit),
        Input::Empty => {}
        Input::Unknown(command) => writeln!(
            out,
            "Unknown command '{command}'. Type 'help' for commands."
        )?,
    }
    Ok(Flow::Continue)
}

fn prompt() -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "ai-bos> ")?;
    out.flush()
}
