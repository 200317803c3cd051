//! Interactive session driven by line commands on stdin.
//!
//! Every command that changes a setting builds a new [`DashboardConfig`]
//! and re-renders. Fetches go through the shared cache, so changing only
//! a filter never hits the network again, and returning to an earlier
//! `(query, days)` pair within the freshness window reuses its result.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `query <text>` | replace the search query |
//! | `days <n>` | set the look-back window (1-365) |
//! | `title <text>` | title filter (no argument clears it) |
//! | `domain <text>` | domain filter (no argument clears it) |
//! | `gdelt on\|off` | toggle the GDELT source |
//! | `show` | render again with the current settings |
//! | `help` | list commands |
//! | `quit` | leave the session |

use crate::config::DashboardConfig;
use crate::dashboard;
use crate::outputs;
use crate::sources::ArticleSource;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

pub const HELP: &str = "\
commands:
  query <text>    replace the search query
  days <n>        look-back window in days (1-365)
  title [text]    filter titles (empty clears)
  domain [text]   filter domains (empty clears)
  gdelt on|off    enable or disable the GDELT source
  show            render again
  help            this message
  quit            leave
";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Days(u32),
    Title(String),
    Domain(String),
    Gdelt(bool),
    Show,
    Help,
    Quit,
}

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "query" | "q" if !rest.is_empty() => Command::Query(rest.to_string()),
        "query" | "q" => return Err("query needs some text".to_string()),
        "days" | "d" => rest
            .parse()
            .map(Command::Days)
            .map_err(|_| format!("not a number of days: {rest:?}"))?,
        "title" | "t" => Command::Title(rest.to_string()),
        "domain" => Command::Domain(rest.to_string()),
        "gdelt" => match rest.to_lowercase().as_str() {
            "on" => Command::Gdelt(true),
            "off" => Command::Gdelt(false),
            _ => return Err("usage: gdelt on|off".to_string()),
        },
        "show" | "refresh" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?} (try `help`)")),
    };
    Ok(Some(command))
}

/// What the session should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Render(DashboardConfig),
    Print(String),
    Quit,
}

/// Apply `command` to `config`, returning the next step.
pub fn apply(config: &DashboardConfig, command: Command) -> Step {
    let next = config.clone();
    match command {
        Command::Query(q) => Step::Render(next.with_query(q)),
        Command::Days(n) => match next.with_window_days(n) {
            Ok(next) => Step::Render(next),
            Err(e) => Step::Print(format!("{e}\n")),
        },
        Command::Title(t) => Step::Render(next.with_title_filter(t)),
        Command::Domain(d) => Step::Render(next.with_domain_filter(d)),
        Command::Gdelt(on) => Step::Render(next.with_gdelt(on)),
        Command::Show => Step::Render(next),
        Command::Help => Step::Print(HELP.to_string()),
        Command::Quit => Step::Quit,
    }
}

/// Run the session until `quit` or end of input.
///
/// Renders once with `config` before reading any command.
#[instrument(level = "info", skip_all)]
pub async fn run<S, R, W>(
    source: &S,
    mut config: DashboardConfig,
    input: R,
    out: &mut W,
    json_output_dir: Option<&str>,
) -> std::io::Result<()>
where
    S: ArticleSource,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let view = dashboard::render(source, &config).await;
    outputs::emit(out, &config, &view, json_output_dir).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                out.write_all(format!("{msg}\n").as_bytes()).await?;
                continue;
            }
        };
        debug!(?command, "Session command");

        match apply(&config, command) {
            Step::Render(next) => {
                config = next;
                let view = dashboard::render(source, &config).await;
                outputs::emit(out, &config, &view, json_output_dir).await?;
            }
            Step::Print(text) => out.write_all(text.as_bytes()).await?,
            Step::Quit => break,
        }
    }

    out.flush().await?;
    info!("Session ended");
    Ok(())
}
