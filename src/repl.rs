use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::model::Message;
use crate::model_gateway::ModelGateway;
use crate::render::{self, INPUT_PLACEHOLDER};
use crate::session::ChatSession;
use crate::spinner::Spinner;

const SPINNER_MESSAGE: &str = "Thinking... Generating script...";

enum Command<'a> {
    Quit,
    Redraw,
    Skip,
    Task(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let input = line.trim();
    if input.is_empty() {
        Command::Skip
    } else if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
        Command::Quit
    } else if input.eq_ignore_ascii_case("/history") {
        Command::Redraw
    } else {
        Command::Task(input)
    }
}

/// Interactive loop: draw the page, then one task per line until `exit` or EOF.
/// Failed requests are also reported on `errors`.
pub async fn run_repl<G: ModelGateway>(
    session: &mut ChatSession<G>,
    model: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
    errors: &mut impl Write,
) -> Result<()> {
    render::render_banner(out, model).context("Failed to write to stdout")?;
    if !session.history().is_empty() {
        render::render_history(out, session.history()).context("Failed to write to stdout")?;
    }

    loop {
        write!(out, "{INPUT_PLACEHOLDER}\n> ").context("Failed to write to stdout")?;
        out.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("Failed to read stdin")?;
        if read == 0 {
            writeln!(out).context("Failed to write to stdout")?;
            break;
        }

        match parse_command(&line) {
            Command::Skip => continue,
            Command::Quit => break,
            Command::Redraw => {
                render::render_history(out, session.history())
                    .context("Failed to write to stdout")?;
            }
            Command::Task(task) => {
                writeln!(out).context("Failed to write to stdout")?;
                render::render_message(out, &Message::user(task))
                    .context("Failed to write to stdout")?;

                let spinner = Spinner::start(SPINNER_MESSAGE);
                let reply = session.submit(task).await;
                spinner.finish();

                if reply.is_error {
                    writeln!(errors, "error: {}", reply.content)
                        .context("Failed to write to stderr")?;
                }
                render::render_message(out, &Message::assistant(reply.content))
                    .context("Failed to write to stdout")?;
            }
        }
    }

    Ok(())
}

/// Submits a single task and prints the resulting code block. A failed
/// request is returned as an error after the block is printed.
pub async fn run_once<G: ModelGateway>(
    session: &mut ChatSession<G>,
    task: &str,
    out: &mut impl Write,
) -> Result<()> {
    let reply = session.submit(task).await;
    render::render_code_block(out, &reply.content).context("Failed to write to stdout")?;
    out.flush().context("Failed to flush stdout")?;

    if reply.is_error {
        anyhow::bail!("{}", reply.content);
    }
    Ok(())
}
