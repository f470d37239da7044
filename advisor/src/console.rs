//! Line-oriented console over a [`Session`].

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use northstar_params::{Catalog, FormState};
use thiserror::Error;

use crate::session::{Outcome, Session};
use crate::Advisor;

/// Console help text.
pub const HELP: &str = "\
commands:
  show                 current values and the last result
  fields               field ids, ranges and options
  set <field> <value>  change one field
  predict              run the model on the current values
  reset                restore every default
  page <path>          write the rendered page to <path>
  help                 this text
  quit                 leave the session";

/// One console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the form and the last outcome.
    Show,
    /// Print the field reference.
    Fields,
    /// Edit one field.
    Set {
        /// Field id.
        field: String,
        /// Raw widget text.
        value: String,
    },
    /// Trigger a prediction.
    Predict,
    /// Restore defaults.
    Reset,
    /// Write the rendered page.
    Page(PathBuf),
    /// Print [`HELP`].
    Help,
    /// End the session.
    Quit,
}

/// Errors raised while parsing a console line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The line is blank.
    #[error("empty command")]
    Empty,
    /// The first word is not a command.
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    /// A required argument is absent.
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// What is missing.
        argument: &'static str,
    },
    /// Arguments were given to a command that takes none.
    #[error("`{0}` takes no arguments")]
    UnexpectedArgument(&'static str),
}

impl Command {
    /// Parses one input line.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] if the line is blank, names no known
    /// command, or has the wrong arguments.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let bare = |command: &'static str, parsed: Command| {
            if rest.is_empty() {
                Ok(parsed)
            } else {
                Err(CommandError::UnexpectedArgument(command))
            }
        };
        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "show" => bare("show", Command::Show),
            "fields" => bare("fields", Command::Fields),
            "predict" => bare("predict", Command::Predict),
            "reset" => bare("reset", Command::Reset),
            "help" | "?" => bare("help", Command::Help),
            "quit" | "exit" => bare("quit", Command::Quit),
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None if rest.is_empty() => {
                        return Err(CommandError::MissingArgument {
                            command: "set",
                            argument: "a field id",
                        })
                    }
                    None => (rest, ""),
                };
                if value.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "set",
                        argument: "a value",
                    });
                }
                Ok(Command::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                })
            }
            "page" => {
                if rest.is_empty() {
                    Err(CommandError::MissingArgument {
                        command: "page",
                        argument: "an output path",
                    })
                } else {
                    Ok(Command::Page(PathBuf::from(rest)))
                }
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Current values, one field per line.
pub fn describe_form(form: &FormState) -> String {
    let catalog = form.catalog();
    let mut out = String::new();
    for field in &catalog.numeric {
        let value = form.numeric(field.id).unwrap_or(field.default);
        out.push_str(&format!("{:<12} {:<30} {}\n", field.id, field.label, value));
    }
    for field in &catalog.categorical {
        let value = form.category(field.id).unwrap_or_default();
        out.push_str(&format!("{:<12} {:<30} {}\n", field.id, field.label, value));
    }
    out
}

/// Field ids with their ranges or options.
pub fn describe_fields(catalog: &Catalog) -> String {
    let mut out = String::new();
    for field in &catalog.numeric {
        out.push_str(&format!(
            "{:<12} {} in [{}, {}], step {}, default {}\n",
            field.id,
            field.kind.as_str(),
            field.min,
            field.max,
            field.step,
            field.default
        ));
    }
    for field in &catalog.categorical {
        out.push_str(&format!(
            "{:<12} one of {}\n",
            field.id,
            field.options.join(" | ")
        ));
    }
    out
}

/// Plain-text rendering of an outcome.
pub fn describe_outcome(outcome: &Outcome, precision: usize) -> String {
    match outcome {
        Outcome::Predicted(prediction) => format!(
            "{}\nProbability of SUCCESS: {}",
            prediction.label.as_str(),
            prediction.probability_text(precision)
        ),
        Outcome::Failed(message) => format!("prediction failed: {}", message),
    }
}

fn execute<W: Write>(
    advisor: &Advisor,
    session: &mut Session,
    command: Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Show => {
            write!(out, "{}", describe_form(session.form()))?;
            if let Some(outcome) = session.outcome() {
                writeln!(
                    out,
                    "{}",
                    describe_outcome(outcome, advisor.config().probability_precision)
                )?;
            }
        }
        Command::Fields => write!(out, "{}", describe_fields(advisor.catalog()))?,
        Command::Set { field, value } => match session.edit(&field, &value) {
            Ok(()) => {
                let form = session.form();
                let shown = form
                    .numeric(&field)
                    .map(|v| v.to_string())
                    .or_else(|| form.category(&field).map(str::to_string))
                    .unwrap_or_default();
                writeln!(out, "{} = {}", field, shown)?;
            }
            Err(e) => writeln!(out, "error: {}", e)?,
        },
        Command::Predict => {
            let precision = advisor.config().probability_precision;
            let text = describe_outcome(advisor.trigger(session), precision);
            writeln!(out, "{}", text)?;
            session.settle();
        }
        Command::Reset => {
            session.reset();
            writeln!(out, "form reset to defaults")?;
        }
        Command::Page(path) => match advisor.write_page(session, &path) {
            Ok(()) => writeln!(out, "wrote {}", path.display())?,
            Err(e) => writeln!(out, "error: {:#}", e)?,
        },
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => {}
    }
    Ok(())
}

/// Reads commands from `input` until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if `input` or `output` fail; command errors are
/// reported on `output` and the session continues.
pub fn run<R: BufRead, W: Write>(advisor: &Advisor, input: R, mut output: W) -> Result<()> {
    let mut session = advisor.new_session();
    writeln!(output, "{}", advisor.catalog().copy.title)?;
    writeln!(output, "type `help` for commands")?;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(advisor, &mut session, command, &mut output)?,
            Err(e) => writeln!(output, "error: {}", e)?,
        }
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!(Command::parse("show"), Ok(Command::Show));
        assert_eq!(Command::parse("  FIELDS "), Ok(Command::Fields));
        assert_eq!(Command::parse("predict"), Ok(Command::Predict));
        assert_eq!(Command::parse("reset"), Ok(Command::Reset));
        assert_eq!(Command::parse("?"), Ok(Command::Help));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
        assert_eq!(
            Command::parse("set power 200"),
            Ok(Command::Set {
                field: "power".to_string(),
                value: "200".to_string()
            })
        );
        assert_eq!(
            Command::parse("page out/index.html"),
            Ok(Command::Page(PathBuf::from("out/index.html")))
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("launch"),
            Err(CommandError::Unknown("launch".to_string()))
        );
        assert!(matches!(
            Command::parse("set"),
            Err(CommandError::MissingArgument { argument: "a field id", .. })
        ));
        assert!(matches!(
            Command::parse("set power"),
            Err(CommandError::MissingArgument { argument: "a value", .. })
        ));
        assert_eq!(
            Command::parse("predict now"),
            Err(CommandError::UnexpectedArgument("predict"))
        );
        assert!(matches!(
            Command::parse("page"),
            Err(CommandError::MissingArgument { command: "page", .. })
        ));
    }

    #[test]
    fn form_description_lists_defaults() {
        let text = describe_form(&FormState::defaults(Catalog::full()));
        assert_eq!(text.lines().count(), 10);
        assert!(text.lines().next().unwrap().ends_with(" 180"));
        assert!(text.contains("same-layer"));
    }

    #[test]
    fn field_reference_shows_ranges_and_options() {
        let text = describe_fields(Catalog::full());
        assert!(text.contains("in [50, 500], step 1, default 180"));
        assert!(text.contains("one of Argon | Nitrogen"));
    }
}
