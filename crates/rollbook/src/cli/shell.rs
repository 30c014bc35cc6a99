//! Interactive session.
//!
//! Reads one command per line and drives the same form controller a
//! graphical front end would. Errors are printed and the session carries on.

use std::io::{BufRead, Write};

use crate::app::App;
use crate::error::{Error, Result};
use crate::form::{DeleteOutcome, SubmitOutcome};
use crate::notify::{Clock, NoticeKind};
use crate::record::RecordId;
use crate::storage::SlotStore;
use crate::validation::{rule_for, Field};

const HELP: &str = "\
commands:
  new                 clear the form and start a new record
  set <field> <text>  type into a field (name, uid, email, contact)
  submit              add or update the record in the form
  edit <id>           load a record into the form
  cancel              abandon the current edit
  delete <id>         delete a record (asks first)
  form                show the form
  list                show all records
  help                this text
  quit                leave the session";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Reset the form.
    New,
    /// Type into a field.
    Set(Field, String),
    /// Submit the form.
    Submit,
    /// Load a record for editing.
    Edit(RecordId),
    /// Abandon the edit.
    Cancel,
    /// Delete a record.
    Delete(RecordId),
    /// Print the form.
    Form,
    /// Print the table.
    List,
    /// Print help.
    Help,
    /// End the session.
    Quit,
    /// Blank line.
    Empty,
}

impl ShellCommand {
    /// Parse a line of input.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands or missing arguments.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim_start();

        let command = match word.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "new" => Self::New,
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(Error::invalid_input("usage: set <field> <text>"));
                }
                Self::Set(field.parse()?, value.to_string())
            }
            "submit" | "save" => Self::Submit,
            "edit" => Self::Edit(rest.parse()?),
            "cancel" => Self::Cancel,
            "delete" | "rm" => Self::Delete(rest.parse()?),
            "form" => Self::Form,
            "list" | "ls" => Self::List,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(Error::invalid_input(format!("unknown command '{other}'"))),
        };
        Ok(command)
    }
}

/// Run the session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub fn run<S, C, R, W>(app: &mut App<S, C>, mut input: R, mut out: W) -> Result<()>
where
    S: SlotStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    writeln!(out, "rollbook shell. Type 'help' for commands.")?;
    let mut line = String::new();
    loop {
        app.tick();
        write!(out, "{}> ", prompt_label(app))?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        let command = match ShellCommand::parse(&line) {
            Ok(ShellCommand::Quit) => return Ok(()),
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                continue;
            }
        };

        if let Err(e) = execute(app, command, &mut input, &mut out) {
            match e {
                Error::Io(_) => return Err(e),
                other => writeln!(out, "error: {other}")?,
            }
        }
    }
}

fn execute<S, C, R, W>(app: &mut App<S, C>, command: ShellCommand, input: &mut R, out: &mut W) -> Result<()>
where
    S: SlotStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    match command {
        ShellCommand::New | ShellCommand::Cancel => app.reset_form(),
        ShellCommand::Set(field, value) => {
            if !app.input(field, value) {
                writeln!(out, "  {field}: expected {}", rule_for(field).description)?;
            }
        }
        ShellCommand::Submit => {
            let outcome = app.submit()?;
            print_notice(app, out)?;
            match outcome {
                SubmitOutcome::Invalid(report) => {
                    for field in report.failures() {
                        writeln!(out, "  {field}: expected {}", rule_for(field).description)?;
                    }
                }
                SubmitOutcome::Added(_) | SubmitOutcome::Updated(_) => {
                    write!(out, "{}", app.table().to_text())?;
                }
                SubmitOutcome::Missing(_) => {}
            }
        }
        ShellCommand::Edit(id) => {
            if app.edit(&id) {
                print_form(app, out)?;
            } else {
                return Err(Error::record_not_found(id.as_str()));
            }
        }
        ShellCommand::Delete(id) => {
            let mut confirm = |prompt: &str| ask(&mut *input, &mut *out, prompt);
            match app.delete(&id, &mut confirm)? {
                DeleteOutcome::Deleted { .. } => {
                    print_notice(app, out)?;
                    write!(out, "{}", app.table().to_text())?;
                }
                DeleteOutcome::NotFound => return Err(Error::record_not_found(id.as_str())),
                DeleteOutcome::Declined => {}
            }
        }
        ShellCommand::Form => print_form(app, out)?,
        ShellCommand::List => write!(out, "{}", app.table().to_text())?,
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit | ShellCommand::Empty => {}
    }
    Ok(())
}

fn prompt_label<S: SlotStore, C: Clock>(app: &App<S, C>) -> String {
    match app.form().editing_id() {
        Some(id) => format!("edit {id}"),
        None => "new".to_string(),
    }
}

fn print_notice<S: SlotStore, C: Clock, W: Write>(app: &App<S, C>, out: &mut W) -> Result<()> {
    if let Some(notice) = app.notification() {
        let tag = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "!!",
        };
        writeln!(out, "[{tag}] {}", notice.message)?;
    }
    Ok(())
}

fn print_form<S: SlotStore, C: Clock, W: Write>(app: &App<S, C>, out: &mut W) -> Result<()> {
    let form = app.form();
    writeln!(out, "{}", form.title())?;
    for field in Field::ALL {
        let marker = if form.markers().is_marked(field) { " (invalid)" } else { "" };
        writeln!(out, "  {:<12} {}{marker}", field.label(), form.field(field))?;
    }
    writeln!(out, "  [{}]", form.submit_label())?;
    Ok(())
}

/// Ask a yes/no question. Anything but `y`/`yes`, including a read or
/// write failure, counts as no.
pub fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> bool {
    if write!(out, "{prompt} [y/N] ").and_then(|()| out.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
