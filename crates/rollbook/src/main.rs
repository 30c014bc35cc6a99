//! `rollbook` - CLI for the student record book

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;

use rollbook::app::App;
use rollbook::cli::{shell, Cli, Command, ConfigCommand, FieldArgs, ListCommand, OutputFormat};
use rollbook::form::{DeleteOutcome, SubmitOutcome};
use rollbook::notify::{Clock, NoticeKind, SystemClock};
use rollbook::render::{render, Viewport};
use rollbook::validation::rule_for;
use rollbook::{init_logging, Config, Field, RecordId, SlotStore, SqliteSlotStore};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Loaded per command so `config path` and `config validate` still work
    // when the active configuration is broken.
    let load_config = || Config::load_from(cli.config.clone());

    match cli.command {
        Command::Add(cmd) => {
            let config = load_config()?;
            let mut app = open_app(&config)?;
            // Missing fields are typed as empty so they get flagged too
            let data = cmd.fields.to_data();
            for field in Field::ALL {
                app.input(field, data.get(field));
            }
            submit(&mut app)
        }
        Command::List(cmd) => {
            let config = load_config()?;
            let app = open_app(&config)?;
            handle_list(&app, &config, &cmd)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Show(cmd) => {
            let config = load_config()?;
            let app = open_app(&config)?;
            let id: RecordId = cmd.id.parse()?;
            let Some(record) = app.store().find(&id) else {
                bail!(rollbook::Error::record_not_found(id.as_str()));
            };
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(record)?);
            } else {
                println!("{:<12} {}", "ID", record.id);
                for field in Field::ALL {
                    println!("{:<12} {}", field.label(), record.data.get(field));
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Edit(cmd) => {
            let config = load_config()?;
            let mut app = open_app(&config)?;
            let id: RecordId = cmd.id.parse()?;
            if !app.edit(&id) {
                bail!(rollbook::Error::record_not_found(id.as_str()));
            }
            apply_fields(&mut app, &cmd.fields);
            submit(&mut app)
        }
        Command::Delete(cmd) => {
            let config = load_config()?;
            let mut app = open_app(&config)?;
            let id: RecordId = cmd.id.parse()?;
            let mut confirm =
                |prompt: &str| cmd.yes || shell::ask(&mut io::stdin().lock(), &mut io::stdout(), prompt);
            match app.delete(&id, &mut confirm)? {
                DeleteOutcome::Deleted { .. } => {
                    print_notice(&app);
                    Ok(ExitCode::SUCCESS)
                }
                DeleteOutcome::NotFound => bail!(rollbook::Error::record_not_found(id.as_str())),
                DeleteOutcome::Declined => {
                    println!("Nothing deleted.");
                    Ok(ExitCode::SUCCESS)
                }
            }
        }
        Command::Check(cmd) => {
            let field = Field::from(cmd.field);
            if rollbook::validate(field, &cmd.value) {
                println!("valid {field}");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid {field}: expected {}", rule_for(field).description);
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Shell => {
            let config = load_config()?;
            let mut app = open_app(&config)?;
            shell::run(&mut app, io::stdin().lock(), io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(cmd) => handle_config(cli.config.clone(), cmd),
    }
}

fn open_app(config: &Config) -> anyhow::Result<App<SqliteSlotStore, SystemClock>> {
    App::open(config).context("could not open the record database")
}

fn apply_fields<S: SlotStore, C: Clock>(app: &mut App<S, C>, fields: &FieldArgs) {
    for (field, value) in fields.given() {
        app.input(field, value);
    }
}

fn submit<S: SlotStore, C: Clock>(app: &mut App<S, C>) -> anyhow::Result<ExitCode> {
    let outcome = app.submit()?;
    print_notice(app);
    match outcome {
        SubmitOutcome::Added(record) => {
            println!("id: {}", record.id);
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Updated(_) => Ok(ExitCode::SUCCESS),
        SubmitOutcome::Invalid(report) => {
            for field in report.failures() {
                eprintln!("  {field}: expected {}", rule_for(field).description);
            }
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::Missing(_) => Ok(ExitCode::FAILURE),
    }
}

fn print_notice<S: SlotStore, C: Clock>(app: &App<S, C>) {
    if let Some(notice) = app.notification() {
        match notice.kind {
            NoticeKind::Success => println!("{}", notice.message),
            NoticeKind::Error => eprintln!("{}", notice.message),
        }
    }
}

fn handle_list<S: SlotStore, C: Clock>(
    app: &App<S, C>,
    config: &Config,
    cmd: &ListCommand,
) -> anyhow::Result<()> {
    let visible_rows = cmd.rows.unwrap_or(config.display.visible_rows);
    let table = render(app.store().records(), Viewport { visible_rows });

    match cmd.format {
        OutputFormat::Plain => print!("{}", table.to_plain()),
        OutputFormat::Table => print!("{}", table.to_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(app.store().records())?),
        OutputFormat::Html => print!("{}", table.to_html()),
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.storage.slot_key);
                println!();
                println!("[Notifications]");
                println!("  Appear delay (ms):  {}", config.notifications.appear_delay_ms);
                println!("  Display (ms):       {}", config.notifications.display_ms);
                println!(
                    "  Hide (ms):          {}",
                    config.notifications.hide_transition_ms
                );
                println!();
                println!("[Display]");
                println!("  Visible rows:       {}", config.display.visible_rows);
                println!("  Confirm deletes:    {}", config.display.confirm_deletes);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
