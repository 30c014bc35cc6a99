//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::RecordData;
use crate::validation::Field;

/// Field values given on the command line.
#[derive(Debug, Clone, Default, Args)]
pub struct FieldArgs {
    /// Student name (letters and spaces)
    #[arg(short, long)]
    pub name: Option<String>,

    /// University ID (digits)
    #[arg(short, long)]
    pub uid: Option<String>,

    /// Email address
    #[arg(short, long)]
    pub email: Option<String>,

    /// Contact number (10 or more digits)
    #[arg(short = 'p', long)]
    pub contact: Option<String>,
}

impl FieldArgs {
    /// Fields that were given, in form order.
    #[must_use]
    pub fn given(&self) -> Vec<(Field, &str)> {
        [
            (Field::Name, &self.name),
            (Field::Uid, &self.uid),
            (Field::Email, &self.email),
            (Field::Contact, &self.contact),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }

    /// All four values, missing ones empty.
    #[must_use]
    pub fn to_data(&self) -> RecordData {
        let mut data = RecordData::default();
        for (field, value) in self.given() {
            data.set(field, value);
        }
        data
    }
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Values for the new record
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Rows that fit before the table is treated as scrolling
    #[arg(long)]
    pub rows: Option<usize>,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Record id
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Record id
    pub id: String,

    /// Fields to change; the rest keep their stored values
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Record id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Field whose rule to apply
    #[arg(value_enum)]
    pub field: FieldArg,

    /// Raw value to check
    pub value: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Form field argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldArg {
    /// Student name
    Name,
    /// University ID
    Uid,
    /// Email address
    Email,
    /// Contact number
    Contact,
}

impl From<FieldArg> for Field {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Name => Self::Name,
            FieldArg::Uid => Self::Uid,
            FieldArg::Email => Self::Email,
            FieldArg::Contact => Self::Contact,
        }
    }
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated lines, no header
    Plain,
    /// Aligned text table
    #[default]
    Table,
    /// JSON array of records
    Json,
    /// HTML table body
    Html,
}
