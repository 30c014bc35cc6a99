//! Built-in field validation rules.
//!
//! One anchored regex per form field. The rules check format only; they say
//! nothing about whether a uid or email actually exists.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Error;

/// A form field that carries user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Student name.
    Name,
    /// University identifier.
    Uid,
    /// Email address.
    Email,
    /// Contact phone number.
    Contact,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 4] = [Field::Name, Field::Uid, Field::Email, Field::Contact];

    /// Key used for this field in the persisted JSON and on the command line.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Uid => "uid",
            Self::Email => "email",
            Self::Contact => "contact",
        }
    }

    /// Human-readable column label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Uid => "Student ID",
            Self::Email => "Email ID",
            Self::Contact => "Contact No.",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "uid" | "id" => Ok(Self::Uid),
            "email" => Ok(Self::Email),
            "contact" | "phone" => Ok(Self::Contact),
            other => Err(Error::invalid_input(format!("unknown field '{other}'"))),
        }
    }
}

/// A compiled validation rule for one field.
#[derive(Debug)]
pub struct FieldRule {
    /// The field this rule guards.
    pub field: Field,

    /// What the rule accepts.
    pub description: &'static str,

    regex: Regex,
}

impl FieldRule {
    /// Create a new rule.
    ///
    /// # Panics
    ///
    /// Panics if the regex pattern is invalid.
    #[must_use]
    pub fn new(field: Field, description: &'static str, pattern: &str) -> Self {
        Self {
            field,
            description,
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
        }
    }

    /// Check the raw field value against this rule.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// The source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

// `\d` in the regex crate is Unicode-aware; digits here are ASCII only.
fn builtin_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(Field::Name, "letters and spaces only", r"^[A-Za-z\s]+$"),
        FieldRule::new(Field::Uid, "digits only", r"^[0-9]+$"),
        FieldRule::new(
            Field::Email,
            "an address like name@example.com",
            r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
        ),
        FieldRule::new(Field::Contact, "at least 10 digits", r"^[0-9]{10,}$"),
    ]
}

/// The rule for a field.
#[must_use]
pub fn rule_for(field: Field) -> &'static FieldRule {
    static RULES: OnceLock<Vec<FieldRule>> = OnceLock::new();
    let rules = RULES.get_or_init(builtin_rules);
    // builtin_rules lists the fields in Field::ALL order
    &rules[field as usize]
}
