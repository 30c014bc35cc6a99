//! Field validation for the student form.
//!
//! Each field has one format rule. A form is valid when all four fields are.
//! Every check also updates [`FieldMarkers`], the set of fields currently
//! flagged as invalid in the UI.
//!
//! # Example
//!
//! ```
//! use rollbook::validation::{validate, validate_form, Field, FieldMarkers};
//!
//! assert!(validate(Field::Uid, "101"));
//! assert!(!validate(Field::Uid, "12a"));
//!
//! let mut markers = FieldMarkers::default();
//! let report = validate_form(
//!     |field| match field {
//!         Field::Name => "Ann Lee",
//!         Field::Uid => "12a",
//!         Field::Email => "a@b.co",
//!         Field::Contact => "1234567890",
//!     },
//!     &mut markers,
//! );
//! assert!(!report.is_valid());
//! assert!(markers.is_marked(Field::Uid));
//! ```

mod rules;

use std::collections::BTreeSet;

pub use rules::{rule_for, Field, FieldRule};

/// Check one raw field value against its rule.
#[must_use]
pub fn validate(field: Field, value: &str) -> bool {
    rule_for(field).matches(value)
}

/// Non-empty letters and whitespace.
#[must_use]
pub fn validate_name(value: &str) -> bool {
    validate(Field::Name, value)
}

/// One or more digits.
#[must_use]
pub fn validate_uid(value: &str) -> bool {
    validate(Field::Uid, value)
}

/// `local@domain.tld`, no whitespace.
#[must_use]
pub fn validate_email(value: &str) -> bool {
    validate(Field::Email, value)
}

/// Ten or more digits.
#[must_use]
pub fn validate_contact(value: &str) -> bool {
    validate(Field::Contact, value)
}

/// Fields currently marked invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMarkers {
    invalid: BTreeSet<Field>,
}

impl FieldMarkers {
    /// Set or clear the marker for one field.
    pub fn set(&mut self, field: Field, valid: bool) {
        if valid {
            self.invalid.remove(&field);
        } else {
            self.invalid.insert(field);
        }
    }

    /// Whether the field is marked invalid.
    #[must_use]
    pub fn is_marked(&self, field: Field) -> bool {
        self.invalid.contains(&field)
    }

    /// Marked fields in form order.
    pub fn marked(&self) -> impl Iterator<Item = Field> + '_ {
        self.invalid.iter().copied()
    }

    /// Remove every marker.
    pub fn clear(&mut self) {
        self.invalid.clear();
    }

    /// True when no field is marked.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Outcome of validating a whole form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    results: [bool; 4],
}

impl ValidationReport {
    /// Whether every field passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|ok| *ok)
    }

    /// Whether a single field passed.
    #[must_use]
    pub fn field(&self, field: Field) -> bool {
        self.results[field as usize]
    }

    /// Fields that failed, in form order.
    pub fn failures(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|f| !self.field(*f))
    }
}

/// Check one field and update its marker.
pub fn check_field(field: Field, value: &str, markers: &mut FieldMarkers) -> bool {
    let valid = validate(field, value);
    markers.set(field, valid);
    valid
}

/// Validate all four fields, updating every marker.
///
/// All fields are checked even after the first failure so every marker
/// reflects the current input.
pub fn validate_form<'a>(
    value_of: impl Fn(Field) -> &'a str,
    markers: &mut FieldMarkers,
) -> ValidationReport {
    let mut results = [false; 4];
    for field in Field::ALL {
        results[field as usize] = check_field(field, value_of(field), markers);
    }
    let report = ValidationReport { results };
    if !report.is_valid() {
        tracing::debug!(
            failed = ?report.failures().collect::<Vec<_>>(),
            "form validation failed"
        );
    }
    report
}
