use serde::{Deserialize, Serialize};

use crate::{
    car::{CarDraft, CarRecord},
    types::Bhp,
};

/// Submit label shown while a record is being edited.
pub const EDIT_SUBMIT_LABEL: &str = "Update";

/// Form input that cannot become a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The bhp text has no leading integer.
    #[error("BHP must be an integer")]
    BhpNotInteger {
        /// Text that was rejected.
        raw: String,
    },
}

/// Raw text of the form inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormFields {
    /// Make input.
    pub make: String,
    /// Bhp input, unparsed.
    pub bhp: String,
}

impl FormFields {
    /// Fields with the given raw text.
    pub fn new(make: impl Into<String>, bhp: impl Into<String>) -> Self {
        Self {
            make: make.into(),
            bhp: bhp.into(),
        }
    }

    /// True when both inputs are blank.
    pub fn is_empty(&self) -> bool {
        self.make.is_empty() && self.bhp.is_empty()
    }
}

/// Form title and submit button label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormChrome {
    /// Heading above the form.
    pub title: String,
    /// Submit button text.
    pub submit_label: String,
}

/// Fields plus chrome, as the UI should currently show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    /// Input values.
    pub fields: FormFields,
    /// Title and submit label.
    pub chrome: FormChrome,
}

/// The single form shared by create and edit.
#[derive(Debug)]
pub struct FormController {
    fields: FormFields,
    chrome: FormChrome,
    default_chrome: FormChrome,
}

impl FormController {
    /// Empty form showing `default_chrome`.
    pub fn new(default_chrome: FormChrome) -> Self {
        Self {
            fields: FormFields::default(),
            chrome: default_chrome.clone(),
            default_chrome,
        }
    }

    /// Current input values.
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Current title and submit label.
    pub fn chrome(&self) -> &FormChrome {
        &self.chrome
    }

    /// Owned copy of fields and chrome.
    pub fn view(&self) -> FormView {
        FormView {
            fields: self.fields.clone(),
            chrome: self.chrome.clone(),
        }
    }

    /// Replaces the input values, as typing would.
    pub fn set_fields(&mut self, fields: FormFields) {
        self.fields = fields;
    }

    /// Validates the current fields into a payload.
    ///
    /// On failure the bhp field is cleared and the make field is kept.
    pub fn extract_submission(&mut self) -> Result<CarDraft, ValidationError> {
        let Some(bhp) = parse_bhp(&self.fields.bhp) else {
            let raw = std::mem::take(&mut self.fields.bhp);
            return Err(ValidationError::BhpNotInteger { raw });
        };

        Ok(CarDraft {
            make: self.fields.make.clone(),
            bhp,
        })
    }

    /// Clears both inputs.
    pub fn reset_fields(&mut self) {
        self.fields = FormFields::default();
    }

    /// Fills the inputs from `record`.
    pub fn populate(&mut self, record: &CarRecord) {
        self.fields = FormFields {
            make: record.make.clone(),
            bhp: record.bhp.to_string(),
        };
    }

    /// Switches title and label to edit mode for a car of `make`.
    pub fn show_edit_chrome(&mut self, make: &str) {
        self.chrome = FormChrome {
            title: format!("Update {make}"),
            submit_label: EDIT_SUBMIT_LABEL.to_string(),
        };
    }

    /// Puts back the create-mode title and label.
    pub fn restore_chrome(&mut self) {
        self.chrome = self.default_chrome.clone();
    }
}

/// Parses a decimal integer prefix the way browsers' `parseInt(s, 10)` does.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit. Returns `None` when no digit is found or the value does
/// not fit in [`Bhp`].
pub fn parse_bhp(raw: &str) -> Option<Bhp> {
    let s = raw.trim_start();
    let sign_len = usize::from(matches!(s.as_bytes().first(), Some(b'-' | b'+')));
    let digits = &s[sign_len..];

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    s[..sign_len + end].parse().ok()
}
