//! Shared primitive identifiers and scalar aliases.

/// Opaque server-assigned car identifier.
pub type CarId = String;
/// Brake horsepower as entered in the form.
pub type Bhp = i64;
