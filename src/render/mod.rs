//! Renderer collaborator and a plain-text implementation.

use std::io::Write;

use crate::car::CarRecord;

/// Turns the current ordered collection into something visible.
///
/// Every call must fully replace what an earlier call produced.
pub trait Renderer: Send + 'static {
    /// Shows `records` in order.
    fn render(&mut self, records: &[CarRecord]);
}

/// Writes a count line followed by one line per car.
///
/// ```text
/// 2
/// - Ford (120 bhp) [1]
/// - Audi (200 bhp) [2]
/// ```
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write + Send + 'static> TextRenderer<W> {
    /// Renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Unwraps the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_list(&mut self, records: &[CarRecord]) -> std::io::Result<()> {
        writeln!(self.out, "{}", records.len())?;
        for car in records {
            writeln!(self.out, "- {} ({} bhp) [{}]", car.make, car.bhp, car.id)?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send + 'static> Renderer for TextRenderer<W> {
    fn render(&mut self, records: &[CarRecord]) {
        if let Err(err) = self.write_list(records) {
            tracing::warn!(%err, "failed to render car list");
        }
    }
}
