//! `SearchOutputObserver<W>`: bridges `SearchObserver` to an `OutputWriter`.

use sr_optimize::{GenerationStats, SearchObserver, SearchOutcome};

use crate::writer::OutputWriter;
use crate::{GenerationRow, OutputError, OutputResult};

/// A [`SearchObserver`] that writes one progress row per generation to any
/// [`OutputWriter`] and finishes the writer when the search ends.
///
/// `SearchObserver` methods have no return value, so write errors are stored.
/// After the search returns, check with [`take_error`][Self::take_error].
pub struct SearchOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SearchOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after the search returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SearchObserver for SearchOutputObserver<W> {
    fn on_generation(&mut self, stats: &GenerationStats) {
        let result = self.writer.write_generation(&GenerationRow::from(stats));
        self.store_err(result);
    }

    fn on_search_end(&mut self, _outcome: &SearchOutcome) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
