// Output Parser Port
// One implementation per platform grammar, selected by ParserFactory

use crate::domain::ProbeResult;
use crate::error::Result;

/// Stateful, single-use consumer of one probe's stdout
///
/// Lifecycle: `Collecting` -> `Finalized`. Lines must be fed in the
/// order the process emitted them, each exactly once.
pub trait OutputParser: Send {
    /// Consume one complete line (without its newline)
    ///
    /// # Errors
    /// - ProbeError::InvalidParserState if called after `finalize`
    fn ingest(&mut self, line: &str) -> Result<()>;

    /// Close accumulation and compute the result
    ///
    /// # Errors
    /// - ProbeError::InvalidParserState if already finalized
    fn finalize(&mut self) -> Result<ProbeResult>;
}
