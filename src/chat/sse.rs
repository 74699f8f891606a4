//! Stream Decoding
//!
//! The chat endpoint answers with newline-delimited records of the form
//! `data: {"text": "<fragment>"}`. Body chunks do not respect line
//! boundaries, so the decoder keeps the unterminated tail of each chunk and
//! only decodes complete lines. Lines without the `data: ` prefix are
//! ignored; `data: ` lines that fail to parse are logged and skipped.

use serde::Deserialize;

use super::error::ChatError;

const DATA_PREFIX: &str = "data: ";

#[derive(Deserialize)]
struct Chunk {
    text: String,
}

/// Decode a single line.
///
/// Returns `Ok(None)` for lines that are not data records (blank lines,
/// `event:` lines, comments).
pub fn decode_line(line: &str) -> Result<Option<String>, ChatError> {
    let line = line.trim_end_matches('\r');
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };

    serde_json::from_str::<Chunk>(payload)
        .map(|chunk| Some(chunk.text))
        .map_err(|e| ChatError::Decode(format!("{e} in {payload:?}")))
}

/// Incremental decoder over raw body bytes
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    skipped: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a body chunk, returning the fragments of every line it completes
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut fragments = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.decode_into(&line[..line.len() - 1], &mut fragments);
        }
        fragments
    }

    /// Decode whatever remains after the body ended without a final newline
    pub fn finish(&mut self) -> Vec<String> {
        let mut fragments = Vec::new();
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.decode_into(&line, &mut fragments);
        }
        fragments
    }

    /// Number of malformed data lines skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn decode_into(&mut self, line: &[u8], fragments: &mut Vec<String>) {
        let line = String::from_utf8_lossy(line);
        match decode_line(&line) {
            Ok(Some(fragment)) => fragments.push(fragment),
            Ok(None) => {}
            Err(e) => {
                self.skipped += 1;
                tracing::warn!(error = %e, "Skipping malformed stream line");
            }
        }
    }
}
