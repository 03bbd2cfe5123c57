//! Serialization: the closing-tag cache and the streaming readers.
//!
//! The generator keeps two kinds of state: the committed, append-only
//! prefix, and *derived* state — the chain of closing tags that would make
//! the document valid if construction stopped right now. The derived half
//! is memoized behind a dirty flag: every construction call clears the
//! flag, and serialization recomputes the chain only when it is stale.
//! Recomputing walks the open stack without touching it, so serialization
//! never interferes with further construction.

use std::io::Write;

use crate::generator::{GenError, Generator, INDENT};

impl Generator {
    /// Rebuild the closing-tag chain from the open stack.
    ///
    /// The chain begins with ` /` when a leaf is pending, then terminates
    /// and closes each open element from the innermost down to the root
    /// (each closing tag indented to its own level, the root unindented),
    /// and ends with the `>` that terminates the root's closing tag.
    /// Idempotent: absent intervening mutation, repeated calls produce
    /// byte-identical chains.
    pub(crate) fn recompute_closing(&mut self) {
        self.closing.clear();
        if self.pending_leaf {
            self.closing.push_str(" /");
        }
        for level in (0..self.stack.len()).rev() {
            self.closing.push_str(">\n");
            for _ in 0..level {
                self.closing.push_str(INDENT);
            }
            self.closing.push_str("</");
            self.closing.push_str(&self.stack[level]);
        }
        if !self.stack.is_empty() || self.pending_leaf {
            self.closing.push('>');
        }
        self.cache_fresh = true;
    }

    fn refresh_closing(&mut self) {
        if !self.cache_fresh {
            self.recompute_closing();
        }
    }

    /// Copy as much of the complete document as fits into `buf`, returning
    /// the number of bytes copied.
    ///
    /// Non-consuming: generator state is untouched apart from the cache
    /// memo, so repeated calls between mutations return identical bytes.
    /// Prefix bytes come first; only a caller whose buffer holds the whole
    /// prefix plus the closing chain gets guaranteed well-formed markup — a
    /// buffer that fills up mid-prefix gets a truncated raw prefix back.
    ///
    /// Fails with [`GenError::EmptyDocument`] on a generator that never
    /// received a root element.
    pub fn drain_into(&mut self, buf: &mut [u8]) -> Result<usize, GenError> {
        if self.is_empty() {
            return Err(GenError::EmptyDocument);
        }
        let prefix_len = self.prefix.len();
        if buf.len() < prefix_len {
            buf.copy_from_slice(&self.prefix.as_bytes()[..buf.len()]);
            return Ok(buf.len());
        }
        buf[..prefix_len].copy_from_slice(self.prefix.as_bytes());

        self.refresh_closing();
        let rest = &mut buf[prefix_len..];
        let n = rest.len().min(self.closing.len());
        rest[..n].copy_from_slice(&self.closing.as_bytes()[..n]);
        Ok(prefix_len + n)
    }

    /// Write the complete document — emitted prefix, then closing chain —
    /// to `sink`, returning the total byte count.
    ///
    /// A sink failure is propagated immediately as [`GenError::Sink`]
    /// carrying the count of bytes confirmed written; nothing is retried.
    /// The generator itself is left fully usable, and construction may
    /// continue after a successful write.
    pub fn write_all_to<W: Write>(&mut self, mut sink: W) -> Result<usize, GenError> {
        if self.is_empty() {
            return Err(GenError::EmptyDocument);
        }
        self.refresh_closing();

        let mut written = 0;
        for part in [self.prefix.as_bytes(), self.closing.as_bytes()] {
            sink.write_all(part)
                .map_err(|source| GenError::Sink { written, source })?;
            written += part.len();
        }
        Ok(written)
    }

    /// The complete document as an owned string.
    ///
    /// Same snapshot semantics as [`Generator::write_all_to`].
    pub fn to_xml(&mut self) -> Result<String, GenError> {
        if self.is_empty() {
            return Err(GenError::EmptyDocument);
        }
        self.refresh_closing();
        let mut out = String::with_capacity(self.prefix.len() + self.closing.len());
        out.push_str(&self.prefix);
        out.push_str(&self.closing);
        Ok(out)
    }
}
