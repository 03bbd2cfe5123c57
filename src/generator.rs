//! The generator core: open-element stack, append-only emitted prefix, and
//! the depth-first construction operations.
//!
//! ## The lazy-terminator discipline
//!
//! The emitted prefix always ends in an *unterminated* tag — `<g fill='red'`
//! rather than `<g fill='red'>`. Whether that tag ends in `>` (it got
//! children), ` />` (it was a leaf), or `>` followed by a closing chain
//! (serialization happened mid-build) is only known when the *next* call
//! arrives, so the terminator is supplied by that call instead. This is what
//! keeps the prefix strictly append-only: no operation ever has to back up
//! and rewrite a byte it already committed.
//!
//! The same discipline applies to closing tags: `close` emits `</g` and the
//! following sibling (or the closing-tag cache, see [`crate::render`])
//! supplies the `>`.
//!
//! ## Attributes are raw
//!
//! Attribute strings are written verbatim. The generator does no escaping or
//! quoting — callers own the quoting of attribute values, exactly as they own
//! the element names. Feeding it `width="100%"` or `width='100%'` are both
//! fine; feeding it an unquoted `<` is not, and nothing here will catch that.

use thiserror::Error;

/// Maximum element nesting depth, root included.
///
/// Exceeding it is a construction error, never a silent truncation.
pub const MAX_DEPTH: usize = 127;

/// Four spaces per nesting level; the root is unindented.
pub(crate) const INDENT: &str = "    ";

#[derive(Error, Debug)]
pub enum GenError {
    /// `open` or `add_leaf` would nest elements deeper than [`MAX_DEPTH`].
    #[error("too deep: cannot nest past {MAX_DEPTH} elements")]
    DepthOverflow,
    /// `close` or `close_n` asked to close more elements than are open
    /// above the root. The root itself is only ever closed by serialization.
    #[error("nothing to close")]
    NothingToClose,
    /// Serialization was attempted on a generator that never received a
    /// root element.
    #[error("empty document")]
    EmptyDocument,
    /// The output sink failed during [`Generator::write_all_to`].
    /// `written` counts the bytes confirmed written before the failure.
    #[error("sink failed after {written} bytes")]
    Sink {
        written: usize,
        #[source]
        source: std::io::Error,
    },
}

/// An incremental XML/SVG generator.
///
/// Elements are opened, decorated with attributes, and closed in depth-first
/// order. At any point the document-so-far can be serialized as complete,
/// well-formed markup (see [`Generator::write_all_to`] and
/// [`Generator::drain_into`]) and construction can continue afterwards.
///
/// `Generator::default()` is the *uninitialized* generator: no root, zero
/// content, and any serialization attempt reports
/// [`GenError::EmptyDocument`]. The first `open` on it installs the root.
#[derive(Debug, Default)]
pub struct Generator {
    /// Markup committed so far. Strictly append-only; once non-empty it
    /// always ends in an unterminated tag.
    pub(crate) prefix: String,
    /// Names of the currently open elements, root first. One exclusively
    /// owned slot per depth, reserved up front so construction never
    /// reallocates the stack.
    pub(crate) stack: Vec<String>,
    /// Set by `add_leaf`: the tag the prefix ends in is a leaf still
    /// waiting for its ` />` terminator. A pending leaf is *not* on the
    /// stack and does not count towards depth.
    pub(crate) pending_leaf: bool,
    /// Memoized closing-tag chain; meaningful only while `cache_fresh`.
    pub(crate) closing: String,
    pub(crate) cache_fresh: bool,
}

impl Generator {
    /// Create a generator with `root` as the document root element.
    ///
    /// The root carries no attributes at construction; use
    /// [`Generator::add_attr`] immediately afterwards to decorate it.
    pub fn new(root: &str) -> Generator {
        let mut g = Generator {
            prefix: String::with_capacity(256),
            stack: Vec::with_capacity(MAX_DEPTH),
            ..Generator::default()
        };
        g.prefix.push('<');
        g.prefix.push_str(root);
        g.stack.push(root.to_string());
        g
    }

    /// Number of currently open elements, root included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True for a generator that holds no content at all.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Terminate whatever tag the prefix currently ends in, then indent
    /// for a new child of the innermost open element.
    fn start_child(&mut self) {
        if self.pending_leaf {
            self.prefix.push_str(" />\n");
            self.pending_leaf = false;
        } else if !self.prefix.is_empty() {
            self.prefix.push_str(">\n");
        }
        for _ in 0..self.stack.len() {
            self.prefix.push_str(INDENT);
        }
    }

    fn emit_tag(&mut self, name: &str, attrs: &str) {
        self.prefix.push('<');
        self.prefix.push_str(name);
        if !attrs.is_empty() {
            self.prefix.push(' ');
            self.prefix.push_str(attrs);
        }
    }

    /// Open a new element as a child of the innermost open element.
    ///
    /// The element's opening tag is left unterminated so further attributes
    /// can be appended with [`Generator::add_attr`] before the first child
    /// (or the closing tag) arrives.
    ///
    /// Fails with [`GenError::DepthOverflow`] — without touching any state —
    /// when [`MAX_DEPTH`] elements are already open.
    pub fn open(&mut self, name: &str, attrs: &str) -> Result<(), GenError> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(GenError::DepthOverflow);
        }
        log::trace!(target: "xmlgen", "open <{name}> at depth {}", self.stack.len() + 1);
        self.start_child();
        self.emit_tag(name, attrs);
        self.stack.push(name.to_string());
        self.cache_fresh = false;
        Ok(())
    }

    /// Add a self-closing element with no children, rendered as
    /// `<name attrs />`. Convenience over an `open`/`close` pair.
    ///
    /// The tag is left unterminated until the next operation, so
    /// [`Generator::add_attr`] still applies to it. A leaf is a child like
    /// any other: at [`MAX_DEPTH`] it is rejected with
    /// [`GenError::DepthOverflow`] just as `open` would be.
    pub fn add_leaf(&mut self, name: &str, attrs: &str) -> Result<(), GenError> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(GenError::DepthOverflow);
        }
        self.start_child();
        self.emit_tag(name, attrs);
        self.pending_leaf = true;
        self.cache_fresh = false;
        Ok(())
    }

    /// Append one raw attribute fragment, preceded by a space, to the tag
    /// the prefix currently ends in.
    ///
    /// Contract, not guarded at runtime: valid only while that tag is an
    /// opening tag (i.e. after `new`, `open` or `add_leaf`). Calling it
    /// right after `close` writes the fragment into a closing tag and the
    /// output stops being XML.
    pub fn add_attr(&mut self, attr: &str) {
        self.prefix.push(' ');
        self.prefix.push_str(attr);
        self.cache_fresh = false;
    }

    /// Close the innermost open element.
    ///
    /// Fails with [`GenError::NothingToClose`] when only the root is open;
    /// the root is closed by serialization alone, never explicitly.
    pub fn close(&mut self) -> Result<(), GenError> {
        if self.stack.len() <= 1 {
            return Err(GenError::NothingToClose);
        }
        let Some(name) = self.stack.pop() else {
            return Err(GenError::NothingToClose);
        };
        log::trace!(target: "xmlgen", "close </{name}> to depth {}", self.stack.len());
        if self.pending_leaf {
            self.prefix.push_str(" />\n");
            self.pending_leaf = false;
        } else {
            self.prefix.push_str(">\n");
        }
        for _ in 0..self.stack.len() {
            self.prefix.push_str(INDENT);
        }
        self.prefix.push_str("</");
        self.prefix.push_str(&name);
        self.cache_fresh = false;
        Ok(())
    }

    /// Close `n` elements, innermost first.
    ///
    /// All-or-nothing: when fewer than `n` elements are open above the root
    /// the call fails with [`GenError::NothingToClose`] and the generator is
    /// left exactly as it was. `close_n(0)` is a no-op.
    pub fn close_n(&mut self, n: usize) -> Result<(), GenError> {
        if n >= self.stack.len() {
            return Err(GenError::NothingToClose);
        }
        for _ in 0..n {
            self.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_root() {
        let g = Generator::new("svg");
        assert_eq!(g.prefix, "<svg");
        assert_eq!(g.depth(), 1);
        assert_eq!(g.stack[0], "svg");
        assert!(!g.is_empty());
    }

    #[test]
    fn default_is_empty() {
        let g = Generator::default();
        assert!(g.is_empty());
        assert_eq!(g.depth(), 0);
    }

    #[test]
    fn open_on_empty_generator_installs_root() {
        let mut g = Generator::default();
        g.open("svg", "").unwrap();
        assert_eq!(g.prefix, "<svg");
        assert_eq!(g.depth(), 1);
    }

    #[test]
    fn open_indents_each_level() {
        let mut g = Generator::new("svg");
        g.open("rect", "width=\"100%\" height='100%'").unwrap();
        g.open("rect", "width=\"100%\" height='100%'").unwrap();
        assert_eq!(
            g.prefix,
            "<svg>\n    <rect width=\"100%\" height='100%'>\n        <rect width=\"100%\" height='100%'"
        );
        assert_eq!(g.depth(), 3);
    }

    #[test]
    fn open_with_empty_attrs_emits_bare_tag() {
        let mut g = Generator::new("svg");
        g.open("g", "").unwrap();
        assert_eq!(g.prefix, "<svg>\n    <g");
    }

    #[test]
    fn leaf_renders_self_closing_once_followed() {
        let mut g = Generator::new("svg");
        g.add_leaf("rect", "width=\"100%\" height='100%'").unwrap();
        g.add_leaf("rect", "width=\"100%\" height='100%'").unwrap();
        assert_eq!(
            g.prefix,
            "<svg>\n    <rect width=\"100%\" height='100%' />\n    <rect width=\"100%\" height='100%'"
        );
        // Leaves never join the stack.
        assert_eq!(g.depth(), 1);
    }

    #[test]
    fn add_attr_appends_to_open_tag() {
        let mut g = Generator::new("svg");
        g.add_leaf("rect", "width=\"100%\"").unwrap();
        g.add_attr("style='fill: blue'");
        g.add_attr("id='myRect'");
        assert_eq!(
            g.prefix,
            "<svg>\n    <rect width=\"100%\" style='fill: blue' id='myRect'"
        );
    }

    #[test]
    fn add_attr_decorates_the_root() {
        let mut g = Generator::new("svg");
        g.add_attr("xmlns='http://www.w3.org/2000/svg'");
        assert_eq!(g.prefix, "<svg xmlns='http://www.w3.org/2000/svg'");
    }

    #[test]
    fn close_terminates_pending_leaf_first() {
        let mut g = Generator::new("svg");
        g.open("g", "id='x'").unwrap();
        g.add_leaf("rect", "w='1'").unwrap();
        g.close().unwrap();
        g.open("g", "id='y'").unwrap();
        assert_eq!(
            g.prefix,
            "<svg>\n    <g id='x'>\n        <rect w='1' />\n    </g>\n    <g id='y'"
        );
        assert_eq!(g.depth(), 2);
    }

    #[test]
    fn close_emits_unterminated_closing_tag() {
        let mut g = Generator::new("svg");
        g.open("g", "").unwrap();
        g.close().unwrap();
        // The `>` arrives with the next sibling or from the closing cache.
        assert_eq!(g.prefix, "<svg>\n    <g>\n    </g");
    }

    #[test]
    fn close_at_root_fails_without_mutation() {
        let mut g = Generator::new("svg");
        let before = g.prefix.clone();
        assert!(matches!(g.close(), Err(GenError::NothingToClose)));
        assert_eq!(g.depth(), 1);
        assert_eq!(g.prefix, before);
    }

    #[test]
    fn close_decrements_depth_by_one() {
        let mut g = Generator::new("svg");
        g.open("a", "").unwrap();
        g.open("b", "").unwrap();
        assert_eq!(g.depth(), 3);
        g.close().unwrap();
        assert_eq!(g.depth(), 2);
        g.close().unwrap();
        assert_eq!(g.depth(), 1);
    }

    #[test]
    fn close_n_rejects_overclose_atomically() {
        let mut g = Generator::new("svg");
        for _ in 0..3 {
            g.open("g", "").unwrap();
        }
        g.add_leaf("rect", "").unwrap();
        let before = g.prefix.clone();

        // Only three elements above the root are closeable; the pending
        // leaf does not count.
        assert!(matches!(g.close_n(4), Err(GenError::NothingToClose)));
        assert_eq!(g.depth(), 4);
        assert_eq!(g.prefix, before);
        assert!(g.pending_leaf);

        g.close_n(3).unwrap();
        assert_eq!(g.depth(), 1);
    }

    #[test]
    fn close_n_zero_is_a_noop() {
        let mut g = Generator::new("svg");
        let before = g.prefix.clone();
        g.close_n(0).unwrap();
        assert_eq!(g.prefix, before);
        assert_eq!(g.depth(), 1);
    }

    #[test]
    fn open_fails_past_max_depth() {
        let mut g = Generator::new("root");
        for i in 1..MAX_DEPTH {
            g.open(&format!("lvl{i}"), "").unwrap();
        }
        assert_eq!(g.depth(), MAX_DEPTH);

        let before = g.prefix.clone();
        assert!(matches!(g.open("one-too-many", ""), Err(GenError::DepthOverflow)));
        assert_eq!(g.depth(), MAX_DEPTH);
        assert_eq!(g.prefix, before);
    }

    #[test]
    fn add_leaf_fails_past_max_depth() {
        let mut g = Generator::new("root");
        for i in 1..MAX_DEPTH {
            g.open(&format!("lvl{i}"), "").unwrap();
        }
        let before = g.prefix.clone();
        assert!(matches!(g.add_leaf("leaf", ""), Err(GenError::DepthOverflow)));
        assert_eq!(g.prefix, before);
        assert!(!g.pending_leaf);
    }

    #[test]
    fn mutations_invalidate_the_closing_cache() {
        let mut g = Generator::new("svg");
        g.recompute_closing();
        assert!(g.cache_fresh);

        g.open("g", "").unwrap();
        assert!(!g.cache_fresh);

        g.recompute_closing();
        g.add_attr("id='g1'");
        assert!(!g.cache_fresh);

        g.recompute_closing();
        g.add_leaf("rect", "").unwrap();
        assert!(!g.cache_fresh);

        g.recompute_closing();
        g.close().unwrap();
        assert!(!g.cache_fresh);
    }
}
