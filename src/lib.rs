//! # xmlgen
//!
//! An incremental, streaming generator of well-formed, indented XML/SVG
//! markup. You build a document depth-first — open an element, hang
//! attributes on it, add children, close it — and at *any* point the
//! generator can serialize a syntactically complete snapshot of the
//! document-so-far, open elements included. Construction may then simply
//! continue.
//!
//! ```rust
//! use xmlgen::Generator;
//!
//! let mut svg = Generator::new("svg");
//! svg.add_attr("xmlns='http://www.w3.org/2000/svg'");
//! svg.open("g", "fill='none'")?;
//! svg.add_leaf("rect", "width='10' height='10'")?;
//!
//! // No close() needed: the snapshot supplies every missing closing tag.
//! let xml = svg.to_xml()?;
//! assert!(xml.ends_with("    </g>\n</svg>"));
//! # Ok::<(), xmlgen::GenError>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`generator`] | The [`Generator`] itself: open-element stack, append-only output prefix, construction operations |
//! | [`render`] | Closing-tag cache and the streaming readers ([`Generator::drain_into`], [`Generator::write_all_to`]) |
//! | [`doctype`] | Preamble constants (`XML_DECL`, `SVG_DOCTYPE`) for callers that want a full file header |
//!
//! # Design Decisions
//!
//! ## Append-Only Output
//!
//! Committed markup is never rewritten. The trick that makes mid-build
//! snapshots cheap is that every tag is left *unterminated* until the next
//! construction call decides how it ends (`>`, ` />`, or a closing chain).
//! Serialization therefore never has to undo anything: it emits the
//! committed prefix verbatim, then a lazily recomputed chain of closing
//! tags derived from the open stack. The chain is memoized behind a dirty
//! flag that every mutation clears.
//!
//! ## A Writer, Not a Tree
//!
//! There is no DOM. The document exists only as bytes plus the stack of
//! currently open element names, bounded at [`MAX_DEPTH`]. That rules out
//! random-access edits by design and keeps the cost of a document linear
//! in its text, not its node count.
//!
//! ## Raw Strings In, Raw Strings Out
//!
//! Element names and attribute fragments are written verbatim — no
//! escaping, no validation, no namespace handling. This is a generator for
//! code that already knows what it wants to say (SVG emitters, report
//! writers, test fixtures), not a sanitizer for untrusted input.

pub mod doctype;
pub mod generator;
pub mod render;

pub use generator::{GenError, Generator, MAX_DEPTH};
