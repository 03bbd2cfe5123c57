//! Predefined document preambles.
//!
//! The generator itself emits nothing before the root element; declarations
//! and doctypes are plain constants the caller prepends (typically
//! `XML_DECL`, a newline, optionally `SVG_DOCTYPE`, a newline, then the
//! generator output).

/// Standard XML 1.0 declaration, UTF-8.
pub const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

/// Doctype for standalone SVG 1.0 documents.
pub const SVG_DOCTYPE: &str = "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 20010904//EN\" \"http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd\">";
