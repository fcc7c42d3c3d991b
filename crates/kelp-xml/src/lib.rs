//! Lexer, parser, and AST for kelp UI documents (XML).
//!
//! This crate is intentionally dependency-free so it can be consumed by
//! authoring tools and linters without pulling in any widget or drawing
//! code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Document`, `Node`, `Child`, `Attr` |
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_str` entry point |
//!
//! # Quick start
//!
//! ```rust
//! use kelp_xml::parse_str;
//!
//! let src = r#"
//!     <kelp>
//!         <Frame id="main" caption="Demo">
//!             <Button id="save">Save</Button>
//!         </Frame>
//!     </kelp>
//! "#;
//!
//! let doc = parse_str(src).unwrap();
//! assert_eq!(doc.root.name, "kelp");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Attr, Child, Document, Node};
pub use error::ParseError;
pub use parser::parse_str;

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) -> Document { parse_str(src).unwrap() }
    fn err(src: &str) -> ParseError { parse_str(src).unwrap_err() }

    #[test] fn empty_element() { ok("<kelp></kelp>"); }
    #[test] fn self_closing() { ok("<kelp><Button id=\"a\"/></kelp>"); }
    #[test] fn nested_elements() {
        let doc = ok("<kelp><Container><Button id=\"a\"/><Button id=\"b\"/></Container></kelp>");
        let container = doc.root.elements().next().unwrap();
        assert_eq!(container.name, "Container");
        assert_eq!(container.elements().count(), 2);
    }
    #[test] fn attributes() {
        let doc = ok(r#"<kelp><Frame id="main" caption="My Window" width="200"/></kelp>"#);
        let frame = doc.root.elements().next().unwrap();
        assert_eq!(frame.attr("id"), Some("main"));
        assert_eq!(frame.attr("caption"), Some("My Window"));
        assert_eq!(frame.attr("width"), Some("200"));
        assert_eq!(frame.attr("missing"), None);
    }
    #[test] fn single_quoted_attr() {
        let doc = ok("<kelp><Button id='ok'/></kelp>");
        assert_eq!(doc.root.elements().next().unwrap().attr("id"), Some("ok"));
    }
    #[test] fn text_content() {
        let doc = ok("<kelp><Button id=\"a\">  Click me  </Button></kelp>");
        assert_eq!(doc.root.elements().next().unwrap().text(), "Click me");
    }
    #[test] fn text_interleaved_with_elements() {
        let doc = ok("<kelp><p>before <b>bold</b> after</p></kelp>");
        let p = doc.root.elements().next().unwrap();
        assert_eq!(p.children.len(), 3);
        assert_eq!(p.text(), "before after");
    }
    #[test] fn whitespace_between_tags_dropped() {
        let doc = ok("<kelp>\n    <Button id=\"a\"/>\n</kelp>");
        assert_eq!(doc.root.children.len(), 1);
    }
    #[test] fn comments_skipped() {
        let doc = ok("<!-- header --><kelp><!-- body --><Button id=\"a\"/><!-- tail --></kelp>");
        assert_eq!(doc.root.elements().count(), 1);
    }
    #[test] fn xml_declaration_skipped() {
        ok("<?xml version=\"1.0\"?><kelp></kelp>");
    }
    #[test] fn entities_decoded() {
        let doc = ok(r#"<kelp><t a="&lt;&amp;&gt;">&quot;hi&quot; &apos;there&apos;</t></kelp>"#);
        let t = doc.root.elements().next().unwrap();
        assert_eq!(t.attr("a"), Some("<&>"));
        assert_eq!(t.text(), "\"hi\" 'there'");
    }
    #[test] fn error_position_reported() {
        let e = err("<kelp>\n  <oops\n</kelp>");
        assert_eq!(e.line, 3);
    }
    #[test] fn err_mismatched_close() {
        let e = err("<kelp><Button></Container></kelp>");
        assert!(e.message.contains("Button"));
        assert!(e.message.contains("Container"));
    }
    #[test] fn err_unclosed_root() { err("<kelp><Button id=\"a\"/>"); }
    #[test] fn err_unterminated_attr() { err("<kelp><Button id=\"a></kelp>"); }
    #[test] fn err_bare_attr() { err("<kelp><Button disabled/></kelp>"); }
    #[test] fn err_unknown_entity() { err("<kelp><t>&nbsp;</t></kelp>"); }
    #[test] fn err_text_outside_root() { err("hello <kelp></kelp>"); }
    #[test] fn err_two_roots() { err("<kelp></kelp><kelp></kelp>"); }
    #[test] fn err_unterminated_comment() { err("<kelp><!-- oops </kelp>"); }
}
