// ── Attr ──────────────────────────────────────────────────────────────────

/// A single `name="value"` attribute on an element tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

// ── Child ─────────────────────────────────────────────────────────────────

/// A child of an element: either a nested element or a run of character data.
///
/// Comments and processing instructions are discarded during parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(Node),
    Text(String),
}

// ── Node ──────────────────────────────────────────────────────────────────

/// An element node in the document tree.
///
/// ```xml
/// <Button id="save" style="default">Save</Button>
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Tag name: `"Container"`, `"Button"`, `"Content"`, …
    pub name: String,
    /// Attributes in document order.
    pub attrs: Vec<Attr>,
    /// Child nodes in document order (elements interleaved with text runs).
    pub children: Vec<Child>,
}

impl Node {
    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|a| a.name == name).map(|a| a.value.as_str())
    }

    /// Iterate the element children, skipping text runs.
    pub fn elements(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|c| match c {
            Child::Element(n) => Some(n),
            Child::Text(_) => None,
        })
    }

    /// Concatenated, whitespace-trimmed character data directly under this node.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let Child::Text(t) = child {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(t.trim());
            }
        }
        out
    }
}

// ── Document ──────────────────────────────────────────────────────────────

/// The top-level parse result for an XML source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
}
