//! Parsed template tree.

/// A tag name as written in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Name {
    /// `.` — the innermost context itself.
    Implicit,
    /// `name` or `a.b.c`.
    Path(Vec<String>),
}

impl Name {
    pub fn parse(raw: &str) -> Name {
        if raw == "." {
            Name::Implicit
        } else {
            Name::Path(raw.split('.').map(str::to_owned).collect())
        }
    }
}

/// A node in the template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, copied to the output unchanged.
    Text(String),
    /// `{{name}}`, `{{{name}}}` or `{{&name}}`.
    Variable { name: Name },
    /// `{{#name}}...{{/name}}` or, when `inverted`, `{{^name}}...{{/name}}`.
    Section {
        name: Name,
        inverted: bool,
        children: Vec<Node>,
    },
}
