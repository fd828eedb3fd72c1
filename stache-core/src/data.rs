//! Template data tree and name binding.
//!
//! A data file is parsed into a [`DataNode`] tree. Templates look values up
//! by name through [`DataNode::bind`]: an exact key match wins, otherwise the
//! first key (in file order) that matches case-insensitively is used.

use indexmap::IndexMap;
use serde_json::{Number, Value};

/// Insertion-ordered object body.
pub type DataMap = IndexMap<String, DataNode>;

// ---------------------------------------------------------------------------
// DataNode
// ---------------------------------------------------------------------------

/// A parsed JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum DataNode {
    Object(DataMap),
    Array(Vec<DataNode>),
    Scalar(Scalar),
}

/// A JSON leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl DataNode {
    /// Shorthand for a string scalar.
    pub fn string(value: impl Into<String>) -> Self {
        DataNode::Scalar(Scalar::String(value.into()))
    }

    /// Human-readable kind with an article, as used in error messages
    /// ("an object", "an array", "a string", ...).
    pub fn kind_description(&self) -> &'static str {
        match self {
            DataNode::Object(_) => "an object",
            DataNode::Array(_) => "an array",
            DataNode::Scalar(Scalar::Null) => "null",
            DataNode::Scalar(Scalar::Bool(_)) => "a boolean",
            DataNode::Scalar(Scalar::Number(_)) => "a number",
            DataNode::Scalar(Scalar::String(_)) => "a string",
        }
    }

    /// Child lookup on an object node.
    ///
    /// Tries the exact key first, then falls back to a case-insensitive scan
    /// in insertion order. Non-object nodes have no children.
    pub fn get(&self, key: &str) -> Option<&DataNode> {
        let DataNode::Object(map) = self else {
            return None;
        };
        map.get(key).or_else(|| {
            map.iter()
                .find(|(candidate, _)| eq_ignore_case(candidate, key))
                .map(|(_, value)| value)
        })
    }

    /// Resolve `key` against this node.
    pub fn bind(&self, key: &str) -> Binding<'_> {
        self.get(key).map_or(Binding::Missing, Binding::from)
    }

    /// Set `key` on an object node, replacing an existing entry with the exact
    /// same name in place. Returns `false` for non-object nodes.
    pub fn insert(&mut self, key: impl Into<String>, value: DataNode) -> bool {
        match self {
            DataNode::Object(map) => {
                map.insert(key.into(), value);
                true
            }
            DataNode::Array(_) | DataNode::Scalar(_) => false,
        }
    }
}

impl From<Value> for DataNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DataNode::Scalar(Scalar::Null),
            Value::Bool(b) => DataNode::Scalar(Scalar::Bool(b)),
            Value::Number(n) => DataNode::Scalar(Scalar::Number(n)),
            Value::String(s) => DataNode::Scalar(Scalar::String(s)),
            Value::Array(items) => DataNode::Array(items.into_iter().map(DataNode::from).collect()),
            Value::Object(map) => DataNode::Object(
                map.into_iter()
                    .map(|(key, value)| (key, DataNode::from(value)))
                    .collect(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Result of a name lookup.
///
/// Containers are handed back as-is so sections can iterate them; scalars
/// are unwrapped to their primitive. `Missing` means no key matched and is
/// distinct from an explicit JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding<'a> {
    Missing,
    Null,
    Bool(bool),
    Number(&'a Number),
    Text(&'a str),
    Array(&'a [DataNode]),
    Object(&'a DataNode),
}

impl<'a> From<&'a DataNode> for Binding<'a> {
    fn from(node: &'a DataNode) -> Self {
        match node {
            DataNode::Object(_) => Binding::Object(node),
            DataNode::Array(items) => Binding::Array(items),
            DataNode::Scalar(Scalar::Null) => Binding::Null,
            DataNode::Scalar(Scalar::Bool(b)) => Binding::Bool(*b),
            DataNode::Scalar(Scalar::Number(n)) => Binding::Number(n),
            DataNode::Scalar(Scalar::String(s)) => Binding::Text(s),
        }
    }
}

impl Binding<'_> {
    /// Mustache truthiness: missing, `null`, `false`, `""`, `0` and `[]` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Binding::Missing | Binding::Null => false,
            Binding::Bool(b) => *b,
            Binding::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Binding::Text(s) => !s.is_empty(),
            Binding::Array(items) => !items.is_empty(),
            Binding::Object(_) => true,
        }
    }

    /// Text written for a plain `{{name}}` interpolation.
    ///
    /// Containers render as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Binding::Missing | Binding::Null => String::new(),
            Binding::Bool(b) => b.to_string(),
            Binding::Number(n) => format_number(n),
            Binding::Text(s) => (*s).to_owned(),
            Binding::Array(_) | Binding::Object(_) => String::new(),
        }
    }
}

/// Culture-independent number formatting. Integral floats drop the fraction
/// so `1.0` prints as `1`.
fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> DataNode {
        DataNode::from(value)
    }

    #[test]
    fn exact_match_wins_over_case_insensitive_match() {
        let data = node(json!({ "name": "lower", "Name": "upper" }));
        assert_eq!(data.bind("Name"), Binding::Text("upper"));
        assert_eq!(data.bind("name"), Binding::Text("lower"));
    }

    #[test]
    fn case_insensitive_fallback_uses_first_key_in_file_order() {
        let data = node(json!({ "VALUE": 1, "value": 2 }));
        assert_eq!(data.bind("Value").to_text(), "1");
    }

    #[test]
    fn case_insensitive_lookup_handles_non_ascii() {
        let data = node(json!({ "Größe": "xl" }));
        assert_eq!(data.bind("GRÖSSE"), Binding::Missing);
        assert_eq!(data.bind("grÖße"), Binding::Text("xl"));
    }

    #[test]
    fn missing_is_distinct_from_null() {
        let data = node(json!({ "nothing": null }));
        assert_eq!(data.bind("nothing"), Binding::Null);
        assert_eq!(data.bind("absent"), Binding::Missing);
        assert_eq!(data.bind("nothing").to_text(), "");
        assert_eq!(data.bind("absent").to_text(), "");
    }

    #[test]
    fn containers_bind_as_nodes_and_render_empty() {
        let data = node(json!({ "list": [1, 2], "obj": { "a": 1 } }));
        assert!(matches!(data.bind("list"), Binding::Array(items) if items.len() == 2));
        assert!(matches!(data.bind("obj"), Binding::Object(_)));
        assert_eq!(data.bind("list").to_text(), "");
        assert_eq!(data.bind("obj").to_text(), "");
    }

    #[test]
    fn numbers_use_invariant_formatting() {
        let data = node(json!({ "int": 42, "neg": -7, "float": 1.5, "whole": 2.0, "big": 18446744073709551615u64 }));
        assert_eq!(data.bind("int").to_text(), "42");
        assert_eq!(data.bind("neg").to_text(), "-7");
        assert_eq!(data.bind("float").to_text(), "1.5");
        assert_eq!(data.bind("whole").to_text(), "2");
        assert_eq!(data.bind("big").to_text(), "18446744073709551615");
    }

    #[test]
    fn truthiness() {
        let data = node(json!({
            "t": true, "f": false, "zero": 0, "one": 1, "empty": "", "text": "x",
            "none": [], "some": [0], "obj": {}, "null": null
        }));
        for key in ["t", "one", "text", "some", "obj"] {
            assert!(data.bind(key).is_truthy(), "{key} should be truthy");
        }
        for key in ["f", "zero", "empty", "none", "null", "missing"] {
            assert!(!data.bind(key).is_truthy(), "{key} should be falsy");
        }
    }

    #[test]
    fn insert_replaces_exact_key_in_place() {
        let mut data = node(json!({ "TemplateFile": "user", "other": 1 }));
        assert!(data.insert("TemplateFile", DataNode::string("Foo.cs.mustache")));
        let DataNode::Object(map) = &data else { unreachable!() };
        assert_eq!(map.get_index(0).map(|(k, _)| k.as_str()), Some("TemplateFile"));
        assert_eq!(data.bind("templatefile"), Binding::Text("Foo.cs.mustache"));
    }

    #[test]
    fn insert_on_non_object_is_rejected() {
        let mut data = node(json!([1]));
        assert!(!data.insert("x", DataNode::string("y")));
    }

    #[test]
    fn kind_descriptions() {
        assert_eq!(node(json!([])).kind_description(), "an array");
        assert_eq!(node(json!("s")).kind_description(), "a string");
        assert_eq!(node(json!(3)).kind_description(), "a number");
        assert_eq!(node(json!(true)).kind_description(), "a boolean");
        assert_eq!(node(json!(null)).kind_description(), "null");
    }
}
