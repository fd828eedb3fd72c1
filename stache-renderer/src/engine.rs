//! Rendering — [`Template`] and [`render_unit`].

use stache_core::{load_data, Binding, DataNode, TemplateUnit};

use crate::ast::Node;
use crate::context::ContextStack;
use crate::error::{RenderError, TemplateError};
use crate::parser;

/// Variable injected into every data root, bound to the template file name.
pub const TEMPLATE_FILE_VARIABLE: &str = "TemplateFile";

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// A parsed template, renderable any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        Ok(Template {
            nodes: parser::parse(source)?,
        })
    }

    /// Render against `data`, which becomes the root context.
    pub fn render(&self, data: &DataNode) -> String {
        let mut out = String::new();
        let mut ctx = ContextStack::new(data);
        render_nodes(&self.nodes, &mut ctx, &mut out);
        out
    }
}

fn render_nodes<'a>(nodes: &[Node], ctx: &mut ContextStack<'a>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable { name } => out.push_str(&ctx.resolve(name).to_text()),
            Node::Section {
                name,
                inverted: true,
                children,
            } => {
                if !ctx.resolve(name).is_truthy() {
                    render_nodes(children, ctx, out);
                }
            }
            Node::Section {
                name,
                inverted: false,
                children,
            } => match ctx.resolve(name) {
                Binding::Array(items) => {
                    for item in items {
                        ctx.push(item);
                        render_nodes(children, ctx, out);
                        ctx.pop();
                    }
                }
                Binding::Object(object) => {
                    ctx.push(object);
                    render_nodes(children, ctx, out);
                    ctx.pop();
                }
                scalar if scalar.is_truthy() => render_nodes(children, ctx, out),
                _ => {}
            },
        }
    }
}

// ---------------------------------------------------------------------------
// render_unit
// ---------------------------------------------------------------------------

/// Render a loaded template unit.
///
/// The data file is parsed first, then rendered with [`render_with_data`].
pub fn render_unit(unit: &TemplateUnit) -> Result<String, RenderError> {
    let data = load_data(&unit.data_json, &unit.data_file_name)?;
    render_with_data(unit, data)
}

/// Render `unit` against an already-parsed data tree.
///
/// `TemplateFile` is added to the root, then the template is parsed and
/// rendered.
pub fn render_with_data(unit: &TemplateUnit, mut data: DataNode) -> Result<String, RenderError> {
    data.insert(
        TEMPLATE_FILE_VARIABLE,
        DataNode::string(unit.template_file_name.as_str()),
    );

    let template = Template::parse(&unit.template_text).map_err(|source| RenderError::Template {
        file: unit.template_file_name.clone(),
        source,
    })?;
    Ok(template.render(&data))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use stache_core::EncodingSpec;

    fn render(template: &str, json: &str) -> String {
        let data = load_data(json, "test.json").unwrap();
        Template::parse(template).unwrap().render(&data)
    }

    fn unit(template: &str, json: &str) -> TemplateUnit {
        TemplateUnit {
            template_text: template.to_owned(),
            template_file_name: "MyFile.cs.mustache".to_owned(),
            data_json: json.to_owned(),
            data_file_name: "MyFile.cs.json".to_owned(),
            encoding: EncodingSpec::default(),
        }
    }

    #[test]
    fn interpolates_scalars_without_escaping() {
        assert_eq!(
            render("{{a}} {{b}} {{c}} {{d}}", r#"{ "a": "<T> & \"q\"", "b": 1.25, "c": false, "d": -3 }"#),
            "<T> & \"q\" 1.25 false -3"
        );
    }

    #[test]
    fn bare_containers_render_empty() {
        assert_eq!(render("[{{list}}][{{obj}}]", r#"{ "list": [1], "obj": { "a": 1 } }"#), "[][]");
    }

    #[test]
    fn falsy_sections_are_skipped() {
        let json = r#"{ "f": false, "n": null, "e": [], "s": "", "z": 0 }"#;
        for name in ["f", "n", "e", "s", "z", "missing"] {
            let template = format!("[{{{{#{name}}}}}body{{{{/{name}}}}}]");
            assert_eq!(render(&template, json), "[]", "section {name}");
        }
    }

    #[test]
    fn inverted_sections_mirror_plain_sections() {
        let json = r#"{ "t": true, "e": [], "items": [1] }"#;
        assert_eq!(render("{{^t}}no{{/t}}", json), "");
        assert_eq!(render("{{^e}}none{{/e}}", json), "none");
        assert_eq!(render("{{^items}}none{{/items}}", json), "");
        assert_eq!(render("{{^missing}}absent{{/missing}}", json), "absent");
    }

    #[test]
    fn truthy_scalar_section_keeps_context() {
        assert_eq!(
            render("{{#flag}}{{name}}/{{.}}{{/flag}}", r#"{ "flag": "yes", "name": "n" }"#),
            "n/"
        );
    }

    #[test]
    fn array_of_objects_pushes_each_element() {
        let json = r#"{ "sep": ";", "users": [ { "name": "a" }, { "name": "b" } ] }"#;
        assert_eq!(render("{{#users}}{{name}}{{sep}}{{/users}}", json), "a;b;");
    }

    #[test]
    fn nested_arrays_iterate_inner_elements() {
        assert_eq!(
            render("{{#rows}}[{{#.}}{{.}}{{/.}}]{{/rows}}", r#"{ "rows": [[1, 2], [3]] }"#),
            "[12][3]"
        );
    }

    #[test]
    fn dotted_name_in_section_and_variable() {
        let json = r#"{ "user": { "address": { "city": "Oslo", "zip": "0150" } } }"#;
        assert_eq!(render("{{user.address.city}}", json), "Oslo");
        assert_eq!(render("{{#user.address}}{{zip}}{{/user.address}}", json), "0150");
    }

    #[test]
    fn standalone_lines_produce_clean_source() {
        let template = "enum Color {\n    {{#colors}}\n    {{name}},\n    {{/colors}}\n}\n";
        let json = r#"{ "colors": [ { "name": "Red" }, { "name": "Green" } ] }"#;
        assert_eq!(render(template, json), "enum Color {\n    Red,\n    Green,\n}\n");
    }

    #[test]
    fn render_unit_injects_template_file() {
        let rendered = render_unit(&unit(
            "<b>{{MyTemplateValue}}</b> - <c>{{TemplateFile}}</c>",
            r#"{ "MyTemplateValue": 123 }"#,
        ))
        .unwrap();
        assert_eq!(rendered, "<b>123</b> - <c>MyFile.cs.mustache</c>");
    }

    #[test]
    fn render_unit_is_case_insensitive() {
        let rendered = render_unit(&unit(
            "<b>{{MyTemplateVALUE}}</b> - <c>{{TemplateFILE}}</c>",
            r#"{ "MyTemplateValue": 123 }"#,
        ))
        .unwrap();
        assert_eq!(rendered, "<b>123</b> - <c>MyFile.cs.mustache</c>");
    }

    #[test]
    fn injected_template_file_replaces_user_key() {
        let rendered = render_unit(&unit("{{TemplateFile}}", r#"{ "TemplateFile": "user" }"#)).unwrap();
        assert_eq!(rendered, "MyFile.cs.mustache");
    }

    #[test]
    fn render_with_data_uses_given_tree() {
        let data = load_data(r#"{ "v": "tree" }"#, "MyFile.cs.json").unwrap();
        let rendered = render_with_data(&unit("{{v}}/{{TemplateFile}}", "not parsed"), data).unwrap();
        assert_eq!(rendered, "tree/MyFile.cs.mustache");
    }

    #[test]
    fn render_unit_reports_data_errors_before_template_errors() {
        let err = render_unit(&unit("{{#broken}}", "[42, 43]")).unwrap_err();
        assert!(matches!(err, RenderError::Data(_)), "got: {err}");
        assert_eq!(
            err.to_string(),
            "The content of data file 'MyFile.cs.json' is not an object but an array."
        );
    }

    #[test]
    fn render_unit_names_template_on_syntax_error() {
        let err = render_unit(&unit("ok\n{{#a}}\n", "{}")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The template 'MyFile.cs.mustache' is invalid: line 2: section 'a' is never closed"
        );
    }
}
