use std::collections::BTreeMap;

use handlebars::html_escape;
use serde::Serialize;

const VOID_TAGS: [&str; 4] = ["input", "br", "hr", "img"];

/// Headless UI tree produced by the renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum UiNode {
    Element(Element),
    Text { text: String },
    /// Markup supplied by HubSpot (labels, inline messages), emitted unescaped.
    Html { html: String },
    Fragment { children: Vec<UiNode> },
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<UiNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn opt_attr(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Sets a boolean attribute when `on`.
    pub fn flag(self, name: &str, on: bool) -> Self {
        if on { self.attr(name, name) } else { self }
    }

    pub fn class(self, class: Option<&str>) -> Self {
        self.opt_attr("class", class)
    }

    pub fn child(mut self, node: UiNode) -> Self {
        if !matches!(node, UiNode::Empty) {
            self.children.push(node);
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = UiNode>) -> Self {
        for node in nodes {
            self = self.child(node);
        }
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(UiNode::text(text))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn into_node(self) -> UiNode {
        UiNode::Element(self)
    }
}

impl From<Element> for UiNode {
    fn from(element: Element) -> Self {
        UiNode::Element(element)
    }
}

impl UiNode {
    pub fn text(text: impl Into<String>) -> Self {
        UiNode::Text { text: text.into() }
    }

    pub fn html(html: impl Into<String>) -> Self {
        UiNode::Html { html: html.into() }
    }

    /// Groups `children`, dropping empty nodes. A lone child is returned as is.
    pub fn fragment(children: impl IntoIterator<Item = UiNode>) -> Self {
        let mut children: Vec<_> = children
            .into_iter()
            .filter(|node| !matches!(node, UiNode::Empty))
            .collect();
        match children.len() {
            0 => UiNode::Empty,
            1 => children.remove(0),
            _ => UiNode::Fragment { children },
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, UiNode::Empty)
    }

    fn child_nodes(&self) -> &[UiNode] {
        match self {
            UiNode::Element(element) => &element.children,
            UiNode::Fragment { children } => children,
            _ => &[],
        }
    }

    /// Depth-first walk over every element in the tree.
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_elements(&mut out);
        out
    }

    fn collect_elements<'a>(&'a self, out: &mut Vec<&'a Element>) {
        if let UiNode::Element(element) = self {
            out.push(element);
        }
        for child in self.child_nodes() {
            child.collect_elements(out);
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.elements()
            .into_iter()
            .find(|element| element.get("id") == Some(id))
    }

    /// Concatenated text and markup content of the subtree.
    pub fn text_content(&self) -> String {
        match self {
            UiNode::Text { text } => text.clone(),
            UiNode::Html { html } => html.clone(),
            other => other
                .child_nodes()
                .iter()
                .map(UiNode::text_content)
                .collect(),
        }
    }

    /// The name/value pairs a browser would submit for the controls in this tree.
    ///
    /// Unnamed or disabled controls are skipped, radios and checkboxes only count
    /// when checked, and a select without an explicit selection submits its first
    /// enabled option.
    pub fn form_data(&self) -> Vec<(String, String)> {
        self.elements()
            .into_iter()
            .filter(|element| !element.has("disabled"))
            .filter_map(|element| {
                let name = element.get("name").filter(|name| !name.is_empty())?;
                let value = match element.tag.as_str() {
                    "input" => match element.get("type") {
                        Some("radio") | Some("checkbox") if !element.has("checked") => None,
                        _ => Some(element.get("value").unwrap_or_default().to_string()),
                    },
                    "textarea" => Some(element.children.iter().map(UiNode::text_content).collect()),
                    "select" => selected_option(element),
                    _ => None,
                }?;
                Some((name.to_string(), value))
            })
            .collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            UiNode::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&html_escape(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&element.tag.as_str()) {
                    return;
                }
                for child in &element.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
            UiNode::Text { text } => out.push_str(&html_escape(text)),
            UiNode::Html { html } => out.push_str(html),
            UiNode::Fragment { children } => {
                for child in children {
                    child.write_html(out);
                }
            }
            UiNode::Empty => {}
        }
    }
}

fn selected_option(select: &Element) -> Option<String> {
    let options: Vec<&Element> = select
        .children
        .iter()
        .filter_map(|node| match node {
            UiNode::Element(element) if element.tag == "option" => Some(element),
            _ => None,
        })
        .collect();
    let chosen = match options.iter().find(|option| option.has("selected")) {
        Some(option) if option.has("disabled") => return None,
        Some(option) => option,
        None => options.iter().find(|option| !option.has("disabled"))?,
    };
    Some(chosen.get("value").unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escapes_text_and_attributes_but_not_markup() {
        let node = Element::new("label")
            .attr("for", "a\"b")
            .child(UiNode::html("<b>Bold</b>"))
            .text("<x>")
            .into_node();
        assert_eq!(
            node.to_html(),
            "<label for=\"a&quot;b\"><b>Bold</b>&lt;x&gt;</label>"
        );
    }

    #[test]
    fn form_data_follows_browser_rules() {
        let tree = Element::new("form")
            .child(Element::new("input").attr("name", "email").attr("value", "a@b.c").into())
            .child(
                Element::new("input")
                    .attr("type", "radio")
                    .attr("name", "size")
                    .attr("value", "s")
                    .into(),
            )
            .child(
                Element::new("input")
                    .attr("type", "radio")
                    .attr("name", "size")
                    .attr("value", "m")
                    .flag("checked", true)
                    .into(),
            )
            .child(
                Element::new("select")
                    .attr("name", "country")
                    .child(
                        Element::new("option")
                            .attr("value", "")
                            .flag("disabled", true)
                            .into(),
                    )
                    .child(Element::new("option").attr("value", "nl").into())
                    .into(),
            )
            .child(Element::new("textarea").attr("name", "note").text("hi").into())
            .child(Element::new("input").attr("type", "checkbox").attr("value", "x").into())
            .into_node();

        assert_eq!(
            tree.form_data(),
            vec![
                ("email".to_string(), "a@b.c".to_string()),
                ("size".to_string(), "m".to_string()),
                ("country".to_string(), "nl".to_string()),
                ("note".to_string(), "hi".to_string()),
            ]
        );
    }
}
