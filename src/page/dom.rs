use html5ever::{LocalName, Namespace, QualName};
use kuchiki::traits::*;
use kuchiki::{NodeRef, Selectors};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("failed to compile selector '{0}'")]
    Invalid(String),
}

pub fn compile(selector: &str) -> Result<Selectors, SelectorError> {
    Selectors::compile(selector).map_err(|_| SelectorError::Invalid(selector.to_string()))
}

fn compile_or_log(selector: &str) -> Option<Selectors> {
    match compile(selector) {
        Ok(selectors) => Some(selectors),
        Err(err) => {
            debug!(target = "dom", error = %err, "ignoring selector");
            None
        }
    }
}

pub fn matches(node: &NodeRef, selectors: &Selectors) -> bool {
    node.clone()
        .into_element_ref()
        .map(|element| selectors.matches(&element))
        .unwrap_or(false)
}

pub fn matches_str(node: &NodeRef, selector: &str) -> bool {
    compile_or_log(selector)
        .map(|selectors| matches(node, &selectors))
        .unwrap_or(false)
}

/// Nearest inclusive ancestor element matching `selector`, like `Element.closest`.
pub fn closest(node: &NodeRef, selector: &str) -> Option<NodeRef> {
    let selectors = compile_or_log(selector)?;
    node.inclusive_ancestors()
        .elements()
        .find(|element| selectors.matches(element))
        .map(|element| element.as_node().clone())
}

/// First descendant of `root` (excluding `root`) matching `selector`.
pub fn query(root: &NodeRef, selector: &str) -> Option<NodeRef> {
    let selectors = compile_or_log(selector)?;
    root.descendants()
        .elements()
        .find(|element| selectors.matches(element))
        .map(|element| element.as_node().clone())
}

/// All descendants of `root` (excluding `root`) matching `selector`, in tree order.
pub fn query_all(root: &NodeRef, selector: &str) -> Vec<NodeRef> {
    let Some(selectors) = compile_or_log(selector) else {
        return Vec::new();
    };
    root.descendants()
        .elements()
        .filter(|element| selectors.matches(element))
        .map(|element| element.as_node().clone())
        .collect()
}

/// Inclusive containment, like `Node.contains`.
pub fn contains(ancestor: &NodeRef, node: &NodeRef) -> bool {
    node.inclusive_ancestors().any(|candidate| &candidate == ancestor)
}

pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|element| element.name.local.to_string())
}

pub fn is_element(node: &NodeRef) -> bool {
    node.as_element().is_some()
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes.get(name).map(str::to_string)
}

pub fn has_attr(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .map(|element| element.attributes.borrow().contains(name))
        .unwrap_or(false)
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(element) = node.as_element() {
        element
            .attributes
            .borrow_mut()
            .insert(name, value.to_string());
    }
}

pub fn remove_attr(node: &NodeRef, name: &str) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().remove(name);
    }
}

fn class_tokens(node: &NodeRef) -> Vec<String> {
    attr(node, "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn write_classes(node: &NodeRef, tokens: &[String]) {
    if tokens.is_empty() {
        remove_attr(node, "class");
    } else {
        set_attr(node, "class", &tokens.join(" "));
    }
}

pub fn has_class(node: &NodeRef, class: &str) -> bool {
    class_tokens(node).iter().any(|token| token == class)
}

pub fn add_class(node: &NodeRef, class: &str) {
    if !is_element(node) {
        return;
    }
    let mut tokens = class_tokens(node);
    if tokens.iter().any(|token| token == class) {
        return;
    }
    tokens.push(class.to_string());
    write_classes(node, &tokens);
}

pub fn remove_class(node: &NodeRef, class: &str) {
    let mut tokens = class_tokens(node);
    let before = tokens.len();
    tokens.retain(|token| token != class);
    if tokens.len() != before {
        write_classes(node, &tokens);
    }
}

/// `classList.toggle` semantics: `force` pins the result, otherwise flips.
/// Returns whether the class is present afterwards.
pub fn toggle_class(node: &NodeRef, class: &str, force: Option<bool>) -> bool {
    let present = force.unwrap_or_else(|| !has_class(node, class));
    if present {
        add_class(node, class);
    } else {
        remove_class(node, class);
    }
    present
}

/// Replaces all children with a single text node (or nothing for an empty string).
pub fn set_text(node: &NodeRef, text: &str) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
    if !text.is_empty() {
        node.append(NodeRef::new_text(text));
    }
}

/// Short `tag#id.class` label for logs and reports.
pub fn describe(node: &NodeRef) -> String {
    let Some(tag) = tag_name(node) else {
        return String::from("#node");
    };
    let mut label = tag;
    if let Some(id) = attr(node, "id").filter(|id| !id.is_empty()) {
        label.push('#');
        label.push_str(&id);
    }
    for class in class_tokens(node) {
        label.push('.');
        label.push_str(&class);
    }
    label
}

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Fresh detached HTML element with no attributes, like
/// `document.createElement`.
pub fn new_element(tag: &str) -> NodeRef {
    let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag));
    NodeRef::new_element(name, None)
}

/// Parses a single element from markup, detached from any document.
pub fn create_element(markup: &str, selector: &str) -> Option<NodeRef> {
    let fragment = kuchiki::parse_html().one(markup);
    let element = query(&fragment, selector)?;
    element.detach();
    Some(element)
}
