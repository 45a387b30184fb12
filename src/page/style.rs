//! Inline `style` attribute editing.

use kuchiki::NodeRef;

use super::dom;

fn declarations(node: &NodeRef) -> Vec<(String, String)> {
    dom::attr(node, "style")
        .map(|style| {
            style
                .split(';')
                .filter_map(|declaration| {
                    let (name, value) = declaration.split_once(':')?;
                    let name = name.trim();
                    if name.is_empty() {
                        return None;
                    }
                    Some((name.to_string(), value.trim().to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn write(node: &NodeRef, declarations: &[(String, String)]) {
    if declarations.is_empty() {
        dom::remove_attr(node, "style");
        return;
    }
    let serialized = declarations
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ");
    dom::set_attr(node, "style", &serialized);
}

pub fn property(node: &NodeRef, name: &str) -> Option<String> {
    declarations(node)
        .into_iter()
        .find(|(existing, _)| existing == name)
        .map(|(_, value)| value)
}

pub fn set_property(node: &NodeRef, name: &str, value: &str) {
    if !dom::is_element(node) {
        return;
    }
    let mut current = declarations(node);
    match current.iter_mut().find(|(existing, _)| existing == name) {
        Some(entry) => entry.1 = value.to_string(),
        None => current.push((name.to_string(), value.to_string())),
    }
    write(node, &current);
}

pub fn remove_property(node: &NodeRef, name: &str) {
    let mut current = declarations(node);
    let before = current.len();
    current.retain(|(existing, _)| existing != name);
    if current.len() != before {
        write(node, &current);
    }
}
