//! Default node name → prim path resolution.

use crate::node::AttributeSource;
use crate::usd::SdfPath;

use super::NameResolver;

/// Turn a renderer node name into a valid absolute prim path.
///
/// `/` separates components and empty components are dropped. Within a
/// component, characters outside `[A-Za-z0-9_]`, a leading digit, and an
/// underscore followed by `x` are written as `_x<HEX>_` (the code point in
/// hex), so distinct component spellings never share an encoding. Returns
/// `None` when no component is left.
pub fn sanitize_node_name(name: &str) -> Option<String> {
    let components: Vec<String> = name
        .split('/')
        .filter(|c| !c.is_empty())
        .map(encode_component)
        .collect();

    if components.is_empty() {
        None
    } else {
        Some(format!("/{}", components.join("/")))
    }
}

fn encode_component(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars().peekable();
    let mut first = true;

    while let Some(ch) = chars.next() {
        let literal = match ch {
            '0'..='9' => !first,
            '_' => chars.peek() != Some(&'x'),
            c => c.is_ascii_alphanumeric(),
        };
        if literal {
            out.push(ch);
        } else {
            out.push_str(&format!("_x{:X}_", ch as u32));
        }
        first = false;
    }
    out
}

/// Resolves a node to the encoded form of its name.
///
/// Unnamed nodes are written as `/_x_node<id>`, a spelling the name
/// encoding never produces.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathNameResolver;

impl NameResolver for PathNameResolver {
    fn resolve(&self, node: &dyn AttributeSource) -> Option<SdfPath> {
        let path = sanitize_node_name(node.name())
            .unwrap_or_else(|| format!("/_x_node{}", node.id().0));
        SdfPath::new(&path).ok()
    }
}
