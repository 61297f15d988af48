//! Selector specificity computed from the tree-sitter selector tree.

use tree_sitter::Node;

/// Specificity triple (ids, classes, types).
/// Compares lexicographically, higher wins in the cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Specificity(pub u16, pub u16, pub u16);

impl Specificity {
    /// Specificity of a single (complex) selector node
    pub fn of(node: Node) -> Self {
        let mut total = Specificity::default();
        accumulate(node, &mut total);
        total
    }
}

fn accumulate(node: Node, total: &mut Specificity) {
    let kind = node.kind();
    match kind {
        "id_selector" => total.0 = total.0.saturating_add(1),
        "class_selector" | "attribute_selector" | "pseudo_class_selector" => {
            total.1 = total.1.saturating_add(1)
        }
        "tag_name" | "pseudo_element_selector" => total.2 = total.2.saturating_add(1),
        _ => {}
    }

    // Pseudo selectors wrap the compound they qualify; only that part counts,
    // not the name or arguments after the colon.
    let is_pseudo = matches!(kind, "pseudo_class_selector" | "pseudo_element_selector");
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            ":" | "::" if is_pseudo => break,
            "arguments" => continue,
            _ => accumulate(child, total),
        }
    }
}
