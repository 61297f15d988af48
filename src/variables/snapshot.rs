//! Selector-indexed inventory of custom property declarations.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A custom property found by a scan
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct VariableDeclaration {
    /// Name without the `--` prefix
    pub name: String,
    /// Trimmed value
    pub value: String,
}

impl VariableDeclaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Mapping from selector text to the declarations found for it.
///
/// Selectors iterate in the order they first received a declaration, and
/// every selector maps to at least one declaration. Duplicate names are kept;
/// lookups return the first one in iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<(String, Vec<VariableDeclaration>)>,
    by_selector: HashMap<String, usize>,
    /// name -> (entry, declaration) of its first occurrence
    by_name: HashMap<String, (usize, usize)>,
}

impl Snapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of selectors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(selector, _)| selector.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[VariableDeclaration])> {
        self.entries
            .iter()
            .map(|(selector, declarations)| (selector.as_str(), declarations.as_slice()))
    }

    /// Declarations of one selector
    pub fn get(&self, selector: &str) -> Option<&[VariableDeclaration]> {
        self.by_selector
            .get(selector)
            .map(|&index| self.entries[index].1.as_slice())
    }

    /// First declaration named `name` across all selectors, with its selector
    pub fn find(&self, name: &str) -> Option<(&str, &VariableDeclaration)> {
        let &(entry, declaration) = self.by_name.get(name)?;
        let (selector, declarations) = &self.entries[entry];
        Some((selector.as_str(), &declarations[declaration]))
    }

    /// First declaration named `name` within `selector`
    pub fn find_in(&self, name: &str, selector: &str) -> Option<&VariableDeclaration> {
        self.get(selector)?
            .iter()
            .find(|declaration| declaration.name == name)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (selector, declarations) in self.iter() {
            map.serialize_entry(selector, declarations)?;
        }
        map.end()
    }
}

/// Accumulates declarations in scan order
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    entries: Vec<(String, Vec<VariableDeclaration>)>,
    by_selector: HashMap<String, usize>,
}

impl SnapshotBuilder {
    /// Append a declaration to `selector`, creating the selector if absent
    pub fn push(&mut self, selector: &str, declaration: VariableDeclaration) {
        let index = match self.by_selector.get(selector) {
            Some(&index) => index,
            None => {
                self.entries.push((selector.to_string(), Vec::new()));
                self.by_selector.insert(selector.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[index].1.push(declaration);
    }

    pub fn finish(self) -> Snapshot {
        let entries: Vec<_> = self
            .entries
            .into_iter()
            .filter(|(_, declarations)| !declarations.is_empty())
            .collect();

        let mut by_selector = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::new();
        for (entry, (selector, declarations)) in entries.iter().enumerate() {
            by_selector.insert(selector.clone(), entry);
            for (index, declaration) in declarations.iter().enumerate() {
                by_name
                    .entry(declaration.name.clone())
                    .or_insert((entry, index));
            }
        }

        Snapshot {
            entries,
            by_selector,
            by_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, value: &str) -> VariableDeclaration {
        VariableDeclaration::new(name, value)
    }

    #[test]
    fn test_selectors_keep_first_insertion_order() {
        let mut builder = Snapshot::builder();
        builder.push(".b", decl("x", "1"));
        builder.push(":root", decl("y", "2"));
        builder.push(".b", decl("z", "3"));
        let snapshot = builder.finish();

        assert_eq!(snapshot.selectors().collect::<Vec<_>>(), vec![".b", ":root"]);
        assert_eq!(snapshot.get(".b").unwrap(), &[decl("x", "1"), decl("z", "3")]);
    }

    #[test]
    fn test_find_uses_iteration_order_not_push_order() {
        let mut builder = Snapshot::builder();
        builder.push(".a", decl("x", "1"));
        builder.push(".b", decl("y", "from-b"));
        // Pushed later, but `.a` comes first when iterating
        builder.push(".a", decl("y", "from-a"));
        let snapshot = builder.finish();

        let (selector, found) = snapshot.find("y").unwrap();
        assert_eq!(selector, ".a");
        assert_eq!(found.value, "from-a");
    }

    #[test]
    fn test_duplicates_are_kept_and_first_wins() {
        let mut builder = Snapshot::builder();
        builder.push(".card", decl("gap", "8px"));
        builder.push(".card", decl("gap", "12px"));
        let snapshot = builder.finish();

        assert_eq!(snapshot.get(".card").unwrap().len(), 2);
        assert_eq!(snapshot.find_in("gap", ".card").unwrap().value, "8px");
        assert_eq!(snapshot.find("gap").unwrap().1.value, "8px");
    }

    #[test]
    fn test_missing_lookups() {
        let mut builder = Snapshot::builder();
        builder.push(".card", decl("gap", "8px"));
        let snapshot = builder.finish();

        assert!(snapshot.get(".missing").is_none());
        assert!(snapshot.find("pad").is_none());
        assert!(snapshot.find_in("gap", ".missing").is_none());
        assert!(snapshot.find_in("pad", ".card").is_none());
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut builder = Snapshot::builder();
        builder.push(":root", decl("brand-color", "#ff0000"));
        builder.push(".card", decl("gap", "8px"));
        let snapshot = builder.finish();

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(
            json,
            r##"{":root":[{"name":"brand-color","value":"#ff0000"}],".card":[{"name":"gap","value":"8px"}]}"##
        );
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::builder().finish();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot, Snapshot::default());
        assert_eq!(serde_json::to_string(&snapshot).unwrap(), "{}");
    }
}
