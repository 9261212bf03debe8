//! Layer → Stack → Library hierarchy with lookups in both directions
//!
//! The taxonomy mirrors the picker shown to the user, so every lookup is permissive:
//! an unknown identifier yields an empty result instead of an error.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

identifier!(
    /// Top-level category (e.g. `FRONTEND`)
    LayerId
);
identifier!(
    /// Mid-level grouping inside a layer (e.g. `REACT`)
    StackId
);
identifier!(
    /// Leaf technology or practice that rules are written for (e.g. `REACT_CODING_STANDARDS`)
    LibraryId
);

/// A layer and the stacks declared under it, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub stacks: Vec<StackId>,
}

/// A stack and the libraries declared under it, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    pub id: StackId,
    pub name: String,
    pub libraries: Vec<LibraryId>,
}

/// Immutable Layer/Stack/Library graph
///
/// Built once from catalog data (see [`crate::catalog`]) and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    layers: Vec<Layer>,
    stacks: Vec<Stack>,
    layer_index: HashMap<LayerId, usize>,
    stack_index: HashMap<StackId, usize>,
}

impl Taxonomy {
    /// Build a taxonomy from already-validated layers and stacks.
    ///
    /// Structural validation (duplicates, dangling references) happens in the catalog loader;
    /// here the first declaration of an id wins.
    pub fn new(layers: Vec<Layer>, stacks: Vec<Stack>) -> Self {
        let mut layer_index = HashMap::new();
        for (idx, layer) in layers.iter().enumerate() {
            layer_index.entry(layer.id.clone()).or_insert(idx);
        }
        let mut stack_index = HashMap::new();
        for (idx, stack) in stacks.iter().enumerate() {
            stack_index.entry(stack.id.clone()).or_insert(idx);
        }
        Self {
            layers,
            stacks,
            layer_index,
            stack_index,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn layer(&self, layer: &str) -> Option<&Layer> {
        self.layer_index.get(layer).map(|&idx| &self.layers[idx])
    }

    pub fn stack(&self, stack: &str) -> Option<&Stack> {
        self.stack_index.get(stack).map(|&idx| &self.stacks[idx])
    }

    /// Display name of a layer, falling back to its identifier
    pub fn layer_name<'a>(&'a self, layer: &'a LayerId) -> &'a str {
        self.layer(layer.as_str())
            .map(|l| l.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(layer.as_str())
    }

    /// Display name of a stack, falling back to its identifier
    pub fn stack_name<'a>(&'a self, stack: &'a StackId) -> &'a str {
        self.stack(stack.as_str())
            .map(|s| s.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(stack.as_str())
    }

    /// Stacks declared for a layer; empty for an unknown layer
    pub fn stacks_of_layer(&self, layer: &LayerId) -> &[StackId] {
        self.layer(layer.as_str())
            .map(|l| l.stacks.as_slice())
            .unwrap_or(&[])
    }

    /// Libraries declared for a stack; empty for an unknown stack
    pub fn libraries_of_stack(&self, stack: &StackId) -> &[LibraryId] {
        self.stack(stack.as_str())
            .map(|s| s.libraries.as_slice())
            .unwrap_or(&[])
    }

    /// Owning layer of a stack.
    ///
    /// Scans layers in declaration order, so a stack listed under two layers resolves to
    /// the first one. Orphaned stacks yield `None`.
    pub fn layer_of_stack(&self, stack: &StackId) -> Option<&LayerId> {
        self.layers
            .iter()
            .find(|layer| layer.stacks.contains(stack))
            .map(|layer| &layer.id)
    }

    /// Every stack that lists this library, in stack declaration order
    pub fn stacks_of_library(&self, library: &LibraryId) -> Vec<&StackId> {
        self.stacks
            .iter()
            .filter(|stack| stack.libraries.contains(library))
            .map(|stack| &stack.id)
            .collect()
    }

    /// Layers reachable from a library through its stacks, de-duplicated
    pub fn layers_of_library(&self, library: &LibraryId) -> Vec<&LayerId> {
        let mut layers: Vec<&LayerId> = Vec::new();
        for stack in self.stacks_of_library(library) {
            if let Some(layer) = self.layer_of_stack(stack) {
                if !layers.contains(&layer) {
                    layers.push(layer);
                }
            }
        }
        layers
    }

    /// Total libraries under a layer (counted per stack, so shared libraries count twice)
    pub fn library_count_of_layer(&self, layer: &LayerId) -> usize {
        self.stacks_of_layer(layer)
            .iter()
            .map(|stack| self.libraries_of_stack(stack).len())
            .sum()
    }

    /// All distinct libraries, in taxonomy order
    pub fn libraries(&self) -> Vec<&LibraryId> {
        let mut seen: Vec<&LibraryId> = Vec::new();
        for stack in &self.stacks {
            for library in &stack.libraries {
                if !seen.contains(&library) {
                    seen.push(library);
                }
            }
        }
        seen
    }

    /// Stacks that no layer lists
    pub fn orphan_stacks(&self) -> Vec<&StackId> {
        self.stacks
            .iter()
            .map(|stack| &stack.id)
            .filter(|id| self.layer_of_stack(id).is_none())
            .collect()
    }

    /// Case-insensitive search over library ids and the names of their stacks and layers
    pub fn search(&self, query: &str) -> Vec<&LibraryId> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.libraries();
        }

        self.libraries()
            .into_iter()
            .filter(|library| {
                if library.as_str().to_lowercase().contains(&needle) {
                    return true;
                }
                self.stacks_of_library(library).into_iter().any(|stack| {
                    self.stack_name(stack).to_lowercase().contains(&needle)
                        || self
                            .layer_of_stack(stack)
                            .is_some_and(|layer| self.layer_name(layer).to_lowercase().contains(&needle))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(id: &str, name: &str, stacks: &[&str]) -> Layer {
        Layer {
            id: id.into(),
            name: name.to_string(),
            stacks: stacks.iter().map(|s| StackId::from(*s)).collect(),
        }
    }

    fn stack(id: &str, name: &str, libraries: &[&str]) -> Stack {
        Stack {
            id: id.into(),
            name: name.to_string(),
            libraries: libraries.iter().map(|l| LibraryId::from(*l)).collect(),
        }
    }

    fn sample() -> Taxonomy {
        Taxonomy::new(
            vec![
                layer("FRONTEND", "Frontend", &["REACT", "STYLING"]),
                layer("BACKEND", "Backend", &["NODE"]),
                layer("DATABASE", "Database", &["SQL"]),
            ],
            vec![
                stack("REACT", "React", &["REACT_CODING_STANDARDS", "NEXT_JS"]),
                stack("STYLING", "Styling", &["TAILWIND"]),
                stack("NODE", "Node.js", &["EXPRESS", "PRISMA"]),
                stack("SQL", "SQL", &["POSTGRES", "PRISMA"]),
                stack("LEGACY", "Legacy", &["JQUERY"]),
            ],
        )
    }

    #[test]
    fn test_stacks_of_layer() {
        let t = sample();
        let stacks = t.stacks_of_layer(&"FRONTEND".into());
        assert_eq!(stacks, &[StackId::from("REACT"), StackId::from("STYLING")]);
        assert!(t.stacks_of_layer(&"UNKNOWN".into()).is_empty());
    }

    #[test]
    fn test_libraries_of_unknown_stack_is_empty() {
        let t = sample();
        assert!(t.libraries_of_stack(&"VUE".into()).is_empty());
        assert_eq!(t.libraries_of_stack(&"STYLING".into()).len(), 1);
    }

    #[test]
    fn test_layer_of_stack() {
        let t = sample();
        assert_eq!(
            t.layer_of_stack(&"NODE".into()),
            Some(&LayerId::from("BACKEND"))
        );
        assert_eq!(t.layer_of_stack(&"LEGACY".into()), None);
    }

    #[test]
    fn test_library_in_multiple_stacks() {
        let t = sample();
        let stacks = t.stacks_of_library(&"PRISMA".into());
        assert_eq!(stacks, vec![&StackId::from("NODE"), &StackId::from("SQL")]);

        let layers = t.layers_of_library(&"PRISMA".into());
        assert_eq!(
            layers,
            vec![&LayerId::from("BACKEND"), &LayerId::from("DATABASE")]
        );
    }

    #[test]
    fn test_layers_of_orphan_library() {
        let t = sample();
        assert!(t.layers_of_library(&"JQUERY".into()).is_empty());
        assert!(t.layers_of_library(&"NOT_THERE".into()).is_empty());
    }

    #[test]
    fn test_library_count_of_layer() {
        let t = sample();
        assert_eq!(t.library_count_of_layer(&"FRONTEND".into()), 3);
        assert_eq!(t.library_count_of_layer(&"DATABASE".into()), 2);
        assert_eq!(t.library_count_of_layer(&"UNKNOWN".into()), 0);
    }

    #[test]
    fn test_display_names_fall_back_to_id() {
        let t = sample();
        let react = StackId::from("REACT");
        let unknown = StackId::from("UNKNOWN");
        assert_eq!(t.stack_name(&react), "React");
        assert_eq!(t.stack_name(&unknown), "UNKNOWN");
        assert_eq!(t.layer_name(&"FRONTEND".into()), "Frontend");
    }

    #[test]
    fn test_stack_under_two_layers_resolves_to_first_declared() {
        // Ambiguous data: nothing prevents a stack from being listed twice.
        let t = Taxonomy::new(
            vec![
                layer("FRONTEND", "Frontend", &["SHARED"]),
                layer("BACKEND", "Backend", &["SHARED"]),
            ],
            vec![stack("SHARED", "Shared", &["LIB"])],
        );
        assert_eq!(
            t.layer_of_stack(&"SHARED".into()),
            Some(&LayerId::from("FRONTEND"))
        );
        assert_eq!(t.layers_of_library(&"LIB".into()).len(), 1);
    }

    #[test]
    fn test_orphan_stacks() {
        let t = sample();
        assert_eq!(t.orphan_stacks(), vec![&StackId::from("LEGACY")]);
    }

    #[test]
    fn test_search() {
        let t = sample();
        let by_id = t.search("tail");
        assert_eq!(by_id, vec![&LibraryId::from("TAILWIND")]);

        let by_stack = t.search("node.js");
        assert_eq!(
            by_stack,
            vec![&LibraryId::from("EXPRESS"), &LibraryId::from("PRISMA")]
        );

        let by_layer = t.search("DATABASE");
        assert!(by_layer.contains(&&LibraryId::from("POSTGRES")));
        assert!(by_layer.contains(&&LibraryId::from("PRISMA")));

        assert_eq!(t.search("  ").len(), t.libraries().len());
    }
}
