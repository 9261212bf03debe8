//! Turns a flat library selection into the Layer → Stack → Library nesting used for rendering

use crate::taxonomy::{LayerId, LibraryId, StackId, Taxonomy};

/// Insertion-ordered multimap with duplicate-free buckets
///
/// Keys keep the order of their first insertion, values keep the order of their first
/// insertion within each bucket. A key exists only once something has been inserted under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedGroups<K, V> {
    entries: Vec<(K, Vec<V>)>,
}

impl<K, V> Default for OrderedGroups<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, V: PartialEq> OrderedGroups<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the bucket for `key` unless it is already there
    pub fn insert(&mut self, key: K, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => {
                if !bucket.contains(&value) {
                    bucket.push(value);
                }
            }
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Bucket for a key; empty when the key was never inserted
    pub fn get(&self, key: &K) -> &[V] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, bucket)| bucket.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Selected libraries bucketed under every stack that contains them
pub type LibrariesByStack = OrderedGroups<StackId, LibraryId>;

/// Stacks bucketed under their owning layer
pub type StacksByLayer = OrderedGroups<LayerId, StackId>;

/// Group a selection by stack.
///
/// Input order is preserved, repeated libraries are inserted once per stack, and libraries
/// that belong to no stack are dropped.
pub fn group_libraries_by_stack(taxonomy: &Taxonomy, selected: &[LibraryId]) -> LibrariesByStack {
    let mut groups = LibrariesByStack::new();
    for library in selected {
        let stacks = taxonomy.stacks_of_library(library);
        if stacks.is_empty() {
            tracing::debug!(%library, "library has no stack, skipped");
        }
        for stack in stacks {
            groups.insert(stack.clone(), library.clone());
        }
    }
    groups
}

/// Group stacks by owning layer, dropping stacks that no layer lists
pub fn group_stacks_by_layer<'a>(
    taxonomy: &Taxonomy,
    stacks: impl IntoIterator<Item = &'a StackId>,
) -> StacksByLayer {
    let mut groups = StacksByLayer::new();
    for stack in stacks {
        match taxonomy.layer_of_stack(stack) {
            Some(layer) => groups.insert(layer.clone(), stack.clone()),
            None => {
                tracing::debug!(%stack, "stack has no layer, skipped");
            }
        }
    }
    groups
}

/// Both groupings for a selection, ready for a generation strategy
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub libraries_by_stack: LibrariesByStack,
    pub stacks_by_layer: StacksByLayer,
}

impl Grouping {
    pub fn from_selection(taxonomy: &Taxonomy, selected: &[LibraryId]) -> Self {
        let libraries_by_stack = group_libraries_by_stack(taxonomy, selected);
        let stacks_by_layer = group_stacks_by_layer(taxonomy, libraries_by_stack.keys());
        Self {
            libraries_by_stack,
            stacks_by_layer,
        }
    }

    /// Every (layer, stack, library) triple in rendering order
    pub fn triples(&self) -> Vec<(&LayerId, &StackId, &LibraryId)> {
        let mut out = Vec::new();
        for (layer, stacks) in self.stacks_by_layer.iter() {
            for stack in stacks {
                for library in self.libraries_by_stack.get(stack) {
                    out.push((layer, stack, library));
                }
            }
        }
        out
    }
}
