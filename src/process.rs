//! The attribute-processing pass: optional sorting and filtering of element
//! attributes across a document tree.
use crate::node::{Attribute, Element, Node};
use std::collections::HashSet;

/// Rules applied to every element's attribute list before serialization.
///
/// Sorting and filtering both operate on the *qualified* attribute name
/// (`prefix:local`); sorting uses ordinal (byte-wise) comparison, not a
/// locale-aware collation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRules {
    /// Sort attributes by name within each element.
    pub sort: bool,

    /// Qualified attribute names to exclude from the output.
    pub filter: HashSet<String>,
}
impl AttributeRules {
    /// Create a new set of rules.
    pub fn new(sort: bool, filter: impl IntoIterator<Item = String>) -> Self {
        Self {
            sort,
            filter: filter.into_iter().collect(),
        }
    }

    /// Returns true if the pass would leave every element untouched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        !self.sort && self.filter.is_empty()
    }

    /// Apply the rules to an element and all of its descendants.
    ///
    /// The traversal is depth-first pre-order, driven by an explicit stack so
    /// that deeply nested documents cannot exhaust the call stack. Child order
    /// is never altered.
    pub fn apply(&self, root: &mut Element) {
        // Fast path; nothing to do, skip the traversal entirely
        if self.is_noop() {
            return;
        }

        let mut stack = vec![root];
        while let Some(element) = stack.pop() {
            self.rewrite_attributes(element);

            for child in element.children.iter_mut() {
                if let Node::Element(child) = child {
                    stack.push(child);
                }
            }
        }
    }

    /// Rebuild one element's attribute list: sort, then re-add everything not
    /// excluded by the filter, preserving order.
    ///
    /// Re-adding uses set-attribute semantics: a duplicate name overwrites the
    /// value recorded earlier, so names are unique afterwards.
    fn rewrite_attributes(&self, element: &mut Element) {
        let mut attributes = std::mem::take(&mut element.attributes);

        if self.sort {
            attributes.sort_by_key(|a| a.name.qualified());
        }

        let mut kept: Vec<Attribute> = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            if self.filter.contains(&attribute.name.qualified()) {
                continue;
            }

            match kept.iter_mut().find(|a| a.name == attribute.name) {
                Some(existing) => existing.value = attribute.value,
                None => kept.push(attribute),
            }
        }

        element.attributes = kept;
    }
}
