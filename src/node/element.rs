use super::{Node, QName};

/// An element in the document tree, with a name, attributes, and children:
/// `<name attr="value">...</name>`
///
/// Duplicate attributes are allowed after parsing (lookups use the last
/// attribute with the matching name); the attribute-processing pass collapses
/// duplicates when it rewrites the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// The name of the element.
    pub name: QName,

    /// The attributes of the element, in order of appearance.
    pub attributes: Vec<Attribute>,

    /// The children of the element, in document order.
    pub children: Vec<Node>,
}
impl Element {
    /// Create a new element with no attributes or children.
    pub fn new(name: impl Into<QName>) -> Self {
        Self {
            name: name.into(),
            attributes: vec![],
            children: vec![],
        }
    }

    /// Get an attribute value by qualified name.
    ///
    /// Searches the attributes in reverse order, so the last attribute with
    /// the matching name is returned.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.name == *name)
            .map(|a| a.value.as_str())
    }

    /// Iterate over the direct child elements, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }
}

/// An attribute set on an element, with a name and value:
/// `name="value"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The name of the attribute.
    pub name: QName,

    /// The value of the attribute, with entity references decoded.
    pub value: String,
}
impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<QName>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
