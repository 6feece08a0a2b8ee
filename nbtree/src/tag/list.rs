use crate::error::{Error, Result};
use crate::TagType;

use super::{check_array_len, check_payload, Tag};

/// A homogeneous, ordered sequence of unnamed tags.
///
/// The element type is fixed when the list is built and every element must
/// be of that type. A list of [`TagType::End`] must be empty. Equality is
/// order sensitive and includes the element type, so an empty list of ints
/// differs from an empty list of end tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    element_type: TagType,
    elements: Vec<Tag>,
}

impl List {
    /// Build a list, checking every element against `element_type`.
    ///
    /// ```
    /// use nbtree::{List, Tag, TagType};
    ///
    /// assert!(List::new(TagType::Int, vec![Tag::Int(1), Tag::Int(2)]).is_ok());
    /// assert!(List::new(TagType::Int, vec![Tag::Int(1), Tag::Byte(2)]).is_err());
    /// ```
    pub fn new(element_type: TagType, elements: Vec<Tag>) -> Result<Self> {
        check_array_len(elements.len(), "list")?;

        if element_type == TagType::End && !elements.is_empty() {
            return Err(Error::invalid_tag(format!(
                "list of end tags must be empty, got {} elements",
                elements.len()
            )));
        }

        if let Some((i, e)) = elements
            .iter()
            .enumerate()
            .find(|(_, e)| e.tag_type() != element_type)
        {
            return Err(Error::invalid_tag(format!(
                "list of {} has {} at index {}",
                element_type,
                e.tag_type(),
                i
            )));
        }

        for e in &elements {
            check_payload(e)?;
        }

        Ok(Self {
            element_type,
            elements,
        })
    }

    /// Build a list taking the element type from the first element. An empty
    /// input gives an empty list of end tags.
    pub fn from_elements(elements: Vec<Tag>) -> Result<Self> {
        let element_type = elements
            .first()
            .map(Tag::tag_type)
            .unwrap_or(TagType::End);
        Self::new(element_type, elements)
    }

    pub fn empty(element_type: TagType) -> Self {
        Self {
            element_type,
            elements: Vec::new(),
        }
    }

    pub fn element_type(&self) -> TagType {
        self.element_type
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Tag> {
        self.elements
    }

    /// Used by the reader, which has already checked every element against
    /// the header it decoded.
    pub(crate) fn from_decoded(element_type: TagType, elements: Vec<Tag>) -> Self {
        Self {
            element_type,
            elements,
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl IntoIterator for List {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}
