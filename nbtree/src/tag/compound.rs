use indexmap::IndexMap;

use crate::error::{Error, Result};

use super::{check_payload, check_str_len, List, Tag};

/// A mapping of names to child tags that remembers insertion order.
///
/// Names are unique. Inserting a name that is already present replaces the
/// old value, and the entry moves to the end so that its position reflects
/// the latest insertion. Equality ignores order.
///
/// Compounds are immutable once built. [`Compound::with`] and
/// [`Compound::without`] produce modified copies.
///
/// ```
/// use nbtree::{Compound, Tag};
///
/// let c = Compound::builder()
///     .put("a", 1i32)
///     .put("b", "hello")
///     .put("a", 2i32)
///     .build()
///     .unwrap();
///
/// assert_eq!(c.len(), 2);
/// assert_eq!(c.get_int("a"), Some(2));
/// assert_eq!(c.keys().collect::<Vec<_>>(), ["b", "a"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    entries: IndexMap<String, Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CompoundBuilder {
        CompoundBuilder::new()
    }

    /// Build a compound from name/tag pairs, later duplicates winning.
    pub fn from_entries<K, I>(entries: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Tag)>,
    {
        entries
            .into_iter()
            .fold(CompoundBuilder::new(), |b, (k, v)| b.put(k, v))
            .build()
    }

    /// A builder seeded with this compound's entries.
    pub fn to_builder(&self) -> CompoundBuilder {
        CompoundBuilder {
            entries: self.entries.clone(),
            error: None,
        }
    }

    /// A copy of this compound with `name` set to `tag`.
    pub fn with(&self, name: impl Into<String>, tag: impl Into<Tag>) -> Result<Self> {
        self.to_builder().put(name, tag).build()
    }

    /// A copy of this compound without `name`. Remaining entries keep their
    /// order.
    pub fn without(&self, name: &str) -> Self {
        let mut entries = self.entries.clone();
        entries.shift_remove(name);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries.get(name)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Tag> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Tag> {
        self.entries.keys()
    }

    pub fn get_byte(&self, name: &str) -> Option<i8> {
        match self.get(name)? {
            Tag::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_short(&self, name: &str) -> Option<i16> {
        match self.get(name)? {
            Tag::Short(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            Tag::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_long(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Tag::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            Tag::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Tag::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    pub fn get_byte_array(&self, name: &str) -> Option<&[i8]> {
        self.get(name)?.as_byte_array()
    }

    pub fn get_int_array(&self, name: &str) -> Option<&[i32]> {
        self.get(name)?.as_int_array()
    }

    pub fn get_list(&self, name: &str) -> Option<&List> {
        self.get(name)?.as_list()
    }

    pub fn get_compound(&self, name: &str) -> Option<&Compound> {
        self.get(name)?.as_compound()
    }

    /// Any numeric entry, converted to `i32` with `as` semantics.
    pub fn as_int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            Tag::Float(f) => Some(*f as i32),
            Tag::Double(f) => Some(*f as i32),
            t => t.as_i64().map(|v| v as i32),
        }
    }

    /// Any numeric entry, converted to `f64`.
    pub fn as_double(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    /// Last write wins, and the entry moves to the end.
    pub(crate) fn insert_last(&mut self, name: String, tag: Tag) {
        self.entries.shift_remove(&name);
        self.entries.insert(name, tag);
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = indexmap::map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Compound {
    type Item = (String, Tag);
    type IntoIter = indexmap::map::IntoIter<String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Assembles a [`Compound`]. Invalid entries are remembered and reported by
/// [`build`][CompoundBuilder::build], so calls can be chained.
#[derive(Debug, Clone, Default)]
pub struct CompoundBuilder {
    entries: IndexMap<String, Tag>,
    error: Option<Error>,
}

impl CompoundBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `tag`. An end tag, or a name or payload too long for
    /// its length prefix, makes [`build`][CompoundBuilder::build] fail.
    pub fn put(mut self, name: impl Into<String>, tag: impl Into<Tag>) -> Self {
        if self.error.is_some() {
            return self;
        }

        let name = name.into();
        let tag = tag.into();

        if let Err(e) = check_str_len(&name, "name") {
            self.error = Some(e);
        } else if matches!(tag, Tag::End) {
            self.error = Some(Error::invalid_tag(format!(
                "compound entry {:?} cannot be an end tag",
                name
            )));
        } else if let Err(e) = check_payload(&tag) {
            self.error = Some(e);
        } else {
            self.entries.shift_remove(&name);
            self.entries.insert(name, tag);
        }
        self
    }

    /// Like [`put`][CompoundBuilder::put], for results of the checked
    /// [`Tag`] constructors.
    pub fn try_put(mut self, name: impl Into<String>, tag: Result<Tag>) -> Self {
        match tag {
            Ok(tag) => self.put(name, tag),
            Err(e) => {
                self.error.get_or_insert(e);
                self
            }
        }
    }

    pub fn remove(mut self, name: &str) -> Self {
        self.entries.shift_remove(name);
        self
    }

    pub fn build(self) -> Result<Compound> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(Compound {
                entries: self.entries,
            }),
        }
    }
}
