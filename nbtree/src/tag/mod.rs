mod compound;
mod list;
mod ser;

use std::convert::TryFrom;

#[cfg(feature = "arbitrary1")]
use arbitrary::Arbitrary;

use crate::error::{Error, Result};
use crate::TagType;

pub use self::compound::{Compound, CompoundBuilder};
pub use self::list::List;

/// A complete tag value. It owns its data, compounds and lists own their
/// children, so a tree can be shared freely between threads once built.
///
/// The name of a tag is not part of the value: children of a [`Compound`]
/// are named by their key, elements of a [`List`] are unnamed, and the root
/// of a stream is a [`NamedTag`].
///
/// Equality is structural. Floats compare by bit pattern, so a `NaN`
/// payload is equal to itself and `0.0` differs from `-0.0`.
///
/// ```
/// use nbtree::{Compound, NamedTag, Tag};
///
/// let root = Compound::builder().put("x", 1i32).build().unwrap();
/// let bytes = nbtree::to_bytes(&NamedTag::unnamed(root.into())).unwrap();
///
/// assert_eq!(bytes, [0x0A, 0, 0, 0x03, 0, 1, b'x', 0, 0, 0, 1, 0]);
/// ```
#[derive(Debug, Clone)]
pub enum Tag {
    /// Terminator of a compound. Only legal as a degenerate root.
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
}

impl Tag {
    /// The type id this tag is written with.
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::End => TagType::End,
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
        }
    }

    /// Checked string constructor. Fails if the modified UTF-8 form of `s`
    /// does not fit the 16-bit length prefix.
    pub fn string(s: impl Into<String>) -> Result<Tag> {
        let s = s.into();
        check_str_len(&s, "string")?;
        Ok(Tag::String(s))
    }

    /// Checked byte array constructor.
    pub fn byte_array(bytes: impl Into<Vec<i8>>) -> Result<Tag> {
        let bytes = bytes.into();
        check_array_len(bytes.len(), "byte array")?;
        Ok(Tag::ByteArray(bytes))
    }

    /// Checked int array constructor.
    pub fn int_array(ints: impl Into<Vec<i32>>) -> Result<Tag> {
        let ints = ints.into();
        check_array_len(ints.len(), "int array")?;
        Ok(Tag::IntArray(ints))
    }

    /// Checked list constructor, see [`List::new`].
    pub fn list(element_type: TagType, elements: Vec<Tag>) -> Result<Tag> {
        List::new(element_type, elements).map(Tag::List)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Tag::Byte(v) => Some(v as i64),
            Tag::Short(v) => Some(v as i64),
            Tag::Int(v) => Some(v as i64),
            Tag::Long(v) => Some(v),
            Tag::Float(v) => Some(v as i64),
            Tag::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Tag::Byte(v) => Some(v as f64),
            Tag::Short(v) => Some(v as f64),
            Tag::Int(v) => Some(v as f64),
            Tag::Long(v) => Some(v as f64),
            Tag::Float(v) => Some(v as f64),
            Tag::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[i8]> {
        match self {
            Tag::ByteArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Tag::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Tag::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        use Tag::*;
        match (self, other) {
            (End, End) => true,
            (Byte(a), Byte(b)) => a == b,
            (Short(a), Short(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (ByteArray(a), ByteArray(b)) => a == b,
            (String(a), String(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Compound(a), Compound(b)) => a == b,
            (IntArray(a), IntArray(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Tag {}

/// A tag together with its name: the unit written at the top level of a
/// stream and the thing [`from_bytes`][crate::from_bytes] hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTag {
    name: String,
    tag: Tag,
}

impl NamedTag {
    /// Fails if the name does not fit the 16-bit length prefix, or if an End
    /// tag is given a name.
    pub fn new(name: impl Into<String>, tag: Tag) -> Result<Self> {
        let name = name.into();
        check_str_len(&name, "name")?;
        if matches!(tag, Tag::End) && !name.is_empty() {
            return Err(Error::invalid_tag("end tags carry no name"));
        }
        check_payload(&tag)?;
        Ok(Self { name, tag })
    }

    /// A tag with the empty name, as roots conventionally are.
    pub fn unnamed(tag: Tag) -> Self {
        Self {
            name: String::new(),
            tag,
        }
    }

    /// The name, or the empty string when unnamed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn tag_type(&self) -> TagType {
        self.tag.tag_type()
    }

    pub fn into_parts(self) -> (String, Tag) {
        (self.name, self.tag)
    }

    pub(crate) fn from_parts(name: String, tag: Tag) -> Self {
        Self { name, tag }
    }
}

/// Modified UTF-8 byte length of `s`, as written on the wire.
pub(crate) fn encoded_len(s: &str) -> usize {
    cesu8::to_java_cesu8(s).len()
}

pub(crate) fn check_str_len(s: &str, what: &str) -> Result<()> {
    let len = encoded_len(s);
    if len > u16::MAX as usize {
        return Err(Error::invalid_tag(format!(
            "{} too long: {} bytes of modified utf-8, max {}",
            what,
            len,
            u16::MAX
        )));
    }
    Ok(())
}

pub(crate) fn check_array_len(len: usize, what: &str) -> Result<()> {
    i32::try_from(len)
        .map(|_| ())
        .map_err(|_| Error::invalid_tag(format!("{} too long: {} elements", what, len)))
}

/// Checks that a payload fits its length prefix. Containers are not
/// descended into, their own constructors already checked their children.
pub(crate) fn check_payload(tag: &Tag) -> Result<()> {
    match tag {
        Tag::String(s) => check_str_len(s, "string"),
        Tag::ByteArray(v) => check_array_len(v.len(), "byte array"),
        Tag::IntArray(v) => check_array_len(v.len(), "int array"),
        _ => Ok(()),
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Tag {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(Vec<i8>, ByteArray);
from!(Vec<i32>, IntArray);
from!(List, List);
from!(Compound, Compound);
from!(String, String);
from!(&str, String, .to_owned());

impl From<bool> for Tag {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}

#[cfg(feature = "arbitrary1")]
const ARB_MAX_DEPTH: usize = 8;

#[cfg(feature = "arbitrary1")]
fn arb_tag(u: &mut arbitrary::Unstructured, tag_type: TagType, depth: usize) -> arbitrary::Result<Tag> {
    // Past the depth cap containers come out empty.
    let nest = depth < ARB_MAX_DEPTH;

    Ok(match tag_type {
        TagType::End => return Err(arbitrary::Error::IncorrectFormat),
        TagType::Byte => Tag::Byte(u.arbitrary()?),
        TagType::Short => Tag::Short(u.arbitrary()?),
        TagType::Int => Tag::Int(u.arbitrary()?),
        TagType::Long => Tag::Long(u.arbitrary()?),
        TagType::Float => Tag::Float(u.arbitrary()?),
        TagType::Double => Tag::Double(u.arbitrary()?),
        TagType::ByteArray => Tag::ByteArray(u.arbitrary()?),
        TagType::String => Tag::String(u.arbitrary()?),
        TagType::IntArray => Tag::IntArray(u.arbitrary()?),
        TagType::List => {
            let element_type = loop {
                let t = TagType::arbitrary(u)?;
                if t != TagType::End {
                    break t;
                }
                if u.is_empty() {
                    return Ok(Tag::List(List::empty(TagType::End)));
                }
            };
            let len = if nest { u.arbitrary_len::<u8>()? } else { 0 };
            let mut elements = Vec::with_capacity(len);
            for _ in 0..len {
                elements.push(arb_tag(u, element_type, depth + 1)?);
            }
            Tag::List(List::new(element_type, elements).map_err(|_| arbitrary::Error::IncorrectFormat)?)
        }
        TagType::Compound => {
            let len = if nest { u.arbitrary_len::<(String, u8)>()? } else { 0 };
            let mut builder = Compound::builder();
            for _ in 0..len {
                let name: String = u.arbitrary()?;
                let t = TagType::arbitrary(u)?;
                if t == TagType::End {
                    continue;
                }
                builder = builder.put(name, arb_tag(u, t, depth + 1)?);
            }
            Tag::Compound(builder.build().map_err(|_| arbitrary::Error::IncorrectFormat)?)
        }
    })
}

#[cfg(feature = "arbitrary1")]
impl<'a> Arbitrary<'a> for Tag {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let t = TagType::arbitrary(u)?;
        if t == TagType::End {
            return Ok(Tag::End);
        }
        arb_tag(u, t, 0)
    }
}

#[cfg(feature = "arbitrary1")]
impl<'a> Arbitrary<'a> for NamedTag {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let tag = Tag::arbitrary(u)?;
        if matches!(tag, Tag::End) {
            return Ok(NamedTag::unnamed(tag));
        }
        let name: String = u.arbitrary()?;
        NamedTag::new(name, tag).map_err(|_| arbitrary::Error::IncorrectFormat)
    }
}
