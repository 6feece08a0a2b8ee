//! nbtree reads and writes the named binary tag format: a self-describing,
//! big-endian encoding of a tree of named scalars, arrays, lists and
//! compounds. It is used to persist structured world and editing data.
//!
//! * The tree itself is a [`Tag`], with [`List`] and [`Compound`] for the
//!   container variants. A root is a [`NamedTag`].
//! * [`from_bytes`] and [`from_reader`] decode, see [`de`].
//! * [`to_bytes`] and [`to_writer`] encode, see [`ser`].
//! * `Display` on [`Tag`] and [`NamedTag`] gives a readable dump, see
//!   [`print`].
//!
//! The codec works on raw bytes. Files on disk are usually gzip compressed,
//! decompressing them first is up to the caller.
//!
//! # Quick example
//!
//! ```
//! use nbtree::{Compound, List, NamedTag, Tag, TagType};
//!
//! # fn main() -> nbtree::error::Result<()> {
//! let heights = List::new(TagType::Int, vec![Tag::Int(1), Tag::Int(2), Tag::Int(3)])?;
//! let root = Compound::builder()
//!     .put("name", "spawn")
//!     .put("heights", heights)
//!     .build()?;
//!
//! let root = NamedTag::new("schematic", root.into())?;
//! let bytes = nbtree::to_bytes(&root)?;
//! let back = nbtree::from_bytes(&bytes)?;
//!
//! assert_eq!(root, back);
//! println!("{}", back);
//! # Ok(())
//! # }
//! ```
//!
//! # Limits
//!
//! Decoding is recursive, so nesting depth is capped by [`DecodeOpts`]. Long
//! arrays are read in chunks, so a lying length prefix costs little memory
//! before the input runs out.

pub mod de;
pub mod error;
pub mod print;
pub mod ser;

mod tag;

pub use de::{from_bytes, from_bytes_with_opts, from_reader, from_reader_with_opts};
pub use ser::{to_bytes, to_bytes_with_opts, to_writer, to_writer_with_opts};
pub use tag::{Compound, CompoundBuilder, List, NamedTag, Tag};

#[cfg(test)]
mod test;

use std::convert::TryFrom;

/// Default cap on nesting depth for both decoding and encoding.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// The one-byte type id of a tag. This does not carry the value or the name.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum TagType {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of unnamed tags, all of the same type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
}

impl TagType {
    /// The name used by the printer, eg `TAG_Byte_Array`.
    pub const fn name(self) -> &'static str {
        match self {
            TagType::End => "TAG_End",
            TagType::Byte => "TAG_Byte",
            TagType::Short => "TAG_Short",
            TagType::Int => "TAG_Int",
            TagType::Long => "TAG_Long",
            TagType::Float => "TAG_Float",
            TagType::Double => "TAG_Double",
            TagType::ByteArray => "TAG_Byte_Array",
            TagType::String => "TAG_String",
            TagType::List => "TAG_List",
            TagType::Compound => "TAG_Compound",
            TagType::IntArray => "TAG_Int_Array",
        }
    }
}

impl std::fmt::Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Written out by hand: the ids are fixed by the format and a derive crate
// would only add compile time.
impl TryFrom<u8> for TagType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use TagType::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12..=u8::MAX => return Err(()),
        })
    }
}

impl From<TagType> for u8 {
    fn from(tag: TagType) -> Self {
        tag as u8
    }
}

/// Options for customizing decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOpts {
    /// Maximum nesting of compounds and lists, counting the root as 1.
    pub(crate) max_depth: usize,

    /// Maximum number of elements a single list or array may declare.
    pub(crate) max_seq_len: usize,
}

impl DecodeOpts {
    /// Create the default options.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_seq_len: usize::MAX,
        }
    }

    /// Cap the nesting depth. Deeper input fails with
    /// [`ErrorKind::DepthExceeded`][crate::error::ErrorKind::DepthExceeded].
    pub fn max_depth(self, value: usize) -> Self {
        Self {
            max_depth: value,
            ..self
        }
    }

    /// Cap the declared length of lists and arrays. Longer declarations fail
    /// as malformed data without reading any elements.
    pub fn max_seq_len(self, value: usize) -> Self {
        Self {
            max_seq_len: value,
            ..self
        }
    }
}

impl Default for DecodeOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for customizing encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOpts {
    pub(crate) max_depth: usize,
}

impl EncodeOpts {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Cap the nesting depth, counting the root as 1.
    pub fn max_depth(self, value: usize) -> Self {
        Self { max_depth: value }
    }
}

impl Default for EncodeOpts {
    fn default() -> Self {
        Self::new()
    }
}
