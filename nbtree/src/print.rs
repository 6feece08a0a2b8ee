//! Readable text rendering of tag trees, mainly for diagnostics.
//!
//! Both [`NamedTag`] and [`Tag`] implement `Display`. Scalars print as
//! `TAG_<Kind>("name"): value`, with the `("name")` part left out when the
//! name is empty. Compounds and lists print a header with their entry count
//! followed by their children in order, inside braces, indented by
//! [`INDENT`] per level:
//!
//! ```text
//! TAG_Compound("root"): 2 entries
//! {
//!    TAG_Int("x"): 1
//!    TAG_List("heights"): 2 entries
//!    {
//!       TAG_Short: 64
//!       TAG_Short: 70
//!    }
//! }
//! ```
//!
//! Byte arrays print each byte as two uppercase hex digits followed by a
//! space, including after the last byte.

use std::fmt::{self, Display, Write};

use crate::{NamedTag, Tag};

/// One level of indentation.
pub const INDENT: &str = "   ";

impl Display for NamedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tag(f, self.name(), self.tag(), 0)
    }
}

/// Renders the tag without a name, as list elements are shown.
impl Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tag(f, "", self, 0)
    }
}

fn write_indent<W: Write>(w: &mut W, level: usize) -> fmt::Result {
    for _ in 0..level {
        w.write_str(INDENT)?;
    }
    Ok(())
}

fn write_header<W: Write>(w: &mut W, name: &str, tag: &Tag, level: usize) -> fmt::Result {
    write_indent(w, level)?;
    w.write_str(tag.tag_type().name())?;
    if !name.is_empty() {
        write!(w, "(\"{}\")", name)?;
    }
    Ok(())
}

fn write_block<'a, W, I>(w: &mut W, children: I, level: usize) -> fmt::Result
where
    W: Write,
    I: Iterator<Item = (&'a str, &'a Tag)>,
{
    w.write_char('\n')?;
    write_indent(w, level)?;
    w.write_str("{\n")?;
    for (name, child) in children {
        write_tag(w, name, child, level + 1)?;
        w.write_char('\n')?;
    }
    write_indent(w, level)?;
    w.write_char('}')
}

fn write_tag<W: Write>(w: &mut W, name: &str, tag: &Tag, level: usize) -> fmt::Result {
    write_header(w, name, tag, level)?;

    match tag {
        Tag::End => Ok(()),
        Tag::Byte(v) => write!(w, ": {}", v),
        Tag::Short(v) => write!(w, ": {}", v),
        Tag::Int(v) => write!(w, ": {}", v),
        Tag::Long(v) => write!(w, ": {}", v),
        Tag::Float(v) => write!(w, ": {:?}", v),
        Tag::Double(v) => write!(w, ": {:?}", v),
        Tag::String(v) => write!(w, ": {}", v),
        Tag::ByteArray(v) => {
            w.write_str(": ")?;
            for b in v {
                write!(w, "{:02X} ", *b as u8)?;
            }
            Ok(())
        }
        Tag::IntArray(v) => {
            w.write_str(": ")?;
            for i in v {
                write!(w, "{} ", i)?;
            }
            Ok(())
        }
        Tag::List(list) => {
            write!(w, ": {} entries", list.len())?;
            write_block(w, list.iter().map(|e| ("", e)), level)
        }
        Tag::Compound(compound) => {
            write!(w, ": {} entries", compound.len())?;
            write_block(w, compound.iter().map(|(k, v)| (k.as_str(), v)), level)
        }
    }
}
