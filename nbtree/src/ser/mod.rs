//! Encoding of tag trees into their canonical byte form. Use
//! [`to_bytes`][`crate::to_bytes`] or [`to_writer`][`crate::to_writer`].
//!
//! There is exactly one encoding for any tree: no padding, big-endian
//! numbers, modified UTF-8 text and children in compound order. Anything
//! [`from_bytes`][crate::from_bytes] accepts encodes back to the same bytes.
//!
//! Trees that cannot be represented fail with
//! [`ErrorKind::InvalidTag`][crate::error::ErrorKind::InvalidTag] rather than
//! producing a corrupt stream: lists with elements of the wrong type, text
//! over 65535 bytes once encoded, arrays longer than `i32::MAX`.
mod write_nbt;

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::{Compound, EncodeOpts, List, NamedTag, Tag, TagType};

use self::write_nbt::WriteNbt;

/// Encode `tag` to a new vector of bytes.
pub fn to_bytes(tag: &NamedTag) -> Result<Vec<u8>> {
    to_bytes_with_opts(tag, EncodeOpts::new())
}

/// Like [`to_bytes`], with custom limits.
pub fn to_bytes_with_opts(tag: &NamedTag, opts: EncodeOpts) -> Result<Vec<u8>> {
    let mut result = vec![];
    Encoder::with_opts(&mut result, opts).encode(tag)?;
    Ok(result)
}

/// Encode `tag` to `writer`. The tree is encoded in full before anything is
/// written, so an invalid tree leaves the writer untouched.
pub fn to_writer<W: Write>(writer: W, tag: &NamedTag) -> Result<()> {
    to_writer_with_opts(writer, tag, EncodeOpts::new())
}

/// Like [`to_writer`], with custom limits.
pub fn to_writer_with_opts<W: Write>(mut writer: W, tag: &NamedTag, opts: EncodeOpts) -> Result<()> {
    let bytes = to_bytes_with_opts(tag, opts)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Streaming encoder. Unlike [`to_writer`] it writes as it goes, so a failed
/// encode can leave a partial root behind in the writer.
pub struct Encoder<W: Write> {
    writer: W,
    opts: EncodeOpts,
    depth: usize,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_opts(writer, EncodeOpts::new())
    }

    pub fn with_opts(writer: W, opts: EncodeOpts) -> Self {
        Self {
            writer,
            opts,
            depth: 0,
        }
    }

    /// Consumes this encoder, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write a fully framed root: type id, name, payload. An End root is
    /// the single byte `0x00`.
    pub fn encode(&mut self, root: &NamedTag) -> Result<()> {
        self.depth = 0;

        let tag = root.tag();
        if let Tag::End = tag {
            if !root.name().is_empty() {
                return Err(Error::invalid_tag("end tags carry no name"));
            }
            return self.writer.write_tag_type(TagType::End);
        }

        self.write_named(root.name(), tag)?;
        trace!("encoded root {:?} of type {}", root.name(), tag.tag_type());
        Ok(())
    }

    fn write_named(&mut self, name: &str, tag: &Tag) -> Result<()> {
        self.writer.write_tag_type(tag.tag_type())?;
        self.writer.write_size_prefixed_str(name)?;
        self.write_payload(tag)
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.opts.max_depth {
            debug!("encode depth exceeded {}", self.opts.max_depth);
            return Err(Error::depth_exceeded(self.opts.max_depth));
        }
        Ok(())
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }

    /// Writes the bare payload. List elements get nothing else: the list
    /// header already says what they are.
    fn write_payload(&mut self, tag: &Tag) -> Result<()> {
        match tag {
            Tag::End => return Err(Error::invalid_tag("end tag has no payload")),
            Tag::Byte(v) => self.writer.write_i8(*v)?,
            Tag::Short(v) => self.writer.write_i16::<BigEndian>(*v)?,
            Tag::Int(v) => self.writer.write_i32::<BigEndian>(*v)?,
            Tag::Long(v) => self.writer.write_i64::<BigEndian>(*v)?,
            Tag::Float(v) => self.writer.write_f32::<BigEndian>(*v)?,
            Tag::Double(v) => self.writer.write_f64::<BigEndian>(*v)?,
            Tag::String(v) => self.writer.write_size_prefixed_str(v)?,
            Tag::ByteArray(v) => {
                self.writer.write_len(v.len())?;
                let bytes: Vec<u8> = v.iter().map(|b| *b as u8).collect();
                self.writer.write_all(&bytes)?;
            }
            Tag::IntArray(v) => {
                self.writer.write_len(v.len())?;
                for i in v {
                    self.writer.write_i32::<BigEndian>(*i)?;
                }
            }
            Tag::List(list) => self.write_list(list)?,
            Tag::Compound(compound) => self.write_compound(compound)?,
        }
        Ok(())
    }

    fn write_list(&mut self, list: &List) -> Result<()> {
        let element_type = list.element_type();

        if element_type == TagType::End && !list.is_empty() {
            return Err(Error::invalid_tag("list of end tags must be empty"));
        }
        if let Some(e) = list.iter().find(|e| e.tag_type() != element_type) {
            return Err(Error::invalid_tag(format!(
                "list of {} contains {}",
                element_type,
                e.tag_type()
            )));
        }

        self.enter()?;
        self.writer.write_tag_type(element_type)?;
        self.writer.write_len(list.len())?;
        for element in list {
            self.write_payload(element)?;
        }
        self.exit();
        Ok(())
    }

    fn write_compound(&mut self, compound: &Compound) -> Result<()> {
        self.enter()?;
        for (name, tag) in compound {
            if let Tag::End = tag {
                return Err(Error::invalid_tag(format!(
                    "compound entry {:?} cannot be an end tag",
                    name
                )));
            }
            self.write_named(name, tag)?;
        }
        self.writer.write_tag_type(TagType::End)?;
        self.exit();
        Ok(())
    }
}
