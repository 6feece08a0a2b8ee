//! Decoding of tag trees from bytes.
//!
//! Decoding is all or nothing: any violation of the wire format aborts the
//! whole decode with [`ErrorKind::MalformedData`][crate::error::ErrorKind],
//! and no partial tree is returned.
//!
//! ```
//! use nbtree::{from_bytes, Tag};
//!
//! let bytes = [0x0A, 0, 0, 0x03, 0, 1, b'x', 0, 0, 0, 1, 0];
//! let root = from_bytes(&bytes).unwrap();
//!
//! assert_eq!(root.name(), "");
//! let compound = root.tag().as_compound().unwrap();
//! assert_eq!(compound.get("x"), Some(&Tag::Int(1)));
//! ```
//!
//! # Reading from a stream
//!
//! [`Decoder`] reads one root at a time from any [`Read`], so several roots
//! written back to back can be pulled out in turn. It does no decompression:
//! wrap the reader in a decoder such as `flate2::read::GzDecoder` first.
//!
//! ```no_run
//! use nbtree::de::Decoder;
//! use flate2::read::GzDecoder;
//!
//! let file = std::fs::File::open("level.dat").unwrap();
//! let mut decoder = Decoder::new(GzDecoder::new(file));
//! let root = decoder.decode().unwrap();
//! println!("{}", root);
//! ```

use std::convert::TryFrom;
use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::{Compound, DecodeOpts, List, NamedTag, Tag, TagType};

/// First byte of the gzip magic number.
const GZIP_MAGIC: u8 = 0x1f;

/// Largest number of array elements reserved up front. Beyond this the
/// buffers grow as the data actually arrives.
const MAX_PREALLOC: usize = 4096;

/// Decode a single root tag from the start of `input`. Bytes left over after
/// the root are an error.
pub fn from_bytes(input: &[u8]) -> Result<NamedTag> {
    from_bytes_with_opts(input, DecodeOpts::new())
}

/// Like [`from_bytes`], with custom limits.
pub fn from_bytes_with_opts(input: &[u8], opts: DecodeOpts) -> Result<NamedTag> {
    let mut rest = input;
    let root = Decoder::with_opts(&mut rest, opts).decode()?;

    if !rest.is_empty() {
        return Err(Error::malformed(format!(
            "{} trailing bytes after root tag",
            rest.len()
        )));
    }

    Ok(root)
}

/// Decode a single root tag from `reader`. Anything after the root is left
/// unread.
pub fn from_reader<R: Read>(reader: R) -> Result<NamedTag> {
    from_reader_with_opts(reader, DecodeOpts::new())
}

/// Like [`from_reader`], with custom limits.
pub fn from_reader_with_opts<R: Read>(reader: R, opts: DecodeOpts) -> Result<NamedTag> {
    Decoder::with_opts(reader, opts).decode()
}

/// Recursive descent decoder over any reader. Does not do decompression.
pub struct Decoder<R: Read> {
    reader: R,
    opts: DecodeOpts,
    depth: usize,
}

impl<R: Read> Decoder<R> {
    /// Create a decoder with the default options.
    pub fn new(reader: R) -> Self {
        Self::with_opts(reader, DecodeOpts::new())
    }

    pub fn with_opts(reader: R, opts: DecodeOpts) -> Self {
        Self {
            reader,
            opts,
            depth: 0,
        }
    }

    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Consumes this decoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decode the next fully framed tag: type id, name, payload.
    ///
    /// A bare End byte decodes to an unnamed [`Tag::End`] without reading
    /// further.
    pub fn decode(&mut self) -> Result<NamedTag> {
        self.depth = 0;

        let tag_type = self.read_tag_type()?;
        if tag_type == TagType::End {
            return Ok(NamedTag::unnamed(Tag::End));
        }

        let name = self.read_str()?;
        let tag = self.read_payload(tag_type)?;
        trace!("decoded root {:?} of type {}", name, tag_type);

        Ok(NamedTag::from_parts(name, tag))
    }

    fn read_tag_type(&mut self) -> Result<TagType> {
        let id = self.reader.read_u8()?;
        TagType::try_from(id).map_err(|_| {
            if id == GZIP_MAGIC {
                Error::malformed(format!(
                    "invalid tag type id: {}, data may be gzip compressed and needs decompressing first",
                    id
                ))
            } else {
                Error::unknown_type_id(id)
            }
        })
    }

    fn read_str(&mut self) -> Result<String> {
        let len = self.reader.read_u16::<BigEndian>()? as usize;

        let mut buf = vec![0; len];
        self.reader.read_exact(&mut buf)?;

        let s = cesu8::from_java_cesu8(&buf).map_err(|_| Error::nonunicode(&buf))?;

        // Plain UTF-8 is accepted by the decoder above even where modified
        // UTF-8 differs (NUL, supplementary characters). Only the canonical
        // form is valid, so the text must re-encode to the same bytes.
        if *cesu8::to_java_cesu8(&s) != buf[..] {
            return Err(Error::nonunicode(&buf));
        }

        Ok(s.into_owned())
    }

    /// Reads a 32-bit count, rejecting negative values and anything over
    /// the configured maximum sequence length.
    fn read_len(&mut self) -> Result<usize> {
        let len = self.reader.read_i32::<BigEndian>()?;
        let len = usize::try_from(len).map_err(|_| Error::negative_len(len))?;

        if len > self.opts.max_seq_len {
            debug!(
                "rejecting length {} over max sequence length {}",
                len, self.opts.max_seq_len
            );
            return Err(Error::malformed(format!(
                "length ({}) greater than max sequence length ({})",
                len, self.opts.max_seq_len
            )));
        }

        Ok(len)
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.opts.max_depth {
            debug!("decode depth exceeded {}", self.opts.max_depth);
            return Err(Error::depth_exceeded(self.opts.max_depth));
        }
        Ok(())
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }

    /// Reads the payload for `tag_type`. This is the only framing list
    /// elements get, so it never reads a type id or name of its own.
    fn read_payload(&mut self, tag_type: TagType) -> Result<Tag> {
        Ok(match tag_type {
            TagType::End => return Err(Error::malformed("end tag has no payload")),
            TagType::Byte => Tag::Byte(self.reader.read_i8()?),
            TagType::Short => Tag::Short(self.reader.read_i16::<BigEndian>()?),
            TagType::Int => Tag::Int(self.reader.read_i32::<BigEndian>()?),
            TagType::Long => Tag::Long(self.reader.read_i64::<BigEndian>()?),
            TagType::Float => Tag::Float(self.reader.read_f32::<BigEndian>()?),
            TagType::Double => Tag::Double(self.reader.read_f64::<BigEndian>()?),
            TagType::String => Tag::String(self.read_str()?),
            TagType::ByteArray => {
                let len = self.read_len()?;
                Tag::ByteArray(self.read_byte_array(len)?)
            }
            TagType::IntArray => {
                let len = self.read_len()?;
                let mut ints = Vec::with_capacity(len.min(MAX_PREALLOC));
                for _ in 0..len {
                    ints.push(self.reader.read_i32::<BigEndian>()?);
                }
                Tag::IntArray(ints)
            }
            TagType::List => Tag::List(self.read_list()?),
            TagType::Compound => Tag::Compound(self.read_compound()?),
        })
    }

    fn read_byte_array(&mut self, len: usize) -> Result<Vec<i8>> {
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
        self.reader
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut buf)?;

        if buf.len() != len {
            return Err(Error::malformed(format!(
                "eof: byte array declared {} bytes but only {} remain",
                len,
                buf.len()
            )));
        }

        Ok(buf.into_iter().map(|b| b as i8).collect())
    }

    fn read_list(&mut self) -> Result<List> {
        let element_type = self.read_tag_type()?;
        let len = self.read_len()?;

        // Empty lists of End show up in real data. A non-empty one would be
        // a list of zero-sized payloads: a tiny input claiming a huge tree.
        if element_type == TagType::End && len != 0 {
            return Err(Error::malformed(format!(
                "list of end tags with {} elements",
                len
            )));
        }

        self.enter()?;
        let mut elements = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            elements.push(self.read_payload(element_type)?);
        }
        self.exit();

        Ok(List::from_decoded(element_type, elements))
    }

    fn read_compound(&mut self) -> Result<Compound> {
        self.enter()?;
        let mut compound = Compound::new();

        loop {
            let tag_type = self.read_tag_type()?;
            if tag_type == TagType::End {
                break;
            }

            let name = self.read_str()?;
            let tag = self.read_payload(tag_type)?;
            compound.insert_last(name, tag);
        }

        self.exit();
        Ok(compound)
    }
}
