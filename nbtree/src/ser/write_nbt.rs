use std::convert::TryFrom;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::TagType;

/// Primitive writes shared by the encoder. Lengths are checked against the
/// width of their prefix before anything is written.
pub(crate) trait WriteNbt: Write {
    fn write_tag_type(&mut self, tag_type: TagType) -> Result<()> {
        self.write_u8(tag_type.into())?;
        Ok(())
    }

    fn write_size_prefixed_str(&mut self, s: &str) -> Result<()> {
        let bytes = cesu8::to_java_cesu8(s);
        let len = u16::try_from(bytes.len()).map_err(|_| {
            Error::invalid_tag(format!(
                "string too long: {} bytes of modified utf-8, max {}",
                bytes.len(),
                u16::MAX
            ))
        })?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(&bytes)?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| Error::invalid_tag(format!("len too large: {}", len)))?;
        self.write_i32::<BigEndian>(len)?;
        Ok(())
    }
}

impl<T> WriteNbt for T where T: Write {}
