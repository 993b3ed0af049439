//! Flat byte record encoding for [`MediaDescriptor`].
//!
//! Layout: `name`, `mime_type`, a `has_locator` byte (`0` or `1`), then the
//! locator when present. Each string is a big-endian `u32` byte length
//! followed by UTF-8 bytes, so no field can exceed `u32::MAX` bytes.

use crate::{Locator, MediaDescriptor};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use flipper_error::{DescriptorError, DescriptorErrorKind, DescriptorResult};

const NO_LOCATOR: u8 = 0;
const HAS_LOCATOR: u8 = 1;

impl MediaDescriptor {
    /// Encode into a flat byte record.
    ///
    /// # Examples
    ///
    /// ```
    /// use flipper_core::{Locator, MediaDescriptor};
    ///
    /// let descriptor = MediaDescriptor::from_raw_parts("clip", "video/mp4")?
    ///     .with_locator(Some(Locator::content("external_primary", "video", 3)));
    /// let decoded = MediaDescriptor::decode(&descriptor.encode()?)?;
    /// assert_eq!(decoded, descriptor);
    /// # Ok::<(), flipper_error::DescriptorError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a field is longer than `u32::MAX` bytes.
    pub fn encode(&self) -> DescriptorResult<Bytes> {
        let locator = self.locator().as_ref();
        let capacity = 4 + self.name().len()
            + 4
            + self.mime_type().len()
            + 1
            + locator.map_or(0, |locator| 4 + locator.as_str().len());

        let mut buf = BytesMut::with_capacity(capacity);
        put_str(&mut buf, "name", self.name())?;
        put_str(&mut buf, "mime_type", self.mime_type())?;
        match locator {
            Some(locator) => {
                buf.put_u8(HAS_LOCATOR);
                put_str(&mut buf, "locator", locator.as_str())?;
            }
            None => buf.put_u8(NO_LOCATOR),
        }
        Ok(buf.freeze())
    }

    /// Decode a record produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns `MalformedRecord` for truncated input, invalid UTF-8, an
    /// unknown locator flag or trailing bytes, and `InvalidArgument` if the
    /// decoded name or type is empty.
    pub fn decode(record: &[u8]) -> DescriptorResult<Self> {
        let mut buf = record;
        let name = take_str(&mut buf, "name")?;
        let mime_type = take_str(&mut buf, "mime_type")?;

        if !buf.has_remaining() {
            return Err(malformed("missing locator flag"));
        }
        let locator = match buf.get_u8() {
            NO_LOCATOR => None,
            HAS_LOCATOR => Some(Locator::new(take_str(&mut buf, "locator")?)),
            flag => return Err(malformed(format!("unknown locator flag {flag}"))),
        };

        if buf.has_remaining() {
            return Err(malformed(format!(
                "{} trailing bytes after record",
                buf.remaining()
            )));
        }

        Ok(Self::from_raw_parts(name, mime_type)?.with_locator(locator))
    }
}

fn put_str(buf: &mut BytesMut, field: &str, value: &str) -> DescriptorResult<()> {
    buf.put_u32(length_prefix(field, value.len())?);
    buf.put_slice(value.as_bytes());
    Ok(())
}

fn length_prefix(field: &str, len: usize) -> DescriptorResult<u32> {
    u32::try_from(len).map_err(|_| {
        DescriptorError::invalid_argument(format!(
            "{field} is {len} bytes, record limit is {}",
            u32::MAX
        ))
    })
}

fn take_str(buf: &mut &[u8], field: &str) -> DescriptorResult<String> {
    if buf.remaining() < 4 {
        return Err(malformed(format!("truncated length of {field}")));
    }
    let len = buf.get_u32() as usize;
    if buf.remaining() < len {
        return Err(malformed(format!(
            "{field} needs {len} bytes, {} left",
            buf.remaining()
        )));
    }
    let (value, rest) = buf.split_at(len);
    *buf = rest;
    String::from_utf8(value.to_vec()).map_err(|e| malformed(format!("{field}: {e}")))
}

#[track_caller]
fn malformed(message: impl Into<String>) -> DescriptorError {
    DescriptorError::new(DescriptorErrorKind::MalformedRecord(message.into()))
}
