//! # Record View
//!
//! `Record` parses a cell payload's header once and then serves values on
//! demand. Parsing walks the serial-type varints, accumulating each
//! value's body offset (the first body starts where the header ends, at
//! the inclusive header size), so `value_at` is a bounds check, a slice,
//! and a fixed-width decode.
//!
//! ## Text Handling
//!
//! UTF-8 text is truncated at the first NUL byte and decoded lossily;
//! invalid sequences become U+FFFD rather than failing the read. Files
//! declaring UTF-16 (either endianness) open fine, but reading a TEXT
//! value from them is `Unsupported`.
//!
//! ## Borrowing
//!
//! The view borrows the payload it was constructed over; returned blob and
//! text values borrow from the same bytes. A visitor that wants to keep a
//! value calls `Value::into_owned`.

use smallvec::SmallVec;

use super::serial::serial_body_size;
use crate::encoding::decode_varint;
use crate::error::{Error, Result};
use crate::storage::TextEncoding;
use crate::types::Value;

#[derive(Debug, Clone, Copy)]
struct ValueSlot {
    serial_type: i64,
    offset: u64,
}

/// A decoded record over a cell payload.
#[derive(Debug, Clone)]
pub struct Record<'c> {
    encoding: TextEncoding,
    payload: &'c [u8],
    rowid: Option<i64>,
    slots: SmallVec<[ValueSlot; 8]>,
}

impl<'c> Record<'c> {
    /// Parses the record header of `payload`. `rowid` carries the rowid of
    /// the table-leaf cell the payload came from, if any.
    pub fn parse(
        encoding: TextEncoding,
        payload: &'c [u8],
        rowid: Option<i64>,
    ) -> Result<Self> {
        let (header_size, first_type_at) = decode_varint(payload)?;
        if header_size < 0 || header_size as u64 > payload.len() as u64 {
            return Err(Error::corruption(format!(
                "record header size {} exceeds payload of {} bytes",
                header_size,
                payload.len()
            )));
        }
        let header_size = header_size as usize;

        let mut slots = SmallVec::new();
        let mut consumed = first_type_at;
        let mut body_offset = header_size as u64;

        while consumed < header_size {
            let (serial_type, n) = decode_varint(&payload[consumed..])?;
            consumed += n;
            slots.push(ValueSlot {
                serial_type,
                offset: body_offset,
            });
            body_offset += serial_body_size(serial_type)?;
        }

        if consumed != header_size {
            return Err(Error::corruption(
                "record header overruns its declared size",
            ));
        }

        Ok(Self {
            encoding,
            payload,
            rowid,
            slots,
        })
    }

    pub fn num_values(&self) -> usize {
        self.slots.len()
    }

    /// Rowid of the carrying cell; `None` for index entries and
    /// WITHOUT-ROWID table rows.
    pub fn rowid(&self) -> Option<i64> {
        self.rowid
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Decodes value `index` per its serial type.
    pub fn value_at(&self, index: usize) -> Result<Value<'c>> {
        let slot = self.slots.get(index).ok_or(Error::OutOfRange {
            what: "value",
            index: index as u64,
            limit: self.slots.len() as u64,
        })?;

        match slot.serial_type {
            0 => Ok(Value::Null),
            8 => Ok(Value::Int(0)),
            9 => Ok(Value::Int(1)),
            t @ 1..=6 => {
                let size = serial_body_size(t)?;
                Ok(Value::Int(read_twos_complement(self.body(slot, size)?)))
            }
            7 => {
                let bytes = self.body(slot, 8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                Ok(Value::Float(f64::from_bits(u64::from_be_bytes(raw))))
            }
            t if t >= 12 && t % 2 == 0 => {
                let bytes = self.body(slot, serial_body_size(t)?)?;
                Ok(Value::Blob(bytes.into()))
            }
            t if t >= 13 => {
                let bytes = self.body(slot, serial_body_size(t)?)?;
                match self.encoding {
                    TextEncoding::Utf8 => Ok(Value::Text(decode_utf8_text(bytes))),
                    TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                        Err(Error::unsupported("UTF-16 text decoding"))
                    }
                }
            }
            t => Err(Error::corruption(format!("invalid serial type {}", t))),
        }
    }

    /// Value `index` as an integer; floats are truncated, everything else
    /// reads as zero.
    pub fn as_int(&self, index: usize) -> Result<i64> {
        Ok(match self.value_at(index)? {
            Value::Int(v) => v,
            Value::Float(v) => v as i64,
            _ => 0,
        })
    }

    /// Value `index` as a float; non-floats read as zero.
    pub fn as_float(&self, index: usize) -> Result<f64> {
        Ok(match self.value_at(index)? {
            Value::Float(v) => v,
            _ => 0.0,
        })
    }

    /// Value `index` as text; non-text reads as the empty string.
    pub fn as_text(&self, index: usize) -> Result<std::borrow::Cow<'c, str>> {
        Ok(match self.value_at(index)? {
            Value::Text(s) => s,
            _ => "".into(),
        })
    }

    /// Value `index` as a blob; non-blobs read as empty.
    pub fn as_blob(&self, index: usize) -> Result<std::borrow::Cow<'c, [u8]>> {
        Ok(match self.value_at(index)? {
            Value::Blob(b) => b,
            _ => (&[][..]).into(),
        })
    }

    fn body(&self, slot: &ValueSlot, size: u64) -> Result<&'c [u8]> {
        let start = usize::try_from(slot.offset).map_err(|_| Error::Truncated("record body"))?;
        let end = start
            .checked_add(size as usize)
            .ok_or(Error::Truncated("record body"))?;
        self.payload
            .get(start..end)
            .ok_or(Error::Truncated("record body"))
    }
}

/// Truncates at the first NUL and decodes lossily.
fn decode_utf8_text(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    let text = match bytes.iter().position(|&b| b == 0) {
        Some(nul) => &bytes[..nul],
        None => bytes,
    };
    String::from_utf8_lossy(text)
}

/// Sign-extends a 1..8-byte big-endian two's-complement integer.
fn read_twos_complement(bytes: &[u8]) -> i64 {
    let mut value: i64 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
    for &byte in bytes {
        value = (value << 8) | i64::from(byte);
    }
    value
}
