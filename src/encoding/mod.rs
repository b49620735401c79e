//! # Encoding Module
//!
//! This module provides the variable-length integer codec used throughout
//! the file format: payload sizes, rowids, and record serial types are all
//! stored as varints.

pub mod varint;

pub use varint::{decode_varint, encode_varint, varint_len};
