//! # Record Format
//!
//! A cell payload holds one record: a varint header size (inclusive of
//! itself), a sequence of serial-type varints, then the value bodies in
//! the same order. The serial type encodes both the decoded type and the
//! on-disk body length, so all body offsets are known once the header has
//! been read.
//!
//! - `serial`: the serial-type alphabet and its body sizes
//! - `view`: the zero-copy record view with typed value access

pub mod serial;
pub mod view;

pub use serial::serial_body_size;
pub use view::Record;
