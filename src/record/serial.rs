//! Serial-type alphabet of the record format.
//!
//! | Serial type | Body size  | Decoded value                  |
//! |-------------|------------|--------------------------------|
//! | 0           | 0          | NULL                           |
//! | 1           | 1          | 8-bit signed big-endian        |
//! | 2           | 2          | 16-bit signed big-endian       |
//! | 3           | 3          | 24-bit signed big-endian       |
//! | 4           | 4          | 32-bit signed big-endian       |
//! | 5           | 6          | 48-bit signed big-endian       |
//! | 6           | 8          | 64-bit signed big-endian       |
//! | 7           | 8          | IEEE-754 big-endian double     |
//! | 8           | 0          | the integer 0                  |
//! | 9           | 0          | the integer 1                  |
//! | 10, 11      | -          | reserved, rejected             |
//! | N >= 12 even| (N-12)/2   | blob                           |
//! | N >= 13 odd | (N-13)/2   | text in the file's encoding    |

use crate::error::{Error, Result};

/// Returns the on-disk body size in bytes for a serial type. The reserved
/// types 10 and 11 (and anything negative) are `Corruption`.
pub fn serial_body_size(serial_type: i64) -> Result<u64> {
    match serial_type {
        0 | 8 | 9 => Ok(0),
        1 => Ok(1),
        2 => Ok(2),
        3 => Ok(3),
        4 => Ok(4),
        5 => Ok(6),
        6 | 7 => Ok(8),
        10 | 11 => Err(Error::corruption(format!(
            "reserved serial type {}",
            serial_type
        ))),
        t if t >= 12 => Ok(((t as u64) - 12 - (t as u64 % 2)) / 2),
        t => Err(Error::corruption(format!("invalid serial type {}", t))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_sizes() {
        let expected = [(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 6), (6, 8), (7, 8), (8, 0), (9, 0)];
        for (serial_type, size) in expected {
            assert_eq!(serial_body_size(serial_type).unwrap(), size);
        }
    }

    #[test]
    fn blob_and_text_sizes() {
        assert_eq!(serial_body_size(12).unwrap(), 0);
        assert_eq!(serial_body_size(13).unwrap(), 0);
        assert_eq!(serial_body_size(14).unwrap(), 1);
        assert_eq!(serial_body_size(15).unwrap(), 1);
        assert_eq!(serial_body_size(100).unwrap(), 44);
        assert_eq!(serial_body_size(101).unwrap(), 44);
    }

    #[test]
    fn reserved_types_are_corruption() {
        assert!(matches!(serial_body_size(10), Err(Error::Corruption(_))));
        assert!(matches!(serial_body_size(11), Err(Error::Corruption(_))));
        assert!(matches!(serial_body_size(-3), Err(Error::Corruption(_))));
    }
}
