//! # Cell Decoding and Payload Spill
//!
//! A cell is one record-carrying slot inside a b-tree page, addressed by a
//! 16-bit pointer from the node's cell pointer array. Its shape depends on
//! the node kind:
//!
//! ```text
//! table interior:  left_child(4)  rowid(varint)
//! table leaf:      size(varint)   rowid(varint)  payload  [overflow(4)]
//! index interior:  left_child(4)  size(varint)   payload  [overflow(4)]
//! index leaf:      size(varint)   payload        [overflow(4)]
//! ```
//!
//! ## Spill Formula
//!
//! For a declared payload of `P` bytes on a page with usable size `U`, the
//! number of bytes stored locally is:
//!
//! ```text
//! X = U - 35                     maximum local payload
//! P <= X           -> everything local, no overflow
//! M = (U-12)*32/255 - 23         minimum local payload
//! K = M + (P - M) mod (U - 4)
//! local = K if K <= X, else M
//! ```
//!
//! All arithmetic is integer arithmetic. When overflow is nonzero, a
//! big-endian 32-bit first-overflow-page id trails the local bytes and the
//! remaining `P - local` bytes come from the overflow chain.
//!
//! ## Payload Representation
//!
//! The common no-overflow case borrows payload bytes straight from the
//! page (`Payload::Inline`); a spilled payload is stitched into an owned
//! buffer (`Payload::Owned`). Either way the decoded payload is exactly
//! `P` bytes, and any shortfall is a hard `Truncated` error.

use std::ops::Deref;

use super::node::{Node, NodeKind};
use super::overflow::OverflowChain;
use crate::error::{Error, Result};
use crate::storage::{ByteSource, PageCursor, Pager};

/// A cell's payload bytes: borrowed from the page when fully local, owned
/// when stitched together from an overflow chain.
#[derive(Debug, Clone)]
pub enum Payload<'s> {
    Inline(&'s [u8]),
    Owned(Vec<u8>),
}

impl Payload<'_> {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Inline(bytes) => bytes,
            Payload::Owned(bytes) => bytes,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Payload::Inline(_))
    }
}

impl Deref for Payload<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Payload<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// One decoded cell, tagged by the node kind it came from.
#[derive(Debug, Clone)]
pub enum Cell<'s> {
    TableInterior {
        left_child: u32,
        rowid: i64,
    },
    TableLeaf {
        rowid: i64,
        payload: Payload<'s>,
    },
    IndexInterior {
        left_child: u32,
        payload: Payload<'s>,
    },
    IndexLeaf {
        payload: Payload<'s>,
    },
}

impl<'s> Cell<'s> {
    /// Decodes cell `index` of `node`. `pager` and `usable_size` are needed
    /// to chase overflow chains for spilled payloads.
    pub fn read<S: ByteSource>(
        node: &Node<'s>,
        index: u16,
        pager: &'s Pager<S>,
        usable_size: u32,
    ) -> Result<Self> {
        let offset = node.cell_pointer(index)?;
        let mut cursor = node.page().cursor();
        cursor.seek(usize::from(offset))?;

        match node.kind() {
            NodeKind::TableInterior => {
                let left_child = cursor.read_u32()?;
                let rowid = cursor.read_varint()?;
                Ok(Cell::TableInterior { left_child, rowid })
            }
            NodeKind::TableLeaf => {
                let size = payload_size(&mut cursor)?;
                let rowid = cursor.read_varint()?;
                let payload = read_payload(&mut cursor, pager, usable_size, size)?;
                Ok(Cell::TableLeaf { rowid, payload })
            }
            NodeKind::IndexInterior => {
                let left_child = cursor.read_u32()?;
                let size = payload_size(&mut cursor)?;
                let payload = read_payload(&mut cursor, pager, usable_size, size)?;
                Ok(Cell::IndexInterior {
                    left_child,
                    payload,
                })
            }
            NodeKind::IndexLeaf => {
                let size = payload_size(&mut cursor)?;
                let payload = read_payload(&mut cursor, pager, usable_size, size)?;
                Ok(Cell::IndexLeaf { payload })
            }
        }
    }

    /// Left child pointer, when this cell has one and it is nonzero.
    pub fn left_child(&self) -> Option<u32> {
        match *self {
            Cell::TableInterior { left_child, .. } | Cell::IndexInterior { left_child, .. } => {
                (left_child != 0).then_some(left_child)
            }
            _ => None,
        }
    }

    pub fn rowid(&self) -> Option<i64> {
        match *self {
            Cell::TableInterior { rowid, .. } | Cell::TableLeaf { rowid, .. } => Some(rowid),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&Payload<'s>> {
        match self {
            Cell::TableLeaf { payload, .. }
            | Cell::IndexInterior { payload, .. }
            | Cell::IndexLeaf { payload } => Some(payload),
            Cell::TableInterior { .. } => None,
        }
    }
}

fn payload_size(cursor: &mut PageCursor<'_>) -> Result<u64> {
    let size = cursor.read_varint()?;
    u64::try_from(size).map_err(|_| Error::corruption(format!("negative payload size {}", size)))
}

/// Splits a declared payload size into `(local, overflow)` byte counts per
/// the spill formula above.
pub fn local_payload_split(payload_size: u64, usable_size: u32) -> (u64, u64) {
    let u = u64::from(usable_size);
    let x = u - 35;
    if payload_size <= x {
        return (payload_size, 0);
    }

    let m = (u - 12) * 32 / 255 - 23;
    let k = m + (payload_size - m) % (u - 4);
    let local = if k <= x { k } else { m };
    (local, payload_size - local)
}

fn read_payload<'s, S: ByteSource>(
    cursor: &mut PageCursor<'s>,
    pager: &'s Pager<S>,
    usable_size: u32,
    total: u64,
) -> Result<Payload<'s>> {
    let (local, spilled) = local_payload_split(total, usable_size);

    if spilled == 0 {
        return Ok(Payload::Inline(cursor.read_exact(total as usize)?));
    }

    // The declared size is untrusted until the chain delivers it, so the
    // buffer grows from actual page reads rather than a reservation of
    // `total`.
    let mut buffer = cursor.read_exact(local as usize)?.to_vec();

    let first_overflow = cursor.read_u32()?;
    let mut chain = OverflowChain::new(pager, first_overflow, usable_size, spilled);
    chain.read_to_end(&mut buffer)?;

    if buffer.len() as u64 != total {
        return Err(Error::Truncated("cell payload"));
    }
    Ok(Payload::Owned(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_varint;
    use crate::storage::{MemSource, Pager};

    const USABLE: u32 = 512;

    /// Builds a two-page image whose second page is a single-cell node of
    /// the given kind, with the raw cell bytes placed at offset 256.
    fn single_cell_pager(kind_byte: u8, cell: &[u8], extra_pages: &[Vec<u8>]) -> Pager<MemSource> {
        let mut page = vec![0u8; 512];
        page[0] = kind_byte;
        let header_len = if kind_byte == 0x05 || kind_byte == 0x02 {
            12
        } else {
            8
        };
        page[3..5].copy_from_slice(&1u16.to_be_bytes());
        page[5..7].copy_from_slice(&256u16.to_be_bytes());
        page[header_len..header_len + 2].copy_from_slice(&256u16.to_be_bytes());
        page[256..256 + cell.len()].copy_from_slice(cell);

        let mut bytes = vec![0u8; 512]; // placeholder page 1
        bytes.extend(page);
        for extra in extra_pages {
            assert_eq!(extra.len(), 512);
            bytes.extend_from_slice(extra);
        }
        let count = 2 + extra_pages.len() as u32;
        Pager::new(MemSource::new(bytes), 512, count)
    }

    fn node<'p>(pager: &'p Pager<MemSource>) -> Node<'p> {
        Node::parse(pager.read_page(2).unwrap()).unwrap()
    }

    #[test]
    fn split_keeps_small_payloads_local() {
        assert_eq!(local_payload_split(0, USABLE), (0, 0));
        assert_eq!(local_payload_split(100, USABLE), (100, 0));

        let x = u64::from(USABLE) - 35;
        assert_eq!(local_payload_split(x, USABLE), (x, 0));
    }

    #[test]
    fn split_spills_one_past_the_local_maximum() {
        let x = u64::from(USABLE) - 35; // 477
        let (local, overflow) = local_payload_split(x + 1, USABLE);

        // M = (512-12)*32/255 - 23 = 39; K = 39 + (478-39) % 508 = 478 > X,
        // so the minimum local payload applies.
        assert_eq!(local, 39);
        assert_eq!(overflow, x + 1 - 39);
        assert_eq!(local + overflow, x + 1);
    }

    #[test]
    fn split_uses_k_when_it_fits() {
        // P = 600: K = 39 + (600-39) % 508 = 92 <= 477.
        let (local, overflow) = local_payload_split(600, USABLE);
        assert_eq!(local, 92);
        assert_eq!(overflow, 508);
    }

    #[test]
    fn table_interior_cell_has_no_payload() {
        let mut cell = Vec::new();
        cell.extend_from_slice(&7u32.to_be_bytes());
        let mut buf = [0u8; 9];
        let n = encode_varint(4242, &mut buf);
        cell.extend_from_slice(&buf[..n]);

        let pager = single_cell_pager(0x05, &cell, &[]);
        let decoded = Cell::read(&node(&pager), 0, &pager, USABLE).unwrap();

        assert_eq!(decoded.left_child(), Some(7));
        assert_eq!(decoded.rowid(), Some(4242));
        assert!(decoded.payload().is_none());
    }

    #[test]
    fn table_leaf_cell_with_local_payload_borrows() {
        let payload = b"hello payload";
        let mut cell = Vec::new();
        let mut buf = [0u8; 9];
        let n = encode_varint(payload.len() as i64, &mut buf);
        cell.extend_from_slice(&buf[..n]);
        let n = encode_varint(1, &mut buf);
        cell.extend_from_slice(&buf[..n]);
        cell.extend_from_slice(payload);

        let pager = single_cell_pager(0x0D, &cell, &[]);
        let decoded = Cell::read(&node(&pager), 0, &pager, USABLE).unwrap();

        assert_eq!(decoded.rowid(), Some(1));
        let got = decoded.payload().unwrap();
        assert!(got.is_inline());
        assert_eq!(got.as_bytes(), payload);
    }

    #[test]
    fn spilled_payload_is_stitched_from_overflow_pages() {
        // P = 600 on U = 512: 92 local bytes, 508 on one overflow page.
        let payload: Vec<u8> = (0..600u32).map(|i| i as u8).collect();
        let (local, overflow) = local_payload_split(600, USABLE);
        assert_eq!((local, overflow), (92, 508));

        let mut cell = Vec::new();
        let mut buf = [0u8; 9];
        let n = encode_varint(600, &mut buf);
        cell.extend_from_slice(&buf[..n]);
        let n = encode_varint(5, &mut buf);
        cell.extend_from_slice(&buf[..n]);
        cell.extend_from_slice(&payload[..92]);
        cell.extend_from_slice(&3u32.to_be_bytes()); // first overflow page

        let mut overflow_page = vec![0u8; 512];
        overflow_page[..4].copy_from_slice(&0u32.to_be_bytes());
        overflow_page[4..].copy_from_slice(&payload[92..]);

        let pager = single_cell_pager(0x0D, &cell, &[overflow_page]);
        let decoded = Cell::read(&node(&pager), 0, &pager, USABLE).unwrap();

        let got = decoded.payload().unwrap();
        assert!(!got.is_inline());
        assert_eq!(got.as_bytes(), &payload[..]);
    }

    #[test]
    fn index_interior_cell_carries_child_and_payload() {
        let payload = b"key bytes";
        let mut cell = Vec::new();
        cell.extend_from_slice(&3u32.to_be_bytes());
        let mut buf = [0u8; 9];
        let n = encode_varint(payload.len() as i64, &mut buf);
        cell.extend_from_slice(&buf[..n]);
        cell.extend_from_slice(payload);

        let pager = single_cell_pager(0x02, &cell, &[]);
        let decoded = Cell::read(&node(&pager), 0, &pager, USABLE).unwrap();

        assert_eq!(decoded.left_child(), Some(3));
        assert_eq!(decoded.rowid(), None);
        assert_eq!(decoded.payload().unwrap().as_bytes(), payload);
    }

    #[test]
    fn index_leaf_cell_is_payload_only() {
        let payload = b"entry";
        let mut cell = Vec::new();
        let mut buf = [0u8; 9];
        let n = encode_varint(payload.len() as i64, &mut buf);
        cell.extend_from_slice(&buf[..n]);
        cell.extend_from_slice(payload);

        let pager = single_cell_pager(0x0A, &cell, &[]);
        let decoded = Cell::read(&node(&pager), 0, &pager, USABLE).unwrap();

        assert_eq!(decoded.left_child(), None);
        assert_eq!(decoded.rowid(), None);
        assert_eq!(decoded.payload().unwrap().as_bytes(), payload);
    }

    #[test]
    fn absurd_declared_payload_fails_before_allocating() {
        // A terabyte-scale declared size with P mod (U-4) chosen so that
        // K > X and only the minimum M = 39 bytes are local. The chain
        // terminates immediately, so the read must fail with Truncated
        // instead of reserving the declared total.
        let total: i64 = 478 + 508 * 2_000_000_000;
        let (local, _) = local_payload_split(total as u64, USABLE);
        assert_eq!(local, 39);

        let mut cell = Vec::new();
        let mut buf = [0u8; 9];
        let n = encode_varint(total, &mut buf);
        cell.extend_from_slice(&buf[..n]);
        let n = encode_varint(1, &mut buf);
        cell.extend_from_slice(&buf[..n]);
        cell.extend_from_slice(&[0xAA; 39]);
        cell.extend_from_slice(&0u32.to_be_bytes()); // chain ends at once

        let pager = single_cell_pager(0x0D, &cell, &[]);
        let result = Cell::read(&node(&pager), 0, &pager, USABLE);
        assert!(matches!(result, Err(Error::Truncated(_))));
    }

    #[test]
    fn payload_running_past_page_end_is_truncated() {
        // Declared 300 bytes but the cell sits 20 bytes from the page end.
        let mut cell = Vec::new();
        let mut buf = [0u8; 9];
        let n = encode_varint(300, &mut buf);
        cell.extend_from_slice(&buf[..n]);
        let n = encode_varint(1, &mut buf);
        cell.extend_from_slice(&buf[..n]);

        let mut page = vec![0u8; 512];
        page[0] = 0x0D;
        page[3..5].copy_from_slice(&1u16.to_be_bytes());
        page[8..10].copy_from_slice(&492u16.to_be_bytes());
        page[492..492 + cell.len()].copy_from_slice(&cell);

        let mut bytes = vec![0u8; 512];
        bytes.extend(page);
        let pager = Pager::new(MemSource::new(bytes), 512, 2);
        let node = Node::parse(pager.read_page(2).unwrap()).unwrap();

        let result = Cell::read(&node, 0, &pager, USABLE);
        assert!(matches!(result, Err(Error::Truncated(_))));
    }
}
