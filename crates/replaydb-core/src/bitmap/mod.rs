//! Card presence bitmaps and the per-query normal/flipped pair (spec §4.3).
//!
//! Bit order is MSB-first within a byte: card index `i` sets bit
//! `1 << (7 - i % 8)` of byte `i / 8`. This matches the later of the two
//! original revisions and the MSB-first convention used throughout this
//! crate's `signal::bitpack`-style code (spec §9 picks one, this is it).

use crate::error::{Error, Result};
use crate::row::RowLayout;

fn card_bit(card_index: u32) -> (usize, u8) {
    let byte = (card_index / 8) as usize;
    let bit = 1u8 << (7 - (card_index % 8));
    (byte, bit)
}

fn validate_card_index(card_index: u32, card_count: u32) -> Result<()> {
    if card_index >= card_count {
        return Err(Error::Validation(format!(
            "card index {card_index} out of range for card_count {card_count}"
        )));
    }
    Ok(())
}

fn set_bits(bitmap: &mut [u8], half_offset: usize, indexes: &[u32], card_count: u32) -> Result<()> {
    for &idx in indexes {
        validate_card_index(idx, card_count)?;
        let (byte, bit) = card_bit(idx);
        bitmap[half_offset + byte] |= bit;
    }
    Ok(())
}

/// The two orientations of a query's card sets, cached once per query and
/// reused across the full scan.
#[derive(Clone, Debug)]
pub struct QueryBitmap {
    /// `cards0 ‖ cards1`
    pub normal: Vec<u8>,
    /// `cards1 ‖ cards0`
    pub flipped: Vec<u8>,
}

impl QueryBitmap {
    pub fn build(layout: &RowLayout, cards0: &[u32], cards1: &[u32]) -> Result<Self> {
        let b = layout.bitmap_bytes as usize;
        let mut normal = vec![0u8; b * 2];
        set_bits(&mut normal, 0, cards0, layout.card_count)?;
        set_bits(&mut normal, b, cards1, layout.card_count)?;

        let mut flipped = vec![0u8; b * 2];
        flipped[0..b].copy_from_slice(&normal[b..2 * b]);
        flipped[b..2 * b].copy_from_slice(&normal[0..b]);

        Ok(Self { normal, flipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_expected_bit_positions() {
        let layout = RowLayout::new(16);
        let q = QueryBitmap::build(&layout, &[0, 1], &[8]).unwrap();
        // card 0 -> byte 0, bit 0x80; card 1 -> byte 0, bit 0x40
        assert_eq!(q.normal[0], 0xC0);
        // card 8 lives in side1's first byte
        let b = layout.bitmap_bytes as usize;
        assert_eq!(q.normal[b], 0x80);
    }

    #[test]
    fn flipped_swaps_halves() {
        let layout = RowLayout::new(16);
        let q = QueryBitmap::build(&layout, &[0], &[8]).unwrap();
        let b = layout.bitmap_bytes as usize;
        assert_eq!(&q.flipped[0..b], &q.normal[b..2 * b]);
        assert_eq!(&q.flipped[b..2 * b], &q.normal[0..b]);
    }

    #[test]
    fn rejects_out_of_range_card_index() {
        let layout = RowLayout::new(16);
        assert!(QueryBitmap::build(&layout, &[16], &[]).is_err());
    }
}
