//! `date(8B) ‖ bits(4B) ‖ cards0(B) ‖ cards1(B) ‖ pad`

use super::RowLayout;

const DATE_OFFSET: usize = 0;
const BITS_OFFSET: usize = 8;
const CARDS_OFFSET: usize = 12;

pub fn write(layout: &RowLayout, row: &mut [u8], date: u64, bits: u32, bitmap: &[u8]) {
    let b = layout.bitmap_bytes as usize;
    debug_assert_eq!(bitmap.len(), b * 2);

    row[DATE_OFFSET..DATE_OFFSET + 8].copy_from_slice(&date.to_le_bytes());
    row[BITS_OFFSET..BITS_OFFSET + 4].copy_from_slice(&bits.to_le_bytes());
    row[CARDS_OFFSET..CARDS_OFFSET + b * 2].copy_from_slice(bitmap);
}

pub fn date(row: &[u8]) -> u64 {
    u64::from_le_bytes(row[DATE_OFFSET..DATE_OFFSET + 8].try_into().unwrap())
}

pub fn bits(row: &[u8]) -> u32 {
    u32::from_le_bytes(row[BITS_OFFSET..BITS_OFFSET + 4].try_into().unwrap())
}

/// Returns (`cards0` bitmap, `cards1` bitmap).
pub fn cards<'a>(layout: &RowLayout, row: &'a [u8]) -> (&'a [u8], &'a [u8]) {
    let b = layout.bitmap_bytes as usize;
    let side0 = &row[CARDS_OFFSET..CARDS_OFFSET + b];
    let side1 = &row[CARDS_OFFSET + b..CARDS_OFFSET + 2 * b];
    (side0, side1)
}
