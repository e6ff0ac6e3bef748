//! `id(18B) ‖ date(8B) ‖ 8×u32 string offsets ‖ bits(4B) ‖ pad`
//!
//! The eight offsets are, in order: resultDesc, title, link, deck0, deck1,
//! region, authorLink, authorName — matching the field order the original
//! `GetResultsDesc`/.../`GetAuthorName` accessors walk.

use super::REPLAY_ID_SIZE;

const ID_OFFSET: usize = 0;
const DATE_OFFSET: usize = ID_OFFSET + REPLAY_ID_SIZE; // 18
const RESULT_DESC_OFFSET: usize = DATE_OFFSET + 8; // 26
const TITLE_OFFSET: usize = RESULT_DESC_OFFSET + 4; // 30
const LINK_OFFSET: usize = TITLE_OFFSET + 4; // 34
const DECK0_OFFSET: usize = LINK_OFFSET + 4; // 38
const DECK1_OFFSET: usize = DECK0_OFFSET + 4; // 42
const REGION_OFFSET: usize = DECK1_OFFSET + 4; // 46
const AUTHOR_LINK_OFFSET: usize = REGION_OFFSET + 4; // 50
const AUTHOR_NAME_OFFSET: usize = AUTHOR_LINK_OFFSET + 4; // 54
const BITS_OFFSET: usize = AUTHOR_NAME_OFFSET + 4; // 58

pub const RAW_SIZE: usize = BITS_OFFSET + 4; // 62

#[derive(Clone, Copy, Debug, Default)]
pub struct StringOffsets {
    pub result_desc: u32,
    pub title: u32,
    pub link: u32,
    pub deck0: u32,
    pub deck1: u32,
    pub region: u32,
    pub author_link: u32,
    pub author_name: u32,
}

pub fn write(
    row: &mut [u8],
    id: &[u8; REPLAY_ID_SIZE],
    date: u64,
    offsets: &StringOffsets,
    bits: u32,
) {
    row[ID_OFFSET..ID_OFFSET + REPLAY_ID_SIZE].copy_from_slice(id);
    row[DATE_OFFSET..DATE_OFFSET + 8].copy_from_slice(&date.to_le_bytes());
    row[RESULT_DESC_OFFSET..RESULT_DESC_OFFSET + 4].copy_from_slice(&offsets.result_desc.to_le_bytes());
    row[TITLE_OFFSET..TITLE_OFFSET + 4].copy_from_slice(&offsets.title.to_le_bytes());
    row[LINK_OFFSET..LINK_OFFSET + 4].copy_from_slice(&offsets.link.to_le_bytes());
    row[DECK0_OFFSET..DECK0_OFFSET + 4].copy_from_slice(&offsets.deck0.to_le_bytes());
    row[DECK1_OFFSET..DECK1_OFFSET + 4].copy_from_slice(&offsets.deck1.to_le_bytes());
    row[REGION_OFFSET..REGION_OFFSET + 4].copy_from_slice(&offsets.region.to_le_bytes());
    row[AUTHOR_LINK_OFFSET..AUTHOR_LINK_OFFSET + 4].copy_from_slice(&offsets.author_link.to_le_bytes());
    row[AUTHOR_NAME_OFFSET..AUTHOR_NAME_OFFSET + 4].copy_from_slice(&offsets.author_name.to_le_bytes());
    row[BITS_OFFSET..BITS_OFFSET + 4].copy_from_slice(&bits.to_le_bytes());
}

pub fn id(row: &[u8]) -> [u8; REPLAY_ID_SIZE] {
    row[ID_OFFSET..ID_OFFSET + REPLAY_ID_SIZE].try_into().unwrap()
}

pub fn date(row: &[u8]) -> u64 {
    u64::from_le_bytes(row[DATE_OFFSET..DATE_OFFSET + 8].try_into().unwrap())
}

pub fn bits(row: &[u8]) -> u32 {
    u32::from_le_bytes(row[BITS_OFFSET..BITS_OFFSET + 4].try_into().unwrap())
}

pub fn string_offsets(row: &[u8]) -> StringOffsets {
    let read = |at: usize| u32::from_le_bytes(row[at..at + 4].try_into().unwrap());
    StringOffsets {
        result_desc: read(RESULT_DESC_OFFSET),
        title: read(TITLE_OFFSET),
        link: read(LINK_OFFSET),
        deck0: read(DECK0_OFFSET),
        deck1: read(DECK1_OFFSET),
        region: read(REGION_OFFSET),
        author_link: read(AUTHOR_LINK_OFFSET),
        author_name: read(AUTHOR_NAME_OFFSET),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::encode_id;

    #[test]
    fn round_trips_all_fields() {
        let mut row = [0u8; RAW_SIZE];
        let id = encode_id("replay-001");
        let offsets = StringOffsets {
            result_desc: 1,
            title: 2,
            link: 3,
            deck0: 4,
            deck1: 5,
            region: 6,
            author_link: 7,
            author_name: 8,
        };
        write(&mut row, &id, 202401010000, &offsets, 0xABCD);

        assert_eq!(self::id(&row), id);
        assert_eq!(date(&row), 202401010000);
        assert_eq!(bits(&row), 0xABCD);
        let back = string_offsets(&row);
        assert_eq!(back.author_name, 8);
        assert_eq!(back.result_desc, 1);
    }
}
