//! Per-replay filter + bitwise overlap scoring (spec §4.4).

use crate::bitmap::QueryBitmap;
use crate::dict::NamedBitField;
use crate::row::{search_row, ReplayBits, RowLayout};

#[derive(Clone, Copy, Debug)]
pub struct MatchResult {
    pub flipped: bool,
    /// `0` means "excluded" — dates are always positive for valid rows.
    pub sort: u64,
    pub match0: u32,
    pub match1: u32,
}

impl MatchResult {
    fn excluded(flipped: bool) -> Self {
        Self {
            flipped,
            sort: 0,
            match0: 0,
            match1: 0,
        }
    }
}

pub struct Dictionaries<'a> {
    pub modes: &'a NamedBitField,
    pub sources: &'a NamedBitField,
    pub results: &'a NamedBitField,
}

#[allow(clippy::too_many_arguments)]
pub fn match_replay(
    layout: &RowLayout,
    row: &[u8],
    flipped: bool,
    query: &QueryBitmap,
    dict: &Dictionaries,
    min_date: u64,
    ranked: bool,
    unranked: bool,
    sources_mask: u32,
    modes_mask: u32,
    result_mask: u32,
) -> MatchResult {
    let date = search_row::date(row);
    if date < min_date {
        return MatchResult::excluded(flipped);
    }

    let bits = ReplayBits::unpack(search_row::bits(row));
    if !ranked && bits.ranked {
        return MatchResult::excluded(flipped);
    }
    if !unranked && !bits.ranked {
        return MatchResult::excluded(flipped);
    }
    if !dict.sources.matches(sources_mask, bits.source) {
        return MatchResult::excluded(flipped);
    }
    if !dict.modes.matches(modes_mask, bits.mode) {
        return MatchResult::excluded(flipped);
    }
    if !dict.results.matches(result_mask, bits.result) {
        return MatchResult::excluded(flipped);
    }

    let (replay0, replay1) = search_row::cards(layout, row);
    let query_bitmap = if flipped { &query.flipped } else { &query.normal };
    let b = layout.bitmap_bytes as usize;

    let match0 = popcount_and(&query_bitmap[0..b], replay0);
    let match1 = popcount_and(&query_bitmap[b..2 * b], replay1);

    let primary: u64 = if flipped {
        2 * match1 as u64 + match0 as u64
    } else {
        2 * match0 as u64 + match1 as u64
    };
    let sort = (primary << 44) | date;

    MatchResult {
        flipped,
        sort,
        match0,
        match1,
    }
}

/// Popcount of `a AND b`, summed across 32-bit words (spec §4.4 step 3/4).
fn popcount_and(a: &[u8], b: &[u8]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    a.chunks_exact(4)
        .zip(b.chunks_exact(4))
        .map(|(x, y)| {
            let xi = u32::from_le_bytes(x.try_into().unwrap());
            let yi = u32::from_le_bytes(y.try_into().unwrap());
            (xi & yi).count_ones()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::search_row;

    fn dicts() -> (NamedBitField, NamedBitField, NamedBitField) {
        (
            NamedBitField::new(128),
            NamedBitField::new(64),
            NamedBitField::new(16),
        )
    }

    #[test]
    fn excludes_rows_older_than_min_date() {
        let layout = RowLayout::new(16);
        let mut row = vec![0u8; layout.search_row_sz as usize];
        search_row::write(&layout, &mut row, 100, 0, &vec![0u8; layout.bitmap_bytes as usize * 2]);

        let (modes, sources, results) = dicts();
        let query = QueryBitmap::build(&layout, &[], &[]).unwrap();
        let dict = Dictionaries {
            modes: &modes,
            sources: &sources,
            results: &results,
        };

        let m = match_replay(&layout, &row, false, &query, &dict, 200, true, true, !0, !0, !0);
        assert_eq!(m.sort, 0);
    }

    #[test]
    fn scores_overlap_with_orientation() {
        let layout = RowLayout::new(16);
        let mut row = vec![0u8; layout.search_row_sz as usize];
        let replay_bitmap = QueryBitmap::build(&layout, &[0, 1, 2], &[8, 9]).unwrap();
        search_row::write(&layout, &mut row, 1, 0, &replay_bitmap.normal);

        let (modes, sources, results) = dicts();
        let query = QueryBitmap::build(&layout, &[0, 1], &[8]).unwrap();
        let dict = Dictionaries {
            modes: &modes,
            sources: &sources,
            results: &results,
        };

        let m = match_replay(&layout, &row, false, &query, &dict, 0, true, true, !0, !0, !0);
        assert_eq!(m.match0, 2);
        assert_eq!(m.match1, 1);
        assert_eq!(m.sort >> 44, 5); // primary = 2*2 + 1
    }
}
