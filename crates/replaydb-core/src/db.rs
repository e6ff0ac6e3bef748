//! The replay database: owned storage plus the public query surface
//! (spec §3/§5).

use std::collections::HashMap;
use std::path::Path;

use crate::archive::{self, Header, Sections};
use crate::bitmap::QueryBitmap;
use crate::dict::NamedBitField;
use crate::error::{Error, Result};
use crate::match_engine::{match_replay, Dictionaries, MatchResult};
use crate::query::{Filter, QueryResult, ReplayRecord};
use crate::row::{
    decode_id, encode_id, replay_row, search_row, ReplayBits, RowLayout, MAX_MODES, MAX_RESULTS,
    MAX_SOURCES, REPLAY_ID_SIZE,
};
use crate::strtab::StringTable;
use crate::topk::{ScoredIndex, TopK};

/// One replay's full field set, as passed to `set_replay`.
pub struct NewReplay<'a> {
    pub id: &'a str,
    pub date: u64,
    pub ranked: bool,
    pub mode: &'a str,
    pub source: &'a str,
    pub result: &'a str,
    pub cards0: &'a [u32],
    pub cards1: &'a [u32],
    pub result_desc: &'a str,
    pub title: &'a str,
    pub link: &'a str,
    pub deck0: &'a str,
    pub deck1: &'a str,
    pub region: &'a str,
    pub author_link: &'a str,
    pub author_name: &'a str,
}

pub struct ReplayDb {
    game_name: String,
    layout: RowLayout,
    modes: NamedBitField,
    sources: NamedBitField,
    results: NamedBitField,
    strings: StringTable,
    search_table: Vec<u8>,
    replay_table: Vec<u8>,
    replay_count: u32,
    replay_capacity: u32,
    id_map: HashMap<[u8; REPLAY_ID_SIZE], u32>,
}

impl ReplayDb {
    pub fn new(game_name: &str, card_count: u32) -> Self {
        Self {
            game_name: game_name.to_string(),
            layout: RowLayout::new(card_count),
            modes: NamedBitField::new(MAX_MODES),
            sources: NamedBitField::new(MAX_SOURCES),
            results: NamedBitField::new(MAX_RESULTS),
            strings: StringTable::new(),
            search_table: Vec::new(),
            replay_table: Vec::new(),
            replay_count: 0,
            replay_capacity: 0,
            id_map: HashMap::new(),
        }
    }

    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    pub fn card_count(&self) -> u32 {
        self.layout.card_count
    }

    pub fn get_replay_count(&self) -> u32 {
        self.replay_count
    }

    const INITIAL_CAPACITY: u32 = 1024;
    const CAPACITY_STEP: u32 = 512;

    /// Builds the new, larger buffers fully before swapping them in, so a
    /// panic mid-allocation leaves the prior tables untouched.
    fn ensure_capacity(&mut self, needed: u32) {
        if needed <= self.replay_capacity {
            return;
        }
        let mut new_capacity = if self.replay_capacity == 0 {
            Self::INITIAL_CAPACITY
        } else {
            self.replay_capacity
        };
        while new_capacity < needed {
            new_capacity += Self::CAPACITY_STEP;
        }

        let mut new_search = vec![0u8; new_capacity as usize * self.layout.search_row_sz as usize];
        new_search[..self.search_table.len()].copy_from_slice(&self.search_table);
        let mut new_replay = vec![0u8; new_capacity as usize * self.layout.replay_row_sz as usize];
        new_replay[..self.replay_table.len()].copy_from_slice(&self.replay_table);

        self.search_table = new_search;
        self.replay_table = new_replay;
        self.replay_capacity = new_capacity;
    }

    fn search_row_mut(&mut self, idx: u32) -> &mut [u8] {
        let sz = self.layout.search_row_sz as usize;
        let at = idx as usize * sz;
        &mut self.search_table[at..at + sz]
    }

    fn search_row(&self, idx: u32) -> &[u8] {
        let sz = self.layout.search_row_sz as usize;
        let at = idx as usize * sz;
        &self.search_table[at..at + sz]
    }

    fn replay_row_mut(&mut self, idx: u32) -> &mut [u8] {
        let sz = self.layout.replay_row_sz as usize;
        let at = idx as usize * sz;
        &mut self.replay_table[at..at + sz]
    }

    fn replay_row(&self, idx: u32) -> &[u8] {
        let sz = self.layout.replay_row_sz as usize;
        let at = idx as usize * sz;
        &self.replay_table[at..at + sz]
    }

    /// Inserts a new replay, or overwrites it in place if `replay.id`
    /// already exists.
    pub fn set_replay(&mut self, replay: NewReplay<'_>) -> Result<()> {
        let id_bytes = encode_id(replay.id);
        let bitmap = QueryBitmap::build(&self.layout, replay.cards0, replay.cards1)?;

        let mode = self.modes.intern(replay.mode)?;
        let source = self.sources.intern(replay.source)?;
        let result = self.results.intern(replay.result)?;
        let bits = ReplayBits {
            ranked: replay.ranked,
            mode,
            source,
            result,
        }
        .pack();

        let offsets = replay_row::StringOffsets {
            result_desc: self.strings.store(replay.result_desc),
            title: self.strings.store(replay.title),
            link: self.strings.store(replay.link),
            deck0: self.strings.store(replay.deck0),
            deck1: self.strings.store(replay.deck1),
            region: self.strings.store(replay.region),
            author_link: self.strings.store(replay.author_link),
            author_name: self.strings.store(replay.author_name),
        };

        let idx = match self.id_map.get(&id_bytes) {
            Some(&idx) => idx,
            None => {
                let idx = self.replay_count;
                self.ensure_capacity(idx + 1);
                self.replay_count += 1;
                self.id_map.insert(id_bytes, idx);
                idx
            }
        };

        let layout = self.layout.clone();
        search_row::write(&layout, self.search_row_mut(idx), replay.date, bits, &bitmap.normal);
        replay_row::write(self.replay_row_mut(idx), &id_bytes, replay.date, &offsets, bits);
        Ok(())
    }

    /// Removes a replay by id. The reference leaves a stale `id_map`
    /// entry for whichever replay gets swapped into the freed slot; this
    /// rewrites that entry so lookups by id stay correct after a remove
    /// (spec §9 bug fix).
    pub fn remove_replay(&mut self, id: &str) -> bool {
        let id_bytes = encode_id(id);
        let Some(idx) = self.id_map.remove(&id_bytes) else {
            return false;
        };

        let last = self.replay_count - 1;
        if idx != last {
            let sr_sz = self.layout.search_row_sz as usize;
            let rr_sz = self.layout.replay_row_sz as usize;

            let (search_at, search_last) =
                split_two(&mut self.search_table, idx as usize * sr_sz, last as usize * sr_sz, sr_sz);
            search_at.copy_from_slice(search_last);

            let (replay_at, replay_last) =
                split_two(&mut self.replay_table, idx as usize * rr_sz, last as usize * rr_sz, rr_sz);
            replay_at.copy_from_slice(replay_last);

            let moved_id = replay_row::id(self.replay_row(idx));
            self.id_map.insert(moved_id, idx);
        }

        self.replay_count -= 1;
        true
    }

    pub fn get_replay_by_id(&self, id: &str) -> Option<ReplayRecord> {
        let id_bytes = encode_id(id);
        let idx = *self.id_map.get(&id_bytes)?;
        self.get_replay_by_index(idx)
    }

    pub fn get_replay_by_index(&self, idx: u32) -> Option<ReplayRecord> {
        if idx >= self.replay_count {
            return None;
        }
        Some(self.materialize(idx, false, 0, 0))
    }

    fn materialize(&self, idx: u32, flipped: bool, match0: u32, match1: u32) -> ReplayRecord {
        let row = self.replay_row(idx);
        let id = decode_id(&replay_row::id(row));
        let date = replay_row::date(row);
        let bits = ReplayBits::unpack(replay_row::bits(row));
        let offsets = replay_row::string_offsets(row);

        ReplayRecord {
            id,
            date,
            ranked: bits.ranked,
            mode: self.modes.name(bits.mode).unwrap_or("").to_string(),
            source: self.sources.name(bits.source).unwrap_or("").to_string(),
            result: self.results.name(bits.result).unwrap_or("").to_string(),
            result_desc: self.strings.get(offsets.result_desc).to_string(),
            title: self.strings.get(offsets.title).to_string(),
            link: self.strings.get(offsets.link).to_string(),
            deck0: self.strings.get(offsets.deck0).to_string(),
            deck1: self.strings.get(offsets.deck1).to_string(),
            region: self.strings.get(offsets.region).to_string(),
            author_link: self.strings.get(offsets.author_link).to_string(),
            author_name: self.strings.get(offsets.author_name).to_string(),
            flipped,
            match0,
            match1,
        }
    }

    fn result_filter_mask(&self, filter: &Filter) -> u32 {
        if !filter.only_wins {
            return !0;
        }
        match self.results.index_of("win") {
            Some(idx) => 1 << idx,
            // Nothing has ever been tagged a win; nothing can match.
            None => 0,
        }
    }

    /// Mirrors the reference's `flipResultBitField`: a row's `result` is
    /// recorded relative to side0, so under the flipped orientation
    /// "only wins" means the row must be recorded as a `"loss"`.
    fn flip_result_filter_mask(&self, filter: &Filter) -> u32 {
        if !filter.only_wins {
            return !0;
        }
        match self.results.index_of("loss") {
            Some(idx) => 1 << idx,
            None => 0,
        }
    }

    /// Most recent replays matching `filter`, with no card-overlap
    /// scoring — ordered purely by date, descending. `fromPlayer`/
    /// `fromOpponent` are search-only (spec §6.1) and are never consulted
    /// here.
    pub fn new_games(&self, offset: u32, num_results: u32, filter: &Filter) -> Option<QueryResult> {
        if filter.is_contradictory() {
            return None;
        }

        let dict = Dictionaries {
            modes: &self.modes,
            sources: &self.sources,
            results: &self.results,
        };
        let sources_mask = mask_for(&self.sources, &filter.sources);
        let modes_mask = mask_for(&self.modes, &filter.modes);

        let mut candidates: Vec<(u64, u32)> = Vec::new();
        for idx in 0..self.replay_count {
            let row = self.search_row(idx);
            let date = search_row::date(row);
            if date < filter.min_date {
                continue;
            }
            let bits = ReplayBits::unpack(search_row::bits(row));
            if !filter.ranked && bits.ranked {
                continue;
            }
            if !filter.unranked && !bits.ranked {
                continue;
            }
            if !dict.sources.matches(sources_mask, bits.source) {
                continue;
            }
            if !dict.modes.matches(modes_mask, bits.mode) {
                continue;
            }
            candidates.push((date, idx));
        }

        let valid_count = candidates.len() as u32;
        candidates.sort_by(|a, b| b.0.cmp(&a.0));

        let replays = candidates
            .into_iter()
            .skip(offset as usize)
            .take(num_results as usize)
            .map(|(_, idx)| self.materialize(idx, false, 0, 0))
            .collect();

        Some(QueryResult {
            replays,
            valid_count,
        })
    }

    /// Card-overlap search (spec §4.4/§4.5/§4.6). `fromPlayer`/
    /// `fromOpponent` (spec §6.1) pick which orientation(s) of a row are
    /// considered: both set keeps the better of normal/flipped, only one
    /// set restricts the row to that orientation alone.
    pub fn search(
        &self,
        offset: u32,
        num_results: u32,
        cards0: &[u32],
        cards1: &[u32],
        filter: &Filter,
    ) -> Option<QueryResult> {
        if filter.is_contradictory() {
            return None;
        }

        let query = QueryBitmap::build(&self.layout, cards0, cards1).ok()?;
        let dict = Dictionaries {
            modes: &self.modes,
            sources: &self.sources,
            results: &self.results,
        };
        let sources_mask = mask_for(&self.sources, &filter.sources);
        let modes_mask = mask_for(&self.modes, &filter.modes);
        let result_mask = self.result_filter_mask(filter);
        let flip_result_mask = self.flip_result_filter_mask(filter);

        let mut valid_count = 0u32;
        let mut top = TopK::new((offset + num_results) as usize);

        for idx in 0..self.replay_count {
            let row = self.search_row(idx);

            let normal = filter.from_player.then(|| {
                match_replay(
                    &self.layout,
                    row,
                    false,
                    &query,
                    &dict,
                    filter.min_date,
                    filter.ranked,
                    filter.unranked,
                    sources_mask,
                    modes_mask,
                    result_mask,
                )
            });
            let flipped = filter.from_opponent.then(|| {
                match_replay(
                    &self.layout,
                    row,
                    true,
                    &query,
                    &dict,
                    filter.min_date,
                    filter.ranked,
                    filter.unranked,
                    sources_mask,
                    modes_mask,
                    flip_result_mask,
                )
            });

            let best = match (normal, flipped) {
                (Some(n), Some(f)) => best_orientation(n, f),
                (Some(n), None) => n,
                (None, Some(f)) => f,
                (None, None) => unreachable!("is_contradictory rules out from_player == from_opponent == false"),
            };
            if best.sort == 0 {
                continue;
            }
            valid_count += 1;
            top.offer(ScoredIndex {
                sort: best.sort,
                replay_index: idx,
                flipped: best.flipped,
                match0: best.match0,
                match1: best.match1,
            });
        }

        let replays = top
            .into_sorted_desc()
            .into_iter()
            .skip(offset as usize)
            .take(num_results as usize)
            .map(|s| self.materialize(s.replay_index, s.flipped, s.match0, s.match1))
            .collect();

        Some(QueryResult {
            replays,
            valid_count,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let sections = Sections {
            header: Header {
                card_count: self.layout.card_count,
                replay_count: self.replay_count,
                replay_capacity: self.replay_capacity,
            },
            modes: self.modes.clone(),
            sources: self.sources.clone(),
            results: self.results.clone(),
            strings: self.strings.clone(),
            search_table: self.live_search_table(),
            replay_table: self.live_replay_table(),
        };
        archive::write_to(path, &sections)
    }

    fn live_search_table(&self) -> Vec<u8> {
        let sz = self.layout.search_row_sz as usize;
        self.search_table[..self.replay_count as usize * sz].to_vec()
    }

    fn live_replay_table(&self) -> Vec<u8> {
        let sz = self.layout.replay_row_sz as usize;
        self.replay_table[..self.replay_count as usize * sz].to_vec()
    }

    /// Loads an archive, rejecting one whose declared card count doesn't
    /// match the layout this database was constructed for.
    pub fn load(game_name: &str, card_count: u32, path: &Path) -> Result<Self> {
        let sections = archive::read_from(path)?;
        if sections.header.card_count != card_count {
            return Err(Error::Validation(format!(
                "archive card_count {} does not match requested {}",
                sections.header.card_count, card_count
            )));
        }

        let layout = RowLayout::new(card_count);
        let replay_count = sections.header.replay_count;

        let mut id_map = HashMap::with_capacity(replay_count as usize);
        let rr_sz = layout.replay_row_sz as usize;
        for idx in 0..replay_count {
            let at = idx as usize * rr_sz;
            let row = &sections.replay_table[at..at + rr_sz];
            id_map.insert(replay_row::id(row), idx);
        }

        Ok(Self {
            game_name: game_name.to_string(),
            layout,
            modes: sections.modes,
            sources: sections.sources,
            results: sections.results,
            strings: sections.strings,
            search_table: sections.search_table,
            replay_table: sections.replay_table,
            replay_count,
            replay_capacity: replay_count,
            id_map,
        })
    }
}

fn best_orientation(a: MatchResult, b: MatchResult) -> MatchResult {
    if b.sort > a.sort {
        b
    } else {
        a
    }
}

fn mask_for(dict: &NamedBitField, names: &[String]) -> u32 {
    if names.is_empty() {
        return !0;
    }
    let mut mask = 0u32;
    for name in names {
        if let Some(idx) = dict.index_of(name) {
            mask |= 1 << idx;
        }
    }
    mask
}

fn split_two(buf: &mut [u8], at: usize, at2: usize, len: usize) -> (&mut [u8], &[u8]) {
    if at < at2 {
        let (left, right) = buf.split_at_mut(at2);
        (&mut left[at..at + len], &right[..len])
    } else {
        let (left, right) = buf.split_at_mut(at);
        (&mut right[..len], &left[at2..at2 + len])
    }
}
