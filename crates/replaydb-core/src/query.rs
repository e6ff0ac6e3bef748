//! Public query request/response types (spec §5).

/// `Filter::new()`, not `Filter::default()` — the all-false bool default
/// would silently exclude both ranked and unranked rows, and both sides.
#[derive(Clone, Debug)]
pub struct Filter {
    pub min_date: u64,
    pub ranked: bool,
    pub unranked: bool,
    pub only_wins: bool,
    /// Search-only (spec §6.1): keep the normal-orientation match for a
    /// row. `NewGames` never consults this.
    pub from_player: bool,
    /// Search-only (spec §6.1): keep the flipped-orientation match for a
    /// row. `NewGames` never consults this.
    pub from_opponent: bool,
    pub sources: Vec<String>,
    pub modes: Vec<String>,
}

impl Filter {
    /// `ranked`/`unranked` and `from_player`/`from_opponent` all default
    /// true: an unfiltered query should exclude nothing on either axis.
    pub fn new() -> Self {
        Self {
            min_date: 0,
            ranked: true,
            unranked: true,
            only_wins: false,
            from_player: true,
            from_opponent: true,
            sources: Vec::new(),
            modes: Vec::new(),
        }
    }

    /// A filter with `ranked = unranked = false`, or with
    /// `from_player = from_opponent = false`, can never match a row;
    /// callers should treat this as "no results" rather than scan.
    pub fn is_contradictory(&self) -> bool {
        (!self.ranked && !self.unranked) || (!self.from_player && !self.from_opponent)
    }
}

#[derive(Clone, Debug)]
pub struct ReplayRecord {
    pub id: String,
    pub date: u64,
    pub ranked: bool,
    pub mode: String,
    pub source: String,
    pub result: String,
    pub result_desc: String,
    pub title: String,
    pub link: String,
    pub deck0: String,
    pub deck1: String,
    pub region: String,
    pub author_link: String,
    pub author_name: String,
    /// Whether side0/side1 were swapped to align with the query's
    /// orientation (spec §4.3/§4.4).
    pub flipped: bool,
    pub match0: u32,
    pub match1: u32,
}

#[derive(Clone, Debug)]
pub struct QueryResult {
    pub replays: Vec<ReplayRecord>,
    /// Total rows that passed the filter, independent of `offset`/limit —
    /// lets a caller page without re-scanning for a count.
    pub valid_count: u32,
}
