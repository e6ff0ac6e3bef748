//! Whole-file binary archive for a `ReplayDb` (spec §4.7).
//!
//! Layout, little-endian throughout:
//!
//! ```text
//! magic(4) ‖ version(4) ‖ card_count(4) ‖ replay_count(4) ‖ replay_capacity(4)
//!   ‖ modes_off(4) ‖ sources_off(4) ‖ results_off(4)
//!   ‖ strings_off(4) ‖ search_off(4) ‖ replay_off(4)
//!   ‖ <modes dict> ‖ <sources dict> ‖ <results dict> ‖ <string pool>
//!   ‖ <search rows> ‖ <replay rows> ‖ crc32(4)
//! ```
//!
//! The reference overwrites the live file in place; a crash mid-write
//! leaves a truncated, unrecoverable archive. This writes to a sibling
//! temp file and renames over the target, and appends a CRC32 trailer
//! covering everything before it so a truncated or bit-flipped file is
//! detected on load rather than silently misread (spec §4.7 upgrade,
//! grounded on the teacher's `io::ark` write-then-rename pattern).

use std::fs;
use std::io::Write;
use std::path::Path;

use crc32fast::Hasher;

use crate::byteio::read_u32;
use crate::dict::NamedBitField;
use crate::error::{Error, Result};
use crate::row::{MAX_MODES, MAX_RESULTS, MAX_SOURCES};
use crate::strtab::StringTable;

pub const MAGIC: [u8; 4] = *b"RRDB";
pub const VERSION: u32 = 3;
/// Declared but never written by this build; archives at this version are
/// rejected rather than silently misinterpreted (spec §9, matches the
/// reference's own abandoned fixed-column layout).
pub const VERSION_LEGACY_FIXED_COLS: u32 = 1;

const HEADER_FIELDS: usize = 11;
const HEADER_SIZE: usize = HEADER_FIELDS * 4;

pub struct Header {
    pub card_count: u32,
    pub replay_count: u32,
    pub replay_capacity: u32,
}

pub struct Sections {
    pub header: Header,
    pub modes: NamedBitField,
    pub sources: NamedBitField,
    pub results: NamedBitField,
    pub strings: StringTable,
    pub search_table: Vec<u8>,
    pub replay_table: Vec<u8>,
}

pub fn write_to(path: &Path, sections: &Sections) -> Result<()> {
    let modes = sections.modes.serialize();
    let sources = sections.sources.serialize();
    let results = sections.results.serialize();
    let strings = sections.strings.serialize();

    let modes_off = HEADER_SIZE as u32;
    let sources_off = modes_off + modes.len() as u32;
    let results_off = sources_off + sources.len() as u32;
    let strings_off = results_off + results.len() as u32;
    let search_off = strings_off + strings.len() as u32;
    let replay_off = search_off + sections.search_table.len() as u32;

    let mut body = Vec::with_capacity(replay_off as usize + sections.replay_table.len());
    body.extend_from_slice(&MAGIC);
    body.extend_from_slice(&VERSION.to_le_bytes());
    body.extend_from_slice(&sections.header.card_count.to_le_bytes());
    body.extend_from_slice(&sections.header.replay_count.to_le_bytes());
    body.extend_from_slice(&sections.header.replay_capacity.to_le_bytes());
    body.extend_from_slice(&modes_off.to_le_bytes());
    body.extend_from_slice(&sources_off.to_le_bytes());
    body.extend_from_slice(&results_off.to_le_bytes());
    body.extend_from_slice(&strings_off.to_le_bytes());
    body.extend_from_slice(&search_off.to_le_bytes());
    body.extend_from_slice(&replay_off.to_le_bytes());
    body.extend_from_slice(&modes);
    body.extend_from_slice(&sources);
    body.extend_from_slice(&results);
    body.extend_from_slice(&strings);
    body.extend_from_slice(&sections.search_table);
    body.extend_from_slice(&sections.replay_table);

    let mut hasher = Hasher::new();
    hasher.update(&body);
    let crc = hasher.finalize();
    body.extend_from_slice(&crc.to_le_bytes());

    let tmp_path = sibling_temp_path(path);
    {
        let mut f = fs::File::create(&tmp_path)?;
        f.write_all(&body)?;
        f.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn sibling_temp_path(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "archive".into());
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn read_from(path: &Path) -> Result<Sections> {
    let raw = fs::read(path)?;
    parse(&raw)
}

/// Parses an in-memory archive image. Split out from `read_from` so the
/// CLI's strict `inspect` path and `ReplayDb::new`'s silent load share one
/// validator rather than drifting apart.
pub fn parse(raw: &[u8]) -> Result<Sections> {
    if raw.len() < HEADER_SIZE + 4 {
        return Err(Error::Archive("archive too small".into()));
    }

    let (body, trailer) = raw.split_at(raw.len() - 4);
    let expected_crc = u32::from_le_bytes(trailer.try_into().unwrap());
    let mut hasher = Hasher::new();
    hasher.update(body);
    if hasher.finalize() != expected_crc {
        return Err(Error::Archive("crc32 mismatch".into()));
    }

    let mut cursor = 0usize;
    let mut magic = [0u8; 4];
    magic.copy_from_slice(&body[0..4]);
    cursor += 4;
    if magic != MAGIC {
        return Err(Error::Archive("bad magic".into()));
    }

    let version = read_u32(body, &mut cursor)?;
    if version == VERSION_LEGACY_FIXED_COLS {
        return Err(Error::Archive(
            "archive uses the legacy fixed-column layout, which this build does not read".into(),
        ));
    }
    if version != VERSION {
        return Err(Error::Archive(format!(
            "unsupported archive version {version}, expected {VERSION}"
        )));
    }

    let card_count = read_u32(body, &mut cursor)?;
    let replay_count = read_u32(body, &mut cursor)?;
    let replay_capacity = read_u32(body, &mut cursor)?;
    let modes_off = read_u32(body, &mut cursor)? as usize;
    let sources_off = read_u32(body, &mut cursor)? as usize;
    let results_off = read_u32(body, &mut cursor)? as usize;
    let strings_off = read_u32(body, &mut cursor)? as usize;
    let search_off = read_u32(body, &mut cursor)? as usize;
    let replay_off = read_u32(body, &mut cursor)? as usize;

    if !(modes_off <= sources_off
        && sources_off <= results_off
        && results_off <= strings_off
        && strings_off <= search_off
        && search_off <= replay_off
        && replay_off <= body.len())
    {
        return Err(Error::Archive("section offsets out of order".into()));
    }

    let modes = NamedBitField::deserialize(&body[modes_off..sources_off], MAX_MODES)?;
    let sources = NamedBitField::deserialize(&body[sources_off..results_off], MAX_SOURCES)?;
    let results = NamedBitField::deserialize(&body[results_off..strings_off], MAX_RESULTS)?;
    let strings = StringTable::deserialize(&body[strings_off..search_off])?;
    let search_table = body[search_off..replay_off].to_vec();
    let replay_table = body[replay_off..].to_vec();

    Ok(Sections {
        header: Header {
            card_count,
            replay_count,
            replay_capacity,
        },
        modes,
        sources,
        results,
        strings,
        search_table,
        replay_table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::RowLayout;

    fn sample_sections(card_count: u32) -> Sections {
        let layout = RowLayout::new(card_count);
        Sections {
            header: Header {
                card_count,
                replay_count: 0,
                replay_capacity: 0,
            },
            modes: NamedBitField::new(MAX_MODES),
            sources: NamedBitField::new(MAX_SOURCES),
            results: NamedBitField::new(MAX_RESULTS),
            strings: StringTable::new(),
            search_table: vec![0u8; layout.search_row_sz as usize * 0],
            replay_table: Vec::new(),
        }
    }

    #[test]
    fn round_trips_through_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.rrdb");
        let sections = sample_sections(32);
        write_to(&path, &sections).unwrap();

        let back = read_from(&path).unwrap();
        assert_eq!(back.header.card_count, 32);
    }

    #[test]
    fn rejects_corrupted_trailer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.rrdb");
        write_to(&path, &sample_sections(16)).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        fs::write(&path, &bytes).unwrap();

        assert!(read_from(&path).is_err());
    }

    #[test]
    fn rejects_legacy_version() {
        let mut body = Vec::new();
        body.extend_from_slice(&MAGIC);
        body.extend_from_slice(&VERSION_LEGACY_FIXED_COLS.to_le_bytes());
        body.resize(HEADER_SIZE, 0);
        let mut hasher = Hasher::new();
        hasher.update(&body);
        body.extend_from_slice(&hasher.finalize().to_le_bytes());

        assert!(parse(&body).is_err());
    }
}
