//! Insertion-ordered string interner that packs to a small integer bitfield
//! index. One instance backs each of the modes/sources/results dictionaries.

use std::collections::HashMap;

use crate::byteio::{align8, read_u32};
use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub struct NamedBitField {
    names: Vec<String>,
    name_map: HashMap<String, u32>,
    max_len: u32,
}

impl NamedBitField {
    pub fn new(max_len: u32) -> Self {
        Self {
            names: Vec::new(),
            name_map: HashMap::new(),
            max_len,
        }
    }

    /// Returns the existing index for `name`, or interns it and returns the
    /// new index. Fails once the domain would grow past `max_len` entries —
    /// the reference silently truncates past its bit width; this rejects
    /// instead (spec REDESIGN FLAG).
    pub fn intern(&mut self, name: &str) -> Result<u32> {
        if let Some(&idx) = self.name_map.get(name) {
            return Ok(idx);
        }

        let idx = self.names.len() as u32;
        if idx >= self.max_len {
            return Err(Error::Validation(format!(
                "dictionary capacity exceeded: {name:?} would be entry {idx} but limit is {}",
                self.max_len
            )));
        }

        self.names.push(name.to_string());
        self.name_map.insert(name.to_string(), idx);
        Ok(idx)
    }

    pub fn name(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    /// Read-only lookup, unlike `search_bit_field` this never interns an
    /// unknown name — a name nothing has ever used can't match any row.
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.name_map.get(name).copied()
    }

    /// Builds a 32-bit mask whose bit `k` is set iff `names` contains the
    /// dictionary's k-th name, interning any name not already known. An
    /// empty slice yields a mask that matches nothing.
    pub fn search_bit_field(&mut self, names: &[String]) -> Result<u32> {
        let mut mask = 0u32;
        for name in names {
            let idx = self.intern(name)?;
            mask |= 1 << idx;
        }
        Ok(mask)
    }

    pub fn matches(&self, bit_field: u32, value: u32) -> bool {
        (bit_field & (1 << value)) != 0
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 32-bit count, then `count` (offset, length) pairs, then the names
    /// NUL-terminated and concatenated, padded to 8-byte alignment.
    pub fn serialize(&self) -> Vec<u8> {
        let header_size = 4 + 8 * self.names.len();
        let mut lengths = Vec::with_capacity(self.names.len());
        let mut pos = header_size as u32;
        for name in &self.names {
            let len = name.len() as u32 + 1;
            lengths.push((pos, len));
            pos += len;
        }

        let mut out = Vec::with_capacity(align8(pos as usize));
        out.extend_from_slice(&(self.names.len() as u32).to_le_bytes());
        for (offset, len) in &lengths {
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&len.to_le_bytes());
        }
        for name in &self.names {
            out.extend_from_slice(name.as_bytes());
            out.push(0);
        }
        out.resize(align8(out.len()), 0);
        out
    }

    pub fn deserialize(buf: &[u8], max_len: u32) -> Result<Self> {
        let mut cursor = 0usize;
        let count = read_u32(buf, &mut cursor)? as usize;

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = read_u32(buf, &mut cursor)?;
            let len = read_u32(buf, &mut cursor)?;
            entries.push((offset as usize, len as usize));
        }

        let mut names = Vec::with_capacity(count);
        let mut name_map = HashMap::with_capacity(count);
        for (offset, len) in entries {
            if buf.len() < offset + len || len == 0 {
                return Err(Error::Archive("dictionary name table out of range".into()));
            }
            let raw = &buf[offset..offset + len - 1];
            let name = std::str::from_utf8(raw)
                .map_err(|_| Error::Archive("dictionary name is not valid utf-8".into()))?
                .to_string();
            name_map.insert(name.clone(), names.len() as u32);
            names.push(name);
        }

        Ok(Self {
            names,
            name_map,
            max_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_distinct_names_in_order() {
        let mut d = NamedBitField::new(128);
        assert_eq!(d.intern("std").unwrap(), 0);
        assert_eq!(d.intern("ranked").unwrap(), 1);
        assert_eq!(d.intern("std").unwrap(), 0);
        assert_eq!(d.name(1), Some("ranked"));
    }

    #[test]
    fn rejects_overflow_past_max_len() {
        let mut d = NamedBitField::new(2);
        d.intern("a").unwrap();
        d.intern("b").unwrap();
        assert!(d.intern("c").is_err());
    }

    #[test]
    fn empty_search_bit_field_matches_nothing() {
        let mut d = NamedBitField::new(16);
        let idx = d.intern("win").unwrap();
        let mask = d.search_bit_field(&[]).unwrap();
        assert!(!d.matches(mask, idx));
    }

    #[test]
    fn search_bit_field_interns_unknown_names() {
        let mut d = NamedBitField::new(16);
        let mask = d
            .search_bit_field(&["win".to_string(), "loss".to_string()])
            .unwrap();
        assert!(d.matches(mask, 0));
        assert!(d.matches(mask, 1));
        assert!(!d.matches(mask, 2));
    }

    #[test]
    fn round_trips_through_serialize() {
        let mut d = NamedBitField::new(128);
        d.intern("std").unwrap();
        d.intern("draft").unwrap();
        d.intern("arena").unwrap();

        let bytes = d.serialize();
        assert_eq!(bytes.len() % 8, 0);

        let back = NamedBitField::deserialize(&bytes, 128).unwrap();
        assert_eq!(back.name(0), Some("std"));
        assert_eq!(back.name(1), Some("draft"));
        assert_eq!(back.name(2), Some("arena"));
        assert_eq!(back.len(), 3);
    }
}
