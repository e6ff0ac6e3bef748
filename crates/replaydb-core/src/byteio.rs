// Little-endian read/write helpers shared by the dictionary, row, and
// archive codecs. The corpus reads and writes its binary formats by hand
// through cursor offsets rather than struct-over-bytes aliasing; this
// mirrors `k8dnz-core::recipe::format`'s `read_u32`/`read_u64` helpers.

use crate::error::{Error, Result};

pub fn align8(n: usize) -> usize {
    (n + 7) & !7
}

fn need(buf: &[u8], at: usize, n: usize) -> Result<()> {
    if buf.len() < at + n {
        return Err(Error::Archive("unexpected eof".into()));
    }
    Ok(())
}

pub fn read_u32(buf: &[u8], at: &mut usize) -> Result<u32> {
    need(buf, *at, 4)?;
    let v = u32::from_le_bytes(buf[*at..*at + 4].try_into().unwrap());
    *at += 4;
    Ok(v)
}

pub fn read_u64(buf: &[u8], at: &mut usize) -> Result<u64> {
    need(buf, *at, 8)?;
    let v = u64::from_le_bytes(buf[*at..*at + 8].try_into().unwrap());
    *at += 8;
    Ok(v)
}
