#![doc = r#"
Writes little-endian chart data into a caller-owned, pre-sized buffer.

Encoding is a single linear pass: headers first, embedded payloads
appended at the tail afterwards (see [`crate::document`]). The only
non-linear operation is [`Writer::patch_u64`], which fills a previously
reserved header slot once the payload it describes has landed.
"#]

mod error;
pub use error::*;

use crate::beat::Beat;
use half::f16;

/// A cursor over an exclusively borrowed output buffer.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut [u8],
    position: usize,
}

impl<'a> Writer<'a> {
    /// Wrap a pre-sized output buffer.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// The current cursor offset.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Bytes left behind the cursor.
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }

    /// Copy `bytes` at the cursor and advance.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> EncodeResult<()> {
        let remaining = self.remaining();
        if bytes.len() > remaining {
            return Err(EncodeError::new(
                self.position,
                EncodeErrorKind::Overflow {
                    requested: bytes.len(),
                    remaining,
                },
            ));
        }
        self.buf[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
        Ok(())
    }

    /// Write one unsigned byte.
    pub fn write_u8(&mut self, value: u8) -> EncodeResult<()> {
        self.write_bytes(&[value])
    }

    /// Write one signed byte.
    pub fn write_i8(&mut self, value: i8) -> EncodeResult<()> {
        self.write_bytes(&[value as u8])
    }

    /// Write a little-endian `u16`.
    pub fn write_u16(&mut self, value: u16) -> EncodeResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) -> EncodeResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a little-endian `u64`.
    pub fn write_u64(&mut self, value: u64) -> EncodeResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a little-endian IEEE-754 double.
    pub fn write_f64(&mut self, value: f64) -> EncodeResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a little-endian IEEE-754 half-precision float.
    ///
    /// Takes [`f16`] directly; the sign bit is meaningful on this wire, so
    /// the caller controls the conversion.
    pub fn write_f16(&mut self, value: f16) -> EncodeResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write the rational wire form: `u32 numerator, u32 denominator`.
    pub fn write_beat(&mut self, beat: Beat) -> EncodeResult<()> {
        let (numerator, denominator) = (beat.numer(), beat.denom());
        match (u32::try_from(numerator), u32::try_from(denominator)) {
            (Ok(n), Ok(d)) => {
                self.write_u32(n)?;
                self.write_u32(d)
            }
            _ => Err(EncodeError::new(
                self.position,
                EncodeErrorKind::BeatOutOfRange(numerator, denominator),
            )),
        }
    }

    /// Write a nul-terminated UTF-8 string (no length prefix).
    pub fn write_str(&mut self, s: &str) -> EncodeResult<()> {
        if s.bytes().any(|b| b == 0) {
            return Err(EncodeError::new(self.position, EncodeErrorKind::InteriorNul));
        }
        self.write_bytes(s.as_bytes())?;
        self.write_u8(0)
    }

    /// Fill a reserved `u64` header slot without moving the cursor.
    ///
    /// `offset` must lie inside the already-laid-out header region; only
    /// [`EmbedRequest::resolve`](crate::provider::EmbedRequest::resolve)
    /// calls this.
    pub fn patch_u64(&mut self, offset: usize, value: u64) -> EncodeResult<()> {
        let end = offset.checked_add(8).filter(|end| *end <= self.buf.len());
        match end {
            Some(end) => {
                self.buf[offset..end].copy_from_slice(&value.to_le_bytes());
                Ok(())
            }
            None => Err(EncodeError::new(
                offset,
                EncodeErrorKind::Overflow {
                    requested: 8,
                    remaining: self.buf.len().saturating_sub(offset),
                },
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_mirror_reads() {
        let mut buf = [0u8; 23];
        let mut writer = Writer::new(&mut buf);
        writer.write_u8(0xAB).unwrap();
        writer.write_u32(0xDEAD_BEEF).unwrap();
        writer.write_beat(Beat::new(2, 8)).unwrap();
        writer.write_str("bgm.ogg").unwrap();
        writer.write_u16(7).unwrap();
        assert_eq!(writer.remaining(), 0);

        let mut reader = Reader::new(&buf);
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
        assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read_beat().unwrap(), Beat::new(1, 4));
        assert_eq!(reader.read_str().unwrap(), "bgm.ogg");
        assert_eq!(reader.read_u16().unwrap(), 7);
    }

    #[test]
    fn overflow_reports_position() {
        let mut buf = [0u8; 2];
        let mut writer = Writer::new(&mut buf);
        writer.write_u16(1).unwrap();
        let err = writer.write_u8(2).unwrap_err();
        assert_eq!(err.position(), 2);
        assert_eq!(
            *err.kind(),
            EncodeErrorKind::Overflow {
                requested: 1,
                remaining: 0
            }
        );
    }

    #[test]
    fn interior_nul_rejected() {
        let mut buf = [0u8; 8];
        let mut writer = Writer::new(&mut buf);
        let err = writer.write_str("a\0b").unwrap_err();
        assert_eq!(*err.kind(), EncodeErrorKind::InteriorNul);
    }

    #[test]
    fn beat_out_of_range() {
        let mut buf = [0u8; 8];
        let mut writer = Writer::new(&mut buf);
        let wide = Beat::new(u64::from(u32::MAX) + 1, 1);
        let err = writer.write_beat(wide).unwrap_err();
        assert!(matches!(err.kind(), EncodeErrorKind::BeatOutOfRange(..)));
    }

    #[test]
    fn patch_after_the_fact() {
        let mut buf = [0u8; 16];
        let mut writer = Writer::new(&mut buf);
        writer.write_u64(0).unwrap();
        writer.write_u64(0).unwrap();
        writer.patch_u64(8, 0x0102_0304).unwrap();
        assert_eq!(buf[8], 0x04);
        assert_eq!(buf[11], 0x01);
    }
}
