#![doc = r#"
Reads little-endian chart data out of a borrowed byte buffer.

The [`Reader`] owns a cursor over the *whole* document buffer. Most reads
advance the cursor; [`Reader::view`] is the exception, resolving an
absolute `offset/length` pair from an embedded-file descriptor into a
sub-slice of the outer buffer without copying.

Every failed read reports the byte offset it failed at (see
[`DecodeError`]).
"#]

mod error;
pub use error::*;

use crate::beat::Beat;
use half::f16;

/// A cursor over a borrowed chart buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Wrap a byte buffer.
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// The current cursor offset.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Bytes left in front of the cursor.
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Advance past `len` bytes and return them.
    pub fn read_slice(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| DecodeError::oob(self.position))?;
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let slice = self.read_slice(N)?;
        let mut out = [0; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Read one unsigned byte.
    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read one signed byte.
    pub fn read_i8(&mut self) -> DecodeResult<i8> {
        Ok(self.read_array::<1>()?[0] as i8)
    }

    /// Read a little-endian `u16`.
    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u64`.
    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian IEEE-754 double.
    pub fn read_f64(&mut self) -> DecodeResult<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian IEEE-754 half-precision float.
    ///
    /// Returned as [`f16`] rather than widened, so the caller can inspect
    /// the sign bit (`-0.0` and `+0.0` are distinct on this wire).
    pub fn read_f16(&mut self) -> DecodeResult<f16> {
        Ok(f16::from_le_bytes(self.read_array()?))
    }

    /// Read the rational wire form: `u32 numerator, u32 denominator`.
    ///
    /// A zero denominator is a format error, reported at the start of the
    /// field.
    pub fn read_beat(&mut self) -> DecodeResult<Beat> {
        let start = self.position;
        let numerator = self.read_u32()?;
        let denominator = self.read_u32()?;
        if denominator == 0 {
            return Err(DecodeError::new(start, DecodeErrorKind::ZeroDenominator));
        }
        Ok(Beat::new(u64::from(numerator), u64::from(denominator)))
    }

    /// Read a nul-terminated UTF-8 string (no length prefix).
    ///
    /// The cursor ends up past the terminator.
    pub fn read_str(&mut self) -> DecodeResult<&'a str> {
        let start = self.position;
        let rest = &self.data[self.position..];
        let len = rest.iter().position(|&b| b == 0).ok_or_else(|| {
            DecodeError::new(start, DecodeErrorKind::MissingNulTerminator)
        })?;
        let s = core::str::from_utf8(&rest[..len])
            .map_err(|_| DecodeError::new(start, DecodeErrorKind::InvalidUtf8))?;
        self.position += len + 1;
        Ok(s)
    }

    /// Resolve an absolute embedded-file descriptor against the outer
    /// buffer.
    ///
    /// Does not move the cursor; returns a view, not a copy. An
    /// out-of-range pair is the unrecoverable
    /// [`DecodeErrorKind::EmbedOutOfRange`].
    pub fn view(&self, offset: u64, length: u64) -> DecodeResult<&'a [u8]> {
        let start = usize::try_from(offset).ok();
        let len = usize::try_from(length).ok();
        let range = match (start, len) {
            (Some(start), Some(len)) => start.checked_add(len).map(|end| (start, end)),
            _ => None,
        };
        match range {
            Some((start, end)) if end <= self.data.len() => Ok(&self.data[start..end]),
            _ => Err(DecodeError::new(
                self.position,
                DecodeErrorKind::EmbedOutOfRange {
                    offset,
                    length,
                    available: self.data.len(),
                },
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primitives_little_endian() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_u16().unwrap(), 0x0302);
        assert_eq!(reader.read_u32().unwrap(), 0x07060504);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn truncated_read_reports_position() {
        let bytes = [0xFF, 0xFF];
        let mut reader = Reader::new(&bytes);
        reader.read_u8().unwrap();
        let err = reader.read_u32().unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn beat_wire_form() {
        let bytes = [3, 0, 0, 0, 12, 0, 0, 0];
        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_beat().unwrap(), Beat::new(1, 4));
    }

    #[test]
    fn zero_denominator_rejected() {
        let bytes = [1, 0, 0, 0, 0, 0, 0, 0];
        let mut reader = Reader::new(&bytes);
        let err = reader.read_beat().unwrap_err();
        assert_eq!(*err.kind(), DecodeErrorKind::ZeroDenominator);
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn nul_terminated_str() {
        let bytes = b"cover.png\0rest";
        let mut reader = Reader::new(bytes);
        assert_eq!(reader.read_str().unwrap(), "cover.png");
        assert_eq!(reader.position(), 10);
    }

    #[test]
    fn str_without_terminator() {
        let mut reader = Reader::new(b"oops");
        let err = reader.read_str().unwrap_err();
        assert_eq!(*err.kind(), DecodeErrorKind::MissingNulTerminator);
    }

    #[test]
    fn view_bounds() {
        let bytes = [0u8; 8];
        let reader = Reader::new(&bytes);
        assert_eq!(reader.view(2, 4).unwrap().len(), 4);
        assert!(reader.view(6, 4).is_err());
        assert!(reader.view(u64::MAX, 2).is_err());
    }
}
