use crate::writer::{EncodeResult, Writer};

#[doc = r#"
A deferred instruction to append payload bytes and patch the header slot
that describes them.

Encoding a provider with an embedded payload does not write the payload.
It reserves a 16-byte `u64 offset, u64 length` slot at a known header
position and hands back an `EmbedRequest` recording that position and the
source bytes. Once *every* header of the document tree is laid out, the
collected requests are resolved in order against the tail of the buffer
(see [`crate::document::encode_to_vec`]): headers first, payloads second,
one linear fill, no relocation.
"#]
#[derive(Debug, Clone)]
pub struct EmbedRequest<'a> {
    bytes: &'a [u8],
    patch_offset: usize,
}

impl<'a> EmbedRequest<'a> {
    /// Record a pending payload write.
    ///
    /// `patch_offset` is the absolute position of the reserved 16-byte
    /// descriptor slot inside the header region.
    pub const fn new(bytes: &'a [u8], patch_offset: usize) -> Self {
        Self {
            bytes,
            patch_offset,
        }
    }

    /// The payload bytes waiting to be appended.
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Where the reserved descriptor slot sits.
    pub const fn patch_offset(&self) -> usize {
        self.patch_offset
    }

    /// Append the payload at the writer's cursor (the current tail) and
    /// patch the reserved slot with the payload's absolute offset and
    /// length.
    ///
    /// Must only run after the whole document tree's headers are written;
    /// the cursor position *is* the tail offset at that point.
    pub fn resolve(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        let tail = writer.position();
        writer.patch_u64(self.patch_offset, tail as u64)?;
        writer.patch_u64(self.patch_offset + 8, self.bytes.len() as u64)?;
        writer.write_bytes(self.bytes)
    }
}
