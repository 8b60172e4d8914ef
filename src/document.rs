#![doc = r#"
The two-phase document encoder.

Encoding a document is two ordered passes over one pre-sized buffer:

1. **Header pass** — walk the document tree calling [`Encode::encode`].
   Everything with a size known up front is written directly; embedded
   payloads reserve a descriptor slot and queue an
   [`EmbedRequest`](crate::provider::EmbedRequest) instead. Nested
   providers all feed the same flat request list.
2. **Payload pass** — once every header is laid out, resolve the queued
   requests in order: each appends its payload at the tail and patches
   its reserved slot with the payload's final offset and length.

Because payloads land strictly after all headers, nothing ever has to be
relocated and the buffer can be allocated once, at
[`Encode::total_encoded_len`].
"#]

use crate::{
    provider::EmbedRequest,
    writer::{EncodeResult, Writer},
};

/// A value with a binary wire form, encodable into the two-phase
/// document layout.
pub trait Encode {
    /// Size of the header region this value writes, in bytes.
    fn encoded_len(&self) -> usize;

    /// Total size of embedded payload bytes this value will queue,
    /// recursively.
    fn embedded_len(&self) -> usize {
        0
    }

    /// Size of the complete wire form: headers plus appended payloads.
    fn total_encoded_len(&self) -> usize {
        self.encoded_len() + self.embedded_len()
    }

    /// Write this value's header bytes.
    ///
    /// Implementations must not write payload bytes for embedded data;
    /// they reserve a slot and push an `EmbedRequest` onto `embeds`.
    /// Aggregates delegate to their fields, threading `embeds` through so
    /// all pending writes end up in one list.
    fn encode<'a>(
        &'a self,
        writer: &mut Writer<'_>,
        embeds: &mut Vec<EmbedRequest<'a>>,
    ) -> EncodeResult<()>;
}

/// Encode a document root into a freshly allocated buffer.
///
/// The buffer is sized from [`Encode::total_encoded_len`] and filled in
/// the two passes described at the module level.
pub fn encode_to_vec<T: Encode + ?Sized>(root: &T) -> EncodeResult<Vec<u8>> {
    let mut buf = vec![0u8; root.total_encoded_len()];
    let mut writer = Writer::new(&mut buf);
    let mut embeds = Vec::new();
    root.encode(&mut writer, &mut embeds)?;
    log::debug!(
        "document headers: {} bytes, {} embedded payloads queued",
        writer.position(),
        embeds.len()
    );
    for embed in &embeds {
        embed.resolve(&mut writer)?;
    }
    Ok(buf)
}
