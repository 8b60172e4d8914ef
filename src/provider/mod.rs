#![doc = r#"
Where binary assets come from: embedded, URL, or relative path.

A [`FileProvider`] is the format's provenance record for a blob of bytes
(music, a preview segment, a cover image, an embedded sub-chart). Its
header is small and fixed-size per variant; embedded payload bytes are
*not* part of the header. They are appended to the document tail through
the deferred-write protocol (see [`EmbedRequest`]), which is what lets a
whole document land in one pre-sized buffer in a single linear pass.

# Wire form

```text
i8  discriminant        magnitude = variant, sign set = gzip-compressed
    1 → embedded        u64 offset, u64 length   (absolute, patched late)
    2 → url             UTF-8 bytes, nul terminator
    3 → path            UTF-8 bytes, nul terminator
```

The discriminant multiplexes two properties onto one byte: its magnitude
selects the variant and its sign flags gzip compression, an orthogonal
property of any variant.
"#]

mod embed;
pub use embed::*;

mod resolve;
pub use resolve::*;

use std::borrow::Cow;
use std::io::{Read, Write};

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    document::Encode,
    reader::{DecodeError, DecodeErrorKind, DecodeResult, Reader},
    writer::{EncodeResult, Writer},
};

/// The provider variants, as the magnitude of the discriminant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum ProviderKind {
    /// Payload bytes live inside the document buffer.
    Embedded = 1,
    /// Payload bytes live behind a URL.
    Url = 2,
    /// Payload bytes live at a path relative to the document's base
    /// directory.
    Path = 3,
}

/// The location a provider points at.
///
/// Embedded payloads decoded from a buffer are borrowed views of that
/// buffer; they only become owned when built programmatically or
/// compressed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProviderSource<'a> {
    /// The payload itself, as stored (compressed if the provider is).
    Embedded(Cow<'a, [u8]>),
    /// A URL, fetched through the caller's [`FetchBytes`].
    Url(String),
    /// A relative path, resolved against a [`ResolveContext`] base.
    Path(String),
}

#[doc = r#"
A provenance record for one binary asset.

# Example
```rust
# use cwpix::prelude::*;
let provider = FileProvider::embedded(vec![1, 2, 3, 4]);
let buffer = encode_to_vec(&provider).unwrap();

let mut reader = Reader::new(&buffer);
let decoded = FileProvider::read(&mut reader).unwrap();
assert_eq!(decoded.bytes().unwrap().unwrap().as_ref(), &[1, 2, 3, 4]);
```
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileProvider<'a> {
    source: ProviderSource<'a>,
    compressed: bool,
}

impl<'a> FileProvider<'a> {
    /// Embed `bytes` as-is.
    pub fn embedded(bytes: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            source: ProviderSource::Embedded(bytes.into()),
            compressed: false,
        }
    }

    /// Embed `bytes`, gzip-compressing them now.
    ///
    /// Compression happens at set-time; the stored payload is the
    /// compressed stream and [`FileProvider::bytes`] undoes it
    /// transparently.
    pub fn embedded_compressed(bytes: &[u8]) -> Result<Self, ProviderError> {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(bytes).map_err(ProviderError::Gzip)?;
        let compressed = encoder.finish().map_err(ProviderError::Gzip)?;
        log::trace!(
            "embedded payload compressed {} -> {} bytes",
            bytes.len(),
            compressed.len()
        );
        Ok(Self {
            source: ProviderSource::Embedded(Cow::Owned(compressed)),
            compressed: true,
        })
    }

    /// Reference a URL.
    pub fn from_url(url: impl Into<String>, compressed: bool) -> Self {
        Self {
            source: ProviderSource::Url(url.into()),
            compressed,
        }
    }

    /// Reference a path relative to the document's base directory.
    pub fn from_path(path: impl Into<String>, compressed: bool) -> Self {
        Self {
            source: ProviderSource::Path(path.into()),
            compressed,
        }
    }

    /// Which variant this provider is.
    pub const fn kind(&self) -> ProviderKind {
        match &self.source {
            ProviderSource::Embedded(_) => ProviderKind::Embedded,
            ProviderSource::Url(_) => ProviderKind::Url,
            ProviderSource::Path(_) => ProviderKind::Path,
        }
    }

    /// True if the stored payload is a gzip stream.
    pub const fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// The location record.
    pub const fn source(&self) -> &ProviderSource<'a> {
        &self.source
    }

    /// The stored bytes of an embedded payload, before any
    /// decompression. `None` for URL and path providers.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match &self.source {
            ProviderSource::Embedded(bytes) => Some(bytes.as_ref()),
            _ => None,
        }
    }

    /// The logical bytes of an embedded payload, gunzipped when the
    /// provider is compressed. `None` for URL and path providers, which
    /// go through [`FileProvider::fetch`].
    pub fn bytes(&self) -> Option<Result<Cow<'_, [u8]>, ProviderError>> {
        let ProviderSource::Embedded(bytes) = &self.source else {
            return None;
        };
        Some(self.decompressed(Cow::Borrowed(bytes.as_ref())))
    }

    /// Materialise the payload, wherever it lives.
    ///
    /// Embedded payloads never touch the context; paths need its base
    /// directory and URLs need its fetcher. Decompression applies after
    /// the bytes are in hand.
    pub fn fetch(&self, ctx: &ResolveContext<'_>) -> Result<Cow<'_, [u8]>, ProviderError> {
        match &self.source {
            ProviderSource::Embedded(bytes) => self.decompressed(Cow::Borrowed(bytes.as_ref())),
            ProviderSource::Url(url) => self.decompressed(Cow::Owned(ctx.fetch_url(url)?)),
            ProviderSource::Path(path) => self.decompressed(Cow::Owned(ctx.read_path(path)?)),
        }
    }

    fn decompressed<'b>(&self, raw: Cow<'b, [u8]>) -> Result<Cow<'b, [u8]>, ProviderError> {
        if !self.compressed {
            return Ok(raw);
        }
        let mut decoder = flate2::read::GzDecoder::new(raw.as_ref());
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(ProviderError::Gzip)?;
        Ok(Cow::Owned(out))
    }

    /// Read a provider header.
    ///
    /// Embedded descriptors resolve to borrowed views of the outer
    /// buffer; an out-of-range descriptor is a fatal format error.
    pub fn read(reader: &mut Reader<'a>) -> DecodeResult<Self> {
        let start = reader.position();
        let discriminant = reader.read_i8()?;
        let compressed = discriminant < 0;
        let kind = i8::try_from(discriminant.unsigned_abs())
            .ok()
            .and_then(|magnitude| ProviderKind::try_from(magnitude).ok())
            .ok_or_else(|| {
                DecodeError::new(start, DecodeErrorKind::UnknownProvider(discriminant))
            })?;
        let source = match kind {
            ProviderKind::Embedded => {
                let offset = reader.read_u64()?;
                let length = reader.read_u64()?;
                ProviderSource::Embedded(Cow::Borrowed(reader.view(offset, length)?))
            }
            ProviderKind::Url => ProviderSource::Url(reader.read_str()?.to_owned()),
            ProviderKind::Path => ProviderSource::Path(reader.read_str()?.to_owned()),
        };
        Ok(Self { source, compressed })
    }
}

impl Encode for FileProvider<'_> {
    fn encoded_len(&self) -> usize {
        1 + match &self.source {
            ProviderSource::Embedded(_) => 16,
            ProviderSource::Url(s) | ProviderSource::Path(s) => s.len() + 1,
        }
    }

    fn embedded_len(&self) -> usize {
        match &self.source {
            ProviderSource::Embedded(bytes) => bytes.len(),
            _ => 0,
        }
    }

    fn encode<'s>(
        &'s self,
        writer: &mut Writer<'_>,
        embeds: &mut Vec<EmbedRequest<'s>>,
    ) -> EncodeResult<()> {
        let magnitude = i8::from(self.kind());
        writer.write_i8(if self.compressed { -magnitude } else { magnitude })?;
        match &self.source {
            ProviderSource::Embedded(bytes) => {
                let patch_offset = writer.position();
                writer.write_u64(0)?;
                writer.write_u64(0)?;
                embeds.push(EmbedRequest::new(bytes, patch_offset));
            }
            ProviderSource::Url(s) | ProviderSource::Path(s) => writer.write_str(s)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct StubFetcher;

    impl FetchBytes for StubFetcher {
        fn fetch_bytes(
            &self,
            locator: &str,
        ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
            match locator {
                "cdn://bgm.ogg" => Ok(vec![9, 9, 9]),
                _ => Err("unknown host".into()),
            }
        }
    }

    #[test]
    fn gzip_set_then_get() {
        let payload = b"weirdly compressible aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        let provider = FileProvider::embedded_compressed(payload).unwrap();
        assert!(provider.is_compressed());
        // stored form is the gzip stream, not the payload
        assert_ne!(provider.raw_bytes().unwrap(), payload.as_slice());
        assert_eq!(
            provider.bytes().unwrap().unwrap().as_ref(),
            payload.as_slice()
        );
    }

    #[test]
    fn corrupt_gzip_surfaces() {
        let provider = FileProvider {
            source: ProviderSource::Embedded(Cow::Borrowed(&[0xDE, 0xAD])),
            compressed: true,
        };
        let err = provider.bytes().unwrap().unwrap_err();
        assert!(matches!(err, ProviderError::Gzip(_)));
    }

    #[test]
    fn url_fetch_goes_through_context() {
        let provider = FileProvider::from_url("cdn://bgm.ogg", false);
        let fetcher = StubFetcher;
        let ctx = ResolveContext::new().with_fetcher(&fetcher);
        assert_eq!(provider.fetch(&ctx).unwrap().as_ref(), &[9, 9, 9]);
    }

    #[test]
    fn url_without_fetcher_is_fatal() {
        let provider = FileProvider::from_url("cdn://bgm.ogg", false);
        let err = provider.fetch(&ResolveContext::new()).unwrap_err();
        assert!(matches!(err, ProviderError::MissingFetcher(_)));
    }

    #[test]
    fn path_without_base_is_fatal() {
        let provider = FileProvider::from_path("bgm.ogg", false);
        let err = provider.fetch(&ResolveContext::new()).unwrap_err();
        assert!(matches!(err, ProviderError::MissingBase(_)));
    }

    #[test]
    fn fetch_failure_carries_locator() {
        let provider = FileProvider::from_url("cdn://missing.png", false);
        let fetcher = StubFetcher;
        let ctx = ResolveContext::new().with_fetcher(&fetcher);
        match provider.fetch(&ctx).unwrap_err() {
            ProviderError::Fetch { locator, .. } => assert_eq!(locator, "cdn://missing.png"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
