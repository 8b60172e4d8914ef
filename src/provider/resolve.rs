use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while materialising a provider's bytes.
///
/// Configuration errors (`MissingBase`, `MissingFetcher`) and resource
/// errors (`Fetch`, `Io`, `Gzip`) are both fatal for the call; the core
/// never retries on the caller's behalf.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A relative-path provider was resolved without a base directory.
    #[error("no base directory configured for relative path {0:?}")]
    MissingBase(String),
    /// A URL provider was resolved without a fetcher.
    #[error("no fetcher configured for url {0:?}")]
    MissingFetcher(String),
    /// The configured fetcher failed; carries the underlying reason.
    #[error("fetching {locator:?} failed")]
    Fetch {
        /// The URL handed to the fetcher.
        locator: String,
        /// Whatever the fetcher reported.
        #[source]
        reason: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Reading a resolved file path failed.
    #[error("reading {path:?} failed")]
    Io {
        /// The resolved path.
        path: PathBuf,
        /// The filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// A payload flagged as compressed was not a valid gzip stream.
    #[error("gzip stream is corrupt")]
    Gzip(#[source] std::io::Error),
}

/// Fetches the bytes behind a URL.
///
/// The codec core issues at most one call per asset and treats the
/// transport as opaque; implementations may block, or bridge into
/// whatever runtime the host application runs.
pub trait FetchBytes {
    /// Fetch the raw (pre-decompression) bytes behind `locator`.
    fn fetch_bytes(
        &self,
        locator: &str,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>;
}

#[doc = r#"
Where externally referenced provider data is resolved from.

Relative-path providers need a base directory and URL providers need a
[`FetchBytes`] implementation; both are explicit values handed to the
resolving call, not process-wide state. A context configured with
neither can still materialise embedded providers.

# Example
```rust
# use cwpix::prelude::*;
let ctx = ResolveContext::new().with_base("charts/album1");
```
"#]
#[derive(Default, Clone, Copy)]
pub struct ResolveContext<'f> {
    base: Option<&'f Path>,
    fetcher: Option<&'f dyn FetchBytes>,
}

impl<'f> ResolveContext<'f> {
    /// A context that can resolve only embedded providers.
    pub const fn new() -> Self {
        Self {
            base: None,
            fetcher: None,
        }
    }

    /// Resolve relative paths against `base`.
    pub fn with_base<P: AsRef<Path> + ?Sized>(mut self, base: &'f P) -> Self {
        self.base = Some(base.as_ref());
        self
    }

    /// Resolve URLs through `fetcher`.
    pub fn with_fetcher(mut self, fetcher: &'f dyn FetchBytes) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub(crate) fn read_path(&self, relative: &str) -> Result<Vec<u8>, ProviderError> {
        let base = self
            .base
            .ok_or_else(|| ProviderError::MissingBase(relative.to_owned()))?;
        let path = base.join(relative);
        log::debug!("reading provider payload from {}", path.display());
        std::fs::read(&path).map_err(|source| ProviderError::Io { path, source })
    }

    pub(crate) fn fetch_url(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let fetcher = self
            .fetcher
            .ok_or_else(|| ProviderError::MissingFetcher(url.to_owned()))?;
        log::debug!("fetching provider payload from {url}");
        fetcher
            .fetch_bytes(url)
            .map_err(|reason| ProviderError::Fetch {
                locator: url.to_owned(),
                reason,
            })
    }
}

impl core::fmt::Debug for ResolveContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResolveContext")
            .field("base", &self.base)
            .field("fetcher", &self.fetcher.map(|_| "dyn FetchBytes"))
            .finish()
    }
}
