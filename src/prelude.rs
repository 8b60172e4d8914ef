#![doc = r#"
Re-exports everything a chart codec user typically needs

```rust
use cwpix::prelude::*;
```
"#]

pub use crate::{
    beat::Beat,
    chart::Chart,
    document::{Encode, encode_to_vec},
    notes::{GroupKey, GroupKind, Note, NoteKey, NoteKind, NoteList, NoteSpec},
    provider::{
        EmbedRequest, FetchBytes, FileProvider, ProviderError, ProviderKind, ProviderSource,
        ResolveContext,
    },
    reader::{DecodeError, DecodeErrorKind, DecodeResult, Reader},
    seconds::Seconds,
    timing::{RateChange, RateList},
    writer::{EncodeError, EncodeErrorKind, EncodeResult, Writer},
};
