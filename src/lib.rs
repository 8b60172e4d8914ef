#![doc = r#"
Binary chart structures for the CWPC/CWPM rhythm-game formats.

# Overview

A chart is exact musical timing plus notes plus assets:

- [`Beat`](prelude::Beat) — every musical position is an exact
  non-negative rational, so long charts never drift.
- [`RateList`](prelude::RateList) — the piecewise-constant rate engine
  behind both the tempo (beats-per-second) curve and the scroll-speed
  curve, with binary-search lookup and beat→seconds integration.
- [`NoteList`](prelude::NoteList) — taps, holds, and drags on parallel
  tracks. Chains are stored without any pointer fields on the wire:
  membership rides on per-note relative forward links, and the note
  kind itself is reconstructed from the width field's sign bit and link
  presence.
- [`FileProvider`](prelude::FileProvider) — where an asset's bytes live
  (embedded in the document, behind a URL, at a relative path),
  optionally gzip-compressed, encoded through a two-phase
  reserve-then-patch protocol so payloads of unknown header-time size
  land in one pre-sized buffer.

# Example

```rust
use cwpix::prelude::*;

// a chart at 2 beats per second, tempo change at beat 4
let mut chart = Chart::new(2.0, 1.0);
chart.tempo.push(Beat::whole(4), 3.0);
chart.notes.push_tap(NoteSpec::new(Beat::new(1, 2), 4, 0, 1.0));
chart.notes.push_group(
    GroupKind::Hold,
    [
        NoteSpec::new(Beat::whole(1), 4, 2, 1.0),
        NoteSpec::new(Beat::whole(2), 4, 2, 1.0),
    ],
);

let buffer = encode_to_vec(&chart).unwrap();
let decoded = Chart::parse(&buffer).unwrap();
assert_eq!(decoded.notes.len(), 3);
```

Everything here is the binary layer only: decoding audio or images,
fetching remote files, and the JSON authoring format are the host
application's business, reached through
[`FetchBytes`](prelude::FetchBytes) and plain byte buffers.
"#]

pub mod beat;
pub mod chart;
pub mod document;
pub mod notes;
pub mod prelude;
pub mod provider;
pub mod reader;
pub mod seconds;
pub mod timing;
pub mod writer;
