#![doc = r#"
Rusty representation of a single difficulty's chart
"#]

use crate::{
    beat::Beat,
    document::Encode,
    notes::NoteList,
    provider::EmbedRequest,
    reader::{DecodeResult, Reader},
    seconds::Seconds,
    timing::RateList,
    writer::{EncodeResult, Writer},
};

#[doc = r#"
One playable chart: its tempo curve, scroll-speed curve, and notes.

The wire form is the three parts concatenated, in that order, with no
framing; the region is self-contained and its size is known before the
first byte is written, so a chart can be encoded directly or ride inside
an embedded [`FileProvider`](crate::provider::FileProvider) as a
sub-chart.

# Example
```rust
# use cwpix::prelude::*;
let mut chart = Chart::new(2.0, 1.0);
chart.tempo.push(Beat::whole(4), 3.0);
chart.notes.push_tap(NoteSpec::new(Beat::whole(4), 4, 2, 1.0));

let buffer = encode_to_vec(&chart).unwrap();
let decoded = Chart::parse(&buffer).unwrap();
assert_eq!(decoded.seconds_at(Beat::whole(4)), Seconds::new(2.0));
```
"#]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chart {
    /// Beats-per-second curve. Rates must stay positive for
    /// [`Chart::seconds_at`] to mean anything; the chart does not
    /// validate the domain.
    pub tempo: RateList,
    /// Scroll-speed curve. Any real rate, negative scrolling backwards.
    pub speed: RateList,
    /// The note list.
    pub notes: NoteList,
}

impl Chart {
    /// Create an empty chart with initial tempo and scroll speed.
    pub fn new(initial_bps: f64, initial_speed: f64) -> Self {
        Self {
            tempo: RateList::new(initial_bps),
            speed: RateList::new(initial_speed),
            notes: NoteList::new(),
        }
    }

    /// Parse a chart from its complete wire region.
    pub fn parse(bytes: &[u8]) -> DecodeResult<Self> {
        let mut reader = Reader::new(bytes);
        Self::read(&mut reader)
    }

    /// Read a chart at the reader's cursor.
    pub fn read(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        let tempo = RateList::read(reader)?;
        let speed = RateList::read(reader)?;
        let notes = NoteList::read(reader)?;
        Ok(Self {
            tempo,
            speed,
            notes,
        })
    }

    /// Write the chart's wire region.
    pub fn write(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        self.tempo.write(writer)?;
        self.speed.write(writer)?;
        self.notes.write(writer)
    }

    /// Size of the wire region in bytes.
    pub fn encoded_len(&self) -> usize {
        self.tempo.encoded_len() + self.speed.encoded_len() + self.notes.encoded_len()
    }

    /// Elapsed real time at `beat` under the tempo curve.
    pub fn seconds_at(&self, beat: Beat) -> Seconds {
        self.tempo.seconds_at(beat)
    }
}

impl Encode for Chart {
    fn encoded_len(&self) -> usize {
        Chart::encoded_len(self)
    }

    fn encode<'a>(
        &'a self,
        writer: &mut Writer<'_>,
        _embeds: &mut Vec<EmbedRequest<'a>>,
    ) -> EncodeResult<()> {
        self.write(writer)
    }
}
