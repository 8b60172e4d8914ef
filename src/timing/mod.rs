#![doc = r#"
Piecewise-constant rate functions over beat position.

One engine serves both timing lists of a chart:

- the **tempo list**: rate is beats per second, strictly positive, and
  integrating its reciprocal converts beat positions to elapsed real time;
- the **speed list**: rate is a scroll-speed multiplier and may be any
  real, negative values producing reverse scroll.

The list itself does not know which domain it is; rate-domain validation
(tempo > 0) is the caller's responsibility.

# Wire form

```text
u32 count
f64 initial rate
count × (u32 Δbeat numerator, u32 Δbeat denominator, f64 rate)
```

Each change's beat is stored as an exact rational delta from the
*previous* change (the first from beat zero); decoding accumulates.
"#]

use crate::{
    beat::Beat,
    document::Encode,
    provider::EmbedRequest,
    reader::{DecodeResult, Reader},
    seconds::Seconds,
    writer::{EncodeResult, Writer},
};

/// A single rate change at an exact beat position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateChange {
    /// Where the new rate takes effect.
    pub beat: Beat,
    /// The rate from this beat onward, until the next change.
    pub rate: f64,
}

#[doc = r#"
An initial rate plus a beat-ordered sequence of [`RateChange`]s.

The change sequence is kept sorted by beat after every mutation. Duplicate
beats are permitted; lookups resolve to the last change in sorted order,
which for duplicates means the most recently pushed.

# Example
```rust
# use cwpix::prelude::*;
// 2 beats per second, jumping to 3 at beat 4
let mut tempo = RateList::new(2.0);
tempo.push(Beat::whole(4), 3.0);

assert_eq!(tempo.rate_at(Beat::new(7, 2)), 2.0);
assert_eq!(tempo.rate_at(Beat::whole(4)), 3.0);
assert_eq!(tempo.seconds_at(Beat::whole(7)), Seconds::new(3.0));
```
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateList {
    initial: f64,
    changes: Vec<RateChange>,
}

impl RateList {
    /// Create a list holding `initial` everywhere.
    pub const fn new(initial: f64) -> Self {
        Self {
            initial,
            changes: Vec::new(),
        }
    }

    /// The rate before the first change.
    pub const fn initial(&self) -> f64 {
        self.initial
    }

    /// The changes, sorted ascending by beat.
    pub fn changes(&self) -> &[RateChange] {
        &self.changes
    }

    /// Append a change, keeping the sequence beat-sorted.
    ///
    /// Uniqueness is not enforced; a duplicate beat shadows the earlier
    /// change for lookups but both survive on the wire.
    pub fn push(&mut self, beat: Beat, rate: f64) {
        self.changes.push(RateChange { beat, rate });
        self.changes.sort_by_key(|change| change.beat);
    }

    /// The effective rate at `beat`.
    ///
    /// Binary search for the latest change with `change.beat <= beat`;
    /// `initial` if the query precedes every change. Right-continuous: the
    /// change at a beat applies from that beat onward.
    pub fn rate_at(&self, beat: Beat) -> f64 {
        let idx = self.changes.partition_point(|change| change.beat <= beat);
        match idx {
            0 => self.initial,
            _ => self.changes[idx - 1].rate,
        }
    }

    /// Elapsed real time at `beat`, integrating `Δbeat / rate` over each
    /// constant segment.
    ///
    /// Only meaningful for a tempo list (rate = beats per second, all
    /// positive). Segment widths are exact rational subtractions converted
    /// to `f64` at the last moment, so error does not accumulate with
    /// chart length beyond the per-segment divisions.
    pub fn seconds_at(&self, beat: Beat) -> Seconds {
        let mut elapsed = 0.0;
        let mut cursor = Beat::ZERO;
        let mut rate = self.initial;
        for change in &self.changes {
            if change.beat >= beat {
                break;
            }
            elapsed += (change.beat - cursor).as_f64() / rate;
            cursor = change.beat;
            rate = change.rate;
        }
        elapsed += (beat - cursor).as_f64() / rate;
        Seconds::new(elapsed)
    }

    /// Drop changes that do not change the effective rate.
    ///
    /// A single left-to-right pass: a change equal to the running rate
    /// (seeded with `initial`) is removed; a kept change updates the
    /// running rate. Idempotent.
    pub fn dedup(&mut self) {
        let mut current = self.initial;
        self.changes.retain(|change| {
            if change.rate == current {
                false
            } else {
                current = change.rate;
                true
            }
        });
    }

    /// Size of the wire form in bytes.
    pub fn encoded_len(&self) -> usize {
        4 + 8 + self.changes.len() * 16
    }

    /// Write the wire form.
    pub fn write(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        writer.write_u32(self.changes.len() as u32)?;
        writer.write_f64(self.initial)?;
        let mut previous = Beat::ZERO;
        for change in &self.changes {
            writer.write_beat(change.beat - previous)?;
            writer.write_f64(change.rate)?;
            previous = change.beat;
        }
        Ok(())
    }

    /// Read the wire form, accumulating beat deltas.
    pub fn read(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        let count = reader.read_u32()?;
        let initial = reader.read_f64()?;
        let mut changes = Vec::with_capacity(count as usize);
        let mut beat = Beat::ZERO;
        for _ in 0..count {
            beat += reader.read_beat()?;
            let rate = reader.read_f64()?;
            changes.push(RateChange { beat, rate });
        }
        Ok(Self { initial, changes })
    }
}

impl Encode for RateList {
    fn encoded_len(&self) -> usize {
        RateList::encoded_len(self)
    }

    fn encode<'a>(
        &'a self,
        writer: &mut Writer<'_>,
        _embeds: &mut Vec<EmbedRequest<'a>>,
    ) -> EncodeResult<()> {
        self.write(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tempo() -> RateList {
        let mut list = RateList::new(2.0);
        list.push(Beat::whole(4), 3.0);
        list
    }

    #[test]
    fn lookup_before_first_change() {
        assert_eq!(tempo().rate_at(Beat::ZERO), 2.0);
        assert_eq!(tempo().rate_at(Beat::new(31, 8)), 2.0);
    }

    #[test]
    fn lookup_is_right_continuous() {
        let list = tempo();
        assert_eq!(list.rate_at(Beat::whole(4)), 3.0);
        assert_eq!(list.rate_at(Beat::new(4_000_001, 1_000_000)), 3.0);
        assert_eq!(list.rate_at(Beat::whole(100)), 3.0);
    }

    #[test]
    fn duplicate_beat_last_push_wins() {
        let mut list = RateList::new(1.0);
        list.push(Beat::whole(2), 5.0);
        list.push(Beat::whole(2), 7.0);
        assert_eq!(list.rate_at(Beat::whole(2)), 7.0);
        assert_eq!(list.changes().len(), 2);
    }

    #[test]
    fn push_keeps_sorted() {
        let mut list = RateList::new(1.0);
        list.push(Beat::whole(8), 4.0);
        list.push(Beat::new(1, 2), 2.0);
        list.push(Beat::whole(3), 3.0);
        let beats: Vec<_> = list.changes().iter().map(|c| c.beat).collect();
        assert_eq!(beats, vec![Beat::new(1, 2), Beat::whole(3), Beat::whole(8)]);
    }

    #[test]
    fn seconds_at_integrates_segments() {
        let list = tempo();
        assert_eq!(list.seconds_at(Beat::ZERO), Seconds::ZERO);
        // 4 beats at 2 bps
        assert_eq!(list.seconds_at(Beat::whole(4)), Seconds::new(2.0));
        // + 3 beats at 3 bps
        assert_eq!(list.seconds_at(Beat::whole(7)), Seconds::new(3.0));
    }

    #[test]
    fn seconds_at_is_non_decreasing() {
        let list = tempo();
        let mut last = Seconds::ZERO;
        for eighth in 0..64 {
            let now = list.seconds_at(Beat::new(eighth, 8));
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn dedup_collapses_runs() {
        let mut list = RateList::new(2.0);
        list.push(Beat::whole(1), 2.0); // redundant with initial
        list.push(Beat::whole(2), 3.0);
        list.push(Beat::whole(3), 3.0); // redundant run
        list.push(Beat::whole(4), 2.0); // back to initial, but not redundant here
        list.dedup();
        let rates: Vec<_> = list.changes().iter().map(|c| c.rate).collect();
        assert_eq!(rates, vec![3.0, 2.0]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let mut once = RateList::new(1.0);
        once.push(Beat::whole(1), 1.0);
        once.push(Beat::whole(2), 4.0);
        once.dedup();
        let mut twice = once.clone();
        twice.dedup();
        assert_eq!(once, twice);
    }

    #[test]
    fn negative_rates_allowed() {
        // a speed list scrolling backwards
        let mut list = RateList::new(1.0);
        list.push(Beat::whole(2), -1.5);
        assert_eq!(list.rate_at(Beat::whole(3)), -1.5);
    }
}
