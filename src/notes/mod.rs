#![doc = r#"
The note list: timed notes on parallel tracks, with hold/drag chains.

# Model

Notes live in an arena keyed by [`NoteKey`]; a beat-sorted order vector
(stable on ties) defines each note's *global index*. Chains (holds,
drags) are group records in a second arena: a group owns its beat-sorted
member list, and every member's [`NoteKind`] points back at the group.
Merging chains unions the member lists and rewrites the back-references,
so there is never a shared mutable peer sequence to alias.

# Wire form

```text
u32 count
count × (u32 Δbeat num, u32 Δbeat den, u16 track_count, u16 track_index,
         u32 next, f16 width)
```

Notes are emitted once, in global beat order, Δbeat relative to the
previous note. Group membership is not stored; it is carried entirely by
`next`, the relative forward offset to the following member of the same
chain (`0` for chain ends and taps). The width field's magnitude is the
visual width and its IEEE sign bit marks drags, `-0.0` included, which is
why the codec inspects the raw half-float rather than a widened value.
"#]

mod note;
pub use note::*;

use std::collections::{HashMap, HashSet};

use half::f16;
use slotmap::{SecondaryMap, SlotMap};

use crate::{
    beat::Beat,
    document::Encode,
    provider::EmbedRequest,
    reader::{DecodeError, DecodeErrorKind, DecodeResult, Reader},
    writer::{EncodeError, EncodeErrorKind, EncodeResult, Writer},
};

slotmap::new_key_type! {
    /// Stable handle to a note in a [`NoteList`].
    pub struct NoteKey;
    /// Stable handle to a hold/drag chain in a [`NoteList`].
    pub struct GroupKey;
}

/// One chain's member list, beat-sorted.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Group {
    members: Vec<NoteKey>,
}

/// Bytes per note on the wire.
const NOTE_WIRE_LEN: usize = 18;

#[doc = r#"
An ordered set of timed notes with chain bookkeeping.

# Example
```rust
# use cwpix::prelude::*;
let mut notes = NoteList::new();
notes.push_tap(NoteSpec::new(Beat::new(1, 2), 4, 0, 1.0));
let hold = notes.push_group(
    GroupKind::Hold,
    [
        NoteSpec::new(Beat::ZERO, 4, 1, 1.0),
        NoteSpec::new(Beat::whole(1), 4, 1, 1.0),
    ],
);

assert_eq!(notes.len(), 3);
assert_eq!(notes.peers_of(hold).len(), 2);
```
"#]
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteList {
    notes: SlotMap<NoteKey, Note>,
    /// Beat-sorted, stable on ties; the global index space for links.
    order: Vec<NoteKey>,
    groups: SlotMap<GroupKey, Group>,
}

impl NoteList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if the list holds no notes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a note.
    pub fn get(&self, key: NoteKey) -> Option<&Note> {
        self.notes.get(key)
    }

    /// Iterate notes in global beat order.
    pub fn iter(&self) -> impl Iterator<Item = (NoteKey, &Note)> {
        self.order.iter().map(|key| (*key, &self.notes[*key]))
    }

    /// Add an isolated tap.
    pub fn push_tap(&mut self, spec: NoteSpec) -> NoteKey {
        self.insert(spec, NoteKind::Tap)
    }

    /// Add a chain of `kind` holding every spec, in beat order.
    ///
    /// An empty chain is representable in memory but has no wire form and
    /// will not survive a round trip.
    pub fn push_group(
        &mut self,
        kind: GroupKind,
        specs: impl IntoIterator<Item = NoteSpec>,
    ) -> GroupKey {
        let group = self.groups.insert(Group::default());
        for spec in specs {
            self.extend_group(group, kind, spec);
        }
        group
    }

    /// Add one note to an existing chain.
    ///
    /// # Panics
    /// if `group` is not a live group of this list.
    pub fn extend_group(&mut self, group: GroupKey, kind: GroupKind, spec: NoteSpec) -> NoteKey {
        let note_kind = match kind {
            GroupKind::Hold => NoteKind::Hold(group),
            GroupKind::Drag => NoteKind::Drag(group),
        };
        let key = self.insert(spec, note_kind);
        let notes = &self.notes;
        let members = &mut self.groups[group].members;
        members.push(key);
        members.sort_by_key(|member| notes[*member].beat);
        key
    }

    /// The beat-sorted members of `key`'s chain; empty for taps and
    /// unknown keys.
    pub fn peers(&self, key: NoteKey) -> &[NoteKey] {
        self.notes
            .get(key)
            .and_then(|note| note.kind.group())
            .map(|group| self.peers_of(group))
            .unwrap_or(&[])
    }

    /// The beat-sorted members of a chain; empty for unknown groups.
    pub fn peers_of(&self, group: GroupKey) -> &[NoteKey] {
        self.groups
            .get(group)
            .map(|group| group.members.as_slice())
            .unwrap_or(&[])
    }

    /// True if `key` opens its chain. Taps count as their own one-note
    /// chain, so this holds for them too.
    pub fn is_begin(&self, key: NoteKey) -> bool {
        match self.peers(key) {
            [] => true,
            members => members.first() == Some(&key),
        }
    }

    /// True if `key` closes its chain (or is a tap).
    pub fn is_end(&self, key: NoteKey) -> bool {
        match self.peers(key) {
            [] => true,
            members => members.last() == Some(&key),
        }
    }

    /// True if `key` is strictly inside its chain.
    pub fn is_middle(&self, key: NoteKey) -> bool {
        !self.is_begin(key) && !self.is_end(key)
    }

    /// True if `key` has no peers besides itself.
    pub fn is_isolated(&self, key: NoteKey) -> bool {
        self.peers(key).len() <= 1
    }

    /// Merge chains into `into`.
    ///
    /// Each distinct group among `others` is absorbed exactly once
    /// (duplicates and `into` itself are skipped, as are already-dead
    /// keys). The unified member list is deduplicated, re-sorted by beat,
    /// and every member's kind is re-pointed at `into`. This is the only
    /// operation that changes chain membership after construction or
    /// decode.
    pub fn merge(&mut self, into: GroupKey, others: &[GroupKey]) {
        let Some(target) = self.groups.get_mut(into) else {
            return;
        };
        let mut members = std::mem::take(&mut target.members);
        for &other in others {
            if other == into {
                continue;
            }
            if let Some(absorbed) = self.groups.remove(other) {
                members.extend(absorbed.members);
            }
        }
        let mut seen = HashSet::with_capacity(members.len());
        members.retain(|member| seen.insert(*member));
        let notes = &self.notes;
        members.sort_by_key(|member| notes[*member].beat);
        for &member in &members {
            if let Some(note) = self.notes.get_mut(member) {
                note.kind = note.kind.with_group(into);
            }
        }
        self.groups[into].members = members;
    }

    fn insert(&mut self, spec: NoteSpec, kind: NoteKind) -> NoteKey {
        let key = self.notes.insert(Note {
            beat: spec.beat,
            track_count: spec.track_count,
            track_index: spec.track_index,
            width: spec.width,
            kind,
        });
        self.order.push(key);
        let notes = &self.notes;
        self.order.sort_by_key(|key| notes[*key].beat);
        key
    }

    /// Size of the wire form in bytes.
    pub fn encoded_len(&self) -> usize {
        4 + self.order.len() * NOTE_WIRE_LEN
    }

    /// Write the wire form.
    ///
    /// Two traversals: global indices are assigned first, then each
    /// chain's adjacent member pairs yield the relative `next` offsets,
    /// then notes are emitted in global order.
    pub fn write(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        writer.write_u32(self.order.len() as u32)?;

        let mut index: SecondaryMap<NoteKey, usize> = SecondaryMap::new();
        for (i, key) in self.order.iter().enumerate() {
            index.insert(*key, i);
        }
        let mut links: SecondaryMap<NoteKey, u32> = SecondaryMap::new();
        for group in self.groups.values() {
            for pair in group.members.windows(2) {
                let next = index[pair[1]]
                    .checked_sub(index[pair[0]])
                    .filter(|next| *next > 0)
                    .ok_or_else(|| {
                        EncodeError::new(writer.position(), EncodeErrorKind::UnorderedGroup)
                    })?;
                links.insert(pair[0], next as u32);
            }
        }

        let mut previous = Beat::ZERO;
        for key in &self.order {
            let note = &self.notes[*key];
            writer.write_beat(note.beat - previous)?;
            writer.write_u16(note.track_count)?;
            writer.write_u16(note.track_index)?;
            writer.write_u32(links.get(*key).copied().unwrap_or(0))?;
            let width = match note.kind {
                // force the sign bit; +0.0 becomes -0.0 here
                NoteKind::Drag(_) => f16::from_f64(-note.width.abs()),
                _ => f16::from_f64(note.width),
            };
            writer.write_f16(width)?;
            previous = note.beat;
        }
        Ok(())
    }

    /// Read the wire form.
    ///
    /// A single forward pass. Each `next != 0` registers a pending
    /// inbound link for a future global index; when decoding reaches that
    /// index, the note joins the registered chain. A note with no pending
    /// link that is itself linked (or drag-signed) opens a new chain.
    pub fn read(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        let count = reader.read_u32()? as usize;
        let mut list = Self::new();
        let mut pending: HashMap<usize, GroupKey> = HashMap::new();
        let mut beat = Beat::ZERO;
        for i in 0..count {
            let field_start = reader.position();
            beat += reader.read_beat()?;
            let track_count = reader.read_u16()?;
            let track_index = reader.read_u16()?;
            let next = reader.read_u32()?;
            let raw_width = reader.read_f16()?;

            let joined = pending.remove(&i);
            let negative = raw_width.is_sign_negative();
            let (kind, width) = if negative || joined.is_some() || next != 0 {
                let group = joined.unwrap_or_else(|| list.groups.insert(Group::default()));
                if negative {
                    (NoteKind::Drag(group), (-raw_width).to_f64())
                } else {
                    (NoteKind::Hold(group), raw_width.to_f64())
                }
            } else {
                (NoteKind::Tap, raw_width.to_f64())
            };

            let key = list.notes.insert(Note {
                beat,
                track_count,
                track_index,
                width,
                kind,
            });
            // deltas are non-negative, so appending keeps both the order
            // vector and the member lists beat-sorted
            list.order.push(key);
            if let Some(group) = kind.group() {
                list.groups[group].members.push(key);
            }

            if next != 0 {
                let target = i + next as usize;
                if target >= count {
                    return Err(DecodeError::new(
                        field_start,
                        DecodeErrorKind::DanglingLink {
                            from: i,
                            to: target as u64,
                            count,
                        },
                    ));
                }
                if let Some(group) = kind.group() {
                    pending.insert(target, group);
                }
            }
        }
        Ok(list)
    }
}

impl Encode for NoteList {
    fn encoded_len(&self) -> usize {
        NoteList::encoded_len(self)
    }

    fn encode<'a>(
        &'a self,
        writer: &mut Writer<'_>,
        _embeds: &mut Vec<EmbedRequest<'a>>,
    ) -> EncodeResult<()> {
        self.write(writer)
    }
}
