use super::GroupKey;
use crate::beat::Beat;

/// The three note kinds of the format.
///
/// Kind is never stored as a tag on the wire. It is reconstructed at
/// decode time from the sign bit of the width field (negative, including
/// `-0.0`, means drag) and from link presence (a linked, non-negative
/// width means hold).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteKind {
    /// An isolated note with no chain.
    Tap,
    /// A member of a hold chain.
    Hold(GroupKey),
    /// A member of a drag chain.
    Drag(GroupKey),
}

impl NoteKind {
    /// The group this note belongs to, if any.
    pub const fn group(&self) -> Option<GroupKey> {
        match self {
            Self::Tap => None,
            Self::Hold(group) | Self::Drag(group) => Some(*group),
        }
    }

    /// True for [`NoteKind::Tap`].
    pub const fn is_tap(&self) -> bool {
        matches!(self, Self::Tap)
    }

    /// True for [`NoteKind::Hold`].
    pub const fn is_hold(&self) -> bool {
        matches!(self, Self::Hold(_))
    }

    /// True for [`NoteKind::Drag`].
    pub const fn is_drag(&self) -> bool {
        matches!(self, Self::Drag(_))
    }

    /// Same kind, pointing at `group`. Used when chains merge.
    pub(crate) const fn with_group(self, group: GroupKey) -> Self {
        match self {
            Self::Tap => Self::Tap,
            Self::Hold(_) => Self::Hold(group),
            Self::Drag(_) => Self::Drag(group),
        }
    }
}

/// Which kind of chain a group is built as.
///
/// Per-note kinds are reconstructed independently on decode, so a group
/// read back from the wire may in principle mix kinds; this only selects
/// the kind of notes *added* through the grouping API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupKind {
    /// A hold chain.
    Hold,
    /// A drag chain.
    Drag,
}

/// The caller-supplied fields of a note, before it has a key or a kind.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteSpec {
    /// Exact position of the note.
    pub beat: Beat,
    /// How many parallel tracks this note's chart region has.
    pub track_count: u16,
    /// Which track the note sits on, `0 <= track_index < track_count`.
    pub track_index: u16,
    /// Visual width. Non-negative for taps and holds; the wire reserves
    /// the sign bit to mark drags.
    pub width: f64,
}

impl NoteSpec {
    /// Bundle note fields.
    pub const fn new(beat: Beat, track_count: u16, track_index: u16, width: f64) -> Self {
        Self {
            beat,
            track_count,
            track_index,
            width,
        }
    }
}

#[doc = r#"
A single timed note.

Track geometry is per-note, not per-chart: `track_count` travels with
every note, so neighbouring notes may describe different track layouts.
The format does not forbid it and this crate does not validate it.
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    pub(crate) beat: Beat,
    pub(crate) track_count: u16,
    pub(crate) track_index: u16,
    pub(crate) width: f64,
    pub(crate) kind: NoteKind,
}

impl Note {
    /// Exact position of the note.
    pub const fn beat(&self) -> Beat {
        self.beat
    }

    /// Number of parallel tracks in this note's context.
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// Track the note sits on.
    pub const fn track_index(&self) -> u16 {
        self.track_index
    }

    /// Visual width. For drags this is the magnitude; the wire carries
    /// the sign.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// The note kind, with its group reference for holds and drags.
    pub const fn kind(&self) -> NoteKind {
        self.kind
    }
}
