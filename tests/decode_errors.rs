use cwpix::prelude::*;
use pretty_assertions::assert_eq;

/// Build a rate list wire region by hand.
fn rate_list_bytes(initial: f64, deltas: &[(u32, u32, f64)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(deltas.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&initial.to_le_bytes());
    for (numerator, denominator, rate) in deltas {
        bytes.extend_from_slice(&numerator.to_le_bytes());
        bytes.extend_from_slice(&denominator.to_le_bytes());
        bytes.extend_from_slice(&rate.to_le_bytes());
    }
    bytes
}

/// Build a note list wire region by hand.
fn note_list_bytes(notes: &[(u32, u32, u16, u16, u32, u16)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(notes.len() as u32).to_le_bytes());
    for (numerator, denominator, track_count, track_index, next, width_bits) in notes {
        bytes.extend_from_slice(&numerator.to_le_bytes());
        bytes.extend_from_slice(&denominator.to_le_bytes());
        bytes.extend_from_slice(&track_count.to_le_bytes());
        bytes.extend_from_slice(&track_index.to_le_bytes());
        bytes.extend_from_slice(&next.to_le_bytes());
        bytes.extend_from_slice(&width_bits.to_le_bytes());
    }
    bytes
}

#[test]
fn truncated_buffer_is_out_of_bounds() {
    let err = Chart::parse(&[0x01, 0x02, 0x03]).unwrap_err();
    assert!(err.is_out_of_bounds());
    assert_eq!(err.position(), 0);
}

#[test]
fn truncated_mid_record() {
    let mut bytes = rate_list_bytes(2.0, &[(1, 2, 3.0)]);
    bytes.truncate(bytes.len() - 4);
    let err = RateList::read(&mut Reader::new(&bytes)).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn zero_denominator_is_rejected() {
    let bytes = rate_list_bytes(2.0, &[(1, 0, 3.0)]);
    let err = RateList::read(&mut Reader::new(&bytes)).unwrap_err();
    assert_eq!(*err.kind(), DecodeErrorKind::ZeroDenominator);
    // the rational starts right after count + initial
    assert_eq!(err.position(), 12);
}

#[test]
fn count_larger_than_buffer() {
    // claims 1000 notes, holds none
    let bytes = note_list_bytes(&[]);
    let mut forged = bytes.clone();
    forged[..4].copy_from_slice(&1000u32.to_le_bytes());
    let err = NoteList::read(&mut Reader::new(&forged)).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn dangling_link_is_rejected() {
    // one note linking 5 ahead of itself
    let bytes = note_list_bytes(&[(0, 1, 4, 0, 5, 0x3C00)]);
    let err = NoteList::read(&mut Reader::new(&bytes)).unwrap_err();
    assert_eq!(
        *err.kind(),
        DecodeErrorKind::DanglingLink {
            from: 0,
            to: 5,
            count: 1,
        }
    );
    assert_eq!(err.position(), 4);
}

#[test]
fn unknown_provider_discriminants() {
    for disc in [0i8, 4, 7, -4, i8::MIN] {
        let bytes = [disc as u8];
        let err = FileProvider::read(&mut Reader::new(&bytes)).unwrap_err();
        assert_eq!(*err.kind(), DecodeErrorKind::UnknownProvider(disc));
        assert_eq!(err.position(), 0);
    }
}

#[test]
fn embedded_region_out_of_range() {
    let mut bytes = vec![1u8];
    bytes.extend_from_slice(&100u64.to_le_bytes());
    bytes.extend_from_slice(&10u64.to_le_bytes());
    let err = FileProvider::read(&mut Reader::new(&bytes)).unwrap_err();
    assert_eq!(
        *err.kind(),
        DecodeErrorKind::EmbedOutOfRange {
            offset: 100,
            length: 10,
            available: 17,
        }
    );
}

#[test]
fn embedded_length_overflow_is_out_of_range() {
    let mut bytes = vec![1u8];
    bytes.extend_from_slice(&1u64.to_le_bytes());
    bytes.extend_from_slice(&u64::MAX.to_le_bytes());
    let err = FileProvider::read(&mut Reader::new(&bytes)).unwrap_err();
    assert!(matches!(
        err.kind(),
        DecodeErrorKind::EmbedOutOfRange { .. }
    ));
}

#[test]
fn provider_string_without_terminator() {
    let mut bytes = vec![2u8];
    bytes.extend_from_slice(b"https://example.com/a.ogg");
    let err = FileProvider::read(&mut Reader::new(&bytes)).unwrap_err();
    assert_eq!(*err.kind(), DecodeErrorKind::MissingNulTerminator);
    assert_eq!(err.position(), 1);
}

#[test]
fn provider_string_with_invalid_utf8() {
    let bytes = [3u8, 0xFF, 0xFE, 0x00];
    let err = FileProvider::read(&mut Reader::new(&bytes)).unwrap_err();
    assert_eq!(*err.kind(), DecodeErrorKind::InvalidUtf8);
}

#[test]
fn errors_format_with_position() {
    let err = Chart::parse(&[]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("byte 0"), "got {message:?}");
    assert!(message.contains("out of bounds"), "got {message:?}");
}
