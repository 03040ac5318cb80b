//! Edge case tests for chatpdf
//!
//! These tests cover boundary conditions of transcript parsing, sanitizing
//! and media lookup that the unit tests only touch lightly.

use std::fs;

use chatpdf::config::ParserConfig;
use chatpdf::media::{AvailableFileIndex, MediaMap, transcoded_name};
use chatpdf::parser::TranscriptParser;
use chatpdf::sanitize::sanitize;
use chatpdf::{MediaKind, Message};

fn parser() -> TranscriptParser {
    TranscriptParser::new().unwrap()
}

// =========================================================================
// Transcript lines
// =========================================================================

#[test]
fn test_direction_marks_before_header() {
    let msg = parser()
        .parse_line("\u{200E}\u{200F}[01/02/2023, 10:00:00] Ana: hi")
        .unwrap();
    assert_eq!(msg.timestamp, "01/02/2023, 10:00:00");
    assert_eq!(msg.sender, "Ana");
}

#[test]
fn test_direction_marks_around_attachment() {
    let msg = parser()
        .parse_line("[01/02/2023, 10:00:00] Ana: \u{200E}<attached: 00000012-PHOTO-2023-02-01.jpg>")
        .unwrap();
    assert_eq!(msg.content, "");
    assert_eq!(msg.media_reference, "00000012-PHOTO-2023-02-01.jpg");
    assert_eq!(msg.media_kind, MediaKind::Image);
}

#[test]
fn test_colon_in_content_stays_in_content() {
    let msg = parser().parse_line("01/02/2023 10:00 - Bob: time: 10:30").unwrap();
    assert_eq!(msg.sender, "Bob");
    assert_eq!(msg.content, "time: 10:30");
}

#[test]
fn test_system_lines_without_sender_are_dropped() {
    let p = parser();
    assert!(p.parse_line("01/02/2023 10:00 - Messages are end-to-end encrypted.").is_none());
    assert!(p.parse_line("").is_none());
    assert!(p.parse_line("   ").is_none());
    assert!(p.parse_line("[broken header Ana: hi").is_none());
}

#[test]
fn test_single_digit_dates_not_matched_by_dashed_grammar() {
    assert!(parser().parse_line("1/2/23 10:00 - Bob: hi").is_none());
}

#[test]
fn test_attachment_with_spaces_and_parentheses() {
    let msg = parser()
        .parse_line("01/02/2023 10:00 - Bob: Relatório (final) v2.pdf (arquivo anexado)")
        .unwrap();
    assert_eq!(msg.media_reference, "Relatório (final) v2.pdf");
    assert_eq!(msg.media_kind, MediaKind::Other);
}

#[test]
fn test_empty_wrapped_marker_is_not_an_attachment() {
    let msg = parser().parse_line("[01/02/2023, 10:00:00] Ana: <attached:  >").unwrap();
    assert!(!msg.has_media());
}

#[test]
fn test_custom_marker_words() {
    let config = ParserConfig::new()
        .with_wrapper_word("adjunto")
        .with_attached_suffix("archivo adjunto");
    let p = TranscriptParser::with_config(&config).unwrap();

    let a = p.parse_line("[01/02/2023, 10:00:00] Ana: <adjunto: foto.jpg>").unwrap();
    assert_eq!(a.media_reference, "foto.jpg");

    let b = p.parse_line("01/02/2023 10:00 - Bob: audio.opus (archivo adjunto)").unwrap();
    assert_eq!(b.media_reference, "audio.opus");
}

#[test]
fn test_marker_words_are_literal() {
    let config = ParserConfig {
        wrapper_words: vec!["a.b".to_string()],
        attached_suffixes: vec![],
    };
    let p = TranscriptParser::with_config(&config).unwrap();
    assert!(!p.parse_line("[01/02/2023, 10:00:00] Ana: <axb: f.jpg>").unwrap().has_media());
    assert!(p.parse_line("[01/02/2023, 10:00:00] Ana: <a.b: f.jpg>").unwrap().has_media());
    assert!(!p.parse_line("01/02/2023 10:00 - Bob: f.pdf (file attached)").unwrap().has_media());
}

#[test]
fn test_invalid_utf8_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("_chat.txt");
    let mut bytes = b"[01/02/2023, 10:00:00] Ana: ol".to_vec();
    bytes.push(0xFF);
    bytes.extend_from_slice(b"\r\n01/02/2023 10:01 - Bob: ok\r\n");
    fs::write(&path, bytes).unwrap();

    let messages = parser().parse_file(&path).unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "ol\u{FFFD}");
    assert_eq!(messages[1].content, "ok");
}

// =========================================================================
// Sanitizing
// =========================================================================

#[test]
fn test_replacement_character_becomes_space() {
    assert_eq!(sanitize("ol\u{FFFD}"), "ol ");
}

#[test]
fn test_zero_width_joiner_sequences() {
    // family emoji: each person and joiner is outside the table
    assert_eq!(sanitize("👨‍👩‍👧").chars().filter(|c| *c == ' ').count(), 5);
}

#[test]
fn test_tag_directly_followed_by_text() {
    assert_eq!(sanitize("🎉party🎉"), "[FESTA]party[FESTA]");
}

// =========================================================================
// Media lookup
// =========================================================================

#[test]
fn test_index_of_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let index = AvailableFileIndex::build(dir.path()).unwrap();
    assert!(index.is_empty());
    assert!(index.find("anything.jpg").is_none());
}

#[test]
fn test_reference_with_invisible_characters() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("PTT-20230201-WA0001.opus"), b"x").unwrap();
    let index = AvailableFileIndex::build(dir.path()).unwrap();
    assert!(index.find("\u{200E}PTT-20230201-WA0001.opus").is_some());
}

#[test]
fn test_transcoded_name_keeps_inner_dots() {
    assert_eq!(transcoded_name("voice.note.opus"), "voice.note.mp3");
}

#[test]
fn test_empty_media_map() {
    let map = MediaMap::new();
    let msg = Message::new("01/02/2023", "Ana", "").with_media("a.jpg");
    assert!(map.get(&msg.media_reference).is_none());
}
