//! Property-based tests for chatpdf.
//!
//! These tests generate random inputs to find edge cases.

use proptest::prelude::*;

use chatpdf::layout::engine::{IMAGE_MEDIA_HEIGHT, MIN_BUBBLE_HEIGHT, OTHER_MEDIA_HEIGHT};
use chatpdf::layout::{DateSeparators, bubble_height, truncate_label};
use chatpdf::media::printable_ascii;
use chatpdf::parser::TranscriptParser;
use chatpdf::sanitize::{is_renderable, sanitize};
use chatpdf::{MediaKind, Message};

/// Reserved media height of a bubble: none, document or image.
fn arb_media_height() -> impl Strategy<Value = f32> {
    prop::sample::select(vec![0.0f32, OTHER_MEDIA_HEIGHT, IMAGE_MEDIA_HEIGHT])
}

/// A sender name from a fixed pool (fast, no regex strategies).
fn arb_sender() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Ana".to_string(),
        "Bob".to_string(),
        "Glauco Silva".to_string(),
        "José da Silva".to_string(),
        "Иван".to_string(),
        "+55 11 99999-0000".to_string(),
    ])
}

fn arb_content() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Hello".to_string(),
        "Tudo bem?".to_string(),
        "Great 👍🔥".to_string(),
        "emoji 🦀 crab".to_string(),
        "a: b: c".to_string(),
        "Привет мир".to_string(),
        "   padded   ".to_string(),
    ])
}

fn arb_media_extension() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "jpg", "JPEG", "png", "gif", "bmp", "webp", "opus", "MP3", "wav", "m4a", "ogg", "aac",
        "pdf", "docx", "vcf",
    ])
    .prop_map(str::to_string)
}

/// Sorted day numbers, so separators can be checked in first-seen order.
fn arb_days(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=28, 0..max_len).prop_map(|mut v| {
        v.sort_unstable();
        v
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // SANITIZER PROPERTIES
    // ============================================

    /// Every character of the output can be rendered by the document font
    #[test]
    fn sanitize_output_is_renderable(text in ".*") {
        let out = sanitize(&text);
        prop_assert!(out.chars().all(is_renderable));
    }

    /// Renderable input passes through unchanged
    #[test]
    fn sanitize_keeps_latin1(text in "[ -~\u{a0}-\u{ff}\n\r]*") {
        prop_assert_eq!(sanitize(&text), text);
    }

    /// Sanitizing is idempotent
    #[test]
    fn sanitize_is_idempotent(text in ".*") {
        let once = sanitize(&text);
        prop_assert_eq!(sanitize(&once), once.clone());
    }

    // ============================================
    // PARSER PROPERTIES
    // ============================================

    /// A bracketed line yields exactly its timestamp, sender and trimmed content
    #[test]
    fn bracketed_lines_parse(sender in arb_sender(), content in arb_content(), minute in 0u8..60) {
        let parser = TranscriptParser::new().unwrap();
        let timestamp = format!("01/02/2023, 10:{minute:02}:00");
        let line = format!("[{timestamp}] {sender}: {content}");

        let msg = parser.parse_line(&line).unwrap();
        prop_assert!(!msg.has_media());
        prop_assert_eq!(msg.timestamp.as_str(), timestamp.as_str());
        prop_assert_eq!(msg.sender.as_str(), sender.as_str());
        prop_assert_eq!(msg.content.as_str(), content.trim());
    }

    /// A dashed line with an attachment suffix keeps only the reference
    #[test]
    fn dashed_attachment_lines_parse(
        sender in arb_sender(),
        ext in arb_media_extension(),
        n in 0u32..10_000,
    ) {
        let parser = TranscriptParser::new().unwrap();
        let reference = format!("IMG-{n:05}.{ext}");
        let line = format!("01/02/2023 10:00 - {sender}: {reference} (file attached)");

        let msg = parser.parse_line(&line).unwrap();
        prop_assert_eq!(msg.timestamp.as_str(), "01/02/2023 10:00");
        prop_assert_eq!(msg.content.as_str(), "");
        prop_assert_eq!(msg.media_kind, MediaKind::from_filename(&reference));
        prop_assert_eq!(msg.media_reference, reference);
    }

    /// Media kinds are disjoint and follow the extension case-insensitively
    #[test]
    fn media_kind_by_extension(ext in arb_media_extension()) {
        let kind = MediaKind::from_filename(&format!("file.{ext}"));
        let lower = ext.to_ascii_lowercase();
        let expected = match lower.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" => MediaKind::Image,
            "opus" | "mp3" | "wav" | "m4a" | "ogg" | "aac" => MediaKind::Audio,
            _ => MediaKind::Other,
        };
        prop_assert_eq!(kind, expected);
    }

    // ============================================
    // LAYOUT PROPERTIES
    // ============================================

    /// Bubble height never drops below the minimum
    #[test]
    fn bubble_height_has_minimum(lines in 0usize..200, media in arb_media_height()) {
        prop_assert!(bubble_height(lines, media) >= MIN_BUBBLE_HEIGHT);
    }

    /// Bubble height is non-decreasing in line count
    #[test]
    fn bubble_height_is_monotonic(
        lines in 0usize..200,
        extra in 0usize..50,
        media in arb_media_height(),
    ) {
        prop_assert!(bubble_height(lines + extra, media) >= bubble_height(lines, media));
    }

    /// One separator per distinct day, in first-seen order
    #[test]
    fn separators_once_per_day(days in arb_days(40)) {
        let messages: Vec<Message> = days
            .iter()
            .map(|d| Message::new(format!("{d:02}/02/2023, 10:00"), "Ana", "x"))
            .collect();

        let mut tracker = DateSeparators::new();
        let emitted: Vec<String> = messages
            .iter()
            .filter_map(|m| tracker.next(m).map(str::to_string))
            .collect();

        let mut expected: Vec<String> = days.iter().map(|d| format!("{d:02}/02/2023")).collect();
        expected.dedup();
        prop_assert_eq!(emitted, expected);
    }

    /// Labels never exceed the limit and short ones are untouched
    #[test]
    fn truncated_labels_fit(name in "[a-zA-Z0-9_.-]{0,60}") {
        let label = truncate_label(&name);
        prop_assert!(label.chars().count() <= 24);
        if name.chars().count() <= 24 {
            prop_assert_eq!(label, name);
        } else {
            prop_assert_eq!(label.chars().count(), 20);
        }
    }

    // ============================================
    // MEDIA INDEX PROPERTIES
    // ============================================

    /// Normalized names contain only printable ASCII
    #[test]
    fn printable_ascii_only(name in ".*") {
        let clean = printable_ascii(&name);
        prop_assert!(clean.chars().all(|c| (' '..='~').contains(&c)));
    }
}
