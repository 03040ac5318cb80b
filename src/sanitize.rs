//! Text sanitizing for the PDF font.
//!
//! The embedded TTF covers Latin-1 and not much else, so every string that
//! reaches the canvas goes through [`sanitize`] first:
//!
//! 1. Known emoji and pictographs become bracketed tags (`👍` → `[OK]`).
//! 2. Every remaining code point outside printable ASCII (32–126), Latin-1
//!    (160–255), `\n` and `\r` becomes a single space.
//!
//! ```
//! use chatpdf::sanitize::sanitize;
//!
//! assert_eq!(sanitize("Great 👍🔥"), "Great [OK][FOGO]");
//! assert_eq!(sanitize("Olá, você!"), "Olá, você!");
//! ```

use std::sync::LazyLock;

/// Emoji to tag replacements. Skin tone modifiers are dropped.
const EMOJI_TAGS: &[(&str, &str)] = &[
    ("👍", "[OK]"),
    ("🔊", "[AUDIO]"),
    ("📎", "[ARQUIVO]"),
    ("🏻", ""),
    ("🏼", ""),
    ("🏽", ""),
    ("🏾", ""),
    ("🏿", ""),
    ("👋", "[OLA]"),
    ("❤️", "[CORACAO]"),
    ("😊", "[SORRISO]"),
    ("😂", "[RISO]"),
    ("😍", "[AMOR]"),
    ("😭", "[CHORO]"),
    ("😢", "[TRISTE]"),
    ("😡", "[RAIVA]"),
    ("😎", "[LEGAL]"),
    ("🤔", "[PENSANDO]"),
    ("🙏", "[POR FAVOR]"),
    ("🎵", "[MUSICA]"),
    ("📷", "[FOTO]"),
    ("📹", "[VIDEO]"),
    ("📱", "[CELULAR]"),
    ("💪", "[FORCA]"),
    ("✨", "[BRILHO]"),
    ("🔥", "[FOGO]"),
    ("⭐", "[ESTRELA]"),
    ("✅", "[OK]"),
    ("❌", "[ERRO]"),
    ("⚠️", "[ATENCAO]"),
    ("⚡", "[RAPIDO]"),
    ("💯", "[100]"),
    ("🎉", "[FESTA]"),
    ("🎁", "[PRESENTE]"),
    ("🎂", "[BOLO]"),
    ("🎈", "[BALAO]"),
    ("🎊", "[CONFETES]"),
    ("🎯", "[ALVO]"),
    ("🎲", "[DADO]"),
    ("🎮", "[JOGO]"),
    ("🎸", "[GUITARRA]"),
    ("🎹", "[PIANO]"),
    ("🎺", "[TROMPETE]"),
    ("🎻", "[VIOLINO]"),
    ("🎼", "[PARTITURA]"),
    ("🎧", "[FONE]"),
    ("🎤", "[MICROFONE]"),
    ("🎬", "[FILME]"),
    ("🎭", "[TEATRO]"),
    ("🎨", "[ARTE]"),
    ("🎪", "[CIRCO]"),
    ("🎫", "[INGRESSO]"),
    ("🎟️", "[TICKET]"),
    ("🎠", "[CARROSSEL]"),
    ("🎡", "[RODA GIGANTE]"),
    ("🎢", "[MONTANHA RUSSA]"),
    ("🎣", "[PESCA]"),
    ("🎽", "[CAMISA]"),
    ("🎾", "[TENIS]"),
    ("🎿", "[ESQUI]"),
    ("🏀", "[BASQUETE]"),
    ("🏈", "[FOOTBALL]"),
    ("🏉", "[RUGBY]"),
    ("⚽", "[FUTEBOL]"),
    ("⚾", "[BASEBALL]"),
    ("🏐", "[VOLEI]"),
    ("🏸", "[BADMINTON]"),
    ("🏓", "[PING PONG]"),
    ("🏒", "[HOCKEY]"),
    ("🏑", "[HOCKEY CAMPO]"),
    ("🏏", "[CRICKET]"),
    ("🏹", "[ARCO E FLECHA]"),
    ("⛳", "[GOLFE]"),
    ("⛸️", "[PATINS]"),
    ("⛷️", "[ESQUIADOR]"),
    ("🏂", "[SNOWBOARD]"),
    ("🏋️", "[MUSCULACAO]"),
    ("🤼", "[LUTA]"),
    ("🤸", "[GINASTICA]"),
    ("⛹️", "[BASQUETE]"),
    ("🤾", "[HANDEBOL]"),
    ("🏌️", "[GOLFE]"),
    ("🏄", "[SURF]"),
    ("🏊", "[NATACAO]"),
    ("🤽", "[POLO AQUATICO]"),
    ("🚣", "[REMO]"),
    ("🏇", "[HIPISMO]"),
    ("🚴", "[CICLISMO]"),
    ("🚵", "[MOUNTAIN BIKE]"),
    ("🤹", "[MALABARISMO]"),
    ("🎰", "[CAÇA NÍQUEL]"),
    ("🎳", "[BOLICHE]"),
    ("🎱", "[BILHAR]"),
];

/// Longest keys first so sequences with a variation selector win over a
/// bare prefix.
static ORDERED_TAGS: LazyLock<Vec<(&'static str, &'static str)>> = LazyLock::new(|| {
    let mut tags = EMOJI_TAGS.to_vec();
    tags.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    tags
});

/// Returns the tag for an emoji, if it is in the table.
pub fn emoji_tag(emoji: &str) -> Option<&'static str> {
    EMOJI_TAGS
        .iter()
        .find(|(key, _)| *key == emoji)
        .map(|(_, tag)| *tag)
}

/// Returns `true` for code points the document font can render.
pub fn is_renderable(c: char) -> bool {
    matches!(c as u32, 32..=126 | 160..=255 | 10 | 13)
}

/// Replaces known emoji with tags and blanks out anything else the font
/// cannot render.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if !c.is_ascii() {
            if let Some((key, tag)) = ORDERED_TAGS.iter().find(|(key, _)| rest.starts_with(key)) {
                out.push_str(tag);
                rest = &rest[key.len()..];
                continue;
            }
        }
        out.push(if is_renderable(c) { c } else { ' ' });
        rest = &rest[c.len_utf8()..];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_emoji() {
        assert_eq!(sanitize("Great 👍🔥"), "Great [OK][FOGO]");
        assert_eq!(sanitize("🎰"), "[CAÇA NÍQUEL]");
        assert_eq!(sanitize("✅ done"), "[OK] done");
    }

    #[test]
    fn test_variation_selector_sequences() {
        assert_eq!(sanitize("I ❤️ it"), "I [CORACAO] it");
        assert_eq!(sanitize("⚠️!"), "[ATENCAO]!");
        // bare heart without the selector is not in the table
        assert_eq!(sanitize("❤"), " ");
    }

    #[test]
    fn test_skin_tones_removed() {
        assert_eq!(sanitize("👋🏽"), "[OLA]");
        assert_eq!(sanitize("💪🏿💪"), "[FORCA][FORCA]");
    }

    #[test]
    fn test_unknown_characters_become_spaces() {
        assert_eq!(sanitize("🦀"), " ");
        assert_eq!(sanitize("Привет"), "      ");
        assert_eq!(sanitize("a\tb"), "a b");
        assert_eq!(sanitize("a\u{200E}b"), "a b");
    }

    #[test]
    fn test_latin1_and_newlines_kept() {
        let text = "Ação, café, Ñandú!\r\nlinha 2";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_ascii_passthrough() {
        let text = "Hello, World! ~{}[]|\\";
        assert_eq!(sanitize(text), text);
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_emoji_tag_lookup() {
        assert_eq!(emoji_tag("🔊"), Some("[AUDIO]"));
        assert_eq!(emoji_tag("📎"), Some("[ARQUIVO]"));
        assert_eq!(emoji_tag("🦀"), None);
    }

    #[test]
    fn test_table_tags_are_renderable() {
        for (_, tag) in EMOJI_TAGS {
            assert!(tag.chars().all(is_renderable), "tag {tag} not renderable");
        }
    }

    #[test]
    fn test_output_alphabet() {
        let out = sanitize("mixed 🦀 text 日本 👍 ünïcödé ✨");
        assert!(out.chars().all(is_renderable));
    }
}
