use crate::models::chat::Language;
use once_cell::sync::Lazy;
use regex::Regex;

const SPANISH_WORDS: &[&str] = &[
    "hola",
    "gracias",
    "por favor",
    "buenos",
    "buenas",
    "dias",
    "tardes",
    "noches",
    "que",
    "como",
    "donde",
    "cuando",
    "porque",
    "pero",
    "para",
    "con",
    "sin",
    "muy",
    "el",
    "la",
    "los",
    "las",
    "del",
    "una",
    "uno",
    "yo",
    "tengo",
    "estoy",
    "tiene",
    "necesito",
    "quiero",
    "puedo",
    "ayuda",
    "dolor",
    "cabeza",
    "salud",
    "medico",
    "doctora",
    "hijo",
    "hija",
    "nino",
    "bebe",
    "fiebre",
    "embarazada",
];

static SPANISH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let words = SPANISH_WORDS.iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)[áéíóúüñ¿¡]|\b(?:{})\b", words)).expect(
        "spanish detection pattern must compile"
    )
});

/// Heuristic en/es classifier. A single accented character, inverted
/// punctuation mark or common Spanish word is enough to answer `Es`.
pub fn detect_language(text: &str) -> Language {
    if SPANISH_PATTERN.is_match(text) { Language::Es } else { Language::En }
}
