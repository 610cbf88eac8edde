//! Voice transcript parsing. A single-pass parser walks an ordered
//! per-language rule table; each rule is a regex plus the field it extracts.
//! Matched fragments are cut out of the working text and whatever remains is
//! the item name. The transcript itself comes from an external speech API and
//! is treated as opaque text, same as typed input.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Some(Language::English),
            "es" | "es-es" | "es-mx" => Some(Language::Spanish),
            _ => None,
        }
    }
}

/// Fields a single rule can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extract {
    /// Capture 1 is a numeric quantity.
    Quantity,
    /// Capture 1 is a spelled-out quantity ("two", "dos").
    QuantityWord,
    /// Capture 1 is a decimal price.
    Price,
    /// Captures 1 and 2 are whole euros and cents ("2 euros con 50").
    PriceWithCents,
    /// Capture 1 is a weight in kilos.
    WeightKilos,
    /// Capture 1 is a weight in grams.
    WeightGrams,
    /// Fixed half-kilo phrase, no capture.
    WeightHalfKilo,
    /// Command verbs, articles and politeness; matched text is dropped.
    Filler,
}

struct VoiceRule {
    pattern: Regex,
    extract: Extract,
}

impl VoiceRule {
    fn new(pattern: &str, extract: Extract) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("invalid voice grammar pattern"),
            extract,
        }
    }
}

struct VoiceGrammar {
    rules: Vec<VoiceRule>,
}

/// What the parser extracted from one transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedVoiceItem {
    pub name: String,
    pub quantity: u32,
    /// Unit price, when the transcript stated one.
    pub price: Option<f64>,
    /// Weight in kilograms, when the transcript used weight instead of count.
    pub weight_kg: Option<f64>,
}

static ENGLISH_GRAMMAR: Lazy<VoiceGrammar> = Lazy::new(|| VoiceGrammar {
    rules: vec![
        // Weights before counts so "2 kilos of rice" is not read as quantity 2.
        VoiceRule::new(
            r"\b(\d+(?:[.,]\d+)?)\s*(?:kilos?|kilograms?|kg)\s+of\s+",
            Extract::WeightKilos,
        ),
        VoiceRule::new(r"\b(\d+)\s*(?:grams?|gr?)\s+of\s+", Extract::WeightGrams),
        VoiceRule::new(r"\bhalf\s+a\s+kilo\s+of\s+", Extract::WeightHalfKilo),
        VoiceRule::new(
            r"\b(\d+)\s+(?:bottles?|cartons?|cans?|boxes|box|packs?|bags?|loaves|loaf|units?)\s+of\s+",
            Extract::Quantity,
        ),
        VoiceRule::new(
            r"\b(one|two|three|four|five|six|seven|eight|nine|ten)\s+(?:bottles?|cartons?|cans?|boxes|box|packs?|bags?|loaves|loaf|units?)\s+of\s+",
            Extract::QuantityWord,
        ),
        VoiceRule::new(r"^\s*(\d+)\s+", Extract::Quantity),
        VoiceRule::new(
            r"^\s*(one|two|three|four|five|six|seven|eight|nine|ten)\s+",
            Extract::QuantityWord,
        ),
        VoiceRule::new(
            r"\b(?:for|at)\s+(\d+(?:[.,]\d{1,2})?)\s*(?:euros?|dollars?|bucks?|€|\$)",
            Extract::Price,
        ),
        VoiceRule::new(
            r"\b(\d+(?:[.,]\d{1,2})?)\s*(?:euros?|dollars?|bucks?|€|\$)\s+each\b",
            Extract::Price,
        ),
        VoiceRule::new(
            r"^\s*(?:add|buy|get|put|i\s+need|we\s+need)(?:\s+|$)",
            Extract::Filler,
        ),
        VoiceRule::new(r"^\s*(?:some|a|an|the)\s+", Extract::Filler),
        VoiceRule::new(r"\s*\bplease\b", Extract::Filler),
    ],
});

static SPANISH_GRAMMAR: Lazy<VoiceGrammar> = Lazy::new(|| VoiceGrammar {
    rules: vec![
        VoiceRule::new(
            r"\b(\d+(?:[.,]\d+)?)\s*(?:kilos?|kg)\s+de\s+",
            Extract::WeightKilos,
        ),
        VoiceRule::new(r"\b(\d+)\s*gramos?\s+de\s+", Extract::WeightGrams),
        VoiceRule::new(r"\bmedio\s+kilo\s+de\s+", Extract::WeightHalfKilo),
        VoiceRule::new(
            r"\b(\d+)\s+(?:botellas?|cartones?|latas?|cajas?|paquetes?|bolsas?|barras?|unidades?)\s+de\s+",
            Extract::Quantity,
        ),
        VoiceRule::new(
            r"\b(una?|uno|dos|tres|cuatro|cinco|seis|siete|ocho|nueve|diez)\s+(?:botellas?|cartones?|latas?|cajas?|paquetes?|bolsas?|barras?|unidades?)\s+de\s+",
            Extract::QuantityWord,
        ),
        VoiceRule::new(r"^\s*(\d+)\s+", Extract::Quantity),
        VoiceRule::new(
            r"^\s*(dos|tres|cuatro|cinco|seis|siete|ocho|nueve|diez)\s+",
            Extract::QuantityWord,
        ),
        VoiceRule::new(
            r"(?:\bque\s+cuestan?\s+|\bpor\s+|\ba\s+)?\b(\d+)\s+euros?\s+con\s+(\d{1,2})\b",
            Extract::PriceWithCents,
        ),
        VoiceRule::new(
            r"\b(?:por|a)\s+(\d+(?:[.,]\d{1,2})?)\s*(?:euros?|€)",
            Extract::Price,
        ),
        VoiceRule::new(
            r"\bque\s+cuestan?\s+(\d+(?:[.,]\d{1,2})?)\s*(?:euros?|€)?",
            Extract::Price,
        ),
        VoiceRule::new(
            r"^\s*(?:añade|añadir|agrega|apunta|compra|pon|necesito|quiero)(?:\s+|$)",
            Extract::Filler,
        ),
        VoiceRule::new(r"^\s*(?:un|una|unos|unas|el|la|los|las)\s+", Extract::Filler),
        VoiceRule::new(r"\s*\bpor\s+favor\b", Extract::Filler),
    ],
});

fn grammar_for(language: Language) -> &'static VoiceGrammar {
    match language {
        Language::English => &ENGLISH_GRAMMAR,
        Language::Spanish => &SPANISH_GRAMMAR,
    }
}

fn word_to_number(word: &str) -> Option<u32> {
    let value = match word {
        "one" | "un" | "uno" | "una" => 1,
        "two" | "dos" => 2,
        "three" | "tres" => 3,
        "four" | "cuatro" => 4,
        "five" | "cinco" => 5,
        "six" | "seis" => 6,
        "seven" | "siete" => 7,
        "eight" | "ocho" => 8,
        "nine" | "nueve" => 9,
        "ten" | "diez" => 10,
        _ => return None,
    };
    Some(value)
}

fn parse_decimal(text: &str) -> Option<f64> {
    text.replace(',', ".").parse::<f64>().ok()
}

/// Run the grammar over a transcript. Returns `None` when nothing resembling
/// an item name is left after extraction.
pub fn parse_transcript(transcript: &str, language: Language) -> Option<ParsedVoiceItem> {
    let grammar = grammar_for(language);
    let mut text = transcript.trim().to_lowercase();
    let mut quantity: Option<u32> = None;
    let mut price: Option<f64> = None;
    let mut weight_kg: Option<f64> = None;

    for rule in &grammar.rules {
        let (range, first, second) = match rule.pattern.captures(&text) {
            Some(caps) => {
                let whole = caps.get(0).expect("capture 0 always present");
                (
                    whole.range(),
                    caps.get(1).map(|m| m.as_str().to_string()),
                    caps.get(2).map(|m| m.as_str().to_string()),
                )
            }
            None => continue,
        };

        match rule.extract {
            Extract::Quantity => {
                if quantity.is_none() {
                    quantity = first.as_deref().and_then(|s| s.parse::<u32>().ok());
                }
            }
            Extract::QuantityWord => {
                if quantity.is_none() {
                    quantity = first.as_deref().and_then(word_to_number);
                }
            }
            Extract::Price => {
                if price.is_none() {
                    price = first.as_deref().and_then(parse_decimal);
                }
            }
            Extract::PriceWithCents => {
                if price.is_none() {
                    let euros = first.as_deref().and_then(|s| s.parse::<u32>().ok());
                    let cents = second.as_deref().and_then(|s| s.parse::<u32>().ok());
                    if let (Some(e), Some(c)) = (euros, cents) {
                        price = Some(e as f64 + c as f64 / 100.0);
                    }
                }
            }
            Extract::WeightKilos => {
                if weight_kg.is_none() {
                    weight_kg = first.as_deref().and_then(parse_decimal);
                }
            }
            Extract::WeightGrams => {
                if weight_kg.is_none() {
                    weight_kg = first
                        .as_deref()
                        .and_then(parse_decimal)
                        .map(|grams| grams / 1000.0);
                }
            }
            Extract::WeightHalfKilo => {
                if weight_kg.is_none() {
                    weight_kg = Some(0.5);
                }
            }
            Extract::Filler => {}
        }

        text.replace_range(range, " ");
    }

    let name = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return None;
    }

    Some(ParsedVoiceItem {
        name: capitalize_first(&name),
        quantity: quantity.unwrap_or(1),
        price,
        weight_kg,
    })
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
