//! # Ingredient Parser
//!
//! Splits a free-text ingredient line into an amount fragment and a name
//! fragment. Amounts are kept as raw text: no numeric parsing, no unit
//! conversion.
//!
//! ## Usage
//!
//! ```rust
//! use kochliste::ingredient_parser::parse_ingredient;
//!
//! let parsed = parse_ingredient("200g Mehl");
//! assert_eq!(parsed.amount, "200g");
//! assert_eq!(parsed.name, "Mehl");
//! ```

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

/// Leading amount (digits, separators, vulgar fractions), optional unit word,
/// mandatory whitespace, then the ingredient name.
pub const AMOUNT_PATTERN: &str = r"^([0-9.,½¼¾⅓⅔⅛⅜⅝⅞]+\s*[a-zA-ZäöüÄÖÜß().]*)\s+(.+)$";

lazy_static! {
    static ref AMOUNT_REGEX: Regex =
        Regex::new(AMOUNT_PATTERN).expect("Amount pattern should be valid");
}

/// An ingredient line split into its amount and name parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIngredient {
    /// Raw amount text including the unit (e.g. "200g", "½ TL"), empty if none
    pub amount: String,
    /// The ingredient name (e.g. "Mehl")
    pub name: String,
}

impl ParsedIngredient {
    /// Whether the line carried a leading amount
    pub fn has_amount(&self) -> bool {
        !self.amount.is_empty()
    }
}

/// Parse a single ingredient line
///
/// Lines that do not start with an amount (e.g. "Salz") yield an empty amount
/// and the whole trimmed line as the name.
pub fn parse_ingredient(line: &str) -> ParsedIngredient {
    if let Some(captures) = AMOUNT_REGEX.captures(line) {
        let parsed = ParsedIngredient {
            amount: captures[1].trim().to_string(),
            name: captures[2].trim().to_string(),
        };
        trace!("Parsed '{}' into amount='{}' name='{}'", line, parsed.amount, parsed.name);
        return parsed;
    }

    ParsedIngredient {
        amount: String::new(),
        name: line.trim().to_string(),
    }
}

/// Case-folded base name under which ingredients are grouped
pub fn grouping_key(base_name: &str) -> String {
    base_name.to_lowercase()
}
