//! Numeric-aware, case- and accent-insensitive string collation.
//!
//! Strings are split into collation elements: each run of ASCII digits becomes one numeric
//! element compared by value, every other character is folded (canonical decomposition,
//! combining marks dropped, lowercased) and compared by class, then by rank within the class.
//! Classes order as whitespace/punctuation/symbols, then numbers, then letters. ASCII
//! whitespace and punctuation follow the CLDR root order (`_` < `-` < `,` < `.` < `@` ...);
//! other symbols follow them by code point.
//!
//! ```rust
//! use std::cmp::Ordering;
//! use rule_pipeline::rules::collation::collate;
//!
//! assert_eq!(collate("item2", "item10"), Ordering::Less);
//! assert_eq!(collate("Résumé", "resume"), Ordering::Equal);
//! ```

use std::cmp::Ordering;

use unicode_normalization::char::{decompose_canonical, is_combining_mark};

// CLDR root collation order of ASCII whitespace, punctuation and symbols.
const SYMBOL_ORDER: &str = "\t\n\u{b}\u{c}\r _-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

fn symbol_rank(c: char) -> u32 {
    match SYMBOL_ORDER.chars().position(|s| s == c) {
        Some(i) => i as u32,
        None => SYMBOL_ORDER.len() as u32 + u32::from(c),
    }
}

// Variant order is the class order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Element {
    Symbol(u32),
    // Digits are stored without leading zeros, so (len, digits) orders by numeric value.
    Number { len: usize, digits: String },
    Letter(char),
}

fn elements(s: &str) -> Vec<Element> {
    let mut out = Vec::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            let mut digits = String::new();
            if c != '0' {
                digits.push(c);
            }
            while let Some(&next) = chars.peek() {
                if !next.is_ascii_digit() {
                    break;
                }
                if !(digits.is_empty() && next == '0') {
                    digits.push(next);
                }
                chars.next();
            }
            out.push(Element::Number {
                len: digits.len(),
                digits,
            });
            continue;
        }

        decompose_canonical(c, |base| {
            if is_combining_mark(base) {
                return;
            }
            for folded in base.to_lowercase() {
                if folded.is_alphanumeric() {
                    out.push(Element::Letter(folded));
                } else {
                    out.push(Element::Symbol(symbol_rank(folded)));
                }
            }
        });
    }
    out
}

/// Compare two strings at base strength with numeric runs ordered by value.
///
/// Case and accents are ignored, so `"a"` and `"Á"` compare [`Ordering::Equal`]; digit runs
/// compare numerically, so `"item2"` sorts before `"item10"` and `"007"` equals `"7"`.
pub fn collate(a: &str, b: &str) -> Ordering {
    elements(a).cmp(&elements(b))
}
