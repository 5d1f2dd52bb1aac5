// ==========================================
// PipeTrak Progress Engine - nominal size parser
// ==========================================
// Responsibility: convert the free-text nominal-diameter field into a
// ParsedSize. Pure function, no I/O, never panics: malformed input always
// degrades to Unparseable so a bad size on one component can never block
// budget distribution for the whole project.
// ==========================================
// Accepted forms, in match order:
//   ""            -> NoSize
//   "NOSIZE"      -> NoSize (sentinel, case-insensitive)
//   "<A>X<B>"     -> Reducer (case-insensitive X separator, e.g. "2X4")
//   "HALF"        -> Diameter 0.5 (legacy import token)
//   "<num>/<den>" -> Diameter num/den
//   "<decimal>"   -> Diameter
//   anything else -> Unparseable
// ==========================================

use crate::domain::component::ParsedSize;

/// Sentinel used by takeoff imports for deliberately size-less items
pub const NO_SIZE_SENTINEL: &str = "NOSIZE";

/// Parse a raw nominal-diameter string
pub fn parse(raw: &str) -> ParsedSize {
    let text = raw.trim();

    // Rule 1: empty or explicit sentinel
    if text.is_empty() || text.eq_ignore_ascii_case(NO_SIZE_SENTINEL) {
        return ParsedSize::NoSize;
    }

    // Rule 2: reducer pattern "<A>X<B>" (both halves must parse)
    if let Some((a, b)) = split_reducer(text) {
        match (parse_single(a), parse_single(b)) {
            (Some(first), Some(second)) => return ParsedSize::Reducer { first, second },
            _ => return ParsedSize::Unparseable { raw: raw.to_string() },
        }
    }

    // Rules 3-5: single diameter
    match parse_single(text) {
        Some(inches) => ParsedSize::Diameter { inches },
        None => ParsedSize::Unparseable { raw: raw.to_string() },
    }
}

/// Split on a single reducer separator, rejecting ambiguous inputs like "2X4X6"
fn split_reducer(text: &str) -> Option<(&str, &str)> {
    let mut parts = text.splitn(2, |c| c == 'x' || c == 'X');
    let a = parts.next()?;
    let b = parts.next()?;
    if a.is_empty() || b.is_empty() || b.contains(['x', 'X']) {
        return None;
    }
    Some((a, b))
}

/// Parse one diameter token: "HALF", a simple fraction, or a plain decimal
fn parse_single(token: &str) -> Option<f64> {
    let token = token.trim();

    // Rule 3: legacy "HALF" token
    if token.eq_ignore_ascii_case("HALF") {
        return Some(0.5);
    }

    // Rule 4: simple fraction "<num>/<den>"
    if let Some((num, den)) = token.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        return sanitize(num / den);
    }

    // Rule 5: plain decimal
    sanitize(token.parse().ok()?)
}

/// A diameter must be a finite positive number; anything else degrades
fn sanitize(value: f64) -> Option<f64> {
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}
