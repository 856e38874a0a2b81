//! Plate canonicalisation: reduce noisy OCR text to a lookup key.
//!
//! Recognition services frequently echo the plate more than once —
//! `"AB123AB123"` for a plate photographed across a seam, or `"BBBB"` for a
//! character the OCR saw four times. The canonical form is the **minimal
//! repeating unit** of the first alphanumeric run in the text: `"AB123"`,
//! `"B"`. A token with no smaller period comes back unchanged.
//!
//! ## Known quirk: first token only
//!
//! Only the first alphanumeric run is ever examined. A plate preceded by a
//! noise token (say a vendor watermark) is therefore mis-canonicalised to
//! the noise token. This matches the behaviour the downstream data was
//! collected under, so it is kept deliberately; changing it would silently
//! re-key existing reports.

use once_cell::sync::Lazy;
use regex::Regex;

static ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").expect("valid literal regex"));

/// Reduce raw OCR text to a canonical plate, if any.
///
/// Scans for maximal alphanumeric runs, takes the **first** run, and returns
/// its smallest repeating unit: the shortest substring that, repeated,
/// reconstructs the run exactly. Candidate sizes are tried in ascending
/// order and, within a size, starting offsets in ascending order, so the
/// result is the first (and smallest) unit found. Size = length always
/// matches trivially, so a run with no smaller period is returned verbatim.
///
/// Returns `None` only when the text contains no letters or digits at all.
///
/// Pure and deterministic; no I/O, no shared state.
pub fn canonicalize(text: &str) -> Option<String> {
    let token = ALNUM_RUN.find(text)?.as_str();
    Some(minimal_period(token))
}

/// The smallest left-to-right repeating unit of a non-empty token.
fn minimal_period(token: &str) -> String {
    let bytes = token.as_bytes();
    let len = bytes.len();

    for size in 1..=len {
        for start in 0..=(len - size) {
            let unit = &bytes[start..start + size];
            if unit.repeat(len / size) == bytes {
                // Runs are pure ASCII by construction of ALNUM_RUN.
                return String::from_utf8_lossy(unit).into_owned();
            }
        }
    }

    // size == len, start == 0 always matches above.
    unreachable!("a token repeated once equals itself")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_single_char_collapses() {
        assert_eq!(canonicalize("AAAA").as_deref(), Some("A"));
    }

    #[test]
    fn repeated_pair_collapses() {
        assert_eq!(canonicalize("ABABAB").as_deref(), Some("AB"));
    }

    #[test]
    fn aperiodic_token_unchanged() {
        assert_eq!(canonicalize("ABCD").as_deref(), Some("ABCD"));
    }

    #[test]
    fn doubled_plate_collapses() {
        assert_eq!(canonicalize("ABC123ABC123").as_deref(), Some("ABC123"));
    }

    #[test]
    fn empty_input_is_absent() {
        assert_eq!(canonicalize(""), None);
    }

    #[test]
    fn pure_noise_is_absent() {
        assert_eq!(canonicalize("--- *** !!!"), None);
    }

    #[test]
    fn separators_split_runs() {
        // "AB-AB" is two runs, not one periodic token.
        assert_eq!(canonicalize("AB-AB").as_deref(), Some("AB"));
    }

    #[test]
    fn only_first_run_considered() {
        // The second run has a smaller period, but it is never examined.
        assert_eq!(canonicalize("AB12 CDCD").as_deref(), Some("AB12"));
    }

    #[test]
    fn leading_noise_chars_skipped_within_scan() {
        assert_eq!(canonicalize("  [ABC123]  ").as_deref(), Some("ABC123"));
    }

    #[test]
    fn case_preserved() {
        assert_eq!(canonicalize("abAB").as_deref(), Some("abAB"));
    }

    #[test]
    fn idempotent_on_minimal_forms() {
        for input in ["A", "AB", "ABCD", "ABC123", "B767", "xY9"] {
            let once = canonicalize(input).unwrap();
            let twice = canonicalize(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }
}
