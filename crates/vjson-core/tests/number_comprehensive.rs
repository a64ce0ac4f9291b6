//! Comprehensive tests for number formatting and parsing
//!
//! Coverage targets:
//! - Positional versus scientific layout thresholds
//! - Shortest round-trip digits
//! - Fast and slow parse paths agreeing with the standard library
//! - Grammar offsets

use proptest::prelude::*;
use vjson_rs::number::{Buffer, NumberKind, check_grammar, format_f64, parse_f64, parse_i64};

// ============================================================================
// Formatting
// ============================================================================

#[test]
fn test_integral_values_keep_point_zero() {
    assert_eq!(format_f64(0.0), "0.0");
    assert_eq!(format_f64(1.0), "1.0");
    assert_eq!(format_f64(-42.0), "-42.0");
    assert_eq!(format_f64(1e15), "1000000000000000.0");
    assert_eq!(format_f64(9999999999999998.0), "9999999999999998.0");
}

#[test]
fn test_scientific_threshold_high() {
    assert_eq!(format_f64(1e16), "1e+16");
    assert_eq!(format_f64(1.5e16), "1.5e+16");
    assert_eq!(format_f64(1e100), "1e+100");
    assert_eq!(format_f64(f64::MAX), "1.7976931348623157e+308");
}

#[test]
fn test_scientific_threshold_low() {
    assert_eq!(format_f64(0.0001), "0.0001");
    assert_eq!(format_f64(0.00012), "0.00012");
    assert_eq!(format_f64(0.00001), "1e-05");
    assert_eq!(format_f64(1.25e-7), "1.25e-07");
    assert_eq!(format_f64(5e-324), "5e-324");
}

#[test]
fn test_shortest_digits() {
    assert_eq!(format_f64(0.1 + 0.2), "0.30000000000000004");
    assert_eq!(format_f64(1.0 / 3.0), "0.3333333333333333");
    assert_eq!(format_f64(321321432.23154324), "321321432.23154324");
    assert_eq!(format_f64(-0.0), "-0.0");
}

#[test]
fn test_non_finite_spelling() {
    let mut buf = Buffer::new();
    assert_eq!(buf.format(f64::NAN), "NaN");
    assert_eq!(buf.format(f64::INFINITY), "Infinity");
    assert_eq!(buf.format(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn test_buffer_reuse() {
    let mut buf = Buffer::new();
    assert_eq!(buf.format(1.7976931348623157e308), "1.7976931348623157e+308");
    assert_eq!(buf.format(2.5), "2.5");
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_grammar_kinds() {
    assert_eq!(check_grammar(b"0"), Ok(NumberKind::Integer));
    assert_eq!(check_grammar(b"-12"), Ok(NumberKind::Integer));
    assert_eq!(check_grammar(b"1.0"), Ok(NumberKind::Decimal));
    assert_eq!(check_grammar(b"1e3"), Ok(NumberKind::Decimal));
    assert_eq!(check_grammar(b"-0.5E+2"), Ok(NumberKind::Decimal));
}

#[test]
fn test_grammar_offsets() {
    assert_eq!(check_grammar(b"01"), Err(1));
    assert_eq!(check_grammar(b"1."), Err(2));
    assert_eq!(check_grammar(b"-"), Err(1));
    assert_eq!(check_grammar(b"1e+"), Err(3));
    assert_eq!(check_grammar(b"1-2"), Err(1));
}

#[test]
fn test_parse_i64_overflow() {
    assert_eq!(parse_i64(b"9223372036854775807"), Some(i64::MAX));
    assert_eq!(parse_i64(b"-9223372036854775808"), Some(i64::MIN));
    assert_eq!(parse_i64(b"9223372036854775808"), None);
    assert_eq!(parse_i64(b"-9223372036854775809"), None);
}

#[test]
fn test_parse_f64_hard_cases() {
    let cases = [
        "2.2250738585072011e-308",
        "2.2250738585072012e-308",
        "9007199254740993",
        "0.1",
        "1e23",
        "8.98846567431158e307",
        "4.9406564584124654e-324",
        "179769313486231580793728971405301e276",
    ];
    for text in cases {
        let expected: f64 = text.parse().unwrap();
        assert_eq!(parse_f64(text.as_bytes()), Some(expected), "{text}");
    }
    assert_eq!(parse_f64(b"1.5x"), None);
}

proptest! {
    #[test]
    fn prop_format_round_trips(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        prop_assume!(value.is_finite());
        let text = format_f64(value);
        let back: f64 = text.parse().unwrap();
        prop_assert_eq!(back.to_bits(), value.to_bits());
    }

    #[test]
    fn prop_parse_matches_std(mantissa in any::<i64>(), exponent in -30i32..30) {
        let text = format!("{mantissa}e{exponent}");
        let expected: f64 = text.parse().unwrap();
        prop_assert_eq!(parse_f64(text.as_bytes()), Some(expected));
    }

    #[test]
    fn prop_decimal_matches_std(int in 0u32..1_000_000, frac in 0u32..1_000_000) {
        let text = format!("{int}.{frac:06}");
        let expected: f64 = text.parse().unwrap();
        prop_assert_eq!(parse_f64(text.as_bytes()), Some(expected));
    }
}
