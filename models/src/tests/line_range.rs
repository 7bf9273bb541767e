use crate::{CodeSection, LineRange};

#[test]
fn given_dash_separated_range_when_parsed_then_returns_start_and_end() {
    let range: LineRange = "10-20".parse().unwrap();

    assert_eq!(range, LineRange { start: 10, end: 20 });
    assert_eq!(range.to_string(), "10-20");
    assert_eq!(range.line_count(), 11);
}

#[test]
fn given_single_line_when_parsed_then_start_equals_end() {
    let range: LineRange = " 42 ".parse().unwrap();

    assert_eq!(range, LineRange::single(42));
}

/// **VALUE**: Verifies inverted and zero-based ranges are normalized instead of rejected.
///
/// **WHY THIS MATTERS**: Models occasionally write "20-10" or "0-5". These must not crash
/// tree assembly or produce a navigation range that ends before it starts.
///
/// **BUG THIS CATCHES**: Would catch removal of the swap/raise in `LineRange::new`.
#[test]
fn given_inverted_or_zero_range_when_parsed_then_normalized() {
    let inverted: LineRange = "20-10".parse().unwrap();
    let zero: LineRange = "0-5".parse().unwrap();

    assert_eq!(inverted, LineRange { start: 10, end: 20 });
    assert_eq!(zero, LineRange { start: 1, end: 5 });
}

#[test]
fn given_prefixed_and_en_dash_range_when_parsed_then_accepted() {
    let range: LineRange = "L3 \u{2013} L7".parse().unwrap();

    assert_eq!(range, LineRange { start: 3, end: 7 });
}

#[test]
fn given_non_numeric_range_when_parsed_then_returns_error() {
    assert!("ten-twenty".parse::<LineRange>().is_err());
    assert!("".parse::<LineRange>().is_err());
    assert!("5-".parse::<LineRange>().is_err());
}

#[test]
fn given_range_beyond_file_when_clamped_then_stays_within_file() {
    let range = LineRange::new(90, 120);

    assert_eq!(range.clamp_to(100), LineRange { start: 90, end: 100 });
    assert_eq!(range.clamp_to(50), LineRange { start: 50, end: 50 });
    assert_eq!(range.clamp_to(0), LineRange { start: 1, end: 1 });
}

#[test]
fn given_code_section_when_serialized_then_lines_is_a_string() {
    let section = CodeSection {
        line_range: LineRange::new(10, 20),
        code: String::from("fn parse() {}"),
        explanation: String::from("parses input"),
    };

    let json = serde_json::to_value(&section).unwrap();

    assert_eq!(json["lines"], "10-20");
    assert_eq!(json["explanation"], "parses input");
}
