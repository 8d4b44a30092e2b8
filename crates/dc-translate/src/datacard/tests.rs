//! Tests for the datacard parser

use super::parse_str;
use dc_core::Error;

const SIMPLE: &str = include_str!("../../../../tests/fixtures/datacards/counting_simple.txt");
const TWO_BINS: &str = include_str!("../../../../tests/fixtures/datacards/two_bins_lnn.txt");
const BAD_OBS: &str = include_str!("../../../../tests/fixtures/datacards/bad_observation.txt");

#[test]
fn test_parse_simple_card() {
    let m = parse_str(SIMPLE).expect("parse counting_simple.txt");

    assert_eq!(m.bins(), 1);
    assert_eq!(m.processes(), 2);
    assert_eq!(m.nuisances(), 0);
    assert!(!m.has_observations());
    assert_eq!(m.expected(), &[vec![10.0, 5.0]]);
    assert!(m.systematics().is_empty());
}

#[test]
fn test_parse_two_bins_with_systematics() {
    let m = parse_str(TWO_BINS).expect("parse two_bins_lnn.txt");

    assert_eq!(m.bins(), 2);
    assert_eq!(m.processes(), 3);
    assert_eq!(m.nuisances(), 2);
    assert_eq!(m.observations(), &[12.0, 7.0]);
    assert_eq!(m.expected()[0], vec![2.5, 6.0, 3.5]);
    assert_eq!(m.expected()[1], vec![1.25, 4.0, 2.0]);

    // bin-major: the 4th scale cell belongs to bin 1, process 0
    assert_eq!(m.scale(0, 1, 0), 1.10);
    assert_eq!(m.scale(1, 0, 2), 0.95);
    // "-" means no effect
    assert_eq!(m.scale(1, 1, 0), 1.0);
}

#[test]
fn test_rate_stops_first_pass() {
    // The trailing bin/process pair sits in the systematics pass and is rejected there.
    let card = "imax 1\njmax 0\nkmax 0\nbin 1\nprocess 0\nrate 3\nbin 1\n";
    let err = parse_str(card).unwrap_err();
    assert!(matches!(err, Error::UnexpectedSystematic { line: 7, .. }), "got {err:?}");
}

#[test]
fn test_observation_count_mismatch() {
    let err = parse_str(BAD_OBS).unwrap_err();
    assert!(
        matches!(err, Error::ObservationCount { line: 4, found: 1, expected: 2 }),
        "got {err:?}"
    );
}

#[test]
fn test_bin_row_length_must_be_exact() {
    let card = "imax 2\njmax 1\nkmax 0\nbin 1 1 2\nprocess 0 1 0 1\nrate 1 2 3 4\n";
    let err = parse_str(card).unwrap_err();
    assert!(matches!(err, Error::BinRowLength { found: 3, expected: 4, .. }), "got {err:?}");
}

#[test]
fn test_bin_row_must_be_bin_major() {
    let card = "imax 2\njmax 1\nkmax 0\nbin 1 2 1 2\nprocess 0 1 0 1\nrate 1 2 3 4\n";
    let err = parse_str(card).unwrap_err();
    match err {
        Error::BinRowOrder { line, column, found, expected } => {
            assert_eq!(line, 4);
            assert_eq!(column, 2);
            assert_eq!(found, "2");
            assert_eq!(expected, 1);
        }
        other => panic!("expected BinRowOrder, got {other:?}"),
    }
}

#[test]
fn test_short_process_and_rate_rows() {
    let card = "imax 1\njmax 1\nkmax 0\nbin 1 1\nprocess 0\nrate 1 2\n";
    let err = parse_str(card).unwrap_err();
    assert!(matches!(err, Error::RowTooShort { row: "process", .. }), "got {err:?}");

    let card = "imax 1\njmax 1\nkmax 0\nbin 1 1\nprocess 0 1\nrate 1\n";
    let err = parse_str(card).unwrap_err();
    assert!(matches!(err, Error::RowTooShort { row: "rate", found: 1, expected: 2, .. }));
}

#[test]
fn test_longer_rate_row_is_truncated() {
    let card = "imax 1\njmax 1\nkmax 0\nbin 1 1\nprocess 0 1\nrate 1 2 99\n";
    let m = parse_str(card).unwrap();
    assert_eq!(m.expected(), &[vec![1.0, 2.0]]);
}

#[test]
fn test_missing_rate_line() {
    let err = parse_str("imax 1\njmax 0\nkmax 0\n").unwrap_err();
    assert!(matches!(err, Error::MissingRate));
}

#[test]
fn test_systematic_index_must_be_sequential() {
    let card = "imax 1\njmax 0\nkmax 2\nrate 5\n1 lnN 1.1\n3 lnN 1.2\n";
    let err = parse_str(card).unwrap_err();
    match err {
        Error::UnexpectedSystematic { line, found, expected } => {
            assert_eq!(line, 6);
            assert_eq!(found, "3");
            assert_eq!(expected, 2);
        }
        other => panic!("expected UnexpectedSystematic, got {other:?}"),
    }
}

#[test]
fn test_unsupported_pdf() {
    let card = "imax 1\njmax 0\nkmax 1\nrate 5\n1 gmN 1.1\n";
    let err = parse_str(card).unwrap_err();
    assert!(matches!(err, Error::UnsupportedPdf { line: 5, ref pdf } if pdf == "gmN"));
}

#[test]
fn test_short_systematic_row() {
    let card = "imax 1\njmax 1\nkmax 1\nrate 5 3\n1 lnN 1.1\n";
    let err = parse_str(card).unwrap_err();
    assert!(matches!(err, Error::RowTooShort { row: "systematic", found: 1, expected: 2, .. }));
}

#[test]
fn test_systematics_count_mismatch() {
    let card = "imax 1\njmax 0\nkmax 2\nrate 5\n1 lnN 1.1\n";
    let err = parse_str(card).unwrap_err();
    assert!(matches!(err, Error::SystematicsCount { found: 1, expected: 2 }));
}

#[test]
fn test_comments_and_blank_lines_in_systematics() {
    let card = "imax 1\njmax 0\nkmax 1\nrate 5\n\n-- comment\n# another\n--------\n1 lnN 1.3\n\n";
    let m = parse_str(card).unwrap();
    assert_eq!(m.nuisances(), 1);
    assert_eq!(m.scale(0, 0, 0), 1.3);
}

#[test]
fn test_invalid_numbers() {
    let err = parse_str("imax x\n").unwrap_err();
    assert!(matches!(err, Error::InvalidHeader { keyword: "imax", .. }));

    let err = parse_str("imax 1\njmax 0\nkmax 0\nrate abc\n").unwrap_err();
    assert!(matches!(err, Error::InvalidNumber { line: 4, ref token } if token == "abc"));
}

#[test]
fn test_header_defaults() {
    // Without imax/jmax/kmax the card is one bin, one process, no nuisances.
    let m = parse_str("rate 7\n").unwrap();
    assert_eq!((m.bins(), m.processes(), m.nuisances()), (1, 1, 0));
}

#[test]
fn test_imax_zero_is_rejected() {
    let err = parse_str("imax 0\njmax 0\nkmax 0\nrate 1\n").unwrap_err();
    match err {
        Error::InvalidHeader { line, keyword, token } => {
            assert_eq!(line, 1);
            assert_eq!(keyword, "imax");
            assert_eq!(token, "0");
        }
        other => panic!("expected InvalidHeader, got {other:?}"),
    }
}

#[test]
fn test_oversized_jmax_is_an_error() {
    let err = parse_str("imax 1\njmax 18446744073709551615\nrate 1\n").unwrap_err();
    assert!(matches!(err, Error::InvalidHeader { line: 2, keyword: "jmax", .. }), "got {err:?}");
}

#[test]
fn test_table_size_overflow_is_an_error() {
    let card = "imax 4294967296\njmax 4294967295\nprocess 0\nrate 1\n";
    let err = parse_str(card).unwrap_err();
    assert!(matches!(err, Error::InvalidHeader { line: 2, keyword: "jmax", .. }), "got {err:?}");

    // same product with jmax first: imax is the line that overflows
    let card = "jmax 4294967295\nimax 4294967296\nprocess 0\nrate 1\n";
    let err = parse_str(card).unwrap_err();
    assert!(matches!(err, Error::InvalidHeader { line: 2, keyword: "imax", .. }), "got {err:?}");
}

#[test]
fn test_non_finite_numbers_are_rejected() {
    let err = parse_str("imax 1\njmax 1\nkmax 0\nrate 1 nan\n").unwrap_err();
    assert!(matches!(err, Error::InvalidNumber { line: 4, ref token } if token == "nan"));

    let err = parse_str("imax 1\njmax 0\nkmax 0\nObservation inf\nrate 1\n").unwrap_err();
    assert!(matches!(err, Error::InvalidNumber { line: 4, ref token } if token == "inf"));

    let err = parse_str("imax 1\njmax 0\nkmax 1\nrate 1\n1 lnN -infinity\n").unwrap_err();
    assert!(matches!(err, Error::InvalidNumber { line: 5, ref token } if token == "-infinity"));
}
