//! Property-based tests for the generator/scanner round trip.
//!
//! Fields are drawn from an alphabet dense in separators, quote characters,
//! comment characters, whitespace and line terminators so that every quoting
//! rule gets exercised. Trimming is turned off: it is lossy.

use csv_dialect::{DialectBuilder, DialectConfig, Generator, Row, Scanner};
use proptest::prelude::*;

const ALPHABET: &[char] = &[
    'a', 'b', 'Z', '0', ' ', '\t', ',', ';', '|', '"', '\'', '\n', '\r', '(', ')', 'é',
];

fn field() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ALPHABET), 0..8)
        .prop_map(|chars| chars.into_iter().collect())
}

fn rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(prop::collection::vec(field(), 1..5), 0..6)
}

fn untrimmed(builder: DialectBuilder) -> DialectConfig {
    builder
        .with_leading_space_omitted(false)
        .with_trailing_space_omitted(false)
        .build()
        .unwrap()
}

fn generate(rows: &[Row], config: &DialectConfig) -> String {
    let mut generator = Generator::new(config.clone());
    generator.write_rows(rows).unwrap();
    String::from_utf8(generator.finish().unwrap()).unwrap()
}

fn roundtrip(rows: &[Row], config: &DialectConfig) -> bool {
    let text = generate(rows, config);
    match Scanner::from_str(&text, config.clone()).scan_all() {
        Ok(document) => document.rows == rows,
        Err(e) => {
            eprintln!("Scan failed: {}", e);
            eprintln!("Generated was: {:?}", text);
            false
        }
    }
}

proptest! {
    #[test]
    fn prop_roundtrip_default(rows in rows()) {
        let config = untrimmed(DialectBuilder::new());
        prop_assert!(roundtrip(&rows, &config));
    }

    #[test]
    fn prop_roundtrip_strict(rows in rows()) {
        prop_assert!(roundtrip(&rows, &DialectConfig::strict()));
    }

    #[test]
    fn prop_roundtrip_pipe_without_empty_lines_skipped(rows in rows()) {
        let config = untrimmed(
            DialectBuilder::new()
                .with_separator('|')
                .with_empty_lines_omitted(false)
                .with_trailing_line_break(false),
        );
        prop_assert!(roundtrip(&rows, &config));
    }

    #[test]
    fn prop_roundtrip_wrapped(rows in rows()) {
        let config = untrimmed(
            DialectBuilder::new()
                .with_field_prefix('(')
                .with_field_suffix(')')
                .with_empty_field(false),
        );
        prop_assert!(roundtrip(&rows, &config));
    }

    #[test]
    fn prop_quoting_only_when_needed(text in field()) {
        prop_assume!(!text.is_empty());
        let config = DialectConfig::default();
        let output = generate(&[vec!["x".to_string(), text.clone()]], &config);
        let special = text.contains(|c: char| matches!(c, ',' | '"' | '\'' | '\n' | '\r'));
        prop_assert_eq!(output == format!("x,{}", text), !special);
    }

    #[test]
    fn prop_doubled_quotes_survive(n in 0usize..6, filler in "[a-z]{0,3}") {
        let text: String = std::iter::repeat(format!("{}\"", filler)).take(n).collect();
        let config = DialectConfig::strict();
        let output = generate(&[vec![text.clone()]], &config);
        if n > 0 {
            prop_assert_eq!(output.matches('"').count(), 2 * n + 2);
        }
        let document = Scanner::from_str(&output, config).scan_all().unwrap();
        prop_assert_eq!(document.rows, vec![vec![text]]);
    }
}
