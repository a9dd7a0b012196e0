use csv_dialect::{
    row, DialectBuilder, DialectConfig, DialectOption, Document, Error, Generator, Position,
    Preset, Row, Scanner, SyntaxKind,
};
use std::io::{BufReader, Cursor};

fn scan(input: &str, config: DialectConfig) -> Result<Vec<Row>, Error> {
    Scanner::from_str(input, config).scan_all().map(|d| d.rows)
}

fn generate(rows: &[Row], config: DialectConfig) -> String {
    let mut generator = Generator::new(config);
    generator.write_rows(rows).unwrap();
    String::from_utf8(generator.finish().unwrap()).unwrap()
}

#[test]
fn test_scan_standard_document() {
    let input = "aaa,bbb,ccc\n\"aaa\",\"b\nbb\",ccc\n";
    let rows = scan(input, DialectConfig::default()).unwrap();
    assert_eq!(rows, vec![row!["aaa", "bbb", "ccc"], row!["aaa", "b\nbb", "ccc"]]);
}

#[test]
fn test_scan_from_reader() {
    let input = Cursor::new(b"x,y\n; note\n1,2\n".to_vec());
    let mut scanner = Scanner::from_reader(input, DialectConfig::default());
    assert_eq!(scanner.scan_row().unwrap(), Some(row!["x", "y"]));
    assert_eq!(scanner.scan_row().unwrap(), Some(row!["1", "2"]));
    assert_eq!(scanner.scan_row().unwrap(), None);
}

#[test]
fn test_scan_from_buffered_reader() {
    let reader = BufReader::with_capacity(4, "a,\"long\nfield\",c".as_bytes());
    let mut scanner = Scanner::new(reader, DialectConfig::default());
    assert_eq!(scanner.scan_row().unwrap(), Some(row!["a", "long\nfield", "c"]));
}

#[test]
fn test_scan_from_slice() {
    let rows = Scanner::from_slice("é,ü".as_bytes(), DialectConfig::default())
        .scan_all()
        .unwrap()
        .rows;
    assert_eq!(rows, vec![row!["é", "ü"]]);
}

#[test]
fn test_header_document() {
    let config = DialectBuilder::new().with_header(true).build().unwrap();
    let document = Scanner::from_str("name,age\nAnn,31\nBob,40", config)
        .scan_all()
        .unwrap();
    assert_eq!(
        document,
        Document {
            header: Some(row!["name", "age"]),
            rows: vec![row!["Ann", "31"], row!["Bob", "40"]],
        }
    );

    let named = document.named_rows().unwrap();
    assert_eq!(named[1].get("name"), Some("Bob"));
    assert_eq!(named[1].get("age"), Some("40"));
}

#[test]
fn test_header_wrappers() {
    let config = DialectBuilder::new()
        .with_header_prefix('[')
        .with_header_suffix(']')
        .build()
        .unwrap();
    assert!(config.has_header());

    let document = Scanner::from_str("[name],[age]\nAnn,31", config)
        .scan_all()
        .unwrap();
    assert_eq!(document.header, Some(row!["name", "age"]));
    assert_eq!(document.rows, vec![row!["Ann", "31"]]);
}

#[test]
fn test_header_uses_field_wrappers_by_default() {
    let config = DialectBuilder::new()
        .with_header(true)
        .with_field_prefix('<')
        .with_field_suffix('>')
        .build()
        .unwrap();
    let document = Scanner::from_str("<a>,<b>\n<1>,<2>", config).scan_all().unwrap();
    assert_eq!(document.header, Some(row!["a", "b"]));
    assert_eq!(document.rows, vec![row!["1", "2"]]);
}

#[test]
fn test_document_without_header_has_no_named_rows() {
    let document = Scanner::from_str("a,b", DialectConfig::default())
        .scan_all()
        .unwrap();
    assert!(document.named_rows().is_none());
}

#[test]
fn test_iterator_collects_data_rows() {
    let config = DialectBuilder::new().with_header(true).build().unwrap();
    let scanner = Scanner::from_str("id\n1\n2\n3", config);
    let ids: Vec<String> = scanner
        .map(|row| row.map(|mut r| r.remove(0)))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn test_syntax_error_display() {
    let err = scan("a,b\nc,\"d", DialectConfig::default()).unwrap_err();
    assert_eq!(err.position(), Some(Position { line: 2, col: 4 }));
    assert_eq!(
        err.to_string(),
        "Syntax error at line 2, column 4: trailing quote not found"
    );
}

#[test]
fn test_expected_separator_error() {
    let err = scan("\"a\"b,c", DialectConfig::default()).unwrap_err();
    match err {
        Error::Syntax { line, col, kind } => {
            assert_eq!((line, col), (1, 3));
            assert_eq!(
                kind,
                SyntaxKind::ExpectedSeparator {
                    expected: ',',
                    found: 'b'
                }
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_prefix_error_position() {
    let config = DialectBuilder::new()
        .with_field_prefix('(')
        .with_field_suffix(')')
        .build()
        .unwrap();
    let err = scan("(a),(b)\n(c),d)", config).unwrap_err();
    match err {
        Error::Syntax { line, col, kind } => {
            assert_eq!((line, col), (2, 4));
            assert_eq!(kind, SyntaxKind::PrefixNotFound { expected: '(' });
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_config_rejects_conflicting_punctuation() {
    assert!(matches!(
        DialectBuilder::new().with_separator('"').build(),
        Err(Error::Config { .. })
    ));
    assert!(matches!(
        DialectBuilder::new().with_separator('\n').build(),
        Err(Error::Config { .. })
    ));
    assert!(matches!(
        DialectBuilder::new().with_comment('\'').build(),
        Err(Error::Config { .. })
    ));
    assert!(matches!(
        DialectBuilder::new()
            .with_field_prefix('|')
            .with_separator('|')
            .build(),
        Err(Error::Config { .. })
    ));
}

#[test]
fn test_single_quote_comment_allowed_once_single_quotes_are_disabled() {
    let config = DialectBuilder::new()
        .with_single_quote(false)
        .with_comment('\'')
        .build()
        .unwrap();
    let rows = scan("' note\na,b", config).unwrap();
    assert_eq!(rows, vec![row!["a", "b"]]);
}

#[test]
fn test_later_options_win() {
    let config = DialectConfig::from_options(&[
        DialectOption::Separator(';'),
        DialectOption::Separator('|'),
    ])
    .unwrap();
    assert_eq!(config.separator(), '|');

    let config = DialectBuilder::new()
        .preset(Preset::Strict)
        .with_empty_field(true)
        .build()
        .unwrap();
    assert!(config.allow_empty_field());
    assert!(!config.allow_single_quote());
}

#[test]
fn test_to_builder_derives_replacement() {
    let strict = DialectConfig::strict();
    let tabbed = strict.to_builder().with_separator('\t').build().unwrap();
    assert_eq!(tabbed.separator(), '\t');
    assert_eq!(strict.separator(), ',');
    assert!(!tabbed.allow_empty_field());
}

#[test]
fn test_generate_standard_document() {
    let rows = vec![row!["aaa", "bbb", "ccc"], row!["aaa", "b\nbb", "cc,c"]];
    assert_eq!(
        generate(&rows, DialectConfig::default()),
        "aaa,bbb,ccc\naaa,\"b\nbb\",\"cc,c\""
    );
}

#[test]
fn test_generate_then_scan_with_wrappers_and_header() {
    let config = DialectBuilder::new()
        .with_separator('\t')
        .with_header_prefix('{')
        .with_header_suffix('}')
        .with_field_prefix('(')
        .with_field_suffix(')')
        .with_leading_space_omitted(false)
        .with_trailing_space_omitted(false)
        .build()
        .unwrap();

    let header = row!["first name", "notes"];
    let rows = vec![
        row!["Ann", "likes (tea)"],
        row![" padded ", "tab\there"],
        row!["", "line\nbreak"],
    ];

    let mut generator = Generator::new(config.clone());
    generator.write_header(&header).unwrap();
    generator.write_rows(&rows).unwrap();
    let text = String::from_utf8(generator.finish().unwrap()).unwrap();
    assert!(text.starts_with("{first name}\t{notes}\n(Ann)\t(\"likes (tea)\")"));

    let document = Scanner::from_str(&text, config).scan_all().unwrap();
    assert_eq!(document.header, Some(header));
    assert_eq!(document.rows, rows);
}

#[test]
fn test_generate_into_writer() {
    let mut generator = Generator::new(DialectConfig::strict());
    generator.write_row(&["a", "", "c"]).unwrap();
    let mut out = Cursor::new(Vec::new());
    generator.finish_into(&mut out).unwrap();
    assert_eq!(out.into_inner(), b"a,\"\",c");
    assert!(matches!(generator.write_row(&["x"]), Err(Error::Sealed)));
}

#[test]
fn test_crlf_document() {
    let rows = scan("a,b\r\n\"c\r\nd\",e\r\n", DialectConfig::default()).unwrap();
    assert_eq!(rows, vec![row!["a", "b"], row!["c\r\nd", "e"]]);

    let text = generate(&rows, DialectConfig::default());
    assert_eq!(text, "a,b\n\"c\r\nd\",e");
    assert_eq!(scan(&text, DialectConfig::default()).unwrap(), rows);
}
