use csv_dialect::{row, DialectConfig, Generator, Row};

#[test]
fn test_row_macro_empty() {
    let empty: Row = row![];
    assert_eq!(empty, Vec::<String>::new());
}

#[test]
fn test_row_macro_strings() {
    let row = row!["a", String::from("b"), 'c'];
    assert_eq!(row, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
}

#[test]
fn test_row_macro_numbers_and_bools() {
    assert_eq!(row![42, -7, 3.5, true], vec!["42", "-7", "3.5", "true"]);
}

#[test]
fn test_row_macro_expressions() {
    let base = 10;
    let name = "item";
    assert_eq!(
        row![base * 2, format!("{}-{}", name, base), name.len()],
        vec!["20", "item-10", "4"]
    );
}

#[test]
fn test_row_macro_feeds_generator() {
    let mut generator = Generator::new(DialectConfig::default());
    generator.write_row(&row!["id", "label"]).unwrap();
    generator.write_row(&row![1, "a, b"]).unwrap();
    let text = String::from_utf8(generator.finish().unwrap()).unwrap();
    assert_eq!(text, "id,label\n1,\"a, b\"");
}
