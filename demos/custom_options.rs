//! Building dialects and reading syntax errors.
//!
//! Run with: cargo run --example custom_options

use csv_dialect::{
    DialectBuilder, DialectConfig, DialectOption, Error as DialectError, Generator, Preset,
    Scanner,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Bracketed fields separated by pipes, with a header
    let bracketed = DialectBuilder::new()
        .with_separator('|')
        .with_field_prefix('[')
        .with_field_suffix(']')
        .with_header(true)
        .build()?;

    let document = Scanner::from_str("[id]|[label]\n[1]|[\"a|b\"]\n[2]|[c]", bracketed.clone())
        .scan_all()?;
    println!("Header: {:?}", document.header);
    println!("Rows:   {:?}\n", document.rows);

    let mut generator = Generator::new(bracketed);
    generator.write_header(&["id", "label"])?;
    generator.write_row(&["3", "d]e"])?;
    println!("Bracketed output:\n{}\n", String::from_utf8(generator.finish()?)?);

    // The same dialect from an ordered override list: later options win
    let tabbed = DialectConfig::from_options(&[
        DialectOption::Separator(';'),
        DialectOption::AllowComment(false),
        DialectOption::Separator('\t'),
    ])?;
    println!("Tab separated: {:?}\n", Scanner::from_str("a\tb", tabbed).scan_all()?.rows);

    // Strict preset, relaxed afterwards
    let relaxed = DialectBuilder::new()
        .preset(Preset::Strict)
        .with_empty_field(true)
        .build()?;
    println!("Relaxed strict: {:?}", Scanner::from_str("a,,c", relaxed).scan_all()?.rows);

    // Conflicting punctuation is rejected up front
    if let Err(err) = DialectBuilder::new().with_separator('"').build() {
        println!("Rejected dialect: {}", err);
    }

    // Syntax errors name the line and column
    for input in ["a,,c", "a,'b\nc", "\"a\"x"] {
        match Scanner::from_str(input, DialectConfig::strict()).scan_all() {
            Ok(document) => println!("{:?} -> {:?}", input, document.rows),
            Err(err @ DialectError::Syntax { .. }) => println!("{:?} -> {}", input, err),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
