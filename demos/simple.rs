//! Scanning and generating with the default dialect.
//!
//! Run with: cargo run --example simple

use csv_dialect::{DialectConfig, Generator, Scanner};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let input = "\
; fruit inventory
name, color ,notes
apple,red,\"crisp, sweet\"

'pear',green,\"said \"\"ripe\"\"\"
banana,yellow,\"long
and curved\"
";

    let document = Scanner::from_str(input, DialectConfig::default()).scan_all()?;
    for (i, row) in document.rows.iter().enumerate() {
        println!("row {}: {:?}", i + 1, row);
    }

    let mut generator = Generator::new(DialectConfig::default());
    generator.write_rows(&document.rows)?;
    let output = String::from_utf8(generator.finish()?)?;
    println!("\nGenerated:\n{}", output);

    let again = Scanner::from_str(&output, DialectConfig::default()).scan_all()?;
    assert_eq!(again.rows, document.rows);
    println!("\n✓ Round-trip successful");

    Ok(())
}
