//! Serde binding with column validators.
//!
//! Run with: cargo run --example struct_binding

use csv_dialect::{to_string, DialectConfig, Unmarshaler};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Employee {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Age")]
    age: u8,
    #[serde(rename = "Manager")]
    manager: Option<String>,
    #[serde(rename = "Remote")]
    remote: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let input = "\
Name,Age,Manager,Remote
Alice Johnson,41,,true
Bob Smith,29,Alice Johnson,F
";

    let unmarshaler = Unmarshaler::new(DialectConfig::default())
        .validator("required", |v| !v.is_empty())
        .validator("working_age", |v| {
            v.parse::<u8>().map_or(false, |age| (16..=80).contains(&age))
        })
        .validate("Name", ["required"])
        .validate("Age", ["required", "working_age"]);

    let staff: Vec<Employee> = unmarshaler.from_str(input)?;
    for employee in &staff {
        println!("{:?}", employee);
    }

    let text = to_string(&staff)?;
    println!("\nMarshaled:\n{}\n", text);

    match unmarshaler.from_str::<Employee>("Name,Age,Manager,Remote\nCarol,12,,false") {
        Ok(_) => println!("unexpectedly accepted"),
        Err(err) => println!("Rejected: {}", err),
    }

    Ok(())
}
