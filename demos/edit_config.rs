//! Edit values and tables without losing comments.
//!
//! Run with: cargo run --example edit_config

use std::error::Error;

use toml_layout::{parse, Item, Kind, Value};

const CONFIG: &str = r#"# Service configuration
name = "billing"

[limits]
cpu = 1.5 # cores
zones = ["eu-1"]

[[workers]]
queue = "invoices"
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let mut doc = parse(CONFIG.as_bytes())?;

    // Existing entries keep their comments and position.
    doc.set("limits.cpu", 2.0)?;
    doc.add("limits.zones", "us-2")?;

    // Kinds are checked on assignment.
    if let Err(e) = doc.set("limits.cpu", "lots") {
        println!("rejected: {e}");
    }

    // New entries go after everything parsed so far.
    let mut debug = Item::from(Value::from(false));
    debug.comments.leading = Some("# flip to trace requests".into());
    doc.insert("limits.debug", debug);

    doc.push_table("workers")?.set("queue", "refunds")?;

    for (path, item) in doc.fetch("limits").iter() {
        println!("limits.{path} = {}", item.to_literal());
    }

    let (tables, arrays) = doc.table_names();
    println!("tables: {tables:?}, arrays of tables: {arrays:?}");

    let workers = doc.get("workers").map_or(0, Item::len);
    assert_eq!(workers, 2);
    assert_eq!(doc.get("limits.zones").and_then(|z| z.kind()), Some(Kind::StringArray));

    println!("\n{doc}");
    Ok(())
}
