//! Read a document into typed structs.
//!
//! Run with: cargo run --example bind_struct

use std::collections::BTreeMap;
use std::error::Error;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use toml_layout::{from_document, parse};

#[derive(Debug, Deserialize)]
struct Config {
    title: String,
    released: DateTime<Utc>,
    servers: BTreeMap<String, Server>,
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Server {
    ip: String,
    ports: Vec<u16>,
}

#[derive(Debug, Deserialize)]
struct Product {
    name: String,
    sku: u64,
    color: Option<String>,
}

const INPUT: &str = r#"title = "inventory"
released = 2014-01-02T15:04:05Z

[servers.alpha]
ip = "10.0.0.1"
ports = [8001, 8002]

[servers.beta]
ip = "10.0.0.2"
ports = [9001]

[[products]]
name = "Hammer"
sku = 738594937

[[products]]
name = "Nail"
sku = 284758393
color = "gray"
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let doc = parse(INPUT.as_bytes())?;
    let config: Config = from_document(&doc)?;

    println!("{} (released {})", config.title, config.released);
    for (name, server) in &config.servers {
        println!("  {name}: {} on {:?}", server.ip, server.ports);
    }
    for product in &config.products {
        let color = product.color.as_deref().unwrap_or("plain");
        println!("  #{} {} ({color})", product.sku, product.name);
    }

    Ok(())
}
