//! Parse a commented configuration and write it back out.
//!
//! Run with: cargo run --example round_trip

use std::error::Error;

use toml_layout::{parse, to_string_with_options, FormatOptions, Indent};

const CONFIG: &str = r#"# Deployment settings
title = "staging"

[server] # front door
port = 8080
hosts = [
	"alpha", # primary
	"omega",
]

[[replicas]]
region = "eu"

[[replicas]]
region = "us" # newest

# end of file
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let doc = parse(CONFIG.as_bytes())?;

    println!("Formatted with tabs:\n{doc}");

    let spaces = FormatOptions::new().with_indent(Indent::Spaces(2));
    println!("Formatted with two spaces:\n{}", to_string_with_options(&doc, &spaces));

    let bare = FormatOptions::new().with_comments(false);
    println!("Without comments:\n{}", to_string_with_options(&doc, &bare));

    // formatting is stable
    let again = parse(doc.to_string().as_bytes())?;
    assert_eq!(again.to_string(), doc.to_string());
    println!("✓ Round-trip is stable");

    Ok(())
}
