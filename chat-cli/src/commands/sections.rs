//! Split a listing description into display sections.

use chat_core::{parse_sections, DEFAULT_DELIMITER};

/// Run the sections command.
pub fn run(description: &str, delimiter: Option<char>) {
    let sections = parse_sections(description, delimiter.unwrap_or(DEFAULT_DELIMITER));

    if sections.is_empty() {
        println!("(no description)");
        return;
    }

    for section in sections {
        match section.label {
            Some(label) => println!("{}\n  {}", label, section.body),
            None => println!("  {}", section.body),
        }
    }
}
