use std::env;
use std::fs;

use canonical::{normalize, CanonicalizeConfig};

fn main() {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: demo <file.py>");
        return;
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("cannot read {path}: {err}");
            return;
        }
    };

    let cfg = CanonicalizeConfig::default();
    match normalize(path.as_str(), &content, &cfg) {
        Ok(doc) => {
            println!("canonical: {}", doc.canonical_text);
            println!("masked identifiers: {}", doc.identifiers_masked);
            println!("parse failed: {}", doc.parse_failed);
        }
        Err(err) => eprintln!("normalization failed: {err}"),
    }
}
