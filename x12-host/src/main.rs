//! X12 file parser host application.
//!
//! Parses a single interchange file against the illustrative 005010
//! catalog (`x12_schema::static_005010_catalog`), reporting structural
//! and envelope-validation errors. Real deployments substitute their own
//! `SchemaCatalog` built from a published implementation guide.

use std::env;
use std::process;

use tracing::{error, info};

use x12_host::ChunkedParser;
use x12_schema::SchemaCatalog;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = match env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("usage: x12-parse <file.x12>");
            process::exit(1);
        }
    };

    let catalog = x12_schema::static_005010_catalog();
    let root = catalog
        .interchange_def("005010")
        .expect("the illustrative catalog always registers 005010");

    let mut parser = ChunkedParser::with_default_config();
    let result = match parser.parse_file(&path, &root, &catalog) {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "failed to parse {path}");
            process::exit(1);
        }
    };

    let stats = parser.statistics();
    info!(
        bytes_read = stats.bytes_read,
        buffer_resizes = stats.buffer_resizes,
        "finished reading {path}"
    );

    println!("structural errors: {}", result.structural_errors.len());
    for e in &result.structural_errors {
        println!("  {e}");
    }
    println!("envelope validation errors: {}", result.validation_errors.len());
    for e in &result.validation_errors {
        println!("  {e}");
    }

    if !result.is_clean() {
        process::exit(1);
    }
}
