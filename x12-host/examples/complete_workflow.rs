//! Complete workflow: parse a file, collect per-segment statistics, and
//! report structural/envelope errors.
//!
//! Run with:
//! cargo run -p x12-host --example complete_workflow -- path/to/file.x12

use std::collections::HashMap;
use std::env;
use std::process;

use x12_host::ChunkedParser;
use x12_schema::SchemaCatalog;
use x12_tree::Node;

fn segment_counts(node: &Node, counts: &mut HashMap<String, usize>) {
    use x12_tree::NodeKind;
    if node.kind == NodeKind::Segment {
        *counts.entry(node.name.clone()).or_insert(0) += 1;
    }
    for child in node.children() {
        segment_counts(child, counts);
    }
}

fn main() {
    let path = match env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("usage: complete_workflow <file.x12>");
            process::exit(1);
        }
    };

    let catalog = x12_schema::static_005010_catalog();
    let root = catalog.interchange_def("005010").unwrap();

    let mut parser = ChunkedParser::with_default_config();
    let start = std::time::Instant::now();
    let result = parser.parse_file(&path, &root, &catalog).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    let elapsed = start.elapsed();

    let stats = parser.statistics();
    println!("=== Read Statistics ===");
    println!("  bytes read:     {}", stats.bytes_read);
    println!("  buffer resizes: {}", stats.buffer_resizes);
    println!("  time:           {:.2}s", elapsed.as_secs_f64());

    if let Some(tree) = &result.tree {
        let mut counts = HashMap::new();
        segment_counts(tree, &mut counts);
        println!("\n=== Segment Statistics ===");
        let mut rows: Vec<_> = counts.into_iter().collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (id, count) in rows {
            println!("  {id}: {count}");
        }
    }

    println!("\nstructural errors: {}", result.structural_errors.len());
    for e in &result.structural_errors {
        println!("  {e}");
    }
    println!("envelope validation errors: {}", result.validation_errors.len());
    for e in &result.validation_errors {
        println!("  {e}");
    }
}
