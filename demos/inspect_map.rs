//! Inspect a Dungeon Scrawl map export
//!
//! Decodes a `.ds` file and prints a summary of its container, scene
//! document and drawable primitives. Pass `--json` to dump the decoded scene
//! instead. Set `RUST_LOG=dsmap=debug` to follow the decode.
//!
//! ```text
//! cargo run --example inspect_map -- castle.ds
//! cargo run --example inspect_map -- castle.ds --json
//! ```

use dsmap::archive::Archive;
use dsmap::{DecoderConfig, GraphWalker, SceneDocument};
use std::collections::BTreeMap;
use std::env;
use std::process;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: {} <map.ds> [--json]", args[0]);
        process::exit(1);
    };
    let dump_json = args.iter().skip(2).any(|a| a == "--json");

    let bytes = std::fs::read(path)?;
    let config = DecoderConfig::default();
    let archive = Archive::read_with_config(&bytes, &config)?;
    let json = dsmap::parser::select_document_member(&archive, &config)?;
    let document = SceneDocument::from_json(json)?;
    let scene = GraphWalker::new(&document, &config).walk()?;

    if dump_json {
        println!("{}", serde_json::to_string_pretty(&scene)?);
        return Ok(());
    }

    println!("=== Container ===");
    for entry in archive.entries() {
        println!(
            "  {:<24} {:>10} bytes  crc {:08x}",
            entry.name, entry.uncompressed_size, entry.crc32
        );
    }
    if !archive.comment().is_empty() {
        println!("  comment: {}", archive.comment());
    }

    println!("\n=== Scene document ===");
    println!("  version:       {}", document.version);
    println!("  selected page: {}", document.selected_page());
    println!("  nodes:         {}", document.nodes.len());
    println!("  geometry:      {}", document.geometry.len());

    let mut node_kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for node in document.nodes.values() {
        *node_kinds.entry(node.type_name()).or_default() += 1;
    }
    for (kind, count) in &node_kinds {
        println!("    {:<14} {}", kind, count);
    }

    println!("\n=== Scene ===");
    println!("  background:    #{:06x}", scene.background_color);
    println!("  groups:        {}", scene.groups.len());
    println!("  primitives:    {}", scene.primitives.len());

    let mut primitive_kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for drawable in &scene.primitives {
        *primitive_kinds.entry(drawable.primitive.kind()).or_default() += 1;
    }
    for (kind, count) in &primitive_kinds {
        println!("    {:<14} {}", kind, count);
    }

    Ok(())
}
