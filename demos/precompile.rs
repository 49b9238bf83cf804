//! Parse every room under a map root and write one bulk JSON file.
//!
//! `cargo run --example precompile -- <map_root> <out.json>`

use anyhow::Context;
use futures::executor::block_on;
use room_map_viewer::loader::bulk::encode_bulk;
use room_map_viewer::{FsSource, MapLoader, ViewerConfig};

fn main() -> anyhow::Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| ViewerConfig::default().map_root);
    let out = args.next().unwrap_or_else(|| "map-data.json".to_owned());

    let loader = MapLoader::new(FsSource::new(&root), ViewerConfig::default().batch_size);
    let data = block_on(loader.load_world());
    let json = encode_bulk(&data)?;
    std::fs::write(&out, &json).with_context(|| format!("Writing {out}"))?;

    log::info!(
        "Wrote {} rooms ({} placed) to {} ({:.2} MB)",
        data.room_count(),
        data.index().len(),
        out,
        json.len() as f64 / (1024.0 * 1024.0)
    );
    Ok(())
}
