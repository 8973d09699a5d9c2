//! # Voxel World Entry Point
//!
//! Runs one headless session of the engine. See `run()` in the library.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json] [heightmap.png]
//! ```

fn main() {
    if let Err(err) = voxel_world::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
