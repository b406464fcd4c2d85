//! Erase one rectangle from an image.
//!
//! Usage:
//! ```sh
//! cargo run --example erase_region -- input.png output.png 120,80,40,24
//! ```

use std::env;
use std::process;

use patch_fill::{FillParams, PatchEngine, RawRect, Region};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <input> <output> <x,y,w,h>", args[0]);
        process::exit(1);
    }

    let rect: RawRect = match args[3].parse() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let engine = PatchEngine::new();
    let result = engine.process_file(
        args[1].as_ref(),
        args[2].as_ref(),
        &[Region::Pixels(rect)],
        &FillParams::default(),
    );

    if result.skipped {
        println!("Skipped: {}", result.message);
    } else if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
