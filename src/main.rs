// src/main.rs

use automatey::{cli, run};

fn main() {
    if let Err(err) = run(cli::parse()) {
        eprintln!("automatey error: {err:?}");
        std::process::exit(1);
    }
}
