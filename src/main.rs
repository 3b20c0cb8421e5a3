// src/main.rs
use anyhow::Result;

fn main() -> Result<()> {
    spectracheckr::cli::run()
}
