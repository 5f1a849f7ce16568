//! # reshelf-quote Entry Point
//!
//! The actual setup is in lib.rs so commands stay testable.

fn main() -> anyhow::Result<()> {
    reshelf_quote_lib::run()
}
