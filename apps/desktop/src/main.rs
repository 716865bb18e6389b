//! # RofloBank Desktop Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load session config (file, environment)
//! 3. Start the session against the local host
//! 4. Read commands from stdin until `quit`
//!
//! The actual setup is in lib.rs so it can be tested.

fn main() {
    if let Err(e) = roflo_desktop_lib::run() {
        eprintln!("roflobank: {}", e);
        std::process::exit(1);
    }
}
