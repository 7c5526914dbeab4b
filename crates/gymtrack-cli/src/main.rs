//! gymtrack - workout session log
//!
//! Record gym sessions from the terminal.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start a leg day
//! gymtrack start --category legs
//!
//! # Log an exercise and a set
//! gymtrack exercise add "Squat"
//! gymtrack set add squat --reps 5 --weight 100
//!
//! # Wrap up and look back
//! gymtrack finish
//! gymtrack session list
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
