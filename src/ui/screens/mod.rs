pub mod dashboard;

pub use dashboard::{handle_key, run_dashboard, KeyOutcome};
