pub mod banner;
pub mod cards;
pub mod chart;
pub mod terminal;
pub mod utils;

pub use cards::GridCursor;
pub use terminal::TerminalGuard;
