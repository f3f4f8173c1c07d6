use std::fmt;

/// Independently refreshed display regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Stats,
    Chart,
    CoinList,
    Detail,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceKind::Stats => "stats",
            SurfaceKind::Chart => "chart",
            SurfaceKind::CoinList => "coin-list",
            SurfaceKind::Detail => "detail",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SurfacePhase {
    #[default]
    Idle,
    Fetching,
    Rendered,
    ErrorDisplayed { message: String, retry: bool },
}

/// Per-surface cycle bookkeeping: `Idle -> Fetching -> Rendered | ErrorDisplayed`.
///
/// Overlapping cycles are all counted; whichever resolves last sets the phase.
#[derive(Debug, Clone, Default)]
pub struct SurfaceState {
    phase: SurfacePhase,
    in_flight: usize,
    next_cycle: u64,
    last_resolved: Option<u64>,
    notice: Option<String>,
}

impl SurfaceState {
    pub fn phase(&self) -> &SurfacePhase {
        &self.phase
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_resolved(&self) -> Option<u64> {
        self.last_resolved
    }

    /// Informational text attached to the last render, e.g. an empty series.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_fetching(&self) -> bool {
        self.phase == SurfacePhase::Fetching
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            SurfacePhase::ErrorDisplayed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn can_retry(&self) -> bool {
        matches!(self.phase, SurfacePhase::ErrorDisplayed { retry: true, .. })
    }

    /// Enter `Fetching` and hand out the id of the new cycle.
    pub fn begin(&mut self) -> u64 {
        let cycle = self.next_cycle;
        self.next_cycle += 1;
        self.in_flight += 1;
        self.phase = SurfacePhase::Fetching;
        cycle
    }

    pub fn rendered(&mut self, cycle: u64, notice: Option<String>) {
        self.resolve(cycle);
        self.phase = SurfacePhase::Rendered;
        self.notice = notice;
    }

    pub fn failed(&mut self, cycle: u64, message: impl Into<String>, retry: bool) {
        self.resolve(cycle);
        self.phase = SurfacePhase::ErrorDisplayed {
            message: message.into(),
            retry,
        };
        self.notice = None;
    }

    fn resolve(&mut self, cycle: u64) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last_resolved = Some(cycle);
    }
}
