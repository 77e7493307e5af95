// In app/src/session.rs

/// The host-side end-of-session rule: the position is forced flat after every
/// `bars_per_session` bars. The engine only learns about it on the next re-sync.
#[derive(Debug, Clone)]
pub struct SessionClock {
    bars_per_session: Option<u32>,
    bars_in_session: u32,
}

impl SessionClock {
    pub fn new(bars_per_session: Option<u32>) -> Self {
        Self {
            // A zero-length session would flatten every bar before it could trade.
            bars_per_session: bars_per_session.filter(|&n| n > 0),
            bars_in_session: 0,
        }
    }

    /// Counts a processed bar and reports whether the session just ended.
    pub fn bar_closed(&mut self) -> bool {
        let Some(length) = self.bars_per_session else {
            return false;
        };
        self.bars_in_session += 1;
        if self.bars_in_session >= length {
            self.bars_in_session = 0;
            true
        } else {
            false
        }
    }
}
