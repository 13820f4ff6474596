//! Random lane selection with a no-immediate-repeat rule.

use rand::Rng;

use crate::constants::LANE_RETRY_LIMIT;

/// Picks the lane each dispatched item enters.
///
/// Picks are uniform over the lane table, rejecting the immediately previous
/// lane so two consecutive items never share a lane. The redraw loop is
/// bounded: once [`LANE_RETRY_LIMIT`] draws have all landed on the previous
/// lane, the pick advances to the next lane instead, which keeps the
/// no-repeat rule intact without an unbounded loop.
#[derive(Debug, Default)]
pub struct LanePicker {
    last: Option<usize>,
}

impl LanePicker {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Pick a lane index in `[0, lane_count)`.
    ///
    /// Returns `None` when no lanes exist. A single-lane table bypasses the
    /// no-repeat rule, since rejecting the only lane could never terminate.
    pub fn pick(&mut self, lane_count: usize) -> Option<usize> {
        if lane_count == 0 {
            return None;
        }
        if lane_count == 1 {
            self.last = Some(0);
            return Some(0);
        }

        let mut rng = rand::thread_rng();
        let mut choice = rng.gen_range(0..lane_count);
        for _ in 0..LANE_RETRY_LIMIT {
            if Some(choice) != self.last {
                break;
            }
            choice = rng.gen_range(0..lane_count);
        }
        if Some(choice) == self.last {
            choice = (choice + 1) % lane_count;
        }

        self.last = Some(choice);
        Some(choice)
    }

    /// Forget the previous pick.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
