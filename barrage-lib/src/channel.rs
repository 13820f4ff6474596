//! Lane table construction.

/// One lane: a fixed vertical slot that dispatched items traverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    pub index: usize,
    /// Distance from the container top to this lane (px).
    pub top_offset: f64,
}

/// Build the lane table for the given layout.
///
/// The table is a pure function of its inputs: the first lane sits at
/// `safe_area`, each following lane one `lane_height + lane_gap` below its
/// predecessor. Callers rebuild the table wholesale whenever any input
/// changes; it is never patched in place. A `lane_count` of zero yields an
/// empty table.
pub fn build_channels(
    lane_count: usize,
    lane_height: f64,
    lane_gap: f64,
    safe_area: f64,
) -> Vec<Channel> {
    let mut channels: Vec<Channel> = Vec::with_capacity(lane_count);
    for index in 0..lane_count {
        let top_offset = match channels.last() {
            Some(previous) => previous.top_offset + lane_height + lane_gap,
            None => safe_area,
        };
        channels.push(Channel { index, top_offset });
    }
    channels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_size_matches_lane_count() {
        for lane_count in 1..8 {
            assert_eq!(build_channels(lane_count, 40.0, 10.0, 0.0).len(), lane_count);
        }
    }

    #[test]
    fn offsets_increase_by_height_plus_gap() {
        let channels = build_channels(6, 32.0, 8.0, 14.0);
        assert_eq!(channels[0].top_offset, 14.0);
        for pair in channels.windows(2) {
            assert_eq!(pair[1].top_offset - pair[0].top_offset, 40.0);
            assert_eq!(pair[1].index, pair[0].index + 1);
        }
    }

    #[test]
    fn three_lane_default_layout() {
        let channels = build_channels(3, 40.0, 10.0, 0.0);
        let offsets: Vec<f64> = channels.iter().map(|c| c.top_offset).collect();
        assert_eq!(offsets, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn zero_lanes_yield_empty_table() {
        assert!(build_channels(0, 40.0, 10.0, 0.0).is_empty());
    }
}
