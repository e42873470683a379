use log::{debug, info, warn};
use serde::Serialize;

use super::model::{Measurement, WorkingSet};
use crate::error::{CleanupError, Result};

// ---------------------------------------------------------------------------
// Cleaning report
// ---------------------------------------------------------------------------

/// Row counts after each stage of [`WorkingSet::clean`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// Rows before any cleaning.
    pub ingested: usize,
    /// Rows left after trimming.
    pub trimmed: usize,
    pub duplicates_removed: usize,
    pub gaps_filled: usize,
    /// Rows in the final table.
    pub output: usize,
}

// ---------------------------------------------------------------------------
// Cleaning operations
// ---------------------------------------------------------------------------
//
// All passes compare adjacent pairs only and mutate `data` while walking it by
// index, so an insertion or removal at `i + 1` is seen by the very next check.
// The strict "one row per depth, step of 1" result needs the order
// trim -> remove_duplicates -> remove_gaps; `clean` applies exactly that.

impl WorkingSet {
    /// Keep the run from the first row with `depth >= min_depth` through the
    /// last row with `depth <= max_depth`, inclusive.
    ///
    /// Fails with [`CleanupError::OutOfRangeTrim`] when no row reaches
    /// `min_depth`. An inverted window, or one with nothing at or below
    /// `max_depth`, leaves the set empty. Each call starts from the current
    /// contents, so repeated calls can only shrink the range.
    pub fn trim(&mut self, min_depth: i64, max_depth: i64) -> Result<()> {
        let first = self
            .data
            .iter()
            .position(|m| m.depth >= min_depth)
            .ok_or(CleanupError::OutOfRangeTrim {
                min_depth,
                max_depth,
            })?;

        match self.data.iter().rposition(|m| m.depth <= max_depth) {
            Some(last) if last >= first => {
                self.data.truncate(last + 1);
                self.data.drain(..first);
            }
            _ => {
                warn!("trim window {min_depth}..={max_depth} is empty");
                self.data.clear();
            }
        }

        debug!(
            "trimmed to {min_depth}..={max_depth}: {} rows kept",
            self.data.len()
        );
        Ok(())
    }

    /// Keep the first row at each depth and drop every following row whose
    /// depth does not exceed it. Returns the number of rows removed.
    ///
    /// On sorted input this leaves one row per distinct depth. If the depth
    /// ever goes backwards, the pass keeps dropping rows until it finds one
    /// strictly deeper than the row it kept: `[10, 9, 15]` becomes `[10, 15]`.
    pub fn remove_duplicates(&mut self) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i + 1 < self.data.len() {
            let depth = self.data[i].depth;
            while i + 1 < self.data.len() && self.data[i + 1].depth <= depth {
                let dropped = self.data.remove(i + 1);
                debug!("dropped row at depth {} after {depth}", dropped.depth);
                removed += 1;
            }
            i += 1;
        }
        removed
    }

    /// Close every forward gap by inserting copies of the row before it, one
    /// depth at a time. Returns the number of rows inserted.
    ///
    /// A gap is flat-filled: channels are carried forward unchanged from the
    /// last real row. A pair that ties or goes backward is left alone, so run
    /// [`WorkingSet::remove_duplicates`] first.
    pub fn remove_gaps(&mut self) -> usize {
        let mut inserted = 0;
        let mut filling = false;
        let mut i = 0;
        while i + 1 < self.data.len() {
            let current = self.data[i];
            let next_depth = self.data[i + 1].depth;
            match current.depth.checked_add(1) {
                Some(step) if next_depth > step => {
                    if !filling {
                        debug!(
                            "closing gap {step}..={} after depth {}",
                            next_depth - 1,
                            current.depth
                        );
                    }
                    self.data.insert(i + 1, current.at_depth(step));
                    inserted += 1;
                    filling = true;
                }
                _ => {
                    filling = false;
                    if next_depth <= current.depth {
                        warn!(
                            "depth {next_depth} follows {} at row {}; pair left unfilled",
                            current.depth,
                            i + 1
                        );
                    }
                }
            }
            i += 1;
        }
        inserted
    }

    /// Stable sort ascending by depth. Rows sharing a depth keep their input
    /// order, so `remove_duplicates` still keeps the first one seen.
    pub fn sort_by_depth(&mut self) {
        self.data.sort_by(Measurement::depth_order);
    }

    /// Trim, collapse duplicates and fill gaps, in that order.
    pub fn clean(&mut self, min_depth: i64, max_depth: i64) -> Result<CleanReport> {
        let ingested = self.len();
        self.trim(min_depth, max_depth)?;
        let trimmed = self.len();
        let duplicates_removed = self.remove_duplicates();
        let gaps_filled = self.remove_gaps();

        let report = CleanReport {
            ingested,
            trimmed,
            duplicates_removed,
            gaps_filled,
            output: self.len(),
        };
        info!(
            "cleaned {} rows: {} after trim, {} duplicates dropped, {} gap rows filled, {} out",
            report.ingested,
            report.trimmed,
            report.duplicates_removed,
            report.gaps_filled,
            report.output
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(depth: i64, v: f64) -> Measurement {
        Measurement::new(depth, v, v, v, v, v, v, v)
    }

    fn set(depths: &[i64]) -> WorkingSet {
        depths.iter().map(|&d| row(d, d as f64)).collect()
    }

    #[test]
    fn test_trim_keeps_inclusive_window() {
        let mut ws = set(&[3998, 3999, 4000, 4001, 7500, 7501]);
        ws.trim(4000, 7500).unwrap();
        assert_eq!(ws.depths(), vec![4000, 4001, 7500]);
        assert_eq!(ws.as_slice()[0], row(4000, 4000.0));
    }

    #[test]
    fn test_trim_without_lower_match_is_out_of_range() {
        let mut ws = set(&[10, 11, 12]);
        let err = ws.trim(100, 200).unwrap_err();
        assert!(matches!(
            err,
            CleanupError::OutOfRangeTrim {
                min_depth: 100,
                max_depth: 200
            }
        ));
        assert_eq!(ws.depths(), vec![10, 11, 12], "failed trim must not mutate");
    }

    #[test]
    fn test_trim_empty_set_is_out_of_range() {
        let mut ws = WorkingSet::new();
        assert!(ws.trim(0, 10).is_err());
    }

    #[test]
    fn test_trim_inverted_window_is_empty() {
        let mut ws = set(&[10, 11, 12]);
        ws.trim(12, 10).unwrap();
        assert!(ws.is_empty());
    }

    #[test]
    fn test_trim_max_below_everything_is_empty() {
        let mut ws = set(&[10, 11, 12]);
        ws.trim(5, 8).unwrap();
        assert!(ws.is_empty());
    }

    #[test]
    fn test_trim_repeated_calls_shrink() {
        let mut ws = set(&[1, 2, 3, 4, 5, 6]);
        ws.trim(2, 5).unwrap();
        ws.trim(3, 4).unwrap();
        assert_eq!(ws.depths(), vec![3, 4]);
        ws.trim(1, 6).unwrap();
        assert_eq!(ws.depths(), vec![3, 4]);
    }

    #[test]
    fn test_trim_keeps_contiguous_run_of_unsorted_input() {
        let mut ws = set(&[1, 5, 2, 9, 4, 10]);
        ws.trim(5, 8).unwrap();
        assert_eq!(ws.depths(), vec![5, 2, 9, 4]);
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let mut ws: WorkingSet = vec![
            row(1, 0.1),
            row(1, 0.2),
            row(1, 0.3),
            row(2, 0.4),
            row(2, 0.5),
            row(3, 0.6),
        ]
        .into_iter()
        .collect();
        let removed = ws.remove_duplicates();
        assert_eq!(removed, 3);
        assert_eq!(ws.depths(), vec![1, 2, 3]);
        assert_eq!(ws.as_slice()[0].rop, 0.1);
        assert_eq!(ws.as_slice()[1].rop, 0.4);
    }

    #[test]
    fn test_remove_duplicates_collapses_backward_steps() {
        let mut ws = set(&[10, 9, 15]);
        assert_eq!(ws.remove_duplicates(), 1);
        assert_eq!(ws.depths(), vec![10, 15]);

        let mut ws = set(&[10, 8, 10, 9, 11, 11, 12]);
        ws.remove_duplicates();
        assert_eq!(ws.depths(), vec![10, 11, 12]);
    }

    #[test]
    fn test_remove_duplicates_trailing_run() {
        let mut ws = set(&[5, 6, 6, 6]);
        ws.remove_duplicates();
        assert_eq!(ws.depths(), vec![5, 6]);

        let mut ws = set(&[7, 7]);
        ws.remove_duplicates();
        assert_eq!(ws.depths(), vec![7]);
    }

    #[test]
    fn test_remove_duplicates_short_sets() {
        let mut empty = WorkingSet::new();
        assert_eq!(empty.remove_duplicates(), 0);
        let mut single = set(&[42]);
        assert_eq!(single.remove_duplicates(), 0);
        assert_eq!(single.depths(), vec![42]);
    }

    #[test]
    fn test_remove_gaps_flat_fills_from_predecessor() {
        let mut ws: WorkingSet = vec![row(100, 1.0), row(104, 2.0), row(105, 3.0)]
            .into_iter()
            .collect();
        let inserted = ws.remove_gaps();
        assert_eq!(inserted, 3);
        assert_eq!(ws.depths(), vec![100, 101, 102, 103, 104, 105]);
        for m in &ws.as_slice()[1..4] {
            assert_eq!(m.channels(), row(100, 1.0).channels());
        }
        assert_eq!(ws.as_slice()[4], row(104, 2.0));
    }

    #[test]
    fn test_remove_gaps_every_adjacent_pair_steps_by_one() {
        let mut ws = set(&[1, 3, 4, 10, 11, 20]);
        ws.remove_gaps();
        let depths = ws.depths();
        assert_eq!(depths.first(), Some(&1));
        assert_eq!(depths.last(), Some(&20));
        assert!(depths.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_remove_gaps_leaves_non_increasing_pairs() {
        let mut ws = set(&[5, 5, 7]);
        assert_eq!(ws.remove_gaps(), 1);
        assert_eq!(ws.depths(), vec![5, 5, 6, 7]);
    }

    #[test]
    fn test_remove_gaps_at_max_depth_does_not_overflow() {
        let mut ws = set(&[i64::MAX, 5]);
        assert_eq!(ws.remove_gaps(), 0);
        assert_eq!(ws.depths(), vec![i64::MAX, 5]);

        let mut ws = set(&[i64::MAX - 2, i64::MAX]);
        assert_eq!(ws.remove_gaps(), 1);
        assert_eq!(ws.depths(), vec![i64::MAX - 2, i64::MAX - 1, i64::MAX]);
    }

    #[test]
    fn test_passes_are_idempotent() {
        let mut ws = set(&[1, 1, 2, 5, 5, 8]);
        ws.remove_duplicates();
        let once = ws.clone();
        assert_eq!(ws.remove_duplicates(), 0);
        assert_eq!(ws, once);

        ws.remove_gaps();
        let filled = ws.clone();
        assert_eq!(ws.remove_gaps(), 0);
        assert_eq!(ws, filled);
    }

    #[test]
    fn test_sort_by_depth_is_stable() {
        let mut ws: WorkingSet = vec![row(3, 0.0), row(1, 1.0), row(3, 2.0), row(2, 3.0)]
            .into_iter()
            .collect();
        ws.sort_by_depth();
        assert_eq!(ws.depths(), vec![1, 2, 3, 3]);
        assert_eq!(ws.as_slice()[2].rop, 0.0);
        assert_eq!(ws.as_slice()[3].rop, 2.0);
    }

    #[test]
    fn test_clean_round_trip_scenario() {
        let mut ws: WorkingSet = vec![
            Measurement::new(4000, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0),
            Measurement::new(4000, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0),
            Measurement::new(4003, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0),
        ]
        .into_iter()
        .collect();

        let report = ws.clean(4000, 4003).unwrap();

        assert_eq!(ws.depths(), vec![4000, 4001, 4002, 4003]);
        let first = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        for m in &ws.as_slice()[..3] {
            assert_eq!(m.channels(), first);
        }
        assert_eq!(ws.as_slice()[3].channels(), [1.0; 7]);
        assert_eq!(
            report,
            CleanReport {
                ingested: 3,
                trimmed: 3,
                duplicates_removed: 1,
                gaps_filled: 2,
                output: 4,
            }
        );
    }
}
