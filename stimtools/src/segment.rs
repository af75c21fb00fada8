//! Partition frame trigger times into per-stimulus buckets

use itertools::Itertools;
use tracing::warn;

/// What the last stimulus receives
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Tail {
    /// Unclaimed frames at or after the last onset
    Bounded,
    /// Every frame not claimed by an earlier stimulus
    Remaining,
}

/// Bucket `frames` by `onsets` with the bounded tail.
///
/// Bucket `i < N-1` holds frames in `[onsets[i], onsets[i+1])`, the last one
/// frames `>= onsets[N-1]`. A frame lands in at most one bucket.
pub fn frame_buckets(onsets: &[f64], frames: &[f64]) -> Vec<Vec<f64>> {
    frame_buckets_with(onsets, frames, Tail::Bounded)
}

/// Bucket `frames` by `onsets` in a single consuming pass over the onsets.
///
/// Frames claimed by a bucket are removed before the next bucket is filled,
/// so degenerate intervals (equal or decreasing onsets) yield empty buckets
/// rather than duplicates. Frame order is preserved within each bucket.
pub fn frame_buckets_with(onsets: &[f64], frames: &[f64], tail: Tail) -> Vec<Vec<f64>> {
    if !onsets.iter().tuple_windows().all(|(a, b)| a <= b) {
        warn!("stimulus onsets are not in ascending order");
    }

    let mut remaining: Vec<f64> = frames.to_vec();
    let mut buckets = Vec::with_capacity(onsets.len());
    for (i, &start) in onsets.iter().enumerate() {
        let claimed = match (onsets.get(i + 1), tail) {
            (Some(&end), _) => take_where(&mut remaining, |t| t >= start && t < end),
            (None, Tail::Bounded) => take_where(&mut remaining, |t| t >= start),
            (None, Tail::Remaining) => std::mem::take(&mut remaining),
        };
        buckets.push(claimed);
    }
    buckets
}

fn take_where(remaining: &mut Vec<f64>, pred: impl Fn(f64) -> bool) -> Vec<f64> {
    let (claimed, rest): (Vec<f64>, Vec<f64>) = remaining.iter().partition(|&&t| pred(t));
    *remaining = rest;
    claimed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_intervals() {
        let onsets = [0.0, 1.0, 2.0];
        let frames = [0.0, 0.5, 1.0, 1.5, 2.0, 7.0];
        let b = frame_buckets(&onsets, &frames);
        assert_eq!(vec![vec![0.0, 0.5], vec![1.0, 1.5], vec![2.0, 7.0]], b);
    }

    #[test]
    fn no_onsets_no_buckets() {
        assert!(frame_buckets(&[], &[0.1, 0.2]).is_empty());
        assert!(frame_buckets_with(&[], &[0.1, 0.2], Tail::Remaining).is_empty());
    }

    #[test]
    fn single_onset() {
        let frames = [-1.0, 0.5, 3.0];
        assert_eq!(vec![vec![-1.0, 0.5, 3.0]], frame_buckets_with(&[0.0], &frames, Tail::Remaining));
        assert_eq!(vec![vec![0.5, 3.0]], frame_buckets(&[0.0], &frames));
    }

    #[test]
    fn early_frames_are_excluded() {
        let b = frame_buckets(&[1.0, 2.0], &[0.2, 0.9, 1.1, 2.5]);
        assert_eq!(vec![vec![1.1], vec![2.5]], b);
        let b = frame_buckets_with(&[1.0, 2.0], &[0.2, 0.9, 1.1, 2.5], Tail::Remaining);
        assert_eq!(vec![vec![1.1], vec![0.2, 0.9, 2.5]], b);
    }

    #[test]
    fn degenerate_onsets_do_not_duplicate() {
        let onsets = [1.0, 1.0, 2.0, 1.5];
        let frames = [1.0, 1.2, 1.6, 2.1, 3.0];
        let b = frame_buckets(&onsets, &frames);
        assert_eq!(4, b.len());
        assert!(b[0].is_empty());
        assert_eq!(vec![1.0, 1.2, 1.6], b[1]);
        assert!(b[2].is_empty());
        assert_eq!(vec![2.1, 3.0], b[3]);
        let n: usize = b.iter().map(Vec::len).sum();
        assert_eq!(frames.len(), n);
    }

    #[test]
    fn union_is_frames_after_first_onset() {
        let onsets = [0.3, 0.9, 1.4, 2.2, 2.2, 3.0];
        let frames: Vec<f64> = (0..400).map(|i| i as f64 * 0.01).collect();
        let b = frame_buckets(&onsets, &frames);
        let mut union: Vec<f64> = b.into_iter().flatten().collect();
        union.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f64> = frames.iter().copied().filter(|&t| t >= 0.3).collect();
        assert_eq!(expected, union);
    }
}
