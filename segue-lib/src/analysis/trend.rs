//! Trend segmentation of a single feature channel.

use super::{round2, SegmentSpan};

/// Splits one channel's values into variable-length segments wherever the
/// rolling magnitude trend changes.
///
/// A boundary is declared at position `i` when the upcoming trend window
/// sits in a different magnitude bucket than the running segment average
/// and every upcoming value continues the rise (or fall) started at `i`.
/// The boundary value closes the current segment and the trend window
/// opens the next one.
pub struct TrendSegmenter {
    min_seg_length: usize,
}

/// Rolling state for the segment currently being grown.
struct OpenSpan {
    start: usize,
    len: usize,
    sum: f64,
    head_sum: f64,
    avg: f64,
}

impl OpenSpan {
    /// Open the leading segment. Its average excludes the first two values
    /// to dampen edge bias, and keeps excluding them until the first
    /// boundary is found.
    fn seed(window: &[f64]) -> Self {
        let mut span = Self {
            start: 0,
            len: window.len(),
            sum: window.iter().sum(),
            head_sum: window.iter().take(2).sum(),
            avg: 0.0,
        };
        span.refresh_avg(true);
        span
    }

    /// Open a segment right after a boundary, seeded with the trend window.
    fn reopen(start: usize, window: &[f64]) -> Self {
        let mut span = Self {
            start,
            len: window.len(),
            sum: window.iter().sum(),
            head_sum: window.iter().take(2).sum(),
            avg: 0.0,
        };
        span.refresh_avg(false);
        span
    }

    fn push(&mut self, value: f64) {
        if self.len < 2 {
            self.head_sum += value;
        }
        self.sum += value;
        self.len += 1;
    }

    fn refresh_avg(&mut self, leading: bool) {
        self.avg = if leading && self.len > 2 {
            round2((self.sum - self.head_sum) / (self.len - 2) as f64)
        } else {
            round2(self.sum / self.len as f64)
        };
    }

    fn close(self) -> SegmentSpan {
        SegmentSpan {
            start: self.start,
            end: self.start + self.len - 1,
        }
    }
}

impl TrendSegmenter {
    pub fn new(min_seg_length: usize) -> Self {
        Self { min_seg_length }
    }

    /// Segment `values` into ordered inclusive index spans.
    ///
    /// Values are rounded to two decimals before analysis. Series shorter
    /// than `min_seg_length + 1` come back as a single span; otherwise the
    /// final value stays outside every span.
    pub fn segment(&self, values: &[f64]) -> Vec<SegmentSpan> {
        let rounded: Vec<f64> = values.iter().map(|value| round2(*value)).collect();
        if rounded.is_empty() {
            return Vec::new();
        }
        if rounded.len() < self.min_seg_length + 1 {
            return vec![SegmentSpan {
                start: 0,
                end: rounded.len() - 1,
            }];
        }

        let mut spans: Vec<SegmentSpan> = Vec::new();
        let mut open = OpenSpan::seed(&rounded[..self.min_seg_length]);

        let mut i = self.min_seg_length;
        while i < rounded.len() - 1 {
            if i + self.min_seg_length < rounded.len() {
                let prev = rounded[i - 1];
                let cur = rounded[i];
                let trend = &rounded[i + 1..=i + self.min_seg_length];
                let trend_avg = trend.iter().sum::<f64>() / trend.len() as f64;

                let bucket_shift = magnitude_bucket(open.avg) != magnitude_bucket(trend_avg);
                let rises = cur > open.avg
                    && cur > prev
                    && trend.iter().all(|value| *value > open.avg && *value > prev);
                let falls = cur < open.avg
                    && cur < prev
                    && trend.iter().all(|value| *value < open.avg && *value < prev);

                if bucket_shift && (rises || falls) {
                    open.push(cur);
                    spans.push(open.close());
                    open = OpenSpan::reopen(i + 1, trend);
                    i += self.min_seg_length + 1;
                    continue;
                }
            }

            open.push(rounded[i]);
            open.refresh_avg(spans.is_empty());
            i += 1;
        }

        spans.push(open.close());
        spans
    }
}

/// Collapse a value onto its magnitude bucket.
///
/// Values below 10 keep two-decimal precision; larger values snap to the
/// nearest half step of their order of magnitude, rounding down. Two values
/// fall in the same bucket when they are close relative to their size, so
/// the trend comparison scales with the feature's range.
fn magnitude_bucket(n: f64) -> f64 {
    if n == 0.0 {
        return 0.0;
    }
    let base = 10f64.powf(n.abs().log10().floor());
    let adjuster = base / 2.0;
    let candidate = n - (n % base);

    if n < 10.0 && n >= 0.0 {
        return round2(n);
    }
    if n > 10.0 {
        return if n >= candidate + adjuster {
            candidate + adjuster
        } else {
            candidate
        };
    }
    if n <= candidate - adjuster {
        candidate - adjuster
    } else {
        candidate
    }
}
