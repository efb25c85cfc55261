//! Fixed-width partitioning of a waking span into blocks.

use chrono::{Duration, NaiveDateTime};

use super::Block;

/// Default block length in minutes.
pub const DEFAULT_SLICE_MINUTES: i64 = 15;

/// Split `[wake, sleep)` into consecutive blocks of exactly `slice`.
///
/// A trailing interval shorter than `slice` is dropped. Returns an empty
/// sequence when `wake >= sleep`, when the span is shorter than one slice,
/// or when `slice` is not positive. Every call assigns fresh block ids.
pub fn partition(wake: NaiveDateTime, sleep: NaiveDateTime, slice: Duration) -> Vec<Block> {
    if slice <= Duration::zero() || wake >= sleep {
        return Vec::new();
    }

    let mut blocks = Vec::with_capacity(block_count(wake, sleep, slice));
    let mut start = wake;
    while let Some(end) = start.checked_add_signed(slice) {
        if end > sleep {
            break;
        }
        blocks.push(Block::new(start, end));
        start = end;
    }
    blocks
}

/// Number of blocks [`partition`] would produce, without allocating them.
pub fn block_count(wake: NaiveDateTime, sleep: NaiveDateTime, slice: Duration) -> usize {
    if slice <= Duration::zero() || wake >= sleep {
        return 0;
    }
    let span = sleep - wake;
    let count = match (span.num_nanoseconds(), slice.num_nanoseconds()) {
        (Some(span), Some(step)) => span / step,
        _ => span.num_milliseconds() / slice.num_milliseconds().max(1),
    };
    usize::try_from(count).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    const FIFTEEN: i64 = DEFAULT_SLICE_MINUTES;

    #[test]
    fn full_day_yields_sixty_four_blocks() {
        let blocks = partition(at(7, 0), at(23, 0), Duration::minutes(FIFTEEN));
        assert_eq!(blocks.len(), 64);
        assert_eq!(blocks[0].start_time, at(7, 0));
        assert_eq!(blocks[63].end_time, at(23, 0));
    }

    #[test]
    fn trailing_remainder_is_dropped() {
        let blocks = partition(at(7, 0), at(7, 40), Duration::minutes(FIFTEEN));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].end_time, at(7, 30));
    }

    #[test]
    fn span_shorter_than_slice_is_empty() {
        assert!(partition(at(7, 0), at(7, 10), Duration::minutes(FIFTEEN)).is_empty());
    }

    #[test]
    fn inverted_or_equal_bounds_are_empty() {
        assert!(partition(at(9, 0), at(8, 0), Duration::minutes(FIFTEEN)).is_empty());
        assert!(partition(at(9, 0), at(9, 0), Duration::minutes(FIFTEEN)).is_empty());
    }

    #[test]
    fn non_positive_slice_is_empty() {
        assert!(partition(at(7, 0), at(8, 0), Duration::zero()).is_empty());
        assert!(partition(at(7, 0), at(8, 0), Duration::minutes(-5)).is_empty());
    }

    #[test]
    fn span_across_midnight_is_partitioned() {
        let wake = at(22, 0);
        let sleep = wake + Duration::hours(3);
        let blocks = partition(wake, sleep, Duration::minutes(FIFTEEN));
        assert_eq!(blocks.len(), 12);
        assert_eq!(blocks[11].end_time, sleep);
    }

    #[test]
    fn sub_second_slice_counts_match() {
        let wake = at(7, 0);
        let sleep = wake + Duration::seconds(3);
        let slice = Duration::milliseconds(1500);
        assert_eq!(partition(wake, sleep, slice).len(), 2);
        assert_eq!(block_count(wake, sleep, slice), 2);

        let sleep = wake + Duration::milliseconds(2999);
        assert_eq!(partition(wake, sleep, slice).len(), 1);
        assert_eq!(block_count(wake, sleep, slice), 1);
    }

    #[test]
    fn each_call_assigns_fresh_ids() {
        let a = partition(at(7, 0), at(8, 0), Duration::minutes(FIFTEEN));
        let b = partition(at(7, 0), at(8, 0), Duration::minutes(FIFTEEN));
        assert!(a.iter().zip(&b).all(|(x, y)| x.id != y.id));
    }

    proptest! {
        #[test]
        fn blocks_are_contiguous_and_exact(
            wake_min in 0i64..1440,
            span_min in 0i64..1440,
            slice_min in 1i64..120,
        ) {
            let wake = at(0, 0) + Duration::minutes(wake_min);
            let sleep = wake + Duration::minutes(span_min);
            let slice = Duration::minutes(slice_min);
            let blocks = partition(wake, sleep, slice);

            let k = (span_min / slice_min) as usize;
            prop_assert_eq!(blocks.len(), k);
            prop_assert_eq!(block_count(wake, sleep, slice), k);

            let mut cursor = wake;
            for block in &blocks {
                prop_assert_eq!(block.start_time, cursor);
                prop_assert_eq!(block.duration(), slice);
                prop_assert!(block.end_time <= sleep);
                cursor = block.end_time;
            }
            prop_assert_eq!(cursor, wake + slice * k as i32);
        }

        #[test]
        fn count_matches_partition_for_millisecond_slices(
            span_ms in 0i64..600_000,
            slice_ms in 250i64..90_000,
        ) {
            let wake = at(7, 0);
            let sleep = wake + Duration::milliseconds(span_ms);
            let slice = Duration::milliseconds(slice_ms);
            let blocks = partition(wake, sleep, slice);

            prop_assert_eq!(blocks.len(), (span_ms / slice_ms) as usize);
            prop_assert_eq!(block_count(wake, sleep, slice), blocks.len());
            prop_assert!(blocks.iter().all(|b| b.duration() == slice));
        }
    }
}
