use std::{num::NonZeroUsize, ops::Range};

/// Split `0..len` into `workers` contiguous ranges.
///
/// Every range but the last holds `len / workers` records; the last one takes
/// whatever remains, which can be empty when `len < workers`.
pub fn partition(len: usize, workers: NonZeroUsize) -> Vec<Range<usize>> {
    let workers = workers.get();
    let block = len / workers;
    (0..workers)
        .map(|i| {
            let start = i * block;
            let end = if i == workers - 1 { len } else { start + block };
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn assert_covers(len: usize, ranges: &[Range<usize>]) {
        let mut seen = vec![0u32; len];
        for range in ranges {
            assert!(range.start <= range.end);
            for i in range.clone() {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1), "len={} ranges={:?}", len, ranges);
    }

    #[test]
    fn test_coverage() {
        for len in 0..64 {
            for workers in 1..=12 {
                let ranges = partition(len, w(workers));
                assert_eq!(ranges.len(), workers);
                assert_covers(len, &ranges);
            }
        }
    }

    #[test]
    fn test_remainder_goes_to_last() {
        assert_eq!(partition(10, w(3)), vec![0..3, 3..6, 6..10]);
        assert_eq!(partition(9, w(3)), vec![0..3, 3..6, 6..9]);
        assert_eq!(partition(7, w(1)), vec![0..7]);
    }

    #[test]
    fn test_fewer_records_than_workers() {
        assert_eq!(partition(2, w(4)), vec![0..0, 0..0, 0..0, 0..2]);
        assert_eq!(partition(0, w(3)), vec![0..0, 0..0, 0..0]);
    }
}
