#[cfg(test)]
mod partition_tests {
    use otp_core::combine::{ChunkAssignment, ParallelismProfile, PartitionError, effective_worker_count, partition};
    use proptest::prelude::*;

    #[test]
    fn exact_division() {
        let chunks = partition(12, 4).unwrap();
        assert!(chunks.iter().all(|c| c.length == 3));
        assert_eq!(chunks.last().unwrap().end(), 12);
    }

    #[test]
    fn one_worker_per_byte() {
        let chunks = partition(5, 5).unwrap();
        assert_eq!(chunks.len(), 5);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(*c, ChunkAssignment { offset: i, length: 1 });
        }
    }

    #[test]
    fn invalid_shapes_rejected() {
        assert_eq!(partition(0, 1), Err(PartitionError::EmptyRegion));
        assert_eq!(partition(10, 0), Err(PartitionError::ZeroWorkers));
        assert_eq!(partition(3, 4), Err(PartitionError::TooManyWorkers { workers: 4, len: 3 }));
    }

    #[test]
    fn single_byte_clamps_eight_workers_to_one() {
        assert_eq!(effective_worker_count(8, 1), 1);
        assert_eq!(ParallelismProfile::fixed(8).workers_for(1), 1);
        assert_eq!(partition(1, 1).unwrap(), vec![ChunkAssignment { offset: 0, length: 1 }]);
    }

    #[test]
    fn degenerate_processor_hint_becomes_one() {
        assert_eq!(ParallelismProfile::fixed(0).workers_for(1024), 1);
    }

    proptest! {
        #[test]
        fn chunks_are_disjoint_contiguous_and_cover(len in 1usize..10_000, workers_seed in any::<usize>()) {
            let workers = 1 + workers_seed % len;
            let chunks = partition(len, workers).unwrap();

            prop_assert_eq!(chunks.len(), workers);
            prop_assert_eq!(chunks[0].offset, 0);
            for pair in chunks.windows(2) {
                prop_assert_eq!(pair[0].end(), pair[1].offset);
            }
            prop_assert!(chunks.iter().all(|c| c.length > 0));
            prop_assert_eq!(chunks.last().unwrap().end(), len);
            prop_assert_eq!(chunks.iter().map(|c| c.length).sum::<usize>(), len);

            let base = len / workers;
            prop_assert!(chunks[..workers - 1].iter().all(|c| c.length == base));
            prop_assert_eq!(chunks[workers - 1].length, base + len % workers);
        }

        #[test]
        fn effective_count_is_within_bounds(hint in 0usize..1024, len in 1usize..4096) {
            let n = effective_worker_count(hint, len);
            prop_assert!(n >= 1 && n <= len);
        }
    }
}
