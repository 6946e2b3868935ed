//! Proptest strategies for partition and dispatch properties

use proptest::prelude::*;

/// Item collections of up to 500 elements, sometimes empty
pub fn items_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(any::<i64>(), 0..500)
}

/// Non-empty item collections
pub fn non_empty_items_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(any::<i64>(), 1..500)
}

/// Batch sizes from 1 up to a bit above the largest collection
pub fn batch_size_strategy() -> impl Strategy<Value = usize> {
    1usize..600
}
