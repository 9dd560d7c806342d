use std::collections::HashMap;

use crate::modules::reports::models::{
    AggregationBucket, ReportDimension, TransactionRecord, MISSING_KEY,
};

/// Reduce transactions into per-key buckets
///
/// A transaction whose key is `None` lands in the single `"N/A"` bucket.
/// Buckets come out in the order their key is first seen in `transactions`,
/// so timestamp-ordered input gives reproducible report output. Sums are
/// accumulated at full decimal precision.
pub fn aggregate_by<F>(transactions: &[TransactionRecord], key_fn: F) -> Vec<AggregationBucket>
where
    F: Fn(&TransactionRecord) -> Option<&str>,
{
    let mut buckets: Vec<AggregationBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tx in transactions {
        let key = key_fn(tx).unwrap_or(MISSING_KEY);

        let slot = match index.get(key) {
            Some(&slot) => slot,
            None => {
                buckets.push(AggregationBucket::new(key));
                index.insert(key.to_string(), buckets.len() - 1);
                buckets.len() - 1
            }
        };

        buckets[slot].absorb(tx);
    }

    buckets
}

/// Aggregate by one of the named report dimensions
pub fn aggregate_by_dimension(
    transactions: &[TransactionRecord],
    dimension: ReportDimension,
) -> Vec<AggregationBucket> {
    aggregate_by(transactions, |tx| dimension.key_of(tx))
}
