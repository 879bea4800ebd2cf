use crate::model::ImageEntry;
use std::cmp::{Ordering, Reverse};

/// Packing priority: larger area first, earlier enqueue first among equal areas.
///
/// Total over distinct entries, so sorting with it is deterministic no matter
/// what order the queue was in beforehand.
pub fn pack_order(a: &ImageEntry, b: &ImageEntry) -> Ordering {
    (Reverse(a.area()), a.seq).cmp(&(Reverse(b.area()), b.seq))
}
