use crate::error::{AtlasError, Result};

/// Smallest power of two that is `>= min` and `>= needed`, found by doubling `min`.
/// `min` must itself be a power of two.
fn grow_side(min: u32, needed: u32) -> Option<u32> {
    let mut side = min;
    while side < needed {
        side = side.checked_mul(2)?;
    }
    Some(side)
}

/// Atlas dimensions for a new atlas triggered by an image of `width`x`height`.
///
/// Width and height grow independently, so the result need not be square.
/// The triggering image always fits unrotated.
pub fn atlas_size_for(min_dimension: u32, width: u32, height: u32) -> Result<(u32, u32)> {
    match (
        grow_side(min_dimension, width),
        grow_side(min_dimension, height),
    ) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(AtlasError::DimensionOverflow { width, height }),
    }
}
