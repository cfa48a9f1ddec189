use rand::Rng;

use crate::CastError;

/// Map a uniform sample `r` in `[0, 1)` onto an index of an ordered list of `len` items, skewed
/// towards the front by `bias`.
///
/// `bias` must be greater than 1. With `bias <= 2` the full range is reachable: `r = 0` selects
/// index 0 and `r -> 1` selects the last index.
pub fn rank_biased_index(len: usize, bias: f64, r: f64) -> Result<usize, CastError> {
    if len == 0 {
        return Err(CastError::InvalidArgument {
            reason: "cannot select from an empty candidate list",
        });
    }
    if !(bias.is_finite() && bias > 1.0) {
        return Err(CastError::InvalidArgument {
            reason: "rank bias must be greater than 1",
        });
    }

    let r = if r.is_nan() { 0.0 } else { r.clamp(0.0, 1.0) };
    let discriminant = (bias * bias - 4.0 * (bias - 1.0) * r).max(0.0);
    let d = (bias - discriminant.sqrt()) / (2.0 * (bias - 1.0));
    let index = (len as f64 * d).floor();
    if index <= 0.0 {
        return Ok(0);
    }
    Ok((index as usize).min(len - 1))
}

/// Pick one element of `items` with [`rank_biased_index`].
pub fn select_rank_biased<'a, T, R>(items: &'a [T], bias: f64, rng: &mut R) -> Result<&'a T, CastError>
where
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return Err(CastError::InvalidArgument {
            reason: "cannot select from an empty candidate list",
        });
    }
    let r: f64 = rng.gen();
    let index = rank_biased_index(items.len(), bias, r)?;
    Ok(&items[index])
}
