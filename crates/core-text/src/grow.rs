//! Bounded geometric growth for the storage vectors.

/// Why a vector could not take more elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Exhausted {
    Ceiling,
    Alloc,
}

/// Make room for `extra` more elements in `vec` without letting its length
/// pass `ceiling`. Capacity doubles (starting at `initial`) and is capped at
/// the ceiling; allocation failure is reported instead of aborting.
pub(crate) fn reserve_bounded<T>(
    vec: &mut Vec<T>,
    extra: usize,
    ceiling: usize,
    initial: usize,
) -> Result<(), Exhausted> {
    let needed = vec.len().checked_add(extra).ok_or(Exhausted::Ceiling)?;
    if needed > ceiling {
        return Err(Exhausted::Ceiling);
    }
    if needed <= vec.capacity() {
        return Ok(());
    }
    let mut target = vec.capacity().max(initial.max(1));
    while target < needed {
        target = target.saturating_mul(2);
    }
    let target = target.min(ceiling);
    vec.try_reserve_exact(target - vec.len())
        .map_err(|_| Exhausted::Alloc)
}
