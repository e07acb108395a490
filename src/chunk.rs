/// Half-open index range assigned to one worker or process.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
    pub size: usize,
}

/// Splits `[start, end)` into `parts` chunks as evenly as possible and
/// returns the chunk owned by `id`.
///
/// The first `len % parts` chunks get one extra element. Concatenating all
/// chunks in id order reproduces the range exactly; every parallel variant
/// leans on that.
pub fn split(start: usize, end: usize, parts: usize, id: usize) -> Chunk {
    debug_assert!(parts > 0 && id < parts && start <= end);

    let len = end - start;
    let base = len / parts;
    let remainder = len % parts;

    let chunk_start = start + id * base + id.min(remainder);
    let chunk_end = chunk_start + base + usize::from(id < remainder);

    Chunk {
        start: chunk_start,
        end: chunk_end,
        size: chunk_end - chunk_start,
    }
}

/// All `parts` chunks of `[start, end)` in id order.
pub fn split_all(start: usize, end: usize, parts: usize) -> Vec<Chunk> {
    (0..parts).map(|id| split(start, end, parts, id)).collect()
}
