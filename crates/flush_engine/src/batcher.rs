//! Size-bounded chunking.

/// Split `items` into consecutive chunks of at most `max_size`.
///
/// Produces `ceil(n / max_size)` chunks in input order; every chunk except
/// possibly the last is full. An empty input yields no chunks. A `max_size`
/// of zero is treated as one.
pub fn chunk<T>(items: Vec<T>, max_size: usize) -> Vec<Vec<T>> {
    let size = max_size.max(1);
    let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
    let mut iter = items.into_iter();

    loop {
        let next: Vec<T> = iter.by_ref().take(size).collect();
        if next.is_empty() {
            break;
        }
        chunks.push(next);
    }

    chunks
}
