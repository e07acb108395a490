/// Contiguous (source, destination) count table used by the sampling sorts.
///
/// One allocation owned by the call frame. Rows are the per-worker views
/// filled during the partition phase; the column math that turns counts into
/// global write offsets runs in a single-owner section after the fill
/// barrier.
pub struct ExchangeTable {
    counts: Vec<usize>,
    parts: usize,
}

impl ExchangeTable {
    pub fn new(parts: usize) -> Self {
        Self {
            counts: vec![0; parts * parts],
            parts,
        }
    }

    /// Counts of source `src`, one slot per destination.
    pub fn row(&self, src: usize) -> &[usize] {
        &self.counts[src * self.parts..(src + 1) * self.parts]
    }

    /// Disjoint mutable row views, one per source.
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, usize> {
        self.counts.chunks_mut(self.parts)
    }

    /// Start offset of every destination partition in the repartitioned
    /// range: prefix sums over the destination-column totals, length
    /// `parts + 1`, first slot 0.
    pub fn destination_offsets(&self) -> Vec<usize> {
        let mut offsets = vec![0; self.parts + 1];
        for dst in 0..self.parts {
            let total: usize = (0..self.parts).map(|src| self.row(src)[dst]).sum();
            offsets[dst + 1] = offsets[dst] + total;
        }
        offsets
    }

    /// Flat (source, destination) table of write offsets within each
    /// destination: how many elements earlier sources contribute to it.
    pub fn source_offsets(&self) -> Vec<usize> {
        let mut before = vec![0; self.parts * self.parts];
        for dst in 0..self.parts {
            let mut running = 0;
            for src in 0..self.parts {
                before[src * self.parts + dst] = running;
                running += self.row(src)[dst];
            }
        }
        before
    }
}
