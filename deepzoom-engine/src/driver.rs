//! Parallel row driver: splits the output buffer into row-sized chunks and
//! hands each to `rayon`'s work-stealing pool. Rows vary wildly in iteration
//! cost (an interior row finishes its cardioid test instantly, an escape
//! frontier row can run to `max_iter`), so static chunking produces bad tail
//! latency — work-stealing is the "guided/dynamic" schedule this calls for.

use rayon::prelude::*;

/// Anything that can fill one output row given its row index.
///
/// Implementations must be safe to call concurrently from multiple worker
/// threads with distinct `py` — no interior mutability beyond what `Sync`
/// already permits.
pub trait RowKernel: Sync {
    fn compute_row(&self, py: u32, row_out: &mut [f64]);
}

/// Render every row of `out` (row-major, `width` columns) by dispatching to
/// `kernel` across `rayon`'s thread pool. Blocks until every row is written.
pub fn render(kernel: &dyn RowKernel, width: u32, out: &mut [f64]) {
    out.par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(py, row)| kernel.compute_row(py as u32, row));
}
