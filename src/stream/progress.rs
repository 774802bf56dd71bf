//! Progress reporting for long reads

use log::trace;

/// Advances a caller-owned cursor roughly `steps` times over `total` items.
///
/// The cursor moves by `1 / steps` every `max(1, total / steps)` items. It
/// exists for user feedback only and carries no correctness contract.
pub struct Progress<'a> {
    cursor: Option<&'a mut f64>,
    interval: usize,
    increment: f64,
}

impl<'a> Progress<'a> {
    pub fn new(cursor: Option<&'a mut f64>, total: usize, steps: usize) -> Self {
        let steps = steps.max(1);
        Self {
            cursor,
            interval: (total / steps).max(1),
            increment: 1.0 / steps as f64,
        }
    }

    /// Records that item `i` (0-based) has been processed
    pub fn tick(&mut self, i: usize) {
        if i % self.interval != 0 {
            return;
        }
        if let Some(cursor) = self.cursor.as_deref_mut() {
            *cursor += self.increment;
            trace!("progress {:.2}", *cursor);
        }
    }
}
