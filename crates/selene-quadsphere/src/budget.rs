//! Per-frame subdivision budget.

/// Caps how many tiles may subdivide in a single frame.
///
/// Each subdivision creates four children and submits four fetches, so the
/// budget bounds both per-frame CPU work and the fetch queue growth rate.
/// Reset once per [`Quadsphere::update`](crate::Quadsphere::update).
#[derive(Clone, Copy, Debug)]
pub struct SubdivisionBudget {
    limit: u32,
    used: u32,
}

impl SubdivisionBudget {
    /// Create a budget allowing `limit` subdivisions per frame.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self { limit, used: 0 }
    }

    /// Start a new frame.
    pub fn reset(&mut self) {
        self.used = 0;
    }

    /// Take one subdivision unit. Returns `false` once the frame's limit is
    /// reached, leaving the budget untouched.
    pub fn try_consume(&mut self) -> bool {
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }

    /// True if no units remain this frame.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }

    /// Subdivisions taken since the last reset.
    #[must_use]
    pub fn used(&self) -> u32 {
        self.used
    }

    /// Change the per-frame limit. Takes effect immediately; a lowered limit
    /// can exhaust the current frame's remainder.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
    }

    /// The per-frame limit.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }
}
