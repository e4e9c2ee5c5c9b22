//! Data source port trait.

use crate::domain::error::PicksError;
use crate::domain::row::{PerformanceSnapshot, ReboundRow};

/// Supplier of raw dataset snapshots. Each call is an independent request.
///
/// Over HTTP both fetches hit the same dashboard endpoint, which re-scrapes
/// the whole universe per request. A refresh of both datasets therefore
/// costs two scrapes, and the two snapshots may come from different scrapes.
pub trait DataPort {
    /// Performance rows in source rank order, plus the optional benchmark row.
    fn fetch_performance(&self) -> Result<PerformanceSnapshot, PicksError>;

    fn fetch_rebound(&self) -> Result<Vec<ReboundRow>, PicksError>;
}
