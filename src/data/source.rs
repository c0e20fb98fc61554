//! The fetch seam: anything that can hand back a dated yield series per tenor.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{Tenor, YieldTable};
use crate::error::AppError;

pub trait YieldSource {
    /// Observations for one tenor inside `[start, end]`, yields in percent.
    fn fetch_series(
        &self,
        tenor: Tenor,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>, AppError>;
}

/// Fetch every tenor and join the series into one table.
///
/// The first failing tenor aborts the whole fetch, as does a tenor that
/// comes back without any usable observation.
pub fn fetch_table(
    source: &dyn YieldSource,
    tenors: &[Tenor],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<YieldTable, AppError> {
    let mut series = Vec::with_capacity(tenors.len());
    for &tenor in tenors {
        let obs = source.fetch_series(tenor, start, end)?;
        if obs.is_empty() {
            return Err(AppError::Data(format!(
                "No observations returned for series {} ({tenor}).",
                tenor.series_id()
            )));
        }
        info!(%tenor, series_id = tenor.series_id(), n = obs.len(), "fetched series");
        series.push((tenor, obs));
    }

    let table = YieldTable::from_series(series)?;
    info!(
        tenors = table.tenors().len(),
        days = table.len(),
        observations = table.observations().count(),
        "built yield table"
    );
    Ok(table)
}
