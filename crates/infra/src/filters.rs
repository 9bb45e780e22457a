//! Parameterized `WHERE` clause construction for climate reading queries.
//!
//! All user input is bound through placeholders; nothing from a filter is
//! ever spliced into the SQL text.

use ecovision_core::ClimateFilter;
use sqlx::{MySql, QueryBuilder};

/// Append the predicates of `filter` to a query ending in `WHERE 1=1`.
///
/// Expects the aliases `cd` (`climate_data`) and `m` (`metrics`) to be in
/// scope. Clauses are appended in a fixed order: location, metric, start
/// date, end date, quality.
pub fn push_climate_filters(builder: &mut QueryBuilder<'_, MySql>, filter: &ClimateFilter) {
    if let Some(location_id) = filter.location_id {
        builder.push(" AND cd.location_id = ").push_bind(location_id);
    }

    if let Some(metric) = &filter.metric {
        builder.push(" AND m.name = ").push_bind(metric.clone());
    }

    if let Some(start) = filter.start_date {
        builder.push(" AND cd.date >= ").push_bind(start);
    }

    if let Some(end) = filter.end_date {
        builder.push(" AND cd.date <= ").push_bind(end);
    }

    // Inclusive threshold: "good" admits both "good" and "excellent".
    if let Some(threshold) = filter.quality_threshold {
        builder.push(" AND cd.quality IN (");
        let mut allowed = builder.separated(", ");
        for quality in threshold.at_or_above() {
            allowed.push_bind(quality.as_str());
        }
        allowed.push_unseparated(")");
    }
}
