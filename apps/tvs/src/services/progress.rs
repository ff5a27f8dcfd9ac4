//! Watch progress reconciliation.
//!
//! Combines the user's groups with the bulk tracking data of every grouped
//! series and reports, per series, the seasons not yet watched in a language.

use serde::Serialize;
use std::sync::Arc;
use tvs_protocol::{FieldList, Groups, Season, SeasonKey, Series, SeriesId, WatchStatus};

use super::tracker::TrackerClient;
use crate::error::{AppError, Result};

/// A series with at least one incomplete season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncompleteSeries {
    /// Key of the series in the bulk data payload.
    pub series_id: String,
    pub series: Series,
    /// Incomplete seasons in payload order.
    pub seasons: Vec<SeasonKey>,
}

/// Computes incomplete seasons from the tracker's data.
pub struct ProgressReconciler {
    client: Arc<TrackerClient>,
}

impl ProgressReconciler {
    pub fn new(client: Arc<TrackerClient>) -> Self {
        Self { client }
    }

    /// Every tracked series with at least one season that is incomplete in
    /// `language`, in the order the service returned them.
    ///
    /// Any client failure aborts the whole pass.
    pub async fn compute_incomplete_seasons(&self, language: &str) -> Result<Vec<IncompleteSeries>> {
        let groups = self.client.get_groups(false).await?;
        let tracked = tracked_series_ids(&groups);
        tracing::debug!(
            groups = groups.len(),
            tracked = tracked.len(),
            "Collected tracked series"
        );

        let data = self
            .client
            .get_all_data(&tracked, FieldList::default())
            .await?;

        let mut result = Vec::new();
        for (series_id, series) in data {
            if is_caught_up(&series_id, &series)? {
                tracing::trace!(series = %series_id, "Series caught up, skipping");
                continue;
            }

            let seasons = incomplete_seasons(&series_id, &series, language)?;
            if !seasons.is_empty() {
                result.push(IncompleteSeries {
                    series_id,
                    series,
                    seasons,
                });
            }
        }

        tracing::info!(
            language = %language,
            incomplete = result.len(),
            "Progress reconciled"
        );
        Ok(result)
    }
}

/// Series ids of every group, concatenated in group order, duplicates kept.
pub fn tracked_series_ids(groups: &Groups) -> Vec<SeriesId> {
    groups
        .values()
        .flat_map(|group| group.categs.iter().copied())
        .collect()
}

/// Whether `lastseen` already points at the final known episode.
///
/// Only the last `epnums` entry counts, in payload order.
pub fn is_caught_up(series_id: &str, series: &Series) -> Result<bool> {
    let last_known = series.last_known_coordinate().ok_or_else(|| {
        AppError::DataShape(format!("series {} has no epnums", series_id))
    })?;
    Ok(series.lastseen.as_deref() == Some(last_known.as_str()))
}

/// Seasons of `series` whose status in `language` stays undecided.
pub fn incomplete_seasons(
    series_id: &str,
    series: &Series,
    language: &str,
) -> Result<Vec<SeasonKey>> {
    let episodes = series
        .episodes
        .as_ref()
        .filter(|episodes| !episodes.is_empty())
        .ok_or_else(|| {
            AppError::DataShape(format!("series {} has no episode table", series_id))
        })?;

    Ok(episodes
        .iter()
        .filter(|(_, season)| season_status(season, language) == Some(WatchStatus::Unknown))
        .map(|(key, _)| key.clone())
        .collect())
}

/// Status of the first episode, in payload order, that is not `Unknown`.
///
/// Stays `Unknown` when every episode is. An episode without an entry for
/// `language` settles the season as `None`.
pub fn season_status(season: &Season, language: &str) -> Option<WatchStatus> {
    let mut status = Some(WatchStatus::Unknown);
    for episode in season.values() {
        let episode_status = episode.status(language);
        if status == Some(WatchStatus::Unknown) && episode_status != Some(WatchStatus::Unknown) {
            status = episode_status;
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(statuses: &[u8]) -> Season {
        let episodes = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| format!(r#""{}": {{"en": {}}}"#, i + 1, s))
            .collect::<Vec<_>>()
            .join(",");
        serde_json::from_str(&format!("{{{}}}", episodes)).unwrap()
    }

    // Parsed from text so the payload key order is kept.
    fn series(json: &str) -> Series {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_all_unknown_season_is_incomplete() {
        assert_eq!(season_status(&season(&[2, 2, 2]), "en"), Some(WatchStatus::Unknown));
    }

    #[test]
    fn test_first_decided_episode_wins() {
        assert_eq!(
            season_status(&season(&[2, 2, 0, 1]), "en"),
            Some(WatchStatus::NotSeen)
        );
        assert_eq!(
            season_status(&season(&[0, 1, 2]), "en"),
            Some(WatchStatus::NotSeen)
        );
        assert_eq!(
            season_status(&season(&[1, 0]), "en"),
            Some(WatchStatus::Seen)
        );
    }

    #[test]
    fn test_empty_season_is_incomplete() {
        assert_eq!(season_status(&Season::new(), "en"), Some(WatchStatus::Unknown));
    }

    #[test]
    fn test_missing_language_settles_season() {
        assert_eq!(season_status(&season(&[2, 1]), "de"), None);
    }

    #[test]
    fn test_caught_up_uses_last_epnums_entry() {
        let s = series(r#"{"lastseen": "1x10", "epnums": {"2": 8, "1": 10}, "episodes": {"1": {}}}"#);
        assert!(is_caught_up("100", &s).unwrap());

        let behind =
            series(r#"{"lastseen": "2x8", "epnums": {"2": 8, "1": 10}, "episodes": {"1": {}}}"#);
        assert!(!is_caught_up("100", &behind).unwrap());
    }

    #[test]
    fn test_caught_up_compares_payload_text() {
        let padded = series(r#"{"lastseen": "1x10", "epnums": {"1": "010"}, "episodes": {"1": {}}}"#);
        assert!(!is_caught_up("100", &padded).unwrap());

        let exact = series(r#"{"lastseen": "1x010", "epnums": {"1": "010"}, "episodes": {"1": {}}}"#);
        assert!(is_caught_up("100", &exact).unwrap());
    }

    #[test]
    fn test_missing_lastseen_is_not_caught_up() {
        let s = series(r#"{"epnums": {"1": 10}, "episodes": {"1": {}}}"#);
        assert!(!is_caught_up("100", &s).unwrap());
    }

    #[test]
    fn test_missing_epnums_is_data_shape_error() {
        let s = series(r#"{"lastseen": "1x1", "episodes": {"1": {}}}"#);
        assert!(matches!(is_caught_up("7", &s), Err(AppError::DataShape(_))));

        let empty = series(r#"{"lastseen": "1x1", "epnums": [], "episodes": {"1": {}}}"#);
        assert!(matches!(is_caught_up("7", &empty), Err(AppError::DataShape(_))));
    }

    #[test]
    fn test_empty_episode_table_is_data_shape_error() {
        let s = series(r#"{"lastseen": "1x1", "epnums": {"1": 2}, "episodes": []}"#);
        assert!(matches!(
            incomplete_seasons("7", &s, "en"),
            Err(AppError::DataShape(_))
        ));

        let missing = series(r#"{"lastseen": "1x1", "epnums": {"1": 2}}"#);
        assert!(matches!(
            incomplete_seasons("7", &missing, "en"),
            Err(AppError::DataShape(_))
        ));
    }

    #[test]
    fn test_incomplete_seasons_in_payload_order() {
        let s = series(
            r#"{
                "lastseen": "1x1",
                "epnums": {"1": 2, "3": 2, "2": 2},
                "episodes": {
                    "3": {"1": {"en": 2}, "2": {"en": 2}},
                    "1": {"1": {"en": 1}, "2": {"en": 0}},
                    "2": {"1": {"en": 2}}
                }
            }"#,
        );
        assert_eq!(incomplete_seasons("1", &s, "en").unwrap(), vec!["3", "2"]);
    }
}
