//! TVS episode-tracking service client.
//!
//! Maps typed operations onto keyed requests against the single API
//! endpoint. The key of each request is picked by the operation's tier.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, Span};
use tvs_protocol::{
    episode::{
        stats::{GetEpisodeStats, GetStatComparePicture, StatsFormat},
        tracking::{
            AddSeriesToGroup, CreateGroup, DeleteGroup, GetAllData, GetCategories, GetData,
            GetGroups, GetSeason, RenameGroup, SetSeenStatus, StartTracking, StopTracking,
        },
    },
    games::{Game, GetGameTopList},
    messages::{GetLastMessages, GetMessageCount},
    user::GetUserData,
    FieldList, Groups, Method, Operation, RangeSpec, Request, SeriesData, SeriesId, SeriesIds,
};

use super::transport::{PreparedCall, ReqwestTransport, Transport};
use crate::config::TrackerConfig;
use crate::error::{AppError, Result};

/// Client for the TVS tracking API.
///
/// Immutable after construction and safe to share between tasks.
pub struct TrackerClient {
    endpoint: String,
    keys: Vec<String>,
    transport: Arc<dyn Transport>,
    span: Span,
}

impl TrackerClient {
    /// Create a client using the `reqwest` transport.
    ///
    /// `keys` are ordered by tier: index 0 is the least privileged key.
    pub fn new(endpoint: impl Into<String>, keys: Vec<String>) -> Result<Self> {
        Self::with_transport(endpoint, keys, Arc::new(ReqwestTransport::new()?))
    }

    /// Create a client sending requests through the given transport.
    pub fn with_transport(
        endpoint: impl Into<String>,
        keys: Vec<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(AppError::Configuration(
                "Tracker endpoint cannot be empty".to_string(),
            ));
        }

        let span = tracing::debug_span!("tracker", endpoint = %endpoint);
        span.in_scope(|| tracing::debug!(key_count = keys.len(), "Tracker client initialized"));

        Ok(Self {
            endpoint,
            keys,
            transport,
            span,
        })
    }

    /// Create a client from configuration.
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        let transport = ReqwestTransport::with_options(
            Duration::from_secs(config.timeout_secs),
            config.user_agent.as_deref(),
        )?;
        Self::with_transport(config.endpoint.clone(), config.keys.clone(), Arc::new(transport))
    }

    /// Create a new client wrapped in Arc for shared access.
    pub fn new_shared(config: &TrackerConfig) -> Result<Arc<Self>> {
        Ok(Arc::new(Self::from_config(config)?))
    }

    /// Log every call of this client inside `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of configured tiers.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Send a raw request and return the response body.
    ///
    /// Fails with [`AppError::Configuration`] before anything is sent when no
    /// key exists for the request's tier.
    pub async fn call(&self, request: &Request) -> Result<String> {
        let call = self.prepare(request)?;

        async {
            tracing::debug!(
                method = %call.method,
                tier = %request.tier,
                service = request.service,
                task = ?request.task,
                params = %request.params_string(),
                "Calling tracker"
            );

            let body = self.transport.send(&call).await.map_err(|e| {
                tracing::debug!(error = %e, "Tracker call failed");
                e
            })?;

            tracing::trace!(bytes = body.len(), "Tracker responded");
            Ok::<_, AppError>(body)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Run a typed operation and decode its result.
    pub async fn execute<O: Operation>(&self, operation: &O) -> Result<O::Output> {
        let body = self.call(&operation.request()).await?;
        Ok(operation.decode(&body)?)
    }

    /// Attach the tier's key and split parameters into query and form pairs.
    fn prepare(&self, request: &Request) -> Result<PreparedCall> {
        let key = self.keys.get(request.tier.index()).ok_or_else(|| {
            AppError::Configuration(format!(
                "Key level ({}) is not provided, {} key(s) configured",
                request.tier,
                self.keys.len()
            ))
        })?;

        let mut query = vec![
            ("apikey".to_string(), key.clone()),
            ("service".to_string(), request.service.to_string()),
        ];
        if let Some(task) = request.task {
            query.push(("task".to_string(), task.to_string()));
        }

        let params = request
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()));
        let form = match request.method {
            Method::Get => {
                query.extend(params);
                Vec::new()
            }
            Method::Post => params.collect(),
        };

        Ok(PreparedCall {
            method: request.method,
            endpoint: self.endpoint.clone(),
            query,
            form,
        })
    }

    // =========================================================================
    // Account Operations
    // =========================================================================

    pub async fn get_user_data(&self) -> Result<Value> {
        self.execute(&GetUserData).await
    }

    pub async fn get_message_count(&self) -> Result<Value> {
        self.execute(&GetMessageCount).await
    }

    pub async fn get_last_messages(&self, limit: u32) -> Result<Value> {
        self.execute(&GetLastMessages { limit }).await
    }

    pub async fn get_game_top_list(&self, game: Game, top: u8) -> Result<Value> {
        self.execute(&GetGameTopList { game, top }).await
    }

    pub async fn get_episode_stats(&self, format: StatsFormat) -> Result<Value> {
        self.execute(&GetEpisodeStats { format }).await
    }

    /// `vs` is the other user's tier 0 key.
    pub async fn get_stat_compare_picture(&self, vs: &str) -> Result<Value> {
        self.execute(&GetStatComparePicture { vs: vs.to_string() })
            .await
    }

    // =========================================================================
    // Tracking Reads
    // =========================================================================

    pub async fn get_categories(
        &self,
        search: Option<&str>,
        series_ids: &[SeriesId],
        fields: FieldList,
    ) -> Result<Value> {
        self.execute(&GetCategories {
            search: search.map(str::to_string),
            series_ids: SeriesIds::from(series_ids),
            fields,
        })
        .await
    }

    pub async fn get_groups(&self, only_favorites: bool) -> Result<Groups> {
        self.execute(&GetGroups { only_favorites }).await
    }

    pub async fn get_data(&self, series_ids: &[SeriesId], fields: FieldList) -> Result<SeriesData> {
        self.execute(&GetData {
            series_ids: SeriesIds::from(series_ids),
            fields,
        })
        .await
    }

    /// Full tracking data, including per-episode status tables.
    pub async fn get_all_data(
        &self,
        series_ids: &[SeriesId],
        fields: FieldList,
    ) -> Result<SeriesData> {
        self.execute(&GetAllData {
            series_ids: SeriesIds::from(series_ids),
            fields,
        })
        .await
    }

    pub async fn get_season(&self, series_id: SeriesId, season: u32) -> Result<Value> {
        self.execute(&GetSeason { series_id, season }).await
    }

    // =========================================================================
    // Tracking Mutations
    // =========================================================================

    /// Returns the id of the new group.
    pub async fn create_group(&self, name: &str) -> Result<u64> {
        self.execute(&CreateGroup {
            name: name.to_string(),
        })
        .await
    }

    pub async fn rename_group(&self, group_id: u64, name: &str) -> Result<bool> {
        self.execute(&RenameGroup {
            group_id,
            name: name.to_string(),
        })
        .await
    }

    pub async fn delete_group(&self, group_id: u64) -> Result<bool> {
        self.execute(&DeleteGroup { group_id }).await
    }

    pub async fn add_series_to_group(
        &self,
        series_id: SeriesId,
        group_id: Option<u64>,
    ) -> Result<bool> {
        self.execute(&AddSeriesToGroup {
            series_id,
            group_id,
        })
        .await
    }

    pub async fn start_tracking(&self, series_id: SeriesId, group_id: Option<u64>) -> Result<Value> {
        self.execute(&StartTracking {
            series_id,
            group_id,
        })
        .await
    }

    /// Stops tracking and deletes all tracking information of the series.
    pub async fn stop_tracking(&self, series_id: SeriesId) -> Result<bool> {
        self.execute(&StopTracking { series_id }).await
    }

    pub async fn set_seen_status(
        &self,
        series_id: SeriesId,
        language: &str,
        seen: bool,
        seasons: impl Into<RangeSpec>,
        episodes: Option<RangeSpec>,
    ) -> Result<bool> {
        self.execute(&SetSeenStatus {
            series_id,
            language: language.to_string(),
            seen,
            seasons: seasons.into(),
            episodes,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvs_protocol::Tier;

    fn client(keys: &[&str]) -> TrackerClient {
        TrackerClient::new(
            "https://tracker.test/api.php",
            keys.iter().map(|k| k.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let result = TrackerClient::new("  ", vec!["key".to_string()]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_prepare_get_puts_params_in_query() {
        let call = client(&["read"])
            .prepare(&GetGroups::default().request())
            .unwrap();
        assert_eq!(call.method, Method::Get);
        assert_eq!(call.param("apikey"), Some("read"));
        assert_eq!(call.param("service"), Some("episode"));
        assert_eq!(call.param("task"), Some("tracking"));
        assert_eq!(call.param("action"), Some("getgroups"));
        assert!(call.form.is_empty());
    }

    #[test]
    fn test_prepare_post_puts_params_in_form() {
        let request = CreateGroup {
            name: "Drama".to_string(),
        }
        .request();
        let call = client(&["read", "write"]).prepare(&request).unwrap();
        assert_eq!(call.method, Method::Post);
        assert_eq!(call.param("apikey"), Some("write"));
        assert_eq!(
            call.form,
            vec![
                ("action".to_string(), "creategroup".to_string()),
                ("n".to_string(), "Drama".to_string()),
            ]
        );
        assert!(!call.query.iter().any(|(k, _)| k == "n"));
    }

    #[test]
    fn test_prepare_without_task() {
        let call = client(&["read"]).prepare(&GetUserData.request()).unwrap();
        assert_eq!(call.param("task"), None);
        assert_eq!(call.query.len(), 2);
    }

    #[test]
    fn test_prepare_rejects_missing_tier() {
        let request = Request::get(Tier::PRIVATE, "pm").task("latest");
        let result = client(&["read", "write"]).prepare(&request);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
