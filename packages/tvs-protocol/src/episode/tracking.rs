//! `episode/tracking` operations: groups, series data and seen status.
//!
//! Reads use tier 0, every mutation uses tier 1.

use serde_json::Value;

use super::{
    model::{Groups, SeriesData},
    SERVICE,
};
use crate::{
    error::ProtocolError,
    params::{FieldList, RangeSpec, SeriesId, SeriesIds},
    request::{decode_flag, decode_id, decode_json, Operation, Request, Tier},
};

const TASK: &str = "tracking";

fn read(action: &'static str) -> Request {
    Request::get(Tier::READ, SERVICE)
        .task(TASK)
        .param("action", action)
}

fn write(action: &'static str) -> Request {
    Request::post(Tier::WRITE, SERVICE)
        .task(TASK)
        .param("action", action)
}

/// Search tracked series by name in all languages.
#[derive(Debug, Clone, Default)]
pub struct GetCategories {
    pub search: Option<String>,
    pub series_ids: SeriesIds,
    pub fields: FieldList,
}

impl Operation for GetCategories {
    type Output = Value;

    fn request(&self) -> Request {
        read("getcategs")
            .param_opt("search", self.search.as_deref())
            .param("c", &self.series_ids)
            .param("fields", &self.fields)
    }

    fn decode(&self, body: &str) -> Result<Value, ProtocolError> {
        decode_json(body)
    }
}

/// The user's groups, optionally only the favorites.
#[derive(Debug, Clone, Default)]
pub struct GetGroups {
    pub only_favorites: bool,
}

impl Operation for GetGroups {
    type Output = Groups;

    fn request(&self) -> Request {
        read("getgroups").param("fav", u8::from(self.only_favorites))
    }

    fn decode(&self, body: &str) -> Result<Groups, ProtocolError> {
        decode_json(body)
    }
}

/// Tracking data of the given series.
#[derive(Debug, Clone, Default)]
pub struct GetData {
    pub series_ids: SeriesIds,
    pub fields: FieldList,
}

impl Operation for GetData {
    type Output = SeriesData;

    fn request(&self) -> Request {
        read("getdata")
            .param("c", &self.series_ids)
            .param("fields", &self.fields)
    }

    fn decode(&self, body: &str) -> Result<SeriesData, ProtocolError> {
        decode_json(body)
    }
}

/// Full tracking data, including per-episode status tables, of the given series.
#[derive(Debug, Clone, Default)]
pub struct GetAllData {
    pub series_ids: SeriesIds,
    pub fields: FieldList,
}

impl Operation for GetAllData {
    type Output = SeriesData;

    fn request(&self) -> Request {
        read("getalldata")
            .param("c", &self.series_ids)
            .param("fields", &self.fields)
    }

    fn decode(&self, body: &str) -> Result<SeriesData, ProtocolError> {
        decode_json(body)
    }
}

/// A single season of a series.
#[derive(Debug, Clone)]
pub struct GetSeason {
    pub series_id: SeriesId,
    pub season: u32,
}

impl Operation for GetSeason {
    type Output = Value;

    fn request(&self) -> Request {
        read("getseason")
            .param("c", self.series_id)
            .param("s", self.season)
    }

    fn decode(&self, body: &str) -> Result<Value, ProtocolError> {
        decode_json(body)
    }
}

/// Creates a group, yielding its id.
#[derive(Debug, Clone)]
pub struct CreateGroup {
    pub name: String,
}

impl Operation for CreateGroup {
    type Output = u64;

    fn request(&self) -> Request {
        write("creategroup").param("n", &self.name)
    }

    fn decode(&self, body: &str) -> Result<u64, ProtocolError> {
        decode_id(body)
    }
}

#[derive(Debug, Clone)]
pub struct RenameGroup {
    pub group_id: u64,
    pub name: String,
}

impl Operation for RenameGroup {
    type Output = bool;

    fn request(&self) -> Request {
        write("renamegroup")
            .param("g", self.group_id)
            .param("n", &self.name)
    }

    fn decode(&self, body: &str) -> Result<bool, ProtocolError> {
        decode_flag(body)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteGroup {
    pub group_id: u64,
}

impl Operation for DeleteGroup {
    type Output = bool;

    fn request(&self) -> Request {
        write("deletegroup").param("g", self.group_id)
    }

    fn decode(&self, body: &str) -> Result<bool, ProtocolError> {
        decode_flag(body)
    }
}

/// Moves a tracked series into a group, or out of any group when `group_id` is `None`.
#[derive(Debug, Clone)]
pub struct AddSeriesToGroup {
    pub series_id: SeriesId,
    pub group_id: Option<u64>,
}

impl Operation for AddSeriesToGroup {
    type Output = bool;

    fn request(&self) -> Request {
        write("setgroup")
            .param("c", self.series_id)
            .param_opt("g", self.group_id)
    }

    fn decode(&self, body: &str) -> Result<bool, ProtocolError> {
        decode_flag(body)
    }
}

/// Starts tracking a series, returning its tracking data.
#[derive(Debug, Clone)]
pub struct StartTracking {
    pub series_id: SeriesId,
    pub group_id: Option<u64>,
}

impl Operation for StartTracking {
    type Output = Value;

    fn request(&self) -> Request {
        write("addcateg")
            .param("c", self.series_id)
            .param_opt("g", self.group_id)
    }

    fn decode(&self, body: &str) -> Result<Value, ProtocolError> {
        decode_json(body)
    }
}

/// Stops tracking a series and deletes all of its tracking information.
#[derive(Debug, Clone)]
pub struct StopTracking {
    pub series_id: SeriesId,
}

impl Operation for StopTracking {
    type Output = bool;

    fn request(&self) -> Request {
        write("deletecateg").param("c", self.series_id)
    }

    fn decode(&self, body: &str) -> Result<bool, ProtocolError> {
        decode_flag(body)
    }
}

/// Marks seasons, or episodes within them, as seen or not seen in a language.
///
/// Without `episodes` every episode of the selected seasons is updated.
#[derive(Debug, Clone)]
pub struct SetSeenStatus {
    pub series_id: SeriesId,
    pub language: String,
    pub seen: bool,
    pub seasons: RangeSpec,
    pub episodes: Option<RangeSpec>,
}

impl Operation for SetSeenStatus {
    type Output = bool;

    fn request(&self) -> Request {
        write("setstatus")
            .param("c", self.series_id)
            .param("s", &self.seasons)
            .param_opt("e", self.episodes.as_ref())
            .param("l", &self.language)
            .param("status", u8::from(self.seen))
    }

    fn decode(&self, body: &str) -> Result<bool, ProtocolError> {
        decode_flag(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;

    #[test]
    fn test_get_groups_request() {
        let request = GetGroups::default().request();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.tier, Tier::READ);
        assert_eq!(request.service, "episode");
        assert_eq!(request.task, Some("tracking"));
        assert_eq!(request.params_string(), "action=getgroups&fav=0");

        let favorites = GetGroups {
            only_favorites: true,
        };
        assert_eq!(favorites.request().param_value("fav"), Some("1"));
    }

    #[test]
    fn test_get_all_data_encodes_ids_and_fields() {
        let op = GetAllData {
            series_ids: SeriesIds::from(vec![1, 2, 2, 3]),
            fields: FieldList::new(["name", "lastseen"]),
        };
        assert_eq!(
            op.request().params_string(),
            "action=getalldata&c=1,2,2,3&fields=name,lastseen"
        );
    }

    #[test]
    fn test_get_categories_omits_missing_search() {
        let op = GetCategories {
            series_ids: SeriesIds::from(vec![7]),
            ..Default::default()
        };
        let request = op.request();
        assert_eq!(request.param_value("search"), None);
        assert_eq!(request.param_value("c"), Some("7"));
    }

    #[test]
    fn test_mutations_require_write_tier() {
        let requests = [
            CreateGroup {
                name: "Drama".to_string(),
            }
            .request(),
            RenameGroup {
                group_id: 3,
                name: "Comedy".to_string(),
            }
            .request(),
            DeleteGroup { group_id: 3 }.request(),
            AddSeriesToGroup {
                series_id: 10,
                group_id: Some(3),
            }
            .request(),
            StartTracking {
                series_id: 10,
                group_id: None,
            }
            .request(),
            StopTracking { series_id: 10 }.request(),
        ];
        for request in requests {
            assert_eq!(request.method, Method::Post);
            assert_eq!(request.tier, Tier::WRITE);
        }
    }

    #[test]
    fn test_set_seen_status_passes_ranges_verbatim() {
        let op = SetSeenStatus {
            series_id: 42,
            language: "en".to_string(),
            seen: true,
            seasons: RangeSpec::from("1-3,5"),
            episodes: Some(RangeSpec::from(vec![1, 2])),
        };
        assert_eq!(
            op.request().params_string(),
            "action=setstatus&c=42&s=1-3,5&e=1,2&l=en&status=1"
        );
    }

    #[test]
    fn test_set_seen_status_without_episodes() {
        let op = SetSeenStatus {
            series_id: 42,
            language: "de".to_string(),
            seen: false,
            seasons: RangeSpec::from(2),
            episodes: None,
        };
        assert_eq!(
            op.request().params_string(),
            "action=setstatus&c=42&s=2&l=de&status=0"
        );
    }

    #[test]
    fn test_decode_post_results() {
        let create = CreateGroup {
            name: "x".to_string(),
        };
        assert_eq!(create.decode("17").unwrap(), 17);
        assert!(DeleteGroup { group_id: 1 }.decode("1").unwrap());
        assert!(!StopTracking { series_id: 1 }.decode("0").unwrap());
    }
}
