//! Wire contract of the TVS episode-tracking API.
//!
//! Every remote operation is a plain struct implementing [`Operation`]: it
//! knows which HTTP method, authorization tier, service and task it maps to,
//! how its arguments are encoded as parameters, and how the response body is
//! decoded. Nothing in this crate performs I/O.

pub mod episode;
pub mod error;
pub mod games;
pub mod messages;
pub mod ordered;
pub mod params;
pub mod request;
pub mod user;

pub(crate) use serde::{Deserialize, Serialize};

pub use episode::model::{
    EpisodeNumber, EpisodeStatus, Group, Groups, Season, SeasonKey, Series, SeriesData,
    WatchStatus,
};
pub use error::ProtocolError;
pub use ordered::OrderedMap;
pub use params::{FieldList, RangeSpec, SeriesId, SeriesIds};
pub use request::{Method, Operation, Request, Tier};
