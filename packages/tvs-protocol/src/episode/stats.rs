use std::fmt;

use serde_json::Value;

use super::SERVICE;
use crate::{
    error::ProtocolError,
    request::{decode_json, Operation, Request, Tier},
};

/// Response format of the statistics endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatsFormat {
    Html,
    Image,
    #[default]
    Json,
}

impl fmt::Display for StatsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatsFormat::Html => "html",
            StatsFormat::Image => "image",
            StatsFormat::Json => "json",
        })
    }
}

/// Episode statistics of the key owner.
///
/// Only the JSON format is decoded; other formats come back as a JSON string
/// holding the raw body.
#[derive(Debug, Clone, Default)]
pub struct GetEpisodeStats {
    pub format: StatsFormat,
}

impl Operation for GetEpisodeStats {
    type Output = Value;

    fn request(&self) -> Request {
        Request::get(Tier::READ, SERVICE)
            .task("stats")
            .param("format", self.format)
    }

    fn decode(&self, body: &str) -> Result<Value, ProtocolError> {
        match self.format {
            StatsFormat::Json => decode_json(body),
            _ => Ok(Value::String(body.to_string())),
        }
    }
}

/// Comparison picture against another user, identified by their tier 0 key.
///
/// The service answers with JSON when it can; anything else is kept as a
/// JSON string.
#[derive(Debug, Clone)]
pub struct GetStatComparePicture {
    pub vs: String,
}

impl Operation for GetStatComparePicture {
    type Output = Value;

    fn request(&self) -> Request {
        Request::get(Tier::READ, SERVICE)
            .task("compare")
            .param("vs", &self.vs)
    }

    fn decode(&self, body: &str) -> Result<Value, ProtocolError> {
        Ok(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_request() {
        let request = GetEpisodeStats::default().request();
        assert_eq!(request.task, Some("stats"));
        assert_eq!(request.param_value("format"), Some("json"));
    }

    #[test]
    fn test_html_stats_kept_raw() {
        let op = GetEpisodeStats {
            format: StatsFormat::Html,
        };
        assert_eq!(op.request().param_value("format"), Some("html"));
        assert_eq!(
            op.decode("<b>stats</b>").unwrap(),
            Value::String("<b>stats</b>".to_string())
        );
    }

    #[test]
    fn test_compare_picture_falls_back_to_text() {
        let op = GetStatComparePicture {
            vs: "other-key".to_string(),
        };
        assert_eq!(op.request().param_value("vs"), Some("other-key"));
        assert_eq!(op.decode(r#"{"url": "x.png"}"#).unwrap()["url"], "x.png");
        assert_eq!(op.decode("x.png").unwrap(), Value::String("x.png".to_string()));
    }
}
