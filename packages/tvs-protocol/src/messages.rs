//! The `pm` service: private messages.

use serde_json::Value;

use crate::{
    error::ProtocolError,
    request::{decode_json, Operation, Request, Tier},
};

const SERVICE: &str = "pm";

/// Number of unread private messages.
#[derive(Debug, Clone, Default)]
pub struct GetMessageCount;

impl Operation for GetMessageCount {
    type Output = Value;

    fn request(&self) -> Request {
        Request::get(Tier::WRITE, SERVICE).task("msgcount")
    }

    fn decode(&self, body: &str) -> Result<Value, ProtocolError> {
        decode_json(body)
    }
}

/// The most recent private messages.
#[derive(Debug, Clone)]
pub struct GetLastMessages {
    pub limit: u32,
}

impl Default for GetLastMessages {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

impl Operation for GetLastMessages {
    type Output = Value;

    fn request(&self) -> Request {
        Request::get(Tier::PRIVATE, SERVICE)
            .task("latest")
            .param("limit", self.limit)
    }

    fn decode(&self, body: &str) -> Result<Value, ProtocolError> {
        decode_json(body)
    }
}
