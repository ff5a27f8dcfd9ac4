use serde_json::Value;

use crate::{
    error::ProtocolError,
    request::{decode_json, Operation, Request, Tier},
};

/// Profile of the key owner.
#[derive(Debug, Clone, Default)]
pub struct GetUserData;

impl Operation for GetUserData {
    type Output = Value;

    fn request(&self) -> Request {
        Request::get(Tier::READ, "user")
    }

    fn decode(&self, body: &str) -> Result<Value, ProtocolError> {
        decode_json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_request_has_no_task() {
        let request = GetUserData.request();
        assert_eq!(request.service, "user");
        assert_eq!(request.task, None);
        assert!(request.params.is_empty());
    }
}
