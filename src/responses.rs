//! Response envelopes shared by every endpoint.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BooleanResponse {
    pub result: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_response_serialization() {
        let json = serde_json::to_string(&BooleanResponse { result: true }).unwrap();
        assert_eq!(json, r#"{"result":true}"#);
    }
}
