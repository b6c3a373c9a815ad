use serde::Deserialize;
use uuid::Uuid;

/// Request body for login. Either `username` or `email` identifies the account;
/// a non-empty email wins.
#[derive(Debug, Deserialize)]
pub struct UserLoginReq {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct UserInfoReq {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "pendingRegId")]
    pub pending_reg_id: Uuid,
}
