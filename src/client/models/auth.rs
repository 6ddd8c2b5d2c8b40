//! Authentication models

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Which flow an access-code request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignInMode {
    SignIn,
    SignUp,
}

impl SignInMode {
    /// Endpoint that issues the access code for this mode
    pub fn endpoint(&self) -> &'static str {
        match self {
            SignInMode::SignIn => "/api/request-login-code",
            SignInMode::SignUp => "/api/signup",
        }
    }
}

/// Optional profile fields sent with a sign-up
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignupProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Body of an access-code request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRequest {
    pub email: String,
    #[serde(skip)]
    pub mode: SignInMode,
    #[serde(flatten)]
    pub profile: SignupProfile,
}

impl CodeRequest {
    pub fn sign_in(email: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            mode: SignInMode::SignIn,
            profile: SignupProfile::default(),
        }
    }

    pub fn sign_up(email: &str, profile: SignupProfile) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            email: email.trim().to_string(),
            mode: SignInMode::SignUp,
            profile: SignupProfile {
                first_name: clean(profile.first_name),
                last_name: clean(profile.last_name),
                company: clean(profile.company),
            },
        }
    }
}

/// Body of an access-code verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyRequest {
    pub email: String,
    pub access_code: String,
}

impl VerifyRequest {
    pub fn new(email: &str, code: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            access_code: code.trim().to_string(),
        }
    }
}

/// Parsed verification response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Option<Value>,
}

impl LoginResponse {
    /// Extract the bearer token from any of the shapes the API returns.
    ///
    /// Accepts `access_token` or `token` at the top level or under `data`.
    pub fn from_value(body: &Value) -> Result<Self, ApiError> {
        let token_in = |v: &Value| {
            ["access_token", "token"].iter().find_map(|key| {
                v.get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
            })
        };

        let token = token_in(body)
            .or_else(|| body.get("data").and_then(token_in))
            .ok_or(ApiError::MissingToken)?;

        let user = body
            .get("user")
            .or_else(|| body.get("data").and_then(|d| d.get("user")))
            .filter(|u| u.is_object())
            .cloned();

        Ok(Self { token, user })
    }
}
