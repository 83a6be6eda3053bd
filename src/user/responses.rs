//! Response envelopes
//!
//! Every successful user-management response is `{ "message": ..., "data": ... }`.
//! Envelopes implement actix-web's `Responder`, so handlers can return them as is.

use crate::user::models::{AdminStats, UserProfile, UserSecuritySettings, UserSettings};
use crate::user::pagination::PaginatedUsers;
use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

/// Message plus payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Render with an explicit status, e.g. `201 Created`
    pub fn into_response_with(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl<T: Serialize> Responder for ApiResponse<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        self.into_response_with(StatusCode::OK)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsData {
    pub settings: UserSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityData {
    pub security: UserSecuritySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsData {
    pub stats: AdminStats,
}

pub type UserResponse = ApiResponse<UserData>;
pub type UsersResponse = ApiResponse<PaginatedUsers>;
pub type UserSettingsResponse = ApiResponse<SettingsData>;
pub type UserSecurityResponse = ApiResponse<SecurityData>;
pub type AdminStatsResponse = ApiResponse<StatsData>;

impl UserResponse {
    pub fn user(message: impl Into<String>, user: UserProfile) -> Self {
        Self::new(message, UserData {
            user,
        })
    }
}

impl UserSettingsResponse {
    pub fn settings(message: impl Into<String>, settings: UserSettings) -> Self {
        Self::new(message, SettingsData {
            settings,
        })
    }
}

impl UserSecurityResponse {
    pub fn security(message: impl Into<String>, security: UserSecuritySettings) -> Self {
        Self::new(message, SecurityData {
            security,
        })
    }
}

impl AdminStatsResponse {
    pub fn stats(message: impl Into<String>, stats: AdminStats) -> Self {
        Self::new(message, StatsData {
            stats,
        })
    }
}
