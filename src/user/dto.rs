//! User Data Transfer Objects
//!
//! Request payloads of the user-management API. Optional fields follow
//! partial-update semantics: an omitted field leaves the stored value as is.

use crate::config::{PaginationConfig, PasswordPolicy};
use crate::user::error::UserError;
use crate::user::models::{UserProfile, UserRole, UserSettings};
use crate::utils::patch::FieldUpdate;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Validates email format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Update user profile request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// `null` removes the avatar, an absent key keeps it
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub avatar: FieldUpdate<String>,

    // Admin-only fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.avatar.is_unchanged()
            && self.role.is_none()
            && self.is_active.is_none()
    }

    /// Whether the request touches fields only an admin may change
    pub fn requires_admin(&self) -> bool {
        self.role.is_some() || self.is_active.is_some()
    }

    /// Reject admin-only fields coming from a non-admin caller
    pub fn authorize(&self, acting_role: UserRole) -> Result<(), UserError> {
        if self.requires_admin() && !acting_role.is_admin() {
            return Err(UserError::Forbidden(
                "only an admin can change role or activation".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), UserError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(UserError::ValidationError("Name cannot be empty".to_string()));
            }
        }

        if let Some(email) = &self.email {
            if !is_valid_email(email.trim()) {
                return Err(UserError::InvalidEmail(email.clone()));
            }
        }

        if let Some(avatar) = self.avatar.as_set() {
            if avatar.trim().is_empty() {
                return Err(UserError::ValidationError("Avatar cannot be blank".to_string()));
            }
        }

        Ok(())
    }

    /// Apply the supplied fields to `profile`
    pub fn apply_to(self, profile: &mut UserProfile, now: DateTime<Utc>) {
        if self.is_empty() {
            return;
        }

        if let Some(name) = self.name {
            profile.name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            profile.email = email.trim().to_lowercase();
        }
        self.avatar.apply(&mut profile.avatar);
        if let Some(role) = self.role {
            profile.role = role;
        }
        if let Some(is_active) = self.is_active {
            profile.is_active = is_active;
        }

        profile.touch(now);
        log::debug!("Updated profile of user {}", profile.id);
    }
}

/// Change password request
///
/// `current_password` is absent for accounts created through an external
/// identity provider that never set a password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    pub new_password: String,
    pub confirm_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordRequest")
            .field("current_password", &self.current_password.as_ref().map(|_| "***"))
            .field("new_password", &"***")
            .field("confirm_password", &"***")
            .finish()
    }
}

impl ChangePasswordRequest {
    pub fn validate(&self, policy: &PasswordPolicy) -> Result<(), UserError> {
        if self.new_password != self.confirm_password {
            return Err(UserError::PasswordMismatch);
        }

        if self.new_password.chars().count() < policy.min_length {
            return Err(UserError::PasswordTooShort(policy.min_length));
        }

        if self.current_password.as_deref() == Some(self.new_password.as_str()) {
            return Err(UserError::PasswordUnchanged);
        }

        Ok(())
    }
}

/// Update user settings request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserSettingsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_application_view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_welcome_message: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dashboard_tab: Option<String>,
    #[serde(rename = "enabled2FA", default, skip_serializing_if = "Option::is_none")]
    pub enabled_2fa: Option<bool>,
}

impl UpdateUserSettingsRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self, pagination: &PaginationConfig) -> Result<(), UserError> {
        let text_fields = [
            ("theme", &self.theme),
            ("language", &self.language),
            ("timezone", &self.timezone),
            ("dateFormat", &self.date_format),
            ("timeFormat", &self.time_format),
            ("defaultApplicationView", &self.default_application_view),
            ("defaultDashboardTab", &self.default_dashboard_tab),
        ];
        for (field, value) in text_fields {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(UserError::ValidationError(format!("{field} cannot be blank")));
            }
        }

        if let Some(items) = self.items_per_page {
            if items == 0 || items > pagination.max_limit {
                return Err(UserError::ValidationError(format!(
                    "itemsPerPage must be within 1..={}",
                    pagination.max_limit
                )));
            }
        }

        Ok(())
    }

    /// Apply the supplied preferences to `settings`
    pub fn apply_to(self, settings: &mut UserSettings, now: DateTime<Utc>) {
        if self.is_empty() {
            return;
        }

        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut settings.theme, self.theme);
        set(&mut settings.language, self.language);
        set(&mut settings.timezone, self.timezone);
        set(&mut settings.date_format, self.date_format);
        set(&mut settings.time_format, self.time_format);
        set(&mut settings.sidebar_collapsed, self.sidebar_collapsed);
        set(&mut settings.items_per_page, self.items_per_page);
        set(&mut settings.default_application_view, self.default_application_view);
        set(&mut settings.show_welcome_message, self.show_welcome_message);
        set(&mut settings.default_dashboard_tab, self.default_dashboard_tab);
        set(&mut settings.enabled_2fa, self.enabled_2fa);

        settings.touch(now);
        log::debug!("Updated settings of user {}", settings.user_id);
    }
}

/// Enable or disable two-factor authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggle2FARequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggle2FAResponse {
    #[serde(rename = "enabled2FA")]
    pub enabled_2fa: bool,
}

impl Toggle2FARequest {
    pub fn apply_to(self, settings: &mut UserSettings, now: DateTime<Utc>) -> Toggle2FAResponse {
        if settings.enabled_2fa != self.enabled {
            settings.enabled_2fa = self.enabled;
            settings.touch(now);
            log::info!(
                "Two-factor authentication {} for user {}",
                if self.enabled { "enabled" } else { "disabled" },
                settings.user_id
            );
        }
        Toggle2FAResponse {
            enabled_2fa: settings.enabled_2fa,
        }
    }
}

/// Column a user listing can be sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    Name,
    Email,
    LastLoginAt,
    Role,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::CreatedAt,
        SortField::Name,
        SortField::Email,
        SortField::LastLoginAt,
        SortField::Role,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::LastLoginAt => "lastLoginAt",
            SortField::Role => "role",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// List users query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Filters with every default filled in, ready for the persistence layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl UserQuery {
    /// Number of rows to skip for the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl UserFilters {
    pub fn resolve(&self, pagination: &PaginationConfig) -> Result<UserQuery, UserError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(UserError::InvalidPagination("page starts at 1".to_string()));
        }

        let limit = match self.limit {
            None => pagination.default_limit,
            Some(0) => {
                return Err(UserError::InvalidPagination("limit must be positive".to_string()))
            },
            Some(limit) if limit > pagination.max_limit => {
                log::warn!("Requested limit {} clamped to {}", limit, pagination.max_limit);
                pagination.max_limit
            },
            Some(limit) => limit,
        };

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(UserQuery {
            page,
            limit,
            search,
            role: self.role,
            is_active: self.is_active,
            sort_by: self.sort_by.unwrap_or_default(),
            sort_order: self.sort_order.unwrap_or_default(),
        })
    }
}

/// Kind of bulk operation an admin can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkActionKind {
    Activate,
    Deactivate,
    Delete,
}

impl BulkActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkActionKind::Activate => "activate",
            BulkActionKind::Deactivate => "deactivate",
            BulkActionKind::Delete => "delete",
        }
    }

    /// `isActive` value the action leaves behind; `None` for deletion
    pub fn target_active_state(&self) -> Option<bool> {
        match self {
            BulkActionKind::Activate => Some(true),
            BulkActionKind::Deactivate => Some(false),
            BulkActionKind::Delete => None,
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, BulkActionKind::Delete)
    }
}

impl fmt::Display for BulkActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin: apply one action to many users
///
/// Deserializing rejects a payload without any non-blank user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBulkUserAction")]
pub struct BulkUserAction {
    pub user_ids: Vec<String>,
    pub action: BulkActionKind,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBulkUserAction {
    user_ids: Vec<String>,
    action: BulkActionKind,
}

impl TryFrom<RawBulkUserAction> for BulkUserAction {
    type Error = UserError;

    fn try_from(raw: RawBulkUserAction) -> Result<Self, Self::Error> {
        Self::new(raw.user_ids, raw.action)
    }
}

impl BulkUserAction {
    pub fn new(user_ids: Vec<String>, action: BulkActionKind) -> Result<Self, UserError> {
        let request = Self {
            user_ids,
            action,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), UserError> {
        if self.user_ids.iter().all(|id| id.trim().is_empty()) {
            return Err(UserError::EmptyBulkAction);
        }
        Ok(())
    }

    /// Target ids without blanks or duplicates, in request order
    pub fn target_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.user_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty() && seen.insert(*id))
            .collect()
    }

    /// Apply an activation change to one of the targeted profiles.
    ///
    /// Returns `false` when the profile is not targeted, is already in the
    /// requested state, or the action is a deletion.
    pub fn apply_to(&self, profile: &mut UserProfile, now: DateTime<Utc>) -> bool {
        let Some(active) = self.action.target_active_state() else {
            return false;
        };
        if profile.is_active == active || !self.target_ids().contains(&profile.id.as_str()) {
            return false;
        }

        profile.is_active = active;
        profile.touch(now);
        true
    }
}

/// Admin: change the role of a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleChange {
    pub user_id: String,
    pub new_role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl UserRoleChange {
    /// Trimmed audit reason, `None` when blank
    pub fn audit_reason(&self) -> Option<&str> {
        self.reason.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }

    /// Apply the role change. Returns the previous role.
    pub fn apply_to(
        &self,
        profile: &mut UserProfile,
        now: DateTime<Utc>,
    ) -> Result<UserRole, UserError> {
        if profile.id != self.user_id {
            return Err(UserError::UserMismatch {
                requested: self.user_id.clone(),
                actual: profile.id.clone(),
            });
        }

        let previous = profile.role;
        if previous != self.new_role {
            profile.role = self.new_role;
            profile.touch(now);
        }

        log::info!(
            "Role of user {} changed from {} to {} (reason: {})",
            profile.id,
            previous,
            self.new_role,
            self.audit_reason().unwrap_or("none given")
        );
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingsDefaults;
    use serde_json::json;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn sample_profile() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            role: UserRole::User,
            avatar: Some("/uploads/avatars/a.png".to_string()),
            is_active: true,
            email_verified: true,
            last_login_at: None,
            created_at: at("2024-01-01T00:00:00Z"),
            updated_at: at("2024-01-01T00:00:00Z"),
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email("alice@example"));
    }

    #[test]
    fn test_update_profile_partial_semantics() {
        let now = at("2024-02-01T00:00:00Z");
        let mut profile = sample_profile();
        let request: UpdateProfileRequest =
            serde_json::from_value(json!({ "name": "  Alicia " })).unwrap();

        assert!(!request.requires_admin());
        request.apply_to(&mut profile, now);

        assert_eq!(profile.name, "Alicia");
        assert_eq!(profile.email, "alice@example.com");
        assert_eq!(profile.avatar.as_deref(), Some("/uploads/avatars/a.png"));
        assert_eq!(profile.updated_at, now);
    }

    #[test]
    fn test_update_profile_null_avatar_clears_it() {
        let mut profile = sample_profile();
        let request: UpdateProfileRequest =
            serde_json::from_value(json!({ "avatar": null })).unwrap();

        request.apply_to(&mut profile, at("2024-02-01T00:00:00Z"));
        assert_eq!(profile.avatar, None);
    }

    #[test]
    fn test_empty_update_leaves_timestamp() {
        let mut profile = sample_profile();
        UpdateProfileRequest::default().apply_to(&mut profile, at("2024-02-01T00:00:00Z"));
        assert_eq!(profile.updated_at, at("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_update_profile_admin_fields() {
        let request: UpdateProfileRequest =
            serde_json::from_value(json!({ "role": "ADMIN", "isActive": false })).unwrap();

        assert!(request.requires_admin());
        assert!(matches!(request.authorize(UserRole::User), Err(UserError::Forbidden(_))));
        assert!(request.authorize(UserRole::Admin).is_ok());
    }

    #[test]
    fn test_update_profile_validation() {
        let blank_name = UpdateProfileRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(blank_name.validate(), Err(UserError::ValidationError(_))));

        let bad_email = UpdateProfileRequest {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_email.validate(), Err(UserError::InvalidEmail(_))));

        let good = UpdateProfileRequest {
            email: Some("bob@example.com".to_string()),
            avatar: FieldUpdate::Clear,
            ..Default::default()
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_update_profile_serialization_omits_untouched_fields() {
        let request = UpdateProfileRequest {
            is_active: Some(true),
            avatar: FieldUpdate::Clear,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "avatar": null, "isActive": true })
        );
    }

    #[test]
    fn test_update_profile_round_trip_with_avatar_set() {
        let request = UpdateProfileRequest {
            name: Some("Alicia".to_string()),
            email: Some("alicia@example.com".to_string()),
            avatar: FieldUpdate::Set("/uploads/avatars/b.png".to_string()),
            role: Some(UserRole::Admin),
            is_active: Some(false),
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: UpdateProfileRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
        assert_eq!(back.avatar.as_set().map(String::as_str), Some("/uploads/avatars/b.png"));
    }

    #[test]
    fn test_change_password_validation() {
        let policy = PasswordPolicy::default();
        let request = |current: Option<&str>, new: &str, confirm: &str| ChangePasswordRequest {
            current_password: current.map(str::to_string),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        };

        assert!(request(Some("old-password"), "new-password", "new-password")
            .validate(&policy)
            .is_ok());
        assert!(request(None, "new-password", "new-password").validate(&policy).is_ok());
        assert_eq!(
            request(None, "new-password", "other-password").validate(&policy),
            Err(UserError::PasswordMismatch)
        );
        assert_eq!(
            request(None, "short", "short").validate(&policy),
            Err(UserError::PasswordTooShort(8))
        );
        assert_eq!(
            request(Some("same-password"), "same-password", "same-password").validate(&policy),
            Err(UserError::PasswordUnchanged)
        );
    }

    #[test]
    fn test_change_password_debug_hides_secrets() {
        let request: ChangePasswordRequest = serde_json::from_value(json!({
            "currentPassword": "hunter22",
            "newPassword": "correct horse",
            "confirmPassword": "correct horse"
        }))
        .unwrap();
        let debug = format!("{request:?}");
        assert!(!debug.contains("hunter22"));
        assert!(!debug.contains("correct horse"));
    }

    #[test]
    fn test_settings_update() {
        let created = at("2024-01-01T00:00:00Z");
        let now = at("2024-03-01T00:00:00Z");
        let mut settings = UserSettings::with_defaults("u1", &SettingsDefaults::default(), created);
        let request: UpdateUserSettingsRequest = serde_json::from_value(json!({
            "theme": "dark",
            "itemsPerPage": 25,
            "enabled2FA": true
        }))
        .unwrap();

        assert!(request.validate(&PaginationConfig::default()).is_ok());
        request.apply_to(&mut settings, now);

        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.items_per_page, 25);
        assert!(settings.enabled_2fa);
        assert_eq!(settings.language, "fr");
        assert_eq!(settings.updated_at, now);
    }

    #[test]
    fn test_settings_update_round_trip() {
        let request = UpdateUserSettingsRequest {
            theme: Some("dark".to_string()),
            language: Some("en".to_string()),
            timezone: Some("UTC".to_string()),
            date_format: Some("YYYY-MM-DD".to_string()),
            time_format: Some("hh:mm A".to_string()),
            sidebar_collapsed: Some(true),
            items_per_page: Some(50),
            default_application_view: Some("kanban".to_string()),
            show_welcome_message: Some(false),
            default_dashboard_tab: Some("activity".to_string()),
            enabled_2fa: Some(true),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["enabled2FA"], json!(true));
        assert_eq!(value["defaultApplicationView"], json!("kanban"));

        let back: UpdateUserSettingsRequest = serde_json::from_value(value).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_settings_update_validation() {
        let pagination = PaginationConfig::default();
        let too_many = UpdateUserSettingsRequest {
            items_per_page: Some(500),
            ..Default::default()
        };
        assert!(too_many.validate(&pagination).is_err());

        let blank = UpdateUserSettingsRequest {
            timezone: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(blank.validate(&pagination).is_err());
        assert!(UpdateUserSettingsRequest::default().is_empty());
    }

    #[test]
    fn test_toggle_2fa() {
        let created = at("2024-01-01T00:00:00Z");
        let now = at("2024-03-01T00:00:00Z");
        let mut settings = UserSettings::with_defaults("u1", &SettingsDefaults::default(), created);

        let response = Toggle2FARequest {
            enabled: true,
        }
        .apply_to(&mut settings, now);
        assert!(response.enabled_2fa);
        assert_eq!(settings.updated_at, now);
        assert_eq!(serde_json::to_value(response).unwrap(), json!({ "enabled2FA": true }));

        let later = at("2024-04-01T00:00:00Z");
        Toggle2FARequest {
            enabled: true,
        }
        .apply_to(&mut settings, later);
        assert_eq!(settings.updated_at, now);
    }

    #[test]
    fn test_sort_literals() {
        for field in SortField::ALL {
            let value = serde_json::to_value(field).unwrap();
            assert_eq!(value, json!(field.as_str()));
            assert_eq!(serde_json::from_value::<SortField>(value).unwrap(), field);
        }
        assert!(serde_json::from_value::<SortField>(json!("password")).is_err());
        assert!(serde_json::from_value::<SortOrder>(json!("ASC")).is_err());
        assert_eq!(serde_json::to_value(SortOrder::Asc).unwrap(), json!("asc"));
    }

    #[test]
    fn test_filters_resolve_defaults() {
        let query = UserFilters::default().resolve(&PaginationConfig::default()).unwrap();

        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_filters_resolve_clamps_and_trims() {
        let filters = UserFilters {
            page: Some(3),
            limit: Some(1_000),
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let query = filters.resolve(&PaginationConfig::default()).unwrap();

        assert_eq!(query.limit, 100);
        assert_eq!(query.search, None);
        assert_eq!(query.offset(), 200);
    }

    #[test]
    fn test_filters_round_trip_with_every_field() {
        let filters = UserFilters {
            page: Some(2),
            limit: Some(25),
            search: Some("alice".to_string()),
            role: Some(UserRole::Admin),
            is_active: Some(false),
            sort_by: Some(SortField::LastLoginAt),
            sort_order: Some(SortOrder::Asc),
        };
        let value = serde_json::to_value(&filters).unwrap();
        assert_eq!(
            value,
            json!({
                "page": 2, "limit": 25, "search": "alice", "role": "ADMIN",
                "isActive": false, "sortBy": "lastLoginAt", "sortOrder": "asc"
            })
        );

        let back: UserFilters = serde_json::from_value(value).unwrap();
        assert_eq!(back, filters);
    }

    #[test]
    fn test_filters_reject_zero_page_and_limit() {
        let pagination = PaginationConfig::default();
        let zero_page = UserFilters {
            page: Some(0),
            ..Default::default()
        };
        let zero_limit = UserFilters {
            limit: Some(0),
            ..Default::default()
        };
        assert!(matches!(zero_page.resolve(&pagination), Err(UserError::InvalidPagination(_))));
        assert!(matches!(zero_limit.resolve(&pagination), Err(UserError::InvalidPagination(_))));
    }

    #[test]
    fn test_bulk_action_wire_shape() {
        let action: BulkUserAction = serde_json::from_value(json!({
            "userIds": ["a", "b"],
            "action": "deactivate"
        }))
        .unwrap();
        assert_eq!(action.action, BulkActionKind::Deactivate);
        assert!(serde_json::from_value::<BulkUserAction>(json!({
            "userIds": ["a"],
            "action": "ban"
        }))
        .is_err());
    }

    #[test]
    fn test_bulk_action_rejects_empty_targets_on_deserialize() {
        let empty = serde_json::from_value::<BulkUserAction>(json!({
            "userIds": [],
            "action": "delete"
        }));
        assert!(empty.unwrap_err().to_string().contains("at least one user id"));

        let blank = serde_json::from_value::<BulkUserAction>(json!({
            "userIds": [" ", ""],
            "action": "activate"
        }));
        assert!(blank.is_err());

        let action = BulkUserAction::new(vec!["a".to_string()], BulkActionKind::Delete).unwrap();
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(serde_json::from_str::<BulkUserAction>(&json).unwrap(), action);
    }

    #[test]
    fn test_bulk_action_requires_targets() {
        assert_eq!(
            BulkUserAction::new(vec![], BulkActionKind::Delete),
            Err(UserError::EmptyBulkAction)
        );
        assert_eq!(
            BulkUserAction::new(vec![" ".to_string()], BulkActionKind::Delete),
            Err(UserError::EmptyBulkAction)
        );

        let action = BulkUserAction::new(
            vec!["a".to_string(), " b ".to_string(), "a".to_string(), String::new()],
            BulkActionKind::Activate,
        )
        .unwrap();
        assert_eq!(action.target_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_bulk_action_apply() {
        let now = at("2024-02-01T00:00:00Z");
        let mut profile = sample_profile();
        let deactivate =
            BulkUserAction::new(vec!["u1".to_string()], BulkActionKind::Deactivate).unwrap();

        assert!(deactivate.apply_to(&mut profile, now));
        assert!(!profile.is_active);
        assert!(!deactivate.apply_to(&mut profile, now));

        let delete = BulkUserAction::new(vec!["u1".to_string()], BulkActionKind::Delete).unwrap();
        assert!(!delete.apply_to(&mut profile, now));
        assert!(delete.action.is_destructive());

        let other = BulkUserAction::new(vec!["u2".to_string()], BulkActionKind::Activate).unwrap();
        assert!(!other.apply_to(&mut profile, now));
    }

    #[test]
    fn test_role_change() {
        let now = at("2024-02-01T00:00:00Z");
        let mut profile = sample_profile();
        let change: UserRoleChange = serde_json::from_value(json!({
            "userId": "u1",
            "newRole": "ADMIN",
            "reason": "  team lead  "
        }))
        .unwrap();

        assert_eq!(change.audit_reason(), Some("team lead"));
        assert_eq!(change.apply_to(&mut profile, now), Ok(UserRole::User));
        assert_eq!(profile.role, UserRole::Admin);
        assert_eq!(profile.updated_at, now);

        let wrong_user = UserRoleChange {
            user_id: "u2".to_string(),
            new_role: UserRole::User,
            reason: None,
        };
        assert!(matches!(
            wrong_user.apply_to(&mut profile, now),
            Err(UserError::UserMismatch { .. })
        ));
    }
}
