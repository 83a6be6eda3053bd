//! User domain models
//!
//! Wire shapes of the user records exchanged with the persistence layer and
//! API clients. Keys are camelCase on the wire.

use crate::config::SettingsDefaults;
use crate::user::error::UserError;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User role enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 2] = [UserRole::User, UserRole::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            _ => Err(UserError::ValidationError(format!("unknown role '{s}'"))),
        }
    }
}

/// User profile model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub avatar: Option<String>,
    pub is_active: bool,
    pub email_verified: bool,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Check that `createdAt <= updatedAt <= now`
    pub fn check_timestamps(&self, now: DateTime<Utc>) -> Result<(), UserError> {
        if self.created_at > self.updated_at {
            return Err(UserError::InvalidTimestamps(format!(
                "user {} was updated before it was created",
                self.id
            )));
        }
        if self.updated_at > now {
            return Err(UserError::InvalidTimestamps(format!(
                "user {} has an update time in the future",
                self.id
            )));
        }
        Ok(())
    }

    /// Record a modification at `now`, never moving `updatedAt` before `createdAt`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Derived counters supplied by the persistence layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounts {
    pub applications: u64,
    pub notifications: u64,
}

/// Profile enriched with relation counts, as listed in the admin views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithCounts {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(rename = "_count")]
    pub count: UserCounts,
}

/// Activity summary of a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    pub applications_count: u64,
    pub notifications_count: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&UserWithCounts> for UserActivity {
    fn from(user: &UserWithCounts) -> Self {
        Self {
            id: user.profile.id.clone(),
            name: user.profile.name.clone(),
            email: user.profile.email.clone(),
            last_login_at: user.profile.last_login_at,
            applications_count: user.count.applications,
            notifications_count: user.count.notifications,
            created_at: user.profile.created_at,
        }
    }
}

/// Per-user display and interface preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub id: String,
    pub user_id: String,
    pub theme: String,
    pub language: String,
    pub timezone: String,
    pub date_format: String,
    pub time_format: String,
    pub sidebar_collapsed: bool,
    pub items_per_page: u32,
    pub default_application_view: String,
    pub show_welcome_message: bool,
    pub default_dashboard_tab: String,
    #[serde(rename = "enabled2FA")]
    pub enabled_2fa: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    /// Settings row created alongside a new user
    pub fn with_defaults(
        user_id: impl Into<String>,
        defaults: &SettingsDefaults,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            theme: defaults.theme.clone(),
            language: defaults.language.clone(),
            timezone: defaults.timezone.clone(),
            date_format: defaults.date_format.clone(),
            time_format: defaults.time_format.clone(),
            sidebar_collapsed: defaults.sidebar_collapsed,
            items_per_page: defaults.items_per_page,
            default_application_view: defaults.default_application_view.clone(),
            show_welcome_message: defaults.show_welcome_message,
            default_dashboard_tab: defaults.default_dashboard_tab.clone(),
            enabled_2fa: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// External identity providers linked to an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccounts {
    pub google: bool,
    pub linkedin: bool,
}

/// Read-only security overview of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSecuritySettings {
    #[serde(rename = "enabled2FA")]
    pub enabled_2fa: bool,
    pub has_password: bool,
    pub linked_accounts: LinkedAccounts,
    pub last_login_at: Option<DateTime<Utc>>,
    pub email_verified: bool,
}

impl UserSecuritySettings {
    pub fn from_parts(
        profile: &UserProfile,
        settings: &UserSettings,
        has_password: bool,
        linked_accounts: LinkedAccounts,
    ) -> Self {
        Self {
            enabled_2fa: settings.enabled_2fa,
            has_password,
            linked_accounts,
            last_login_at: profile.last_login_at,
            email_verified: profile.email_verified,
        }
    }
}

/// Login recency buckets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastLoginStats {
    pub today: u64,
    pub this_week: u64,
    pub this_month: u64,
}

/// One counter per role, keyed by the role literal on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    #[serde(rename = "USER")]
    pub user: u64,
    #[serde(rename = "ADMIN")]
    pub admin: u64,
}

impl RoleCounts {
    pub fn get(&self, role: UserRole) -> u64 {
        match role {
            UserRole::User => self.user,
            UserRole::Admin => self.admin,
        }
    }

    pub fn increment(&mut self, role: UserRole) {
        match role {
            UserRole::User => self.user += 1,
            UserRole::Admin => self.admin += 1,
        }
    }
}

/// Population-wide counters for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub active_users: u64,
    pub admin_users: u64,
    pub new_users_this_month: u64,
    pub new_users_this_week: u64,
    pub last_login_stats: LastLoginStats,
    pub users_by_role: RoleCounts,
}

impl AdminStats {
    pub const WEEK_DAYS: i64 = 7;
    pub const MONTH_DAYS: i64 = 30;

    /// Aggregate over an in-memory population.
    ///
    /// Week and month are rolling windows ending at `now`; "today" starts at
    /// UTC midnight.
    pub fn from_profiles<'a, I>(profiles: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a UserProfile>,
    {
        let start_of_day = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
        let week_ago = now - Duration::days(Self::WEEK_DAYS);
        let month_ago = now - Duration::days(Self::MONTH_DAYS);

        let mut stats = AdminStats::default();
        for profile in profiles {
            stats.total_users += 1;
            stats.users_by_role.increment(profile.role);

            if profile.is_active {
                stats.active_users += 1;
            }
            if profile.role.is_admin() {
                stats.admin_users += 1;
            }
            if profile.created_at >= month_ago {
                stats.new_users_this_month += 1;
            }
            if profile.created_at >= week_ago {
                stats.new_users_this_week += 1;
            }

            if let Some(login) = profile.last_login_at {
                if login >= start_of_day {
                    stats.last_login_stats.today += 1;
                }
                if login >= week_ago {
                    stats.last_login_stats.this_week += 1;
                }
                if login >= month_ago {
                    stats.last_login_stats.this_month += 1;
                }
            }
        }

        log::debug!(
            "Computed admin stats over {} users ({} active)",
            stats.total_users,
            stats.active_users
        );
        stats
    }
}
