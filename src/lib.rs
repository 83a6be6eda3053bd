//! Simbld Users
//!
//! Request and response shapes of the simbld user-management API, serialized
//! as camelCase JSON with serde. The crate holds no I/O: persistence, routing
//! and authentication belong to the services embedding it.

pub mod config;
pub mod user;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{load_config, ConfigError, UsersConfig};
pub use user::dto::{
    BulkActionKind, BulkUserAction, ChangePasswordRequest, SortField, SortOrder, Toggle2FARequest,
    Toggle2FAResponse, UpdateProfileRequest, UpdateUserSettingsRequest, UserFilters, UserQuery,
    UserRoleChange,
};
pub use user::error::{ErrorResponse, UserError};
pub use user::models::{
    AdminStats, LastLoginStats, LinkedAccounts, RoleCounts, UserActivity, UserCounts,
    UserProfile, UserRole, UserSecuritySettings, UserSettings, UserWithCounts,
};
pub use user::pagination::{PaginatedUsers, PaginationMeta};
pub use user::responses::{
    AdminStatsResponse, ApiResponse, UserResponse, UserSecurityResponse, UserSettingsResponse,
    UsersResponse,
};
pub use user::upload::{AvatarUploadResult, UploadedFile};
pub use utils::logging::init_logging;
pub use utils::patch::FieldUpdate;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "simbld-users";
