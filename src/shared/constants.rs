/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default color assigned to categories created without one (Indigo)
pub const DEFAULT_CATEGORY_COLOR: &str = "#6366f1";

/// Bcrypt cost factor for password hashing
pub const BCRYPT_COST: u32 = 10;

/// Current backup document format version
pub const BACKUP_FORMAT_VERSION: u32 = 1;
