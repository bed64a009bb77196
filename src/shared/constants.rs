/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - full access, includes official permissions
pub const ROLE_ADMIN: &str = "admin";

/// Official role - reviews reports and moves them through the status workflow
pub const ROLE_OFFICIAL: &str = "official";

// =============================================================================
// INTAKE CONSTANTS
// =============================================================================

/// Category taxonomy the classification prompt steers the model toward.
/// The last entry doubles as the fallback category.
pub const ISSUE_CATEGORIES: &[&str] = &[
    "Roads & Transport",
    "Waste Management",
    "Electricity",
    "Water",
    "Security",
    "Other",
];

/// Maximum number of media URLs attached to one report
pub const MAX_MEDIA_URLS: usize = 10;

/// Category reported when classification produced no usable output
pub const FALLBACK_CATEGORY: &str = "Other";
