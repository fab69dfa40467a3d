/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Location name stored when neither the caller nor extraction yields one
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Default search radius for nearby queries, in metres
pub const DEFAULT_NEARBY_RADIUS_M: f64 = 10_000.0;

/// Body returned once a client exceeds its request budget
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

// =============================================================================
// CACHE KEY PREFIXES
// =============================================================================

pub const CACHE_PREFIX_GEOCODE: &str = "geocode";
pub const CACHE_PREFIX_REVERSE: &str = "reverse";
pub const CACHE_PREFIX_AI_LOCATION: &str = "ai_location";
pub const CACHE_PREFIX_AI_IMAGE: &str = "ai_image";
pub const CACHE_PREFIX_AI_PRIORITY: &str = "ai_priority";
pub const CACHE_PREFIX_SOCIAL: &str = "social";
