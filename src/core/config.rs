use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
    pub ai: AiConfig,
    pub social: SocialConfig,
    pub feeds: FeedsConfig,
    pub realtime: RealtimeConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
}

/// Deployment environment, controls how much detail 500 responses expose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub cors_allowed_origins: Vec<String>,
    pub frontend_url: String,
    pub http_timeout: Duration,
}

/// Which repository implementation backs the CRUD features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Postgres with the in-memory fixture store as fallback
    Postgres,
    /// In-memory fixture store only
    Memory,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub backend: StorageBackend,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: usize,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub cache_ttl: Duration,
    /// Verdict used for images the model could not assess
    pub fail_open: bool,
}

#[derive(Debug, Clone)]
pub struct SocialConfig {
    pub instance_url: String,
    pub access_token: Option<String>,
    pub official_accounts: Vec<String>,
    pub cache_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct FeedsConfig {
    pub weather_url: String,
    pub fema_url: String,
    pub shelters_url: String,
    pub geocoding_url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    pub enabled: bool,
    pub poll_interval: Duration,
    pub correlation_radius_km: f64,
    pub social_ttl: Duration,
    pub weather_ttl: Duration,
    pub emergency_ttl: Duration,
    pub shelters_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub sweep_interval: Duration,
    pub geocode_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_secret: String,
    pub token_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env()?,
            ai: AiConfig::from_env()?,
            social: SocialConfig::from_env()?,
            feeds: FeedsConfig::from_env()?,
            realtime: RealtimeConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String>
where
    T: ToString,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|_| format!("{} must be a valid number", name))
}

fn parse_bool(name: &str, default: bool) -> Result<bool, String> {
    match env::var(name) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("{} must be a boolean", name)),
        },
        Err(_) => Ok(default),
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 8;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let environment = match env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        // The frontend origin is always allowed; extra origins come from CORS_ALLOWED_ORIGINS
        let mut cors_allowed_origins =
            csv_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());
        if !cors_allowed_origins.iter().any(|o| o == &frontend_url) {
            cors_allowed_origins.push(frontend_url.clone());
        }

        let http_timeout_secs = parse_var("HTTP_TIMEOUT_SECS", Self::DEFAULT_HTTP_TIMEOUT_SECS)?;

        Ok(Self {
            host,
            port,
            environment,
            cors_allowed_origins,
            frontend_url,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 0;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = non_empty("DATABASE_URL");

        let backend = match env::var("STORAGE_BACKEND").ok().as_deref() {
            Some("postgres") => {
                if url.is_none() {
                    return Err("STORAGE_BACKEND=postgres requires DATABASE_URL".to_string());
                }
                StorageBackend::Postgres
            }
            Some("memory") => StorageBackend::Memory,
            Some(other) => return Err(format!("Unknown STORAGE_BACKEND: {}", other)),
            None if url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };

        Ok(Self {
            url,
            backend,
            max_connections: parse_var("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_var("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_var(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_var("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_var("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl RateLimitConfig {
    const DEFAULT_WINDOW_MS: u64 = 15 * 60 * 1000; // 15 minutes
    const DEFAULT_MAX_REQUESTS: usize = 100;

    pub fn from_env() -> Result<Self, String> {
        let window_ms = parse_var("RATE_LIMIT_WINDOW_MS", Self::DEFAULT_WINDOW_MS)?;
        let max_requests = parse_var("RATE_LIMIT_MAX_REQUESTS", Self::DEFAULT_MAX_REQUESTS)?;

        Ok(Self {
            window: Duration::from_millis(window_ms),
            max_requests,
        })
    }
}

impl AiConfig {
    const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            api_key: non_empty("GEMINI_API_KEY"),
            base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            cache_ttl: Duration::from_secs(parse_var(
                "AI_CACHE_TTL_SECS",
                Self::DEFAULT_CACHE_TTL_SECS,
            )?),
            fail_open: parse_bool("AI_FAIL_OPEN", true)?,
        })
    }
}

impl SocialConfig {
    const DEFAULT_CACHE_TTL_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let official_accounts = csv_list(
            &env::var("SOCIAL_OFFICIAL_ACCOUNTS")
                .unwrap_or_else(|_| "fema,nws,redcross,nycemergencymgt,usgs".to_string()),
        )
        .into_iter()
        .map(|a| a.trim_start_matches('@').to_ascii_lowercase())
        .collect();

        Ok(Self {
            instance_url: env::var("MASTODON_INSTANCE_URL")
                .unwrap_or_else(|_| "https://mastodon.social".to_string())
                .trim_end_matches('/')
                .to_string(),
            access_token: non_empty("MASTODON_ACCESS_TOKEN"),
            official_accounts,
            cache_ttl: Duration::from_secs(parse_var(
                "SOCIAL_CACHE_TTL_SECS",
                Self::DEFAULT_CACHE_TTL_SECS,
            )?),
        })
    }
}

impl FeedsConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            weather_url: env::var("WEATHER_ALERTS_URL").unwrap_or_else(|_| {
                "https://api.weather.gov/alerts/active?status=actual&message_type=alert".to_string()
            }),
            fema_url: env::var("FEMA_DECLARATIONS_URL").unwrap_or_else(|_| {
                "https://www.fema.gov/api/open/v2/DisasterDeclarationsSummaries?$orderby=declarationDate%20desc&$top=25".to_string()
            }),
            shelters_url: env::var("SHELTERS_URL").unwrap_or_else(|_| {
                "https://gis.fema.gov/arcgis/rest/services/NSS/OpenShelters/MapServer/0/query?where=1%3D1&outFields=*&f=json".to_string()
            }),
            geocoding_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            user_agent: env::var("FEEDS_USER_AGENT").unwrap_or_else(|_| {
                "DisasterResponseCore/1.0 (disaster-coordination)".to_string()
            }),
        })
    }
}

impl RealtimeConfig {
    const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
    const DEFAULT_CORRELATION_RADIUS_KM: f64 = 100.0;

    pub fn from_env() -> Result<Self, String> {
        let poll_interval_secs =
            parse_var("REALTIME_POLL_INTERVAL_SECS", Self::DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_interval_secs == 0 {
            return Err("REALTIME_POLL_INTERVAL_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            enabled: parse_bool("REALTIME_ENABLED", true)?,
            poll_interval: Duration::from_secs(poll_interval_secs),
            correlation_radius_km: parse_var(
                "CORRELATION_RADIUS_KM",
                Self::DEFAULT_CORRELATION_RADIUS_KM,
            )?,
            social_ttl: Duration::from_secs(30),
            weather_ttl: Duration::from_secs(5 * 60),
            emergency_ttl: Duration::from_secs(15 * 60),
            shelters_ttl: Duration::from_secs(10 * 60),
        })
    }
}

impl CacheConfig {
    const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;
    const DEFAULT_GEOCODE_TTL_SECS: u64 = 24 * 3600;

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            sweep_interval: Duration::from_secs(parse_var(
                "CACHE_SWEEP_INTERVAL_SECS",
                Self::DEFAULT_SWEEP_INTERVAL_SECS,
            )?),
            geocode_ttl: Duration::from_secs(parse_var(
                "GEOCODE_CACHE_TTL_SECS",
                Self::DEFAULT_GEOCODE_TTL_SECS,
            )?),
        })
    }
}

impl AuthConfig {
    const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 3600;

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            token_secret: env::var("MOCK_TOKEN_SECRET")
                .unwrap_or_else(|_| "disaster-response-mock-secret".to_string()),
            token_ttl: Duration::from_secs(parse_var(
                "MOCK_TOKEN_TTL_SECS",
                Self::DEFAULT_TOKEN_TTL_SECS,
            )?),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let username = non_empty("SWAGGER_USERNAME");
        let password = non_empty("SWAGGER_PASSWORD");
        let title = env::var("SWAGGER_TITLE")
            .unwrap_or_else(|_| "Disaster Response Coordination API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Disasters, reports, resources and real-time feed aggregation".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_list_trims_and_skips_empty() {
        assert_eq!(
            csv_list(" a, b ,,c "),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(csv_list("").is_empty());
    }

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut cfg = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert!(cfg.credentials().is_none());

        cfg.password = Some("secret".to_string());
        assert_eq!(cfg.credentials(), Some("admin:secret".to_string()));
    }
}
