use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub llm: LlmConfig,
    pub auth: Option<AuthConfig>,
    pub swagger: SwaggerConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Reporter identity policy.
///
/// In mock identity mode a fixed placeholder reporter stands in for a real
/// authenticated user. Meant for local development and demos only.
#[derive(Debug, Clone, Default)]
pub struct IdentityConfig {
    pub mock_mode: bool,
    /// Placeholder reporter id used in mock mode (`None` when unset or empty)
    pub mock_reporter_id: Option<String>,
}

/// Hosted model gateway configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// TensorZero gateway base URL
    pub tensorzero_url: String,
    /// Provider API key forwarded as request credentials
    pub api_key: String,
    /// Model name routed by the gateway (e.g. "openai::gpt-4o-mini")
    pub model_name: String,
    /// Optional directory of `.jinja` files overriding the built-in prompts
    pub prompt_template_dir: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub jwks_url: String,
    /// Claim holding the role list (e.g. "roles" or a namespaced custom claim)
    pub roles_claim: String,
    pub jwks_cache_ttl: Duration,
    pub jwt_leeway: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// S3-compatible storage configuration for report media
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// S3 endpoint URL
    pub endpoint: String,
    /// Endpoint used when building public media URLs (defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    /// Key prefix for uploaded media (e.g., "issue-media")
    pub prefix: String,
}

/// Parse a boolean flag the way operators usually write them in `.env` files
fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(format!("Invalid boolean value: {}", other)),
    }
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
            identity: IdentityConfig::from_env()?,
            llm: LlmConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            media: MediaConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 25 * 1024 * 1024; // 25MB, media uploads included

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl IdentityConfig {
    const DEFAULT_MOCK_REPORTER_ID: &'static str = "mock-citizen";

    pub fn from_env() -> Result<Self, String> {
        let mock_mode = match env::var("MOCK_IDENTITY_MODE") {
            Ok(value) => parse_flag(&value)
                .map_err(|e| format!("MOCK_IDENTITY_MODE must be a boolean: {}", e))?,
            Err(_) => false,
        };

        // An explicitly empty value disables the placeholder identity
        let mock_reporter_id = match env::var("MOCK_REPORTER_ID") {
            Ok(value) => Some(value.trim().to_string()).filter(|s| !s.is_empty()),
            Err(_) => Some(Self::DEFAULT_MOCK_REPORTER_ID.to_string()),
        };

        Ok(Self {
            mock_mode,
            mock_reporter_id,
        })
    }
}

impl LlmConfig {
    pub fn from_env() -> Result<Self, String> {
        let tensorzero_url =
            env::var("TENSORZERO_URL").unwrap_or_else(|_| "http://localhost:3030".to_string());

        let api_key = env::var("LLM_API_KEY")
            .map_err(|_| "LLM_API_KEY environment variable is required".to_string())?;

        let model_name =
            env::var("LLM_MODEL_NAME").unwrap_or_else(|_| "openai::gpt-4o-mini".to_string());

        let prompt_template_dir = env::var("PROMPT_TEMPLATE_DIR")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            tensorzero_url,
            api_key,
            model_name,
            prompt_template_dir,
        })
    }
}

impl AuthConfig {
    const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 3600; // 1 hour
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute

    /// Returns `None` when no issuer is configured, which disables token validation
    pub fn from_env() -> Result<Option<Self>, String> {
        let issuer = match env::var("AUTH_ISSUER").ok().filter(|s| !s.is_empty()) {
            Some(issuer) => issuer,
            None => return Ok(None),
        };

        let audience = env::var("AUTH_AUDIENCE").map_err(|_| {
            "AUTH_AUDIENCE environment variable is required when AUTH_ISSUER is set".to_string()
        })?;

        let jwks_url =
            env::var("AUTH_JWKS_URL").unwrap_or_else(|_| format!("{}/jwks", issuer));

        let roles_claim = env::var("AUTH_ROLES_CLAIM").unwrap_or_else(|_| "roles".to_string());

        let jwks_cache_ttl_secs = env::var("JWKS_CACHE_TTL")
            .unwrap_or_else(|_| Self::DEFAULT_JWKS_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWKS_CACHE_TTL must be a valid number".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Some(Self {
            issuer,
            audience,
            jwks_url,
            roles_claim,
            jwks_cache_ttl: Duration::from_secs(jwks_cache_ttl_secs),
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        }))
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Civic Intake API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Citizen issue intake and review API".to_string());

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

impl MediaConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("MEDIA_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        let public_endpoint =
            env::var("MEDIA_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        let access_key = env::var("MEDIA_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());
        let secret_key = env::var("MEDIA_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());
        let bucket = env::var("MEDIA_BUCKET").unwrap_or_else(|_| "civic-intake-media".to_string());
        let region = env::var("MEDIA_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let prefix = env::var("MEDIA_PREFIX").unwrap_or_else(|_| "issue-media".to_string());

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(parse_flag(" YES ").unwrap());
        assert!(!parse_flag("false").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(!parse_flag("").unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut config = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: "t".to_string(),
            version: "v".to_string(),
            description: "d".to_string(),
        };
        assert!(config.credentials().is_none());

        config.password = Some("secret".to_string());
        assert_eq!(config.credentials(), Some("admin:secret".to_string()));
    }
}
