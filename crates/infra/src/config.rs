use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_env: String,
    pub port: u16,
    pub log_level: String,
    pub log_json: bool,
    pub data_backend: String,
    pub access_token_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_secret: String,
    pub refresh_token_ttl_secs: i64,
    pub bcrypt_cost: u32,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let cfg = config::Config::builder()
            .set_default("app_env", "development")?
            .set_default("port", 8000)?
            .set_default("log_level", "info")?
            .set_default("log_json", false)?
            .set_default("data_backend", "memory")?
            .set_default("access_token_secret", "dev-access-secret")?
            .set_default("access_token_ttl_secs", 86_400)?
            .set_default("refresh_token_secret", "dev-refresh-secret")?
            .set_default("refresh_token_ttl_secs", 864_000)?
            .set_default("bcrypt_cost", 10)?
            .set_default("request_timeout_secs", 30)?
            .add_source(config::Environment::default().separator("__"))
            .build()?;
        cfg.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Fixed settings for tests: memory backend, cheap hashing, separate token secrets.
    pub fn for_tests() -> Self {
        Self {
            app_env: "test".to_string(),
            port: 0,
            log_level: "warn".to_string(),
            log_json: false,
            data_backend: "memory".to_string(),
            access_token_secret: "test-access-secret".to_string(),
            access_token_ttl_secs: 900,
            refresh_token_secret: "test-refresh-secret".to_string(),
            refresh_token_ttl_secs: 3_600,
            bcrypt_cost: 4,
            request_timeout_secs: 5,
        }
    }
}
