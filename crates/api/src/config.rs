use std::path::PathBuf;
use std::str::FromStr;

/// Upload directory for the local file-storage backend.
const DEFAULT_LOCAL_DIR: &str = "storage/uploads";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for closing the database pool after the server stops.
    pub shutdown_timeout_secs: u64,
    /// Upper bound for one atomic storage unit, in seconds (default: `10`).
    pub transaction_timeout_secs: u64,
    /// Maximum pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// Maximum request body size for uploads, in bytes (default: 25 MiB).
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
    pub file_storage: FileStorageConfig,
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Where uploaded attachments are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStorageBackend {
    /// Local directory, served by this process under `/uploads`.
    Local { dir: PathBuf },
    /// An S3 bucket; credentials come from the standard AWS environment.
    S3 { bucket: String },
}

#[derive(Debug, Clone)]
pub struct FileStorageConfig {
    pub backend: FileStorageBackend,
    /// Base URL that object keys are appended to.
    pub public_url: String,
    /// Prefix for every object key (default: `clients`).
    pub key_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: vec!["http://localhost:5173".to_string()],
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
            transaction_timeout_secs: 10,
            db_max_connections: intake_db::DEFAULT_MAX_CONNECTIONS,
            max_upload_bytes: 25 * 1024 * 1024,
            log_format: LogFormat::Pretty,
            file_storage: FileStorageConfig {
                backend: FileStorageBackend::Local {
                    dir: PathBuf::from(DEFAULT_LOCAL_DIR),
                },
                public_url: "http://localhost:3000/uploads".to_string(),
                key_prefix: "clients".to_string(),
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                          |
    /// |----------------------------|----------------------------------|
    /// | `HOST`                     | `0.0.0.0`                        |
    /// | `PORT`                     | `3000`                           |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                             |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                             |
    /// | `TRANSACTION_TIMEOUT_SECS` | `10`                             |
    /// | `DB_MAX_CONNECTIONS`       | `20`                             |
    /// | `MAX_UPLOAD_BYTES`         | `26214400`                       |
    /// | `LOG_FORMAT`               | `pretty` (`pretty` or `json`)    |
    /// | `FILE_STORAGE_BACKEND`     | `local` (`local` or `s3`)        |
    /// | `FILE_STORAGE_LOCAL_DIR`   | `storage/uploads`                |
    /// | `FILE_STORAGE_S3_BUCKET`   | required when backend is `s3`    |
    /// | `FILE_STORAGE_PUBLIC_URL`  | `http://localhost:3000/uploads`  |
    /// | `FILE_STORAGE_KEY_PREFIX`  | `clients`                        |
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);

        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(defaults.cors_origins);

        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Err(_) => LogFormat::Pretty,
            Ok(other) => panic!("LOG_FORMAT must be 'pretty' or 'json', got '{other}'"),
        };

        let backend = match std::env::var("FILE_STORAGE_BACKEND").as_deref() {
            Ok("s3") => FileStorageBackend::S3 {
                bucket: std::env::var("FILE_STORAGE_S3_BUCKET")
                    .expect("FILE_STORAGE_S3_BUCKET must be set when FILE_STORAGE_BACKEND=s3"),
            },
            Ok("local") | Err(_) => FileStorageBackend::Local {
                dir: std::env::var("FILE_STORAGE_LOCAL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOCAL_DIR)),
            },
            Ok(other) => {
                panic!("FILE_STORAGE_BACKEND must be 'local' or 's3', got '{other}'")
            }
        };

        let file_storage = FileStorageConfig {
            backend,
            public_url: std::env::var("FILE_STORAGE_PUBLIC_URL")
                .unwrap_or(defaults.file_storage.public_url),
            key_prefix: std::env::var("FILE_STORAGE_KEY_PREFIX")
                .unwrap_or(defaults.file_storage.key_prefix),
        };

        Self {
            host,
            port: env_parse("PORT", defaults.port),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            shutdown_timeout_secs: env_parse(
                "SHUTDOWN_TIMEOUT_SECS",
                defaults.shutdown_timeout_secs,
            ),
            transaction_timeout_secs: env_parse(
                "TRANSACTION_TIMEOUT_SECS",
                defaults.transaction_timeout_secs,
            ),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            log_format,
            file_storage,
        }
    }
}

/// Split a comma-separated origin list, dropping blank entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse an env var, falling back to `default` when unset.
fn env_parse<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.transaction_timeout_secs, 10);
        assert_eq!(config.max_upload_bytes, 26_214_400);
        assert_eq!(config.file_storage.key_prefix, "clients");
        assert_eq!(
            config.file_storage.backend,
            FileStorageBackend::Local {
                dir: PathBuf::from("storage/uploads")
            }
        );
    }

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" https://a.example ,, https://b.example,"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(parse_origins(" , ").is_empty());
    }

    #[test]
    fn env_parse_falls_back_when_unset() {
        assert_eq!(env_parse("INTAKE_TEST_SURELY_UNSET_VAR", 7u64), 7);
    }
}
