//! Runtime configuration, read from flags or the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Campfinder backend settings.
///
/// Every flag can also come from the environment, which is how the container
/// deployments set them.
#[derive(Debug, Clone, Parser)]
#[command(name = "campfinder-backend", about = "Bootcamp directory REST API")]
pub struct ServerConfig {
    /// Socket the HTTP server binds.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind_addr: SocketAddr,

    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Secret for signing session tokens.
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: String,

    /// Whether the token cookie carries the `Secure` attribute.
    #[arg(long, env = "COOKIE_SECURE", default_value_t = false)]
    pub cookie_secure: bool,

    /// Externally reachable base URL, used in password-reset mail.
    #[arg(long, env = "PUBLIC_URL", default_value = "http://localhost:5000")]
    pub public_url: String,

    /// Nominatim-compatible geocoding endpoint.
    #[arg(
        long,
        env = "GEOCODER_ENDPOINT",
        default_value = "https://nominatim.openstreetmap.org"
    )]
    pub geocoder_endpoint: String,

    /// User-Agent sent to the geocoder, required by its usage policy.
    #[arg(long, env = "GEOCODER_USER_AGENT", default_value = "campfinder-backend")]
    pub geocoder_user_agent: String,

    /// SMTP relay host.
    #[arg(long, env = "SMTP_HOST", default_value = "localhost")]
    pub smtp_host: String,

    /// SMTP relay port.
    #[arg(long, env = "SMTP_PORT", default_value_t = 1025)]
    pub smtp_port: u16,

    /// Optional SMTP username.
    #[arg(long, env = "SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    /// Optional SMTP password.
    #[arg(long, env = "SMTP_PASSWORD")]
    pub smtp_password: Option<String>,

    /// `From:` mailbox for outgoing mail.
    #[arg(
        long,
        env = "FROM_EMAIL",
        default_value = "Campfinder <noreply@campfinder.dev>"
    )]
    pub from_email: String,

    /// Directory bootcamp photos are written to.
    #[arg(long, env = "FILE_UPLOAD_PATH", default_value = "public/uploads")]
    pub upload_dir: PathBuf,

    /// Maximum accepted photo size in bytes.
    #[arg(long, env = "MAX_FILE_UPLOAD", default_value_t = 1_000_000)]
    pub max_file_upload: usize,

    /// Connection pool size.
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = 10)]
    pub db_pool_size: u32,
}

impl ServerConfig {
    /// Username/password pair when both are configured.
    #[must_use]
    pub fn smtp_credentials(&self) -> Option<(String, String)> {
        match (&self.smtp_username, &self.smtp_password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        }
    }
}
