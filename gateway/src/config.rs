use std::{net::SocketAddr, time::Duration};

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "EcoRutas gateway: trip metrics over the EcoRutas REST backend"
)]
pub struct Config {
    /// Address the HTTP API listens on
    #[arg(long, env = "ECORUTAS_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Base URL of the EcoRutas REST backend (routes, users, trip histories)
    #[arg(long, env = "ECORUTAS_API_URL", default_value = "http://localhost:3333")]
    pub api_url: String,

    /// Base URL of the OSRM-compatible road-routing service
    #[arg(
        long,
        env = "ECORUTAS_OSRM_URL",
        default_value = "https://router.project-osrm.org"
    )]
    pub osrm_url: String,

    /// OSRM profile used for road geometry
    #[arg(long, env = "ECORUTAS_OSRM_PROFILE", default_value = "driving")]
    pub osrm_profile: String,

    /// Timeout applied to every outbound HTTP request, in seconds
    #[arg(long, env = "ECORUTAS_HTTP_TIMEOUT_SECS", default_value_t = 10)]
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
