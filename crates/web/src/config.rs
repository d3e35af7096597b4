use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    str::FromStr,
};

use database::DatabaseConnectionInfo;
use model::location::Coordinates;
use repair_directory::geocoder::{PlaceholderGeocoder, DEFAULT_REFERENCE, DEFAULT_SPREAD_DEGREES};
use supabase::SupabaseCredentials;
use utility::geo;

pub const DEFAULT_BIND_ADDRESS: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);
pub const DEFAULT_STATIC_DIR: &str = "./resources/www/";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("the {backend} store needs {missing} to be set")]
    Missing {
        backend: &'static str,
        missing: &'static str,
    },
}

/// Which table backend the directory reads and writes.
pub enum StoreConfig {
    Postgres(DatabaseConnectionInfo),
    Supabase(SupabaseCredentials),
    Memory,
}

impl StoreConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Supabase(_) => "supabase",
            Self::Memory => "memory",
        }
    }
}

pub struct WebConfig {
    pub bind_address: SocketAddr,
    pub static_dir: PathBuf,
}

pub struct DirectoryConfig {
    pub store: StoreConfig,
    pub web: WebConfig,
    pub geocoder: PlaceholderGeocoder,
}

impl DirectoryConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("DIRECTORY_STORE").as_deref().unwrap_or("memory") {
            "memory" => StoreConfig::Memory,
            "postgres" => database_info(&lookup).map(StoreConfig::Postgres)?,
            "supabase" => {
                let url = lookup("SUPABASE_URL").ok_or(ConfigError::Missing {
                    backend: "supabase",
                    missing: "SUPABASE_URL",
                })?;
                let key = lookup("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing {
                    backend: "supabase",
                    missing: "SUPABASE_ANON_KEY",
                })?;
                StoreConfig::Supabase(SupabaseCredentials::new(url, key))
            }
            other => {
                return Err(ConfigError::Invalid {
                    name: "DIRECTORY_STORE",
                    value: other.to_owned(),
                    reason: "expected one of memory, postgres, supabase".to_owned(),
                })
            }
        };

        let web = WebConfig {
            bind_address: parsed(&lookup, "WEB_BIND_ADDRESS")?
                .unwrap_or(DEFAULT_BIND_ADDRESS),
            static_dir: lookup("WEB_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        };

        let reference = Coordinates::new(
            parsed(&lookup, "GEOCODER_REFERENCE_LATITUDE")?
                .unwrap_or(DEFAULT_REFERENCE.latitude),
            parsed(&lookup, "GEOCODER_REFERENCE_LONGITUDE")?
                .unwrap_or(DEFAULT_REFERENCE.longitude),
        );
        if !geo::is_valid_coordinate(reference.latitude, reference.longitude) {
            return Err(ConfigError::Invalid {
                name: "GEOCODER_REFERENCE_LATITUDE/LONGITUDE",
                value: format!("{}, {}", reference.latitude, reference.longitude),
                reason: "not a valid coordinate".to_owned(),
            });
        }
        let spread = parsed(&lookup, "GEOCODER_SPREAD_DEGREES")?.unwrap_or(DEFAULT_SPREAD_DEGREES);

        Ok(Self {
            store,
            web,
            geocoder: PlaceholderGeocoder::new(reference, spread),
        })
    }
}

fn parsed<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|value| {
            value.trim().parse::<T>().map_err(|why| ConfigError::Invalid {
                name,
                value: value.clone(),
                reason: why.to_string(),
            })
        })
        .transpose()
}

fn database_info<F>(lookup: &F) -> Result<DatabaseConnectionInfo, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let require = |name: &'static str| {
        lookup(name).ok_or(ConfigError::Missing {
            backend: "postgres",
            missing: name,
        })
    };
    Ok(DatabaseConnectionInfo {
        username: require("DATABASE_USER")?,
        password: require("DATABASE_PASSWORD")?,
        hostname: require("DATABASE_HOST")?,
        port: parsed(lookup, "DATABASE_PORT")?.ok_or(ConfigError::Missing {
            backend: "postgres",
            missing: "DATABASE_PORT",
        })?,
        database: require("DATABASE_NAME")?,
    })
}
