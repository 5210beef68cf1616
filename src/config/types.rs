use serde::{Deserialize, Serialize};
use ssql_db::{DatabaseConfig, StatementsConfig};

/// Root configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub statements: StatementsConfig,
}
