use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{MurmurError, Result};
use crate::config::Config;
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub config: Config,
    /// Directory JSON batches are written to
    pub results_dir: PathBuf,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let config = Config::load().map_err(|e| MurmurError::Config(e.to_string()))?;
        Self::with_config(db_path, config)
    }

    pub fn with_config(db_path: Option<PathBuf>, config: Config) -> Result<Self> {
        let data_dir = Self::data_dir()?;
        let db_path = match db_path {
            Some(p) => p,
            None => data_dir.join("murmur.db"),
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);

        Ok(Self {
            store,
            config,
            results_dir: data_dir.join("results"),
        })
    }

    pub fn in_memory(config: Config, results_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            store: Arc::new(SqliteStore::in_memory()?),
            config,
            results_dir,
        })
    }

    fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| MurmurError::Config("Could not find data directory".into()))?;
        let murmur_dir = data_dir.join("murmur");
        std::fs::create_dir_all(&murmur_dir)?;
        Ok(murmur_dir)
    }
}
