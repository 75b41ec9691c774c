use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DEFAULT_KEY: &str = "metadata-customizer";

/// Load/save for the settings record. Implementations own where and how
/// the record is kept; `Config` itself knows nothing about persistence.
pub trait ConfigStore: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Config>>;

    fn save(&self, cfg: &Config) -> Result<()>;
}

/// Stored record, or the defaults when there is none.
pub fn load_or_default(store: &dyn ConfigStore) -> Result<Config> {
    Ok(store.load()?.unwrap_or_default())
}

/// TOML record at `<dir>/<key>.toml`.
pub struct FileStore {
    dir: PathBuf,
    key: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    /// Store under the user's config directory, e.g.
    /// `~/.config/metadata-customizer/metadata-customizer.toml`.
    pub fn user_default() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow!("no user config directory on this platform"))?;
        Ok(Self::new(base.join(DEFAULT_KEY), DEFAULT_KEY))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.toml", self.key))
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

impl ConfigStore for FileStore {
    fn load(&self) -> Result<Option<Config>> {
        let path = self.path();
        if !path.exists() {
            debug!("no settings record at {}", path.display());
            return Ok(None);
        }
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg = Config::from_toml_str(&s)
            .with_context(|| format!("loading settings from {}", path.display()))?;
        Ok(Some(cfg))
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.path();
        write_atomic(&path, &cfg.to_toml_string()?)?;
        info!("saved settings to {}", path.display());
        Ok(())
    }
}

/// Keeps the serialized record in memory. Goes through the same TOML
/// encoding as `FileStore`.
#[derive(Default)]
pub struct MemoryStore {
    record: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw stored document, if any.
    pub fn raw(&self) -> Option<String> {
        self.record.lock().ok().and_then(|g| g.clone())
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Option<Config>> {
        let guard = self.record.lock().map_err(|_| anyhow!("settings record lock poisoned"))?;
        guard.as_deref().map(Config::from_toml_str).transpose()
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        let s = cfg.to_toml_string()?;
        let mut guard = self.record.lock().map_err(|_| anyhow!("settings record lock poisoned"))?;
        *guard = Some(s);
        Ok(())
    }
}
