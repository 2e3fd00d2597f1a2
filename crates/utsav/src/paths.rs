use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "UTSAV_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "UTSAV_DATA_DIR";
pub const ENV_CACHE_DIR: &str = "UTSAV_CACHE_DIR";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "Utsav";
const APPLICATION: &str = "utsav";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
    cache_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        // Env overrides work even where no home directory can be determined.
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION);
        let project_dirs = project_dirs.as_ref();

        let config_dir = resolve_dir(ENV_CONFIG_DIR, project_dirs.map(|dirs| dirs.config_dir()))
            .context("failed to resolve utsav config directory")?;
        let data_dir = resolve_dir(ENV_DATA_DIR, project_dirs.map(|dirs| dirs.data_dir()))
            .context("failed to resolve utsav data directory")?;
        let cache_dir = resolve_dir(ENV_CACHE_DIR, project_dirs.map(|dirs| dirs.cache_dir()))
            .context("failed to resolve utsav cache directory")?;

        Ok(Self {
            config_dir,
            data_dir,
            cache_dir,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn state_file(&self) -> PathBuf {
        self.config_dir.join("state.toml")
    }

    pub fn site_file(&self) -> PathBuf {
        self.config_dir.join("site.toml")
    }
}

fn resolve_dir(env_var: &str, default: Option<&Path>) -> Result<PathBuf> {
    if let Some(value) = env_override(env_var) {
        return Ok(value);
    }
    default
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("failed to determine user directories; set {env_var}"))
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn env_lock() -> &'static Mutex<()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvGuard {
        key: &'static str,
        previous: Option<OsString>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &Path) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = self.previous.take() {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    #[test]
    fn env_overrides_take_precedence() {
        let _guard = env_lock().lock().unwrap();
        let root = TempDir::new().unwrap();
        let config_dir = root.path().join("config");
        let data_dir = root.path().join("data");
        let cache_dir = root.path().join("cache");

        let _config_guard = EnvGuard::set(ENV_CONFIG_DIR, &config_dir);
        let _data_guard = EnvGuard::set(ENV_DATA_DIR, &data_dir);
        let _cache_guard = EnvGuard::set(ENV_CACHE_DIR, &cache_dir);

        let paths = AppPaths::discover().unwrap();

        assert_eq!(paths.config_dir(), config_dir.as_path());
        assert_eq!(paths.data_dir(), data_dir.as_path());
        assert_eq!(paths.cache_dir(), cache_dir.as_path());
        assert_eq!(paths.state_file(), config_dir.join("state.toml"));
        assert_eq!(paths.site_file(), config_dir.join("site.toml"));
    }
}
