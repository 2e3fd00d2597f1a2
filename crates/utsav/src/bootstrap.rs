use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use siteconfig::SiteConfig;
use tracing::{debug, info};

use crate::paths::AppPaths;
use crate::state::AppState;

pub fn bootstrap_filesystem(paths: &AppPaths) -> Result<AppState> {
    for dir in [paths.config_dir(), paths.data_dir(), paths.cache_dir()] {
        ensure_directory(dir)?;
    }

    let state_path = paths.state_file();
    let state = AppState::load_or_default(&state_path)?;
    if state_path.exists() {
        debug!(path = %state_path.display(), "loaded utsav state file");
    }
    Ok(state)
}

/// Reads `site.toml` when present.
pub fn load_site_config(paths: &AppPaths) -> Result<Option<SiteConfig>> {
    let path = paths.site_file();
    if !path.exists() {
        debug!(path = %path.display(), "no site config; using built-in defaults");
        return Ok(None);
    }
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read site config at {}", path.display()))?;
    let config = SiteConfig::from_toml_str(&contents)
        .with_context(|| format!("invalid site config at {}", path.display()))?;
    info!(
        path = %path.display(),
        events = config.events.len(),
        "loaded site config"
    );
    Ok(Some(config))
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32)> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| anyhow::anyhow!("expected WxH format, e.g. 1920x1080"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid width in size specification"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid height in size specification"))?;

    if width == 0 || height == 0 {
        bail!("surface dimensions must be greater than zero");
    }

    Ok((width, height))
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() {
        if path.is_dir() {
            Ok(())
        } else {
            bail!("filesystem entry at {} is not a directory", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create utsav directory at {}", path.display()))?;
        info!(path = %path.display(), "created utsav directory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_surface_sizes() {
        assert_eq!(parse_surface_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_surface_size(" 800 X 600 ").unwrap(), (800, 600));
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("0x720").is_err());
        assert!(parse_surface_size("widexhigh").is_err());
    }
}
