//! Configuration loading and parsing.
//!
//! Parses `modaline.toml`, extracting the `[general]` table. Unknown fields
//! are ignored (TOML deserialization tolerance) so the format can grow
//! without breaking older files. Discovery prefers a local working-directory
//! file and falls back to the platform config dir.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// Flavor of the modal layer.
///
/// `BashVim` is the relaxed readline-style variant: vertical motion (`j`/`k`),
/// `G`, and `/`/`?` yield to the enclosing history navigator instead of being
/// consumed by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum VimModeStyle {
    #[default]
    #[serde(rename = "vim-editor")]
    VimEditor,
    #[serde(rename = "bash-vim")]
    BashVim,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GeneralConfig {
    #[serde(default)]
    pub vim_mode_style: VimModeStyle,
    /// When true, `:`, `/`, `?` insert themselves instead of opening the
    /// command line.
    #[serde(default)]
    pub disable_vim_command_mode: bool,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,
}

/// Best-effort config path: local `modaline.toml` first, then the platform
/// config directory.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("modaline.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("modaline").join("modaline.toml");
    }
    PathBuf::from("modaline.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => {
                info!(target: "config", path = %path.display(), "config_loaded");
                Ok(Config { file })
            }
            Err(e) => {
                warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
                Ok(Config::default())
            }
        }
    } else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_vim_editor_with_command_mode() {
        let cfg: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(cfg.general.vim_mode_style, VimModeStyle::VimEditor);
        assert!(!cfg.general.disable_vim_command_mode);
    }

    #[test]
    fn parses_bash_vim_style() {
        let cfg: ConfigFile = toml::from_str(
            "[general]\nvim_mode_style = \"bash-vim\"\ndisable_vim_command_mode = true\n",
        )
        .unwrap();
        assert_eq!(cfg.general.vim_mode_style, VimModeStyle::BashVim);
        assert!(cfg.general.disable_vim_command_mode);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let cfg: ConfigFile = toml::from_str(
            "[general]\nvim_mode_style = \"vim-editor\"\nfuture_knob = 3\n[other]\nx = 1\n",
        )
        .unwrap();
        assert_eq!(cfg.general.vim_mode_style, VimModeStyle::VimEditor);
    }
}
