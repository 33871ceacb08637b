//! Remembered display name.
//!
//! Stored as a one-key JSON object so other local settings can share the
//! file later.

use std::{collections::BTreeMap, path::Path};

use anyhow::Context;

const NAME_KEY: &str = "pong_player_name";

/// Reads the remembered name. A missing or unreadable file means no name.
pub fn load_name(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    let map: BTreeMap<String, String> = serde_json::from_str(&text).ok()?;
    map.get(NAME_KEY).filter(|n| !n.is_empty()).cloned()
}

/// Writes the name, keeping any other keys already in the file.
pub fn save_name(path: &Path, name: &str) -> anyhow::Result<()> {
    let mut map: BTreeMap<String, String> = std::fs::read_to_string(path)
        .ok()
        .and_then(|t| serde_json::from_str(&t).ok())
        .unwrap_or_default();
    map.insert(NAME_KEY.to_string(), name.to_string());
    let text = serde_json::to_string_pretty(&map).context("serialize profile")?;
    std::fs::write(path, text).with_context(|| format!("write profile {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("pong-profile-{}-{}.json", tag, std::process::id()))
    }

    #[test]
    fn save_then_load() -> anyhow::Result<()> {
        let path = temp_path("roundtrip");
        save_name(&path, "ada")?;
        assert_eq!(load_name(&path), Some("ada".to_string()));
        save_name(&path, "grace")?;
        assert_eq!(load_name(&path), Some("grace".to_string()));
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn missing_file_has_no_name() {
        assert_eq!(load_name(&temp_path("missing")), None);
    }
}
