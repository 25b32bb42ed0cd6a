use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use taglex_config::TaglexConfig;

/// Load the config file (or defaults) and apply command-line overrides
pub async fn load(
    path: Option<&Path>,
    db_path: Option<PathBuf>,
    strict_case: bool,
) -> Result<TaglexConfig> {
    let mut config = match path {
        Some(path) => TaglexConfig::load_from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => TaglexConfig::default(),
    };

    if let Some(db_path) = db_path {
        config.storage.path = db_path;
    }
    if strict_case {
        config.tagging.strict_case_match = true;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_without_file() {
        let config = load(None, None, false).await.unwrap();
        assert_eq!(config, TaglexConfig::default());
    }

    #[tokio::test]
    async fn test_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taglex.toml");
        tokio::fs::write(
            &file,
            "[tagging]\nstrict_case_match = false\n\n[storage]\npath = \"from-file.db\"\n",
        )
        .await
        .unwrap();

        let config = load(Some(&file), Some(PathBuf::from("cli.db")), true)
            .await
            .unwrap();
        assert_eq!(config.storage.path, PathBuf::from("cli.db"));
        assert!(config.tagging.strict_case_match);
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let err = load(Some(Path::new("/nonexistent/taglex.toml")), None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/taglex.toml"));
    }
}
