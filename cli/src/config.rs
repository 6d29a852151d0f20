//! Optional `mdcompile.toml` configuration.
//!
//! ```toml
//! [compiler]
//! command = "dotnet"
//! args = ["/usr/share/dotnet/sdk/8.0.100/Roslyn/bincore/csc.dll"]
//! references = ["lib/MyLibrary.dll"]
//!
//! [language]
//! name = "csharp"
//! tags = ["csharp", "cs", "c#"]
//! ```

use std::path::{Path, PathBuf};

use driver::{DriverError, ProcessCompiler, process::DEFAULT_COMMAND};
use mdcompile::Language;
use serde::Deserialize;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "mdcompile.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub compiler: CompilerConfig,
    pub language: LanguageConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Compiler executable.
    pub command: String,
    /// Arguments placed before the generated ones.
    pub args: Vec<String>,
    /// Reference assemblies, relative to the config file.
    pub references: Vec<PathBuf>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            command: DEFAULT_COMMAND.to_string(),
            args: Vec::new(),
            references: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LanguageConfig {
    pub name: String,
    /// Fence tags selecting the language, matched case-insensitively.
    pub tags: Vec<String>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        let csharp = Language::csharp();
        LanguageConfig {
            name: csharp.name().to_string(),
            tags: csharp.tags().to_vec(),
        }
    }
}

impl Config {
    /// Load `explicit` if given, else `mdcompile.toml` when present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load_from_path(path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            for reference in &mut config.compiler.references {
                if reference.is_relative() {
                    *reference = base.join(&*reference);
                }
            }
        }
        Ok(config)
    }

    pub fn language(&self) -> Language {
        Language::new(self.language.name.clone(), &self.language.tags)
    }

    /// Configured references followed by `extra`.
    pub fn references(&self, extra: &[PathBuf]) -> Vec<PathBuf> {
        self.compiler
            .references
            .iter()
            .chain(extra)
            .cloned()
            .collect()
    }

    pub fn compiler(&self) -> Result<ProcessCompiler, DriverError> {
        Ok(ProcessCompiler::new(&self.compiler.command)?.with_args(&self.compiler.args))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_target_csc_and_csharp() {
        let config = Config::default();
        assert_eq!(config.compiler.command, "csc");
        assert_eq!(config.language(), Language::csharp());
        assert!(config.references(&[]).is_empty());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdcompile.toml");
        std::fs::write(&path, "[language]\ntags = [\"CSharp\"]\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.compiler.command, "csc");
        assert_eq!(config.language.name, "csharp");
        assert!(config.language().recognizes("csharp"));
        assert!(!config.language().recognizes("cs"));
    }

    #[test]
    fn references_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdcompile.toml");
        std::fs::write(
            &path,
            "[compiler]\ncommand = \"dotnet\"\nargs = [\"csc.dll\"]\nreferences = [\"lib/A.dll\", \"/abs/B.dll\"]\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.compiler.args, vec!["csc.dll"]);
        assert_eq!(
            config.references(&[PathBuf::from("C.dll")]),
            vec![
                dir.path().join("lib/A.dll"),
                PathBuf::from("/abs/B.dll"),
                PathBuf::from("C.dll"),
            ]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[compiler]\ncomand = \"csc\"\n").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load(Some(path.as_path())),
            Err(ConfigError::Read { .. })
        ));
    }
}
