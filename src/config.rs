//! Configuration management for the tweak accessor generator.
//!
//! Handles:
//! - Command-line argument parsing
//! - Optional `tweakgen.toml` config file (project, then user config dir)
//! - Merging both into one resolved [`Config`]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::codegen::{EmitTarget, EmptySchemaPolicy, DEFAULT_ACCESSOR_NAME, DEFAULT_RUNTIME_PATH};
use crate::tweaks::DocumentFormat;

/// Config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "tweakgen.toml";

/// Output path meaning standard output
pub const STDOUT_PATH: &str = "-";

/// Command-line arguments for the generator
#[derive(Debug, Default, Parser)]
#[command(name = "tweakgen")]
#[command(about = "Generate typed tweak accessors from a tweaks document")]
#[command(version)]
pub struct Args {
    /// Tweaks document to read
    #[arg(short, long, help = "Tweaks document (JSON or TOML)")]
    pub input: Option<PathBuf>,

    /// Where to write the generated source
    #[arg(short, long, help = "Generated Rust file, or '-' for stdout")]
    pub output: Option<PathBuf>,

    /// Syntax of the input document
    #[arg(long, value_enum, help = "Input format; inferred from the extension when omitted")]
    pub format: Option<DocumentFormat>,

    /// Name of the generated accessor struct
    #[arg(long, help = "Accessor struct name (default: GeneratedTweakAccessor)")]
    pub accessor_name: Option<String>,

    /// Module path of the runtime support types
    #[arg(long, help = "Module path providing TweakProvider (default: tweakgen::runtime)")]
    pub runtime_path: Option<String>,

    /// Fail on documents without features
    #[arg(long, help = "Treat a document with no features as an error")]
    pub require_features: bool,

    /// Verify instead of writing
    #[arg(long, help = "Fail if the output file is missing or out of date")]
    pub check: bool,

    /// Explicit config file
    #[arg(long, help = "Config file (default: ./tweakgen.toml, then the user config dir)")]
    pub config: Option<PathBuf>,

    /// Log level for the generator
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Settings accepted in a config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<DocumentFormat>,
    pub accessor_name: Option<String>,
    pub runtime_path: Option<String>,
    pub require_features: Option<bool>,
}

impl FileConfig {
    /// Parse a config file, resolving relative paths against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: FileConfig = toml::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.input = config.input.map(|p| base.join(p));
            config.output = config
                .output
                .map(|p| if p == Path::new(STDOUT_PATH) { p } else { base.join(p) });
        }
        Ok(config)
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Explicit input format; `None` infers from the extension
    pub format: Option<DocumentFormat>,
    pub target: EmitTarget,
    pub check: bool,
    pub log_level: String,
    /// Config file that contributed settings, if any
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        let args = Args::parse();
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        Self::from_args_in(args, &cwd)
    }

    /// Create configuration from explicit arguments, looking for a project
    /// config file in `dir` (useful for testing)
    pub fn from_args_in(args: Args, dir: &Path) -> Result<Self> {
        let config_file = match &args.config {
            Some(path) => Some(path.clone()),
            None => discover_config_file(dir),
        };

        let file = match &config_file {
            Some(path) => {
                log::debug!("Using config file {}", path.display());
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };

        Self::merge(args, file, config_file)
    }

    /// Combine arguments with file settings; arguments win
    pub fn merge(args: Args, file: FileConfig, config_file: Option<PathBuf>) -> Result<Self> {
        let Some(input) = args.input.or(file.input) else {
            bail!("no tweaks document given; pass --input or set `input` in {PROJECT_CONFIG_FILE}");
        };
        let Some(output) = args.output.or(file.output) else {
            bail!("no output file given; pass --output or set `output` in {PROJECT_CONFIG_FILE}");
        };

        let empty_schema = if args.require_features || file.require_features.unwrap_or(false) {
            EmptySchemaPolicy::Reject
        } else {
            EmptySchemaPolicy::Allow
        };

        let mut target = EmitTarget::new(
            args.accessor_name
                .or(file.accessor_name)
                .unwrap_or_else(|| DEFAULT_ACCESSOR_NAME.to_string()),
        )
        .with_empty_schema(empty_schema);
        target.runtime_path = args
            .runtime_path
            .or(file.runtime_path)
            .unwrap_or_else(|| DEFAULT_RUNTIME_PATH.to_string());
        if let Some(name) = input.file_name() {
            target.source_name = Some(name.to_string_lossy().into_owned());
        }

        Ok(Config {
            input,
            output,
            format: args.format.or(file.format),
            target,
            check: args.check,
            log_level: args.log_level,
            config_file,
        })
    }

    /// Whether the artifact goes to standard output
    pub fn writes_to_stdout(&self) -> bool {
        self.output == Path::new(STDOUT_PATH)
    }
}

/// Project config in `dir`, else the user-level config
fn discover_config_file(dir: &Path) -> Option<PathBuf> {
    let project = dir.join(PROJECT_CONFIG_FILE);
    if project.is_file() {
        return Some(project);
    }

    let user = dirs::config_dir()?.join("tweakgen").join("config.toml");
    user.is_file().then_some(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str, output: &str) -> Args {
        Args {
            input: Some(PathBuf::from(input)),
            output: Some(PathBuf::from(output)),
            log_level: "info".to_string(),
            ..Args::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::merge(args("tweaks.json", "out.rs"), FileConfig::default(), None)
            .expect("config");
        assert_eq!(config.target.accessor_name, DEFAULT_ACCESSOR_NAME);
        assert_eq!(config.target.runtime_path, DEFAULT_RUNTIME_PATH);
        assert_eq!(config.target.empty_schema, EmptySchemaPolicy::Allow);
        assert_eq!(config.target.source_name.as_deref(), Some("tweaks.json"));
        assert!(config.format.is_none());
        assert!(!config.writes_to_stdout());
    }

    #[test]
    fn test_args_override_file() {
        let file = FileConfig {
            input: Some(PathBuf::from("from_file.json")),
            output: Some(PathBuf::from("from_file.rs")),
            accessor_name: Some("FileAccessor".to_string()),
            require_features: Some(true),
            ..FileConfig::default()
        };
        let mut cli = args("cli.json", STDOUT_PATH);
        cli.accessor_name = Some("CliAccessor".to_string());

        let config = Config::merge(cli, file, None).expect("config");
        assert_eq!(config.input, PathBuf::from("cli.json"));
        assert!(config.writes_to_stdout());
        assert_eq!(config.target.accessor_name, "CliAccessor");
        assert_eq!(config.target.empty_schema, EmptySchemaPolicy::Reject);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let cli = Args {
            output: Some(PathBuf::from("out.rs")),
            ..Args::default()
        };
        let err = Config::merge(cli, FileConfig::default(), None).unwrap_err();
        assert!(err.to_string().contains("--input"));
    }

    #[test]
    fn test_parse_command_line() {
        let args = Args::parse_from([
            "tweakgen",
            "-i",
            "tweaks.toml",
            "-o",
            "-",
            "--format",
            "toml",
            "--require-features",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("tweaks.toml")));
        assert_eq!(args.format, Some(DocumentFormat::Toml));
        assert!(args.require_features);
        assert_eq!(args.log_level, "info");
    }
}
