//! Launch command implementation

use crate::cli::logging::{log, warn};
use crate::cli::LogLevel;
use crate::config::{LaunchArgs, OutputFormat, RunConfig};
use crate::error::{Error, Result};

/// Width of the name column in the text summary
const NAME_WIDTH: usize = 20;

/// Format the resolved configuration as `name: value` lines
pub fn format_summary(config: &RunConfig) -> String {
    let mut lines = vec![format!(
        "{:width$}:{}",
        "lanzar version",
        env!("CARGO_PKG_VERSION"),
        width = NAME_WIDTH
    )];
    lines.extend(
        config
            .entries()
            .into_iter()
            .map(|(name, value)| format!("{name:width$}:{value}", width = NAME_WIDTH)),
    );
    lines.join("\n")
}

/// Render the resolved configuration in the requested format
pub fn render(config: &RunConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_summary(config)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(config).map_err(|e| Error::Serialization {
                message: format!("JSON serialization error: {e}"),
            })
        }
        OutputFormat::Yaml => serde_yaml::to_string(config).map_err(|e| Error::Serialization {
            message: format!("YAML serialization error: {e}"),
        }),
    }
}

/// Resolve launch arguments and print the run configuration
pub fn run_launch(args: &LaunchArgs, level: LogLevel) -> Result<RunConfig> {
    log(
        level,
        LogLevel::Verbose,
        &format!("Resolving launch arguments (output_dir: {})", args.output_dir.display()),
    );

    let resolved = args.resolve()?;
    for warning in &resolved.warnings {
        warn(level, warning);
    }

    let rendered = render(&resolved.config, args.format)?;
    match args.format {
        OutputFormat::Text => log(level, LogLevel::Normal, &rendered),
        // Structured output is printed even when quiet
        OutputFormat::Json | OutputFormat::Yaml => println!("{rendered}"),
    }

    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Batch: global={} local={} micro={} accumulate_steps={}",
            resolved.config.batch.global,
            resolved.config.batch.local,
            resolved.config.batch.micro,
            resolved.config.batch.accumulate_steps
        ),
    );

    Ok(resolved.config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_args, ConfigError};

    fn make_args(extra: &[&str]) -> LaunchArgs {
        let base = ["lanzar", "--output_dir", "/ckpt", "--local_batch_size", "2"];
        parse_args(base.iter().chain(extra.iter()).copied()).unwrap()
    }

    #[test]
    fn test_format_summary_layout() {
        let config = make_args(&[]).resolve().unwrap().config;
        let summary = format_summary(&config);
        let first = summary.lines().next().unwrap();
        assert!(first.starts_with("lanzar version      :"));
        assert!(summary.contains("global_batch_size   :16"));
        assert!(summary.contains("output_dir          :/ckpt"));
        assert!(summary.contains("attention_probs_dropout_prob:0.1"));
    }

    #[test]
    fn test_render_json() {
        let config = make_args(&[]).resolve().unwrap().config;
        let json = render(&config, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["batch"]["local"], 2);
        assert_eq!(value["output_dir"], "/ckpt");
    }

    #[test]
    fn test_render_yaml() {
        let config = make_args(&["--device", "npu"]).resolve().unwrap().config;
        let yaml = render(&config, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("device: npu"));
    }

    #[test]
    fn test_run_launch_quiet() {
        let args = make_args(&["--check_accuracy", "true"]);
        let config = run_launch(&args, LogLevel::Quiet).unwrap();
        assert_eq!(config.dropout.hidden_dropout_prob, 0.0);
    }

    #[test]
    fn test_run_launch_propagates_config_error() {
        let args = make_args(&["--global_batch_size", "3"]);
        let err = run_launch(&args, LogLevel::Quiet).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InconsistentBatchSizes { .. })
        ));
    }
}
