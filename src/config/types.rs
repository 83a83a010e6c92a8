//! Value types for launch arguments.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::error::ConfigError;

/// Parse a truth value.
///
/// True values are `y, yes, t, true, on, 1`; false values are
/// `n, no, f, false, off, 0`. Matching is case-insensitive.
pub fn strtobool(value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidBool(value.to_string())),
    }
}

/// Target device for training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    #[default]
    Gpu,
    Xpu,
    Npu,
}

impl std::str::FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "gpu" => Ok(Device::Gpu),
            "xpu" => Ok(Device::Xpu),
            "npu" => Ok(Device::Npu),
            _ => Err(format!("Unknown device: {s}. Valid devices: cpu, gpu, xpu, npu")),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Device::Cpu => "cpu",
            Device::Gpu => "gpu",
            Device::Xpu => "xpu",
            Device::Npu => "npu",
        };
        f.write_str(name)
    }
}

/// Learning-rate decay applied after warmup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LrDecayStyle {
    #[default]
    Cosine,
    Linear,
    None,
}

impl std::str::FromStr for LrDecayStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(LrDecayStyle::Cosine),
            "linear" => Ok(LrDecayStyle::Linear),
            "none" => Ok(LrDecayStyle::None),
            _ => Err(format!(
                "Unknown lr decay style: {s}. Valid styles: cosine, linear, none"
            )),
        }
    }
}

impl fmt::Display for LrDecayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LrDecayStyle::Cosine => "cosine",
            LrDecayStyle::Linear => "linear",
            LrDecayStyle::None => "none",
        };
        f.write_str(name)
    }
}

/// Output format for the resolved configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("Unknown output format: {s}. Valid formats: text, json, yaml")),
        }
    }
}

/// Profiler settings given as `key1=value1;key2=value2`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfilerOptions(BTreeMap<String, String>);

impl ProfilerOptions {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::str::FromStr for ProfilerOptions {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut options = BTreeMap::new();
        for segment in s.split(';').map(str::trim).filter(|seg| !seg.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidProfilerOption(segment.to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::InvalidProfilerOption(segment.to_string()));
            }
            options.insert(key.to_string(), value.trim().to_string());
        }
        Ok(Self(options))
    }
}

impl fmt::Display for ProfilerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        f.write_str(&joined.join(";"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strtobool_truthy() {
        for value in ["y", "YES", "t", "True", "on", "1"] {
            assert_eq!(strtobool(value), Ok(true), "{value}");
        }
    }

    #[test]
    fn test_strtobool_falsy() {
        for value in ["n", "No", "F", "false", "OFF", "0"] {
            assert_eq!(strtobool(value), Ok(false), "{value}");
        }
    }

    #[test]
    fn test_strtobool_rejects() {
        assert_eq!(
            strtobool("maybe"),
            Err(ConfigError::InvalidBool("maybe".to_string()))
        );
        assert!(strtobool("").is_err());
        assert!(strtobool("2").is_err());
    }

    #[test]
    fn test_device_parse() {
        assert_eq!("CPU".parse::<Device>(), Ok(Device::Cpu));
        assert_eq!("npu".parse::<Device>(), Ok(Device::Npu));
        assert!("tpu".parse::<Device>().is_err());
        assert_eq!(Device::default().to_string(), "gpu");
    }

    #[test]
    fn test_lr_decay_style_parse() {
        assert_eq!("Linear".parse::<LrDecayStyle>(), Ok(LrDecayStyle::Linear));
        assert_eq!("none".parse::<LrDecayStyle>(), Ok(LrDecayStyle::None));
        assert!("step".parse::<LrDecayStyle>().is_err());
    }

    #[test]
    fn test_profiler_options_parse() {
        let opts: ProfilerOptions = "batch_range=[10,20]; state=GPU;;tracer_option=Default"
            .parse()
            .unwrap();
        assert_eq!(opts.len(), 3);
        assert_eq!(opts.get("batch_range"), Some("[10,20]"));
        assert_eq!(opts.get("state"), Some("GPU"));
        assert_eq!(opts.get("missing"), None);
    }

    #[test]
    fn test_profiler_options_display_sorted() {
        let opts: ProfilerOptions = "b=2;a=1".parse().unwrap();
        assert_eq!(opts.to_string(), "a=1;b=2");
    }

    #[test]
    fn test_profiler_options_rejects_malformed() {
        assert!("state".parse::<ProfilerOptions>().is_err());
        assert!("=GPU".parse::<ProfilerOptions>().is_err());
        assert!("".parse::<ProfilerOptions>().unwrap().is_empty());
    }
}
