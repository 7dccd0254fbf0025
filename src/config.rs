use std::env;

use thiserror::Error;

pub const DEFAULT_REGION: &str = "eu-west-2";
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-v2";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub knowledge_base_id: String,
    pub region: String,
    pub model_id: String,
    pub model_arn: Option<String>,
    pub timeout_ms: u64,
    pub port: u16,
    pub verify_caller_identity: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let knowledge_base_id =
            get("KNOWLEDGE_BASE_ID").ok_or(ConfigError::Missing("KNOWLEDGE_BASE_ID"))?;

        let region = get("BEDROCK_REGION")
            .or_else(|| get("AWS_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let model_id = get("MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());

        let timeout_ms = parse_or("TIMEOUT_MS", get("TIMEOUT_MS"), 30_000)?;
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "TIMEOUT_MS",
                value: "0".to_string(),
            });
        }
        let port = parse_or("PORT", get("PORT"), 3000)?;
        let verify_caller_identity = match get("VERIFY_CALLER_IDENTITY") {
            None => true,
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                name: "VERIFY_CALLER_IDENTITY",
                value,
            })?,
        };

        Ok(Self {
            knowledge_base_id,
            region,
            model_id,
            model_arn: get("MODEL_ARN"),
            timeout_ms,
            port,
            verify_caller_identity,
        })
    }

    pub fn model_arn(&self) -> String {
        match &self.model_arn {
            Some(arn) => arn.clone(),
            None => format!(
                "arn:aws:bedrock:{}::foundation-model/{}",
                self.region, self.model_id
            ),
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn knowledge_base_id_is_required() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("KNOWLEDGE_BASE_ID")
        );
        assert_eq!(
            config_from(&[("KNOWLEDGE_BASE_ID", "   ")]).unwrap_err(),
            ConfigError::Missing("KNOWLEDGE_BASE_ID")
        );
    }

    #[test]
    fn defaults_apply() {
        let cfg = config_from(&[("KNOWLEDGE_BASE_ID", "KB123")]).unwrap();
        assert_eq!(cfg.knowledge_base_id, "KB123");
        assert_eq!(cfg.region, "eu-west-2");
        assert_eq!(cfg.model_id, "anthropic.claude-v2");
        assert_eq!(cfg.timeout_ms, 30_000);
        assert_eq!(cfg.port, 3000);
        assert!(cfg.verify_caller_identity);
        assert_eq!(
            cfg.model_arn(),
            "arn:aws:bedrock:eu-west-2::foundation-model/anthropic.claude-v2"
        );
    }

    #[test]
    fn bedrock_region_wins_over_aws_region() {
        let cfg = config_from(&[
            ("KNOWLEDGE_BASE_ID", "KB123"),
            ("AWS_REGION", "us-east-1"),
            ("BEDROCK_REGION", "us-west-2"),
        ])
        .unwrap();
        assert_eq!(cfg.region, "us-west-2");

        let cfg = config_from(&[("KNOWLEDGE_BASE_ID", "KB123"), ("AWS_REGION", "us-east-1")])
            .unwrap();
        assert_eq!(cfg.region, "us-east-1");
    }

    #[test]
    fn model_arn_override() {
        let cfg = config_from(&[
            ("KNOWLEDGE_BASE_ID", "KB123"),
            ("MODEL_ID", "ignored"),
            ("MODEL_ARN", "arn:aws:bedrock:us-east-1::foundation-model/custom"),
        ])
        .unwrap();
        assert_eq!(
            cfg.model_arn(),
            "arn:aws:bedrock:us-east-1::foundation-model/custom"
        );
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = config_from(&[("KNOWLEDGE_BASE_ID", "KB123"), ("TIMEOUT_MS", "soon")])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "TIMEOUT_MS",
                value: "soon".to_string()
            }
        );

        assert!(config_from(&[("KNOWLEDGE_BASE_ID", "KB123"), ("PORT", "70000")]).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = config_from(&[("KNOWLEDGE_BASE_ID", "KB123"), ("TIMEOUT_MS", "0")])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "TIMEOUT_MS",
                value: "0".to_string()
            }
        );
    }

    #[test]
    fn verify_flag_parsing() {
        let cfg = config_from(&[("KNOWLEDGE_BASE_ID", "KB"), ("VERIFY_CALLER_IDENTITY", "off")])
            .unwrap();
        assert!(!cfg.verify_caller_identity);

        assert!(
            config_from(&[("KNOWLEDGE_BASE_ID", "KB"), ("VERIFY_CALLER_IDENTITY", "maybe")])
                .is_err()
        );
    }
}
