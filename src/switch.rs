use crate::api::{DnsApiClient, UpdateOutcome};
use crate::config::Config;
use log::{info, warn};
use serde::Serialize;
use std::{fmt, str::FromStr, sync::Arc};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChoice {
    Main,
    Backup,
}

impl FromStr for LineChoice {
    type Err = SwitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Self::Main),
            "backup" => Ok(Self::Backup),
            _ => Err(SwitchError::InvalidLineChoice),
        }
    }
}

impl fmt::Display for LineChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("main"),
            Self::Backup => f.write_str("backup"),
        }
    }
}

/// Rejections that happen before any provider call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwitchError {
    #[error("Incorrect password.")]
    Unauthorized,

    #[error("Invalid line choice.")]
    InvalidLineChoice,

    #[error("Target IP not defined.")]
    TargetNotConfigured(LineChoice),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatus {
    pub current_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_line_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_line_ip: Option<String>,
}

#[derive(Clone)]
pub struct SwitchService {
    config: Arc<Config>,
    client: Arc<dyn DnsApiClient>,
}

impl SwitchService {
    pub fn new(config: Arc<Config>, client: Arc<dyn DnsApiClient>) -> Self {
        Self { config, client }
    }

    /// Points the configured record at the chosen line's IP.
    ///
    /// The password is checked before the line choice, and neither failure
    /// reaches the provider.
    pub async fn switch(
        &self,
        line_choice: Option<&str>,
        password: Option<&str>,
    ) -> Result<UpdateOutcome, SwitchError> {
        if password != Some(self.config.password.as_str()) {
            warn!("Rejected DNS switch request: incorrect password");
            return Err(SwitchError::Unauthorized);
        }

        let line: LineChoice = line_choice.unwrap_or_default().parse()?;
        let target_ip = self
            .target_ip(line)
            .ok_or(SwitchError::TargetNotConfigured(line))?;

        info!(
            "Switching {} to {} line ({})",
            self.config.record_name, line, target_ip
        );

        Ok(self
            .client
            .update_value(&self.config.record_name, target_ip)
            .await)
    }

    pub async fn status(&self) -> LineStatus {
        let current_ip = self
            .client
            .get_current_value(&self.config.record_name)
            .await
            .ok();

        LineStatus {
            current_ip,
            main_line_ip: self.config.main_line_ip.clone(),
            backup_line_ip: self.config.backup_line_ip.clone(),
        }
    }

    fn target_ip(&self, line: LineChoice) -> Option<&str> {
        match line {
            LineChoice::Main => self.config.main_line_ip.as_deref(),
            LineChoice::Backup => self.config.backup_line_ip.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_choice_parsing() {
        assert_eq!("main".parse::<LineChoice>(), Ok(LineChoice::Main));
        assert_eq!("backup".parse::<LineChoice>(), Ok(LineChoice::Backup));

        for invalid in ["", "Main", "BACKUP", "secondary", " main"] {
            assert_eq!(
                invalid.parse::<LineChoice>(),
                Err(SwitchError::InvalidLineChoice)
            );
        }
    }

    #[test]
    fn test_line_choice_display_round_trips() {
        for line in [LineChoice::Main, LineChoice::Backup] {
            assert_eq!(line.to_string().parse::<LineChoice>(), Ok(line));
        }
    }
}
