// src/config/validate.rs

use crate::config::model::{ConfigFile, DashboardSection, RawConfigFile, SchedulerSection};
use crate::errors::{DashboardError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DashboardError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.scheduler, raw.dashboard))
    }
}

pub fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_scheduler(&cfg.scheduler)?;
    validate_dashboard(&cfg.dashboard)?;
    Ok(())
}

fn validate_scheduler(section: &SchedulerSection) -> Result<()> {
    // The URL only matters when a real scheduler is used.
    if !section.mock {
        let url = section.url.trim();
        if url.is_empty() {
            return Err(DashboardError::ConfigError(
                "[scheduler].url must not be empty unless mock = true".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DashboardError::ConfigError(format!(
                "[scheduler].url must start with http:// or https:// (got '{url}')"
            )));
        }
    }

    if section.timeout_secs == 0 {
        return Err(DashboardError::ConfigError(
            "[scheduler].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_dashboard(section: &DashboardSection) -> Result<()> {
    if section.max_indent == 0 {
        return Err(DashboardError::ConfigError(
            "[dashboard].max_indent must be >= 1 (got 0)".to_string(),
        ));
    }
    if section.recent_runs == 0 {
        return Err(DashboardError::ConfigError(
            "[dashboard].recent_runs must be >= 1 (got 0)".to_string(),
        ));
    }
    if section.sync_seconds == 0 {
        return Err(DashboardError::ConfigError(
            "[dashboard].sync_seconds must be >= 1 (got 0)".to_string(),
        ));
    }
    if section.stopped_sync_seconds <= section.sync_seconds {
        return Err(DashboardError::ConfigError(format!(
            "[dashboard].stopped_sync_seconds ({}) must be greater than sync_seconds ({})",
            section.stopped_sync_seconds, section.sync_seconds
        )));
    }
    Ok(())
}
