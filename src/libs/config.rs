//! Application configuration stored as `config.json` in the data directory.
//!
//! Every section is optional in the file; missing sections fall back to
//! their defaults, so an empty `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "user": { "id": "alice", "name": "Alice" },
//!   "recurrence": { "month_overflow": "clamp" },
//!   "archive": { "older_than_days": 90 },
//!   "dashboard": { "week_start": "monday", "urgent_limit": 5, "upcoming_meetings": 5, "recent_activity": 10 }
//! }
//! ```
//!
//! `ws init` walks through the sections interactively with `dialoguer`.

use super::data_storage::DataStorage;
use super::recurrence::MonthOverflow;
use super::session::{Session, USER_ENV};
use super::stats::WeekStart;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: &'static str,
    pub name: &'static str,
}

const MODULES: [ConfigModule; 4] = [
    ConfigModule { key: "user", name: "User" },
    ConfigModule {
        key: "recurrence",
        name: "Recurring tasks",
    },
    ConfigModule { key: "archive", name: "Archive" },
    ConfigModule {
        key: "dashboard",
        name: "Dashboard",
    },
];

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UserConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct RecurrenceConfig {
    #[serde(default)]
    pub month_overflow: MonthOverflow,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Age in days after which done todos, journals and meetings are auto-archived.
    pub older_than_days: u32,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        ArchiveConfig { older_than_days: 90 }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub week_start: WeekStart,
    pub urgent_limit: usize,
    pub upcoming_meetings: usize,
    pub recent_activity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            week_start: WeekStart::Monday,
            urgent_limit: 5,
            upcoming_meetings: 5,
            recent_activity: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserConfig>,

    #[serde(default)]
    pub recurrence: RecurrenceConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Resolves the acting user: explicit override, then `WORKSUITE_USER`, then the config file.
    pub fn session(&self, user_override: Option<&str>) -> Result<Session> {
        let from_env = env::var(USER_ENV).ok().filter(|id| !id.trim().is_empty());
        let from_config = self.user.as_ref().map(|user| user.id.clone()).filter(|id| !id.trim().is_empty());

        match user_override.map(str::to_string).or(from_env).or(from_config) {
            Some(user_id) => Session::new(user_id),
            None => bail!(Message::NoUserConfigured.to_string()),
        }
    }

    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        let selected = MultiSelect::with_theme(&theme)
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&MODULES.iter().map(|module| module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match MODULES[selection].key {
                "user" => {
                    let default = config.user.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleUser);
                    let id: String = Input::with_theme(&theme)
                        .with_prompt(Message::PromptUserId.to_string())
                        .default(default.id)
                        .interact_text()?;
                    let name: String = Input::with_theme(&theme)
                        .with_prompt(Message::PromptUserName.to_string())
                        .default(default.name.unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    config.user = Some(UserConfig {
                        id: id.trim().to_string(),
                        name: Some(name.trim().to_string()).filter(|n| !n.is_empty()),
                    });
                }
                "recurrence" => {
                    msg_print!(Message::ConfigModuleRecurrence);
                    let current = match config.recurrence.month_overflow {
                        MonthOverflow::Clamp => 0,
                        MonthOverflow::Rollover => 1,
                    };
                    let choice = Select::with_theme(&theme)
                        .with_prompt(Message::PromptMonthOverflow.to_string())
                        .items(&["clamp (Jan 31 + 1 month = end of February)", "rollover (Jan 31 + 1 month = early March)"])
                        .default(current)
                        .interact()?;
                    config.recurrence.month_overflow = if choice == 1 { MonthOverflow::Rollover } else { MonthOverflow::Clamp };
                }
                "archive" => {
                    msg_print!(Message::ConfigModuleArchive);
                    config.archive.older_than_days = Input::with_theme(&theme)
                        .with_prompt(Message::PromptArchiveDays.to_string())
                        .default(config.archive.older_than_days)
                        .interact_text()?;
                }
                "dashboard" => {
                    msg_print!(Message::ConfigModuleDashboard);
                    let current = match config.dashboard.week_start {
                        WeekStart::Monday => 0,
                        WeekStart::Sunday => 1,
                    };
                    let choice = Select::with_theme(&theme)
                        .with_prompt(Message::PromptWeekStart.to_string())
                        .items(&["Monday", "Sunday"])
                        .default(current)
                        .interact()?;
                    config.dashboard.week_start = if choice == 1 { WeekStart::Sunday } else { WeekStart::Monday };
                    config.dashboard.urgent_limit = Input::with_theme(&theme)
                        .with_prompt(Message::PromptUrgentLimit.to_string())
                        .default(config.dashboard.urgent_limit)
                        .interact_text()?;
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
