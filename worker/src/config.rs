// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Configuration settings that affect all crates in current system.

use crate::encoding::Encoding;
use crate::error::{Result, WorkerError};
use ini::Ini;
use lazy_static::lazy_static;
use log::debug;
use std::env;

/// Environment variable naming a configuration file that replaces the
/// embedded one.
pub const WORKER_CONF_PATH: &str = "WORKER_CONF_PATH";

lazy_static! {
    /// Global settings.
    pub static ref WORKER_CONF: Ini = Ini::load_from_str(include_str!("./config.toml"))
        .expect("the embedded config.toml is valid INI");
}

/// The typed view over the worker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// The deployed function name.
    pub name:      String,
    /// The HTTP route of manual invocations. Always starts with `/`.
    pub route:     String,
    /// The cron expression of the scheduled trigger.
    pub schedule:  String,
    /// How the response body is rendered.
    pub encoding:  Encoding,
    /// Default log filter.
    pub log_level: String,
    /// Host of the local development server.
    pub host:      String,
    /// Port of the local development server.
    pub port:      u16,
}

impl WorkerConfig {
    /// Loads the settings.
    ///
    /// If `WORKER_CONF_PATH` is set, the file it names is read; keys it does
    /// not define fall back to the embedded defaults.
    pub fn load() -> Result<WorkerConfig> {
        match env::var(WORKER_CONF_PATH) {
            Ok(path) if !path.is_empty() => {
                debug!("Loading worker settings from {}", path);
                WorkerConfig::from_ini(&Ini::load_from_file(&path)?)
            }
            _ => WorkerConfig::from_ini(&WORKER_CONF),
        }
    }

    /// Builds the settings from a parsed INI document.
    pub fn from_ini(conf: &Ini) -> Result<WorkerConfig> {
        let route = lookup(conf, "function", "route")?;
        if !route.starts_with('/') {
            return Err(WorkerError::Config(format!(
                "function.route: `{}` must start with `/`",
                route
            )));
        }

        let encoding = lookup(conf, "response", "encoding")?.parse::<Encoding>()?;

        let port = lookup(conf, "server", "port")?;
        let port = port.parse::<u16>().map_err(|_| {
            WorkerError::Config(format!("server.port: `{}` is not a port", port))
        })?;

        Ok(WorkerConfig {
            name: lookup(conf, "function", "name")?,
            route,
            schedule: lookup(conf, "function", "schedule")?,
            encoding,
            log_level: lookup(conf, "log", "level")?,
            host: lookup(conf, "server", "host")?,
            port,
        })
    }

    /// Returns the address of the local development server.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads `section.key` from `conf`, falling back to the embedded settings.
fn lookup(conf: &Ini, section: &str, key: &str) -> Result<String> {
    conf.get_from(Some(section), key)
        .or_else(|| WORKER_CONF.get_from(Some(section), key))
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| WorkerError::Config(format!("{}.{} is not set", section, key)))
}
