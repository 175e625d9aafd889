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

use anyhow::Result;
use clap::{ArgMatches, Command};
use worker::prelude::*;

pub fn command(_matches: &ArgMatches, config: &WorkerConfig) -> Result<()> {
    println!("{}", render(config));
    Ok(())
}

pub fn command_args() -> Command<'static> {
    Command::new("config").about("Prints the effective worker settings")
}

fn render(config: &WorkerConfig) -> String {
    [
        "[function]".to_owned(),
        format!("name = {}", config.name),
        format!("route = {}", config.route),
        format!("schedule = {}", config.schedule),
        String::new(),
        "[response]".to_owned(),
        format!("encoding = {}", config.encoding),
        String::new(),
        "[log]".to_owned(),
        format!("level = {}", config.log_level),
        String::new(),
        "[server]".to_owned(),
        format!("host = {}", config.host),
        format!("port = {}", config.port),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ini::Ini;

    #[test]
    fn rendered_settings_read_back() -> Result<()> {
        let config = WorkerConfig::from_ini(&WORKER_CONF)?;
        let rendered = render(&config);
        assert!(rendered.contains("schedule = */5 * * * *"));
        assert_eq!(config, WorkerConfig::from_ini(&Ini::load_from_str(&rendered)?)?);
        Ok(())
    }
}
