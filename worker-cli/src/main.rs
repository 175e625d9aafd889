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

mod args;
mod invoke;
mod serve;
mod settings;

use anyhow::Result;
use clap::{crate_version, Command};

#[tokio::main]
pub async fn main() -> Result<()> {
    let mut app = Command::new("worker-cli")
        .version(crate_version!())
        .about("Command line tool for the document worker")
        .args(args::get_args())
        .subcommand(invoke::command_args())
        .subcommand(serve::command_args())
        .subcommand(settings::command_args());
    let matches = app.get_matches_mut();

    let (name, sub_matches) = match matches.subcommand() {
        Some(subcommand) => subcommand,
        None => {
            app.print_help()?;
            println!();
            return Ok(());
        }
    };

    let config = args::get_config(&matches, sub_matches)?;
    args::get_logging(&matches, sub_matches, &config.log_level).init();

    match name {
        "invoke" => invoke::command(sub_matches, &config).await,
        "serve" => serve::command(sub_matches, &config).await,
        "config" => settings::command(sub_matches, &config),
        _ => unreachable!("clap rejects unknown subcommands"),
    }
}
