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

//! Invokes the worker handler on the local machine.

use anyhow::{bail, ensure, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Arg, ArgMatches, Command};
use log::{info, warn};
use serde_json::{json, Value};
use std::sync::Arc;
use worker::prelude::*;

pub async fn command(matches: &ArgMatches, config: &WorkerConfig) -> Result<()> {
    let payload = match (
        matches.value_of("payload"),
        matches.value_of("payload file"),
    ) {
        (Some(text), _) => Some(text.to_owned()),
        (None, Some(path)) => Some(std::fs::read_to_string(path)?),
        (None, None) => None,
    };
    let event = build_event(
        matches.value_of("trigger").unwrap_or("direct"),
        payload.as_deref(),
        config,
    )?;

    let repeat = matches.value_of("repeat").unwrap_or("1").parse::<usize>()?;
    ensure!(repeat > 0, "--repeat must be at least 1");

    info!(
        "Invoking {} {} time(s), triggered by {}",
        config.name,
        repeat,
        Trigger::classify(&event)
    );

    let worker = Arc::new(Worker::try_new(config)?);
    let responses = invoke_concurrently(worker, event, repeat).await?;
    let first = &responses[0];
    if let Some(i) = responses.iter().position(|r| r != first) {
        bail!(
            "invocation #{} answered differently: {:?} != {:?}",
            i,
            responses[i],
            first
        );
    }
    if repeat > 1 {
        info!("All {} responses are identical", repeat);
    }

    println!("{}", serde_json::to_string_pretty(first)?);
    Ok(())
}

pub fn command_args() -> Command<'static> {
    Command::new("invoke")
        .about("Invokes the worker handler locally")
        .arg(
            Arg::new("trigger")
                .short('t')
                .long("trigger")
                .possible_values(["schedule", "http", "direct"])
                .default_value("direct")
                .help("Synthesizes an event of this kind when no payload is given")
                .takes_value(true),
        )
        .arg(
            Arg::new("payload")
                .short('p')
                .long("payload")
                .value_name("JSON")
                .help("Invokes the handler with this event")
                .conflicts_with("payload file")
                .takes_value(true),
        )
        .arg(
            Arg::new("payload file")
                .short('f')
                .long("payload-file")
                .value_name("FILE")
                .help("Invokes the handler with the event stored in this file")
                .takes_value(true),
        )
        .arg(
            Arg::new("repeat")
                .short('n')
                .long("repeat")
                .value_name("N")
                .default_value("1")
                .help("Number of concurrent invocations")
                .takes_value(true),
        )
}

/// Builds the invocation event.
///
/// A payload that is not JSON is still delivered, as a JSON string: the
/// worker accepts malformed input.
pub fn build_event(trigger: &str, payload: Option<&str>, config: &WorkerConfig) -> Result<Value> {
    if let Some(text) = payload {
        return Ok(serde_json::from_str(text).unwrap_or_else(|e| {
            warn!("The payload is not JSON ({}), sending it as a string", e);
            Value::String(text.to_owned())
        }));
    }

    match trigger {
        "schedule" => Ok(json!({
            "version": "0",
            "id": format!("worker-cli-{}", Utc::now().timestamp_millis()),
            "detail-type": "Scheduled Event",
            "source": "aws.events",
            "account": "000000000000",
            "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            "region": "local",
            "resources": [format!("arn:aws:events:local:000000000000:rule/{}", config.name)],
            "detail": {}
        })),
        "http" => Ok(json!({
            "resource": config.route,
            "path": config.route,
            "httpMethod": "GET",
            "headers": {"User-Agent": "worker-cli"},
            "queryStringParameters": null,
            "body": null,
            "isBase64Encoded": false
        })),
        "direct" => Ok(Value::Null),
        other => bail!("unknown trigger `{}`", other),
    }
}

/// Invokes the handler `repeat` times on concurrent tasks.
pub async fn invoke_concurrently(
    worker: Arc<Worker>,
    event: Value,
    repeat: usize,
) -> Result<Vec<Response>> {
    let event = Arc::new(event);
    let tasks = (0..repeat)
        .map(|_| {
            let worker = worker.clone();
            let event = event.clone();
            tokio::spawn(async move { worker.invoke(&*event).await })
        })
        .collect::<Vec<_>>();

    futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.map_err(anyhow::Error::from))
        .collect()
}
