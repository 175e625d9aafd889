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

//! The main entry point for the worker function.
//!
//! It runs on every cron hit and on every manual `/worker` HTTP call. Pulling
//! pending document jobs is not implemented yet: each invocation answers with
//! the no-op acknowledgment.

use lambda_runtime::{service_fn, LambdaEvent};
use log::info;
use serde_json::Value;
use worker::prelude::*;

#[cfg(feature = "snmalloc")]
#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

async fn handler(worker: &Worker, event: LambdaEvent<Value>) -> Result<Value> {
    info!(
        "Request {} triggered by {}",
        event.context.request_id,
        Trigger::classify(&event.payload)
    );
    let response = worker.invoke(&event.payload).await;
    Ok(serde_json::to_value(&response)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = WorkerConfig::load()?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    info!(
        "Function {} (schedule `{}`, route {}) on {}",
        config.name,
        config.schedule,
        config.route,
        std::env::consts::ARCH
    );

    let worker = Worker::try_new(&config)?;
    let worker = &worker;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(worker, event).await
    }))
    .await?;
    Ok(())
}
