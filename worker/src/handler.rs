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

//! The request handler of the worker function.

use crate::config::WorkerConfig;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::response::{Response, WorkerResult, STATUS_OK};
use log::debug;

/// Answers every invocation with the no-op acknowledgment.
///
/// The response is rendered once when the worker is built; invocations only
/// hand out copies of it, so a `Worker` can be shared between any number of
/// concurrent invocations without synchronization.
#[derive(Debug, Clone)]
pub struct Worker {
    response: Response,
}

impl Worker {
    /// Creates a worker from the settings.
    pub fn try_new(config: &WorkerConfig) -> Result<Worker> {
        Worker::with_encoding(config.encoding)
    }

    /// Creates a worker that renders its body with `encoding`.
    pub fn with_encoding(encoding: Encoding) -> Result<Worker> {
        let response = Response::json(STATUS_OK, &WorkerResult::noop(), encoding)?;
        debug!("Worker response body: {}", response.body);
        Ok(Worker { response })
    }

    /// Handles one invocation.
    ///
    /// The invocation context is accepted whatever its shape and never read.
    pub fn handle<T: ?Sized>(&self, _event: &T) -> Response {
        self.response.clone()
    }

    /// Handles one invocation from an async runtime.
    pub async fn invoke<T: ?Sized + Sync>(&self, event: &T) -> Response {
        self.handle(event)
    }

    /// The response every invocation receives.
    pub fn response(&self) -> &Response {
        &self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{ALIVE_MSG, APPLICATION_JSON, CONTENT_TYPE, NOOP_STATUS};
    use serde_json::json;

    #[test]
    fn default_body_is_spaced_utf8() -> Result<()> {
        let worker = Worker::with_encoding(Encoding::default())?;
        let response = worker.handle(&());
        assert_eq!(
            "{\"status\": \"noop\", \"msg\": \"worker is alive 🔄\"}",
            response.body
        );
        assert_eq!(200, response.status_code);
        assert_eq!(1, response.headers.len());
        assert_eq!(
            Some(&APPLICATION_JSON.to_owned()),
            response.headers.get(CONTENT_TYPE)
        );
        Ok(())
    }

    #[test]
    fn ascii_body() -> Result<()> {
        let worker = Worker::with_encoding(Encoding::SpacedAscii)?;
        assert_eq!(
            r#"{"status": "noop", "msg": "worker is alive \ud83d\udd04"}"#,
            worker.response().body
        );
        let result: WorkerResult = worker.response().parse_body()?;
        assert_eq!(NOOP_STATUS, result.status);
        assert_eq!(ALIVE_MSG, result.msg);
        Ok(())
    }

    #[test]
    fn input_is_ignored() -> Result<()> {
        let worker = Worker::with_encoding(Encoding::Spaced)?;
        let expected = worker.response().clone();
        assert_eq!(expected, worker.handle(&json!(null)));
        assert_eq!(expected, worker.handle(&json!({"job_id": 7})));
        assert_eq!(expected, worker.handle("not even json {"));
        assert_eq!(expected, worker.handle(&[0u8; 0][..]));
        Ok(())
    }

    #[tokio::test]
    async fn invoke_matches_handle() -> Result<()> {
        let worker = Worker::with_encoding(Encoding::SpacedAscii)?;
        assert_eq!(worker.handle(&json!([])), worker.invoke(&json!([])).await);
        Ok(())
    }
}
