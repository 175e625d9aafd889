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

//! The records a worker invocation produces.

use crate::encoding::Encoding;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status reported when an invocation did no work.
pub const NOOP_STATUS: &str = "noop";
/// Message reported by a live worker.
pub const ALIVE_MSG: &str = "worker is alive 🔄";
/// Name of the content type header.
pub const CONTENT_TYPE: &str = "Content-Type";
/// Media type of every response body.
pub const APPLICATION_JSON: &str = "application/json";
/// HTTP status code of a successful invocation.
pub const STATUS_OK: u16 = 200;

/// The outcome of one invocation, carried in the response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkerResult {
    /// What the worker did.
    pub status: String,
    /// A human readable note.
    pub msg:    String,
}

impl WorkerResult {
    /// The no-op outcome: nothing was processed, the worker is alive.
    pub fn noop() -> Self {
        WorkerResult {
            status: NOOP_STATUS.to_owned(),
            msg:    ALIVE_MSG.to_owned(),
        }
    }
}

/// The response envelope in API Gateway proxy-integration form.
///
/// Returned as-is from the cloud function, it is understood both by direct
/// invokers and by the HTTP front door that routes `/worker` calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The HTTP status code.
    pub status_code: u16,
    /// The response headers.
    pub headers:     BTreeMap<String, String>,
    /// The serialized body.
    pub body:        String,
}

impl Response {
    /// Wraps `value` into a JSON response with the given status code.
    pub fn json<T>(status_code: u16, value: &T, encoding: Encoding) -> Result<Response>
    where
        T: ?Sized + Serialize,
    {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_owned(), APPLICATION_JSON.to_owned());
        Ok(Response {
            status_code,
            headers,
            body: encoding.encode(value)?,
        })
    }

    /// Deserializes the body.
    pub fn parse_body<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Returns the value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names() -> Result<()> {
        let response = Response::json(STATUS_OK, &WorkerResult::noop(), Encoding::Spaced)?;
        let value = serde_json::to_value(&response)?;
        assert_eq!(
            json!({
                "statusCode": 200,
                "headers": {"Content-Type": "application/json"},
                "body": "{\"status\": \"noop\", \"msg\": \"worker is alive 🔄\"}"
            }),
            value
        );
        assert_eq!(response, serde_json::from_value::<Response>(value)?);
        Ok(())
    }

    #[test]
    fn header_lookup_ignores_case() -> Result<()> {
        let response = Response::json(404, &json!({"error": "not found"}), Encoding::Spaced)?;
        assert_eq!(Some(APPLICATION_JSON), response.header("content-type"));
        assert_eq!(None, response.header("content-length"));
        assert_eq!(r#"{"error": "not found"}"#, response.body);
        Ok(())
    }
}
