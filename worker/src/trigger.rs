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

//! Names the kind of event that woke the worker up. The result is only
//! logged; the response never depends on it.

use aws_lambda_events::event::cloudwatch_events::CloudWatchEvent;
use serde_json::Value;
use std::fmt;

/// The `source` of events emitted by scheduled EventBridge rules.
pub const SCHEDULE_SOURCE: &str = "aws.events";

/// The kind of an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A scheduled rule fired.
    Schedule {
        /// The rule name, taken from the rule ARN.
        rule: Option<String>,
        /// The scheduled time (RFC 3339).
        time: String,
    },
    /// An HTTP request was routed to the function.
    Http {
        /// The request method.
        method: String,
        /// The request path.
        path:   String,
    },
    /// Anything else: a direct invocation with an arbitrary payload.
    Direct,
}

impl Trigger {
    /// Classifies an invocation payload. Never fails: unknown shapes are
    /// [`Trigger::Direct`].
    pub fn classify(event: &Value) -> Trigger {
        if event.get("source").and_then(Value::as_str) == Some(SCHEDULE_SOURCE) {
            if let Ok(e) = serde_json::from_value::<CloudWatchEvent>(event.clone()) {
                return Trigger::Schedule {
                    rule: e.resources.first().map(|arn| rule_name(arn).to_owned()),
                    time: e.time.to_rfc3339(),
                };
            }
        }

        // API Gateway REST proxy events.
        if let Some(method) = event.get("httpMethod").and_then(Value::as_str) {
            return Trigger::Http {
                method: method.to_owned(),
                path:   string_at(event, "/path"),
            };
        }

        // API Gateway HTTP API (payload format 2.0) and function URL events.
        if let Some(method) = event
            .pointer("/requestContext/http/method")
            .and_then(Value::as_str)
        {
            let path = match event.get("rawPath").and_then(Value::as_str) {
                Some(path) => path.to_owned(),
                None => string_at(event, "/requestContext/http/path"),
            };
            return Trigger::Http {
                method: method.to_owned(),
                path,
            };
        }

        Trigger::Direct
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Schedule {
                rule: Some(rule),
                time,
            } => write!(f, "schedule (rule {} at {})", rule, time),
            Trigger::Schedule { rule: None, time } => write!(f, "schedule (at {})", time),
            Trigger::Http { method, path } => write!(f, "http {} {}", method, path),
            Trigger::Direct => write!(f, "direct invocation"),
        }
    }
}

/// `arn:aws:events:us-east-1:123456789012:rule/doc-worker` -> `doc-worker`
fn rule_name(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

fn string_at(event: &Value, pointer: &str) -> String {
    event
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or("/")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scheduled_rule() {
        let event = json!({
            "version": "0",
            "id": "53dc4d37-cffa-4f76-80c9-8b7d4a4d2eaa",
            "detail-type": "Scheduled Event",
            "source": "aws.events",
            "account": "123456789012",
            "time": "2026-10-19T12:05:00Z",
            "region": "us-east-1",
            "resources": ["arn:aws:events:us-east-1:123456789012:rule/doc-worker"],
            "detail": {}
        });
        let trigger = Trigger::classify(&event);
        assert_eq!(
            Trigger::Schedule {
                rule: Some("doc-worker".to_owned()),
                time: "2026-10-19T12:05:00+00:00".to_owned(),
            },
            trigger
        );
        assert_eq!(
            "schedule (rule doc-worker at 2026-10-19T12:05:00+00:00)",
            trigger.to_string()
        );
    }

    #[test]
    fn rest_proxy_request() {
        let event = json!({
            "resource": "/worker",
            "path": "/worker",
            "httpMethod": "POST",
            "headers": {"Content-Type": "application/json"},
            "body": "{\"job\": 1}",
            "isBase64Encoded": false
        });
        assert_eq!("http POST /worker", Trigger::classify(&event).to_string());
    }

    #[test]
    fn http_api_request() {
        let event = json!({
            "version": "2.0",
            "routeKey": "GET /worker",
            "rawPath": "/worker",
            "requestContext": {"http": {"method": "GET", "path": "/worker"}}
        });
        assert_eq!(
            Trigger::Http {
                method: "GET".to_owned(),
                path:   "/worker".to_owned(),
            },
            Trigger::classify(&event)
        );
    }

    #[test]
    fn everything_else_is_direct() {
        for event in [
            json!(null),
            json!("ping"),
            json!(42),
            json!([1, 2, 3]),
            json!({}),
            json!({"source": "aws.events", "time": "yesterday"}),
            json!({"httpMethod": 7}),
        ] {
            assert_eq!(Trigger::Direct, Trigger::classify(&event), "{}", event);
        }
    }
}
