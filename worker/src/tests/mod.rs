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

//! Common unit test utility methods


use fake::{Dummy, Fake, Faker};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The exact body clients of the worker receive.
pub(crate) const ALIVE_BODY: &str = "{\"status\": \"noop\", \"msg\": \"worker is alive 🔄\"}";

/// A payload a caller could attach to a manual `/worker` call.
#[derive(Dummy, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct JobRequest {
    #[dummy(faker = "1..100000")]
    pub document_id: i64,
    #[dummy(faker = "0..10")]
    pub priority:    i32,
    pub note:        String,
    pub tags:        Vec<String>,
}

/// Returns a mix of well-formed, odd and random invocation payloads.
pub(crate) fn arbitrary_events(random: usize) -> Vec<Value> {
    let mut events = vec![
        Value::Null,
        json!(""),
        json!("{ not json"),
        json!(0),
        json!(-1.5),
        json!(true),
        json!([]),
        json!({}),
        json!({"statusCode": 500, "body": "overwrite me"}),
        json!({"source": "aws.events", "detail-type": "Scheduled Event"}),
    ];
    events.extend((0..random).map(|_| {
        serde_json::to_value(Faker.fake::<JobRequest>()).unwrap_or(Value::Null)
    }));
    events
}

/// A scheduled rule event as delivered by EventBridge.
pub(crate) fn schedule_event() -> Value {
    json!({
        "version": "0",
        "id": "cdc73f9d-aea9-11e3-9d5a-835b769c0d9c",
        "detail-type": "Scheduled Event",
        "source": "aws.events",
        "account": "123456789012",
        "time": "2026-10-19T00:00:00Z",
        "region": "us-east-1",
        "resources": ["arn:aws:events:us-east-1:123456789012:rule/doc-worker"],
        "detail": {}
    })
}
