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

//! Worker error types

use std::error;
use std::fmt::{Display, Formatter};
use std::io;
use std::result;

/// Result type for operations that could result in a [WorkerError]
pub type Result<T> = result::Result<T, WorkerError>;

/// Worker error
///
/// Handling an invocation never fails. These errors can only surface while
/// the worker is being set up: reading its configuration, rendering the fixed
/// response once, or registering with the function runtime.
#[derive(Debug)]
pub enum WorkerError {
    /// Error associated to Lambda runtime execution.
    LambdaError(Box<dyn std::error::Error + Send + Sync>),
    /// Error associated to I/O operations and associated traits.
    IoError(io::Error),
    /// Error returned when serde_json failed to serialize or deserialize data.
    SerdeJson(serde_json::Error),
    /// Error returned when a configuration file is not valid INI.
    Ini(String),
    /// Error returned when a configuration value is missing or out of range.
    Config(String),
    /// Error returned as a consequence of an error in the worker.
    /// This error should not happen in normal usage.
    Internal(String),
}

impl From<io::Error> for WorkerError {
    fn from(e: io::Error) -> Self {
        WorkerError::IoError(e)
    }
}

impl From<serde_json::Error> for WorkerError {
    fn from(e: serde_json::Error) -> Self {
        WorkerError::SerdeJson(e)
    }
}

impl From<ini::ParseError> for WorkerError {
    fn from(e: ini::ParseError) -> Self {
        WorkerError::Ini(e.to_string())
    }
}

impl From<ini::Error> for WorkerError {
    fn from(e: ini::Error) -> Self {
        match e {
            ini::Error::Io(e) => WorkerError::IoError(e),
            ini::Error::Parse(e) => WorkerError::Ini(e.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for WorkerError {
    fn from(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
        WorkerError::LambdaError(e)
    }
}

impl Display for WorkerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            WorkerError::LambdaError(ref desc) => write!(f, "Lambda error: {}", desc),
            WorkerError::IoError(ref desc) => write!(f, "IO error: {}", desc),
            WorkerError::SerdeJson(ref desc) => write!(f, "serde_json error: {:?}", desc),
            WorkerError::Ini(ref desc) => write!(f, "INI error: {}", desc),
            WorkerError::Config(ref desc) => write!(f, "Configuration error: {}", desc),
            WorkerError::Internal(ref desc) => write!(
                f,
                "Internal error: {}. This was likely caused by a bug in the worker's \
                    code and we would welcome that you file a bug report",
                desc
            ),
        }
    }
}

impl error::Error for WorkerError {}
