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

//! A "prelude" for users of the worker crate.
//!
//! ```
//! use worker::prelude::*;
//! ```

pub use crate::config::{WorkerConfig, WORKER_CONF, WORKER_CONF_PATH};
pub use crate::encoding::Encoding;
pub use crate::error::{Result, WorkerError};
pub use crate::handler::Worker;
pub use crate::response::{Response, WorkerResult};
pub use crate::trigger::Trigger;
