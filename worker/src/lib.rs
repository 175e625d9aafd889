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

#![warn(missing_docs, clippy::needless_borrow)]

//! `worker` is the library behind the document worker cloud function. Every
//! cron hit or manual `/worker` call receives the same no-op acknowledgment,
//! whatever the invocation context carries.

pub mod config;
pub mod encoding;
pub mod error;
pub mod handler;
pub mod prelude;
pub mod response;
pub mod trigger;

#[cfg(test)]
mod tests;
