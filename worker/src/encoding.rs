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

//! `Encoding` controls the text form of the response body.
//!
//! Clients of the worker have always received bodies such as
//! `{"status": "noop", "msg": "..."}`, with a space after every `:` and `,`.
//! serde_json only knows the compact and the pretty form, so the spaced form
//! is produced by a custom [`Formatter`]. No encoding drops the spaces.

use crate::error::{Result, WorkerError};
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, Serializer};
use std::fmt;
use std::io;
use std::str::FromStr;

/// A body encoding.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum Encoding {
    /// `{"status": "noop"}`: one space after each `:` and `,`; non-ASCII
    /// characters are written as UTF-8.
    Spaced,
    /// Like [`Encoding::Spaced`], but every non-ASCII character is escaped as
    /// `\uXXXX`, using a surrogate pair outside the Basic Multilingual Plane.
    SpacedAscii,
}

impl Default for Encoding {
    fn default() -> Encoding {
        Encoding::Spaced
    }
}

impl FromStr for Encoding {
    type Err = WorkerError;

    fn from_str(s: &str) -> Result<Encoding> {
        match s.to_ascii_lowercase().as_str() {
            "spaced" => Ok(Encoding::Spaced),
            "ascii" | "spaced_ascii" => Ok(Encoding::SpacedAscii),
            _ => Err(WorkerError::Config(format!(
                "response.encoding: unknown encoding `{}` (expected spaced or ascii)",
                s
            ))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Spaced => write!(f, "spaced"),
            Encoding::SpacedAscii => write!(f, "ascii"),
        }
    }
}

impl Encoding {
    /// Serializes `value` into a JSON string.
    pub fn encode<T>(&self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        let mut writer = Vec::with_capacity(128);
        let formatter = SpacedFormatter {
            ascii: *self == Encoding::SpacedAscii,
        };
        let mut ser = Serializer::with_formatter(&mut writer, formatter);
        value.serialize(&mut ser)?;
        String::from_utf8(writer).map_err(|e| WorkerError::Internal(e.to_string()))
    }
}

/// Writes `", "` between members and `": "` between keys and values.
struct SpacedFormatter {
    ascii: bool,
}

impl Formatter for SpacedFormatter {
    #[inline]
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    #[inline]
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    #[inline]
    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.ascii || fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
