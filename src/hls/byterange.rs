use serde::Serialize;

use crate::{Error, Result};

/// A byte range as written in `#EXT-X-BYTERANGE`, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    pub length: u64,
    pub offset: Option<u64>,
}

impl ByteRange {
    pub fn new(length: u64, offset: Option<u64>) -> Self {
        Self { length, offset }
    }

    /// Parse from "length@offset" or "length" format.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidByteRange(s.to_string());

        let (length, offset) = match s.split_once('@') {
            Some((len, off)) => (
                len.trim().parse().map_err(|_| invalid())?,
                Some(off.trim().parse().map_err(|_| invalid())?),
            ),
            None => (s.parse().map_err(|_| invalid())?, None),
        };

        if length == 0 {
            return Err(invalid());
        }

        Ok(Self { length, offset })
    }

    /// Resolve against the end of the previous range when no offset is given.
    pub fn with_continuation(&self, previous_end: u64) -> Result<ByteSpan> {
        let offset = self.offset.unwrap_or(previous_end);
        offset
            .checked_add(self.length)
            .ok_or_else(|| Error::InvalidByteRange(format!("{}@{}", self.length, offset)))?;
        Ok(ByteSpan {
            offset,
            length: self.length,
        })
    }
}

/// An absolute sub-range of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteSpan {
    pub offset: u64,
    pub length: u64,
}

impl ByteSpan {
    /// Exclusive end offset.
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

/// Running offset used when a range omits `@offset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteRangeCursor {
    next_offset: u64,
}

impl ByteRangeCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    /// Resolve `range` and advance past it.
    pub fn resolve(&mut self, range: &ByteRange) -> Result<ByteSpan> {
        let span = range.with_continuation(self.next_offset)?;
        self.next_offset = span.end();
        Ok(span)
    }
}
