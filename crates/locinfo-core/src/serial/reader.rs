//! Reading serialized location records back.
//!
//! Understands exactly what [`ObjectOutputStream`](super::ObjectOutputStream)
//! and [`LocationSerializer`](super::LocationSerializer) produce: a stream
//! header followed by any number of null references or `LocationInfo`
//! objects, each carrying a single `fullInfo` string.

use super::wire::{
    BASE_WIRE_HANDLE, LOCATION_INFO_CLASS_DESC_INCREMENT, LOCATION_INFO_PROLOG, STREAM_MAGIC,
    STREAM_VERSION, TC_CLASSDESC, TC_LONGSTRING, TC_NULL, TC_OBJECT, TC_REFERENCE, TC_STRING,
};
use crate::error::{Error, Result};
use bytes::Buf;
use std::collections::HashSet;
use std::path::Path;
use tracing::trace;

/// A single record read from a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A null reference (location unavailable)
    Null,
    /// A `LocationInfo` object with its `fullInfo` string
    FullInfo(String),
}

/// Sequential reader of serialized locations
#[derive(Debug)]
pub struct LocationReader<'a> {
    data: &'a [u8],
    /// Total input length, for offsets
    len: usize,
    /// Handles of `LocationInfo` class descriptors seen so far
    class_handles: HashSet<u32>,
    /// Next handle a JVM would assign
    object_handle: u32,
}

impl<'a> LocationReader<'a> {
    /// Creates a reader and validates the stream header
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut reader = Self {
            data,
            len: data.len(),
            class_handles: HashSet::new(),
            object_handle: BASE_WIRE_HANDLE,
        };

        reader.ensure(4)?;
        let magic = reader.data.get_u16();
        let version = reader.data.get_u16();
        if magic != STREAM_MAGIC || version != STREAM_VERSION {
            return Err(Error::invalid_stream(
                0,
                format!("bad stream header {:#06x} {:#06x}", magic, version),
            ));
        }

        Ok(reader)
    }

    /// Current byte offset into the input
    pub fn offset(&self) -> usize {
        self.len - self.data.remaining()
    }

    /// Reads the next record, `None` once the input is exhausted
    pub fn next_location(&mut self) -> Result<Option<Record>> {
        if !self.data.has_remaining() {
            return Ok(None);
        }

        let offset = self.offset();
        match self.data.get_u8() {
            TC_NULL => {
                trace!("null location at offset {}", offset);
                Ok(Some(Record::Null))
            }
            TC_OBJECT => {
                self.read_class_desc()?;
                let full_info = self.read_string()?;
                trace!("location {:?} at offset {}", full_info, offset);
                Ok(Some(Record::FullInfo(full_info)))
            }
            other => Err(Error::invalid_stream(
                offset,
                format!("unexpected type code {:#04x}", other),
            )),
        }
    }

    /// Reads all remaining records
    pub fn read_all(mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.next_location()? {
            records.push(record);
        }
        Ok(records)
    }

    fn read_class_desc(&mut self) -> Result<()> {
        let offset = self.offset();
        self.ensure(1)?;

        match self.data[0] {
            TC_CLASSDESC => {
                self.ensure(LOCATION_INFO_PROLOG.len())?;
                if self.data[..LOCATION_INFO_PROLOG.len()] != LOCATION_INFO_PROLOG {
                    return Err(Error::invalid_stream(
                        offset,
                        "class descriptor is not org.apache.log4j.spi.LocationInfo",
                    ));
                }
                self.data.advance(LOCATION_INFO_PROLOG.len());
                self.class_handles.insert(self.object_handle);
                self.object_handle += LOCATION_INFO_CLASS_DESC_INCREMENT + 1;
            }
            TC_REFERENCE => {
                self.ensure(5)?;
                self.data.advance(1);
                let handle = self.data.get_u32();
                if !self.class_handles.contains(&handle) {
                    return Err(Error::UnknownHandle { handle, offset });
                }
                self.object_handle += 1;
            }
            other => {
                return Err(Error::invalid_stream(
                    offset,
                    format!("expected class descriptor, found type code {:#04x}", other),
                ));
            }
        }

        Ok(())
    }

    fn read_string(&mut self) -> Result<String> {
        let offset = self.offset();
        self.ensure(1)?;

        let len = match self.data.get_u8() {
            TC_STRING => {
                self.ensure(2)?;
                self.data.get_u16() as usize
            }
            TC_LONGSTRING => {
                self.ensure(8)?;
                let len = self.data.get_u64();
                usize::try_from(len).map_err(|_| {
                    Error::invalid_stream(offset, format!("string length {} too large", len))
                })?
            }
            other => {
                return Err(Error::invalid_stream(
                    offset,
                    format!("expected string, found type code {:#04x}", other),
                ));
            }
        };

        self.ensure(len)?;
        let payload_offset = self.offset();
        let payload = self.data[..len].to_vec();
        self.data.advance(len);
        self.object_handle += 1;

        String::from_utf8(payload).map_err(|source| Error::Utf8 {
            offset: payload_offset,
            source,
        })
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.data.remaining();
        if remaining < needed {
            return Err(Error::unexpected_eof(self.offset(), needed - remaining));
        }
        Ok(())
    }
}

/// Reads every record of a stream file
///
/// This is a convenience function that reads the file and decodes it.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
    LocationReader::new(&data)?.read_all()
}
