//! Minimal Java `ObjectOutputStream`.
//!
//! Writes the stream header on creation and keeps the handle bookkeeping a
//! JVM reader expects: every class descriptor, object and string takes a
//! handle, and a class written once is afterwards referenced by handle.

use super::wire::{
    BASE_WIRE_HANDLE, STREAM_MAGIC, STREAM_VERSION, TC_LONGSTRING, TC_NULL, TC_OBJECT,
    TC_REFERENCE, TC_STRING,
};
use super::ObjectWriter;
use bytes::buf::Writer;
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::HashMap;
use std::io::{self, Write};
use tracing::debug;

/// Java object stream over any [`Write`] sink
#[derive(Debug)]
pub struct ObjectOutputStream<W: Write> {
    inner: W,
    /// Handle of each class descriptor written so far
    class_descriptions: HashMap<String, u32>,
    /// Next handle to assign
    object_handle: u32,
}

impl ObjectOutputStream<Writer<BytesMut>> {
    /// Creates a stream that collects its output in memory
    pub fn in_memory() -> io::Result<Self> {
        Self::new(BytesMut::with_capacity(256).writer())
    }

    /// Consumes the stream and returns everything written to it
    pub fn into_bytes(self) -> Bytes {
        self.inner.into_inner().freeze()
    }
}

impl<W: Write> ObjectOutputStream<W> {
    /// Creates a stream and writes the stream header to `inner`
    pub fn new(mut inner: W) -> io::Result<Self> {
        inner.write_all(&STREAM_MAGIC.to_be_bytes())?;
        inner.write_all(&STREAM_VERSION.to_be_bytes())?;

        Ok(Self {
            inner,
            class_descriptions: HashMap::new(),
            object_handle: BASE_WIRE_HANDLE,
        })
    }

    /// Handle that the next object, string or descriptor will receive
    pub fn next_handle(&self) -> u32 {
        self.object_handle
    }

    /// Flushes the underlying sink
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Returns a reference to the underlying sink
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consumes the stream and returns the underlying sink
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ObjectWriter for ObjectOutputStream<W> {
    fn write_null(&mut self) -> io::Result<()> {
        self.inner.write_all(&[TC_NULL])
    }

    fn write_prolog(
        &mut self,
        class_name: &str,
        class_desc_increment: u32,
        class_desc: &[u8],
    ) -> io::Result<()> {
        if let Some(&handle) = self.class_descriptions.get(class_name) {
            let mut header = [0u8; 6];
            header[0] = TC_OBJECT;
            header[1] = TC_REFERENCE;
            header[2..].copy_from_slice(&handle.to_be_bytes());
            self.inner.write_all(&header)?;
            self.object_handle += 1;
            return Ok(());
        }

        self.inner.write_all(&[TC_OBJECT])?;
        self.inner.write_all(class_desc)?;

        debug!(
            "Registered class descriptor {} at handle {:#x}",
            class_name, self.object_handle
        );
        self.class_descriptions
            .insert(class_name.to_string(), self.object_handle);
        self.object_handle += class_desc_increment + 1;
        Ok(())
    }

    fn write_utf_string(&mut self, value: &str) -> io::Result<()> {
        let bytes = value.as_bytes();

        match u16::try_from(bytes.len()) {
            Ok(len) => {
                self.inner.write_all(&[TC_STRING])?;
                self.inner.write_all(&len.to_be_bytes())?;
            }
            Err(_) => {
                self.inner.write_all(&[TC_LONGSTRING])?;
                self.inner.write_all(&(bytes.len() as u64).to_be_bytes())?;
            }
        }

        self.inner.write_all(bytes)?;
        self.object_handle += 1;
        Ok(())
    }
}
