//! log4j-compatible serialization of location records.
//!
//! Java tooling identifies a call site by a single `fullInfo` string of the
//! form `Qualified.Class.method(File.ext:line)`. [`LocationSerializer`]
//! rebuilds that string from a compiler-provided signature and writes it as
//! an `org.apache.log4j.spi.LocationInfo` object through an [`ObjectWriter`].
//!
//! ## Example
//!
//! ```
//! use locinfo_core::{LocationInfo, LocationSerializer, ObjectOutputStream};
//!
//! let mut stream = ObjectOutputStream::in_memory()?;
//! let location = LocationInfo::new("Foo.cpp", "void ns::Bar::baz(int)", 42);
//! LocationSerializer::new().write(&location, &mut stream)?;
//! LocationSerializer::new().write(LocationInfo::unavailable(), &mut stream)?;
//!
//! let bytes = stream.into_bytes();
//! assert_eq!(bytes[..2], [0xAC, 0xED]);
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod reader;
pub mod stream;
pub mod wire;

use crate::location::signature::{self, SCOPE_SEPARATOR};
use crate::location::{LocationInfo, NA_LINE};
use std::fmt::Write as FmtWrite;
use std::io;
use tracing::trace;

pub use reader::{read_file, LocationReader, Record};
pub use stream::ObjectOutputStream;

/// Byte-stream operations needed to serialize a location.
///
/// [`ObjectOutputStream`] is the stock implementation; implement this trait
/// to route records into an existing Java object stream.
pub trait ObjectWriter {
    /// Write a null reference
    fn write_null(&mut self) -> io::Result<()>;

    /// Write a new object of class `class_name`.
    ///
    /// `class_desc` is the complete class descriptor, starting with
    /// `TC_CLASSDESC`. `class_desc_increment` is the number of handles the
    /// descriptor consumes besides its own.
    fn write_prolog(
        &mut self,
        class_name: &str,
        class_desc_increment: u32,
        class_desc: &[u8],
    ) -> io::Result<()>;

    /// Write a length-prefixed string
    fn write_utf_string(&mut self, value: &str) -> io::Result<()>;
}

/// How the `fullInfo` string is derived from a signature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FullInfoStyle {
    /// Dot-qualified class and bare method name:
    /// `void ns::Bar::baz(int)` becomes `ns.Bar.baz(Foo.cpp:42)`
    #[default]
    Qualified,
    /// Only the last `::` before the parameter list becomes a dot and the
    /// parameter list is kept: `ns::Bar.baz(int)(Foo.cpp:42)`
    Legacy,
}

/// Configuration for location serialization
#[derive(Debug, Clone, Default)]
pub struct SerializerConfig {
    /// How `fullInfo` is built from the signature
    pub style: FullInfoStyle,
    /// Use the short file name instead of the full path in `fullInfo`
    pub short_file_names: bool,
}

impl SerializerConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `fullInfo` style
    pub fn style(mut self, style: FullInfoStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets whether to use short file names
    pub fn short_file_names(mut self, short: bool) -> Self {
        self.short_file_names = short;
        self
    }
}

/// Writes [`LocationInfo`] records as `org.apache.log4j.spi.LocationInfo`
#[derive(Debug, Clone, Default)]
pub struct LocationSerializer {
    config: SerializerConfig,
}

impl LocationSerializer {
    /// Creates a serializer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a serializer with custom configuration
    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Serializes `location` to `out`.
    ///
    /// The unavailable location is written as a null reference. Errors from
    /// the writer are returned as-is.
    pub fn write<W: ObjectWriter + ?Sized>(
        &self,
        location: &LocationInfo,
        out: &mut W,
    ) -> io::Result<()> {
        if location.is_unavailable() {
            trace!("writing unavailable location as null");
            return out.write_null();
        }

        out.write_prolog(
            wire::LOCATION_INFO_CLASS,
            wire::LOCATION_INFO_CLASS_DESC_INCREMENT,
            &wire::LOCATION_INFO_PROLOG,
        )?;

        let full_info = self.full_info(location);
        trace!(full_info = %full_info, "writing location");
        out.write_utf_string(&full_info)
    }

    /// Builds the `fullInfo` string for a location
    pub fn full_info(&self, location: &LocationInfo) -> String {
        let file_name = if self.config.short_file_names {
            location.short_file_name()
        } else {
            location.file_name()
        };

        let line_number = location.line().map_or(i64::from(NA_LINE), i64::from);
        full_info(location.signature(), file_name, line_number, self.config.style)
    }
}

/// Builds a `fullInfo` string from its raw parts
///
/// `line_number` covers every `u32` line as well as the `-1` sentinel.
pub fn full_info(signature: &str, file_name: &str, line_number: i64, style: FullInfoStyle) -> String {
    let mut out = String::with_capacity(signature.len() + file_name.len() + 16);

    match style {
        FullInfoStyle::Qualified => qualified_name(signature, &mut out),
        FullInfoStyle::Legacy => legacy_name(signature, &mut out),
    }

    // Writing into a String cannot fail
    let _ = write!(out, "({}:{})", file_name, line_number);
    out
}

/// `ns::Bar` + `baz` as `ns.Bar.baz`; free functions as `.baz`
fn qualified_name(signature: &str, out: &mut String) {
    let class = signature::class_name(signature);
    for (i, part) in class.split(SCOPE_SEPARATOR).enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(part);
    }
    out.push('.');
    out.push_str(signature::method_name(signature));
}

fn legacy_name(signature: &str, out: &mut String) {
    let mut name = signature;

    // Return type, only while a parameter list follows
    if let Some(paren) = name.find('(') {
        if let Some(space) = name.find(' ').filter(|&space| space < paren) {
            name = &name[space + 1..];
        }
    }

    let Some(paren) = name.find('(') else {
        out.push_str(name);
        return;
    };

    match name[..paren].rfind(SCOPE_SEPARATOR) {
        Some(sep) => {
            out.push_str(&name[..sep]);
            out.push('.');
            out.push_str(&name[sep + SCOPE_SEPARATOR.len()..]);
        }
        None => {
            out.push('.');
            out.push_str(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Records every call for inspection
    #[derive(Debug, Default)]
    struct RecordingWriter {
        calls: Vec<String>,
    }

    impl ObjectWriter for RecordingWriter {
        fn write_null(&mut self) -> io::Result<()> {
            self.calls.push("null".to_string());
            Ok(())
        }

        fn write_prolog(&mut self, class_name: &str, increment: u32, desc: &[u8]) -> io::Result<()> {
            self.calls
                .push(format!("prolog {} {} {}", class_name, increment, desc.len()));
            Ok(())
        }

        fn write_utf_string(&mut self, value: &str) -> io::Result<()> {
            self.calls.push(format!("utf {}", value));
            Ok(())
        }
    }

    struct FailingWriter;

    impl ObjectWriter for FailingWriter {
        fn write_null(&mut self) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn write_prolog(&mut self, _: &str, _: u32, _: &[u8]) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn write_utf_string(&mut self, _: &str) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    fn legacy() -> LocationSerializer {
        LocationSerializer::with_config(SerializerConfig::new().style(FullInfoStyle::Legacy))
    }

    #[test]
    fn test_unavailable_writes_only_null() {
        let mut writer = RecordingWriter::default();
        LocationSerializer::new()
            .write(LocationInfo::unavailable(), &mut writer)
            .unwrap();
        assert_eq!(writer.calls, vec!["null"]);
    }

    #[test]
    fn test_present_writes_prolog_then_full_info() {
        let mut writer = RecordingWriter::default();
        let location = LocationInfo::new("Foo.cpp", "void ns::Bar::baz(int)", 42);
        LocationSerializer::new().write(&location, &mut writer).unwrap();
        assert_eq!(
            writer.calls,
            vec![
                "prolog org.apache.log4j.spi.LocationInfo 2 81",
                "utf ns.Bar.baz(Foo.cpp:42)",
            ]
        );
    }

    #[test]
    fn test_writer_errors_propagate() {
        let location = LocationInfo::new("Foo.cpp", "run(void)", 1);
        let err = LocationSerializer::new()
            .write(&location, &mut FailingWriter)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_qualified_full_info() {
        let serializer = LocationSerializer::new();
        let location = LocationInfo::new("Foo.cpp", "void ns::Bar::baz(int)", 42);
        assert_eq!(serializer.full_info(&location), "ns.Bar.baz(Foo.cpp:42)");

        let location = LocationInfo::new("Foo.cpp", "run(void)", 7);
        assert_eq!(serializer.full_info(&location), ".run(Foo.cpp:7)");

        let location = LocationInfo::new("Foo.cpp", "int freeFn(int)", 3);
        assert_eq!(serializer.full_info(&location), ".freeFn(Foo.cpp:3)");

        let location = LocationInfo::new("src/lib.rs", "my_crate::net::send", 9);
        assert_eq!(serializer.full_info(&location), "my_crate.net.send(src/lib.rs:9)");
    }

    #[test]
    fn test_legacy_full_info() {
        let serializer = legacy();
        let location = LocationInfo::new("Foo.cpp", "void ns::Bar::baz(int)", 42);
        assert_eq!(serializer.full_info(&location), "ns::Bar.baz(int)(Foo.cpp:42)");

        let location = LocationInfo::new("Foo.cpp", "run(void)", 7);
        assert_eq!(serializer.full_info(&location), ".run(void)(Foo.cpp:7)");

        let location = LocationInfo::new("Foo.cpp", "void Worker::run()", 7);
        assert_eq!(serializer.full_info(&location), "Worker.run()(Foo.cpp:7)");
    }

    #[test]
    fn test_legacy_space_inside_parameters_keeps_prefix() {
        let location = LocationInfo::new("a.cpp", "run(int a)", 5);
        assert_eq!(legacy().full_info(&location), ".run(int a)(a.cpp:5)");

        let location = LocationInfo::new("a.cpp", "ns::Bar::baz(const char* s)", 9);
        assert_eq!(legacy().full_info(&location), "ns::Bar.baz(const char* s)(a.cpp:9)");
    }

    #[test]
    fn test_full_info_keeps_large_line_numbers() {
        let location = LocationInfo::new("a.cpp", "void f()", u32::MAX);
        assert_eq!(LocationSerializer::new().full_info(&location), ".f(a.cpp:4294967295)");
        assert_eq!(legacy().full_info(&location), ".f()(a.cpp:4294967295)");
        assert_eq!(
            full_info("?::?", "?", i64::from(NA_LINE), FullInfoStyle::Legacy),
            "?::?(?:-1)"
        );
    }

    #[test]
    fn test_legacy_without_parameter_list() {
        // No parameter list: return type and separators are kept
        let location = LocationInfo::new("Foo.cpp", "void ns::Bar::baz", 1);
        assert_eq!(legacy().full_info(&location), "void ns::Bar::baz(Foo.cpp:1)");
    }

    #[test]
    fn test_legacy_separator_after_parameters_is_ignored() {
        let location = LocationInfo::new("a.cpp", "void run(std::string)", 5);
        assert_eq!(legacy().full_info(&location), ".run(std::string)(a.cpp:5)");
    }

    #[test]
    fn test_short_file_names() {
        let serializer =
            LocationSerializer::with_config(SerializerConfig::new().short_file_names(true));
        let location = LocationInfo::new("/src/ns/Bar.cpp", "void ns::Bar::baz(int)", 42);

        #[cfg(not(windows))]
        assert_eq!(serializer.full_info(&location), "ns.Bar.baz(Bar.cpp:42)");
        assert_eq!(
            LocationSerializer::new().full_info(&location),
            "ns.Bar.baz(/src/ns/Bar.cpp:42)"
        );
    }

    #[test]
    fn test_config_builder() {
        let config = SerializerConfig::new()
            .style(FullInfoStyle::Legacy)
            .short_file_names(true);
        assert_eq!(config.style, FullInfoStyle::Legacy);
        assert!(config.short_file_names);
        assert_eq!(SerializerConfig::default().style, FullInfoStyle::Qualified);
    }
}
