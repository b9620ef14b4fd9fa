//! # locinfo-core
//!
//! Call-site location records for logging, serializable in the format log4j
//! tooling reads.
//!
//! This crate provides the core functionality for:
//! - Capturing where a logging call happened (file, function signature, line)
//! - Deriving short file, bare method and enclosing class names from
//!   compiler-provided signatures
//! - Writing records as Java-serialized `org.apache.log4j.spi.LocationInfo`
//!   objects, and reading them back
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`location`]: The [`LocationInfo`] record and signature parsing
//! - [`serial`]: The legacy serializer and a minimal Java object stream
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use locinfo_core::{LocationInfo, LocationReader, LocationSerializer, ObjectOutputStream, Record};
//!
//! let location = LocationInfo::new("src/Foo.cpp", "void ns::Bar::baz(int)", 42);
//! assert_eq!(location.class_name(), "ns::Bar");
//!
//! let mut stream = ObjectOutputStream::new(Vec::new())?;
//! LocationSerializer::new().write(&location, &mut stream)?;
//!
//! let bytes = stream.into_inner();
//! let records = LocationReader::new(&bytes)?.read_all()?;
//! assert_eq!(records, vec![Record::FullInfo("ns.Bar.baz(src/Foo.cpp:42)".into())]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`ObjectWriter`]: Route serialized records into another object stream
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod location;
pub mod serial;

// Re-export primary types for convenience
pub use error::{Error, Result};
pub use location::{LocationInfo, NA, NA_LINE, NA_METHOD};
pub use serial::{
    full_info, read_file, FullInfoStyle, LocationReader, LocationSerializer, ObjectOutputStream,
    ObjectWriter, Record, SerializerConfig,
};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
