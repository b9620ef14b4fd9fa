//! Java object serialization wire constants.
//!
//! Only the subset of the protocol needed to write and read
//! `org.apache.log4j.spi.LocationInfo` objects is covered:
//!
//! - Stream header: `STREAM_MAGIC` `STREAM_VERSION`
//! - `TC_NULL` for an absent location
//! - `TC_OBJECT` followed by a class descriptor (`TC_CLASSDESC ...`) or a
//!   back-reference to one (`TC_REFERENCE handle`)
//! - The single `fullInfo` field as `TC_STRING` / `TC_LONGSTRING`

/// Stream magic number
pub const STREAM_MAGIC: u16 = 0xACED;

/// Stream protocol version
pub const STREAM_VERSION: u16 = 0x0005;

/// Null reference
pub const TC_NULL: u8 = 0x70;

/// Back-reference to an object already written to the stream
pub const TC_REFERENCE: u8 = 0x71;

/// New class descriptor
pub const TC_CLASSDESC: u8 = 0x72;

/// New object
pub const TC_OBJECT: u8 = 0x73;

/// New string, 16-bit length
pub const TC_STRING: u8 = 0x74;

/// End of optional block data
pub const TC_ENDBLOCKDATA: u8 = 0x78;

/// New string, 64-bit length
pub const TC_LONGSTRING: u8 = 0x7C;

/// First handle assigned to an object in a stream
pub const BASE_WIRE_HANDLE: u32 = 0x7E_0000;

/// Class descriptor flag: class implements `Serializable`
pub const SC_SERIALIZABLE: u8 = 0x02;

/// Fully qualified name of the Java class being emulated
pub const LOCATION_INFO_CLASS: &str = "org.apache.log4j.spi.LocationInfo";

/// `serialVersionUID` of `org.apache.log4j.spi.LocationInfo`
pub const LOCATION_INFO_SERIAL_VERSION_UID: u64 = 0xED99_BBE1_4A91_A57C;

/// Handles consumed by the class descriptor besides the descriptor itself
/// (the `Ljava/lang/String;` type signature string)
pub const LOCATION_INFO_CLASS_DESC_INCREMENT: u32 = 2;

/// Class descriptor for `org.apache.log4j.spi.LocationInfo`.
///
/// Written verbatim after `TC_OBJECT` the first time a location is
/// serialized to a stream. Must stay bit-for-bit identical to what a JVM
/// produces for the class.
#[rustfmt::skip]
pub const LOCATION_INFO_PROLOG: [u8; 81] = [
    // TC_CLASSDESC, class name
    0x72,
    0x00, 0x21, 0x6F, 0x72, 0x67, 0x2E, 0x61, 0x70, 0x61, 0x63, 0x68, 0x65,
    0x2E, 0x6C, 0x6F, 0x67, 0x34, 0x6A, 0x2E, 0x73, 0x70, 0x69, 0x2E, 0x4C,
    0x6F, 0x63, 0x61, 0x74, 0x69, 0x6F, 0x6E, 0x49, 0x6E, 0x66, 0x6F,
    // serialVersionUID
    0xED, 0x99, 0xBB, 0xE1, 0x4A, 0x91, 0xA5, 0x7C,
    // SC_SERIALIZABLE, one field
    0x02,
    0x00, 0x01,
    // 'L' fullInfo
    0x4C,
    0x00, 0x08, 0x66, 0x75, 0x6C, 0x6C, 0x49, 0x6E, 0x66, 0x6F,
    // TC_STRING "Ljava/lang/String;"
    0x74,
    0x00, 0x12, 0x4C, 0x6A, 0x61, 0x76, 0x61, 0x2F, 0x6C, 0x61, 0x6E, 0x67,
    0x2F, 0x53, 0x74, 0x72, 0x69, 0x6E, 0x67, 0x3B,
    // TC_ENDBLOCKDATA, no superclass
    0x78, 0x70,
];
