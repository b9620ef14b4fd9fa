//! Call-site location records.
//!
//! A [`LocationInfo`] either describes a concrete call site (file, raw
//! signature, line) or is the canonical "unavailable" location. The
//! unavailable state is a single variant rather than three sentinel fields,
//! so a record can never be half-unavailable. The legacy sentinel values
//! ([`NA`], [`NA_METHOD`], line `-1`) are still what the accessors report
//! for it.
//!
//! ## Example
//!
//! ```
//! use locinfo_core::LocationInfo;
//!
//! let location = LocationInfo::new("src/net/Socket.cpp", "int net::Socket::send(int)", 42);
//! assert_eq!(location.short_file_name(), "Socket.cpp");
//! assert_eq!(location.method_name(), "send");
//! assert_eq!(location.class_name(), "net::Socket");
//! assert_eq!(location.line_number(), 42);
//! ```

pub mod signature;

use std::borrow::Cow;
use std::fmt;

/// File name reported when location information is not available
pub const NA: &str = "?";

/// Signature reported when location information is not available
pub const NA_METHOD: &str = "?::?";

/// Line number reported when location information is not available
pub const NA_LINE: i32 = -1;

static UNAVAILABLE: LocationInfo = LocationInfo { site: None };

/// A concrete call site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CallSite {
    file_name: Cow<'static, str>,
    /// Byte offset of the short file name within `file_name`
    short_start: usize,
    signature: Cow<'static, str>,
    line_number: u32,
}

/// Location of a single logging call.
///
/// Strings captured from `&'static` literals are borrowed; anything else is
/// owned, so clones never depend on the lifetime of the original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocationInfo {
    site: Option<CallSite>,
}

impl LocationInfo {
    /// Creates a location from the values captured at a call site.
    ///
    /// `signature` is the raw function signature as produced by the
    /// compiler, parameter list and return type included. The short file
    /// name is derived once, here.
    pub fn new(
        file_name: impl Into<Cow<'static, str>>,
        signature: impl Into<Cow<'static, str>>,
        line_number: u32,
    ) -> Self {
        let file_name = file_name.into();
        let short_start = file_name.len() - signature::short_file_name(&file_name).len();

        Self {
            site: Some(CallSite {
                file_name,
                short_start,
                signature: signature.into(),
                line_number,
            }),
        }
    }

    /// Returns the shared "location unavailable" instance
    pub fn unavailable() -> &'static LocationInfo {
        &UNAVAILABLE
    }

    /// Returns true if this is the "location unavailable" record
    pub fn is_unavailable(&self) -> bool {
        self.site.is_none()
    }

    /// Resets this record to the "location unavailable" state
    pub fn clear(&mut self) {
        self.site = None;
    }

    /// Full file name of the caller, [`NA`] if unavailable
    pub fn file_name(&self) -> &str {
        self.site.as_ref().map_or(NA, |site| &*site.file_name)
    }

    /// File name without its directory, [`NA`] if unavailable
    pub fn short_file_name(&self) -> &str {
        self.site
            .as_ref()
            .map_or(NA, |site| &site.file_name[site.short_start..])
    }

    /// Exact line number of the caller, `None` if unavailable
    pub fn line(&self) -> Option<u32> {
        self.site.as_ref().map(|site| site.line_number)
    }

    /// Line number of the caller, [`NA_LINE`] if unavailable.
    ///
    /// Lines above `i32::MAX` saturate; [`line`](Self::line) reports them exactly.
    pub fn line_number(&self) -> i32 {
        self.site.as_ref().map_or(NA_LINE, |site| {
            i32::try_from(site.line_number).unwrap_or(i32::MAX)
        })
    }

    /// Raw signature of the calling function, [`NA_METHOD`] if unavailable
    pub fn signature(&self) -> &str {
        self.site.as_ref().map_or(NA_METHOD, |site| &*site.signature)
    }

    /// Bare name of the calling method (`"method"` for `int ns::C::method(int)`)
    pub fn method_name(&self) -> &str {
        signature::method_name(self.signature())
    }

    /// Enclosing class of the calling method, `""` for free functions
    pub fn class_name(&self) -> &str {
        signature::class_name(self.signature())
    }
}

impl fmt::Display for LocationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}:{})",
            self.signature(),
            self.short_file_name(),
            self.line().map_or(i64::from(NA_LINE), i64::from)
        )
    }
}

/// Captures the location of the current call site.
///
/// The signature is the module path of the enclosing function, e.g.
/// `my_crate::net::send`. Closures and async blocks report the function
/// they are written in.
///
/// ```
/// let location = locinfo_core::location!();
/// assert!(!location.is_unavailable());
/// assert!(location.line_number() > 0);
/// ```
#[macro_export]
macro_rules! location {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        let mut name = name.strip_suffix("::__here").unwrap_or(name);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        $crate::LocationInfo::new(
            file!(),
            name,
            line!(),
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> LocationInfo {
        LocationInfo::new("/work/src/net/Socket.cpp", "int net::Socket::send(int)", 42)
    }

    #[test]
    fn test_accessors() {
        let location = sample();
        assert_eq!(location.file_name(), "/work/src/net/Socket.cpp");
        assert_eq!(location.short_file_name(), "Socket.cpp");
        assert_eq!(location.signature(), "int net::Socket::send(int)");
        assert_eq!(location.method_name(), "send");
        assert_eq!(location.class_name(), "net::Socket");
        assert_eq!(location.line_number(), 42);
        assert!(!location.is_unavailable());
    }

    #[test]
    fn test_unavailable_reports_sentinels() {
        let location = LocationInfo::default();
        assert_eq!(location.file_name(), NA);
        assert_eq!(location.short_file_name(), NA);
        assert_eq!(location.signature(), NA_METHOD);
        assert_eq!(location.line_number(), NA_LINE);
        assert_eq!(location.method_name(), "?");
        assert_eq!(location.class_name(), "?");
        assert!(location.is_unavailable());
    }

    #[test]
    fn test_shared_unavailable_instance() {
        assert_eq!(LocationInfo::unavailable(), &LocationInfo::default());
        assert!(std::ptr::eq(
            LocationInfo::unavailable(),
            LocationInfo::unavailable()
        ));

        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| LocationInfo::unavailable() as *const _ as usize))
            .collect();
        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_clear() {
        let mut location = sample();
        location.clear();
        assert_eq!(location, LocationInfo::default());
        assert_eq!(location.short_file_name(), NA);
    }

    #[test]
    fn test_clone_is_independent() {
        let source = sample();
        let mut copy = source.clone();
        assert_eq!(copy, source);
        assert_eq!(copy.short_file_name(), source.short_file_name());

        copy.clear();
        assert_eq!(source.method_name(), "send");
        assert_ne!(copy, source);
    }

    #[test]
    fn test_clone_outlives_owned_source() {
        let copy = {
            let file = String::from("src/transient.cpp");
            let signature = format!("void {}::run()", "Worker");
            let transient = LocationInfo::new(file, signature, 7);
            transient.clone()
        };
        assert_eq!(copy.short_file_name(), "transient.cpp");
        assert_eq!(copy.class_name(), "Worker");
    }

    #[test]
    fn test_present_never_equals_unavailable() {
        let lookalike = LocationInfo::new(NA, NA_METHOD, 0);
        assert!(!lookalike.is_unavailable());
        assert_ne!(&lookalike, LocationInfo::unavailable());
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "int net::Socket::send(int)(Socket.cpp:42)");
    }

    #[test]
    fn test_location_macro() {
        let location = crate::location!();
        assert_eq!(location.short_file_name(), "mod.rs");
        assert_eq!(location.method_name(), "test_location_macro");
        assert_eq!(location.class_name(), "locinfo_core::location::tests");
    }

    #[test]
    fn test_location_macro_in_closure() {
        let capture = || crate::location!();
        let location = capture();
        assert_eq!(location.method_name(), "test_location_macro_in_closure");
        assert_eq!(location.class_name(), "locinfo_core::location::tests");

        let nested = (|| (|| crate::location!())())();
        assert_eq!(nested.method_name(), "test_location_macro_in_closure");
    }

    #[test]
    fn test_large_line_numbers() {
        let location = LocationInfo::new("a.cpp", "void f()", u32::MAX);
        assert_eq!(location.line(), Some(u32::MAX));
        assert_eq!(location.line_number(), i32::MAX);
        assert_eq!(location.to_string(), "void f()(a.cpp:4294967295)");
        assert_eq!(LocationInfo::default().line(), None);
    }
}
