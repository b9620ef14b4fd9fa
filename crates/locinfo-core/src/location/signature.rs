//! Parsing of compiler-provided file paths and function signatures.
//!
//! Signatures arrive in whatever shape the capturing compiler produced:
//! `int ns::Class::method(int)`, `freeFunction(int)`,
//! `bool ns::X::operator==(const X&)`, or a bare path such as
//! `my_crate::module::function`. All functions here return sub-slices of
//! their input and never allocate.

/// Path separator used to shorten file names
#[cfg(windows)]
pub const PATH_SEPARATOR: char = '\\';

/// Path separator used to shorten file names
#[cfg(not(windows))]
pub const PATH_SEPARATOR: char = '/';

/// Scope-resolution separator in signatures
pub const SCOPE_SEPARATOR: &str = "::";

/// Returns the part of `path` after the last [`PATH_SEPARATOR`].
///
/// Paths without a separator are returned unchanged.
pub fn short_file_name(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(pos) => &path[pos + PATH_SEPARATOR.len_utf8()..],
        None => path,
    }
}

/// Drops the parameter list (the first `(` and everything after it)
fn strip_parameters(signature: &str) -> &str {
    match signature.find('(') {
        Some(pos) => &signature[..pos],
        None => signature,
    }
}

/// Extracts the bare method name from a signature.
///
/// After dropping the parameter list, the name is whatever follows the last
/// `::`; without a scope separator, whatever follows the first space (a
/// return type); otherwise the trimmed signature itself.
///
/// ```
/// use locinfo_core::location::signature::method_name;
///
/// assert_eq!(method_name("int ns::Class::method(int)"), "method");
/// assert_eq!(method_name("int freeFn(int)"), "freeFn");
/// ```
pub fn method_name(signature: &str) -> &str {
    let trimmed = strip_parameters(signature);

    if let Some(pos) = trimmed.rfind(SCOPE_SEPARATOR) {
        &trimmed[pos + SCOPE_SEPARATOR.len()..]
    } else if let Some(pos) = trimmed.find(' ') {
        &trimmed[pos + 1..]
    } else {
        trimmed
    }
}

/// Extracts the enclosing class (or namespace) from a signature.
///
/// Everything before the last `::` of the trimmed signature, minus any
/// return type ending at the last space. Free functions have no class and
/// yield `""`.
///
/// ```
/// use locinfo_core::location::signature::class_name;
///
/// assert_eq!(class_name("int ns::Class::method(int)"), "ns::Class");
/// assert_eq!(class_name("freeFunction(int)"), "");
/// ```
pub fn class_name(signature: &str) -> &str {
    let trimmed = strip_parameters(signature);

    let Some(pos) = trimmed.rfind(SCOPE_SEPARATOR) else {
        return "";
    };

    let qualified = &trimmed[..pos];
    match qualified.rfind(' ') {
        Some(space) => &qualified[space + 1..],
        None => qualified,
    }
}
