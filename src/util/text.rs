use std::borrow::Cow;

/// Returns true for characters that XML 1.0 does not allow in character data.
///
/// Tab, newline and carriage return are allowed. DEL is technically legal but
/// is dropped as well since it never carries meaning in post text.
fn is_forbidden(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => false,
        '\u{0}'..='\u{1f}' | '\u{7f}' => true,
        '\u{fffe}' | '\u{ffff}' => true,
        _ => false,
    }
}

/// Strip characters that would make the rendered feed malformed XML.
///
/// Post text comes straight from the upstream API and occasionally carries
/// raw control characters (form feeds, stray ESC bytes from copy-pasted
/// terminal output). Writing those into an Atom document produces XML that
/// strict readers reject outright.
///
/// Returns `Cow::Borrowed` when the input is already clean, which is the
/// common case.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_forbidden) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(s.chars().filter(|&c| !is_forbidden(c)).collect())
}
