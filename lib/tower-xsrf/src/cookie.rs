use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Every `%` has to introduce a two-digit hex escape, otherwise the string can't be decoded
fn is_well_formed(raw: &str) -> bool {
    raw.split('%').skip(1).all(|chunk| {
        chunk
            .as_bytes()
            .get(..2)
            .is_some_and(|escape| escape.iter().all(u8::is_ascii_hexdigit))
    })
}

fn decode(raw: &str) -> Option<Cow<'_, str>> {
    if !is_well_formed(raw) {
        debug!("cookie string contains a malformed percent escape");
        return None;
    }

    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => Some(decoded),
        Err(error) => {
            debug!(?error, "decoded cookie string isn't valid UTF-8");
            None
        }
    }
}

/// Find the value of the cookie `name` in a raw `name=value; name=value` string
///
/// The whole string is percent-decoded first, then split at `;`.
/// Leading whitespace of every segment is skipped and the first segment starting with `name=` wins.
///
/// Malformed input counts as "not found".
#[must_use]
pub fn find_cookie(raw: &str, name: &str) -> Option<String> {
    let decoded = decode(raw)?;

    decoded
        .split(';')
        .map(str::trim_start)
        .find_map(|segment| segment.strip_prefix(name)?.strip_prefix('='))
        .map(ToOwned::to_owned)
}
