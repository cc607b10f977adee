// functions for working with byte arrays

pub fn parse_bytes<T: std::str::FromStr>(b: &[u8]) -> Option<T> {
    std::str::from_utf8(b).ok()?.parse().ok()
}

/// Returns `b` with leading and trailing ASCII spaces removed.
pub(crate) fn trim_spaces(b: &[u8]) -> &[u8] {
    let start = b.iter().take_while(|&&c| c == b' ').count();
    let end = b.len() - b[start..].iter().rev().take_while(|&&c| c == b' ').count();
    &b[start..end]
}

/// Returns `b` with leading and trailing ASCII whitespace removed.
pub(crate) fn trim_whitespace(b: &[u8]) -> &[u8] {
    let is_ws = |c: u8| c == b' ' || c == b'\t' || c == b'\r' || c == b'\n';
    let start = b.iter().take_while(|&&c| is_ws(c)).count();
    let end = b.len() - b[start..].iter().rev().take_while(|&&c| is_ws(c)).count();
    &b[start..end]
}
