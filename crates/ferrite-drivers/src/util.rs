//! Small helpers shared by the trampolines

use ferrite_context::{current, CurrentScope, ExecutionContext};

/// Longest prefix of `s` that fits in `max` bytes without splitting a
/// character
pub(crate) fn truncate_str(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Fill a caller-supplied text buffer, truncating to `max`; returns the
/// byte count written
pub(crate) fn fill_status(buf: &mut String, text: &str, max: usize) -> i32 {
    let text = truncate_str(text, max);
    buf.clear();
    buf.push_str(text);
    text.len() as i32
}

/// Fill a caller-supplied byte buffer, truncating to `max`; returns the
/// byte count written
pub(crate) fn fill_bytes(buf: &mut Vec<u8>, data: &[u8], max: usize) -> i32 {
    let n = data.len().min(max);
    buf.clear();
    buf.extend_from_slice(&data[..n]);
    n as i32
}

/// The acting driver id named by the current context, if any
pub(crate) fn current_driver_id() -> Option<String> {
    let ctx = current()?;
    ctx.get_variable(crate::DRIVER_ID_VAR)
        .as_str()
        .map(str::to_string)
}

/// Make sure some context is current for the duration of a trampoline
/// call. When none is active a fresh one is created and scoped to the
/// call; the firmware leaked these, the guard frees them.
pub(crate) fn ensure_context() -> Option<CurrentScope> {
    if current().is_some() {
        None
    } else {
        Some(CurrentScope::enter(ExecutionContext::new(
            "driver-call",
            None,
            8,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 3), "hel");
        // "é" is two bytes; cutting at 1 must back off to 0
        assert_eq!(truncate_str("é", 1), "");
    }

    #[test]
    fn test_fill_bytes_truncates() {
        let mut buf = Vec::new();
        assert_eq!(fill_bytes(&mut buf, b"abcdef", 4), 4);
        assert_eq!(buf, b"abcd");
    }
}
