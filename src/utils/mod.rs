//! Small shared helpers.

pub mod hash;

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, e.g. `plural_count(3, "layer")` -> `"3 layers"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "override"), "0 overrides");
        assert_eq!(plural_count(1, "override"), "1 override");
    }
}
