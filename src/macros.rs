/// Compile a regex literal once and hand out a `&'static Regex`.
///
/// Patterns are literals, so a failure here is a programming error caught by
/// the first test touching the pattern.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}
