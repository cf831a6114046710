//! String helpers shared by the explorer definitions

/// Upper-case the first character and lower-case the rest.
///
/// Dropdown labels are built from lower-case sheet text, so
/// `"per capita"` becomes `"Per capita"` and `"DHI"` becomes `"Dhi"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Space-separated slug list for multi-series views
pub fn join_slugs<I, S>(slugs: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for slug in slugs {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(slug.as_ref());
    }
    out
}
