/// Returns `requested` if it is free, otherwise the first `<stem>_<n><ext>`
/// (n = 1, 2, ...) for which `is_taken` answers false.
///
/// The predicate is called once per candidate, so it may consult a directory
/// listing or the filesystem directly. There is no upper bound on attempts.
pub fn resolve_unique_name<F>(requested: &str, mut is_taken: F) -> String
where
    F: FnMut(&str) -> bool,
{
    if !is_taken(requested) {
        return requested.to_string();
    }

    let (stem, extension) = split_extension(requested);
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{stem}_{counter}{extension}");
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Splits `name` into stem and extension (the extension keeps its dot).
/// Leading dots belong to the stem, so `.env` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => name.split_at(idx),
        _ => (name, ""),
    }
}
