//! Storage adapters and the image normalization seam.

pub mod blob_store;
pub mod fs_blob_store;
pub mod metadata_store;
pub mod normalizer;

/// Escape `%`, `_` and `\` so user input matches literally in a
/// `LIKE ... ESCAPE '\'` pattern.
pub(crate) fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
