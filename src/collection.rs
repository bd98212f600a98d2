//! Collection addressing
//!
//! A persisted index lives in a directory named after the set of source
//! files it was built from. The name is a pure function of the file-name
//! set: call sites may pass the names in any order and still resolve the
//! same collection.

/// Maximum length of a collection directory name
const MAX_NAME_LEN: usize = 120;

/// Derive the collection directory name for a set of source file names.
///
/// Names are sorted, sanitized to `[A-Za-z0-9_-]` and joined with `_`.
/// Overlong results are truncated with a stable checksum suffix so distinct
/// file sets cannot collapse onto the same directory.
pub fn collection_name(file_names: &[String]) -> String {
    let mut names: Vec<&str> = file_names.iter().map(String::as_str).collect();
    names.sort_unstable();

    let joined = names
        .iter()
        .map(|name| sanitize(name))
        .collect::<Vec<_>>()
        .join("_");

    if joined.len() <= MAX_NAME_LEN {
        joined
    } else {
        let checksum = fnv1a(joined.as_bytes());
        format!("{}-{:016x}", &joined[..MAX_NAME_LEN - 17], checksum)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

// 64-bit FNV-1a. DefaultHasher is not guaranteed stable across Rust
// releases, and this name addresses on-disk state.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_file() {
        assert_eq!(collection_name(&names(&["doc1.pdf"])), "doc1_pdf");
    }

    #[test]
    fn test_order_insensitive() {
        let a = collection_name(&names(&["a.pdf", "b.pdf"]));
        let b = collection_name(&names(&["b.pdf", "a.pdf"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let files = names(&["report.pdf", "notes.txt"]);
        assert_eq!(collection_name(&files), collection_name(&files));
    }

    #[test]
    fn test_sanitizes_path_characters() {
        let name = collection_name(&names(&["dir/file name.pdf"]));
        assert!(!name.contains('/'));
        assert!(!name.contains(' '));
    }

    #[test]
    fn test_overlong_names_truncate_with_checksum() {
        let many: Vec<String> = (0..40).map(|i| format!("document-{i}.pdf")).collect();
        let name = collection_name(&many);
        assert!(name.len() <= MAX_NAME_LEN);

        let mut shuffled = many.clone();
        shuffled.reverse();
        assert_eq!(name, collection_name(&shuffled));

        // A different file set must not alias the same directory.
        let other: Vec<String> = (0..40).map(|i| format!("document-{}.pdf", i + 1)).collect();
        assert_ne!(name, collection_name(&other));
    }
}
