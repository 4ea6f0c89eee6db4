pub(crate) fn other_io_error(e: impl std::error::Error + Send + Sync + 'static) -> std::io::Error {
    use std::io::*;

    Error::new(ErrorKind::Other, e)
}

/// Turns a raw on-device name into something usable as a local file name.
/// FATX allows characters that some host filesystems do not.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.trim_end_matches(['.', ' ']) {
        "" => "_".into(),
        trimmed => trimmed.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_file_name("F1234567890ABCDE"), "F1234567890ABCDE");
        assert_eq!(sanitize_file_name("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_file_name("save. "), "save");
        assert_eq!(sanitize_file_name(".."), "_");
        assert_eq!(sanitize_file_name(""), "_");
    }
}
