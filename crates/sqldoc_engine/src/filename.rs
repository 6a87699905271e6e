const FALLBACK: &str = "download.zip";
const MAX_LEN: usize = 120;

/// Makes a server-supplied file name safe to create on any platform.
pub fn safe_filename(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);
    if cleaned.is_empty() {
        return FALLBACK.to_string();
    }

    let mut name = cleaned.to_string();
    if name.len() > MAX_LEN {
        let mut end = MAX_LEN;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
    }
    if is_reserved_windows_name(&name) {
        name.insert(0, '_');
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}

#[cfg(test)]
mod tests {
    use super::safe_filename;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(safe_filename("9f1c.zip"), "9f1c.zip");
    }

    #[test]
    fn separators_and_dots_cannot_escape_the_directory() {
        assert_eq!(safe_filename("../etc/passwd"), "etc_passwd");
        assert_eq!(safe_filename("a\\b:c.zip"), "a_b_c.zip");
    }

    #[test]
    fn empty_and_reserved_names_are_patched() {
        assert_eq!(safe_filename("..."), "download.zip");
        assert_eq!(safe_filename("con.zip"), "_con.zip");
    }

    #[test]
    fn long_names_are_truncated() {
        let name = "x".repeat(300);
        assert_eq!(safe_filename(&name).len(), 120);
    }
}
