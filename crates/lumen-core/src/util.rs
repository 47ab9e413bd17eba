//! Small string helpers shared by the extractors.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when percent-encoding a root-relative path.
/// Alphanumerics and `; , / ? : @ & = + $ - _ . ! ~ * ' ( ) #` pass
/// through; everything else (including space) is encoded.
const URI_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode a root-relative path for downstream URL use.
pub fn encode_uri(input: &str) -> String {
    utf8_percent_encode(input, URI_SET).to_string()
}

/// A slug is a URL-friendly version of a title: lowercase, dash-separated,
/// with troublesome punctuation replaced.
pub fn to_slug(title: &str) -> String {
    let replaced = title.trim().replace('?', "_").replace('\'', "-");

    // Whitespace runs become single dashes
    let mut dashed = String::with_capacity(replaced.len());
    let mut in_whitespace = false;
    for ch in replaced.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                dashed.push('-');
            }
            in_whitespace = true;
        } else {
            dashed.push(ch);
            in_whitespace = false;
        }
    }

    // Collapse dash runs
    let mut collapsed = String::with_capacity(dashed.len());
    let mut prev_dash = false;
    for ch in dashed.chars() {
        if ch == '-' {
            if !prev_dash {
                collapsed.push('-');
            }
            prev_dash = true;
        } else {
            collapsed.push(ch);
            prev_dash = false;
        }
    }

    collapsed.replace('/', "-").to_lowercase()
}

/// The ordered folder segments above a file in a `/`-delimited path.
pub fn to_folders(rel_path: &str) -> Vec<String> {
    let segments: Vec<&str> = rel_path.split('/').collect();
    segments[..segments.len().saturating_sub(1)]
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// The directory portion of a `/`-delimited relative path.
pub fn sub_dir_of(rel_path: &str) -> String {
    match rel_path.rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uri_escapes_spaces() {
        assert_eq!(encode_uri("/albums/summer trip/IMG 01.jpg"), "/albums/summer%20trip/IMG%2001.jpg");
    }

    #[test]
    fn test_encode_uri_preserves_reserved() {
        assert_eq!(encode_uri("/a/b-c_d.e~f"), "/a/b-c_d.e~f");
    }

    #[test]
    fn test_to_slug_basic() {
        assert_eq!(to_slug("My Favorite Track"), "my-favorite-track");
    }

    #[test]
    fn test_to_slug_punctuation() {
        assert_eq!(to_slug("What's Next?"), "what-s-next_");
        assert_eq!(to_slug("  padded  title  "), "padded-title");
    }

    #[test]
    fn test_to_folders() {
        assert_eq!(
            to_folders("/sessions/2021/take1.mp3"),
            vec!["sessions".to_string(), "2021".to_string()]
        );
        assert!(to_folders("/take1.mp3").is_empty());
    }

    #[test]
    fn test_sub_dir_of() {
        assert_eq!(sub_dir_of("/albums/summer/IMG.jpg"), "/albums/summer");
        assert_eq!(sub_dir_of("/IMG.jpg"), "/");
        assert_eq!(sub_dir_of("IMG.jpg"), "");
    }
}
