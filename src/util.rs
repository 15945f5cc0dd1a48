//! Path and string helpers shared by every layout builder
//!
//! All functions here are pure: they never touch the filesystem and
//! never consult the configuration.

/// Escape a container title so it can be embedded in a `/`-separated path.
///
/// Backslashes are doubled first, then slashes are prefixed with a backslash.
pub fn escape_slash(name: &str) -> String {
    name.replace('\\', "\\\\").replace('/', "\\/")
}

/// Encode a list of container titles as a single escaped path string.
///
/// `["Audio", "AC/DC"]` becomes `/Audio/AC\/DC`; an empty list becomes `""`.
pub fn container_chain<S: AsRef<str>>(titles: &[S]) -> String {
    titles
        .iter()
        .map(|t| format!("/{}", escape_slash(t.as_ref())))
        .collect()
}

/// Extract the year from an ISO-like date (`2018-05-01` -> `2018`).
///
/// Anything that does not start with four digits and a dash is returned unchanged.
pub fn get_year(date: &str) -> String {
    let bytes = date.as_bytes();
    if bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-' {
        date[..4].to_string()
    } else {
        date.to_string()
    }
}

/// Name of the directory that directly contains `location`.
///
/// `/music/rock/list.m3u` gives `rock`; a location without any separator gives `""`.
pub fn last_path(location: &str) -> String {
    let parts: Vec<&str> = location.split('/').collect();
    if parts.len() > 1 {
        parts[parts.len() - 2].to_string()
    } else {
        String::new()
    }
}

/// Directory segments between the import root and the directory holding `location`.
///
/// The root is always treated as a directory, with or without a trailing slash.
/// Without a root only the containing directory name is returned.
/// Empty, `.` and `..` segments are dropped.
pub fn root_path(root: &str, location: &str) -> Vec<String> {
    if root.is_empty() {
        let last = last_path(location);
        return if last.is_empty() { Vec::new() } else { vec![last] };
    }

    let root_dir = root.strip_suffix('/').unwrap_or(root);
    let rest = location.strip_prefix(root_dir).unwrap_or(location);
    let dir = match rest.rfind('/') {
        Some(idx) => &rest[..idx],
        None => "",
    };

    dir.split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .map(str::to_string)
        .collect()
}

/// Remove the file extension from a title, unless the dot is one of the first two characters.
pub fn strip_extension(title: &str) -> &str {
    match title.rfind('.') {
        Some(idx) if title[..idx].chars().count() > 1 => &title[..idx],
        _ => title,
    }
}

/// Uppercase a character and fold accented latin letters onto their base letter.
pub fn map_initial(ch: char) -> char {
    const FOLDS: &[(&str, char)] = &[
        ("ÄÁÀÂÆÃÅĀĂĄ", 'A'),
        ("ÇĆČĈĊ", 'C'),
        ("ĎĐ", 'D'),
        ("ÉÈÊËĒĔĖĘĚ", 'E'),
        ("ĜĞĠĢ", 'G'),
        ("ĤĦ", 'H'),
        ("ÍÌÎÏĨĪĬĮİ", 'I'),
        ("Ĵ", 'J'),
        ("Ķ", 'K'),
        ("ĹĻĽĿŁ", 'L'),
        ("ÑŃŅŇŊ", 'N'),
        ("ÖÓÒÔŒÕØŌŎŐ", 'O'),
        ("ŔŖŘ", 'R'),
        ("ŚŜŞŠ", 'S'),
        ("ŢŤŦ", 'T'),
        ("ÜÚÙÛŨŪŬŮŰŲ", 'U'),
        ("Ŵ", 'W'),
        ("ÝŶŸ", 'Y'),
        ("ŹŻŽ", 'Z'),
    ];

    let upper = ch.to_uppercase().next().unwrap_or(ch);
    FOLDS
        .iter()
        .find(|(variants, _)| variants.contains(upper))
        .map(|(_, base)| *base)
        .unwrap_or(upper)
}

/// Folded initial of a string, or `None` for an empty string.
pub fn initial(value: &str) -> Option<char> {
    value.chars().next().map(map_initial)
}

/// Letter bucket widths per box type. Types not listed use the 5-box split.
fn box_widths(box_type: u32) -> Vec<u32> {
    match box_type {
        1 => vec![26],
        2 => vec![13, 13],
        3 => vec![8, 9, 9],
        4 => vec![7, 6, 7, 6],
        6 => vec![4, 5, 4, 4, 5, 4],
        7 => vec![4, 3, 4, 4, 4, 3, 4],
        9 => vec![5, 5, 5, 4, 1, 6],
        26 => vec![1; 26],
        _ => vec![5, 5, 5, 6, 5],
    }
}

/// Alphabetic bucket folder for `value`, e.g. `-ABCD-` for "Alpha" with box type 6.
///
/// Digits go to `-0-9-`, anything that is not a latin letter to `-^&#'-`.
pub fn abcbox(value: &str, box_type: u32, div: char) -> String {
    let Some(ch) = initial(value) else {
        return format!("{div}^&#'{div}");
    };

    if ch.is_ascii_digit() {
        return format!("{div}0-9{div}");
    }
    if !ch.is_ascii_uppercase() {
        return format!("{div}^&#'{div}");
    }

    let offset = ch as u32 - 'A' as u32;
    let mut start = 0;
    for width in box_widths(box_type) {
        if offset < start + width {
            let letters: String = (start..start + width)
                .filter_map(|i| char::from_u32('A' as u32 + i))
                .collect();
            return format!("{div}{letters}{div}");
        }
        start += width;
    }

    format!("{div}^&#'{div}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_slash() {
        assert_eq!(escape_slash("AC/DC"), "AC\\/DC");
        assert_eq!(escape_slash("back\\slash"), "back\\\\slash");
        assert_eq!(escape_slash("plain"), "plain");
    }

    #[test]
    fn test_container_chain() {
        assert_eq!(container_chain(&["Audio", "All Audio"]), "/Audio/All Audio");
        assert_eq!(container_chain(&["Artists", "AC/DC"]), "/Artists/AC\\/DC");
        assert_eq!(container_chain::<&str>(&[]), "");
    }

    #[test]
    fn test_get_year() {
        assert_eq!(get_year("2018-01-01"), "2018");
        assert_eq!(get_year("1999-12"), "1999");
        assert_eq!(get_year("2018"), "2018");
        assert_eq!(get_year("unknown"), "unknown");
    }

    #[test]
    fn test_last_path() {
        assert_eq!(last_path("/location/last/element/"), "element");
        assert_eq!(last_path("/location/of/playlist.m3u"), "of");
        assert_eq!(last_path("not-a-path"), "");
    }

    #[test]
    fn test_root_path_with_root() {
        assert_eq!(
            root_path("/library/Music/", "/library/Music/Artist/Album/track.mp3"),
            vec!["Artist", "Album"]
        );
        assert_eq!(
            root_path("/parent/child/", "/parent/child/folder/path/"),
            vec!["folder", "path"]
        );
        assert_eq!(
            root_path("/home/shelf", "/home/shelf/subdir/folder/audio.mp3"),
            vec!["subdir", "folder"]
        );
        assert!(root_path("/home/shelf", "/home/shelf/audio.mp3").is_empty());
    }

    #[test]
    fn test_root_path_without_root() {
        assert_eq!(root_path("", "/home/shelf/path/image.jpg"), vec!["path"]);
        assert!(root_path("", "image.jpg").is_empty());
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("Party.m3u"), "Party");
        assert_eq!(strip_extension("my.list.pls"), "my.list");
        assert_eq!(strip_extension(".m3u"), ".m3u");
        assert_eq!(strip_extension("a.m3u"), "a.m3u");
        assert_eq!(strip_extension("noext"), "noext");
    }

    #[test]
    fn test_map_initial() {
        assert_eq!(map_initial('ä'), 'A');
        assert_eq!(map_initial('a'), 'A');
        assert_eq!(map_initial('Ž'), 'Z');
        assert_eq!(map_initial('7'), '7');
    }

    #[test]
    fn test_abcbox() {
        assert_eq!(abcbox("Alpha", 6, '-'), "-ABCD-");
        assert_eq!(abcbox("Tau", 9, '-'), "-T-");
        assert_eq!(abcbox("Zulu", 9, '-'), "-UVWXYZ-");
        assert_eq!(abcbox("mike", 26, '-'), "-M-");
        assert_eq!(abcbox("Ärzte", 2, '-'), "-ABCDEFGHIJKLM-");
        assert_eq!(abcbox("1999", 6, '-'), "-0-9-");
        assert_eq!(abcbox("!bang", 6, '-'), "-^&#'-");
        assert_eq!(abcbox("Echo", 99, '-'), "-ABCDE-");
    }
}
