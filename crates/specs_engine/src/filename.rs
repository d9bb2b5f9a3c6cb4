const OUTPUT_SUFFIX: &str = "_specs.csv";
const MAX_STEM_LEN: usize = 80;

/// Output file name for a category: `{category lowercased}_specs.csv`, made
/// safe for Windows and Unix file systems.
pub fn category_filename(category: &str) -> String {
    format!("{}{OUTPUT_SUFFIX}", sanitize_stem(&category.to_lowercase()))
}

fn sanitize_stem(input: &str) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.trim().chars() {
        let c = if is_forbidden(c) || c.is_whitespace() {
            '_'
        } else {
            c
        };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }

    let mut stem = compacted.trim_matches(&['_', '.'][..]).to_string();
    if stem.is_empty() {
        stem = "unnamed".to_string();
    }
    if stem.len() > MAX_STEM_LEN {
        let mut end = MAX_STEM_LEN;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem.truncate(end);
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
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
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::category_filename;

    #[test]
    fn brand_names_map_to_lowercase_files() {
        assert_eq!(category_filename("Acura"), "acura_specs.csv");
        assert_eq!(category_filename("Mercedes-Benz"), "mercedes-benz_specs.csv");
        assert_eq!(category_filename("Land Rover"), "land_rover_specs.csv");
    }

    #[test]
    fn unsafe_names_are_patched() {
        assert_eq!(category_filename("../etc"), "etc_specs.csv");
        assert_eq!(category_filename("a/b:c"), "a_b_c_specs.csv");
        assert_eq!(category_filename("Con"), "con__specs.csv");
        assert_eq!(category_filename("  "), "unnamed_specs.csv");
    }
}
