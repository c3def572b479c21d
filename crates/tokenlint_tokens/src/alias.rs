//! Alias references and structural pointers.
//!
//! An alias is a whole string of the form `{group.token}`. A `$ref` is a
//! JSON Pointer such as `#/group/token`; it is turned into the equivalent
//! alias before resolution.

/// Returns the referenced path if `value` is an alias.
pub fn parse_alias(value: &str) -> Option<&str> {
    let inner = value.strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains(['{', '}']) || inner.trim() != inner {
        return None;
    }
    if inner.split('.').any(str::is_empty) {
        return None;
    }
    Some(inner)
}

/// Returns true if `value` is an alias string.
pub fn is_alias(value: &str) -> bool {
    parse_alias(value).is_some()
}

/// Formats an alias to `path`.
pub fn alias_to(path: &str) -> String {
    format!("{{{path}}}")
}

/// Escapes a segment for use in a JSON Pointer.
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Appends a segment to a pointer.
pub fn pointer_push(pointer: &str, segment: &str) -> String {
    format!("{}/{}", pointer, escape_segment(segment))
}

/// Converts a `$ref` pointer (`#/a/b` or `/a/b`) to a dot path.
///
/// Returns `None` for pointers that are empty or carry empty segments.
pub fn pointer_to_path(pointer: &str) -> Option<String> {
    let rest = pointer.strip_prefix('#').unwrap_or(pointer);
    let rest = rest.strip_prefix('/')?;
    let mut segments = Vec::new();
    for raw in rest.split('/') {
        if raw.is_empty() {
            return None;
        }
        segments.push(raw.replace("~1", "/").replace("~0", "~"));
    }
    Some(segments.join("."))
}

/// Splits a pointer into unescaped segments, skipping the leading `#`.
pub fn pointer_segments(pointer: &str) -> Vec<String> {
    let rest = pointer.strip_prefix('#').unwrap_or(pointer);
    rest.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("{color.brand}", Some("color.brand"))]
    #[case("{a}", Some("a"))]
    #[case("{}", None)]
    #[case("{a..b}", None)]
    #[case("{ a }", None)]
    #[case("{a}{b}", None)]
    #[case("#ff0000", None)]
    #[case("color.brand", None)]
    fn test_parse_alias(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_alias(input), expected);
    }

    #[test]
    fn test_alias_to() {
        assert_eq!(alias_to("a.b"), "{a.b}");
        assert!(is_alias(&alias_to("a.b")));
    }

    #[test]
    fn test_pointer_round_trip() {
        let pointer = pointer_push(&pointer_push("#", "color"), "a/b~c");
        assert_eq!(pointer, "#/color/a~1b~0c");
        assert_eq!(pointer_segments(&pointer), vec!["color", "a/b~c"]);
    }

    #[rstest]
    #[case("#/color/brand", Some("color.brand"))]
    #[case("/color/brand", Some("color.brand"))]
    #[case("#", None)]
    #[case("#/color//brand", None)]
    #[case("color/brand", None)]
    fn test_pointer_to_path(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(pointer_to_path(input).as_deref(), expected);
    }
}
