//! Finding raw design values inside CSS values and script strings.

use std::sync::LazyLock;

use regex::Regex;

use tokenlint_ast::Span;

static COLOR_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:rgba?|hsla?)\([^()]*\)").expect("Invalid color function pattern")
});

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(?:[0-9a-fA-F]{8}|[0-9a-fA-F]{6}|[0-9a-fA-F]{3,4})\b")
        .expect("Invalid hex color pattern")
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9_-]*").expect("Invalid word pattern"));

static NUMBER_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(-?(?:\d+\.?\d*|\.\d+))(px|rem|em|%|vh|vw|vmin|vmax|ch|ex|pt|ms|s)\b|(-?(?:\d+\.?\d*|\.\d+))(%)")
        .expect("Invalid dimension pattern")
});

static VAR_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"var\(\s*(--[A-Za-z0-9_-]+)[^)]*\)").expect("Invalid var() pattern")
});

static ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{([^{}\s"'`,;:]+)\}"#).expect("Invalid alias reference pattern")
});

/// CSS named colors. `transparent` and `currentcolor` are keywords rather
/// than palette values and are left out.
const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke",
    "yellow", "yellowgreen",
];

/// Returns true if `word` is a CSS named color.
pub fn is_named_color(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    NAMED_COLORS.binary_search(&lower.as_str()).is_ok()
}

/// A raw value found in a larger text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal<'s> {
    pub text: &'s str,
    /// Byte range within the scanned text.
    pub start: usize,
    pub end: usize,
}

impl<'s> Literal<'s> {
    /// Returns the literal's span in a document, given the offset of the
    /// scanned text.
    pub fn span_in(&self, base: Span) -> Span {
        Span::from_range(base.start as usize + self.start, base.start as usize + self.end)
    }
}

/// The kind of a color literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLiteral {
    /// `#rgb`, `rgb()`, `hsl()` and friends.
    Computed,
    /// A named color such as `red`.
    Named,
}

/// Byte ranges covered by `var(...)` calls.
fn var_ranges(text: &str) -> Vec<(usize, usize)> {
    VAR_CALL
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect()
}

fn inside(ranges: &[(usize, usize)], start: usize) -> bool {
    ranges.iter().any(|&(s, e)| start >= s && start < e)
}

/// Finds color literals in a CSS value.
///
/// Named colors are only reported when `named` is set; literals inside
/// `var(...)` fallbacks are skipped.
pub fn color_literals(text: &str, named: bool) -> Vec<(Literal<'_>, ColorLiteral)> {
    let vars = var_ranges(text);
    let mut found: Vec<(Literal<'_>, ColorLiteral)> = COLOR_FUNCTION
        .find_iter(text)
        .chain(HEX_COLOR.find_iter(text))
        .filter(|m| !inside(&vars, m.start()))
        .map(|m| {
            let literal = Literal {
                text: m.as_str(),
                start: m.start(),
                end: m.end(),
            };
            (literal, ColorLiteral::Computed)
        })
        .collect();

    if named {
        let bytes = text.as_bytes();
        for m in WORD.find_iter(text) {
            let preceded = m.start() > 0
                && matches!(bytes[m.start() - 1], b'-' | b'#' | b'.' | b'$' | b'@');
            if preceded || inside(&vars, m.start()) || !is_named_color(m.as_str()) {
                continue;
            }
            // Word inside a function name such as `red(`.
            if bytes.get(m.end()) == Some(&b'(') {
                continue;
            }
            found.push((
                Literal {
                    text: m.as_str(),
                    start: m.start(),
                    end: m.end(),
                },
                ColorLiteral::Named,
            ));
        }
    }

    found.sort_by_key(|(lit, _)| lit.start);
    found
}

/// Finds numbers with a unit whose unit is in `units`.
pub fn unit_literals<'s>(text: &'s str, units: &[&str]) -> Vec<(Literal<'s>, f64, String)> {
    let vars = var_ranges(text);
    NUMBER_WITH_UNIT
        .captures_iter(text)
        .filter_map(|c| {
            let whole = c.get(0)?;
            if inside(&vars, whole.start()) {
                return None;
            }
            // Digits that continue an identifier, such as `h1px`.
            if whole.start() > 0 {
                let prev = text.as_bytes()[whole.start() - 1];
                if prev.is_ascii_alphanumeric() || matches!(prev, b'_' | b'-' | b'.') {
                    return None;
                }
            }
            let number = c.get(1).or_else(|| c.get(3))?.as_str().parse::<f64>().ok()?;
            let unit = c.get(2).or_else(|| c.get(4))?.as_str().to_ascii_lowercase();
            if !units.contains(&unit.as_str()) {
                return None;
            }
            Some((
                Literal {
                    text: whole.as_str(),
                    start: whole.start(),
                    end: whole.end(),
                },
                number,
                unit,
            ))
        })
        .collect()
}

/// A `var(--name)` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarReference<'s> {
    /// The custom property name, with its leading dashes.
    pub name: &'s str,
    pub start: usize,
    pub end: usize,
}

/// Finds `var(--name)` references; the range covers the name only.
pub fn var_references(text: &str) -> Vec<VarReference<'_>> {
    VAR_CALL
        .captures_iter(text)
        .filter_map(|c| {
            let name = c.get(1)?;
            Some(VarReference {
                name: name.as_str(),
                start: name.start(),
                end: name.end(),
            })
        })
        .collect()
}

/// A `{token.path}` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasReference<'s> {
    pub path: &'s str,
    /// Range of the whole reference, braces included.
    pub start: usize,
    pub end: usize,
}

/// Finds `{token.path}` references.
pub fn alias_references(text: &str) -> Vec<AliasReference<'_>> {
    ALIAS
        .captures_iter(text)
        .filter_map(|c| {
            let whole = c.get(0)?;
            Some(AliasReference {
                path: c.get(1)?.as_str(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}
