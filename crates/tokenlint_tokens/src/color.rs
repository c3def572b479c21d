//! Color parsing and color-space conversion.
//!
//! Colors are kept in the structured form `{colorSpace, components, alpha?,
//! hex?}`. Conversions go through sRGB and are only available for the
//! sRGB family (`srgb`, `srgb-linear`, `hsl`, `hwb`).

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};

/// A color space name as used in `colorSpace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Srgb,
    SrgbLinear,
    Hsl,
    Hwb,
    Lab,
    Lch,
    Oklab,
    Oklch,
    DisplayP3,
    A98Rgb,
    ProphotoRgb,
    Rec2020,
    XyzD65,
    XyzD50,
}

impl ColorSpace {
    /// Returns the `colorSpace` spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColorSpace::Srgb => "srgb",
            ColorSpace::SrgbLinear => "srgb-linear",
            ColorSpace::Hsl => "hsl",
            ColorSpace::Hwb => "hwb",
            ColorSpace::Lab => "lab",
            ColorSpace::Lch => "lch",
            ColorSpace::Oklab => "oklab",
            ColorSpace::Oklch => "oklch",
            ColorSpace::DisplayP3 => "display-p3",
            ColorSpace::A98Rgb => "a98-rgb",
            ColorSpace::ProphotoRgb => "prophoto-rgb",
            ColorSpace::Rec2020 => "rec2020",
            ColorSpace::XyzD65 => "xyz-d65",
            ColorSpace::XyzD50 => "xyz-d50",
        }
    }

    /// Returns true if colors in this space can be converted to and from sRGB.
    pub const fn is_convertible(&self) -> bool {
        matches!(
            self,
            ColorSpace::Srgb | ColorSpace::SrgbLinear | ColorSpace::Hsl | ColorSpace::Hwb
        )
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "srgb" => ColorSpace::Srgb,
            "srgb-linear" => ColorSpace::SrgbLinear,
            "hsl" => ColorSpace::Hsl,
            "hwb" => ColorSpace::Hwb,
            "lab" => ColorSpace::Lab,
            "lch" => ColorSpace::Lch,
            "oklab" => ColorSpace::Oklab,
            "oklch" => ColorSpace::Oklch,
            "display-p3" => ColorSpace::DisplayP3,
            "a98-rgb" => ColorSpace::A98Rgb,
            "prophoto-rgb" => ColorSpace::ProphotoRgb,
            "rec2020" => ColorSpace::Rec2020,
            "xyz-d65" => ColorSpace::XyzD65,
            "xyz-d50" => ColorSpace::XyzD50,
            other => return Err(other.to_string()),
        })
    }
}

/// A color in a specific space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub space: ColorSpace,
    /// Channel values in the space's native ranges (`hsl`/`hwb` use
    /// degrees and percentages; `srgb` channels are 0..=1).
    pub components: [f64; 3],
    pub alpha: f64,
}

impl Color {
    /// Creates an opaque sRGB color from 0..=1 channels.
    pub const fn srgb(r: f64, g: f64, b: f64) -> Self {
        Self {
            space: ColorSpace::Srgb,
            components: [r, g, b],
            alpha: 1.0,
        }
    }

    /// Reads the structured form. `"none"` components read as `0`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let space: ColorSpace = obj.get("colorSpace")?.as_str()?.parse().ok()?;
        let raw = obj.get("components")?.as_array()?;
        if raw.len() != 3 {
            return None;
        }
        let mut components = [0.0; 3];
        for (slot, c) in components.iter_mut().zip(raw) {
            *slot = match c {
                Value::String(s) if s == "none" => 0.0,
                other => other.as_f64()?,
            };
        }
        let alpha = match obj.get("alpha") {
            Some(a) => a.as_f64()?,
            None => 1.0,
        };
        Some(Self {
            space,
            components,
            alpha,
        })
    }

    /// Writes the structured form, including `hex` when the color has one.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("colorSpace".into(), json!(self.space.as_str()));
        obj.insert("components".into(), json!(self.components));
        if self.alpha != 1.0 {
            obj.insert("alpha".into(), json!(self.alpha));
        }
        if let Some(hex) = self.hex() {
            obj.insert("hex".into(), json!(hex));
        }
        Value::Object(obj)
    }

    /// Returns sRGB channels, if the space converts.
    pub fn to_srgb(&self) -> Option<[f64; 3]> {
        let [a, b, c] = self.components;
        match self.space {
            ColorSpace::Srgb => Some([a, b, c]),
            ColorSpace::SrgbLinear => Some([from_linear(a), from_linear(b), from_linear(c)]),
            ColorSpace::Hsl => Some(hsl_to_rgb(a, b / 100.0, c / 100.0)),
            ColorSpace::Hwb => Some(hwb_to_rgb(a, b / 100.0, c / 100.0)),
            _ => None,
        }
    }

    /// Converts to `target`, if both spaces are in the sRGB family.
    pub fn convert(&self, target: ColorSpace) -> Option<Color> {
        if self.space == target {
            return Some(*self);
        }
        let [r, g, b] = self.to_srgb()?;
        let components = match target {
            ColorSpace::Srgb => [r, g, b],
            ColorSpace::SrgbLinear => [to_linear(r), to_linear(g), to_linear(b)],
            ColorSpace::Hsl => rgb_to_hsl(r, g, b),
            ColorSpace::Hwb => rgb_to_hwb(r, g, b),
            _ => return None,
        };
        Some(Color {
            space: target,
            components,
            alpha: self.alpha,
        })
    }

    /// Returns the 6-digit lowercase hex form, ignoring alpha.
    pub fn hex(&self) -> Option<String> {
        let [r, g, b] = self.to_srgb()?;
        Some(format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b)))
    }

    /// Returns a comparison key: the hex form, with an alpha byte appended
    /// when the color is not opaque.
    pub fn hex_key(&self) -> Option<String> {
        let hex = self.hex()?;
        if self.alpha < 1.0 {
            Some(format!("{}{:02x}", hex, byte(self.alpha)))
        } else {
            Some(hex)
        }
    }
}

fn byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn from_linear(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    let h = h.rem_euclid(360.0);
    let a = s * l.min(1.0 - l);
    let f = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
    };
    [f(0.0), f(8.0), f(4.0)]
}

fn hue_and_extremes(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let hue = if d == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / d).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / d + 2.0)
    } else {
        60.0 * ((r - g) / d + 4.0)
    };
    (hue.rem_euclid(360.0), min, max)
}

fn rgb_to_hsl(r: f64, g: f64, b: f64) -> [f64; 3] {
    let (h, min, max) = hue_and_extremes(r, g, b);
    let l = (max + min) / 2.0;
    let s = if max == min || l == 0.0 || l == 1.0 {
        0.0
    } else {
        (max - l) / l.min(1.0 - l)
    };
    [h, s * 100.0, l * 100.0]
}

fn hwb_to_rgb(h: f64, w: f64, b: f64) -> [f64; 3] {
    if w + b >= 1.0 {
        let gray = w / (w + b);
        return [gray, gray, gray];
    }
    let [r, g, bl] = hsl_to_rgb(h, 1.0, 0.5);
    let scale = 1.0 - w - b;
    [r * scale + w, g * scale + w, bl * scale + w]
}

fn rgb_to_hwb(r: f64, g: f64, b: f64) -> [f64; 3] {
    let (h, min, max) = hue_and_extremes(r, g, b);
    [h, min * 100.0, (1.0 - max) * 100.0]
}

/// Parses a CSS color literal: hex, `rgb()`/`rgba()` or `hsl()`/`hsla()`.
///
/// Named colors are not recognized.
pub fn parse_css_color(input: &str) -> Option<Color> {
    let s = input.trim().to_ascii_lowercase();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let (name, args) = s.split_once('(')?;
    let args = args.strip_suffix(')')?;
    let parts = split_args(args)?;
    match name.trim() {
        "rgb" | "rgba" => {
            let [r, g, b, a] = parts;
            Some(Color {
                space: ColorSpace::Srgb,
                components: [
                    channel(r?, 255.0)?,
                    channel(g?, 255.0)?,
                    channel(b?, 255.0)?,
                ],
                alpha: a.map(alpha).unwrap_or(Some(1.0))?,
            })
        }
        "hsl" | "hsla" => {
            let [h, sat, light, a] = parts;
            let hue = h?.trim_end_matches("deg").parse::<f64>().ok()?;
            Some(Color {
                space: ColorSpace::Hsl,
                components: [hue, percent(sat?)?, percent(light?)?],
                alpha: a.map(alpha).unwrap_or(Some(1.0))?,
            })
        }
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digits: Vec<u8> = match hex.len() {
        3 | 4 => hex
            .chars()
            .map(|c| u8::from_str_radix(&format!("{c}{c}"), 16).ok())
            .collect::<Option<_>>()?,
        6 | 8 => (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
            .collect::<Option<_>>()?,
        _ => return None,
    };
    let f = |v: u8| f64::from(v) / 255.0;
    Some(Color {
        space: ColorSpace::Srgb,
        components: [f(digits[0]), f(digits[1]), f(digits[2])],
        alpha: digits.get(3).map(|a| f(*a)).unwrap_or(1.0),
    })
}

/// Splits `a, b, c` / `a b c / d` into up to four arguments.
fn split_args(args: &str) -> Option<[Option<&str>; 4]> {
    let (main, slash_alpha) = match args.split_once('/') {
        Some((main, a)) => (main, Some(a.trim())),
        None => (args, None),
    };
    let parts: Vec<&str> = if main.contains(',') {
        main.split(',').map(str::trim).collect()
    } else {
        main.split_whitespace().collect()
    };
    if parts.len() < 3 || parts.len() > 4 || (parts.len() == 4 && slash_alpha.is_some()) {
        return None;
    }
    Some([
        parts.first().copied(),
        parts.get(1).copied(),
        parts.get(2).copied(),
        parts.get(3).copied().or(slash_alpha),
    ])
}

fn channel(raw: &str, scale: f64) -> Option<f64> {
    let value = match raw.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0,
        None => raw.parse::<f64>().ok()? / scale,
    };
    value.is_finite().then_some(value)
}

fn percent(raw: &str) -> Option<f64> {
    let value = raw.trim_end_matches('%').trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

fn alpha(raw: &str) -> Option<f64> {
    channel(raw, 1.0).map(|a| a.clamp(0.0, 1.0))
}
