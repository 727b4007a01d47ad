//! CSS colour strings as accepted by the widget query parameters

/// An sRGB colour with 8-bit alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("aqua", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("fuchsia", (255, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("silver", (192, 192, 192)),
    ("maroon", (128, 0, 0)),
    ("olive", (128, 128, 0)),
    ("navy", (0, 0, 128)),
    ("purple", (128, 0, 128)),
    ("teal", (0, 128, 128)),
    ("orange", (255, 165, 0)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
];

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0, 0, 0);
    /// Fully transparent white
    pub const TRANSPARENT: Colour = Colour {
        r: 255,
        g: 255,
        b: 255,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS colour: hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`),
    /// `rgb()`/`rgba()`, a basic named colour or `transparent`
    pub fn parse_css(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_function(args);
        }
        if s == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        NAMED
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, (r, g, b))| Self::rgb(*r, *g, *b))
    }

    /// Parse `input` if present, otherwise (or when unparsable) use `fallback`
    pub fn parse_or(input: Option<&str>, fallback: Colour) -> Colour {
        input.and_then(Self::parse_css).unwrap_or(fallback)
    }

    /// `#rrggbb` without alpha, for SVG `fill` attributes
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0..=1 value with at most three decimals
    pub fn opacity(&self) -> String {
        let value = (self.a as f64 / 255.0 * 1000.0).round() / 1000.0;
        format!("{}", value)
    }
}

fn parse_hex(hex: &str) -> Option<Colour> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Colour::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Colour {
            a: nibble(3)?,
            ..Colour::rgb(nibble(0)?, nibble(1)?, nibble(2)?)
        }),
        6 => Some(Colour::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Colour {
            a: byte(6)?,
            ..Colour::rgb(byte(0)?, byte(2)?, byte(4)?)
        }),
        _ => None,
    }
}

fn parse_rgb_function(args: &str) -> Option<Colour> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    let (channels, alpha) = match parts.len() {
        3 => (&parts[..3], None),
        4 => (&parts[..3], Some(parts[3])),
        _ => return None,
    };

    let channel = |p: &str| -> Option<u8> {
        let value = match p.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 2.55,
            None => p.parse::<f64>().ok()?,
        };
        value.is_finite().then(|| value.round().clamp(0.0, 255.0) as u8)
    };

    let a = match alpha {
        None => 255,
        Some(p) => {
            let value = match p.strip_suffix('%') {
                Some(pct) => pct.parse::<f64>().ok()? / 100.0,
                None => p.parse::<f64>().ok()?,
            };
            if !value.is_finite() {
                return None;
            }
            (value.clamp(0.0, 1.0) * 255.0).round() as u8
        }
    };

    Some(Colour {
        r: channel(channels[0])?,
        g: channel(channels[1])?,
        b: channel(channels[2])?,
        a,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(Colour::parse_css("#000"), Some(Colour::BLACK));
        assert_eq!(Colour::parse_css("#C4D1DE"), Some(Colour::rgb(0xc4, 0xd1, 0xde)));
        assert_eq!(
            Colour::parse_css("#ff000080"),
            Some(Colour {
                r: 255,
                g: 0,
                b: 0,
                a: 128
            })
        );
        assert_eq!(Colour::parse_css("#fff0").map(|c| c.a), Some(0));
    }

    #[test]
    fn test_rgb_functions() {
        assert_eq!(Colour::parse_css("rgb(1, 2, 3)"), Some(Colour::rgb(1, 2, 3)));
        assert_eq!(
            Colour::parse_css("rgba(255, 255, 255, 0)"),
            Some(Colour::TRANSPARENT)
        );
        assert_eq!(
            Colour::parse_css("rgb(100% 0% 0% / 50%)").map(|c| (c.r, c.a)),
            Some((255, 128))
        );
    }

    #[test]
    fn test_named_colours() {
        assert_eq!(Colour::parse_css("Orange"), Some(Colour::rgb(255, 165, 0)));
        assert_eq!(Colour::parse_css(" transparent "), Some(Colour::TRANSPARENT));
    }

    #[test]
    fn test_garbage_is_rejected() {
        for input in ["", "#12", "#ggg", "rgb(1,2)", "rgb(a,b,c)", "notacolour", "#1234567"] {
            assert_eq!(Colour::parse_css(input), None, "{input}");
        }
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(Colour::parse_or(None, Colour::BLACK), Colour::BLACK);
        assert_eq!(Colour::parse_or(Some("bogus"), Colour::BLACK), Colour::BLACK);
        assert_eq!(
            Colour::parse_or(Some("white"), Colour::BLACK),
            Colour::rgb(255, 255, 255)
        );
    }

    #[test]
    fn test_svg_helpers() {
        let c = Colour::parse_css("#0a0b0c80").unwrap();
        assert_eq!(c.to_hex(), "#0a0b0c");
        assert_eq!(c.opacity(), "0.502");
        assert_eq!(Colour::BLACK.opacity(), "1");
        assert_eq!(Colour::TRANSPARENT.opacity(), "0");
    }
}
