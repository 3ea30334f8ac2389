//! RGB color value type and the named palette.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced when parsing a textual color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    /// The text does not start with `#`.
    #[error("invalid color representation: \"{text}\" should start with \"#\"")]
    MissingHash { text: String },

    /// The text is neither 7 (`#rrggbb`) nor 9 (`#rrggbbaa`) characters long.
    #[error("invalid color representation: \"{text}\" should be a length of 7 or 9")]
    InvalidLength { text: String },

    /// A channel is not a two-digit hexadecimal number.
    #[error("invalid color representation: \"{text}\" has a malformed hex channel \"{channel}\"")]
    InvalidChannel { text: String, channel: String },
}

/// An immutable RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Creates a color from its three channels.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`. The alpha pair is accepted but ignored.
    pub fn parse(text: &str) -> Result<Self, ParseColorError> {
        if !text.starts_with('#') {
            return Err(ParseColorError::MissingHash {
                text: text.to_string(),
            });
        }
        if text.len() != 7 && text.len() != 9 {
            return Err(ParseColorError::InvalidLength {
                text: text.to_string(),
            });
        }

        let channel = |range: std::ops::Range<usize>| -> Result<u8, ParseColorError> {
            let invalid = || ParseColorError::InvalidChannel {
                text: text.to_string(),
                channel: text.get(range.clone()).unwrap_or_default().to_string(),
            };
            let digits = text.get(range.clone()).ok_or_else(invalid)?;
            if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            u8::from_str_radix(digits, 16).map_err(|_| invalid())
        };

        Ok(Self {
            red: channel(1..3)?,
            green: channel(3..5)?,
            blue: channel(5..7)?,
        })
    }

    /// Overlays two colors: channel-wise sum clamped at 255.
    pub fn overlay(self, other: Color) -> Color {
        Color {
            red: self.red.saturating_add(other.red),
            green: self.green.saturating_add(other.green),
            blue: self.blue.saturating_add(other.blue),
        }
    }

    /// Subtracts a color: channel-wise difference clamped at 0.
    pub fn subtract(self, other: Color) -> Color {
        Color {
            red: self.red.saturating_sub(other.red),
            green: self.green.saturating_sub(other.green),
            blue: self.blue.saturating_sub(other.blue),
        }
    }

    /// Returns the lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        self.overlay(rhs)
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, rhs: Color) -> Color {
        self.subtract(rhs)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Default palette for stacking same-type series (disks) on one chart.
pub const STACK_COLORS: [Color; 14] = [
    Color::new(0xe0, 0x00, 0x00),
    Color::new(0xe0, 0x60, 0x00),
    Color::new(0xe0, 0xc0, 0x00),
    Color::new(0xa0, 0xe0, 0x00),
    Color::new(0x40, 0xe0, 0x00),
    Color::new(0x00, 0xe0, 0x20),
    Color::new(0x00, 0xe0, 0x80),
    Color::new(0x00, 0xe0, 0xe0),
    Color::new(0x00, 0x80, 0xe0),
    Color::new(0x00, 0x20, 0xe0),
    Color::new(0x40, 0x00, 0xe0),
    Color::new(0xa0, 0x00, 0xe0),
    Color::new(0xe0, 0x00, 0xc0),
    Color::new(0xe0, 0x00, 0x60),
];

// Named colors (X11/CSS set).
pub const LIGHTCORAL: Color = Color::new(240, 128, 128);
pub const ROSYBROWN: Color = Color::new(188, 143, 143);
pub const INDIANRED: Color = Color::new(205, 92, 92);
pub const RED: Color = Color::new(255, 0, 0);
pub const FIREBRICK: Color = Color::new(178, 34, 34);
pub const BROWN: Color = Color::new(165, 42, 42);
pub const DARKRED: Color = Color::new(139, 0, 0);
pub const MAROON: Color = Color::new(128, 0, 0);
pub const MISTYROSE: Color = Color::new(255, 228, 225);
pub const SALMON: Color = Color::new(250, 128, 114);
pub const TOMATO: Color = Color::new(255, 99, 71);
pub const DARKSALMON: Color = Color::new(233, 150, 122);
pub const CORAL: Color = Color::new(255, 127, 80);
pub const ORANGERED: Color = Color::new(255, 69, 0);
pub const LIGHTSALMON: Color = Color::new(255, 160, 122);
pub const SIENNA: Color = Color::new(160, 82, 45);
pub const SEASHELL: Color = Color::new(255, 245, 238);
pub const CHOCOLATE: Color = Color::new(210, 105, 30);
pub const SADDLEBROWN: Color = Color::new(139, 69, 19);
pub const SANDYBROWN: Color = Color::new(244, 164, 96);
pub const PEACHPUFF: Color = Color::new(255, 218, 185);
pub const PERU: Color = Color::new(205, 133, 63);
pub const LINEN: Color = Color::new(250, 240, 230);
pub const BISQUE: Color = Color::new(255, 228, 196);
pub const DARKORANGE: Color = Color::new(255, 140, 0);
pub const BURLYWOOD: Color = Color::new(222, 184, 135);
pub const ANTIQUEWHITE: Color = Color::new(250, 235, 215);
pub const TAN: Color = Color::new(210, 180, 140);
pub const NAVAJOWHITE: Color = Color::new(255, 222, 173);
pub const BLANCHEDALMOND: Color = Color::new(255, 235, 205);
pub const PAPAYAWHIP: Color = Color::new(255, 239, 213);
pub const MOCCASIN: Color = Color::new(255, 228, 181);
pub const ORANGE: Color = Color::new(255, 165, 0);
pub const WHEAT: Color = Color::new(245, 222, 179);
pub const OLDLACE: Color = Color::new(253, 245, 230);
pub const FLORALWHITE: Color = Color::new(255, 250, 240);
pub const DARKGOLDENROD: Color = Color::new(184, 134, 11);
pub const GOLDENROD: Color = Color::new(218, 165, 32);
pub const CORNSILK: Color = Color::new(255, 248, 220);
pub const GOLD: Color = Color::new(255, 215, 0);
pub const LEMONCHIFFON: Color = Color::new(255, 250, 205);
pub const KHAKI: Color = Color::new(240, 230, 140);
pub const PALEGOLDENROD: Color = Color::new(238, 232, 170);
pub const DARKKHAKI: Color = Color::new(189, 183, 107);
pub const IVORY: Color = Color::new(255, 255, 240);
pub const LIGHTYELLOW: Color = Color::new(255, 255, 224);
pub const BEIGE: Color = Color::new(245, 245, 220);
pub const LIGHTGOLDENRODYELLOW: Color = Color::new(250, 250, 210);
pub const YELLOW: Color = Color::new(255, 255, 0);
pub const OLIVE: Color = Color::new(128, 128, 0);
pub const OLIVEDRAB: Color = Color::new(107, 142, 35);
pub const YELLOWGREEN: Color = Color::new(154, 205, 50);
pub const DARKOLIVEGREEN: Color = Color::new(85, 107, 47);
pub const GREENYELLOW: Color = Color::new(173, 255, 47);
pub const CHARTREUSE: Color = Color::new(127, 255, 0);
pub const LAWNGREEN: Color = Color::new(124, 252, 0);
pub const DARKSEAGREEN: Color = Color::new(143, 188, 139);
pub const HONEYDEW: Color = Color::new(240, 255, 240);
pub const PALEGREEN: Color = Color::new(152, 251, 152);
pub const LIGHTGREEN: Color = Color::new(144, 238, 144);
pub const LIME: Color = Color::new(0, 255, 0);
pub const LIMEGREEN: Color = Color::new(50, 205, 50);
pub const FORESTGREEN: Color = Color::new(34, 139, 34);
pub const GREEN: Color = Color::new(0, 128, 0);
pub const DARKGREEN: Color = Color::new(0, 100, 0);
pub const SEAGREEN: Color = Color::new(46, 139, 87);
pub const MEDIUMSEAGREEN: Color = Color::new(60, 179, 113);
pub const SPRINGGREEN: Color = Color::new(0, 255, 127);
pub const MINTCREAM: Color = Color::new(245, 255, 250);
pub const MEDIUMSPRINGGREEN: Color = Color::new(0, 250, 154);
pub const MEDIUMAQUAMARINE: Color = Color::new(102, 205, 170);
pub const AQUAMARINE: Color = Color::new(127, 255, 212);
pub const TURQUOISE: Color = Color::new(64, 224, 208);
pub const LIGHTSEAGREEN: Color = Color::new(32, 178, 170);
pub const MEDIUMTURQUOISE: Color = Color::new(72, 209, 204);
pub const AZURE: Color = Color::new(240, 255, 255);
pub const LIGHTCYAN: Color = Color::new(224, 255, 255);
pub const PALETURQUOISE: Color = Color::new(175, 238, 238);
pub const AQUA: Color = Color::new(0, 255, 255);
pub const CYAN: Color = Color::new(0, 255, 255);
pub const DARKCYAN: Color = Color::new(0, 139, 139);
pub const TEAL: Color = Color::new(0, 128, 128);
pub const DARKSLATEGRAY: Color = Color::new(47, 79, 79);
pub const DARKTURQUOISE: Color = Color::new(0, 206, 209);
pub const CADETBLUE: Color = Color::new(95, 158, 160);
pub const POWDERBLUE: Color = Color::new(176, 224, 230);
pub const LIGHTBLUE: Color = Color::new(173, 216, 230);
pub const DEEPSKYBLUE: Color = Color::new(0, 191, 255);
pub const SKYBLUE: Color = Color::new(135, 206, 235);
pub const LIGHTSKYBLUE: Color = Color::new(135, 206, 250);
pub const STEELBLUE: Color = Color::new(70, 130, 180);
pub const ALICEBLUE: Color = Color::new(240, 248, 255);
pub const DODGERBLUE: Color = Color::new(30, 144, 255);
pub const LIGHTSLATEGRAY: Color = Color::new(119, 136, 153);
pub const SLATEGRAY: Color = Color::new(112, 128, 144);
pub const LIGHTSTEELBLUE: Color = Color::new(176, 196, 222);
pub const CORNFLOWERBLUE: Color = Color::new(100, 149, 237);
pub const ROYALBLUE: Color = Color::new(65, 105, 225);
pub const GHOSTWHITE: Color = Color::new(248, 248, 255);
pub const LAVENDER: Color = Color::new(230, 230, 250);
pub const BLUE: Color = Color::new(0, 0, 255);
pub const MEDIUMBLUE: Color = Color::new(0, 0, 205);
pub const DARKBLUE: Color = Color::new(0, 0, 139);
pub const MIDNIGHTBLUE: Color = Color::new(25, 25, 112);
pub const NAVY: Color = Color::new(0, 0, 128);
pub const SLATEBLUE: Color = Color::new(106, 90, 205);
pub const DARKSLATEBLUE: Color = Color::new(72, 61, 139);
pub const MEDIUMSLATEBLUE: Color = Color::new(123, 104, 238);
pub const MEDIUMPURPLE: Color = Color::new(147, 112, 219);
pub const BLUEVIOLET: Color = Color::new(138, 43, 226);
pub const INDIGO: Color = Color::new(75, 0, 130);
pub const DARKORCHID: Color = Color::new(153, 50, 204);
pub const DARKVIOLET: Color = Color::new(148, 0, 211);
pub const MEDIUMORCHID: Color = Color::new(186, 85, 211);
pub const THISTLE: Color = Color::new(216, 191, 216);
pub const PLUM: Color = Color::new(221, 160, 221);
pub const VIOLET: Color = Color::new(238, 130, 238);
pub const FUCHSIA: Color = Color::new(255, 0, 255);
pub const MAGENTA: Color = Color::new(255, 0, 255);
pub const DARKMAGENTA: Color = Color::new(139, 0, 139);
pub const PURPLE: Color = Color::new(128, 0, 128);
pub const ORCHID: Color = Color::new(218, 112, 214);
pub const MEDIUMVIOLETRED: Color = Color::new(199, 21, 133);
pub const DEEPPINK: Color = Color::new(255, 20, 147);
pub const HOTPINK: Color = Color::new(255, 105, 180);
pub const LAVENDERBLUSH: Color = Color::new(255, 240, 245);
pub const PALEVIOLETRED: Color = Color::new(219, 112, 147);
pub const CRIMSON: Color = Color::new(220, 20, 60);
pub const PINK: Color = Color::new(255, 192, 203);
pub const LIGHTPINK: Color = Color::new(255, 182, 193);
pub const WHITE: Color = Color::new(255, 255, 255);
pub const SNOW: Color = Color::new(255, 250, 250);
pub const WHITESMOKE: Color = Color::new(245, 245, 245);
pub const GAINSBORO: Color = Color::new(220, 220, 220);
pub const LIGHTGRAY: Color = Color::new(211, 211, 211);
pub const SILVER: Color = Color::new(192, 192, 192);
pub const DARKGRAY: Color = Color::new(169, 169, 169);
pub const GRAY: Color = Color::new(128, 128, 128);
pub const DIMGRAY: Color = Color::new(105, 105, 105);
pub const BLACK: Color = Color::new(0, 0, 0);
