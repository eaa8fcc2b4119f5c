//! Color Codec
//!
//! Decodes the two textual color encodings used by screen commands into a
//! surface-agnostic RGBA [`Color`]:
//!
//! - [`decode_argb`] handles the `ARGB` field: either `#` followed by a hex
//!   byte sequence (`AARRGGBB...`) or a packed 32-bit decimal integer.
//! - [`decode_hex`] handles the `Foreground` field: a plain `#RRGGBB` or
//!   `#AARRGGBB` hex string.
//!
//! The two entry points are never interchangeable. Only the `ARGB` encoding
//! treats a zero alpha byte as "alpha unspecified" and promotes it to opaque.

use serde::{Deserialize, Serialize};

/// Surface-agnostic RGBA color
///
/// # Examples
///
/// ```
/// use screen_core::color::Color;
///
/// let red = Color::rgb(255, 0, 0);
/// assert_eq!(red.a, 255);
///
/// let clear = Color::transparent();
/// assert!(clear.is_transparent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0=transparent, 255=opaque)
    pub a: u8,
}

impl Color {
    /// Opaque white, the default text and line stroke color
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    /// Opaque mid gray, the default rectangle fill
    pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);

    /// Create a fully opaque color from RGB components
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha channel
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from alpha-first components
    #[must_use]
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully transparent color
    #[must_use]
    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    /// Check if this color is fully transparent
    #[must_use]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Check if this color is fully opaque
    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Convert to an alpha-first hex string (`#AARRGGBB`)
    ///
    /// The output is accepted by [`decode_hex`].
    ///
    /// # Examples
    ///
    /// ```
    /// use screen_core::color::Color;
    ///
    /// assert_eq!(Color::rgba(0x11, 0x22, 0x33, 0x80).to_hex(), "#80112233");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }

    /// Build a color from alpha-first components, promoting a zero alpha to opaque
    const fn with_unspecified_alpha(a: u8, r: u8, g: u8, b: u8) -> Self {
        let a = if a == 0 { 255 } else { a };
        Self::argb(a, r, g, b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::transparent()
    }
}

/// Decode an `ARGB` color specification
///
/// Two encodings are accepted:
///
/// - `#` followed by hex digits. The digits are decoded as a byte sequence and
///   at least four bytes are required; the first four are read as alpha, red,
///   green, blue. Further bytes are ignored.
/// - Anything else is parsed as an unsigned 32-bit decimal integer and split
///   from the most significant byte down into alpha, red, green, blue.
///
/// In both encodings an alpha byte of zero means "alpha unspecified" and is
/// decoded as fully opaque.
///
/// Returns `None` for blank, non-hex, too-short or non-numeric input.
///
/// # Examples
///
/// ```
/// use screen_core::color::{decode_argb, Color};
///
/// assert_eq!(decode_argb("#00112233"), Some(Color::argb(255, 0x11, 0x22, 0x33)));
/// assert_eq!(decode_argb("4278190335"), Some(Color::argb(255, 0, 0, 255)));
/// assert_eq!(decode_argb("#123"), None);
/// ```
#[must_use]
pub fn decode_argb(spec: &str) -> Option<Color> {
    let spec = spec.trim();
    if spec.is_empty() {
        return None;
    }

    if let Some(digits) = spec.strip_prefix('#') {
        let bytes = hex::decode(digits).ok()?;
        if bytes.len() > 3 {
            return Some(Color::with_unspecified_alpha(
                bytes[0], bytes[1], bytes[2], bytes[3],
            ));
        }
        return None;
    }

    let packed: u32 = spec.parse().ok()?;
    let [a, r, g, b] = packed.to_be_bytes();
    Some(Color::with_unspecified_alpha(a, r, g, b))
}

/// Decode a plain hex color (`#RRGGBB` or `#AARRGGBB`)
///
/// Every `#` is stripped. Only the trailing eight digits are considered: the
/// last six are red, green and blue, and when at least eight digits remain the
/// two before them are alpha. With six or seven digits alpha is fully opaque.
/// A zero alpha stays transparent here.
///
/// Returns `None` when fewer than six digits remain or any digit is not hex.
///
/// # Examples
///
/// ```
/// use screen_core::color::{decode_hex, Color};
///
/// assert_eq!(decode_hex("#FF8000"), Some(Color::rgb(0xFF, 0x80, 0x00)));
/// assert_eq!(decode_hex("#00FF8000"), Some(Color::rgba(0xFF, 0x80, 0x00, 0)));
/// assert_eq!(decode_hex("#FFF"), None);
/// ```
#[must_use]
pub fn decode_hex(spec: &str) -> Option<Color> {
    let digits: String = spec.chars().filter(|c| *c != '#').collect();
    if digits.len() < 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let len = digits.len();
    let pair = |end: usize| u8::from_str_radix(&digits[end - 2..end], 16).ok();

    let a = if len >= 8 { pair(len - 6)? } else { 255 };
    let r = pair(len - 4)?;
    let g = pair(len - 2)?;
    let b = pair(len)?;
    Some(Color::argb(a, r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hex_zero_alpha_means_opaque() {
        let color = decode_argb("#00112233").unwrap();
        assert_eq!(color, Color::argb(255, 0x11, 0x22, 0x33));
    }

    #[test]
    fn test_hex_explicit_alpha_kept() {
        assert_eq!(
            decode_argb("#FF112233"),
            Some(Color::argb(0xFF, 0x11, 0x22, 0x33))
        );
        assert_eq!(
            decode_argb("#80112233"),
            Some(Color::argb(0x80, 0x11, 0x22, 0x33))
        );
    }

    #[test]
    fn test_hex_extra_bytes_ignored() {
        assert_eq!(
            decode_argb("#8011223344"),
            Some(Color::argb(0x80, 0x11, 0x22, 0x33))
        );
    }

    #[test]
    fn test_hex_too_short_or_invalid() {
        assert_eq!(decode_argb("#112233"), None);
        assert_eq!(decode_argb("#1234"), None);
        assert_eq!(decode_argb("#GG112233"), None);
        assert_eq!(decode_argb("#0011223"), None); // odd digit count
        assert_eq!(decode_argb("#"), None);
    }

    #[test]
    fn test_decimal_packed_byte_order() {
        // 0xFF0000FF
        let color = decode_argb("4278190335").unwrap();
        assert_eq!(color.a, 255);
        assert_eq!(color.r, 0);
        assert_eq!(color.g, 0);
        assert_eq!(color.b, 255);

        // 0x80102030
        assert_eq!(
            decode_argb("2148540464"),
            Some(Color::argb(0x80, 0x10, 0x20, 0x30))
        );
    }

    #[test]
    fn test_decimal_zero_alpha_means_opaque() {
        // 0x00112233
        assert_eq!(
            decode_argb("1122867"),
            Some(Color::argb(255, 0x11, 0x22, 0x33))
        );
        assert_eq!(decode_argb("0"), Some(Color::argb(255, 0, 0, 0)));
    }

    #[test]
    fn test_decimal_unparsable() {
        assert_eq!(decode_argb("red"), None);
        assert_eq!(decode_argb("-1"), None);
        assert_eq!(decode_argb("4294967296"), None); // u32::MAX + 1
        assert_eq!(decode_argb(""), None);
        assert_eq!(decode_argb("   "), None);
    }

    #[test]
    fn test_plain_hex_rgb() {
        assert_eq!(decode_hex("#102030"), Some(Color::rgb(0x10, 0x20, 0x30)));
        assert_eq!(decode_hex("102030"), Some(Color::rgb(0x10, 0x20, 0x30)));
        assert_eq!(decode_hex("#abcdef"), Some(Color::rgb(0xAB, 0xCD, 0xEF)));
    }

    #[test]
    fn test_plain_hex_alpha_first() {
        assert_eq!(
            decode_hex("#80102030"),
            Some(Color::argb(0x80, 0x10, 0x20, 0x30))
        );
        // No zero-alpha promotion on this entry point
        assert_eq!(decode_hex("#00102030"), Some(Color::rgba(0x10, 0x20, 0x30, 0)));
    }

    #[test]
    fn test_plain_hex_seven_digits_is_opaque() {
        assert_eq!(decode_hex("#7102030"), Some(Color::rgb(0x10, 0x20, 0x30)));
    }

    #[test]
    fn test_plain_hex_rejects_short_and_invalid() {
        assert_eq!(decode_hex("#FFF"), None);
        assert_eq!(decode_hex("#12345"), None);
        assert_eq!(decode_hex("#12345G"), None);
        assert_eq!(decode_hex("#ééé"), None);
    }

    #[test]
    fn test_plain_hex_rejects_signs() {
        assert_eq!(decode_hex("#+F+F+F"), None);
        assert_eq!(decode_hex("#FF+1+2+3"), None);
        assert_eq!(decode_hex("#-10203"), None);
    }

    #[test]
    fn test_to_hex_round_trips_through_plain_decoder() {
        let color = Color::argb(0x40, 0x01, 0x02, 0x03);
        assert_eq!(decode_hex(&color.to_hex()), Some(color));
    }
}
