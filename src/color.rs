// Packed colour helpers. Every pixel is 0x00RRGGBB, the layout minifb expects.

/// Pack three 8-bit channels. Callers keep r,g,b inside 0..=255.
#[inline]
pub fn encode(r: u32, g: u32, b: u32) -> u32 {
    (r << 16) | (g << 8) | b
}

#[inline]
pub fn decode(color: u32) -> (u32, u32, u32) {
    ((color >> 16) & 0xFF, (color >> 8) & 0xFF, color & 0xFF)
}

/// Scale every channel by `ratio` (below 1 darkens, above 1 lightens).
pub fn darken(color: u32, ratio: f64) -> u32 {
    let (r, g, b) = decode(color);
    let scale = |c: u32| (c as f64 * ratio).round().clamp(0.0, 255.0) as u32;
    encode(scale(r), scale(g), scale(b))
}

const HIGH_BITS: u32 = 0x8080_8080;
const LOW_BITS: u32 = 0x7F7F_7F7F;

/// Byte-lane saturating add on the whole word.
///
/// The four bytes are added as independent lanes (SWAR): the low 7 bits are summed
/// without crossing lanes, the top bit of each lane is recombined by xor, and any
/// lane that carried out is forced to 0xFF.
#[inline]
pub fn saturating_add(a: u32, b: u32) -> u32 {
    let low = (a & LOW_BITS) + (b & LOW_BITS);
    let sum = low ^ ((a ^ b) & HIGH_BITS);
    let carry = ((a & b) | ((a | b) & low)) & HIGH_BITS;
    // 0x80 -> 0xFF in every lane that overflowed
    let mask = (carry >> 7) * 0xFF;
    sum | mask
}

/// Per-channel reference for [`saturating_add`].
pub fn saturating_add_scalar(a: u32, b: u32) -> u32 {
    let (ar, ag, ab) = decode(a);
    let (br, bg, bb) = decode(b);
    encode((ar + br).min(255), (ag + bg).min(255), (ab + bb).min(255))
}
