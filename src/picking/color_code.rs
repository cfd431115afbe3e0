//! Point index ⇄ RGBA8 pick color.
//!
//! The index is packed little-endian into the red, green and blue channels
//! (red holds the low byte); alpha is always 255 for a point. The picking
//! pass clears to transparent white `(255, 255, 255, 0)`, and any pixel
//! whose RGB is all ones decodes as no hit, so `0x00FF_FFFF` is never a
//! valid index. `assets/shaders/modules/pick_code.wgsl` packs the same way.

/// Largest index that can be encoded.
pub const MAX_PICK_INDEX: u32 = 0x00FF_FFFE;

/// RGBA the picking pass clears to.
pub const BACKGROUND: [u8; 4] = [255, 255, 255, 0];

/// Pick color for `index`, or `None` if it exceeds [`MAX_PICK_INDEX`].
#[must_use]
pub fn encode(index: u32) -> Option<[u8; 4]> {
    if index > MAX_PICK_INDEX {
        return None;
    }
    let [r, g, b, _] = index.to_le_bytes();
    Some([r, g, b, 255])
}

/// Index encoded in `rgba`, or `None` for the background.
#[must_use]
pub fn decode(rgba: [u8; 4]) -> Option<u32> {
    let [r, g, b, _] = rgba;
    let index = u32::from_le_bytes([r, g, b, 0]);
    (index <= MAX_PICK_INDEX).then_some(index)
}

/// How many of the first `len` points get a pick color. Points past
/// [`MAX_PICK_INDEX`] are drawn but cannot be picked.
#[must_use]
pub fn pickable_len(len: usize) -> usize {
    len.min(MAX_PICK_INDEX as usize + 1)
}

/// [`BACKGROUND`] as a `wgpu` clear color.
#[must_use]
pub fn background_clear_color() -> wgpu::Color {
    let [r, g, b, a] = BACKGROUND.map(|c| f64::from(c) / 255.0);
    wgpu::Color { r, g, b, a }
}
