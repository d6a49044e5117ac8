/// Decode a limited-range YCbCr sample to normalized RGBA.
///
/// Applies the BT.601 video-range conversion:
///
/// * R: `1.164 * (Y - 16) + 1.596 * (Cr - 128)`
/// * G: `1.164 * (Y - 16) - 0.392 * (Cb - 128) - 0.813 * (Cr - 128)`
/// * B: `1.164 * (Y - 16) + 2.017 * (Cb - 128)`
///
/// Each channel is clamped to [0, 255] and scaled to [0, 1]; alpha is fixed
/// at 1.0. The conversion is total over the 8-bit input domain.
///
/// # Example
///
/// ```
/// use lidarfuse_image::rgba_from_ycbcr;
///
/// let black = rgba_from_ycbcr(16, 128, 128);
/// assert_eq!(black, [0.0, 0.0, 0.0, 1.0]);
/// ```
pub fn rgba_from_ycbcr(y: u8, cb: u8, cr: u8) -> [f32; 4] {
    let y = y as f32 - 16.0;
    let cb = cb as f32 - 128.0;
    let cr = cr as f32 - 128.0;

    let r = 1.164 * y + 1.596 * cr;
    let g = 1.164 * y - 0.392 * cb - 0.813 * cr;
    let b = 1.164 * y + 2.017 * cb;

    [normalize(r), normalize(g), normalize(b), 1.0]
}

#[inline]
fn normalize(channel: f32) -> f32 {
    channel.clamp(0.0, 255.0) / 255.0
}
