//! Relief (height) images turned into tangent-space normal maps, so a PBR
//! material without a bump slot can still shade terrain.

/// Encode a normal map from an 8-bit height field stored row-major.
///
/// `strength` scales the height gradient measured in pixels; output is RGBA8
/// with `(128, 128, 255)` for flat areas. Edges clamp, the horizontal seam
/// wraps since the source is an equirectangular world map.
pub fn height_to_normal_map(width: usize, height: usize, heights: &[u8], strength: f32) -> Vec<u8> {
    let mut out = Vec::with_capacity(width * height * 4);
    if width == 0 || height == 0 || heights.len() < width * height {
        return out;
    }

    let sample = |x: isize, y: isize| -> f32 {
        let x = x.rem_euclid(width as isize) as usize;
        let y = y.clamp(0, height as isize - 1) as usize;
        heights[y * width + x] as f32 / 255.0
    };

    for y in 0..height as isize {
        for x in 0..width as isize {
            let dx = (sample(x + 1, y) - sample(x - 1, y)) * 0.5 * 255.0 * strength;
            let dy = (sample(x, y + 1) - sample(x, y - 1)) * 0.5 * 255.0 * strength;
            let (nx, ny, nz) = normalize(-dx, dy, 1.0);
            out.extend_from_slice(&[encode(nx), encode(ny), encode(nz), 255]);
        }
    }
    out
}

/// Pull one height byte per pixel out of interleaved image data.
pub fn extract_channel(data: &[u8], bytes_per_pixel: usize, channel: usize) -> Vec<u8> {
    if bytes_per_pixel == 0 || channel >= bytes_per_pixel {
        return Vec::new();
    }
    data.chunks_exact(bytes_per_pixel).map(|px| px[channel]).collect()
}

fn normalize(x: f32, y: f32, z: f32) -> (f32, f32, f32) {
    let len = (x * x + y * y + z * z).sqrt();
    (x / len, y / len, z / len)
}

fn encode(component: f32) -> u8 {
    ((component * 0.5 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8
}
