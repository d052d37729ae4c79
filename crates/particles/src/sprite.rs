//! Soft round point-sprite texture, generated at runtime so the particle
//! field can be drawn without any image assets.

/// Alpha stops along the normalized radius: opaque core fading to nothing.
const ALPHA_STOPS: [(f32, f32); 4] = [(0.0, 1.0), (0.2, 1.0), (0.4, 0.5), (1.0, 0.0)];

/// Default texture edge length in pixels.
pub const DEFAULT_SPRITE_SIZE: u32 = 64;

/// Square RGBA8 texture.
#[derive(Debug, Clone)]
pub struct SpriteTexture {
    pub size: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl Default for SpriteTexture {
    fn default() -> Self {
        Self::radial_gradient(DEFAULT_SPRITE_SIZE)
    }
}

impl SpriteTexture {
    /// White sprite whose alpha falls off radially from the centre.
    pub fn radial_gradient(size: u32) -> Self {
        let half = size as f32 / 2.0;
        let mut pixels = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - half;
                let dy = y as f32 + 0.5 - half;
                let r = (dx * dx + dy * dy).sqrt() / half.max(f32::EPSILON);
                let a = (gradient_alpha(r) * 255.0).round() as u8;
                pixels.push([255, 255, 255, a]);
            }
        }
        Self { size, pixels }
    }

    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixels[(y * self.size + x) as usize][3]
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Piecewise-linear alpha at normalized radius `r` (0 = centre, 1 = edge).
pub fn gradient_alpha(r: f32) -> f32 {
    if r <= ALPHA_STOPS[0].0 {
        return ALPHA_STOPS[0].1;
    }
    for pair in ALPHA_STOPS.windows(2) {
        let (r0, a0) = pair[0];
        let (r1, a1) = pair[1];
        if r <= r1 {
            let t = (r - r0) / (r1 - r0);
            return a0 + (a1 - a0) * t;
        }
    }
    0.0
}
