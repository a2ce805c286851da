//! Synthetic wave-forecast data for tests.
//!
//! All grids are row-major with row 0 at the northern edge, matching the
//! dataset layout. Series are `[time, row, col]`.

/// Creates a wave period grid in seconds.
///
/// Periods grow from 1 s in the north-west corner to 15 s in the
/// south-east corner, so every contour level in `2..=13` is crossed and
/// both colour extensions are exercised.
pub fn create_wave_period_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x = col as f32 / (width.max(2) - 1) as f32;
            let y = row as f32 / (height.max(2) - 1) as f32;
            data.push(1.0 + 14.0 * (0.5 * x + 0.5 * y));
        }
    }
    data
}

/// Creates `steps` wave period grids, each shifted by `step * 0.5` s.
pub fn create_wave_period_series(width: usize, height: usize, steps: usize) -> Vec<f32> {
    let base = create_wave_period_grid(width, height);
    let mut data = Vec::with_capacity(base.len() * steps);
    for step in 0..steps {
        data.extend(base.iter().map(|v| v + step as f32 * 0.5));
    }
    data
}

/// Creates a mean wave direction grid in degrees (0..360, clockwise from north).
///
/// Direction rotates with the column and shifts with the row so that
/// arrows point every way across the map.
pub fn create_wave_direction_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let deg = (col as f32 * 360.0 / width.max(1) as f32 + row as f32 * 15.0) % 360.0;
            data.push(deg);
        }
    }
    data
}

/// Creates `steps` direction grids, each rotated by `step * 30` degrees.
pub fn create_wave_direction_series(width: usize, height: usize, steps: usize) -> Vec<f32> {
    let base = create_wave_direction_grid(width, height);
    let mut data = Vec::with_capacity(base.len() * steps);
    for step in 0..steps {
        data.extend(base.iter().map(|v| (v + step as f32 * 30.0) % 360.0));
    }
    data
}

/// Creates a land mask: `true` for land cells.
///
/// Land occupies the north-east quarter of the grid plus the southernmost
/// row, which gives both an interior coastline and an edge coastline.
pub fn create_land_mask(width: usize, height: usize) -> Vec<bool> {
    let mut mask = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let north_east = row < height / 4 && col >= width - width / 4;
            let south_edge = row + 1 == height;
            mask.push(north_east || south_edge);
        }
    }
    mask
}

/// Sets every land cell to NaN in each step of a `[time, row, col]` series.
pub fn apply_land_mask(values: &mut [f32], mask: &[bool]) {
    if mask.is_empty() {
        return;
    }
    for step in values.chunks_mut(mask.len()) {
        for (value, &land) in step.iter_mut().zip(mask) {
            if land {
                *value = f32::NAN;
            }
        }
    }
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates RGBA pixels with a smooth gradient (many unique colours).
pub fn create_gradient_rgba_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let r = ((x as f32 / width as f32) * 255.0) as u8;
            let g = ((y as f32 / height as f32) * 255.0) as u8;
            pixels.extend_from_slice(&[r, g, 128, 255]);
        }
    }
    pixels
}

/// Creates RGBA pixels using a 12-colour period-like palette plus
/// transparent cells, suitable for indexed PNG encoding.
pub fn create_period_palette_pixels(width: usize, height: usize) -> Vec<u8> {
    let palette: [(u8, u8, u8); 12] = [
        (0x4b, 0x8b, 0xd6),
        (0x3c, 0xa8, 0xd8),
        (0x36, 0xc0, 0xb4),
        (0x4c, 0xd0, 0x7b),
        (0x8c, 0xd8, 0x46),
        (0xc8, 0xdc, 0x35),
        (0xf0, 0xd2, 0x2d),
        (0xf6, 0xa8, 0x2a),
        (0xf1, 0x7b, 0x2b),
        (0xe2, 0x4d, 0x31),
        (0xc2, 0x2c, 0x3f),
        (0x93, 0x1f, 0x4f),
    ];

    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            if x == 0 {
                pixels.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let idx = ((x as f32 / width as f32 * 0.3 + y as f32 / height as f32 * 0.7) * 11.0)
                as usize;
            let (r, g, b) = palette[idx.min(11)];
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    pixels
}
