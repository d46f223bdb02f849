//! Contrast-limited adaptive histogram equalization.
//!
//! The image is split into a fixed grid of tiles. Each tile gets a clipped,
//! renormalized histogram CDF; pixels are remapped by bilinear interpolation
//! between the CDFs of the four nearest tile centers, which avoids visible
//! tile seams.

use image::{GrayImage, Luma};

/// Tiles per axis. The pipeline always uses an 8x8 grid.
pub const TILE_GRID: u32 = 8;

/// Apply CLAHE with the given clip limit over a `tiles_x` x `tiles_y` grid.
///
/// `clip_limit` is expressed as a multiple of the uniform histogram level,
/// so 1.0 clips everything down to a flat histogram and larger values allow
/// proportionally more contrast.
pub fn clahe(image: &GrayImage, clip_limit: f32, tiles_x: u32, tiles_y: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let tiles_x = tiles_x.min(width).max(1) as usize;
    let tiles_y = tiles_y.min(height).max(1) as usize;
    let tile_w = width.div_ceil(tiles_x as u32);
    let tile_h = height.div_ceil(tiles_y as u32);

    // Per-tile remap tables (clipped CDFs scaled to [0, 255]).
    let mut tables = vec![[0.0f32; 256]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx as u32 * tile_w;
            let y0 = ty as u32 * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);

            let mut hist = [0u32; 256];
            let mut pixel_count = 0u32;
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[image.get_pixel(x, y)[0] as usize] += 1;
                    pixel_count += 1;
                }
            }

            clip_histogram(&mut hist, clip_limit, pixel_count);
            tables[ty * tiles_x + tx] = cdf_table(&hist);
        }
    }

    // Remap every pixel, interpolating between the four surrounding tile
    // centers. Coordinates are anchored at tile centers, so pixels outside
    // the outermost centers clamp to the edge tiles.
    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let fx = ((x as f32 + 0.5) / tile_w as f32 - 0.5)
                .clamp(0.0, (tiles_x - 1) as f32);
            let fy = ((y as f32 + 0.5) / tile_h as f32 - 0.5)
                .clamp(0.0, (tiles_y - 1) as f32);

            let tx0 = fx.floor() as usize;
            let ty0 = fy.floor() as usize;
            let tx1 = (tx0 + 1).min(tiles_x - 1);
            let ty1 = (ty0 + 1).min(tiles_y - 1);
            let wx = fx - tx0 as f32;
            let wy = fy - ty0 as f32;

            let level = image.get_pixel(x, y)[0] as usize;
            let v00 = tables[ty0 * tiles_x + tx0][level];
            let v01 = tables[ty0 * tiles_x + tx1][level];
            let v10 = tables[ty1 * tiles_x + tx0][level];
            let v11 = tables[ty1 * tiles_x + tx1][level];

            let top = v00 * (1.0 - wx) + v01 * wx;
            let bottom = v10 * (1.0 - wx) + v11 * wx;
            let value = top * (1.0 - wy) + bottom * wy;
            output.put_pixel(x, y, Luma([value.clamp(0.0, 255.0).round() as u8]));
        }
    }
    output
}

/// Clip histogram bins at `clip_limit` times the uniform level and
/// redistribute the excess uniformly across all bins.
fn clip_histogram(hist: &mut [u32; 256], clip_limit: f32, pixel_count: u32) {
    if pixel_count == 0 {
        return;
    }
    let threshold = ((clip_limit * pixel_count as f32 / 256.0) as u32).max(1);
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > threshold {
            excess += *bin - threshold;
            *bin = threshold;
        }
    }

    let increment = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += increment;
        if i < remainder {
            *bin += 1;
        }
    }
}

/// Cumulative distribution scaled to [0, 255].
fn cdf_table(hist: &[u32; 256]) -> [f32; 256] {
    let mut cdf = [0.0f32; 256];
    let mut running = 0u32;
    for (i, &bin) in hist.iter().enumerate() {
        running += bin;
        cdf[i] = running as f32;
    }
    let total = cdf[255];
    if total > 0.0 {
        for value in cdf.iter_mut() {
            *value = *value / total * 255.0;
        }
    }
    cdf
}
