use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::SpectrumMatrix;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const BAND_GRAY: Rgb<u8> = Rgb([215, 215, 215]);
const FRAME_GRAY: Rgb<u8> = Rgb([160, 160, 160]);

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// `n` visually distinct colours from evenly spaced hues.
fn generate_palette(n: usize) -> Vec<Rgb<u8>> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n.max(1) as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            Rgb([
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            ])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pixel mapping
// ---------------------------------------------------------------------------

/// Maps data coordinates into a pixel rectangle (y axis flipped).
struct Frame {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn px(&self, x: f64, y: f64) -> (f32, f32) {
        let fx = ((x - self.x_min) / (self.x_max - self.x_min)) as f32;
        let fy = ((y - self.y_min) / (self.y_max - self.y_min)) as f32;
        (
            self.left + fx * self.width,
            self.top + (1.0 - fy) * self.height,
        )
    }

    fn polyline(&self, img: &mut RgbImage, xs: &[f64], ys: &[f64], color: Rgb<u8>) {
        for i in 1..xs.len() {
            let a = self.px(xs[i - 1], ys[i - 1]);
            let b = self.px(xs[i], ys[i]);
            draw_line_segment_mut(img, a, b, color);
        }
    }
}

// ---------------------------------------------------------------------------
// Mean-with-variance overview
// ---------------------------------------------------------------------------

/// Render the batch mean spectrum as a black polyline over a shaded
/// ±variance band, wavelength along x.
pub fn mean_plot(matrix: &SpectrumMatrix) -> RgbImage {
    let (w, h) = (900u32, 600u32);
    let margin = 50.0f32;
    let mut img = RgbImage::from_pixel(w, h, WHITE);

    let mean = matrix.mean();
    let var = matrix.variance();
    let y_max = mean.iter().cloned().fold(f64::MIN, f64::max) + 3.0;

    let frame = Frame {
        left: margin,
        top: margin,
        width: w as f32 - 2.0 * margin,
        height: h as f32 - 2.0 * margin,
        x_min: matrix.grid[0],
        x_max: matrix.grid[matrix.grid.len() - 1],
        y_min: 0.0,
        y_max,
    };

    // Variance band first so the mean line draws over it.
    for (j, &nm) in matrix.grid.iter().enumerate() {
        let hi = (mean[j] + var[j]).min(y_max);
        let lo = (mean[j] - var[j]).max(0.0);
        draw_line_segment_mut(&mut img, frame.px(nm, lo), frame.px(nm, hi), BAND_GRAY);
    }
    frame.polyline(&mut img, &matrix.grid, &mean, BLACK);

    draw_hollow_rect_mut(
        &mut img,
        Rect::at(margin as i32, margin as i32)
            .of_size(w - 2 * margin as u32, h - 2 * margin as u32),
        FRAME_GRAY,
    );
    img
}

// ---------------------------------------------------------------------------
// Per-sample thumbnail grid
// ---------------------------------------------------------------------------

/// Render one mini-panel per sample, in CSV column order, each polyline in
/// its own hue. All panels share the batch's global y scale.
pub fn thumbnail_grid(matrix: &SpectrumMatrix) -> RgbImage {
    let n = matrix.len();
    let cols = (n as f64).sqrt().ceil().max(1.0) as u32;
    let rows = (n as u32).div_ceil(cols);

    let (cell_w, cell_h, pad) = (220u32, 140u32, 10u32);
    let w = cols * (cell_w + pad) + pad;
    let h = rows * (cell_h + pad) + pad;
    let mut img = RgbImage::from_pixel(w, h, WHITE);

    let y_max = matrix
        .rows
        .iter()
        .flatten()
        .cloned()
        .fold(f64::MIN, f64::max)
        .max(1e-9);
    let colors = generate_palette(n);

    for (i, row) in matrix.rows.iter().enumerate() {
        let cx = (i as u32 % cols) * (cell_w + pad) + pad;
        let cy = (i as u32 / cols) * (cell_h + pad) + pad;

        draw_filled_rect_mut(
            &mut img,
            Rect::at(cx as i32, cy as i32).of_size(cell_w, cell_h),
            WHITE,
        );
        draw_hollow_rect_mut(
            &mut img,
            Rect::at(cx as i32, cy as i32).of_size(cell_w, cell_h),
            FRAME_GRAY,
        );

        let frame = Frame {
            left: cx as f32 + 4.0,
            top: cy as f32 + 4.0,
            width: cell_w as f32 - 8.0,
            height: cell_h as f32 - 8.0,
            x_min: matrix.grid[0],
            x_max: matrix.grid[matrix.grid.len() - 1],
            y_min: 0.0,
            y_max,
        };
        frame.polyline(&mut img, &matrix.grid, row, colors[i]);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_matrix() -> SpectrumMatrix {
        let grid: Vec<f64> = (400..500).map(|nm| nm as f64).collect();
        let mut m = SpectrumMatrix::new(grid.clone());
        for k in 0..3 {
            let row: Vec<f64> = grid
                .iter()
                .map(|&nm| 10.0 + k as f64 + (nm / 25.0).sin() * 4.0)
                .collect();
            m.push(format!("s{k}"), row);
        }
        m
    }

    #[test]
    fn mean_plot_has_expected_canvas() {
        let img = mean_plot(&demo_matrix());
        assert_eq!(img.dimensions(), (900, 600));
        // Something was drawn: not every pixel is still white.
        assert!(img.pixels().any(|p| *p != WHITE));
    }

    #[test]
    fn thumbnail_grid_allocates_one_cell_per_sample() {
        let img = thumbnail_grid(&demo_matrix());
        // 3 samples → 2 columns × 2 rows of 220×140 cells plus padding.
        assert_eq!(img.dimensions(), (2 * 230 + 10, 2 * 150 + 10));
    }

    #[test]
    fn palette_produces_distinct_colors() {
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        assert_ne!(colors[0], colors[3]);
    }
}
