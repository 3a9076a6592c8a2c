/// Template matching implementation
///
/// Zero-mean normalized cross-correlation (the `TM_CCOEFF_NORMED` formulation),
/// accumulated over the R, G and B channels before normalizing. Every score is
/// computed from exact integer sums, so near-flat windows cannot be inflated by
/// rounding error.
use super::types::Match;
use image::{ImageBuffer, Luma, Rgb, RgbImage};
use imageproc::template_matching::find_extremes;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Score map produced by [`TemplateMatcher::score_map`]
pub type ScoreMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Searches costing more than this (placements x template pixels) go coarse-to-fine
const PYRAMID_MIN_WORK: u64 = 50_000_000;

/// Smallest template side allowed at the coarse level
const COARSE_MIN_SIDE: u32 = 8;

const MAX_COARSE_FACTOR: u32 = 8;

/// Coarse placements refined at full resolution
const COARSE_CANDIDATES: usize = 8;

/// Template matcher for finding a template in a color image
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    template: RgbImage,
    pixel_count: u64,
    /// Per-channel pixel sums
    sums: [u64; 3],
    /// `n * Σ T² - Σ_c (Σ T_c)²`, i.e. `n` times the summed squared deviation
    spread: i128,
    /// Block-averaged copy used to shortlist placements on large searches
    coarse: Option<(u32, Box<TemplateMatcher>)>,
}

impl TemplateMatcher {
    /// Prepare a matcher for the given template
    pub fn new(template: &RgbImage) -> Self {
        let mut matcher = Self::prepare(template.clone());

        let factor = coarse_factor(template.width(), template.height());
        if factor > 1 {
            let small = downsample(template, factor);
            matcher.coarse = Some((factor, Box::new(Self::prepare(small))));
        }
        matcher
    }

    fn prepare(template: RgbImage) -> Self {
        let pixel_count = u64::from(template.width()) * u64::from(template.height());
        let mut sums = [0u64; 3];
        let mut squares = 0u64;
        for pixel in template.pixels() {
            for c in 0..3 {
                let v = u64::from(pixel[c]);
                sums[c] += v;
                squares += v * v;
            }
        }

        let spread = i128::from(pixel_count) * i128::from(squares)
            - sums.iter().map(|&s| i128::from(s) * i128::from(s)).sum::<i128>();

        Self {
            template,
            pixel_count,
            sums,
            spread,
            coarse: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.template.width()
    }

    pub fn height(&self) -> u32 {
        self.template.height()
    }

    /// Whether the template can be placed at least once inside an image of this size
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        self.width() > 0
            && self.height() > 0
            && self.width() <= image_width
            && self.height() <= image_height
    }

    /// Compute the score of every valid placement
    ///
    /// Returns `None` when the template does not fit inside the image.
    pub fn score_map(&self, image: &RgbImage) -> Option<ScoreMap> {
        if !self.fits_within(image.width(), image.height()) {
            return None;
        }

        let out_w = image.width() - self.width() + 1;
        let out_h = image.height() - self.height() + 1;
        let sums = WindowSums::new(image);

        let mut scores = vec![0.0f32; out_w as usize * out_h as usize];
        scores
            .par_chunks_mut(out_w as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, score) in row.iter_mut().enumerate() {
                    *score = self.score_at(image, &sums, x as u32, y as u32) as f32;
                }
            });

        ImageBuffer::from_raw(out_w, out_h, scores)
    }

    /// Find the highest-scoring placement of the template in the image
    pub fn best_match(&self, image: &RgbImage) -> Option<Match> {
        if !self.fits_within(image.width(), image.height()) {
            return None;
        }

        let placements = u64::from(image.width() - self.width() + 1)
            * u64::from(image.height() - self.height() + 1);

        let best = match &self.coarse {
            Some((factor, coarse)) if placements * self.pixel_count > PYRAMID_MIN_WORK => {
                self.coarse_to_fine(image, *factor, coarse)
            }
            _ => {
                let scores = self.score_map(image)?;
                let extremes = find_extremes(&scores);
                let (x, y) = extremes.max_value_location;
                Match::new(x, y, extremes.max_value)
            }
        };

        log::debug!(
            "  🔎 Best placement {}x{} at ({},{}) score {:.3}",
            self.width(),
            self.height(),
            best.x,
            best.y,
            best.score
        );
        Some(best)
    }

    /// Shortlist placements on block-averaged images, then score them exactly
    fn coarse_to_fine(&self, image: &RgbImage, factor: u32, coarse: &TemplateMatcher) -> Match {
        let small = downsample(image, factor);
        let shortlist: Vec<(u32, u32)> = match coarse.score_map(&small) {
            Some(map) => {
                let width = map.width() as usize;
                let raw = map.as_raw();
                let mut order: Vec<usize> = (0..raw.len()).collect();
                order.sort_by(|&a, &b| raw[b].total_cmp(&raw[a]).then(a.cmp(&b)));
                order
                    .into_iter()
                    .take(COARSE_CANDIDATES)
                    .map(|i| ((i % width) as u32, (i / width) as u32))
                    .collect()
            }
            None => vec![(0, 0)],
        };

        let max_x = image.width() - self.width();
        let max_y = image.height() - self.height();
        let mut placements = BTreeSet::new();
        for (cx, cy) in shortlist {
            let (x0, y0) = (cx * factor, cy * factor);
            for y in y0.saturating_sub(factor)..=(y0 + factor).min(max_y) {
                for x in x0.saturating_sub(factor)..=(x0 + factor).min(max_x) {
                    placements.insert((y, x));
                }
            }
        }

        let sums = WindowSums::new(image);
        let placements: Vec<(u32, u32)> = placements.into_iter().collect();
        let scored: Vec<f64> = placements
            .par_iter()
            .map(|&(y, x)| self.score_at(image, &sums, x, y))
            .collect();

        // Row-major order with a strict comparison keeps the first maximum
        let mut best = Match::new(0, 0, f32::NEG_INFINITY);
        for (&(y, x), &score) in placements.iter().zip(&scored) {
            if score as f32 > best.score {
                best = Match::new(x, y, score as f32);
            }
        }
        log::debug!(
            "  🔎 Coarse pass at 1/{} refined {} placements",
            factor,
            placements.len()
        );
        best
    }

    /// Exact score of the placement with top-left (x, y)
    fn score_at(&self, image: &RgbImage, sums: &WindowSums, x: u32, y: u32) -> f64 {
        if self.spread <= 0 {
            return 0.0;
        }

        let row_bytes = self.width() as usize * 3;
        let image_stride = image.width() as usize * 3;
        let image_raw = image.as_raw();
        let template_raw = self.template.as_raw();

        let mut cross = 0u64;
        for row in 0..self.height() as usize {
            let start = (y as usize + row) * image_stride + x as usize * 3;
            cross += dot(
                &image_raw[start..start + row_bytes],
                &template_raw[row * row_bytes..(row + 1) * row_bytes],
            );
        }

        let (window_sums, window_squares) = sums.window(x, y, self.width(), self.height());
        let n = i128::from(self.pixel_count);

        let numerator = n * i128::from(cross)
            - (0..3)
                .map(|c| i128::from(window_sums[c]) * i128::from(self.sums[c]))
                .sum::<i128>();
        let window_spread = n * i128::from(window_squares)
            - window_sums
                .iter()
                .map(|&s| i128::from(s) * i128::from(s))
                .sum::<i128>();

        if window_spread <= 0 {
            return 0.0;
        }
        let denominator = (window_spread as f64).sqrt() * (self.spread as f64).sqrt();
        (numerator as f64 / denominator).clamp(-1.0, 1.0)
    }
}

/// Largest power-of-two reduction that keeps both template sides usable
fn coarse_factor(width: u32, height: u32) -> u32 {
    let mut factor = 1;
    while factor < MAX_COARSE_FACTOR && width.min(height) / (factor * 2) >= COARSE_MIN_SIDE {
        factor *= 2;
    }
    factor
}

/// Average each `factor` x `factor` block into one pixel
fn downsample(image: &RgbImage, factor: u32) -> RgbImage {
    let area = factor * factor;
    RgbImage::from_fn(image.width() / factor, image.height() / factor, |bx, by| {
        let mut totals = [0u32; 3];
        for dy in 0..factor {
            for dx in 0..factor {
                let p = image.get_pixel(bx * factor + dx, by * factor + dy);
                for c in 0..3 {
                    totals[c] += u32::from(p[c]);
                }
            }
        }
        Rgb(totals.map(|t| ((t + area / 2) / area) as u8))
    })
}

/// Integer dot product of two equally long byte rows
fn dot(a: &[u8], b: &[u8]) -> u64 {
    // 4096 products of at most 255 * 255 fit in a u32
    a.chunks(4096)
        .zip(b.chunks(4096))
        .map(|(a, b)| {
            a.iter()
                .zip(b)
                .map(|(&x, &y)| u32::from(x) * u32::from(y))
                .sum::<u32>() as u64
        })
        .sum()
}

/// Summed-area tables of each channel and of all squared samples
struct WindowSums {
    stride: usize,
    sums: [Vec<u64>; 3],
    squares: Vec<u64>,
}

impl WindowSums {
    fn new(image: &RgbImage) -> Self {
        let (w, h) = image.dimensions();
        let stride = w as usize + 1;
        let len = stride * (h as usize + 1);
        let mut sums = [vec![0u64; len], vec![0u64; len], vec![0u64; len]];
        let mut squares = vec![0u64; len];

        for y in 0..h as usize {
            let mut row_sums = [0u64; 3];
            let mut row_sq = 0u64;
            for x in 0..w as usize {
                let pixel = image.get_pixel(x as u32, y as u32);
                for c in 0..3 {
                    let v = u64::from(pixel[c]);
                    row_sums[c] += v;
                    row_sq += v * v;
                }
                let idx = (y + 1) * stride + (x + 1);
                for c in 0..3 {
                    sums[c][idx] = sums[c][idx - stride] + row_sums[c];
                }
                squares[idx] = squares[idx - stride] + row_sq;
            }
        }

        Self {
            stride,
            sums,
            squares,
        }
    }

    /// Per-channel sums and the sum of squares of the window with top-left (x, y)
    fn window(&self, x: u32, y: u32, width: u32, height: u32) -> ([u64; 3], u64) {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + width as usize, y0 + height as usize);
        let area = |table: &[u64]| {
            let at = |xx: usize, yy: usize| table[yy * self.stride + xx];
            (at(x1, y1) + at(x0, y0)) - (at(x0, y1) + at(x1, y0))
        };
        (
            [area(&self.sums[0]), area(&self.sums[1]), area(&self.sums[2])],
            area(&self.squares),
        )
    }
}
