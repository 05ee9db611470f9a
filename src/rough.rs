//! Hand-drawn stroke generator.
//!
//! Every shape is emitted as SVG path data with a little seeded jitter, drawn
//! twice the way a pencil sketch would be. The RNG is seeded per shape so a
//! redraw of the same data produces the same picture.

use rand::{rngs::StdRng, Rng, SeedableRng};

const MAX_OFFSET: f64 = 2.0;
const HACHURE_GAP_FACTOR: f64 = 4.0;

#[derive(Debug)]
pub struct RoughPen {
    rng: StdRng,
    roughness: f64,
    bowing: f64,
}

impl RoughPen {
    pub fn new(seed: u64, roughness: f64, bowing: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            roughness,
            bowing,
        }
    }

    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.rng.r#gen::<f64>() * 2.0 - 1.0) * amplitude * self.roughness
    }

    /// A double-stroked, slightly bowed line.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> String {
        let length = (x2 - x1).hypot(y2 - y1);
        let offset = MAX_OFFSET.min(length / 10.0);
        let mut path = String::new();
        for pass in [1.0, 0.5] {
            path.push_str(&self.stroke(x1, y1, x2, y2, length, offset * pass));
        }
        path
    }

    fn stroke(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, length: f64, offset: f64) -> String {
        let (nx, ny) = if length > 0.0 {
            (-(y2 - y1) / length, (x2 - x1) / length)
        } else {
            (0.0, 0.0)
        };
        let bow = self.bowing * self.jitter(length / 50.0);
        let mid_x = (x1 + x2) / 2.0 + nx * bow + self.jitter(offset);
        let mid_y = (y1 + y2) / 2.0 + ny * bow + self.jitter(offset);
        format!(
            "M{:.2} {:.2} Q{:.2} {:.2} {:.2} {:.2} ",
            x1 + self.jitter(offset),
            y1 + self.jitter(offset),
            mid_x,
            mid_y,
            x2 + self.jitter(offset),
            y2 + self.jitter(offset),
        )
    }

    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> String {
        let mut path = self.line(x, y, x + width, y);
        path.push_str(&self.line(x + width, y, x + width, y + height));
        path.push_str(&self.line(x + width, y + height, x, y + height));
        path.push_str(&self.line(x, y + height, x, y));
        path
    }

    /// Diagonal hatching that fills an axis-aligned rectangle.
    pub fn hachure(&mut self, x: f64, y: f64, width: f64, height: f64, stroke_width: f64) -> String {
        let mut path = String::new();
        if width <= 0.0 || height <= 0.0 {
            return path;
        }
        let gap = (stroke_width * HACHURE_GAP_FACTOR).max(1.0);
        let (x0, y0, x1, y1) = (x, y, x + width, y + height);
        // Lines x + y = c swept from the top-left corner to the bottom-right one.
        let mut c = x0 + y0 + gap / 2.0;
        while c < x1 + y1 {
            let lo = x0.max(c - y1);
            let hi = x1.min(c - y0);
            if lo < hi {
                path.push_str(&self.stroke(lo, c - lo, hi, c - hi, 0.0, 0.5));
            }
            c += gap * std::f64::consts::SQRT_2;
        }
        path
    }

    /// An open polyline through `points`.
    pub fn linear_path(&mut self, points: &[(f64, f64)]) -> String {
        points
            .windows(2)
            .map(|pair| self.line(pair[0].0, pair[0].1, pair[1].0, pair[1].1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_draws_same_path() {
        let a = RoughPen::new(7, 1.5, 1.0).rectangle(0.0, 0.0, 20.0, 40.0);
        let b = RoughPen::new(7, 1.5, 1.0).rectangle(0.0, 0.0, 20.0, 40.0);
        let c = RoughPen::new(8, 1.5, 1.0).rectangle(0.0, 0.0, 20.0, 40.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn zero_roughness_is_a_clean_line() {
        let path = RoughPen::new(1, 0.0, 1.0).line(0.0, 0.0, 10.0, 0.0);
        assert_eq!(path.matches('M').count(), 2);
        assert!(path.starts_with("M0.00 0.00 Q5.00 0.00 10.00 0.00"));
    }

    #[test]
    fn jitter_stays_near_the_line() {
        let mut pen = RoughPen::new(3, 1.5, 1.0);
        let path = pen.line(0.0, 50.0, 100.0, 50.0);
        let ys: Vec<f64> = path
            .split(|c: char| c == 'M' || c == 'Q')
            .flat_map(|chunk| chunk.split_whitespace().skip(1).step_by(2))
            .filter_map(|v| v.parse().ok())
            .collect();
        assert!(!ys.is_empty());
        assert!(ys.iter().all(|y| (y - 50.0).abs() < 10.0));
    }

    #[test]
    fn hachure_fills_only_real_rectangles() {
        let mut pen = RoughPen::new(5, 1.5, 1.0);
        assert!(pen.hachure(0.0, 0.0, 0.0, 10.0, 2.0).is_empty());
        let fill = pen.hachure(0.0, 0.0, 30.0, 60.0, 2.0);
        assert!(fill.matches('M').count() > 5);
    }

    #[test]
    fn linear_path_has_a_segment_per_pair() {
        let mut pen = RoughPen::new(9, 1.0, 1.0);
        let path = pen.linear_path(&[(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)]);
        assert_eq!(path.matches('M').count(), 4);
        assert!(pen.linear_path(&[(1.0, 1.0)]).is_empty());
    }
}
