//! Squarified treemap layout in the unit square.

/// Rectangle `[x0, x1] × [y0, y1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Tile {
    pub fn area(&self) -> f64 {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}

/// Lay out `weights` so each tile's area is proportional to its weight.
///
/// Weights should be sorted largest first for good aspect ratios. Tiles are
/// returned in input order; non-positive weights get zero-area tiles.
pub fn squarify(weights: &[f64]) -> Vec<Tile> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    let zero = Tile {
        x0: 0.0,
        y0: 0.0,
        x1: 0.0,
        y1: 0.0,
    };
    let mut tiles = vec![zero; weights.len()];
    if total <= 0.0 {
        return tiles;
    }

    let items: Vec<(usize, f64)> = weights
        .iter()
        .enumerate()
        .filter(|(_, w)| **w > 0.0)
        .map(|(i, w)| (i, w / total))
        .collect();

    let (mut x, mut y, mut w, mut h) = (0.0_f64, 0.0_f64, 1.0_f64, 1.0_f64);
    let mut start = 0;
    while start < items.len() {
        let side = w.min(h);
        let mut end = start + 1;
        while end < items.len()
            && worst(&items[start..=end], side) <= worst(&items[start..end], side)
        {
            end += 1;
        }

        let row = &items[start..end];
        let row_area: f64 = row.iter().map(|(_, a)| a).sum();
        if w >= h {
            // Column along the left edge.
            let col_w = row_area / h;
            let mut cy = y;
            for &(i, a) in row {
                let th = a / col_w;
                tiles[i] = Tile {
                    x0: x,
                    y0: cy,
                    x1: x + col_w,
                    y1: cy + th,
                };
                cy += th;
            }
            x += col_w;
            w -= col_w;
        } else {
            // Row along the top edge.
            let row_h = row_area / w;
            let mut cx = x;
            for &(i, a) in row {
                let tw = a / row_h;
                tiles[i] = Tile {
                    x0: cx,
                    y0: y,
                    x1: cx + tw,
                    y1: y + row_h,
                };
                cx += tw;
            }
            y += row_h;
            h -= row_h;
        }
        start = end;
    }
    tiles
}

/// Worst aspect ratio of a row of areas laid along a side of length `side`.
fn worst(row: &[(usize, f64)], side: f64) -> f64 {
    let sum: f64 = row.iter().map(|(_, a)| a).sum();
    let (min, max) = row
        .iter()
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), (_, a)| (lo.min(*a), hi.max(*a)));
    let s2 = side * side;
    let sum2 = sum * sum;
    (s2 * max / sum2).max(sum2 / (s2 * min))
}
