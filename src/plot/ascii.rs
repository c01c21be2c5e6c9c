//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks of a resampled series in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed days: `o`
//! - the daily series (observed + filled days): `-` line

use crate::domain::{DailyTable, Fill};

/// Render one group's daily series for `field`.
///
/// Returns `None` if the group or field is not in the table.
pub fn render_series_plot(table: &DailyTable, group: &str, field: &str, width: usize, height: usize) -> Option<String> {
    let fi = table.field_index(field)?;
    let points: Vec<(f64, Fill)> = table
        .rows
        .iter()
        .filter(|r| r.group == group)
        .map(|r| (r.values[fi], r.fills.get(fi).copied().unwrap_or(Fill::Observed)))
        .collect();
    if points.is_empty() {
        return None;
    }

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(&points);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let n = points.len();

    let mut grid = vec![vec![' '; width]; height];

    // Draw the line first (so observations can overlay).
    let mut prev = None;
    for (i, &(y, _)) in points.iter().enumerate() {
        let x = map_x(i, n, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }

    for (i, &(y, fill)) in points.iter().enumerate() {
        if fill == Fill::Observed {
            grid[map_y(y, y_min, y_max, height)][map_x(i, n, width)] = 'o';
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {group} / {field} | {} .. {} | y=[{y_min:.2}, {y_max:.2}]\n",
        table.start, table.end
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    Some(out)
}

fn y_range(points: &[(f64, Fill)]) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(y, _) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        (min_y, max_y)
    } else if min_y.is_finite() {
        // Flat series: center it.
        (min_y - 1.0, min_y + 1.0)
    } else {
        (0.0, 1.0)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordTable, ResampleConfig};
    use crate::resample::resample_daily;

    fn table() -> DailyTable {
        let input = RecordTable::from_rows(
            ["date", "canton", "ncumul_conf"],
            [["2020-03-01", "ZH", "0"], ["2020-03-03", "ZH", "10"]],
        );
        resample_daily(&input, &ResampleConfig::new("date", "canton", ["ncumul_conf"])).unwrap()
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_series_plot(&table(), "ZH", "ncumul_conf", 10, 5).unwrap();
        let expected = concat!(
            "Plot: ZH / ncumul_conf | 2020-03-01 .. 2020-03-03 | y=[-0.50, 10.50]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn unknown_group_or_field_has_no_plot() {
        assert!(render_series_plot(&table(), "BE", "ncumul_conf", 10, 5).is_none());
        assert!(render_series_plot(&table(), "ZH", "ncumul_ICU", 10, 5).is_none());
    }
}
