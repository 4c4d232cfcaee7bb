//! Renders the fixed 2x2 grid of recorded time series as a PNG figure,
//! drawn into an RGB8 buffer with an embedded 5x7 bitmap font

use crate::error::PlotError;


/// Each glyph: 7 rows, each row's lower 5 bits = pixels (MSB=left).
/// Character cell: 6px wide (5+1 spacing), 9px tall (7+2 spacing).
const CHAR_W: u32 = 6;
const CHAR_H: u32 = 9;

#[rustfmt::skip]
const FONT_5X7: [[u8; 7]; 95] = [
    [0x00,0x00,0x00,0x00,0x00,0x00,0x00], // 32 ' '
    [0x04,0x04,0x04,0x04,0x04,0x00,0x04], // 33 '!'
    [0x0A,0x0A,0x0A,0x00,0x00,0x00,0x00], // 34 '"'
    [0x0A,0x0A,0x1F,0x0A,0x1F,0x0A,0x0A], // 35 '#'
    [0x04,0x0F,0x14,0x0E,0x05,0x1E,0x04], // 36 '$'
    [0x18,0x19,0x02,0x04,0x08,0x13,0x03], // 37 '%'
    [0x0C,0x12,0x14,0x08,0x15,0x12,0x0D], // 38 '&'
    [0x04,0x04,0x08,0x00,0x00,0x00,0x00], // 39 '''
    [0x02,0x04,0x08,0x08,0x08,0x04,0x02], // 40 '('
    [0x08,0x04,0x02,0x02,0x02,0x04,0x08], // 41 ')'
    [0x00,0x04,0x15,0x0E,0x15,0x04,0x00], // 42 '*'
    [0x00,0x04,0x04,0x1F,0x04,0x04,0x00], // 43 '+'
    [0x00,0x00,0x00,0x00,0x00,0x04,0x08], // 44 ','
    [0x00,0x00,0x00,0x1F,0x00,0x00,0x00], // 45 '-'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x04], // 46 '.'
    [0x00,0x01,0x02,0x04,0x08,0x10,0x00], // 47 '/'
    [0x0E,0x11,0x13,0x15,0x19,0x11,0x0E], // 48 '0'
    [0x04,0x0C,0x04,0x04,0x04,0x04,0x0E], // 49 '1'
    [0x0E,0x11,0x01,0x02,0x04,0x08,0x1F], // 50 '2'
    [0x1F,0x02,0x04,0x02,0x01,0x11,0x0E], // 51 '3'
    [0x02,0x06,0x0A,0x12,0x1F,0x02,0x02], // 52 '4'
    [0x1F,0x10,0x1E,0x01,0x01,0x11,0x0E], // 53 '5'
    [0x06,0x08,0x10,0x1E,0x11,0x11,0x0E], // 54 '6'
    [0x1F,0x01,0x02,0x04,0x08,0x08,0x08], // 55 '7'
    [0x0E,0x11,0x11,0x0E,0x11,0x11,0x0E], // 56 '8'
    [0x0E,0x11,0x11,0x0F,0x01,0x02,0x0C], // 57 '9'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x00], // 58 ':'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x08], // 59 ';'
    [0x02,0x04,0x08,0x10,0x08,0x04,0x02], // 60 '<'
    [0x00,0x00,0x1F,0x00,0x1F,0x00,0x00], // 61 '='
    [0x08,0x04,0x02,0x01,0x02,0x04,0x08], // 62 '>'
    [0x0E,0x11,0x01,0x02,0x04,0x00,0x04], // 63 '?'
    [0x0E,0x11,0x17,0x15,0x17,0x10,0x0E], // 64 '@'
    [0x0E,0x11,0x11,0x1F,0x11,0x11,0x11], // 65 'A'
    [0x1E,0x11,0x11,0x1E,0x11,0x11,0x1E], // 66 'B'
    [0x0E,0x11,0x10,0x10,0x10,0x11,0x0E], // 67 'C'
    [0x1C,0x12,0x11,0x11,0x11,0x12,0x1C], // 68 'D'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x1F], // 69 'E'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x10], // 70 'F'
    [0x0E,0x11,0x10,0x17,0x11,0x11,0x0F], // 71 'G'
    [0x11,0x11,0x11,0x1F,0x11,0x11,0x11], // 72 'H'
    [0x0E,0x04,0x04,0x04,0x04,0x04,0x0E], // 73 'I'
    [0x07,0x02,0x02,0x02,0x02,0x12,0x0C], // 74 'J'
    [0x11,0x12,0x14,0x18,0x14,0x12,0x11], // 75 'K'
    [0x10,0x10,0x10,0x10,0x10,0x10,0x1F], // 76 'L'
    [0x11,0x1B,0x15,0x15,0x11,0x11,0x11], // 77 'M'
    [0x11,0x11,0x19,0x15,0x13,0x11,0x11], // 78 'N'
    [0x0E,0x11,0x11,0x11,0x11,0x11,0x0E], // 79 'O'
    [0x1E,0x11,0x11,0x1E,0x10,0x10,0x10], // 80 'P'
    [0x0E,0x11,0x11,0x11,0x15,0x12,0x0D], // 81 'Q'
    [0x1E,0x11,0x11,0x1E,0x14,0x12,0x11], // 82 'R'
    [0x0F,0x10,0x10,0x0E,0x01,0x01,0x1E], // 83 'S'
    [0x1F,0x04,0x04,0x04,0x04,0x04,0x04], // 84 'T'
    [0x11,0x11,0x11,0x11,0x11,0x11,0x0E], // 85 'U'
    [0x11,0x11,0x11,0x11,0x11,0x0A,0x04], // 86 'V'
    [0x11,0x11,0x11,0x15,0x15,0x1B,0x11], // 87 'W'
    [0x11,0x11,0x0A,0x04,0x0A,0x11,0x11], // 88 'X'
    [0x11,0x11,0x0A,0x04,0x04,0x04,0x04], // 89 'Y'
    [0x1F,0x01,0x02,0x04,0x08,0x10,0x1F], // 90 'Z'
    [0x0E,0x08,0x08,0x08,0x08,0x08,0x0E], // 91 '['
    [0x00,0x10,0x08,0x04,0x02,0x01,0x00], // 92 '\'
    [0x0E,0x02,0x02,0x02,0x02,0x02,0x0E], // 93 ']'
    [0x04,0x0A,0x11,0x00,0x00,0x00,0x00], // 94 '^'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x1F], // 95 '_'
    [0x08,0x04,0x02,0x00,0x00,0x00,0x00], // 96 '`'
    [0x00,0x00,0x0E,0x01,0x0F,0x11,0x0F], // 97 'a'
    [0x10,0x10,0x16,0x19,0x11,0x11,0x1E], // 98 'b'
    [0x00,0x00,0x0E,0x10,0x10,0x11,0x0E], // 99 'c'
    [0x01,0x01,0x0D,0x13,0x11,0x11,0x0F], // 100 'd'
    [0x00,0x00,0x0E,0x11,0x1F,0x10,0x0E], // 101 'e'
    [0x06,0x09,0x08,0x1C,0x08,0x08,0x08], // 102 'f'
    [0x00,0x00,0x0F,0x11,0x0F,0x01,0x0E], // 103 'g'
    [0x10,0x10,0x16,0x19,0x11,0x11,0x11], // 104 'h'
    [0x04,0x00,0x0C,0x04,0x04,0x04,0x0E], // 105 'i'
    [0x02,0x00,0x06,0x02,0x02,0x12,0x0C], // 106 'j'
    [0x10,0x10,0x12,0x14,0x18,0x14,0x12], // 107 'k'
    [0x0C,0x04,0x04,0x04,0x04,0x04,0x0E], // 108 'l'
    [0x00,0x00,0x1A,0x15,0x15,0x11,0x11], // 109 'm'
    [0x00,0x00,0x16,0x19,0x11,0x11,0x11], // 110 'n'
    [0x00,0x00,0x0E,0x11,0x11,0x11,0x0E], // 111 'o'
    [0x00,0x00,0x1E,0x11,0x1E,0x10,0x10], // 112 'p'
    [0x00,0x00,0x0D,0x13,0x0F,0x01,0x01], // 113 'q'
    [0x00,0x00,0x16,0x19,0x10,0x10,0x10], // 114 'r'
    [0x00,0x00,0x0E,0x10,0x0E,0x01,0x1E], // 115 's'
    [0x08,0x08,0x1C,0x08,0x08,0x09,0x06], // 116 't'
    [0x00,0x00,0x11,0x11,0x11,0x13,0x0D], // 117 'u'
    [0x00,0x00,0x11,0x11,0x11,0x0A,0x04], // 118 'v'
    [0x00,0x00,0x11,0x11,0x15,0x15,0x0A], // 119 'w'
    [0x00,0x00,0x11,0x0A,0x04,0x0A,0x11], // 120 'x'
    [0x00,0x00,0x11,0x11,0x0F,0x01,0x0E], // 121 'y'
    [0x00,0x00,0x1F,0x02,0x04,0x08,0x1F], // 122 'z'
    [0x02,0x04,0x04,0x08,0x04,0x04,0x02], // 123 '{'
    [0x04,0x04,0x04,0x04,0x04,0x04,0x04], // 124 '|'
    [0x08,0x04,0x04,0x02,0x04,0x04,0x08], // 125 '}'
    [0x00,0x00,0x08,0x15,0x02,0x00,0x00], // 126 '~'
];

const FIG_W: u32 = 1200;
const FIG_H: u32 = 800;
const PANEL_W: u32 = 600;
const PANEL_H: u32 = 400;
const PLOT_LEFT: u32 = 68;
const PLOT_RIGHT: u32 = 18;
const PLOT_TOP: u32 = 34;
const PLOT_BOTTOM: u32 = 36;

struct Palette;
impl Palette {
    const BG: [u8; 3] = [255, 255, 255];
    const AXIS: [u8; 3] = [60, 60, 60];
    const GRID_LINE: [u8; 3] = [222, 222, 228];
    const TEXT: [u8; 3] = [25, 25, 25];
    const TEXT_DIM: [u8; 3] = [105, 105, 110];
}

/// Fixed line color for voltage and potassium traces
pub const LINE_BLUE: [u8; 3] = [0, 0, 255];
/// Fixed line color for stimulus, leak, and passive traces
pub const LINE_RED: [u8; 3] = [255, 0, 0];
/// Fixed line color for sodium traces
pub const LINE_GREEN: [u8; 3] = [0, 128, 0];

/// One plotted line sharing the figure wide time base
pub struct Series<'a> {
    /// Legend label
    pub label: &'a str,
    /// Line color
    pub color: [u8; 3],
    /// Sample values
    pub values: &'a [f32],
}

/// One panel of the 2x2 grid
pub struct PanelSpec<'a> {
    /// Panel title
    pub title: &'a str,
    /// Y axis unit label
    pub y_label: &'a str,
    /// Lines drawn in this panel
    pub series: Vec<Series<'a>>,
}

struct FigureRenderer {
    buf: Vec<u8>, // RGB8: FIG_W * FIG_H * 3
}

impl FigureRenderer {
    fn new() -> Self {
        Self {
            buf: vec![0u8; (FIG_W * FIG_H * 3) as usize],
        }
    }

    // --- Primitives ---

    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x < FIG_W && y < FIG_H {
            let idx = ((y * FIG_W + x) * 3) as usize;
            self.buf[idx] = color[0];
            self.buf[idx + 1] = color[1];
            self.buf[idx + 2] = color[2];
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
        for dy in 0..h {
            for dx in 0..w {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    fn draw_hline(&mut self, x: u32, y: u32, w: u32, color: [u8; 3]) {
        for dx in 0..w {
            self.set_pixel(x + dx, y, color);
        }
    }

    fn draw_vline(&mut self, x: u32, y: u32, h: u32, color: [u8; 3]) {
        for dy in 0..h {
            self.set_pixel(x, y + dy, color);
        }
    }

    fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for i in 0..=steps {
            let x = x0 + (x1 - x0) * i / steps;
            let y = y0 + (y1 - y0) * i / steps;
            if x >= 0 && y >= 0 {
                self.set_pixel(x as u32, y as u32, color);
            }
        }
    }

    fn draw_char(&mut self, x: u32, y: u32, ch: char, color: [u8; 3]) {
        let code = ch as u32;
        if !(32..=126).contains(&code) {
            return;
        }
        let glyph = &FONT_5X7[(code - 32) as usize];
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..5u32 {
                if bits & (0x10 >> col) != 0 {
                    self.set_pixel(x + col, y + row as u32, color);
                }
            }
        }
    }

    fn draw_text(&mut self, x: u32, y: u32, text: &str, color: [u8; 3]) {
        for (i, ch) in text.chars().enumerate() {
            self.draw_char(x + i as u32 * CHAR_W, y, ch, color);
        }
    }

    fn clear(&mut self) {
        for chunk in self.buf.chunks_exact_mut(3) {
            chunk[0] = Palette::BG[0];
            chunk[1] = Palette::BG[1];
            chunk[2] = Palette::BG[2];
        }
    }

    // --- Panels ---

    fn draw_panel(&mut self, index: usize, panel: &PanelSpec, time: &[f32], x_max: f32) {
        let origin_x = (index as u32 % 2) * PANEL_W;
        let origin_y = (index as u32 / 2) * PANEL_H;
        let x0 = origin_x + PLOT_LEFT;
        let x1 = origin_x + PANEL_W - PLOT_RIGHT;
        let y0 = origin_y + PLOT_TOP;
        let y1 = origin_y + PANEL_H - PLOT_BOTTOM;

        let (value_min, value_max) = value_bounds(&panel.series);

        self.draw_x_grid(x0, x1, y0, y1, x_max);
        self.draw_y_grid(x0, x1, y0, y1, value_min, value_max);

        // axis box on top of the grid lines
        self.draw_hline(x0, y1, x1 - x0 + 1, Palette::AXIS);
        self.draw_hline(x0, y0, x1 - x0 + 1, Palette::AXIS);
        self.draw_vline(x0, y0, y1 - y0 + 1, Palette::AXIS);
        self.draw_vline(x1, y0, y1 - y0 + 1, Palette::AXIS);

        for series in panel.series.iter() {
            self.draw_series(series, time, x_max, value_min, value_max, x0, x1, y0, y1);
        }

        let title_x = origin_x
            + (PANEL_W.saturating_sub(panel.title.chars().count() as u32 * CHAR_W)) / 2;
        self.draw_text(title_x, origin_y + 12, panel.title, Palette::TEXT);
        self.draw_text(origin_x + 6, y0, panel.y_label, Palette::TEXT_DIM);

        self.draw_legend(panel, x1, y0);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_series(
        &mut self,
        series: &Series,
        time: &[f32],
        x_max: f32,
        value_min: f32,
        value_max: f32,
        x0: u32,
        x1: u32,
        y0: u32,
        y1: u32,
    ) {
        let count = time.len().min(series.values.len());
        if count < 2 {
            return;
        }

        let span_x = (x1 - x0) as f32;
        let span_y = (y1 - y0) as f32;
        let to_px = |t: f32, v: f32| -> (i64, i64) {
            let x_frac = (t / x_max).clamp(0., 1.);
            let y_frac = ((v - value_min) / (value_max - value_min)).clamp(0., 1.);
            (
                (x0 as f32 + x_frac * span_x) as i64,
                (y1 as f32 - y_frac * span_y) as i64,
            )
        };

        let (mut last_x, mut last_y) = to_px(time[0], series.values[0]);
        for i in 1..count {
            let (x, y) = to_px(time[i], series.values[i]);
            self.draw_line(last_x, last_y, x, y, series.color);
            last_x = x;
            last_y = y;
        }
    }

    fn draw_x_grid(&mut self, x0: u32, x1: u32, y0: u32, y1: u32, x_max: f32) {
        let step = nice_step(x_max);
        let mut tick = 0.;
        while tick <= x_max + step * 1e-3 {
            let frac = (tick / x_max).clamp(0., 1.);
            let px = x0 + (frac * (x1 - x0) as f32) as u32;
            if px > x0 && px < x1 {
                self.draw_vline(px, y0 + 1, y1 - y0 - 1, Palette::GRID_LINE);
            }
            let label = format_tick(tick);
            let lx = px.saturating_sub(label.chars().count() as u32 * CHAR_W / 2);
            self.draw_text(lx, y1 + 6, &label, Palette::TEXT_DIM);
            tick += step;
        }
    }

    fn draw_y_grid(&mut self, x0: u32, x1: u32, y0: u32, y1: u32, value_min: f32, value_max: f32) {
        let step = nice_step(value_max - value_min);
        let mut tick = (value_min / step).ceil() * step;
        while tick <= value_max + step * 1e-3 {
            let frac = ((tick - value_min) / (value_max - value_min)).clamp(0., 1.);
            let py = y1 - (frac * (y1 - y0) as f32) as u32;
            if py > y0 && py < y1 {
                self.draw_hline(x0 + 1, py, x1 - x0 - 1, Palette::GRID_LINE);
            }
            let label = format_tick(tick);
            let lx = x0.saturating_sub(label.chars().count() as u32 * CHAR_W + 6);
            self.draw_text(lx, py.saturating_sub(3), &label, Palette::TEXT_DIM);
            tick += step;
        }
    }

    fn draw_legend(&mut self, panel: &PanelSpec, x1: u32, y0: u32) {
        let longest = panel.series.iter()
            .map(|series| series.label.chars().count() as u32)
            .max()
            .unwrap_or(0);
        let entry_h = CHAR_H + 2;
        let box_w = longest * CHAR_W + 30;
        let box_h = panel.series.len() as u32 * entry_h + 6;
        let box_x = x1.saturating_sub(box_w + 6);
        let box_y = y0 + 6;

        self.fill_rect(box_x, box_y, box_w, box_h, Palette::BG);
        self.draw_hline(box_x, box_y, box_w, Palette::AXIS);
        self.draw_hline(box_x, box_y + box_h, box_w, Palette::AXIS);
        self.draw_vline(box_x, box_y, box_h, Palette::AXIS);
        self.draw_vline(box_x + box_w, box_y, box_h + 1, Palette::AXIS);

        for (i, series) in panel.series.iter().enumerate() {
            let entry_y = box_y + 4 + i as u32 * entry_h;
            self.draw_hline(box_x + 4, entry_y + 3, 16, series.color);
            self.draw_hline(box_x + 4, entry_y + 4, 16, series.color);
            self.draw_text(box_x + 24, entry_y, series.label, Palette::TEXT);
        }
    }
}

fn value_bounds(series: &[Series]) -> (f32, f32) {
    let mut value_min = f32::MAX;
    let mut value_max = f32::MIN;
    for series in series.iter() {
        for &value in series.values.iter() {
            if value < value_min { value_min = value; }
            if value > value_max { value_max = value; }
        }
    }

    if value_min > value_max {
        return (0., 1.);
    }
    if value_min == value_max {
        return (value_min - 1., value_max + 1.);
    }

    let pad = (value_max - value_min) * 0.05;
    (value_min - pad, value_max + pad)
}

/// Pick a nice tick step for a given range (targeting ~5-6 gridlines).
fn nice_step(range: f32) -> f32 {
    let raw = range / 6.;
    let magnitude = 10.0f32.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let step = if normalized < 1.5 {
        1.
    } else if normalized < 3.5 {
        2.
    } else if normalized < 7.5 {
        5.
    } else {
        10.
    };
    step * magnitude
}

fn format_tick(v: f32) -> String {
    if v == 0. {
        String::from("0")
    } else if v.abs() >= 100. {
        format!("{:.0}", v)
    } else if v.abs() >= 1. {
        let rounded = format!("{:.1}", v);
        if rounded.ends_with(".0") {
            format!("{:.0}", v)
        } else {
            rounded
        }
    } else if v.abs() >= 0.01 {
        format!("{:.3}", v)
    } else {
        format!("{:.1e}", v)
    }
}

/// Renders the four panels against a shared time base (ms) with the x axis
/// fixed to `0..x_max` and writes the figure to `path` as a PNG
pub fn render_figure(
    time: &[f32],
    panels: &[PanelSpec],
    x_max: f32,
    path: &str,
) -> Result<(), PlotError> {
    let x_max = if x_max > 0. { x_max } else { 1. };

    let mut renderer = FigureRenderer::new();
    renderer.clear();
    for (index, panel) in panels.iter().enumerate().take(4) {
        renderer.draw_panel(index, panel, time, x_max);
    }

    image::save_buffer(path, &renderer.buf, FIG_W, FIG_H, image::ColorType::Rgb8)
        .map_err(|err| PlotError::FigureWriteError(format!("{}: {}", path, err)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_nice_step_targets_a_handful_of_ticks() {
        for range in [1., 7.5, 50., 100., 1000.] {
            let step = nice_step(range);
            let ticks = range / step;
            assert!((3. ..=10.).contains(&ticks), "range {} gave {} ticks", range, ticks);
        }
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.), "0");
        assert_eq!(format_tick(50.), "50");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.25), "0.250");
        assert_eq!(format_tick(-70.), "-70");
    }

    #[test]
    fn test_value_bounds_pads_flat_series() {
        let values = [1., 1., 1.];
        let series = vec![Series { label: "flat", color: LINE_RED, values: &values }];
        let (low, high) = value_bounds(&series);

        assert!(low < 1. && high > 1.);
    }
}
