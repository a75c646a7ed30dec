//! Reference renderer: draws sampled sprites into a terminal with half-block cells.
//!
//! Each cell shows two vertical dots (`▄` with background = top dot, foreground =
//! bottom dot), so a terminal of `cols x rows` is a `cols x rows*2` dot canvas.

use crate::effects::Shape;
use crate::effects::balloons::STRING_RATIO;
use crate::kind::Rgb;
use crate::population::{Sprite, Viewport};
use std::io::{self, Write};

/// Viewport pixels covered by one dot.
pub const PIXELS_PER_DOT: f32 = 8.0;

const STRING_COLOR: Rgb = (170, 170, 170);
// Forces a color escape at the start of each row
const NO_COLOR: Rgb = (255, 255, 255);

pub struct TerminalRenderer {
    width: usize,
    height: usize,
    background: Rgb,
    glow_buffer: Vec<(f32, Rgb)>,
    output_buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new(cols: usize, rows: usize, background: Rgb) -> Self {
        let width = cols;
        let height = rows * 2;
        Self {
            width,
            height,
            background,
            glow_buffer: vec![(0.0, background); width * height],
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        *self = Self::new(cols, rows, self.background);
    }

    /// Viewport that maps one-to-one onto this terminal's dot canvas.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.width as f32 * PIXELS_PER_DOT,
            self.height as f32 * PIXELS_PER_DOT,
        )
    }

    pub fn draw<W: Write>(&mut self, sprites: &[Sprite], out: &mut W) -> io::Result<()> {
        self.glow_buffer.fill((0.0, self.background));

        for sprite in sprites.iter().filter(|s| s.is_visible()) {
            let cx = sprite.pose.x / PIXELS_PER_DOT;
            let cy = sprite.pose.y / PIXELS_PER_DOT;
            let radius = sprite.size * sprite.pose.scale / 2.0 / PIXELS_PER_DOT;
            let intensity = sprite.pose.opacity;

            match sprite.shape {
                Shape::Circle => self.fill_disc(cx, cy, radius, intensity, sprite.color),
                Shape::Square => {
                    self.fill_square(cx, cy, radius, sprite.pose.rotation, intensity, sprite.color);
                }
                Shape::Spark => {
                    // Small glow around the spark, the spark itself on top
                    for dy in -1..=1 {
                        for dx in -1..=1 {
                            if dx != 0 || dy != 0 {
                                self.plot(cx as i32 + dx, cy as i32 + dy, intensity * 0.3, sprite.color);
                            }
                        }
                    }
                    self.plot(cx as i32, cy as i32, intensity, sprite.color);
                }
                Shape::Balloon => {
                    self.fill_disc(cx, cy, radius, intensity, sprite.color);
                    // String hangs from the bottom of the balloon
                    let string_len = sprite.size * sprite.pose.scale * STRING_RATIO / PIXELS_PER_DOT;
                    let top = (cy + radius) as i32;
                    for y in top..=(cy + radius + string_len) as i32 {
                        self.plot(cx as i32, y, intensity, STRING_COLOR);
                    }
                }
            }
        }

        self.compose()?;
        out.write_all(&self.output_buf)?;
        out.flush()
    }

    fn plot(&mut self, x: i32, y: i32, intensity: f32, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if intensity > self.glow_buffer[idx].0 {
            self.glow_buffer[idx] = (intensity, color);
        }
    }

    fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, intensity: f32, color: Rgb) {
        let reach = radius.ceil() as i32;
        let (ix, iy) = (cx as i32, cy as i32);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let (fx, fy) = (dx as f32, dy as f32);
                if fx * fx + fy * fy <= radius * radius {
                    self.plot(ix + dx, iy + dy, intensity, color);
                }
            }
        }
        // Tiny bodies still get one dot
        self.plot(ix, iy, intensity, color);
    }

    fn fill_square(&mut self, cx: f32, cy: f32, half: f32, rotation_deg: f32, intensity: f32, color: Rgb) {
        let (sin, cos) = rotation_deg.to_radians().sin_cos();
        let reach = (half * std::f32::consts::SQRT_2).ceil() as i32;
        let (ix, iy) = (cx as i32, cy as i32);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let (fx, fy) = (dx as f32, dy as f32);
                let u = fx * cos + fy * sin;
                let v = -fx * sin + fy * cos;
                if u.abs() <= half && v.abs() <= half {
                    self.plot(ix + dx, iy + dy, intensity, color);
                }
            }
        }
        self.plot(ix, iy, intensity, color);
    }

    fn blend(&self, (intensity, color): (f32, Rgb)) -> Rgb {
        let bg = self.background;
        if intensity <= 0.05 {
            return bg;
        }
        let blend = intensity.min(1.0);
        (
            (bg.0 as f32 * (1.0 - blend) + color.0 as f32 * blend) as u8,
            (bg.1 as f32 * (1.0 - blend) + color.1 as f32 * blend) as u8,
            (bg.2 as f32 * (1.0 - blend) + color.2 as f32 * blend) as u8,
        )
    }

    fn compose(&mut self) -> io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top = NO_COLOR;
        let mut prev_bot = NO_COLOR;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top_idx = y * self.width + x;
                let bot_idx = if y + 1 < self.height {
                    (y + 1) * self.width + x
                } else {
                    top_idx
                };

                let top = self.blend(self.glow_buffer[top_idx]);
                let bot = self.blend(self.glow_buffer[bot_idx]);

                // Only emit color codes if changed
                if top != prev_top {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = top;
                }
                if bot != prev_bot {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = bot;
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = NO_COLOR;
            prev_bot = NO_COLOR;
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        Ok(())
    }
}
