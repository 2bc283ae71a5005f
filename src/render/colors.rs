#[derive(Debug, Clone, Copy)]
pub struct ColorSettings {
    /// Saturation multiplier (1.0 = palette as is)
    pub vibrancy: f32,
    /// |value| at which a tile reaches full saturation
    pub full_scale: f64,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            vibrancy: 1.0,
            full_scale: 0.05,
        }
    }
}

/// Our custom color representation for easy manipulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [to_u8(self.r), to_u8(self.g), to_u8(self.b)]
    }

    /// 24-bit ANSI background escape.
    pub fn ansi_bg(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("\x1b[48;2;{};{};{}m", r, g, b)
    }

    /// Black or white, whichever reads better on top of this color.
    pub fn contrast_fg(self) -> &'static str {
        let luma = 0.299 * self.r + 0.587 * self.g + 0.114 * self.b;
        if luma > 0.55 {
            "\x1b[38;2;0;0;0m"
        } else {
            "\x1b[38;2;255;255;255m"
        }
    }
}

fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub const GAIN_HUE: f32 = 130.0 / 360.0;
pub const LOSS_HUE: f32 = 0.0;

/// Tile color for a signed value: green for >= 0, red below.
/// Saturation grows with |value| up to `full_scale`.
pub fn value_color(value: f64, settings: &ColorSettings) -> AppColor {
    let hue = if value >= 0.0 { GAIN_HUE } else { LOSS_HUE };
    let strength = if settings.full_scale > 0.0 {
        (value.abs() / settings.full_scale).min(1.0) as f32
    } else {
        1.0
    };
    let s = (0.35 + 0.45 * strength) * settings.vibrancy.clamp(0.6, 2.0);
    hsv_to_rgb(hue, s.clamp(0.0, 1.0), 0.78)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> AppColor {
    let h6 = (h * 6.0).rem_euclid(6.0);
    let i = h6.floor() as i32;
    let f = h6 - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    AppColor { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gains_are_green_losses_red() {
        let settings = ColorSettings::default();
        let gain = value_color(0.05, &settings);
        assert!(gain.g > gain.r && gain.g > gain.b);
        let loss = value_color(-0.02, &settings);
        assert!(loss.r > loss.g && loss.r > loss.b);
    }

    #[test]
    fn larger_moves_are_more_saturated() {
        let settings = ColorSettings::default();
        let small = value_color(0.001, &settings);
        let large = value_color(0.2, &settings);
        assert!(large.r < small.r);
    }

    #[test]
    fn ansi_escape() {
        assert_eq!(AppColor::new(1.0, 0.0, 0.0).ansi_bg(), "\x1b[48;2;255;0;0m");
    }
}
