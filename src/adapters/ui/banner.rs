//! Title banner with a two-stop colour gradient.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{Write, stderr};

pub const TITLE: &str = "MSA COMPETITION DENSITY";
const RULE_WIDTH: usize = 80;

/// Gulf Blue (#0077b6).
const GULF_BLUE: (u8, u8, u8) = (0x00, 0x77, 0xb6);
/// Citrus Orange (#f77f00).
const CITRUS_ORANGE: (u8, u8, u8) = (0xf7, 0x7f, 0x00);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

/// Ruled title, coloured character by character from Gulf Blue to Citrus
/// Orange, followed by the version and `subtitle`.
pub fn print_title(subtitle: &str) {
    let mut out = stderr();
    let rule = "=".repeat(RULE_WIDTH);
    let chars: Vec<char> = TITLE.chars().collect();
    let last = chars.len().saturating_sub(1).max(1);

    let _ = out.execute(SetForegroundColor(rgb(GULF_BLUE)));
    let _ = out.execute(Print(format!("{}\r\n", rule)));
    for (i, ch) in chars.iter().enumerate() {
        let color = lerp_rgb(GULF_BLUE, CITRUS_ORANGE, i as f64 / last as f64);
        let _ = out.execute(SetForegroundColor(rgb(color)));
        let _ = out.execute(Print(ch));
    }
    let _ = out.execute(Print("\r\n"));
    let _ = out.execute(SetForegroundColor(rgb(GULF_BLUE)));
    let _ = out.execute(Print(format!("{}\r\n", rule)));

    let _ = out.execute(SetForegroundColor(rgb(CITRUS_ORANGE)));
    let _ = out.execute(Print(format!(
        "v{} · {}\r\n",
        env!("CARGO_PKG_VERSION"),
        subtitle
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
