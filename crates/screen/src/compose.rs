//! Paint a [`Scene`] onto any RGB565 draw target.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::state::{Dashboard, PopupKind, Scene};
use crate::theme::{font_for_size, Palette, Theme};

/// strftime format of the dashboard's last-tap line
pub const LAST_TAP_FORMAT: &str = "%H:%M:%S";

/// Fill the target with the scene's background and draw its text centred.
pub fn compose<D>(scene: &Scene, theme: &Theme, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    match scene {
        Scene::Dashboard(dashboard) => {
            let lines = dashboard_lines(dashboard);
            let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
            paint(target, theme.dashboard, theme.dashboard_font_size, &lines)
        }
        Scene::Popup(PopupKind::TapEvent) => paint(
            target,
            theme.tap_event,
            theme.popup_font_size,
            &[theme.tap_event_message.as_str()],
        ),
        Scene::Popup(PopupKind::Error) => paint(
            target,
            theme.error,
            theme.popup_font_size,
            &[theme.error_message.as_str()],
        ),
    }
}

/// Dashboard text, one entry per line.
pub fn dashboard_lines(dashboard: &Dashboard) -> Vec<String> {
    let last = dashboard.last_tap.map_or_else(
        || "--:--:--".to_owned(),
        |ts| ts.to_datetime().format(LAST_TAP_FORMAT).to_string(),
    );
    vec![
        format!("GOOD: {}", dashboard.good),
        format!("BAD: {}", dashboard.bad),
        format!("Last tap: {last}"),
    ]
}

fn paint<D>(target: &mut D, palette: Palette, font_size: u32, lines: &[&str]) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(palette.background.to_rgb565())?;

    let font = font_for_size(font_size);
    let character_style = MonoTextStyle::new(font, palette.foreground.to_rgb565());
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();

    // Lines are stacked around the centre of the target.
    let center = target.bounding_box().center();
    let line_height = i32::try_from(font.character_size.height).unwrap_or(i32::MAX);
    let count = i32::try_from(lines.len()).unwrap_or(i32::MAX);
    let top = center.y - (count - 1) * line_height / 2;

    for (row, line) in (0..).zip(lines) {
        let at = Point::new(center.x, top + row * line_height);
        Text::with_text_style(line, at, character_style, text_style).draw(target)?;
    }
    Ok(())
}
