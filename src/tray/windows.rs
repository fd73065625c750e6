use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale};
use tray_icon::menu::{CheckMenuItem, Menu, MenuEvent, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder, TrayIconEvent};

use crate::config::AppConfig;
use crate::hid::report::BatteryReading;
use crate::notifier::{Notification, Severity};
use crate::tray::{TrayCommand, TrayUpdater};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

const TOOLTIP_HEADER: &str = "Angry Miao Infinity Battery";

pub struct WindowsTray {
    tray: TrayIcon,
    popup_items: Vec<(u8, CheckMenuItem)>,
    startup_item: CheckMenuItem,
    exit_item: MenuItem,
    last_text: String,
    last_color: Rgba<u8>,
}

pub fn create_tray(
    config: &AppConfig,
    startup_enabled: bool,
) -> Result<WindowsTray, Box<dyn std::error::Error>> {
    let menu = Menu::new();

    let startup_item = CheckMenuItem::new("Start on logon", true, startup_enabled, None);
    menu.append(&startup_item)?;

    let mut popup_items = Vec::new();
    for (threshold, checked) in [
        (30u8, config.popup_30),
        (20u8, config.popup_20),
        (10u8, config.popup_10),
    ] {
        let item = CheckMenuItem::new(format!("{}% popup", threshold), true, checked, None);
        menu.append(&item)?;
        popup_items.push((threshold, item));
    }

    let exit_item = MenuItem::new("Exit", true, None);
    menu.append(&exit_item)?;

    let (icon_rgba, icon_width, icon_height) = render_text_icon("--", WHITE)?;
    let icon = Icon::from_rgba(icon_rgba, icon_width, icon_height)?;

    let tray = TrayIconBuilder::new()
        .with_tooltip(tooltip(&BatteryReading::unavailable()))
        .with_icon(icon)
        .with_menu(Box::new(menu))
        .build()?;

    Ok(WindowsTray {
        tray,
        popup_items,
        startup_item,
        exit_item,
        last_text: "--".to_string(),
        last_color: WHITE,
    })
}

fn tooltip(reading: &BatteryReading) -> String {
    format!("{}\n{}", TOOLTIP_HEADER, reading)
}

impl WindowsTray {
    fn render(&mut self, text: &str, color: Rgba<u8>) {
        if text == self.last_text && color == self.last_color {
            return;
        }

        if let Ok((icon_rgba, icon_width, icon_height)) = render_text_icon(text, color) {
            if let Ok(icon) = Icon::from_rgba(icon_rgba, icon_width, icon_height) {
                let _ = self.tray.set_icon(Some(icon));
                self.last_text = text.to_string();
                self.last_color = color;
            }
        }
    }
}

impl TrayUpdater for WindowsTray {
    fn update(&mut self, reading: &BatteryReading, severity: Option<Severity>) {
        let color = match severity {
            Some(Severity::Critical) => RED,
            Some(Severity::Warning) => YELLOW,
            None => WHITE,
        };

        let text = match reading.mouse {
            Some(level) => level.to_string(),
            None => "--".to_string(),
        };

        self.render(&text, color);
        let _ = self.tray.set_tooltip(Some(tooltip(reading)));
    }

    fn notify(&mut self, event: &Notification) {
        let color = match event.severity {
            Severity::Critical => RED,
            Severity::Warning => YELLOW,
        };

        let text = match event.reading.mouse {
            Some(level) => level.to_string(),
            None => "--".to_string(),
        };

        self.render(&text, color);
        let _ = self
            .tray
            .set_tooltip(Some(format!("{}\n{}", event.title(), event.reading)));
    }

    fn drain_commands(&mut self) -> Vec<TrayCommand> {
        let mut commands = Vec::new();

        while let Ok(event) = MenuEvent::receiver().try_recv() {
            if event.id() == self.exit_item.id() {
                commands.push(TrayCommand::Exit);
            } else if event.id() == self.startup_item.id() {
                commands.push(TrayCommand::ToggleStartup(self.startup_item.is_checked()));
            } else {
                for (threshold, item) in &self.popup_items {
                    if event.id() == item.id() {
                        commands.push(TrayCommand::TogglePopup(*threshold, item.is_checked()));
                    }
                }
            }
        }

        while let Ok(event) = TrayIconEvent::receiver().try_recv() {
            match event {
                TrayIconEvent::Enter { .. }
                | TrayIconEvent::Move { .. }
                | TrayIconEvent::DoubleClick { .. } => commands.push(TrayCommand::Refresh),
                _ => {}
            }
        }

        commands
    }
}

/// Renders a 16x16 icon with the percentage text in the given color.
fn render_text_icon(
    text: &str,
    color: Rgba<u8>,
) -> Result<(Vec<u8>, u32, u32), Box<dyn std::error::Error>> {
    const WIDTH: u32 = 16;
    const HEIGHT: u32 = 16;

    let mut image = RgbaImage::from_pixel(WIDTH, HEIGHT, Rgba([0, 0, 0, 0]));

    let font_data = std::fs::read("C:\\Windows\\Fonts\\consola.ttf")
        .or_else(|_| std::fs::read("C:\\Windows\\Fonts\\arial.ttf"))
        .or_else(|_| std::fs::read("C:\\Windows\\Fonts\\cour.ttf"))?;

    let font = Font::try_from_vec(font_data).ok_or("Failed to load font")?;

    // Shrink to fit: "7", "42", "100" and the "--" placeholder.
    let (scale, x_offset, y_offset) = match text.len() {
        1 => (Scale::uniform(13.0), 4.0, 1.0),
        2 => (Scale::uniform(11.0), 1.0, 1.0),
        _ => (Scale::uniform(9.0), 0.0, 2.0),
    };

    let v_metrics = font.v_metrics(scale);
    let start = rusttype::Point {
        x: x_offset,
        y: y_offset + v_metrics.ascent,
    };

    for glyph in font.layout(text, scale, start) {
        if let Some(bounding_box) = glyph.pixel_bounding_box() {
            glyph.draw(|x, y, coverage| {
                let px = (bounding_box.min.x + x as i32) as u32;
                let py = (bounding_box.min.y + y as i32) as u32;

                if px < WIDTH && py < HEIGHT {
                    let alpha = (coverage * 255.0) as u8;
                    let blended = blend(*image.get_pixel(px, py), color, alpha);
                    image.put_pixel(px, py, blended);
                }
            });
        }
    }

    Ok((image.into_raw(), WIDTH, HEIGHT))
}

fn blend(background: Rgba<u8>, foreground: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let alpha_f = alpha as f32 / 255.0;
    let bg = background.0;
    let fg = foreground.0;

    let channel = |f: u8, b: u8| (f as f32 * alpha_f + b as f32 * (1.0 - alpha_f)) as u8;

    Rgba([
        channel(fg[0], bg[0]),
        channel(fg[1], bg[1]),
        channel(fg[2], bg[2]),
        channel(fg[3], bg[3]).max(bg[3]),
    ])
}
