mod layout;
mod template;

pub use layout::{MAX_POINTS, split_points, wrap_by_chars, wrap_by_width};
pub use template::{Color, Palette, Template, TemplateSettings};

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, RgbImage, Rgba, RgbaImage, imageops, imageops::FilterType};
use imageproc::{
    drawing::{Blend, draw_filled_ellipse_mut, draw_filled_rect_mut, draw_text_mut, text_size},
    rect::Rect,
};

use crate::types::{Slide, SlideKind};

pub const WIDTH: u32 = 1920;
pub const HEIGHT: u32 = 1080;

const TITLE_WRAP_CHARS: usize = 30;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

type Canvas = Blend<RgbaImage>;

/// Draws slides as raster images.
pub struct SlideRenderer {
    width: u32,
    height: u32,
    font: Option<FontVec>,
}

impl SlideRenderer {
    pub fn new(width: u32, height: u32, font: Option<FontVec>) -> Self {
        Self {
            width,
            height,
            font,
        }
    }

    /// Full-HD renderer with the first usable system font.
    pub fn discover() -> Self {
        let font = FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .find_map(load_font);
        if font.is_none() {
            tracing::warn!("No usable font found, slides will render without text");
        }
        Self::new(WIDTH, HEIGHT, font)
    }

    /// Replace the font with the one at `path`; an unreadable file keeps the current font.
    pub fn with_font_file(mut self, path: &Path) -> Self {
        match load_font(path) {
            Some(font) => self.font = Some(font),
            None => tracing::warn!(path = %path.display(), "Font file unusable, keeping current font"),
        }
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn render(&self, slide: &Slide, settings: &TemplateSettings) -> RgbImage {
        let palette = &settings.colors;
        let template = settings.kind();

        let canvas = match slide.kind {
            SlideKind::Title => self.title_slide(slide, palette, template),
            SlideKind::Closing => self.closing_slide(slide, palette, template),
            SlideKind::Content | SlideKind::Error => self.content_slide(slide, palette),
        };
        DynamicImage::ImageRgba8(canvas.0).to_rgb8()
    }

    fn px(&self, fraction: f32) -> f32 {
        self.height as f32 * fraction
    }

    /// Pixel sizes laid out for a 1080-line canvas, scaled to this one.
    fn scaled(&self, value: f32) -> i32 {
        (value * self.height as f32 / HEIGHT as f32).round() as i32
    }

    fn blank(&self, background: Color) -> Canvas {
        Blend(RgbaImage::from_pixel(
            self.width,
            self.height,
            background.opaque(),
        ))
    }

    fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        match &self.font {
            Some(font) => text_size(PxScale::from(size), font, text),
            None => (0, 0),
        }
    }

    fn text(&self, canvas: &mut Canvas, text: &str, x: i32, y: i32, size: f32, color: Rgba<u8>) {
        if let Some(font) = &self.font {
            draw_text_mut(canvas, color, x, y, PxScale::from(size), font, text);
        }
    }

    fn title_slide(&self, slide: &Slide, palette: &Palette, template: Template) -> Canvas {
        let mut canvas = self.blank(palette.title_bg);
        self.decorate(&mut canvas, palette.accent, template);

        let size = self.px(0.08);
        let line_height = self.px(0.1);
        let title = if slide.title.is_empty() {
            "Presentation"
        } else {
            slide.title.as_str()
        };
        let lines = wrap_by_chars(title, TITLE_WRAP_CHARS);

        let total_height = lines.len() as f32 * line_height;
        let start_y = (self.height as f32 - total_height) / 2.0;
        for (i, line) in lines.iter().enumerate() {
            let (w, _) = self.measure(line, size);
            let x = (self.width as i32 - w as i32) / 2;
            let y = (start_y + i as f32 * line_height) as i32;
            self.text(&mut canvas, line, x, y, size, palette.title_text.opaque());
        }

        let rule_width = (self.width as f32 * 0.3).min(self.scaled(400.0) as f32) as i32;
        let rule_y = (start_y + total_height) as i32 + self.scaled(30.0);
        self.rect(
            &mut canvas,
            (self.width as i32 - rule_width) / 2,
            rule_y,
            rule_width,
            self.scaled(4.0),
            palette.accent.opaque(),
        );
        canvas
    }

    fn content_slide(&self, slide: &Slide, palette: &Palette) -> Canvas {
        let mut canvas = self.blank(palette.content_bg);
        let accent = palette.accent.opaque();
        let padding = (self.width as f32 * 0.08) as i32;
        let text_width = (self.width as i32 - 2 * padding).max(1) as u32;

        self.rect(&mut canvas, 0, 0, self.width as i32, self.scaled(8.0), accent);
        self.ellipse(
            &mut canvas,
            self.width as i32 - self.scaled(50.0),
            self.scaled(50.0),
            self.scaled(150.0),
            palette.accent.to_rgba(30),
        );

        let mut y = padding + self.scaled(40.0);

        if let Some(number) = slide.slide_number {
            let badge = self.scaled(50.0);
            self.rect(&mut canvas, padding, y - self.scaled(10.0), badge, badge, accent);
            let label = number.to_string();
            let size = self.scaled(24.0) as f32;
            let (w, h) = self.measure(&label, size);
            self.text(
                &mut canvas,
                &label,
                padding + (badge - w as i32) / 2,
                y - self.scaled(10.0) + (badge - h as i32) / 2,
                size,
                Rgba([255, 255, 255, 255]),
            );
            y += badge + self.scaled(20.0);
        }

        if !slide.title.is_empty() {
            let size = self.px(0.05);
            let lines = if self.has_font() {
                wrap_by_width(&slide.title, text_width, |s| self.measure(s, size).0)
            } else {
                vec![slide.title.clone()]
            };
            for line in &lines {
                self.text(&mut canvas, line, padding, y, size, palette.heading.opaque());
                y += self.px(0.06) as i32;
            }
            self.rect(&mut canvas, padding, y, self.scaled(80.0), self.scaled(4.0), accent);
            y += self.scaled(40.0);
        }

        let body = slide.content_text();
        if !body.is_empty() {
            let size = self.px(0.032);
            let bullet = self.scaled(10.0);
            let indent = self.scaled(25.0);
            let point_width = text_width.saturating_sub(self.scaled(30.0) as u32).max(1);

            for point in split_points(body) {
                let bullet_y = y + self.px(0.015) as i32;
                self.ellipse(
                    &mut canvas,
                    padding + bullet / 2,
                    bullet_y + bullet / 2,
                    bullet / 2,
                    accent,
                );

                let lines = if self.has_font() {
                    wrap_by_width(&point, point_width, |s| self.measure(s, size).0)
                } else {
                    vec![point.clone()]
                };
                let last = lines.len().saturating_sub(1);
                for (i, line) in lines.iter().enumerate() {
                    self.text(&mut canvas, line, padding + indent, y, size, palette.body_text.opaque());
                    y += if i == last {
                        self.px(0.055) as i32
                    } else {
                        self.px(0.045) as i32
                    };
                }
            }
        }
        canvas
    }

    fn closing_slide(&self, slide: &Slide, palette: &Palette, template: Template) -> Canvas {
        let mut canvas = self.blank(palette.closing_bg);
        self.decorate(&mut canvas, palette.accent, template);

        let size = self.px(0.1);
        let text = if slide.title.is_empty() {
            "Thank You"
        } else {
            slide.title.as_str()
        };
        let (w, h) = self.measure(text, size);
        let x = (self.width as i32 - w as i32) / 2;
        let y = (self.height as i32 - h as i32) / 2 - self.scaled(30.0);
        self.text(&mut canvas, text, x, y, size, palette.title_text.opaque());

        let rule_width = (self.width as f32 * 0.15).min(self.scaled(200.0) as f32) as i32;
        self.rect(
            &mut canvas,
            (self.width as i32 - rule_width) / 2,
            y + h as i32 + self.scaled(30.0),
            rule_width,
            self.scaled(4.0),
            palette.accent.opaque(),
        );
        canvas
    }

    /// Translucent corner shapes for title and closing slides.
    fn decorate(&self, canvas: &mut Canvas, accent: Color, template: Template) {
        let (w, h) = (self.width as i32, self.height as i32);
        let light = accent.lightened();
        match template {
            Template::Modern | Template::Vibrant | Template::Sunset => {
                let r = self.scaled(100.0);
                self.ellipse(canvas, self.scaled(50.0), self.scaled(50.0), r, light.to_rgba(80));
                self.ellipse(
                    canvas,
                    w - self.scaled(50.0),
                    h - self.scaled(50.0),
                    r,
                    light.to_rgba(80),
                );
            }
            Template::Nature => {
                let r = self.scaled(150.0);
                self.ellipse(canvas, w - self.scaled(50.0), self.scaled(50.0), r, light.to_rgba(60));
                self.ellipse(canvas, self.scaled(50.0), h - self.scaled(50.0), r, light.to_rgba(60));
            }
            Template::Glass => {
                let r = self.scaled(200.0);
                self.ellipse(canvas, self.scaled(100.0), self.scaled(100.0), r, Rgba([255, 100, 150, 40]));
                self.ellipse(
                    canvas,
                    w - self.scaled(100.0),
                    h - self.scaled(100.0),
                    r,
                    Rgba([100, 150, 255, 40]),
                );
            }
            Template::Plain => {}
        }
    }

    fn ellipse(&self, canvas: &mut Canvas, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
        if radius > 0 {
            draw_filled_ellipse_mut(canvas, (cx, cy), radius, radius, color);
        }
    }

    fn rect(&self, canvas: &mut Canvas, x: i32, y: i32, width: i32, height: i32, color: Rgba<u8>) {
        if width > 0 && height > 0 {
            draw_filled_rect_mut(
                canvas,
                Rect::at(x, y).of_size(width as u32, height as u32),
                color,
            );
        }
    }
}

fn load_font(path: &Path) -> Option<FontVec> {
    let data = std::fs::read(path).ok()?;
    FontVec::try_from_vec_and_index(data, 0)
        .inspect_err(|e| tracing::debug!(error = %e, path = %path.display(), "Skipping font"))
        .ok()
}

/// Decode a base64 image (optionally a `data:` URL), flatten transparency onto white and
/// fit it onto a white canvas of the requested size.
pub fn decode_slide_image(payload: &str, width: u32, height: u32) -> Result<RgbImage, String> {
    let encoded = match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    };
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| format!("invalid base64: {e}"))?;
    let img = image::load_from_memory(&bytes).map_err(|e| format!("undecodable image: {e}"))?;

    let resized = if img.width() == width && img.height() == height {
        img
    } else {
        img.resize(width, height, FilterType::Lanczos3)
    };

    let rgba = resized.to_rgba8();
    let mut background = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let x = (i64::from(width) - i64::from(rgba.width())) / 2;
    let y = (i64::from(height) - i64::from(rgba.height())) / 2;
    imageops::overlay(&mut background, &rgba, x, y);

    Ok(DynamicImage::ImageRgba8(background).to_rgb8())
}

pub fn save_frame(image: &RgbImage, path: &Path) -> Result<(), image::ImageError> {
    image.save_with_format(path, image::ImageFormat::Png)
}
