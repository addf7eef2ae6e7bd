use image::Rgba;
use serde::{Deserialize, Serialize};

/// A colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    #[serde(default)]
    pub red: f32,
    #[serde(default)]
    pub green: f32,
    #[serde(default)]
    pub blue: f32,
}

impl Color {
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    pub fn to_rgba(self, alpha: u8) -> Rgba<u8> {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Rgba([channel(self.red), channel(self.green), channel(self.blue), alpha])
    }

    pub fn opaque(self) -> Rgba<u8> {
        self.to_rgba(255)
    }

    /// Each channel raised by 40 out of 255, the tint used for decorations.
    pub fn lightened(self) -> Self {
        let lift = |v: f32| (v + 40.0 / 255.0).min(1.0);
        Self::new(lift(self.red), lift(self.green), lift(self.blue))
    }
}

/// Slide colours. Missing keys keep their default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    pub title_bg: Color,
    pub title_text: Color,
    pub content_bg: Color,
    pub body_text: Color,
    pub heading: Color,
    pub accent: Color,
    pub closing_bg: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            title_bg: Color::new(0.1, 0.12, 0.18),
            title_text: Color::new(1.0, 1.0, 1.0),
            content_bg: Color::new(0.98, 0.98, 1.0),
            body_text: Color::new(0.2, 0.25, 0.3),
            heading: Color::new(0.1, 0.15, 0.25),
            accent: Color::new(0.39, 0.4, 0.95),
            closing_bg: Color::new(0.1, 0.12, 0.18),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Template {
    #[default]
    Modern,
    Vibrant,
    Sunset,
    Nature,
    Glass,
    /// Unknown names: colours only, no decorative shapes.
    Plain,
}

impl Template {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "modern" => Template::Modern,
            "vibrant" => Template::Vibrant,
            "sunset" => Template::Sunset,
            "nature" => Template::Nature,
            "glass" => Template::Glass,
            _ => Template::Plain,
        }
    }
}

fn default_template_name() -> String {
    "modern".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSettings {
    #[serde(default = "default_template_name")]
    pub template: String,
    #[serde(default)]
    pub colors: Palette,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            template: default_template_name(),
            colors: Palette::default(),
        }
    }
}

impl TemplateSettings {
    pub fn kind(&self) -> Template {
        Template::from_name(&self.template)
    }
}
