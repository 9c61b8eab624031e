use eframe::egui::Color32;

/// Colors and type sizes for every slide. Sizes are in points at a
/// 1920x1080 reference frame and are multiplied by the render scale.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color32,
    pub surface: Color32,
    pub foreground: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub teal: Color32,
    pub blue: Color32,
    pub purple: Color32,
    pub yellow: Color32,
    pub pink: Color32,
    pub red: Color32,
    pub cover_size: f32,
    pub section_size: f32,
    pub title_size: f32,
    pub body_size: f32,
    pub small_size: f32,
    pub code_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::charcoal()
    }
}

impl Theme {
    pub fn charcoal() -> Self {
        Self {
            background: Color32::from_rgb(0x1A, 0x1A, 0x1A),
            surface: Color32::from_rgb(0x3D, 0x3D, 0x3D),
            foreground: Color32::from_rgb(0xF0, 0xEB, 0xE3),
            muted: Color32::from_rgb(0xA3, 0x9E, 0x96),
            accent: Color32::from_rgb(0xD9, 0x77, 0x57),
            teal: Color32::from_rgb(0x7B, 0xC4, 0xB5),
            blue: Color32::from_rgb(0x6A, 0x9B, 0xD8),
            purple: Color32::from_rgb(0xA7, 0x8B, 0xD9),
            yellow: Color32::from_rgb(0xE5, 0xC0, 0x7B),
            pink: Color32::from_rgb(0xE0, 0x8F, 0xB0),
            red: Color32::from_rgb(0xE0, 0x6C, 0x6C),
            cover_size: 128.0,
            section_size: 96.0,
            title_size: 60.0,
            body_size: 34.0,
            small_size: 20.0,
            code_size: 30.0,
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(
            color.r(),
            color.g(),
            color.b(),
            (opacity.clamp(0.0, 1.0) * 255.0) as u8,
        )
    }

    /// Linear blend from `a` (t = 0) to `b` (t = 1), opaque.
    pub fn mix(a: Color32, b: Color32, t: f32) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
        Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
    }

    /// Cycling chip colors for tokens, shared by the tokenizer and the generation demo.
    pub fn token_palette(&self) -> [Color32; 6] {
        [
            self.teal,
            self.accent,
            self.purple,
            self.blue,
            self.yellow,
            self.pink,
        ]
    }

    pub fn token_color(&self, index: usize) -> Color32 {
        let palette = self.token_palette();
        palette[index % palette.len()]
    }
}
