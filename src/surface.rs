use crate::sprite::Sprite;

/// Font and colour for overlay text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub rgb: (u8, u8, u8),
}

/// Whatever the host draws onto. Images are placed by their top-left corner.
pub trait Surface {
    fn draw_image(&mut self, sprite: &Sprite, x: f64, y: f64, mirrored: bool);
    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Image {
        path: String,
        x: f64,
        y: f64,
        mirrored: bool,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        style: TextStyle,
    },
}

/// A surface that only remembers what it was asked to draw, in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for RecordingSurface {
    fn draw_image(&mut self, sprite: &Sprite, x: f64, y: f64, mirrored: bool) {
        self.calls.push(DrawCall::Image {
            path: sprite.path.clone(),
            x,
            y,
            mirrored,
        });
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }
}
