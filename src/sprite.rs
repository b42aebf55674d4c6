use crate::item::ItemKind;
use serde::{Deserialize, Serialize};

/// Handle to an image resource: where it lives and how big it is.
///
/// Pixels are never decoded here; hosts resolve `path` themselves when they
/// implement [`Surface`](crate::surface::Surface).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub path: String,
    pub width: f64,
    pub height: f64,
}

impl Sprite {
    pub fn new(path: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

/// Usable scene size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

/// The fixed image set an aquarium draws with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assets {
    pub background: Sprite,
    pub beta: Sprite,
    pub dova: Sprite,
    pub chest: Sprite,
    pub castle: Sprite,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            background: Sprite::new("images/background1.png", 1024.0, 800.0),
            beta: Sprite::new("images/beta.png", 80.0, 50.0),
            dova: Sprite::new("images/dovahfin.png", 120.0, 80.0),
            chest: Sprite::new("images/chest1.png", 90.0, 70.0),
            castle: Sprite::new("images/castle.png", 150.0, 140.0),
        }
    }
}

impl Assets {
    pub fn sprite(&self, kind: ItemKind) -> &Sprite {
        match kind {
            ItemKind::Beta => &self.beta,
            ItemKind::Dova => &self.dova,
            ItemKind::Chest => &self.chest,
            ItemKind::Castle => &self.castle,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            width: self.background.width,
            height: self.background.height,
        }
    }
}
