//! Scene model and `.aqua` persistence for an aquarium editor.
//!
//! An [`Aquarium`] owns an ordered stack of [`Item`]s: decor that stays put and
//! fish that swim between the walls. Hosts drive it with [`Aquarium::update`]
//! once per frame, draw it onto their own [`Surface`], and save or load it as
//! XML.

pub mod aquarium;
pub mod config;
pub mod error;
pub mod geom;
pub mod item;
pub mod sprite;
pub mod storage;
pub mod surface;
pub mod xml;

pub use aquarium::Aquarium;
pub use error::SceneError;
pub use geom::Vec2;
pub use item::{Fish, Item, ItemId, ItemKind};
pub use sprite::{Assets, Bounds, Sprite};
pub use surface::{DrawCall, RecordingSurface, Surface, TextStyle};
