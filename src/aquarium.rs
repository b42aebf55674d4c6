use crate::error::SceneError;
use crate::item::{Item, ItemId, ItemKind};
use crate::sprite::{Assets, Bounds};
use crate::storage;
use crate::surface::{Surface, TextStyle};
use crate::xml::{self, Element};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::{debug, warn};

/// Where freshly added items appear before anyone moves them.
pub const INITIAL_LOCATION: (f64, f64) = (200.0, 200.0);

pub const DEFAULT_CAPTION: &str = "Under the Sea!";

const CAPTION_STYLE: TextStyle = TextStyle {
    size: 20.0,
    rgb: (0, 64, 0),
};

const ROOT_TAG: &str = "aqua";
const ITEM_TAG: &str = "item";

/// The scene: an ordered stack of items over a fixed background.
///
/// Later items draw on top and win hit-tests.
#[derive(Debug)]
pub struct Aquarium {
    items: Vec<Item>,
    rng: StdRng,
    assets: Assets,
    caption: String,
    next_id: u64,
}

impl Aquarium {
    pub fn new(assets: Assets) -> Self {
        Self::with_rng(assets, StdRng::from_entropy())
    }

    pub fn with_seed(assets: Assets, seed: u64) -> Self {
        Self::with_rng(assets, StdRng::seed_from_u64(seed))
    }

    fn with_rng(assets: Assets, rng: StdRng) -> Self {
        Self {
            items: Vec::new(),
            rng,
            assets,
            caption: DEFAULT_CAPTION.to_string(),
            next_id: 1,
        }
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn bounds(&self) -> Bounds {
        self.assets.bounds()
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id() == id)
    }

    /// Builds an item of `kind` using this aquarium's generator.
    pub fn create(&mut self, kind: ItemKind) -> Item {
        Item::new(kind, &self.assets, &mut self.rng)
    }

    /// Resets the item to [`INITIAL_LOCATION`] and puts it on top.
    pub fn add(&mut self, mut item: Item) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        item.set_id(id);
        item.set_location(INITIAL_LOCATION.0, INITIAL_LOCATION.1);
        debug!(%id, kind = %item.kind(), "item added");
        self.items.push(item);
        id
    }

    pub fn spawn(&mut self, kind: ItemKind) -> ItemId {
        let item = self.create(kind);
        self.add(item)
    }

    /// Moves an item; returns false if `id` is not in the scene.
    pub fn set_location(&mut self, id: ItemId, x: f64, y: f64) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.set_location(x, y);
                true
            }
            None => false,
        }
    }

    /// Topmost item under the point, if any.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<ItemId> {
        self.items
            .iter()
            .rev()
            .find(|i| i.hit_test(x, y))
            .map(Item::id)
    }

    pub fn move_item_to_end(&mut self, id: ItemId) {
        if let Some(ix) = self.items.iter().position(|i| i.id() == id) {
            let item = self.items.remove(ix);
            self.items.push(item);
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.draw_image(&self.assets.background, 0.0, 0.0, false);
        surface.draw_text(&self.caption, 10.0, 10.0, CAPTION_STYLE);
        for item in &self.items {
            item.draw(surface);
        }
    }

    pub fn update(&mut self, elapsed: f64) {
        let bounds = self.bounds();
        for item in &mut self.items {
            item.update(elapsed, bounds);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn to_document(&self) -> Result<String, SceneError> {
        let mut root = Element::new(ROOT_TAG);
        for item in &self.items {
            item.xml_save(&mut root);
        }
        xml::write_document(&root)
    }

    /// Replaces the scene with the one described by `text`.
    ///
    /// The document is parsed in full first; on error the scene is untouched.
    pub fn from_document(&mut self, text: &str) -> Result<(), SceneError> {
        let root = xml::parse_document(text)?;
        if root.name != ROOT_TAG {
            warn!(root = %root.name, "unexpected root element, loading items anyway");
        }

        self.clear();
        for node in root.children_named(ITEM_TAG) {
            let kind = ItemKind::from_tag(node.attr("type"));
            let item = self.create(kind);
            let id = self.add(item);
            if let Some(item) = self.item_mut(id) {
                item.xml_load(node);
            }
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let doc = self.to_document()?;
        storage::write_atomic(path, doc.as_bytes())?;
        debug!(path = %path.display(), items = self.items.len(), "aquarium saved");
        Ok(())
    }

    pub fn load(&mut self, path: &Path) -> Result<(), SceneError> {
        let text = storage::read_document(path)?;
        self.from_document(&text)?;
        debug!(path = %path.display(), items = self.items.len(), "aquarium loaded");
        Ok(())
    }
}
