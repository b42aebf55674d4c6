use crate::geom::Vec2;
use crate::sprite::{Assets, Bounds, Sprite};
use crate::surface::Surface;
use crate::xml::Element;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Distance fish keep from the scene edges, in pixels.
pub const WALL_MARGIN: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Castle,
    Beta,
    Dova,
    Chest,
}

/// Inclusive velocity sampling bounds in px/s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedRange {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Beta,
        ItemKind::Dova,
        ItemKind::Chest,
        ItemKind::Castle,
    ];

    /// Discriminant written to the `type` attribute.
    pub fn tag(self) -> &'static str {
        match self {
            ItemKind::Castle => "castle",
            ItemKind::Beta => "beta",
            ItemKind::Dova => "dova",
            ItemKind::Chest => "chest",
        }
    }

    /// Kind for a stored `type` attribute. Anything unrecognised is a castle.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("beta") => ItemKind::Beta,
            Some("chest") => ItemKind::Chest,
            Some("dova") => ItemKind::Dova,
            _ => ItemKind::Castle,
        }
    }

    /// `None` for decor that never moves.
    pub fn speed_range(self) -> Option<SpeedRange> {
        let (min_x, max_x, min_y, max_y) = match self {
            ItemKind::Beta => (1.0, 10.0, -10.0, 10.0),
            ItemKind::Dova => (15.0, 30.0, -5.0, 5.0),
            ItemKind::Chest => (0.1, 0.2, 0.0, 0.0),
            ItemKind::Castle => return None,
        };
        Some(SpeedRange {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|k| k.tag() == s)
            .ok_or_else(|| format!("unknown item kind `{s}` (expected beta, dova, chest or castle)"))
    }
}

/// Stable handle to an item inside one aquarium.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Motion state carried by swimming items.
#[derive(Clone, Debug, PartialEq)]
pub struct Fish {
    velocity: Vec2,
}

impl Fish {
    fn sample<R: Rng + ?Sized>(range: SpeedRange, rng: &mut R) -> Self {
        let vx = rng.gen_range(range.min_x..=range.max_x);
        let vy = rng.gen_range(range.min_y..=range.max_y);
        Self {
            velocity: Vec2::new(vx, vy),
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn xml_save(&self, node: &mut Element) {
        node.set_attr("speedx", self.velocity.x);
        node.set_attr("speedy", self.velocity.y);
    }
}

#[derive(Clone, Debug)]
pub struct Item {
    id: ItemId,
    kind: ItemKind,
    pos: Vec2,
    mirror: bool,
    sprite: Sprite,
    fish: Option<Fish>,
}

impl Item {
    /// Builds an unplaced item. Fish draw their velocity from `rng` here and
    /// nowhere else.
    pub fn new<R: Rng + ?Sized>(kind: ItemKind, assets: &Assets, rng: &mut R) -> Self {
        Self {
            id: ItemId(0),
            kind,
            pos: Vec2::ZERO,
            mirror: false,
            sprite: assets.sprite(kind).clone(),
            fish: kind.speed_range().map(|range| Fish::sample(range, rng)),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ItemId) {
        self.id = id;
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn mirror(&self) -> bool {
        self.mirror
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn fish(&self) -> Option<&Fish> {
        self.fish.as_ref()
    }

    pub fn velocity(&self) -> Option<Vec2> {
        self.fish.as_ref().map(Fish::velocity)
    }

    pub fn set_location(&mut self, x: f64, y: f64) {
        self.pos = Vec2::new(x, y);
    }

    pub fn set_mirror(&mut self, mirror: bool) {
        self.mirror = mirror;
    }

    fn top_left(&self) -> Vec2 {
        self.pos - Vec2::new(self.sprite.width / 2.0, self.sprite.height / 2.0)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let at = self.top_left();
        surface.draw_image(&self.sprite, at.x, at.y, self.mirror);
    }

    /// True if the point falls on the sprite's footprint.
    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        let local = Vec2::new(x, y) - self.top_left();
        local.x >= 0.0
            && local.y >= 0.0
            && local.x < self.sprite.width
            && local.y < self.sprite.height
    }

    /// Appends this item as an `<item>` child of `parent` and returns the new node.
    ///
    /// Attribute order is position, then fish speed, then `type`.
    pub fn xml_save<'a>(&self, parent: &'a mut Element) -> &'a mut Element {
        let node = parent.append(Element::new("item"));
        node.set_attr("x", self.pos.x);
        node.set_attr("y", self.pos.y);
        if let Some(fish) = &self.fish {
            fish.xml_save(node);
        }
        node.set_attr("type", self.kind.tag());
        node
    }

    pub fn xml_load(&mut self, node: &Element) {
        self.set_location(node.attr_f64("x"), node.attr_f64("y"));
        if let Some(fish) = self.fish.as_mut() {
            fish.velocity = Vec2::new(node.attr_f64("speedx"), node.attr_f64("speedy"));
            self.mirror = fish.velocity.x < 0.0;
        }
    }

    /// Advances one animation step. Fish bounce off the scene walls; decor
    /// stays put.
    pub fn update(&mut self, elapsed: f64, bounds: Bounds) {
        let Some(fish) = self.fish.as_mut() else {
            return;
        };
        self.pos += fish.velocity * elapsed;

        let (w, h) = (self.sprite.width, self.sprite.height);
        if fish.velocity.x > 0.0 && self.pos.x >= bounds.width - WALL_MARGIN - w / 2.0 {
            fish.velocity.x = -fish.velocity.x;
            self.mirror = true;
        } else if fish.velocity.x < 0.0 && self.pos.x <= WALL_MARGIN + w / 2.0 {
            fish.velocity.x = -fish.velocity.x;
            self.mirror = false;
        }

        // Vertical walls use the full sprite height.
        if self.pos.y < WALL_MARGIN + h || self.pos.y > bounds.height - WALL_MARGIN - h {
            fish.velocity.y = -fish.velocity.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCall, RecordingSurface};
    use crate::xml::parse_document;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fish_with(kind: ItemKind, vx: f64, vy: f64) -> Item {
        let mut rng = StdRng::seed_from_u64(1);
        let mut item = Item::new(kind, &Assets::default(), &mut rng);
        item.fish = Some(Fish {
            velocity: Vec2::new(vx, vy),
        });
        item
    }

    #[test]
    fn tags_fall_back_to_castle() {
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::from_tag(Some(kind.tag())), kind);
            assert_eq!(kind.tag().parse::<ItemKind>(), Ok(kind));
        }
        assert_eq!(ItemKind::from_tag(Some("unknown")), ItemKind::Castle);
        assert_eq!(ItemKind::from_tag(Some("BETA")), ItemKind::Castle);
        assert_eq!(ItemKind::from_tag(None), ItemKind::Castle);
        assert!("shark".parse::<ItemKind>().is_err());
    }

    #[test]
    fn velocities_stay_inside_kind_ranges() {
        let assets = Assets::default();
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for kind in ItemKind::ALL {
            for _ in 0..200 {
                let item = Item::new(kind, &assets, &mut rng);
                match (kind.speed_range(), item.velocity()) {
                    (Some(r), Some(v)) => {
                        assert!(v.x >= r.min_x && v.x <= r.max_x, "{kind} vx {}", v.x);
                        assert!(v.y >= r.min_y && v.y <= r.max_y, "{kind} vy {}", v.y);
                    }
                    (None, None) => {}
                    other => panic!("{kind} motion mismatch: {other:?}"),
                }
            }
        }
        let chest = Item::new(ItemKind::Chest, &assets, &mut rng);
        assert_eq!(chest.velocity().map(|v| v.y), Some(0.0));
    }

    #[test]
    fn hit_test_covers_sprite_rectangle() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut item = Item::new(ItemKind::Beta, &Assets::default(), &mut rng);
        item.set_location(100.0, 200.0);
        // beta sprite is 80x50
        assert!(item.hit_test(100.0, 200.0));
        assert!(item.hit_test(60.0, 175.0));
        assert!(item.hit_test(139.9, 224.9));
        assert!(!item.hit_test(140.0, 200.0));
        assert!(!item.hit_test(100.0, 225.0));
        assert!(!item.hit_test(59.9, 200.0));
    }

    #[test]
    fn draw_places_sprite_by_corner() {
        let mut item = fish_with(ItemKind::Dova, -3.0, 0.0);
        item.set_location(300.0, 300.0);
        item.set_mirror(true);
        let mut surface = RecordingSurface::new();
        item.draw(&mut surface);
        assert_eq!(
            surface.calls,
            vec![DrawCall::Image {
                path: "images/dovahfin.png".to_string(),
                x: 240.0,
                y: 260.0,
                mirrored: true,
            }]
        );
    }

    #[test]
    fn xml_save_orders_attributes() {
        let mut root = Element::new("aqua");
        let mut fish = fish_with(ItemKind::Beta, 2.5, -1.0);
        fish.set_location(100.0, 200.0);
        fish.xml_save(&mut root);
        let mut castle = fish_with(ItemKind::Castle, 0.0, 0.0);
        castle.fish = None;
        castle.set_location(620.0, 120.0);
        castle.xml_save(&mut root).set_attr("extra", 1);

        let keys: Vec<Vec<&str>> = root
            .children
            .iter()
            .map(|c| c.attrs().map(|(k, _)| k).collect())
            .collect();
        assert_eq!(keys[0], ["x", "y", "speedx", "speedy", "type"]);
        assert_eq!(keys[1], ["x", "y", "type", "extra"]);
        assert_eq!(root.children[0].attr("speedx"), Some("2.5"));
        assert_eq!(root.children[0].attr("x"), Some("100"));
        assert_eq!(root.children[1].attr("type"), Some("castle"));
    }

    #[test]
    fn xml_load_restores_speed_and_mirror() {
        let node = parse_document(r#"<item x="12" y="34.5" speedx="-4" speedy="2" type="dova"/>"#)
            .unwrap();
        let mut item = fish_with(ItemKind::Dova, 20.0, 1.0);
        item.xml_load(&node);
        assert_eq!(item.position(), Vec2::new(12.0, 34.5));
        assert_eq!(item.velocity(), Some(Vec2::new(-4.0, 2.0)));
        assert!(item.mirror());

        let bare = parse_document(r#"<item x="oops"/>"#).unwrap();
        item.xml_load(&bare);
        assert_eq!(item.position(), Vec2::ZERO);
        assert_eq!(item.velocity(), Some(Vec2::ZERO));
        assert!(!item.mirror());
    }

    #[test]
    fn fish_reflects_off_side_walls() {
        let bounds = Assets::default().bounds();
        let mut fish = fish_with(ItemKind::Beta, 5.0, 0.0);
        fish.set_location(500.0, 400.0);

        let mut steps = 0;
        while !fish.mirror() {
            fish.update(1.0, bounds);
            steps += 1;
            assert!(steps < 10_000, "never reached the right wall");
        }
        assert!(fish.velocity().unwrap().x < 0.0);
        assert!(fish.position().x >= bounds.width - WALL_MARGIN - 40.0);

        while fish.mirror() {
            fish.update(1.0, bounds);
            steps += 1;
            assert!(steps < 20_000, "never reached the left wall");
        }
        assert!(fish.velocity().unwrap().x > 0.0);
        assert!(fish.position().x <= WALL_MARGIN + 40.0);
    }

    #[test]
    fn vertical_wall_uses_full_height() {
        let bounds = Assets::default().bounds();
        // beta is 50px tall: the top wall sits at 10 + 50, not 10 + 25
        let mut fish = fish_with(ItemKind::Beta, 1.0, -10.0);
        fish.set_location(500.0, 70.0);
        fish.update(0.5, bounds);
        assert_eq!(fish.position().y, 65.0);
        assert_eq!(fish.velocity().unwrap().y, -10.0);
        fish.update(1.0, bounds);
        assert_eq!(fish.velocity().unwrap().y, 10.0);
        assert!(!fish.mirror());
    }

    #[test]
    fn decor_never_moves() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut castle = Item::new(ItemKind::Castle, &Assets::default(), &mut rng);
        castle.set_location(5.0, 5.0);
        castle.update(10.0, Assets::default().bounds());
        assert_eq!(castle.position(), Vec2::new(5.0, 5.0));
        assert!(castle.fish().is_none());
    }
}
