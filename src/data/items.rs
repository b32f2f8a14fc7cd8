#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ItemKind {
    Weapon,
    Consumable,
    Trinket,
    Quest,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BackpackItem {
    pub id: u32,
    pub name: &'static str,
    pub glyph: char,
    pub kind: ItemKind,
    pub equipped: bool,
}

impl BackpackItem {
    pub const fn new(id: u32, name: &'static str, glyph: char, kind: ItemKind) -> Self {
        Self {
            id,
            name,
            glyph,
            kind,
            equipped: false,
        }
    }

    const fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }
}

pub const BACKPACK_SLOTS: usize = 9;

pub fn starter_backpack() -> Vec<BackpackItem> {
    vec![
        BackpackItem::new(1, "Rusty Sword", '/', ItemKind::Weapon).equipped(),
        BackpackItem::new(2, "Red Potion", '!', ItemKind::Consumable),
        BackpackItem::new(3, "Gold Coin", '$', ItemKind::Trinket),
        BackpackItem::new(4, "Map", '?', ItemKind::Quest),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShopGoods {
    Seeds(u32),
    Snacks(u32),
    Toy { joy: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShopOffer {
    pub name: &'static str,
    pub price: u32,
    pub goods: ShopGoods,
}

pub const SHOP_OFFERS: [ShopOffer; 3] = [
    ShopOffer {
        name: "Seed pack",
        price: 10,
        goods: ShopGoods::Seeds(3),
    },
    ShopOffer {
        name: "Snack",
        price: 6,
        goods: ShopGoods::Snacks(1),
    },
    ShopOffer {
        name: "Squeaky toy",
        price: 8,
        goods: ShopGoods::Toy { joy: 15 },
    },
];
