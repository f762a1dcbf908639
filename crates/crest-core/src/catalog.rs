//! The hard-coded product catalogue and its filtering/formatting helpers.

use fnv::FnvHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Apparel,
    Technology,
    Collectibles,
}

impl Category {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "apparel" => Some(Self::Apparel),
            "technology" => Some(Self::Technology),
            "collectibles" => Some(Self::Collectibles),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Apparel => "apparel",
            Self::Technology => "technology",
            Self::Collectibles => "collectibles",
        }
    }
}

/// A catalogue filter as carried by the filter buttons' data attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    All,
    Only(Category),
}

impl Filter {
    /// "all" and any unknown key both show everything; unknown keys come
    /// from page variants with extra buttons and must not hide the grid.
    pub fn from_key(key: &str) -> Self {
        match Category::from_key(key) {
            Some(c) => Self::Only(c),
            None => Self::All,
        }
    }

    pub fn admits(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => product.category == *c,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    /// Whole USD; the page never shows cents.
    pub price: i64,
    pub tag: &'static str,
    pub description: &'static str,
    pub status: &'static str,
}

pub const PRODUCTS: &[Product] = &[
    Product {
        id: "grid-helmet",
        name: "Grid Pulse Helmet",
        category: Category::Apparel,
        price: 440,
        tag: "Team Issue",
        description: "Wind-tunnel profiled shell with reactive visor display overlay.",
        status: "Available",
    },
    Product {
        id: "apex-jacket",
        name: "Apex Velocity Jacket",
        category: Category::Apparel,
        price: 320,
        tag: "Launch Fit",
        description: "Weather adaptive softshell with integrated sponsor lighting cues.",
        status: "Available",
    },
    Product {
        id: "pitwall-tablet",
        name: "Pit Wall Analytics Tablet",
        category: Category::Technology,
        price: 780,
        tag: "Telemetry",
        description: "Race control UI kit pre-wired with mock datasets and live delta views.",
        status: "Ships Soon",
    },
    Product {
        id: "concept-car",
        name: "1:8 Concept Showcar",
        category: Category::Collectibles,
        price: 1250,
        tag: "Signature",
        description: "Precision diecast with magnetic aero kit swaps and lighting harness.",
        status: "Pre-Order",
    },
    Product {
        id: "garage-kit",
        name: "Garage Hospitality Kit",
        category: Category::Collectibles,
        price: 540,
        tag: "Experience",
        description: "Modular pit lounge concept with scent diffusers and ambient soundscape.",
        status: "Available",
    },
    Product {
        id: "hud-rig",
        name: "Driver HUD Rig",
        category: Category::Technology,
        price: 960,
        tag: "Prototype",
        description: "Augmented reality visor interface to demo immersive sponsorship loops.",
        status: "Prototype",
    },
];

pub fn find_product(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

pub fn filtered_products(filter: Filter) -> Vec<&'static Product> {
    PRODUCTS.iter().filter(|p| filter.admits(p)).collect()
}

/// Index for repeated id lookups from click handlers.
pub fn product_index() -> FnvHashMap<&'static str, &'static Product> {
    PRODUCTS.iter().map(|p| (p.id, p)).collect()
}

/// `$1,250` style: dollar sign, thousands separators, no cents.
pub fn format_usd(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{}${}", if negative { "-" } else { "" }, out)
}
