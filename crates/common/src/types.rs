use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog identifier for a product.
///
/// Assigned by the catalog, stable, and unique across products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Creates a product ID from its numeric value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for u64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Field names serialized alongside the flattened attributes.
const RESERVED_FIELDS: [&str; 2] = ["id", "amount"];

/// A product record as returned by the catalog and held in the cart.
///
/// Display attributes are opaque to the engine. They are flattened into the
/// same JSON object as `id` and `amount`, so whatever the catalog sends is
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// The catalog identifier.
    pub id: ProductId,

    /// Quantity held in the cart. Catalog records carry no amount.
    #[serde(default)]
    pub amount: u32,

    /// Display attributes (title, price, image, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Creates a product with no display attributes.
    pub fn new(id: impl Into<ProductId>, amount: u32) -> Self {
        Self {
            id: id.into(),
            amount,
            attributes: Map::new(),
        }
    }

    /// Adds a display attribute.
    ///
    /// `id` and `amount` are record fields, not attributes; those names are
    /// ignored so the serialized object never repeats a key.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if RESERVED_FIELDS.contains(&name.as_str()) {
            return self;
        }
        self.attributes.insert(name, value.into());
        self
    }

    /// Returns the product title, if the catalog supplied one.
    pub fn title(&self) -> Option<&str> {
        self.attributes.get("title").and_then(Value::as_str)
    }

    /// Returns the unit price, if the catalog supplied one.
    pub fn price(&self) -> Option<f64> {
        self.attributes.get("price").and_then(Value::as_f64)
    }

    /// Returns the image URL, if the catalog supplied one.
    pub fn image(&self) -> Option<&str> {
        self.attributes.get("image").and_then(Value::as_str)
    }
}

/// Available quantity of a product as reported by the catalog.
///
/// Never persisted; fetched fresh every time a quantity is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// The product this stock level refers to. Some catalogs omit it.
    #[serde(default)]
    pub id: Option<ProductId>,

    /// Maximum quantity currently available.
    pub amount: u32,
}

impl Stock {
    /// Creates a stock level for a product.
    pub fn new(id: impl Into<ProductId>, amount: u32) -> Self {
        Self {
            id: Some(id.into()),
            amount,
        }
    }
}
