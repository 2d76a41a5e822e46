//! Carts
//!
//! Per-session or per-user mutable line collections with a 30-day expiry.
//! Carts are created lazily on first access and deleted either explicitly
//! (checkout) or by letting them expire.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::catalog::{ProductKey, ProductLookup};

/// How long a cart lives after creation.
pub const CART_TTL_DAYS: i64 = 30;

/// Errors from cart operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Exactly one of session id / user id must be supplied.
    #[error("exactly one of session id or user id is required")]
    InvalidKey,

    /// The product being added does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The referenced cart line does not exist.
    #[error("cart line not found")]
    LineNotFound,
}

/// Identifies a line within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(u64);

/// The key a cart is stored under: a session or a signed-in user, never
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartOwner {
    /// Anonymous storefront session
    Session(String),

    /// Signed-in user
    User(String),
}

impl CartOwner {
    /// Build an owner from the optional identifiers a request carries.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidKey`] unless exactly one identifier is
    /// supplied.
    pub fn from_ids(session_id: Option<&str>, user_id: Option<&str>) -> Result<Self, CartError> {
        match (session_id, user_id) {
            (Some(session), None) => Ok(Self::Session(session.to_owned())),
            (None, Some(user)) => Ok(Self::User(user.to_owned())),
            _ => Err(CartError::InvalidKey),
        }
    }
}

/// One product+quantity+variant entry within a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Line identifier, stable across cart mutations
    pub id: LineId,

    /// The product this line refers to
    pub product: ProductKey,

    /// Requested quantity, at least 1 (caller-validated)
    pub quantity: u32,

    /// Variant tag, part of the merge key
    pub variant: Option<String>,

    /// Free-form display attributes (size, colour, …)
    pub attributes: FxHashMap<String, serde_json::Value>,
}

/// A cart: ordered line sequence plus lifecycle metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Who the cart belongs to
    pub owner: CartOwner,

    /// Lines in insertion order (pricing ignores order, display does not)
    pub lines: SmallVec<[CartLine; 8]>,

    /// Applied promo code
    pub promo_code: Option<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Expiry time, creation + [`CART_TTL_DAYS`]
    pub expires_at: DateTime<Utc>,
}

impl Cart {
    fn new(owner: CartOwner) -> Self {
        let now = Utc::now();
        Self {
            owner,
            lines: SmallVec::new(),
            promo_code: None,
            created_at: now,
            expires_at: now + Duration::days(CART_TTL_DAYS),
        }
    }

    /// Find a line by id.
    pub fn line(&self, id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }
}

/// A cart line joined against the live catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    /// Line identifier
    pub id: LineId,

    /// Live product data; `None` when the product no longer resolves
    pub product: Option<CartProductView>,

    /// Requested quantity
    pub quantity: u32,

    /// Variant tag
    pub variant: Option<String>,

    /// Free-form display attributes
    pub attributes: FxHashMap<String, serde_json::Value>,
}

/// The slice of live product data a cart view needs.
#[derive(Debug, Clone, Serialize)]
pub struct CartProductView {
    /// Product key
    pub key: ProductKey,

    /// Current name
    pub name: String,

    /// Current slug
    pub slug: String,

    /// Primary image URL
    pub image: Option<String>,

    /// Current price
    pub price: Decimal,

    /// Previous price
    pub old_price: Option<Decimal>,
}

/// Read view of a cart with live product data and a live subtotal.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    /// Who the cart belongs to
    pub owner: CartOwner,

    /// Joined lines, in cart order
    pub lines: Vec<CartLineView>,

    /// Applied promo code
    pub promo_code: Option<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Expiry time
    pub expires_at: DateTime<Utc>,

    /// Σ current price × quantity over lines whose product still resolves
    pub subtotal: Decimal,
}

/// Input for [`CartStore::add_line`].
#[derive(Debug, Clone)]
pub struct AddLine {
    /// Product to add
    pub product: ProductKey,

    /// Quantity, at least 1 (caller-validated, no upper bound here)
    pub quantity: u32,

    /// Variant tag; part of the merge key, including its absence
    pub variant: Option<String>,

    /// Free-form display attributes
    pub attributes: FxHashMap<String, serde_json::Value>,
}

impl AddLine {
    /// A plain quantity-of-product line with no variant.
    pub fn of(product: ProductKey, quantity: u32) -> Self {
        Self {
            product,
            quantity,
            variant: None,
            attributes: FxHashMap::default(),
        }
    }
}

/// In-memory cart store keyed by [`CartOwner`].
#[derive(Debug, Default)]
pub struct CartStore {
    carts: FxHashMap<CartOwner, Cart>,
    next_line_id: u64,
}

impl CartStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the owner's cart, creating an empty one on first access.
    pub fn get_or_create(&mut self, owner: &CartOwner) -> &Cart {
        self.cart_mut(owner)
    }

    /// Fetch the owner's cart without creating one.
    pub fn get(&self, owner: &CartOwner) -> Option<&Cart> {
        self.carts.get(owner)
    }

    /// Add a product to the cart. A line matching on (product, variant) —
    /// including both variants being absent — has its quantity incremented;
    /// otherwise a new line is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ProductNotFound`] if the product does not
    /// resolve.
    pub fn add_line(
        &mut self,
        owner: &CartOwner,
        products: &impl ProductLookup,
        add: AddLine,
    ) -> Result<&Cart, CartError> {
        if products.find(add.product).is_none() {
            return Err(CartError::ProductNotFound);
        }

        let id = self.fresh_line_id();
        let cart = self.cart_mut(owner);

        match cart
            .lines
            .iter_mut()
            .find(|line| line.product == add.product && line.variant == add.variant)
        {
            Some(existing) => existing.quantity += add.quantity,
            None => cart.lines.push(CartLine {
                id,
                product: add.product,
                quantity: add.quantity,
                variant: add.variant,
                attributes: add.attributes,
            }),
        }

        Ok(cart)
    }

    /// Set a line's quantity; a quantity of zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the line is not in the cart.
    /// (Contrast with [`Self::remove_line`], which is a silent no-op.)
    pub fn update_line(
        &mut self,
        owner: &CartOwner,
        id: LineId,
        quantity: i64,
    ) -> Result<&Cart, CartError> {
        let cart = self.cart_mut(owner);
        let index = cart
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(CartError::LineNotFound)?;

        if quantity <= 0 {
            cart.lines.remove(index);
        } else if let Some(line) = cart.lines.get_mut(index) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }

        Ok(cart)
    }

    /// Remove a line. Removing a line that is not in the cart is a no-op,
    /// not an error — a deliberate asymmetry with [`Self::update_line`].
    pub fn remove_line(&mut self, owner: &CartOwner, id: LineId) -> &Cart {
        let cart = self.cart_mut(owner);
        cart.lines.retain(|line| line.id != id);
        cart
    }

    /// Empty the line sequence, keeping the cart itself.
    pub fn clear(&mut self, owner: &CartOwner) -> &Cart {
        let cart = self.cart_mut(owner);
        cart.lines.clear();
        cart
    }

    /// Delete the owner's cart entirely. Returns whether a cart existed.
    pub fn remove_cart(&mut self, owner: &CartOwner) -> bool {
        self.carts.remove(owner).is_some()
    }

    /// Join the cart against the live catalog. Lines whose product no
    /// longer resolves are kept with no product data and excluded from the
    /// subtotal; no error is raised for them.
    pub fn materialize(&mut self, owner: &CartOwner, products: &impl ProductLookup) -> CartView {
        let cart = self.cart_mut(owner);

        let keys: Vec<ProductKey> = cart.lines.iter().map(|line| line.product).collect();
        let resolved: FxHashMap<ProductKey, _> = products.find_by_keys(&keys).into_iter().collect();

        let mut subtotal = Decimal::ZERO;
        let lines: Vec<CartLineView> = cart
            .lines
            .iter()
            .map(|line| {
                let product = resolved.get(&line.product).map(|product| CartProductView {
                    key: line.product,
                    name: product.name.clone(),
                    slug: product.slug.clone(),
                    image: product.primary_image().map(str::to_owned),
                    price: product.price,
                    old_price: product.old_price,
                });
                if let Some(view) = &product {
                    subtotal += view.price * Decimal::from(line.quantity);
                }
                CartLineView {
                    id: line.id,
                    product,
                    quantity: line.quantity,
                    variant: line.variant.clone(),
                    attributes: line.attributes.clone(),
                }
            })
            .collect();

        CartView {
            owner: cart.owner.clone(),
            lines,
            promo_code: cart.promo_code.clone(),
            created_at: cart.created_at,
            expires_at: cart.expires_at,
            subtotal,
        }
    }

    fn cart_mut(&mut self, owner: &CartOwner) -> &mut Cart {
        self.carts
            .entry(owner.clone())
            .or_insert_with(|| Cart::new(owner.clone()))
    }

    fn fresh_line_id(&mut self) -> LineId {
        self.next_line_id += 1;
        LineId(self.next_line_id)
    }
}
