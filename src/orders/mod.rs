//! Orders
//!
//! Cart-to-order materialization. An order snapshots product data at
//! creation time into immutable line items; later catalog changes never
//! touch a persisted order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{
    cart::{Cart, CartOwner, CartStore},
    catalog::{ProductKey, ProductLookup},
    integrations::{IntegrationRegistry, IntegrationType},
    notify::{self, DispatchOutcome, Messenger},
};

pub mod number;

new_key_type! {
    /// Order Key
    pub struct OrderKey;
}

/// Errors from order operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// At least one requested product does not resolve; nothing is
    /// persisted.
    #[error("some products in the order could not be found")]
    PartialProductMismatch,

    /// The referenced order does not exist.
    #[error("order not found")]
    NotFound,
}

/// Order workflow status. Deliberately free-form: any status may be set to
/// any other, there is no transition validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Freshly created, awaiting handling
    Pending,

    /// Confirmed with the customer
    Confirmed,

    /// Being prepared
    Processing,

    /// Handed to delivery
    Shipped,

    /// Received by the customer
    Delivered,

    /// Cancelled before delivery
    Cancelled,

    /// Paid back after delivery
    Refunded,
}

impl OrderStatus {
    /// Human-readable label for notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Refunded => "Refunded",
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on handover
    Cash,

    /// Card on handover
    Card,

    /// Online payment
    Online,

    /// Bank transfer
    BankTransfer,
}

impl PaymentMethod {
    /// Human-readable label for notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::Online => "Online",
            Self::BankTransfer => "Bank transfer",
        }
    }
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// Customer picks up in store
    Pickup,

    /// Courier delivery
    Courier,

    /// Postal delivery
    Post,

    /// Express courier
    Express,
}

impl DeliveryMethod {
    /// Human-readable label for notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pickup => "Pickup",
            Self::Courier => "Courier",
            Self::Post => "Post",
            Self::Express => "Express delivery",
        }
    }
}

/// Customer contact block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Contact email
    pub email: String,

    /// Contact phone
    pub phone: String,

    /// Company, for business orders
    pub company: Option<String>,
}

impl Customer {
    /// A private customer with no company.
    pub fn new(first_name: &str, last_name: &str, email: &str, phone: &str) -> Self {
        Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: email.to_owned(),
            phone: phone.to_owned(),
            company: None,
        }
    }
}

/// Delivery address block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Country
    pub country: String,

    /// City
    pub city: String,

    /// Street
    pub street: String,

    /// Building number
    pub building: Option<String>,

    /// Apartment number
    pub apartment: Option<String>,

    /// Postal code
    pub postal_code: Option<String>,

    /// Courier notes
    pub notes: Option<String>,
}

/// Immutable snapshot of one cart line at order-creation time. Never
/// re-derived from the live product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// The product this snapshot was taken from
    pub product: ProductKey,

    /// Product name at snapshot time
    pub name: String,

    /// Product slug at snapshot time
    pub slug: String,

    /// Primary image URL at snapshot time
    pub image: Option<String>,

    /// Ordered quantity
    pub quantity: u32,

    /// Unit price at snapshot time
    pub price: Decimal,

    /// Per-line discount (zero at snapshot)
    pub discount: Decimal,

    /// `price × quantity`, fixed at snapshot time
    pub total: Decimal,

    /// Variant tag
    pub variant: Option<String>,

    /// Free-form display attributes
    pub attributes: FxHashMap<String, serde_json::Value>,
}

/// A persisted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Human-readable reference, unique within the store
    pub number: String,

    /// Snapshot line items
    pub items: Vec<OrderLineItem>,

    /// Customer contact block
    pub customer: Customer,

    /// Delivery address, absent for pickup
    pub delivery_address: Option<DeliveryAddress>,

    /// Workflow status
    pub status: OrderStatus,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Delivery method
    pub delivery_method: DeliveryMethod,

    /// Σ item.total
    pub subtotal: Decimal,

    /// Order-level discount
    pub discount: Decimal,

    /// Delivery cost
    pub delivery_cost: Decimal,

    /// Display currency label
    pub currency: String,

    /// `subtotal − discount + delivery_cost`
    pub total: Decimal,

    /// Customer comment
    pub notes: Option<String>,

    /// Applied promo code
    pub promo_code: Option<String>,

    /// Whether the order has been paid
    pub is_paid: bool,

    /// Requesting IP, for auditing
    pub ip_address: Option<String>,

    /// Requesting user agent, for auditing
    pub user_agent: Option<String>,

    /// Whether the creation notification went out
    pub is_sent_to_notification: bool,

    /// When the creation notification went out
    pub sent_to_notification_at: Option<DateTime<Utc>>,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// One requested item in an order.
#[derive(Debug, Clone)]
pub struct OrderItemRequest {
    /// Product to order
    pub product: ProductKey,

    /// Quantity, at least 1 (caller-validated)
    pub quantity: u32,

    /// Variant tag
    pub variant: Option<String>,

    /// Free-form display attributes
    pub attributes: FxHashMap<String, serde_json::Value>,
}

impl OrderItemRequest {
    /// A plain quantity-of-product request.
    pub fn of(product: ProductKey, quantity: u32) -> Self {
        Self {
            product,
            quantity,
            variant: None,
            attributes: FxHashMap::default(),
        }
    }
}

/// Everything [`OrderStore::create`] needs, whether it came from a cart or
/// from direct items.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Requested items
    pub items: Vec<OrderItemRequest>,

    /// Customer contact block
    pub customer: Customer,

    /// Delivery address
    pub delivery_address: Option<DeliveryAddress>,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Delivery method
    pub delivery_method: DeliveryMethod,

    /// Order-level discount, defaults to zero
    pub discount: Decimal,

    /// Delivery cost, defaults to zero
    pub delivery_cost: Decimal,

    /// Promo code
    pub promo_code: Option<String>,

    /// Customer comment
    pub notes: Option<String>,

    /// Display currency label; defaults to "zł"
    pub currency: Option<String>,

    /// Session whose cart should be deleted after checkout
    pub session_id: Option<String>,

    /// Requesting IP
    pub ip_address: Option<String>,

    /// Requesting user agent
    pub user_agent: Option<String>,
}

impl OrderRequest {
    /// A minimal request with defaults for the optional fields.
    pub fn new(
        items: Vec<OrderItemRequest>,
        customer: Customer,
        payment_method: PaymentMethod,
        delivery_method: DeliveryMethod,
    ) -> Self {
        Self {
            items,
            customer,
            delivery_address: None,
            payment_method,
            delivery_method,
            discount: Decimal::ZERO,
            delivery_cost: Decimal::ZERO,
            promo_code: None,
            notes: None,
            currency: None,
            session_id: None,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Build a request from a cart's lines. A session-owned cart carries its
    /// session id along so checkout can delete it afterwards.
    pub fn from_cart(
        cart: &Cart,
        customer: Customer,
        payment_method: PaymentMethod,
        delivery_method: DeliveryMethod,
    ) -> Self {
        let items = cart
            .lines
            .iter()
            .map(|line| OrderItemRequest {
                product: line.product,
                quantity: line.quantity,
                variant: line.variant.clone(),
                attributes: line.attributes.clone(),
            })
            .collect();

        let session_id = match &cart.owner {
            CartOwner::Session(session) => Some(session.clone()),
            CartOwner::User(_) => None,
        };

        Self {
            promo_code: cart.promo_code.clone(),
            session_id,
            ..Self::new(items, customer, payment_method, delivery_method)
        }
    }
}

/// Partial patch for [`OrderStore::update`]. Status changes are not
/// validated against a workflow.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    /// New status
    pub status: Option<OrderStatus>,

    /// New paid flag
    pub is_paid: Option<bool>,

    /// New customer comment
    pub notes: Option<Option<String>>,
}

/// Aggregate figures over the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderStatistics {
    /// All orders
    pub total: usize,

    /// Order count per status
    pub by_status: FxHashMap<OrderStatus, usize>,

    /// Σ total over paid orders
    pub total_revenue: Decimal,

    /// `total_revenue / total`, zero for an empty store
    pub average_order_value: Decimal,
}

/// In-memory order store.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: SlotMap<OrderKey, Order>,
}

impl OrderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize and persist an order in `Pending` state.
    ///
    /// Every requested product is resolved in one batch; prices, names,
    /// slugs and primary images are snapshotted into the line items, so
    /// later catalog changes never affect the order. The order number is
    /// collision-checked against the store.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::PartialProductMismatch`] if any requested
    /// product does not resolve; nothing is persisted in that case.
    pub fn create(
        &mut self,
        products: &impl ProductLookup,
        request: &OrderRequest,
    ) -> Result<OrderKey, OrderError> {
        let keys: Vec<ProductKey> = request.items.iter().map(|item| item.product).collect();
        let resolved: FxHashMap<ProductKey, _> = products.find_by_keys(&keys).into_iter().collect();

        let items = request
            .items
            .iter()
            .map(|item| {
                let product = resolved
                    .get(&item.product)
                    .ok_or(OrderError::PartialProductMismatch)?;
                let total = product.price * Decimal::from(item.quantity);
                Ok(OrderLineItem {
                    product: item.product,
                    name: product.name.clone(),
                    slug: product.slug.clone(),
                    image: product.primary_image().map(str::to_owned),
                    quantity: item.quantity,
                    price: product.price,
                    discount: Decimal::ZERO,
                    total,
                    variant: item.variant.clone(),
                    attributes: item.attributes.clone(),
                })
            })
            .collect::<Result<Vec<OrderLineItem>, OrderError>>()?;

        let subtotal: Decimal = items.iter().map(|item| item.total).sum();
        let total = subtotal - request.discount + request.delivery_cost;

        let number = number::generate(|candidate| {
            self.orders.values().any(|order| order.number == candidate)
        });

        Ok(self.orders.insert(Order {
            number,
            items,
            customer: request.customer.clone(),
            delivery_address: request.delivery_address.clone(),
            status: OrderStatus::Pending,
            payment_method: request.payment_method,
            delivery_method: request.delivery_method,
            subtotal,
            discount: request.discount,
            delivery_cost: request.delivery_cost,
            currency: request.currency.clone().unwrap_or_else(|| "zł".to_owned()),
            total,
            notes: request.notes.clone(),
            promo_code: request.promo_code.clone(),
            is_paid: false,
            ip_address: request.ip_address.clone(),
            user_agent: request.user_agent.clone(),
            is_sent_to_notification: false,
            sent_to_notification_at: None,
            created_at: Utc::now(),
        }))
    }

    /// Fetch an order by key.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] if the key does not resolve.
    pub fn get(&self, key: OrderKey) -> Result<&Order, OrderError> {
        self.orders.get(key).ok_or(OrderError::NotFound)
    }

    pub(crate) fn get_mut(&mut self, key: OrderKey) -> Result<&mut Order, OrderError> {
        self.orders.get_mut(key).ok_or(OrderError::NotFound)
    }

    /// Fetch an order by its human-readable number.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] if no order carries the number.
    pub fn find_by_number(&self, order_number: &str) -> Result<(OrderKey, &Order), OrderError> {
        self.orders
            .iter()
            .find(|(_, order)| order.number == order_number)
            .ok_or(OrderError::NotFound)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] if the key does not resolve.
    pub fn update(&mut self, key: OrderKey, patch: OrderUpdate) -> Result<&Order, OrderError> {
        let order = self.get_mut(key)?;
        if let Some(status) = patch.status {
            order.status = status;
        }
        if let Some(is_paid) = patch.is_paid {
            order.is_paid = is_paid;
        }
        if let Some(notes) = patch.notes {
            order.notes = notes;
        }
        Ok(order)
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] if the key does not resolve.
    pub fn remove(&mut self, key: OrderKey) -> Result<Order, OrderError> {
        self.orders.remove(key).ok_or(OrderError::NotFound)
    }

    /// All orders newest-first; cancelled orders are filtered out unless
    /// requested.
    pub fn all(&self, include_cancelled: bool) -> Vec<(OrderKey, &Order)> {
        let mut orders: Vec<(OrderKey, &Order)> = self
            .orders
            .iter()
            .filter(|(_, order)| include_cancelled || order.status != OrderStatus::Cancelled)
            .collect();
        orders.sort_by(|(_, a), (_, b)| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Aggregate figures: counts by status, revenue over paid orders,
    /// average order value.
    pub fn statistics(&self) -> OrderStatistics {
        let mut by_status: FxHashMap<OrderStatus, usize> = FxHashMap::default();
        let mut total_revenue = Decimal::ZERO;

        for order in self.orders.values() {
            *by_status.entry(order.status).or_default() += 1;
            if order.is_paid {
                total_revenue += order.total;
            }
        }

        let total = self.orders.len();
        let average_order_value = if total > 0 {
            total_revenue / Decimal::from(total)
        } else {
            Decimal::ZERO
        };

        OrderStatistics {
            total,
            by_status,
            total_revenue,
            average_order_value,
        }
    }

    /// Number of orders in the store.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Result of a full checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    /// Key of the persisted order
    pub key: OrderKey,

    /// What happened to the creation notification
    pub notification: DispatchOutcome,
}

/// Full checkout: persist the order, attempt the creation notification, and
/// delete the session's cart.
///
/// The notification and the cart deletion are best-effort side effects:
/// neither can fail the checkout or roll the order back.
///
/// # Errors
///
/// Returns [`OrderError::PartialProductMismatch`] if any requested product
/// does not resolve; the cart is left untouched.
pub fn place_order(
    orders: &mut OrderStore,
    carts: &mut CartStore,
    integrations: &mut IntegrationRegistry,
    messenger: &impl Messenger,
    notify_via: IntegrationType,
    products: &impl ProductLookup,
    request: OrderRequest,
) -> Result<PlacedOrder, OrderError> {
    let key = orders.create(products, &request)?;

    let notification =
        notify::notify_order_created(orders, key, integrations, notify_via, messenger);

    if let Some(session) = request.session_id {
        let owner = CartOwner::Session(session);
        if !carts.remove_cart(&owner) {
            tracing::debug!(?owner, "no cart to delete after checkout");
        }
    }

    Ok(PlacedOrder { key, notification })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::{CatalogError, NewProduct, ProductCatalog, ProductImage};

    use super::*;

    fn stocked(name: &str, price: i64) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            slug: None,
            price: Decimal::from(price),
            old_price: None,
            currency: "zł".to_owned(),
            stock: 5,
            images: vec![ProductImage {
                url: format!("https://cdn.example/{name}.jpg"),
                alt: None,
            }],
        }
    }

    fn catalog() -> Result<(ProductCatalog, ProductKey, ProductKey), CatalogError> {
        let mut catalog = ProductCatalog::new();
        let widget = catalog.create(stocked("Widget", 100))?;
        let gadget = catalog.create(stocked("Gadget", 250))?;
        Ok((catalog, widget, gadget))
    }

    fn customer() -> Customer {
        Customer::new("Jan", "Kowalski", "jan@example.com", "+48 600 000 000")
    }

    #[test]
    fn create_computes_totals_exactly() -> TestResult {
        let (catalog, widget, _) = catalog()?;
        let mut orders = OrderStore::new();

        let mut request = OrderRequest::new(
            vec![OrderItemRequest::of(widget, 2)],
            customer(),
            PaymentMethod::Card,
            DeliveryMethod::Courier,
        );
        request.discount = Decimal::from(20);
        request.delivery_cost = Decimal::from(15);

        let key = orders.create(&catalog, &request)?;
        let order = orders.get(key)?;

        assert_eq!(order.subtotal, Decimal::from(200));
        assert_eq!(order.total, Decimal::from(195));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.currency, "zł");
        assert!(!order.is_sent_to_notification);
        Ok(())
    }

    #[test]
    fn subtotal_is_sum_of_line_totals() -> TestResult {
        let (catalog, widget, gadget) = catalog()?;
        let mut orders = OrderStore::new();

        let request = OrderRequest::new(
            vec![
                OrderItemRequest::of(widget, 3),
                OrderItemRequest::of(gadget, 1),
            ],
            customer(),
            PaymentMethod::Cash,
            DeliveryMethod::Pickup,
        );

        let key = orders.create(&catalog, &request)?;
        let order = orders.get(key)?;

        let line_sum: Decimal = order.items.iter().map(|item| item.total).sum();
        assert_eq!(order.subtotal, line_sum);
        assert_eq!(order.subtotal, Decimal::from(550));
        assert_eq!(order.total, order.subtotal, "no discount, no delivery");
        Ok(())
    }

    #[test]
    fn create_aborts_on_any_unresolvable_product() -> TestResult {
        let (mut catalog, widget, gadget) = catalog()?;
        catalog.remove(gadget)?;
        let mut orders = OrderStore::new();

        let request = OrderRequest::new(
            vec![
                OrderItemRequest::of(widget, 1),
                OrderItemRequest::of(gadget, 1),
            ],
            customer(),
            PaymentMethod::Card,
            DeliveryMethod::Courier,
        );

        assert_eq!(
            orders.create(&catalog, &request).map(|_| ()),
            Err(OrderError::PartialProductMismatch)
        );
        assert!(orders.is_empty(), "no partial order persisted");
        Ok(())
    }

    #[test]
    fn snapshots_survive_later_product_changes() -> TestResult {
        let (mut catalog, widget, _) = catalog()?;
        let mut orders = OrderStore::new();

        let request = OrderRequest::new(
            vec![OrderItemRequest::of(widget, 2)],
            customer(),
            PaymentMethod::Card,
            DeliveryMethod::Courier,
        );
        let key = orders.create(&catalog, &request)?;

        // Reprice and rename the product after checkout.
        let product = catalog.get_mut(widget)?;
        product.price = Decimal::from(999);
        product.name = "Renamed Widget".to_owned();

        let order = orders.get(key)?;
        let item = order.items.first().ok_or(OrderError::NotFound)?;
        assert_eq!(item.price, Decimal::from(100));
        assert_eq!(item.total, Decimal::from(200));
        assert_eq!(item.name, "Widget");
        Ok(())
    }

    #[test]
    fn find_by_number_round_trips() -> TestResult {
        let (catalog, widget, _) = catalog()?;
        let mut orders = OrderStore::new();

        let request = OrderRequest::new(
            vec![OrderItemRequest::of(widget, 1)],
            customer(),
            PaymentMethod::Card,
            DeliveryMethod::Courier,
        );
        let key = orders.create(&catalog, &request)?;
        let order_number = orders.get(key)?.number.clone();

        let (found_key, _) = orders.find_by_number(&order_number)?;
        assert_eq!(found_key, key);

        assert!(matches!(
            orders.find_by_number("ORD-0-0"),
            Err(OrderError::NotFound)
        ));
        Ok(())
    }

    #[test]
    fn status_updates_are_free_form() -> TestResult {
        let (catalog, widget, _) = catalog()?;
        let mut orders = OrderStore::new();

        let request = OrderRequest::new(
            vec![OrderItemRequest::of(widget, 1)],
            customer(),
            PaymentMethod::Card,
            DeliveryMethod::Courier,
        );
        let key = orders.create(&catalog, &request)?;

        // Delivered straight from pending, then back to cancelled: both
        // accepted, no workflow validation.
        orders.update(
            key,
            OrderUpdate {
                status: Some(OrderStatus::Delivered),
                ..Default::default()
            },
        )?;
        orders.update(
            key,
            OrderUpdate {
                status: Some(OrderStatus::Cancelled),
                ..Default::default()
            },
        )?;

        assert_eq!(orders.get(key)?.status, OrderStatus::Cancelled);
        Ok(())
    }

    #[test]
    fn all_hides_cancelled_unless_asked() -> TestResult {
        let (catalog, widget, _) = catalog()?;
        let mut orders = OrderStore::new();

        let request = OrderRequest::new(
            vec![OrderItemRequest::of(widget, 1)],
            customer(),
            PaymentMethod::Card,
            DeliveryMethod::Courier,
        );
        let kept = orders.create(&catalog, &request)?;
        let cancelled = orders.create(&catalog, &request)?;
        orders.update(
            cancelled,
            OrderUpdate {
                status: Some(OrderStatus::Cancelled),
                ..Default::default()
            },
        )?;

        let visible: Vec<OrderKey> = orders.all(false).into_iter().map(|(k, _)| k).collect();
        assert_eq!(visible, vec![kept]);
        assert_eq!(orders.all(true).len(), 2);
        Ok(())
    }

    #[test]
    fn statistics_track_paid_revenue() -> TestResult {
        let (catalog, widget, _) = catalog()?;
        let mut orders = OrderStore::new();

        let request = OrderRequest::new(
            vec![OrderItemRequest::of(widget, 2)],
            customer(),
            PaymentMethod::Card,
            DeliveryMethod::Courier,
        );
        let paid = orders.create(&catalog, &request)?;
        orders.create(&catalog, &request)?;
        orders.update(
            paid,
            OrderUpdate {
                is_paid: Some(true),
                ..Default::default()
            },
        )?;

        let stats = orders.statistics();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_status.get(&OrderStatus::Pending), Some(&2));
        assert_eq!(stats.total_revenue, Decimal::from(200));
        assert_eq!(stats.average_order_value, Decimal::from(100));
        Ok(())
    }
}
