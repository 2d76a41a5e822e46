//! End-to-end checkout scenarios: cart → order materialization →
//! notification dispatch → cart cleanup.
//!
//! The messaging transport is a recording double; no network is involved.

use std::cell::RefCell;

use rust_decimal::Decimal;
use testresult::TestResult;

use bodega::prelude::*;

/// Transport double that records every message and can be told to fail.
struct RecordingMessenger {
    fail: bool,
    sent: RefCell<Vec<String>>,
}

impl RecordingMessenger {
    fn working() -> Self {
        Self {
            fail: false,
            sent: RefCell::new(Vec::new()),
        }
    }

    fn broken() -> Self {
        Self {
            fail: true,
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl Messenger for RecordingMessenger {
    fn send(&self, _credential: &str, _target: &str, text: &str) -> Result<(), SendError> {
        if self.fail {
            return Err(SendError("bad gateway".to_owned()));
        }
        self.sent.borrow_mut().push(text.to_owned());
        Ok(())
    }
}

struct Shop {
    catalog: ProductCatalog,
    carts: CartStore,
    orders: OrderStore,
    integrations: IntegrationRegistry,
}

impl Shop {
    fn new() -> Self {
        Self {
            catalog: ProductCatalog::new(),
            carts: CartStore::new(),
            orders: OrderStore::new(),
            integrations: IntegrationRegistry::new(),
        }
    }

    fn stock(&mut self, name: &str, price: i64) -> Result<ProductKey, CatalogError> {
        self.catalog.create(NewProduct {
            name: name.to_owned(),
            slug: None,
            price: Decimal::from(price),
            old_price: None,
            currency: "zł".to_owned(),
            stock: 10,
            images: vec![ProductImage {
                url: format!("https://cdn.example/{name}.jpg"),
                alt: Some(name.to_owned()),
            }],
        })
    }

    fn with_telegram_bot(&mut self) -> IntegrationKey {
        self.integrations.insert(Integration {
            status: IntegrationStatus::Active,
            bot_token: Some("123:abc".to_owned()),
            chat_id: Some("-1001".to_owned()),
            ..Integration::new(IntegrationType::Telegram, "order bot")
        })
    }
}

fn buyer() -> Customer {
    Customer::new("Jan", "Kowalski", "jan@example.com", "+48 600 000 000")
}

#[test]
fn checkout_materializes_cart_notifies_and_deletes_cart() -> TestResult {
    let mut shop = Shop::new();
    let widget = shop.stock("Widget", 100)?;
    shop.with_telegram_bot();
    let messenger = RecordingMessenger::working();

    let owner = CartOwner::Session("sess-42".to_owned());
    shop.carts.add_line(&owner, &shop.catalog, AddLine::of(widget, 2))?;

    let cart = shop.carts.get_or_create(&owner).clone();
    let mut request = OrderRequest::from_cart(
        &cart,
        buyer(),
        PaymentMethod::Card,
        DeliveryMethod::Courier,
    );
    request.discount = Decimal::from(20);
    request.delivery_cost = Decimal::from(15);

    let placed = place_order(
        &mut shop.orders,
        &mut shop.carts,
        &mut shop.integrations,
        &messenger,
        IntegrationType::Telegram,
        &shop.catalog,
        request,
    )?;

    let order = shop.orders.get(placed.key)?;
    assert_eq!(order.subtotal, Decimal::from(200));
    assert_eq!(order.total, Decimal::from(195));
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.is_sent_to_notification);
    assert_eq!(placed.notification, DispatchOutcome::Sent);

    let sent = messenger.sent.borrow();
    assert_eq!(sent.len(), 1, "exactly one notification went out");
    assert!(
        sent.first().is_some_and(|text| text.contains(&order.number)),
        "message references the order number"
    );

    assert!(
        shop.carts.get(&owner).is_none(),
        "session cart deleted after checkout"
    );
    Ok(())
}

#[test]
fn checkout_aborts_cleanly_when_a_product_vanished() -> TestResult {
    let mut shop = Shop::new();
    let widget = shop.stock("Widget", 100)?;
    let gadget = shop.stock("Gadget", 250)?;
    shop.with_telegram_bot();
    let messenger = RecordingMessenger::working();

    let owner = CartOwner::Session("sess-42".to_owned());
    shop.carts.add_line(&owner, &shop.catalog, AddLine::of(widget, 1))?;
    shop.carts.add_line(&owner, &shop.catalog, AddLine::of(gadget, 1))?;

    // The product disappears between carting and checkout.
    shop.catalog.remove(gadget)?;

    let cart = shop.carts.get_or_create(&owner).clone();
    let request = OrderRequest::from_cart(
        &cart,
        buyer(),
        PaymentMethod::Card,
        DeliveryMethod::Courier,
    );

    let result = place_order(
        &mut shop.orders,
        &mut shop.carts,
        &mut shop.integrations,
        &messenger,
        IntegrationType::Telegram,
        &shop.catalog,
        request,
    );

    assert!(matches!(result, Err(OrderError::PartialProductMismatch)));
    assert!(shop.orders.is_empty(), "no order persisted");
    assert!(messenger.sent.borrow().is_empty(), "nothing sent");
    assert_eq!(
        shop.carts.get(&owner).map(|cart| cart.lines.len()),
        Some(2),
        "cart untouched"
    );
    Ok(())
}

#[test]
fn transport_failure_never_blocks_the_order() -> TestResult {
    let mut shop = Shop::new();
    let widget = shop.stock("Widget", 100)?;
    let bot = shop.with_telegram_bot();
    let messenger = RecordingMessenger::broken();

    let owner = CartOwner::Session("sess-42".to_owned());
    shop.carts.add_line(&owner, &shop.catalog, AddLine::of(widget, 1))?;
    let cart = shop.carts.get_or_create(&owner).clone();
    let request = OrderRequest::from_cart(
        &cart,
        buyer(),
        PaymentMethod::Cash,
        DeliveryMethod::Pickup,
    );

    let placed = place_order(
        &mut shop.orders,
        &mut shop.carts,
        &mut shop.integrations,
        &messenger,
        IntegrationType::Telegram,
        &shop.catalog,
        request,
    )?;

    assert_eq!(placed.notification, DispatchOutcome::Failed);

    // A subsequent read still shows the persisted order, pending, unsent.
    let order = shop.orders.get(placed.key)?;
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(!order.is_sent_to_notification);
    assert!(order.sent_to_notification_at.is_none());

    // The failure landed on the integration's error fields instead.
    let record = shop.integrations.get(bot)?;
    assert_eq!(record.status, IntegrationStatus::Error);
    assert!(
        record
            .last_error
            .as_deref()
            .is_some_and(|e| e.contains("bad gateway"))
    );
    Ok(())
}

#[test]
fn checkout_without_any_integration_just_skips_notification() -> TestResult {
    let mut shop = Shop::new();
    let widget = shop.stock("Widget", 100)?;
    let messenger = RecordingMessenger::working();

    let request = OrderRequest::new(
        vec![OrderItemRequest::of(widget, 3)],
        buyer(),
        PaymentMethod::Online,
        DeliveryMethod::Post,
    );

    let placed = place_order(
        &mut shop.orders,
        &mut shop.carts,
        &mut shop.integrations,
        &messenger,
        IntegrationType::Telegram,
        &shop.catalog,
        request,
    )?;

    assert_eq!(placed.notification, DispatchOutcome::Skipped);
    assert_eq!(shop.orders.get(placed.key)?.subtotal, Decimal::from(300));
    Ok(())
}

#[test]
fn user_cart_survives_checkout() -> TestResult {
    let mut shop = Shop::new();
    let widget = shop.stock("Widget", 100)?;
    let messenger = RecordingMessenger::working();

    // A user-owned cart carries no session id, so checkout must not delete
    // it.
    let owner = CartOwner::User("user-7".to_owned());
    shop.carts.add_line(&owner, &shop.catalog, AddLine::of(widget, 1))?;
    let cart = shop.carts.get_or_create(&owner).clone();
    let request = OrderRequest::from_cart(
        &cart,
        buyer(),
        PaymentMethod::Card,
        DeliveryMethod::Courier,
    );

    place_order(
        &mut shop.orders,
        &mut shop.carts,
        &mut shop.integrations,
        &messenger,
        IntegrationType::Telegram,
        &shop.catalog,
        request,
    )?;

    assert!(shop.carts.get(&owner).is_some());
    Ok(())
}

#[test]
fn two_checkouts_of_the_same_session_both_succeed() -> TestResult {
    let mut shop = Shop::new();
    let widget = shop.stock("Widget", 100)?;
    let messenger = RecordingMessenger::working();

    let owner = CartOwner::Session("sess-42".to_owned());
    shop.carts.add_line(&owner, &shop.catalog, AddLine::of(widget, 1))?;
    let cart = shop.carts.get_or_create(&owner).clone();

    // Both requests snapshot the same cart contents; the second cart
    // deletion is an idempotent no-op.
    let first =
        OrderRequest::from_cart(&cart, buyer(), PaymentMethod::Card, DeliveryMethod::Courier);
    let second = first.clone();

    let a = place_order(
        &mut shop.orders,
        &mut shop.carts,
        &mut shop.integrations,
        &messenger,
        IntegrationType::Telegram,
        &shop.catalog,
        first,
    )?;
    let b = place_order(
        &mut shop.orders,
        &mut shop.carts,
        &mut shop.integrations,
        &messenger,
        IntegrationType::Telegram,
        &shop.catalog,
        second,
    )?;

    assert_ne!(a.key, b.key);
    assert_eq!(shop.orders.len(), 2);
    assert_ne!(
        shop.orders.get(a.key)?.number,
        shop.orders.get(b.key)?.number,
        "order numbers are collision-checked"
    );
    Ok(())
}
