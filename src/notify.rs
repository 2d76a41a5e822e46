//! Notifications
//!
//! Formats and sends the order-created summary through a messaging
//! integration. Delivery is strictly best-effort: every failure mode here
//! is logged and recorded as side-channel state, never surfaced to the
//! checkout caller.

use chrono::Utc;
use thiserror::Error;

use crate::{
    integrations::{DispatchSelection, IntegrationRegistry, IntegrationType},
    orders::{Order, OrderKey, OrderStore},
};

/// Transport failure reported by a [`Messenger`].
#[derive(Debug, Error)]
#[error("message delivery failed: {0}")]
pub struct SendError(pub String);

/// The transport seam: anything that can push a formatted text to a chat
/// target using the integration's credential.
pub trait Messenger {
    /// Deliver `text` to `target`, authenticating with `credential`.
    ///
    /// # Errors
    ///
    /// Returns a [`SendError`] describing the transport failure.
    fn send(&self, credential: &str, target: &str, text: &str) -> Result<(), SendError>;
}

/// What happened to a dispatch attempt. None of these block order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Delivered; the order carries the sent flag and timestamp.
    Sent,

    /// No usable integration or target was configured; logged and skipped.
    Skipped,

    /// Two or more active integrations share the top priority; nothing was
    /// selected or sent.
    AmbiguousConfiguration,

    /// The transport failed; recorded on the integration's error fields.
    Failed,
}

/// Send the order-created summary for `order_key`.
///
/// On success the order is marked as sent and the integration's usage
/// statistics are bumped. On transport failure the integration's error
/// fields are set and its status flips to `Error`; the order's sent flag
/// stays unset. Neither case is an error for the caller.
pub fn notify_order_created(
    orders: &mut OrderStore,
    order_key: OrderKey,
    registry: &mut IntegrationRegistry,
    kind: IntegrationType,
    messenger: &impl Messenger,
) -> DispatchOutcome {
    let Ok(order) = orders.get(order_key) else {
        tracing::warn!("order disappeared before notification dispatch");
        return DispatchOutcome::Skipped;
    };

    let integration_key = match registry.select_for_dispatch(kind) {
        DispatchSelection::Unique(key) => key,
        DispatchSelection::NoneActive => {
            tracing::warn!(?kind, "no active integration for order notification");
            return DispatchOutcome::Skipped;
        }
        DispatchSelection::Ambiguous => {
            tracing::warn!(
                ?kind,
                "multiple active integrations share the top priority; fix the configuration"
            );
            return DispatchOutcome::AmbiguousConfiguration;
        }
    };

    let Ok(integration) = registry.get(integration_key) else {
        return DispatchOutcome::Skipped;
    };
    let Some(target) = integration.dispatch_target().map(str::to_owned) else {
        tracing::warn!(name = %integration.name, "no chat target configured for integration");
        return DispatchOutcome::Skipped;
    };
    let Some(credential) = integration.credential().map(str::to_owned) else {
        tracing::warn!(name = %integration.name, "no credential configured for integration");
        return DispatchOutcome::Skipped;
    };

    let text = format_order_message(order);

    match messenger.send(&credential, &target, &text) {
        Ok(()) => {
            if let Ok(order) = orders.get_mut(order_key) {
                order.is_sent_to_notification = true;
                order.sent_to_notification_at = Some(Utc::now());
            }
            registry.record_usage(integration_key).ok();
            DispatchOutcome::Sent
        }
        Err(error) => {
            tracing::error!(%error, "failed to send order notification");
            registry.record_error(integration_key, &error.to_string()).ok();
            DispatchOutcome::Failed
        }
    }
}

/// Render the human-readable order summary: item list, customer block,
/// address when present, method labels, monetary breakdown, status.
pub fn format_order_message(order: &Order) -> String {
    let mut text = format!("New order #{}\n\nItems:\n", order.number);

    for (index, item) in order.items.iter().enumerate() {
        text.push_str(&format!(
            "{}. {}\n   Qty: {}\n   Price: {} {}\n   Total: {} {}\n",
            index + 1,
            item.name,
            item.quantity,
            item.price,
            order.currency,
            item.total,
            order.currency,
        ));
    }

    let customer = &order.customer;
    text.push_str(&format!(
        "\nCustomer:\n{} {}\nEmail: {}\nPhone: {}\n",
        customer.first_name, customer.last_name, customer.email, customer.phone,
    ));
    if let Some(company) = &customer.company {
        text.push_str(&format!("Company: {company}\n"));
    }

    if let Some(address) = &order.delivery_address {
        text.push_str(&format!(
            "\nDelivery address:\n{}, {}\n{}",
            address.country, address.city, address.street,
        ));
        if let Some(building) = &address.building {
            text.push_str(&format!(", {building}"));
        }
        if let Some(apartment) = &address.apartment {
            text.push_str(&format!(", apt. {apartment}"));
        }
        text.push('\n');
        if let Some(postal_code) = &address.postal_code {
            text.push_str(&format!("Postal code: {postal_code}\n"));
        }
        if let Some(notes) = &address.notes {
            text.push_str(&format!("Note: {notes}\n"));
        }
    }

    text.push_str(&format!(
        "\nPayment: {}\nDelivery: {}\n",
        order.payment_method.label(),
        order.delivery_method.label(),
    ));

    text.push_str(&format!("\nSubtotal: {} {}\n", order.subtotal, order.currency));
    if order.discount > rust_decimal::Decimal::ZERO {
        text.push_str(&format!("Discount: -{} {}\n", order.discount, order.currency));
    }
    text.push_str(&format!(
        "Delivery: {} {}\nTotal: {} {}\n",
        order.delivery_cost, order.currency, order.total, order.currency,
    ));

    if let Some(notes) = &order.notes {
        text.push_str(&format!("\nComment: {notes}\n"));
    }
    if let Some(promo_code) = &order.promo_code {
        text.push_str(&format!("\nPromo code: {promo_code}\n"));
    }

    text.push_str(&format!("\nStatus: {}", order.status.label()));

    text
}
