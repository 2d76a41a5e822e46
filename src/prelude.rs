//! Bodega prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{AddLine, Cart, CartError, CartLine, CartOwner, CartStore, CartView, LineId},
    catalog::{
        CatalogError, NewProduct, Product, ProductCatalog, ProductImage, ProductKey, ProductLookup,
    },
    integrations::{
        DispatchSelection, Integration, IntegrationError, IntegrationKey, IntegrationRegistry,
        IntegrationStatus, IntegrationType,
    },
    menu::{
        MenuError, MenuKey, MenuNode, MenuStore, MenuTreeNode, MenuUpdate, NewMenuNode, build_tree,
    },
    notify::{DispatchOutcome, Messenger, SendError, format_order_message, notify_order_created},
    orders::{
        Customer, DeliveryAddress, DeliveryMethod, Order, OrderError, OrderItemRequest, OrderKey,
        OrderLineItem, OrderRequest, OrderStatus, OrderStore, OrderUpdate, PaymentMethod,
        PlacedOrder, place_order,
    },
};
