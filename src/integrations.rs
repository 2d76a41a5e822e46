//! Integrations
//!
//! External messaging/tracking credential records. The core treats them as
//! lookup targets with usage and error statistics; the actual transport
//! lives behind [`crate::notify::Messenger`].

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    /// Integration Key
    pub struct IntegrationKey;
}

/// Errors from registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrationError {
    /// The referenced integration does not exist.
    #[error("integration not found")]
    NotFound,
}

/// Kind of external service an integration talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationType {
    /// Facebook page
    Facebook,

    /// Telegram bot
    Telegram,

    /// Instagram account
    Instagram,

    /// WhatsApp account
    Whatsapp,

    /// Viber account
    Viber,

    /// Outbound email
    Email,

    /// Outbound SMS
    Sms,

    /// Anything else
    Custom,
}

/// Operational status of an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    /// Configured and usable
    Active,

    /// Configured but switched off
    Inactive,

    /// Last delivery attempt failed
    Error,
}

/// A configured external credential record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    /// Kind of external service
    pub kind: IntegrationType,

    /// Human-readable name ("Main order bot")
    pub name: String,

    /// Free-form description
    pub description: Option<String>,

    /// Operational status
    pub status: IntegrationStatus,

    /// Generic credential
    pub token: Option<String>,

    /// Bot credential; preferred over `token` when both are set
    pub bot_token: Option<String>,

    /// Direct chat target
    pub chat_id: Option<String>,

    /// Additional provider-specific settings; a `groupId` entry overrides
    /// `chat_id` as the dispatch target
    pub settings: FxHashMap<String, serde_json::Value>,

    /// Dispatch priority; the unique highest-priority active integration of
    /// a type is selected for sending
    pub priority: i32,

    /// Whether the record is enabled at all
    pub is_active: bool,

    /// Successful deliveries through this integration
    pub usage_count: u64,

    /// Time of the last successful delivery
    pub last_used_at: Option<DateTime<Utc>>,

    /// Message of the last delivery failure
    pub last_error: Option<String>,

    /// Time of the last delivery failure
    pub last_error_at: Option<DateTime<Utc>>,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Integration {
    /// A fresh inactive record with no credentials.
    pub fn new(kind: IntegrationType, name: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
            description: None,
            status: IntegrationStatus::Inactive,
            token: None,
            bot_token: None,
            chat_id: None,
            settings: FxHashMap::default(),
            priority: 0,
            is_active: true,
            usage_count: 0,
            last_used_at: None,
            last_error: None,
            last_error_at: None,
            created_at: Utc::now(),
        }
    }

    /// The chat target to deliver to: a `groupId` setting wins over the
    /// direct chat id.
    pub fn dispatch_target(&self) -> Option<&str> {
        self.settings
            .get("groupId")
            .and_then(serde_json::Value::as_str)
            .or(self.chat_id.as_deref())
    }

    /// The credential to send with: the bot token wins over the generic
    /// token.
    pub fn credential(&self) -> Option<&str> {
        self.bot_token.as_deref().or(self.token.as_deref())
    }

    fn usable(&self) -> bool {
        self.is_active && self.status == IntegrationStatus::Active
    }
}

/// Result of picking an integration for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchSelection {
    /// No active integration of the requested type exists.
    NoneActive,

    /// Exactly one integration holds the top priority.
    Unique(IntegrationKey),

    /// Two or more active integrations share the top priority; the
    /// configuration is ambiguous and nothing is selected.
    Ambiguous,
}

/// Aggregate counts over the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationStatistics {
    /// All records
    pub total: usize,

    /// Records with the active flag set
    pub active: usize,

    /// Records with the active flag unset
    pub inactive: usize,

    /// Record count per type
    pub by_type: FxHashMap<IntegrationType, usize>,
}

/// In-memory integration registry.
#[derive(Debug, Default)]
pub struct IntegrationRegistry {
    integrations: SlotMap<IntegrationKey, Integration>,
}

impl IntegrationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record.
    pub fn insert(&mut self, integration: Integration) -> IntegrationKey {
        self.integrations.insert(integration)
    }

    /// Fetch a record by key.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::NotFound`] if the key does not resolve.
    pub fn get(&self, key: IntegrationKey) -> Result<&Integration, IntegrationError> {
        self.integrations.get(key).ok_or(IntegrationError::NotFound)
    }

    /// Mutable access to a record, for admin edits.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::NotFound`] if the key does not resolve.
    pub fn get_mut(&mut self, key: IntegrationKey) -> Result<&mut Integration, IntegrationError> {
        self.integrations
            .get_mut(key)
            .ok_or(IntegrationError::NotFound)
    }

    /// Remove a record.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::NotFound`] if the key does not resolve.
    pub fn remove(&mut self, key: IntegrationKey) -> Result<Integration, IntegrationError> {
        self.integrations
            .remove(key)
            .ok_or(IntegrationError::NotFound)
    }

    /// All records, optionally including disabled ones, newest first.
    pub fn all(&self, include_inactive: bool) -> Vec<(IntegrationKey, &Integration)> {
        let mut records: Vec<(IntegrationKey, &Integration)> = self
            .integrations
            .iter()
            .filter(|(_, record)| include_inactive || record.is_active)
            .collect();
        records.sort_by(|(_, a), (_, b)| b.created_at.cmp(&a.created_at));
        records
    }

    /// Records of a type that are enabled and in `Active` status.
    pub fn find_active_by_type(
        &self,
        kind: IntegrationType,
    ) -> Vec<(IntegrationKey, &Integration)> {
        self.integrations
            .iter()
            .filter(|(_, record)| record.kind == kind && record.usable())
            .collect()
    }

    /// Pick the integration to dispatch through: the unique
    /// highest-priority active record of the type. A priority tie is an
    /// ambiguous configuration and selects nothing.
    pub fn select_for_dispatch(&self, kind: IntegrationType) -> DispatchSelection {
        let candidates = self.find_active_by_type(kind);

        let Some(top) = candidates.iter().map(|(_, record)| record.priority).max() else {
            return DispatchSelection::NoneActive;
        };

        let mut at_top = candidates
            .into_iter()
            .filter(|(_, record)| record.priority == top);

        match (at_top.next(), at_top.next()) {
            (Some((key, _)), None) => DispatchSelection::Unique(key),
            _ => DispatchSelection::Ambiguous,
        }
    }

    /// Enable a record and mark it `Active`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::NotFound`] if the key does not resolve.
    pub fn activate(&mut self, key: IntegrationKey) -> Result<(), IntegrationError> {
        let record = self.get_mut(key)?;
        record.is_active = true;
        record.status = IntegrationStatus::Active;
        Ok(())
    }

    /// Disable a record and mark it `Inactive`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::NotFound`] if the key does not resolve.
    pub fn deactivate(&mut self, key: IntegrationKey) -> Result<(), IntegrationError> {
        let record = self.get_mut(key)?;
        record.is_active = false;
        record.status = IntegrationStatus::Inactive;
        Ok(())
    }

    /// Record a successful delivery.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::NotFound`] if the key does not resolve.
    pub fn record_usage(&mut self, key: IntegrationKey) -> Result<(), IntegrationError> {
        let record = self.get_mut(key)?;
        record.usage_count += 1;
        record.last_used_at = Some(Utc::now());
        Ok(())
    }

    /// Record a delivery failure: last error fields are set and the status
    /// flips to `Error`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::NotFound`] if the key does not resolve.
    pub fn record_error(
        &mut self,
        key: IntegrationKey,
        message: &str,
    ) -> Result<(), IntegrationError> {
        let record = self.get_mut(key)?;
        record.last_error = Some(message.to_owned());
        record.last_error_at = Some(Utc::now());
        record.status = IntegrationStatus::Error;
        Ok(())
    }

    /// Aggregate counts over the registry.
    pub fn statistics(&self) -> IntegrationStatistics {
        let mut by_type: FxHashMap<IntegrationType, usize> = FxHashMap::default();
        let mut active = 0;

        for record in self.integrations.values() {
            *by_type.entry(record.kind).or_default() += 1;
            if record.is_active {
                active += 1;
            }
        }

        let total = self.integrations.len();
        IntegrationStatistics {
            total,
            active,
            inactive: total - active,
            by_type,
        }
    }
}
