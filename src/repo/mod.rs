//! Device registry.
//!
//! The estimation core never touches storage; it receives snapshots. This
//! trait is the seam the surrounding service implements against whatever
//! store it runs on, and [`memory::InMemoryRegistry`] is the default
//! backing used in tests and demo deployments.

pub mod memory;

pub use memory::InMemoryRegistry;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Device, DeviceUpdate, NewDevice};

#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Snapshot of one user's devices, ordered by name for stable listings.
    async fn list_devices(&self, user_id: Uuid) -> Result<Vec<Device>>;

    async fn get_device(&self, user_id: Uuid, device_id: Uuid) -> Result<Option<Device>>;

    /// Validate and store a new device. New devices start `Active`.
    async fn add_device(&self, user_id: Uuid, new: NewDevice) -> Result<Device>;

    /// Apply a partial edit. Edits never change the on/off status; that
    /// only moves through [`toggle_status`](Self::toggle_status).
    async fn update_device(
        &self,
        user_id: Uuid,
        device_id: Uuid,
        update: DeviceUpdate,
    ) -> Result<Device>;

    /// Flip a device's on/off status and return the updated device.
    async fn toggle_status(&self, user_id: Uuid, device_id: Uuid) -> Result<Device>;

    /// Remove a device. Returns whether anything was deleted.
    async fn remove_device(&self, user_id: Uuid, device_id: Uuid) -> Result<bool>;
}

/// Convenience alias used by callers composing over the seam.
pub type SharedRegistry = std::sync::Arc<dyn DeviceRegistry>;
