use anyhow::{bail, Result};
use async_trait::async_trait;
use itertools::Itertools;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;
use validator::Validate;

use super::DeviceRegistry;
use crate::domain::{Device, DeviceUpdate, NewDevice};

/// Process-local registry: per-user maps behind one lock.
///
/// Good enough for tests and single-node demo deployments; anything
/// multi-node implements [`DeviceRegistry`] over a real store.
#[derive(Default)]
pub struct InMemoryRegistry {
    devices: RwLock<HashMap<Uuid, BTreeMap<Uuid, Device>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeviceRegistry for InMemoryRegistry {
    async fn list_devices(&self, user_id: Uuid) -> Result<Vec<Device>> {
        let devices = self.devices.read();
        Ok(devices
            .get(&user_id)
            .map(|user_devices| {
                user_devices
                    .values()
                    .cloned()
                    .sorted_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_device(&self, user_id: Uuid, device_id: Uuid) -> Result<Option<Device>> {
        let devices = self.devices.read();
        Ok(devices
            .get(&user_id)
            .and_then(|user_devices| user_devices.get(&device_id))
            .cloned())
    }

    async fn add_device(&self, user_id: Uuid, new: NewDevice) -> Result<Device> {
        new.validate()?;
        let device = new.into_device(user_id);

        let mut devices = self.devices.write();
        devices
            .entry(user_id)
            .or_default()
            .insert(device.id, device.clone());
        tracing::debug!(%user_id, device_id = %device.id, name = %device.name, "device registered");
        Ok(device)
    }

    async fn update_device(
        &self,
        user_id: Uuid,
        device_id: Uuid,
        update: DeviceUpdate,
    ) -> Result<Device> {
        update.validate()?;

        let mut devices = self.devices.write();
        let Some(device) = devices
            .get_mut(&user_id)
            .and_then(|user_devices| user_devices.get_mut(&device_id))
        else {
            bail!("device {device_id} not found for user {user_id}");
        };
        update.apply(device);
        Ok(device.clone())
    }

    async fn toggle_status(&self, user_id: Uuid, device_id: Uuid) -> Result<Device> {
        let mut devices = self.devices.write();
        let Some(device) = devices
            .get_mut(&user_id)
            .and_then(|user_devices| user_devices.get_mut(&device_id))
        else {
            bail!("device {device_id} not found for user {user_id}");
        };
        device.toggle();
        tracing::debug!(%user_id, %device_id, status = %device.status, "device toggled");
        Ok(device.clone())
    }

    async fn remove_device(&self, user_id: Uuid, device_id: Uuid) -> Result<bool> {
        let mut devices = self.devices.write();
        let removed = devices
            .get_mut(&user_id)
            .and_then(|user_devices| user_devices.remove(&device_id))
            .is_some();
        if removed {
            tracing::debug!(%user_id, %device_id, "device removed");
        }
        Ok(removed)
    }
}
