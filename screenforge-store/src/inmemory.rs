use crate::{NewScreen, ScreenStore, StoredScreen};
use async_trait::async_trait;
use chrono::Utc;
use screenforge_core::{FlowId, Result, ScreenId, ScreenforgeError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

fn generate_screen_id() -> Result<ScreenId> {
    ScreenId::new(Uuid::new_v4().to_string())
        .map_err(|e| ScreenforgeError::Persistence(format!("Invalid screen ID: {e}")))
}

#[derive(Default)]
pub struct InMemoryScreenStore {
    screens: Arc<RwLock<HashMap<ScreenId, StoredScreen>>>,
    // Secondary index: flow_id -> screen ids in insertion order
    flow_index: Arc<RwLock<HashMap<FlowId, Vec<ScreenId>>>>,
}

impl InMemoryScreenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        read(&self.screens).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ScreenStore for InMemoryScreenStore {
    async fn insert_screen(&self, flow_id: &FlowId, new: NewScreen) -> Result<StoredScreen> {
        let expected = &new.screen.spec().hero_image.id;
        if new.hero_image_id != *expected {
            return Err(ScreenforgeError::Persistence(format!(
                "hero image id '{}' does not match the screen's hero image '{expected}'",
                new.hero_image_id
            )));
        }

        let id = generate_screen_id()?;
        let stored = StoredScreen {
            id: id.clone(),
            flow_id: flow_id.clone(),
            position: new.position,
            hero_image_id: new.hero_image_id,
            screen: new.screen,
            created_at: Utc::now(),
        };

        // Lock order: screens, then flow_index.
        let mut screens = write(&self.screens);
        let mut flow_index = write(&self.flow_index);
        let flow_screens = flow_index.entry(flow_id.clone()).or_default();
        let taken = flow_screens
            .iter()
            .filter_map(|id| screens.get(id))
            .any(|s| s.position == stored.position);
        if taken {
            return Err(ScreenforgeError::Persistence(format!(
                "flow '{flow_id}' already has a screen at position {}",
                stored.position
            )));
        }
        flow_screens.push(id.clone());
        screens.insert(id.clone(), stored.clone());
        drop(flow_index);
        drop(screens);

        tracing::debug!(
            screen.id = %id,
            flow.id = %flow_id,
            position = stored.position,
            "screen stored"
        );
        Ok(stored)
    }

    async fn get_screen(&self, id: &ScreenId) -> Result<StoredScreen> {
        read(&self.screens)
            .get(id)
            .cloned()
            .ok_or_else(|| ScreenforgeError::Persistence(format!("screen '{id}' not found")))
    }

    async fn list_screens(&self, flow_id: &FlowId) -> Result<Vec<StoredScreen>> {
        let screens = read(&self.screens);
        let flow_index = read(&self.flow_index);
        let mut listed: Vec<StoredScreen> = flow_index
            .get(flow_id)
            .map(|ids| ids.iter().filter_map(|id| screens.get(id).cloned()).collect())
            .unwrap_or_default();
        listed.sort_by_key(|s| s.position);
        Ok(listed)
    }

    async fn delete_screen(&self, id: &ScreenId) -> Result<()> {
        let mut screens = write(&self.screens);
        let Some(removed) = screens.remove(id) else {
            return Err(ScreenforgeError::Persistence(format!("screen '{id}' not found")));
        };
        let mut flow_index = write(&self.flow_index);
        if let Some(ids) = flow_index.get_mut(&removed.flow_id) {
            ids.retain(|existing| existing != id);
            if ids.is_empty() {
                flow_index.remove(&removed.flow_id);
            }
        }
        Ok(())
    }
}
