use async_trait::async_trait;
use chrono::{DateTime, Utc};
use screenforge_core::{FlowId, Result, ScreenId};
use screenforge_ui::ValidatedScreen;
use serde::Serialize;

/// A screen about to be persisted. Only a [`ValidatedScreen`] can be stored.
#[derive(Debug, Clone)]
pub struct NewScreen {
    pub screen: ValidatedScreen,
    /// Position of the screen within its flow.
    pub position: u32,
    pub hero_image_id: String,
}

impl NewScreen {
    /// Takes the hero image id from the screen itself.
    pub fn new(screen: ValidatedScreen, position: u32) -> Self {
        let hero_image_id = screen.spec().hero_image.id.clone();
        Self { screen, position, hero_image_id }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredScreen {
    pub id: ScreenId,
    pub flow_id: FlowId,
    pub position: u32,
    pub hero_image_id: String,
    #[serde(rename = "screenDSL")]
    pub screen: ValidatedScreen,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait ScreenStore: Send + Sync {
    async fn insert_screen(&self, flow_id: &FlowId, screen: NewScreen) -> Result<StoredScreen>;
    async fn get_screen(&self, id: &ScreenId) -> Result<StoredScreen>;
    /// Screens of a flow ordered by position.
    async fn list_screens(&self, flow_id: &FlowId) -> Result<Vec<StoredScreen>>;
    async fn delete_screen(&self, id: &ScreenId) -> Result<()>;
}
