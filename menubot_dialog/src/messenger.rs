use async_trait::async_trait;
use menubot_core::UserId;

use crate::event::ButtonSpec;

/// Outbound channel to the end-user.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, user: UserId, text: &str) -> anyhow::Result<()>;

    async fn send_html(&self, user: UserId, text: &str) -> anyhow::Result<()>;

    /// Send `text` with one button per row.
    async fn send_buttons(
        &self,
        user: UserId,
        text: &str,
        buttons: &[ButtonSpec],
    ) -> anyhow::Result<()>;

    async fn send_image(&self, user: UserId, image_key: &str) -> anyhow::Result<()>;

    /// Replace the user's command menu with `(command, description)` pairs.
    async fn set_menu(&self, user: UserId, commands: &[(&str, &str)]) -> anyhow::Result<()>;
}
