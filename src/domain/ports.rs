use crate::domain::model::{AttemptOutcome, ElementHandle, Probe};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Browser page automation used by the booking flow.
///
/// Implementations own one live page. Callers never issue two commands
/// concurrently except for `evaluate`, which must be a pure read.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Loads `url` and waits until the page is idle.
    async fn navigate(&self, url: &str) -> Result<()>;
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>>;
    async fn evaluate(&self, element: &ElementHandle, probe: &Probe) -> Result<serde_json::Value>;
    async fn click(&self, selector: &str) -> Result<()>;
    async fn click_element(&self, element: &ElementHandle) -> Result<()>;
    async fn type_text(&self, selector: &str, text: &str) -> Result<()>;
    async fn select(&self, selector: &str, value: &str) -> Result<()>;
    async fn exists(&self, selector: &str) -> Result<bool>;
    async fn wait_for_idle(&self) -> Result<()>;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// One pass over the booking page.
#[async_trait]
pub trait Attempt: Send + Sync {
    async fn run(&self, number: u32) -> Result<AttemptOutcome>;
}
