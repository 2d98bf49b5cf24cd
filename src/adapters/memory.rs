use crate::core::selectors;
use crate::domain::model::{ElementHandle, Probe};
use crate::domain::ports::PageDriver;
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Mutex;

/// A calendar day on a simulated station page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDay {
    pub year: String,
    pub month: String,
    pub day: String,
    pub active: bool,
}

impl SnapshotDay {
    pub fn new(year: &str, month: &str, day: &str, active: bool) -> Self {
        Self {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
            active,
        }
    }
}

/// What the station page shows after one navigation.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub days: Vec<SnapshotDay>,
    pub slots: Vec<String>,
    pub submit_present: bool,
}

/// Commands that change page state, in the order they were issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    Navigate(String),
    Click(String),
    ClickElement(String),
    Type(String, String),
    Select(String, String),
    WaitForIdle,
}

#[derive(Debug)]
struct PageState {
    snapshots: Vec<PageSnapshot>,
    navigations: usize,
    actions: Vec<PageAction>,
}

/// In-memory `PageDriver` serving scripted snapshots of the station page.
///
/// The first snapshot is shown until the second `navigate`; every further
/// `navigate` advances by one and the last snapshot repeats, so a scenario
/// such as "closed twice, then open" is three snapshots.
#[derive(Debug)]
pub struct InMemoryPage {
    state: Mutex<PageState>,
}

impl InMemoryPage {
    pub fn new(snapshots: Vec<PageSnapshot>) -> Self {
        Self {
            state: Mutex::new(PageState {
                snapshots,
                navigations: 0,
                actions: Vec::new(),
            }),
        }
    }

    pub fn actions(&self) -> Vec<PageAction> {
        self.state
            .lock()
            .map(|state| state.actions.clone())
            .unwrap_or_default()
    }

    pub fn navigations(&self) -> usize {
        self.state.lock().map(|state| state.navigations).unwrap_or_default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut PageState) -> Result<T>) -> Result<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| BookingError::driver("lock", "page state poisoned"))?;
        f(&mut state)
    }

    fn record(&self, action: PageAction) -> Result<()> {
        self.with_state(|state| {
            state.actions.push(action);
            Ok(())
        })
    }
}

impl PageState {
    fn snapshot(&self) -> Option<&PageSnapshot> {
        let last = self.snapshots.len().checked_sub(1)?;
        self.snapshots
            .get(self.navigations.saturating_sub(1).min(last))
    }

    fn day(&self, element: &ElementHandle) -> Option<&SnapshotDay> {
        let index: usize = element.id.strip_prefix("day-")?.parse().ok()?;
        self.snapshot()?.days.get(index)
    }

    fn slot(&self, element: &ElementHandle) -> Option<&String> {
        let index: usize = element.id.strip_prefix("slot-")?.parse().ok()?;
        self.snapshot()?.slots.get(index)
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> Value {
        if let Some(day) = self.day(element) {
            return match name {
                selectors::DAY_YEAR_ATTR => json!(day.year),
                selectors::DAY_MONTH_ATTR => json!(day.month),
                selectors::DAY_DAY_ATTR => json!(day.day),
                _ => Value::Null,
            };
        }
        match (self.slot(element), name) {
            (Some(value), "value") => json!(value),
            _ => Value::Null,
        }
    }
}

#[async_trait]
impl PageDriver for InMemoryPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.with_state(|state| {
            state.navigations += 1;
            state.actions.push(PageAction::Navigate(url.to_string()));
            Ok(())
        })
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>> {
        self.with_state(|state| {
            let Some(snapshot) = state.snapshot() else {
                return Ok(Vec::new());
            };
            let handles = match selector {
                selectors::CALENDAR_DAYS => (0..snapshot.days.len())
                    .map(|i| ElementHandle::new(format!("day-{}", i)))
                    .collect(),
                selectors::TIME_SLOT_OPTIONS => (0..snapshot.slots.len())
                    .map(|i| ElementHandle::new(format!("slot-{}", i)))
                    .collect(),
                _ => Vec::new(),
            };
            Ok(handles)
        })
    }

    async fn evaluate(&self, element: &ElementHandle, probe: &Probe) -> Result<Value> {
        self.with_state(|state| {
            if state.day(element).is_none() && state.slot(element).is_none() {
                return Err(BookingError::driver(
                    "evaluate",
                    format!("stale element reference {}", element.id),
                ));
            }
            let value = match probe {
                Probe::Attribute(name) => state.attribute(element, name),
                Probe::Attributes(names) => Value::Object(
                    names
                        .iter()
                        .map(|name| (name.clone(), state.attribute(element, name)))
                        .collect::<Map<String, Value>>(),
                ),
                Probe::ParentHasClass(class) => {
                    let active = state.day(element).is_some_and(|day| day.active);
                    Value::Bool(active && class.as_str() == selectors::ACTIVE_DAY_CLASS)
                }
            };
            Ok(value)
        })
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.record(PageAction::Click(selector.to_string()))
    }

    async fn click_element(&self, element: &ElementHandle) -> Result<()> {
        self.record(PageAction::ClickElement(element.id.clone()))
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        self.record(PageAction::Type(selector.to_string(), text.to_string()))
    }

    async fn select(&self, selector: &str, value: &str) -> Result<()> {
        self.record(PageAction::Select(selector.to_string(), value.to_string()))
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        self.with_state(|state| {
            Ok(selector == selectors::SUBMIT_BUTTON
                && state.snapshot().is_some_and(|s| s.submit_present))
        })
    }

    async fn wait_for_idle(&self) -> Result<()> {
        self.record(PageAction::WaitForIdle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_navigation_advances_and_last_snapshot_repeats() {
        let page = InMemoryPage::new(vec![
            PageSnapshot {
                days: vec![SnapshotDay::new("2021", "12", "24", false)],
                ..Default::default()
            },
            PageSnapshot {
                days: vec![SnapshotDay::new("2021", "12", "24", true)],
                ..Default::default()
            },
        ]);
        let active = Probe::ParentHasClass("active".to_string());
        let day = ElementHandle::new("day-0");

        for expected in [false, true, true] {
            page.navigate("https://booking.example.com").await.unwrap();
            let value = page.evaluate(&day, &active).await.unwrap();
            assert_eq!(value, json!(expected));
        }
        assert_eq!(page.navigations(), 3);
    }

    #[tokio::test]
    async fn test_unknown_element_is_an_error() {
        let page = InMemoryPage::new(vec![PageSnapshot::default()]);
        page.navigate("https://booking.example.com").await.unwrap();

        let result = page
            .evaluate(&ElementHandle::new("day-7"), &Probe::Attribute("data-day".to_string()))
            .await;
        assert!(matches!(result, Err(BookingError::Driver { .. })));
    }
}
