use crate::core::selectors;
use crate::domain::model::Probe;
use crate::domain::ports::PageDriver;
use crate::domain::time_window::{ClockTime, TimeWindow};
use crate::utils::error::Result;
use futures::future::try_join_all;

/// Picks a time slot in page order, not in time order.
pub struct SlotSelector {
    window: TimeWindow,
}

impl SlotSelector {
    pub fn new(window: TimeWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// First value inside the window. Values that are not clock times
    /// (e.g. a "please choose" placeholder) are skipped.
    pub fn select<'v, I>(&self, values: I) -> Option<&'v str>
    where
        I: IntoIterator<Item = &'v str>,
    {
        values.into_iter().find(|value| match ClockTime::parse(value) {
            Ok(time) => self.window.contains(time),
            Err(_) => {
                tracing::debug!("Skipping time slot option {:?}", value);
                false
            }
        })
    }

    /// Reads the `value` of every time slot option currently on the page.
    pub async fn read_slots<D: PageDriver>(&self, driver: &D) -> Result<Vec<String>> {
        let options = driver.query_all(selectors::TIME_SLOT_OPTIONS).await?;
        let probe = Probe::Attribute("value".to_string());
        let values = try_join_all(options.iter().map(|option| driver.evaluate(option, &probe))).await?;

        Ok(values
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(from: &str, to: &str) -> SlotSelector {
        SlotSelector::new(TimeWindow::parse(from, to).unwrap())
    }

    #[test]
    fn test_first_slot_in_window() {
        let slots = ["10:00", "11:30", "15:00"];
        assert_eq!(selector("11:00", "14:00").select(slots), Some("11:30"));
    }

    #[test]
    fn test_source_order_beats_time_order() {
        let slots = ["13:45", "11:15", "12:00"];
        assert_eq!(selector("11:00", "14:00").select(slots), Some("13:45"));
    }

    #[test]
    fn test_no_slot_in_window() {
        let slots = ["08:00", "10:59", "14:01", "18:30"];
        assert_eq!(selector("11:00", "14:00").select(slots), None);
        assert_eq!(selector("11:00", "14:00").select(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_placeholders_are_skipped() {
        let slots = ["", "Bitte wählen", "9:30", "11:00"];
        assert_eq!(selector("11:00", "14:00").select(slots), Some("11:00"));
        assert_eq!(selector("09:00", "10:00").select(slots), Some("9:30"));
    }
}
