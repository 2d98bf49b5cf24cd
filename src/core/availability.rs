use crate::core::selectors;
use crate::domain::model::{normalize_date, CalendarDay, DayAvailability, ElementHandle, Probe};
use crate::domain::ports::PageDriver;
use crate::utils::error::{BookingError, Result};
use futures::future::try_join_all;

/// Finds the target day in the station calendar and reports whether it is open.
pub struct AvailabilityChecker<'a, D: PageDriver> {
    driver: &'a D,
}

impl<'a, D: PageDriver> AvailabilityChecker<'a, D> {
    pub fn new(driver: &'a D) -> Self {
        Self { driver }
    }

    /// `target` is `YYYY-MM-DD`. A missing day is fatal: it means a wrong
    /// configuration or a changed calendar, not a day that is still closed.
    pub async fn check(&self, target: &str) -> Result<DayAvailability> {
        let elements = self.driver.query_all(selectors::CALENDAR_DAYS).await?;
        tracing::debug!("Calendar lists {} days", elements.len());

        let (element, day) = self
            .find_day(elements, target)
            .await?
            .ok_or_else(|| BookingError::DayNotFound {
                day: target.to_string(),
            })?;

        let bookable = self
            .driver
            .evaluate(
                &element,
                &Probe::ParentHasClass(selectors::ACTIVE_DAY_CLASS.to_string()),
            )
            .await?
            .as_bool()
            .unwrap_or(false);

        Ok(DayAvailability {
            element,
            day,
            bookable,
        })
    }

    /// Reads every day concurrently, then takes the first match in page order.
    pub async fn find_day(
        &self,
        elements: Vec<ElementHandle>,
        target: &str,
    ) -> Result<Option<(ElementHandle, CalendarDay)>> {
        let target = normalize_target(target);
        let days = try_join_all(elements.iter().map(|element| self.read_day(element))).await?;

        Ok(elements
            .into_iter()
            .zip(days)
            .find(|(_, day)| day.normalized() == target))
    }

    async fn read_day(&self, element: &ElementHandle) -> Result<CalendarDay> {
        let probe = Probe::Attributes(vec![
            selectors::DAY_YEAR_ATTR.to_string(),
            selectors::DAY_MONTH_ATTR.to_string(),
            selectors::DAY_DAY_ATTR.to_string(),
        ]);
        let attributes = self.driver.evaluate(element, &probe).await?;
        let field = |name: &str| {
            attributes
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        let day = CalendarDay::new(
            field(selectors::DAY_YEAR_ATTR),
            field(selectors::DAY_MONTH_ATTR),
            field(selectors::DAY_DAY_ATTR),
        );
        tracing::debug!("Calendar day {} -> {}", element.id, day.normalized());
        Ok(day)
    }
}

/// Applies the calendar padding rule to the configured day as well.
fn normalize_target(target: &str) -> String {
    let mut parts = target.trim().splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day)) => normalize_date(year, month, day),
        _ => target.trim().to_string(),
    }
}
