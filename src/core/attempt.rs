use crate::config::BookingConfig;
use crate::core::availability::AvailabilityChecker;
use crate::core::form::FormFiller;
use crate::core::reason::ReasonSelector;
use crate::core::selectors;
use crate::core::slot::SlotSelector;
use crate::domain::model::AttemptOutcome;
use crate::domain::ports::{Attempt, PageDriver, Sleeper};
use crate::utils::error::Result;

/// One pass: load the calendar, check the day, pick a slot, fill the form, submit.
pub struct BookingAttempt<'a, D: PageDriver, S: Sleeper> {
    driver: &'a D,
    sleeper: &'a S,
    config: &'a BookingConfig,
}

impl<'a, D: PageDriver, S: Sleeper> BookingAttempt<'a, D, S> {
    pub fn new(driver: &'a D, sleeper: &'a S, config: &'a BookingConfig) -> Self {
        Self {
            driver,
            sleeper,
            config,
        }
    }

    async fn execute(&self) -> Result<AttemptOutcome> {
        let target = self.config.target_day();
        self.driver.navigate(&self.config.station_url).await?;

        // 找日期：找不到就是設定錯誤，直接往上拋
        let availability = AvailabilityChecker::new(self.driver).check(&target).await?;
        if !availability.bookable {
            tracing::info!("⏳ No appointments available on {} yet", target);
            return Ok(AttemptOutcome::DayNotBookable);
        }
        tracing::info!("📅 Appointment available at {}", target);

        self.driver.click_element(&availability.element).await?;
        self.driver.wait_for_idle().await?;

        // 選時段
        let slots = SlotSelector::new(self.config.window);
        let values = slots.read_slots(self.driver).await?;
        tracing::debug!("Offered time slots: {:?}", values);
        let Some(slot) = slots.select(values.iter().map(String::as_str)) else {
            tracing::info!(
                "🕐 No time slot available within the given time range {}",
                self.config.window
            );
            return Ok(AttemptOutcome::NoSlotInWindow);
        };
        let slot = slot.to_string();
        self.driver.select(selectors::TIME_SLOT_SELECT, &slot).await?;
        tracing::info!("🕐 Selected time slot {}", slot);

        FormFiller::new(self.driver).fill(&self.config.personal).await?;
        ReasonSelector::new(self.driver, self.sleeper)
            .apply(self.config.reason)
            .await?;

        if self.config.share_with_warn_app {
            self.driver.click(selectors::SHARE_WITH_WARN_APP).await?;
        }

        if !self.driver.exists(selectors::SUBMIT_BUTTON).await? {
            tracing::warn!("⚠️ Submit button not available, form was not sent");
            return Ok(AttemptOutcome::SubmitUnavailable);
        }

        self.driver.click(selectors::SUBMIT_BUTTON).await?;
        self.driver.wait_for_idle().await?;

        Ok(AttemptOutcome::Success { slot })
    }
}

#[async_trait::async_trait]
impl<'a, D: PageDriver, S: Sleeper> Attempt for BookingAttempt<'a, D, S> {
    async fn run(&self, number: u32) -> Result<AttemptOutcome> {
        tracing::debug!("Attempt #{} against {}", number, self.config.station_url);
        self.execute().await
    }
}
