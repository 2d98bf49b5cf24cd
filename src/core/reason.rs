use crate::core::selectors;
use crate::domain::model::BookingReason;
use crate::domain::ports::{PageDriver, Sleeper};
use crate::utils::error::Result;
use std::time::Duration;

/// Time the questionnaire needs to react to a click.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Answers the "reason for the test" questionnaire.
pub struct ReasonSelector<'a, D: PageDriver, S: Sleeper> {
    driver: &'a D,
    sleeper: &'a S,
}

impl<'a, D: PageDriver, S: Sleeper> ReasonSelector<'a, D, S> {
    pub fn new(driver: &'a D, sleeper: &'a S) -> Self {
        Self { driver, sleeper }
    }

    /// Clicks in order: open the question, then pick the answer.
    pub fn actions(reason: BookingReason) -> [&'static str; 2] {
        let answer = match reason {
            BookingReason::CoronaWarnApp => selectors::REASON_WARN_APP,
            BookingReason::ContactPerson => selectors::REASON_CONTACT_PERSON,
        };
        [selectors::REASON_QUESTION, answer]
    }

    pub async fn apply(&self, reason: BookingReason) -> Result<()> {
        tracing::debug!("Selecting test reason {}", reason);
        for selector in Self::actions(reason) {
            self.driver.click(selector).await?;
            self.sleeper.sleep(SETTLE_DELAY).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryPage, PageAction, PageSnapshot};
    use crate::adapters::sleeper::RecordingSleeper;

    fn clicks(page: &InMemoryPage) -> Vec<String> {
        page.actions()
            .into_iter()
            .filter_map(|action| match action {
                PageAction::Click(selector) => Some(selector),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_contact_person_sequence() {
        let page = InMemoryPage::new(vec![PageSnapshot::default()]);
        let sleeper = RecordingSleeper::new();

        ReasonSelector::new(&page, &sleeper)
            .apply(BookingReason::ContactPerson)
            .await
            .unwrap();

        assert_eq!(
            clicks(&page),
            vec![
                "#jform_params_frage40_label".to_string(),
                "#jform_params_frage40_1_label".to_string(),
            ]
        );
        assert_eq!(sleeper.sleeps(), vec![SETTLE_DELAY, SETTLE_DELAY]);
    }

    #[tokio::test]
    async fn test_warn_app_sequence() {
        let page = InMemoryPage::new(vec![PageSnapshot::default()]);
        let sleeper = RecordingSleeper::new();

        ReasonSelector::new(&page, &sleeper)
            .apply(BookingReason::CoronaWarnApp)
            .await
            .unwrap();

        assert_eq!(
            clicks(&page),
            vec![
                "#jform_params_frage40_label".to_string(),
                "#jform_params_frage40_6_label".to_string(),
            ]
        );
    }

    #[test]
    fn test_every_reason_has_distinct_answer() {
        let answers: Vec<&str> = BookingReason::ALL
            .iter()
            .map(|reason| ReasonSelector::<InMemoryPage, RecordingSleeper>::actions(*reason)[1])
            .collect();
        assert_eq!(answers.len(), 2);
        assert_ne!(answers[0], answers[1]);
    }
}
