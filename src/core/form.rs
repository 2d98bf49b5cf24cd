use crate::core::selectors;
use crate::domain::model::PersonalInformation;
use crate::domain::ports::PageDriver;
use crate::utils::error::Result;

/// Types the personal data into the booking form.
pub struct FormFiller<'a, D: PageDriver> {
    driver: &'a D,
}

impl<'a, D: PageDriver> FormFiller<'a, D> {
    pub fn new(driver: &'a D) -> Self {
        Self { driver }
    }

    pub async fn fill(&self, info: &PersonalInformation) -> Result<()> {
        // 生日欄位有輸入遮罩，只接受數字
        let birth_date = info.birth_date.replace('.', "");

        let text_fields: [(&str, &str); 16] = [
            (selectors::FIRST_NAME, info.first_name.as_str()),
            (selectors::LAST_NAME, info.last_name.as_str()),
            (selectors::EMAIL, info.email.as_str()),
            (selectors::TITLE, info.title.as_str()),
            (selectors::BIRTH_DATE, birth_date.as_str()),
            (selectors::ID_NUMBER, info.id_number.as_str()),
            (selectors::STREET, info.street.as_str()),
            (selectors::STREET_NUMBER, info.street_number.as_str()),
            (selectors::ZIP, info.zip.as_str()),
            (selectors::CITY, info.city.as_str()),
            (selectors::ADDITIONAL_ADDRESS, info.additional_address.as_str()),
            (selectors::TELEPHONE, info.telephone.as_str()),
            (selectors::MOBILE, info.mobile.as_str()),
            (selectors::BUSINESS_NUMBER, info.business_number.as_str()),
            (selectors::FAX, info.fax.as_str()),
            (selectors::COMMENT, info.comment.as_str()),
        ];

        for (selector, value) in text_fields {
            self.driver.type_text(selector, value).await?;
        }
        self.driver.select(selectors::GENDER, &info.gender).await?;

        tracing::debug!("Personal information filled in");
        Ok(())
    }
}
