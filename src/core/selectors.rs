//! CSS selectors of the station booking page.

pub const CALENDAR_DAYS: &str = "#termin-kalender > div.days > div > a";
pub const ACTIVE_DAY_CLASS: &str = "active";
pub const DAY_YEAR_ATTR: &str = "data-year";
pub const DAY_MONTH_ATTR: &str = "data-month";
pub const DAY_DAY_ATTR: &str = "data-day";

pub const TIME_SLOT_SELECT: &str = "#jform_uhrzeit";
pub const TIME_SLOT_OPTIONS: &str = "select#jform_uhrzeit option";

pub const REASON_QUESTION: &str = "#jform_params_frage40_label";
pub const REASON_CONTACT_PERSON: &str = "#jform_params_frage40_1_label";
pub const REASON_WARN_APP: &str = "#jform_params_frage40_6_label";
pub const SHARE_WITH_WARN_APP: &str = "#jform_coronawarnapp_label";

pub const SUBMIT_BUTTON: &str = "#buchungsform > div > div:nth-child(1) > button.btn-submit";

pub const FIRST_NAME: &str = "input#jform_vorname";
pub const LAST_NAME: &str = "input#jform_nachname";
pub const EMAIL: &str = "input#jform_email";
pub const TITLE: &str = "input#jform_titel";
pub const GENDER: &str = "select#jform_geschlecht";
pub const BIRTH_DATE: &str = "input#jform_geburtstag";
pub const ID_NUMBER: &str = "input#jform_ausweisnummer";
pub const STREET: &str = "input#jform_strasse";
pub const STREET_NUMBER: &str = "input#jform_nr";
pub const ZIP: &str = "input#jform_plz";
pub const CITY: &str = "input#jform_ort";
pub const ADDITIONAL_ADDRESS: &str = "input#jform_zusatz";
pub const TELEPHONE: &str = "input#jform_telefon";
pub const MOBILE: &str = "input#jform_mobil";
pub const BUSINESS_NUMBER: &str = "input#jform_telefon_geschaeftlich";
pub const FAX: &str = "input#jform_fax";
pub const COMMENT: &str = "textarea#jform_bemerkungen";
