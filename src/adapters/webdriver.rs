use crate::config::{BrowserKind, WebDriverSettings};
use crate::domain::model::{ElementHandle, Probe};
use crate::domain::ports::PageDriver;
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;

/// W3C identifier of element references in WebDriver payloads.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4ae735f3e2b6";

const ATTRIBUTE_SCRIPT: &str = "return arguments[0].getAttribute(arguments[1]);";
const ATTRIBUTES_SCRIPT: &str = "const e = arguments[0]; const out = {}; \
    for (const name of arguments[1]) { out[name] = e.getAttribute(name); } return out;";
const PARENT_CLASS_SCRIPT: &str =
    "const p = arguments[0].parentElement; return !!p && p.classList.contains(arguments[1]);";
const SELECT_SCRIPT: &str = "const s = document.querySelector(arguments[0]); \
    if (!s || !Array.from(s.options).some(o => o.value === arguments[1])) { return false; } \
    s.value = arguments[1]; \
    s.dispatchEvent(new Event('input', { bubbles: true })); \
    s.dispatchEvent(new Event('change', { bubbles: true })); return true;";

/// Counts fetch/XHR requests that were started but have not finished yet.
/// The hooks are installed on the first poll after a page load.
const IDLE_SCRIPT: &str = "const w = window; \
    if (!w.__terminPending) { \
      const pending = { count: 0 }; w.__terminPending = pending; \
      const done = () => { pending.count = Math.max(0, pending.count - 1); }; \
      const send = XMLHttpRequest.prototype.send; \
      XMLHttpRequest.prototype.send = function (...args) { \
        pending.count += 1; this.addEventListener('loadend', done, { once: true }); \
        return send.apply(this, args); }; \
      if (w.fetch) { const fetch = w.fetch; \
        w.fetch = function (...args) { pending.count += 1; \
          return fetch.apply(this, args).finally(done); }; } \
    } \
    return { ready: document.readyState === 'complete', \
      resources: performance.getEntriesByType('resource').length, \
      pending: w.__terminPending.count };";

/// Upper bound for one idle wait; long-polling pages never reach zero requests in flight.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// `PageDriver` backed by a WebDriver server (chromedriver, geckodriver).
pub struct WebDriverPage {
    client: Client,
    base_url: String,
    session_id: String,
    idle_quiet_period: Duration,
}

impl WebDriverPage {
    /// Opens a new browser session.
    pub async fn start(settings: &WebDriverSettings) -> Result<Self> {
        let client = Client::new();
        let base_url = settings.url.trim_end_matches('/').to_string();

        tracing::debug!("Creating WebDriver session at {}", base_url);
        let response = client
            .post(format!("{}/session", base_url))
            .json(&json!({ "capabilities": { "alwaysMatch": Self::capabilities(settings) } }))
            .send()
            .await?;
        let value = Self::unwrap_response("new session", response).await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| BookingError::driver("new session", "response carries no sessionId"))?
            .to_string();
        tracing::info!("🌐 Browser session {} started", session_id);

        Ok(Self {
            client,
            base_url,
            session_id,
            idle_quiet_period: settings.idle_quiet_period,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Ends the session and closes the browser.
    pub async fn close(self) -> Result<()> {
        self.command("delete session", Method::DELETE, "", None).await?;
        tracing::debug!("WebDriver session {} closed", self.session_id);
        Ok(())
    }

    pub fn capabilities(settings: &WebDriverSettings) -> Value {
        match (settings.kind, settings.headless) {
            (BrowserKind::Chrome, true) => json!({
                "browserName": "chrome",
                "goog:chromeOptions": { "args": ["--headless=new", "--window-size=1280,1024"] }
            }),
            (BrowserKind::Chrome, false) => json!({ "browserName": "chrome" }),
            (BrowserKind::Firefox, true) => json!({
                "browserName": "firefox",
                "moz:firefoxOptions": { "args": ["-headless"] }
            }),
            (BrowserKind::Firefox, false) => json!({ "browserName": "firefox" }),
        }
    }

    async fn command(
        &self,
        name: &str,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}/session/{}{}", self.base_url, self.session_id, path);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        Self::unwrap_response(name, response).await
    }

    /// Returns the `value` member, or maps a WebDriver error payload.
    async fn unwrap_response(name: &str, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body: Value = response.json().await?;
        let value = body.get("value").cloned().unwrap_or(Value::Null);

        if !status.is_success() {
            let error = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            let message = value.get("message").and_then(Value::as_str).unwrap_or("");
            return Err(BookingError::driver(
                name,
                format!("{} ({}): {}", error, status.as_u16(), message),
            ));
        }
        Ok(value)
    }

    fn element_ref(element: &ElementHandle) -> Value {
        json!({ ELEMENT_KEY: element.id })
    }

    fn parse_element(name: &str, value: &Value) -> Result<ElementHandle> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(ElementHandle::new)
            .ok_or_else(|| BookingError::driver(name, format!("not an element reference: {}", value)))
    }

    async fn find_element(&self, selector: &str) -> Result<ElementHandle> {
        let value = self
            .command(
                "find element",
                Method::POST,
                "/element",
                Some(json!({ "using": "css selector", "value": selector })),
            )
            .await?;
        Self::parse_element("find element", &value)
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        self.command(
            "execute script",
            Method::POST,
            "/execute/sync",
            Some(json!({ "script": script, "args": args })),
        )
        .await
    }

    fn probe_script(probe: &Probe) -> (&'static str, Value) {
        match probe {
            Probe::Attribute(name) => (ATTRIBUTE_SCRIPT, json!(name)),
            Probe::Attributes(names) => (ATTRIBUTES_SCRIPT, json!(names)),
            Probe::ParentHasClass(class) => (PARENT_CLASS_SCRIPT, json!(class)),
        }
    }
}

#[async_trait]
impl PageDriver for WebDriverPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.command("navigate", Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        self.wait_for_idle().await
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>> {
        let value = self
            .command(
                "find elements",
                Method::POST,
                "/elements",
                Some(json!({ "using": "css selector", "value": selector })),
            )
            .await?;

        value
            .as_array()
            .ok_or_else(|| BookingError::driver("find elements", "expected an array"))?
            .iter()
            .map(|item| Self::parse_element("find elements", item))
            .collect()
    }

    async fn evaluate(&self, element: &ElementHandle, probe: &Probe) -> Result<Value> {
        let (script, argument) = Self::probe_script(probe);
        self.execute(script, vec![Self::element_ref(element), argument])
            .await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self.find_element(selector).await?;
        self.click_element(&element).await
    }

    async fn click_element(&self, element: &ElementHandle) -> Result<()> {
        self.command(
            "click",
            Method::POST,
            &format!("/element/{}/click", element.id),
            Some(json!({})),
        )
        .await?;
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let element = self.find_element(selector).await?;
        self.command(
            "send keys",
            Method::POST,
            &format!("/element/{}/value", element.id),
            Some(json!({ "text": text })),
        )
        .await?;
        Ok(())
    }

    async fn select(&self, selector: &str, value: &str) -> Result<()> {
        let selected = self
            .execute(SELECT_SCRIPT, vec![json!(selector), json!(value)])
            .await?;
        if selected.as_bool() != Some(true) {
            return Err(BookingError::driver(
                "select",
                format!("no option '{}' in {}", value, selector),
            ));
        }
        Ok(())
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(!self.query_all(selector).await?.is_empty())
    }

    /// Idle means the document finished loading, no fetch/XHR is in flight
    /// and no new resource was fetched during one quiet period.
    async fn wait_for_idle(&self) -> Result<()> {
        let started = tokio::time::Instant::now();
        let mut last_count: Option<u64> = None;

        loop {
            let state = self.execute(IDLE_SCRIPT, Vec::new()).await?;
            let ready = state.get("ready").and_then(Value::as_bool).unwrap_or(false);
            let resources = state.get("resources").and_then(Value::as_u64).unwrap_or(0);
            let pending = state.get("pending").and_then(Value::as_u64).unwrap_or(0);

            let settled = ready && pending == 0;
            if settled && last_count == Some(resources) {
                return Ok(());
            }
            if started.elapsed() >= IDLE_TIMEOUT {
                tracing::warn!(
                    "⚠️ Page not idle after {:?} ({} request(s) in flight), continuing",
                    IDLE_TIMEOUT,
                    pending
                );
                return Ok(());
            }
            last_count = settled.then_some(resources);
            tokio::time::sleep(self.idle_quiet_period).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(kind: BrowserKind, headless: bool) -> WebDriverSettings {
        WebDriverSettings {
            url: "http://localhost:4444".to_string(),
            kind,
            headless,
            idle_quiet_period: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_headless_capabilities() {
        let caps = WebDriverPage::capabilities(&settings(BrowserKind::Chrome, true));
        assert_eq!(caps["browserName"], "chrome");
        assert_eq!(caps["goog:chromeOptions"]["args"][0], "--headless=new");

        let caps = WebDriverPage::capabilities(&settings(BrowserKind::Firefox, true));
        assert_eq!(caps["moz:firefoxOptions"]["args"][0], "-headless");

        let caps = WebDriverPage::capabilities(&settings(BrowserKind::Chrome, false));
        assert!(caps.get("goog:chromeOptions").is_none());
    }

    #[test]
    fn test_probe_scripts_take_element_first() {
        let (script, arg) = WebDriverPage::probe_script(&Probe::Attributes(vec![
            "data-year".to_string(),
            "data-month".to_string(),
        ]));
        assert!(script.contains("getAttribute"));
        assert_eq!(arg, json!(["data-year", "data-month"]));

        let (script, arg) = WebDriverPage::probe_script(&Probe::ParentHasClass("active".to_string()));
        assert!(script.contains("parentElement"));
        assert_eq!(arg, json!("active"));
    }

    #[test]
    fn test_idle_script_reports_requests_in_flight() {
        assert!(IDLE_SCRIPT.contains("XMLHttpRequest.prototype.send"));
        assert!(IDLE_SCRIPT.contains("w.fetch"));
        assert!(IDLE_SCRIPT.contains("pending: w.__terminPending.count"));
    }

    #[test]
    fn test_parse_element_reference() {
        let element = WebDriverPage::parse_element("find", &json!({ ELEMENT_KEY: "abc" })).unwrap();
        assert_eq!(element, ElementHandle::new("abc"));
        assert!(WebDriverPage::parse_element("find", &json!({ "id": "abc" })).is_err());
    }
}
