// Low-level NVP button API client
//
// One method per wire operation; the synchronization protocol lives in
// sync.rs. Calls are synchronous unary POSTs with whatever timeout the
// underlying client defaults to.

use chrono::{DateTime, Utc};
use reqwest::Client;

use agenda_core::PricingTierSet;

use crate::error::PaypalError;
use crate::nvp::NvpResponse;

const NVP_VERSION: &str = "51.0";

/// How far back the button search window reaches, in days. A liveness
/// heuristic: buttons older than this are invisible to the match sequence.
pub const SEARCH_BACK_DAYS: i64 = 90;

/// Credentials and endpoint for the NVP API
#[derive(Debug, Clone)]
pub struct PaypalConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub signature: String,
}

impl PaypalConfig {
    /// Load from PAYPAL_URL / PAYPAL_USER / PAYPAL_PASSWORD / PAYPAL_SIGNATURE
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            url: require_env("PAYPAL_URL")?,
            user: require_env("PAYPAL_USER")?,
            password: require_env("PAYPAL_PASSWORD")?,
            signature: require_env("PAYPAL_SIGNATURE")?,
        })
    }
}

fn require_env(name: &'static str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{name} environment variable not set"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonMethod {
    Create,
    Update,
}

impl ButtonMethod {
    fn as_str(&self) -> &'static str {
        match self {
            ButtonMethod::Create => "BMCreateButton",
            ButtonMethod::Update => "BMUpdateButton",
        }
    }
}

/// NVP button API client
#[derive(Debug, Clone)]
pub struct PaypalClient {
    http: Client,
    config: PaypalConfig,
}

impl PaypalClient {
    pub fn new(config: PaypalConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn base_params(&self, method: &str) -> Vec<(String, String)> {
        vec![
            ("USER".into(), self.config.user.clone()),
            ("PWD".into(), self.config.password.clone()),
            ("SIGNATURE".into(), self.config.signature.clone()),
            ("VERSION".into(), NVP_VERSION.into()),
            ("METHOD".into(), method.into()),
        ]
    }

    async fn call(&self, params: Vec<(String, String)>) -> Result<NvpResponse, PaypalError> {
        let response = self
            .http
            .post(&self.config.url)
            .form(&params)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Ok(NvpResponse::decode(&body))
    }

    /// List externally-assigned button ids created or updated since
    /// `start_date`
    pub async fn search_buttons(
        &self,
        start_date: DateTime<Utc>,
    ) -> Result<Vec<String>, PaypalError> {
        let mut params = self.base_params("BMButtonSearch");
        params.push((
            "STARTDATE".into(),
            start_date.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        ));

        let resp = self.call(params).await?;
        resp.check_ack()?;
        Ok(resp.indexed("L_HOSTEDBUTTONID"))
    }

    /// Fetch one button's metadata and extract the embedded item number.
    /// Returns None when the metadata is missing or malformed.
    pub async fn button_item_number(
        &self,
        button_id: &str,
    ) -> Result<Option<String>, PaypalError> {
        let mut params = self.base_params("BMGetButtonDetails");
        params.push(("HOSTEDBUTTONID".into(), button_id.into()));

        let resp = self.call(params).await?;
        resp.check_ack()?;
        Ok(resp
            .get("L_BUTTONVAR6")
            .and_then(crate::nvp::extract_item_number))
    }

    /// Create or update a hosted button, returning the provider-assigned
    /// button id
    pub async fn process_button(
        &self,
        method: ButtonMethod,
        button_id: Option<&str>,
        title: &str,
        item_id: &str,
        tiers: &PricingTierSet,
    ) -> Result<String, PaypalError> {
        let mut params = self.base_params(method.as_str());

        if let Some(id) = button_id {
            params.push(("HOSTEDBUTTONID".into(), id.into()));
        }

        params.extend([
            ("BUTTONCODE".into(), "HOSTED".into()),
            ("BUTTONTYPE".into(), "CART".into()),
            ("BUTTONSUBTYPE".into(), "SERVICES".into()),
            ("BUTTONCOUNTRY".into(), "GB".into()),
            ("L_BUTTONVAR1".into(), format!("item_name={title}")),
            ("L_BUTTONVAR2".into(), format!("item_number={item_id}")),
            ("L_BUTTONVAR3".into(), "currency_code=GBP".into()),
            ("OPTION0NAME".into(), "Ticket type".into()),
        ]);

        for (index, tier) in tiers.tiers().iter().enumerate() {
            params.push((format!("L_OPTION0SELECT{index}"), tier.label.clone()));
            params.push((format!("L_OPTION0PRICE{index}"), tier.price.clone()));
        }

        params.extend([
            ("OPTION1NAME".into(), "Date".into()),
            ("L_OPTION1SELECT0".into(), "all".into()),
            ("L_OPTION1SELECT1".into(), "1".into()),
            ("L_OPTION1SELECT2".into(), "2".into()),
            ("L_OPTION1SELECT3".into(), "3".into()),
            ("L_OPTION1SELECT4".into(), "4".into()),
            ("L_OPTION0SHIPPINGAMOUNT0".into(), "0".into()),
            ("L_OPTION0SHIPPINGAMOUNT1".into(), "0".into()),
            ("L_SHIPPINGOPTIONISDEFAULT0".into(), "false".into()),
        ]);

        tracing::debug!(method = method.as_str(), item_id, "processing payment button");

        let resp = self.call(params).await?;
        resp.check_ack()?;
        Ok(resp.require("HOSTEDBUTTONID")?.to_string())
    }
}
