//! Checkout request validation and the form sent to the payment gateway.
//! The HTTP call itself lives in the server.

use crate::config::{BillingConfig, PlanConfig};
use crate::error::{Result, RouteError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub plan_id: String,
    pub price_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

impl CheckoutRequest {
    /// The configured plan, provided the price id belongs to it.
    pub fn resolve<'a>(&self, cfg: &'a BillingConfig) -> Result<&'a PlanConfig> {
        let plan_id = self.plan_id.trim();
        let price_id = self.price_id.trim();
        if plan_id.is_empty() || price_id.is_empty() {
            return Err(RouteError::validation("planId and priceId are required"));
        }
        let plan = cfg
            .plan(plan_id)
            .ok_or_else(|| RouteError::validation(format!("unknown plan '{plan_id}'")))?;
        if plan.price_id != price_id {
            return Err(RouteError::validation(format!(
                "price '{price_id}' does not belong to plan '{plan_id}'"
            )));
        }
        Ok(plan)
    }
}

/// Form fields for a subscription checkout session.
pub fn session_form(cfg: &BillingConfig, plan: &PlanConfig) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "subscription".to_string()),
        ("line_items[0][price]", plan.price_id.clone()),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", cfg.success_url.clone()),
        ("cancel_url", cfg.cancel_url.clone()),
        ("metadata[plan_id]", plan.id.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(plan: &str, price: &str) -> CheckoutRequest {
        CheckoutRequest {
            plan_id: plan.into(),
            price_id: price.into(),
        }
    }

    #[test]
    fn resolves_matching_plan() {
        let cfg = BillingConfig::default();
        let plan = req("pro", "price_pro_monthly").resolve(&cfg).unwrap();
        assert_eq!(plan.id, "pro");
        let form = session_form(&cfg, plan);
        assert!(form.contains(&("line_items[0][price]", "price_pro_monthly".to_string())));
        assert!(form.iter().any(|(k, v)| *k == "mode" && v == "subscription"));
    }

    #[test]
    fn rejects_bad_requests() {
        let cfg = BillingConfig::default();
        assert!(req("enterprise", "price_x").resolve(&cfg).is_err());
        assert!(req("pro", "price_founder_monthly").resolve(&cfg).is_err());
        assert!(matches!(req("", "").resolve(&cfg), Err(RouteError::Validation(_))));
    }

    #[test]
    fn camel_case_wire_names() {
        let r: CheckoutRequest =
            serde_json::from_str(r#"{"planId":"pro","priceId":"price_pro_monthly"}"#).unwrap();
        assert_eq!(r, req("pro", "price_pro_monthly"));
    }
}
