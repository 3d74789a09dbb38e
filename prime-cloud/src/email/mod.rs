//! Transactional email (best-effort side channel)
//!
//! Sends go through a hosted email HTTP API on a detached task. Failures are
//! logged at `warn` and never reach the caller; without an API key the send
//! is skipped.

use serde::Serialize;
use shared::models::{MerchOrder, OrderItem, PartyOrder};

use crate::config::EmailConfig;
use crate::outbound::OutboundError;

const API_URL: &str = "https://api.resend.com/emails";
const SERVICE: &str = "Email";

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

pub async fn send(
    client: &reqwest::Client,
    config: &EmailConfig,
    api_key: &str,
    email: &OutgoingEmail,
) -> Result<(), OutboundError> {
    let resp = client
        .post(API_URL)
        .bearer_auth(api_key)
        .json(&SendRequest {
            from: &config.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            text: &email.text,
        })
        .send()
        .await
        .map_err(OutboundError::http(SERVICE))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(OutboundError::provider(SERVICE, format!("{status}: {body}")));
    }
    Ok(())
}

/// Fire and forget; the response never waits on delivery.
pub fn send_in_background(client: reqwest::Client, config: EmailConfig, email: OutgoingEmail) {
    let Some(api_key) = config.api_key.clone() else {
        tracing::debug!(to = %email.to, "Email not configured, skipping send");
        return;
    };
    tokio::spawn(async move {
        match send(&client, &config, &api_key, &email).await {
            Ok(()) => tracing::info!(to = %email.to, subject = %email.subject, "Email sent"),
            Err(e) => tracing::warn!(to = %email.to, error = %e, "Email send failed"),
        }
    });
}

fn item_lines(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(|i| format!("  {} x {} @ ${:.2}", i.qty, i.name, i.price))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Confirmation for a party order; `None` without a customer email
pub fn party_order_confirmation(order: &PartyOrder, store_name: &str) -> Option<OutgoingEmail> {
    let to = order.customer_email.clone().filter(|e| e.contains('@'))?;
    let when = match &order.event_time {
        Some(time) => format!("{} at {time}", order.event_date),
        None => order.event_date.to_string(),
    };
    let text = format!(
        "Hi {name},\n\n\
         Thanks for booking your party with {store_name} on {when} for {guests} guests.\n\n\
         {items}\n\n\
         Subtotal: ${subtotal:.2}\nTax: ${tax:.2}\nTotal: ${total:.2}\n\n\
         We'll be in touch to confirm the details.",
        name = order.customer_name,
        guests = order.guest_count,
        items = item_lines(&order.items),
        subtotal = order.subtotal,
        tax = order.tax,
        total = order.total,
    );
    Some(OutgoingEmail {
        to,
        subject: format!("Your party order with {store_name}"),
        text,
    })
}

pub fn merch_order_confirmation(order: &MerchOrder) -> OutgoingEmail {
    let text = format!(
        "Hi {name},\n\n\
         We received your merch order #{id}.\n\n\
         {items}\n\n\
         Subtotal: ${subtotal:.2}\nTax: ${tax:.2}\nTotal: ${total:.2}\n",
        name = order.customer_name,
        id = order.id,
        items = item_lines(&order.items),
        subtotal = order.subtotal,
        tax = order.tax,
        total = order.total,
    );
    OutgoingEmail {
        to: order.customer_email.clone(),
        subject: format!("Merch order #{} received", order.id),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::ApprovalStatus;

    fn party(email: Option<&str>) -> PartyOrder {
        PartyOrder {
            id: 7,
            store_id: 1,
            customer_name: "Lincoln PTA".into(),
            customer_phone: None,
            customer_email: email.map(String::from),
            event_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            event_time: Some("11:30".into()),
            guest_count: 40,
            items: vec![OrderItem {
                name: "Large cheese".into(),
                qty: 10.0,
                price: 12.0,
            }],
            subtotal: 120.0,
            tax: 9.0,
            total: 129.0,
            status: ApprovalStatus::Pending,
            approved_at: None,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_party_confirmation_body() {
        let email = party_order_confirmation(&party(Some("pta@example.com")), "Downtown").unwrap();
        assert_eq!(email.to, "pta@example.com");
        assert!(email.text.contains("2026-05-01 at 11:30"));
        assert!(email.text.contains("Total: $129.00"));
    }

    #[test]
    fn test_party_without_email_skips() {
        assert!(party_order_confirmation(&party(None), "Downtown").is_none());
        assert!(party_order_confirmation(&party(Some("not-an-address")), "Downtown").is_none());
    }
}
