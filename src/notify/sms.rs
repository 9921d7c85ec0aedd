use crate::core::alert::PriceAlert;
use crate::core::config::{SmtpConfig, Subscription};
use crate::notify::NotificationChannel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, warn};

/// SMS delivery via carrier email-to-SMS gateways; the recipient is a full
/// gateway address such as `5551234567@vtext.com`. The transport is built
/// once and reused across sends.
pub struct SmsChannel {
    sender: String,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmsChannel {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .with_context(|| format!("Invalid SMTP relay: {}", config.server))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(SmsChannel {
            sender: config.username.clone(),
            mailer,
        })
    }
}

/// Known US carrier gateway domains.
pub fn carrier_gateway(carrier: &str) -> Option<&'static str> {
    match carrier.to_lowercase().as_str() {
        "verizon" => Some("vtext.com"),
        "att" => Some("txt.att.net"),
        "t-mobile" => Some("tmomail.net"),
        "sprint" => Some("messaging.sprintpcs.com"),
        "boost" => Some("sms.myboostmobile.com"),
        "cricket" => Some("sms.cricketwireless.net"),
        "uscellular" => Some("email.uscc.net"),
        _ => None,
    }
}

/// Resolves the subscription's SMS destination. An explicit gateway address
/// wins; otherwise a number/carrier pair is completed from the known
/// carrier list, with unknown carriers logged and dropped.
pub fn gateway_address(subscription: &Subscription) -> Option<String> {
    if let Some(address) = &subscription.sms {
        return Some(address.clone());
    }

    let (number, carrier) = match (&subscription.sms_number, &subscription.sms_carrier) {
        (Some(number), Some(carrier)) => (number, carrier),
        (Some(_), None) | (None, Some(_)) => {
            warn!(
                "Subscription {} needs both sms_number and sms_carrier",
                subscription.commodity
            );
            return None;
        }
        (None, None) => return None,
    };

    match carrier_gateway(carrier) {
        Some(domain) => Some(format!("{number}@{domain}")),
        None => {
            warn!(
                "Unknown SMS carrier '{}' for subscription {}",
                carrier, subscription.commodity
            );
            None
        }
    }
}

// Keep within a single 160-character segment.
pub(crate) fn short_body_for(alert: &PriceAlert) -> String {
    format!(
        "{} Alert: {:.2} ({:+.2}%) Daily:{:+.2}% Weekly:{:+.2}%",
        alert.name, alert.current_price, alert.percent_change, alert.daily_pct, alert.weekly_pct
    )
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    fn name(&self) -> &'static str {
        "sms"
    }

    async fn send(&self, alert: &PriceAlert, recipient: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.sender.parse().context("Invalid sender address")?)
            .to(recipient.parse().context("Invalid SMS gateway address")?)
            .body(short_body_for(alert))?;

        debug!("Sending SMS alert for {} to {}", alert.name, recipient);
        self.mailer
            .send(message)
            .await
            .with_context(|| format!("SMTP send to gateway {recipient} failed"))?;
        Ok(())
    }
}
