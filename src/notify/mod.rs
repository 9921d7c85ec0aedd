//! Alert delivery boundary.
//!
//! The core only produces `PriceAlert` events; everything here is the
//! collaborator that formats and sends them. Channels share one SMTP
//! account; SMS goes out through carrier email-to-SMS gateways.

pub mod email;
pub mod sms;

use crate::core::alert::PriceAlert;
use crate::core::config::{SmtpConfig, Subscription};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

/// A delivery channel for one alert to one recipient.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, alert: &PriceAlert, recipient: &str) -> Result<()>;
}

/// The configured channels for one run.
pub struct ChannelSet {
    email: Option<email::EmailChannel>,
    sms: Option<sms::SmsChannel>,
}

impl ChannelSet {
    /// Builds channels from the SMTP configuration; no configuration means
    /// no channels, and dispatch becomes a no-op.
    pub fn from_smtp(smtp: Option<&SmtpConfig>) -> Result<Self> {
        match smtp {
            Some(config) => Ok(ChannelSet {
                email: Some(email::EmailChannel::new(config)?),
                sms: Some(sms::SmsChannel::new(config)?),
            }),
            None => Ok(ChannelSet {
                email: None,
                sms: None,
            }),
        }
    }

    /// Sends one fired alert to the subscription's destinations. The SMS
    /// destination is resolved via [`sms::gateway_address`]. Delivery
    /// failures are logged per recipient and never abort the batch.
    /// Returns the number of successful sends.
    pub async fn dispatch(&self, subscription: &Subscription, alert: &PriceAlert) -> usize {
        let mut sent = 0;

        let routes: [(Option<String>, Option<&dyn NotificationChannel>); 2] = [
            (
                subscription.email.clone(),
                self.email.as_ref().map(|c| c as &dyn NotificationChannel),
            ),
            (
                sms::gateway_address(subscription),
                self.sms.as_ref().map(|c| c as &dyn NotificationChannel),
            ),
        ];

        for (recipient, channel) in routes {
            let (Some(recipient), Some(channel)) = (recipient, channel) else {
                continue;
            };
            match channel.send(alert, &recipient).await {
                Ok(()) => {
                    info!(
                        "{} alert sent to {} for {}",
                        channel.name(),
                        recipient,
                        alert.name
                    );
                    sent += 1;
                }
                Err(e) => {
                    warn!(
                        "Failed to send {} alert to {}: {}",
                        channel.name(),
                        recipient,
                        e
                    );
                }
            }
        }

        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> PriceAlert {
        PriceAlert {
            name: "Gold".into(),
            category: "Metals".into(),
            current_price: 2020.0,
            previous_price: 2000.0,
            price_change: 20.0,
            percent_change: 1.0,
            daily_pct: 0.5,
            weekly_pct: 1.5,
            date: "2025/11/28".into(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_without_channels_sends_nothing() {
        let channels = ChannelSet::from_smtp(None).unwrap();
        let subscription = Subscription {
            commodity: "Gold".into(),
            email: Some("me@example.com".into()),
            sms: None,
            sms_number: None,
            sms_carrier: None,
            min_percent_change: 1.0,
        };

        assert_eq!(channels.dispatch(&subscription, &alert()).await, 0);
    }
}
