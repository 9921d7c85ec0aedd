use crate::core::alert::PriceAlert;
use crate::core::config::SmtpConfig;
use crate::notify::NotificationChannel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

/// Email delivery over SMTP with STARTTLS. The transport is built once and
/// reused across sends.
pub struct EmailChannel {
    sender: String,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailChannel {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .with_context(|| format!("Invalid SMTP relay: {}", config.server))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(EmailChannel {
            sender: config.username.clone(),
            mailer,
        })
    }
}

pub(crate) fn subject_for(alert: &PriceAlert) -> String {
    format!("Price Alert: {} - {:+.2}%", alert.name, alert.percent_change)
}

pub(crate) fn body_for(alert: &PriceAlert) -> String {
    format!(
        "Commodity Price Alert\n\
         =====================\n\n\
         Commodity: {}\n\
         Category: {}\n\n\
         Current Price: {:.2}\n\
         Previous Price: {:.2}\n\
         Price Change: {:+.2} ({:+.2}%)\n\n\
         Performance:\n\
         - Daily: {:+.2}%\n\
         - Weekly: {:+.2}%\n\n\
         Date: {}\n\n\
         This is an automated alert from your commodities tracker.\n",
        alert.name,
        alert.category,
        alert.current_price,
        alert.previous_price,
        alert.price_change,
        alert.percent_change,
        alert.daily_pct,
        alert.weekly_pct,
        alert.date,
    )
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, alert: &PriceAlert, recipient: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.sender.parse().context("Invalid sender address")?)
            .to(recipient.parse().context("Invalid recipient address")?)
            .subject(subject_for(alert))
            .body(body_for(alert))?;

        debug!("Sending email alert for {} to {}", alert.name, recipient);
        self.mailer
            .send(message)
            .await
            .with_context(|| format!("SMTP send to {recipient} failed"))?;
        Ok(())
    }
}
