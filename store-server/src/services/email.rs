//! Email Service
//!
//! 订单与状态变更的 SMTP 通知。发送失败只记录日志，绝不影响主流程；
//! 未配置 SMTP_HOST 时服务处于禁用状态，发送调用退化为 debug 日志。

use std::time::Duration;

use lettre::message::{Mailbox, Message, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::core::Config;
use crate::db::models::Order;

/// Spacing between the admin and customer sends, so the relay never sees
/// the two deliveries near-simultaneously
const EMAIL_SPACING: Duration = Duration::from_millis(1500);

/// SMTP notification service
#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    admin_to: String,
    site_url: String,
}

impl EmailService {
    /// Build the service from config; an unset SMTP_HOST yields a
    /// disabled service
    pub fn from_config(config: &Config) -> Self {
        let transport = config.smtp.as_ref().and_then(|smtp| {
            match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host) {
                Ok(builder) => Some(
                    builder
                        .port(smtp.port)
                        .credentials(Credentials::new(
                            smtp.username.clone(),
                            smtp.password.clone(),
                        ))
                        .build(),
                ),
                Err(e) => {
                    tracing::error!(error = %e, "Invalid SMTP configuration");
                    None
                }
            }
        });

        if transport.is_none() {
            tracing::warn!("SMTP not configured, email notifications disabled");
        }

        Self {
            transport,
            from: config
                .smtp
                .as_ref()
                .map(|s| s.from.clone())
                .unwrap_or_default(),
            admin_to: config.admin_notify_email.clone(),
            site_url: config.public_site_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send the admin notification and the customer confirmation for a
    /// new order. Failures are logged, never returned.
    pub async fn send_order_notifications(&self, order: &Order) {
        if self.transport.is_none() {
            tracing::debug!(
                order_number = %order.order_number,
                "Email disabled, skipping order notifications"
            );
            return;
        }

        let html = order_html(order, &self.site_url);

        if !self.admin_to.is_empty() {
            let subject = format!("New order {}", order.order_number);
            self.send(&self.admin_to, &subject, &html).await;
        }

        tokio::time::sleep(EMAIL_SPACING).await;

        let subject = format!("Order confirmation {}", order.order_number);
        self.send(&order.email, &subject, &html).await;
    }

    /// Tell the customer their order status changed. Best-effort.
    pub async fn send_status_update(&self, order: &Order) {
        if self.transport.is_none() {
            tracing::debug!(
                order_number = %order.order_number,
                status = %order.status,
                "Email disabled, skipping status update"
            );
            return;
        }

        let subject = format!("Order {} is now {}", order.order_number, order.status);
        self.send(&order.email, &subject, &status_html(order)).await;
    }

    async fn send(&self, to: &str, subject: &str, html: &str) {
        let Some(transport) = &self.transport else {
            return;
        };

        let message = match build_message(&self.from, to, subject, html) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(to, error = %e, "Failed to build email");
                return;
            }
        };

        match transport.send(message).await {
            Ok(_) => tracing::info!(to, subject, "Email sent"),
            Err(e) => tracing::error!(to, subject, error = %e, "Email delivery failed"),
        }
    }
}

fn build_message(from: &str, to: &str, subject: &str, html: &str) -> anyhow::Result<Message> {
    let message = Message::builder()
        .from(from.parse::<Mailbox>()?)
        .to(to.parse::<Mailbox>()?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html.to_string())?;
    Ok(message)
}

/// Make a stored image path absolute against the public site URL
fn absolute_image_url(site_url: &str, image: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        image.to_string()
    } else if image.starts_with('/') {
        format!("{site_url}{image}")
    } else {
        format!("{site_url}/{image}")
    }
}

fn order_html(order: &Order, site_url: &str) -> String {
    let mut rows = String::new();
    for item in &order.items {
        let image = item
            .image
            .as_deref()
            .map(|img| {
                format!(
                    "<img src=\"{}\" width=\"64\" alt=\"\"/>",
                    absolute_image_url(site_url, img)
                )
            })
            .unwrap_or_default();
        rows.push_str(&format!(
            "<tr><td>{image}</td><td>{name}</td><td>{size}</td><td>{qty}</td><td>{price:.2}</td></tr>",
            name = item.name,
            size = item.size.as_deref().unwrap_or("-"),
            qty = item.quantity,
            price = item.price,
        ));
    }

    format!(
        "<h2>Order {number}</h2>\
         <p>{first} {last} &lt;{email}&gt;, {phone}</p>\
         <p>{address}, {city}{country}</p>\
         <table border=\"1\" cellpadding=\"6\" cellspacing=\"0\">\
         <tr><th></th><th>Product</th><th>Size</th><th>Qty</th><th>Price</th></tr>\
         {rows}\
         </table>\
         <p>Shipping: {fee:.2}</p>\
         <h3>Total: {total:.2}</h3>",
        number = order.order_number,
        first = order.first_name,
        last = order.last_name,
        email = order.email,
        phone = order.phone,
        address = order.address,
        city = order
            .city
            .as_deref()
            .map(|c| format!("{c}, "))
            .unwrap_or_default(),
        country = order.country,
        rows = rows,
        fee = order.shipping_fee,
        total = order.total,
    )
}

fn status_html(order: &Order) -> String {
    format!(
        "<h2>Order {number}</h2>\
         <p>Hi {first}, your order status is now <strong>{status}</strong>.</p>",
        number = order.order_number,
        first = order.first_name,
        status = order.status,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_image_url() {
        assert_eq!(
            absolute_image_url("https://shop.example", "/img/a.jpg"),
            "https://shop.example/img/a.jpg"
        );
        assert_eq!(
            absolute_image_url("https://shop.example", "img/a.jpg"),
            "https://shop.example/img/a.jpg"
        );
        assert_eq!(
            absolute_image_url("https://shop.example", "https://cdn.example/a.jpg"),
            "https://cdn.example/a.jpg"
        );
    }
}
