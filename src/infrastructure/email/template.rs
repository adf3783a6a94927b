use chrono::{DateTime, Utc};

use crate::entities::{
    contact::{ContactSubmission, SanitizedContact},
    email::{Mailbox, OutboundEmail},
};

/// Builds the notification sent to the site owner for one submission.
pub fn contact_notification(
    mailbox: &Mailbox,
    submission: &ContactSubmission,
    received_at: DateTime<Utc>,
) -> OutboundEmail {
    let sanitized = SanitizedContact::from(submission);

    OutboundEmail {
        from: mailbox.from.clone(),
        to: vec![mailbox.to.clone()],
        subject: subject_line(&submission.name),
        html: render_html(&sanitized, received_at),
    }
}

// Subjects are plain text headers: no escaping, but no control characters either.
fn subject_line(name: &str) -> String {
    let name: String = name.chars().filter(|c| !c.is_control()).collect();
    format!("New Contact Form Submission from {}", name)
}

fn render_html(contact: &SanitizedContact, received_at: DateTime<Utc>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>New Contact Form Submission</title>
  </head>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h2 style="color: #2563eb; border-bottom: 2px solid #2563eb; padding-bottom: 10px;">New Contact Form Submission</h2>
      <p><strong>Name:</strong> {name}</p>
      <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
      <div style="background: #f3f4f6; padding: 15px; border-radius: 8px; margin-top: 15px;">
        <p style="margin-top: 0;"><strong>Message:</strong></p>
        <p>{message}</p>
      </div>
      <p style="color: #6b7280; font-size: 12px; margin-top: 20px;">Received {received}</p>
    </div>
  </body>
</html>
"#,
        name = contact.name,
        email = contact.email,
        message = contact.message_html,
        received = received_at.format("%Y-%m-%d %H:%M UTC"),
    )
}
