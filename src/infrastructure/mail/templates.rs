use ammonia::clean_text;

use crate::{entities::contact::NewContactForm, mail::OutgoingEmail};

pub const ADMIN_NOTIFICATION_SUBJECT: &str = "New Contact Form Submission";
pub const SUBMITTER_CONFIRMATION_SUBJECT: &str = "Thank you for contacting us!";

/// Notification for the site owner. All user text is escaped.
pub fn admin_notification(admin_email: &str, form: &NewContactForm) -> OutgoingEmail {
    let phone = form
        .phone
        .as_deref()
        .map(clean_text)
        .unwrap_or_else(|| "Not provided".to_string());

    let html = format!(
        "<h2>New Contact Form Submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Phone:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>",
        clean_text(&form.name),
        clean_text(&form.email),
        phone,
        clean_text(&form.message),
    );

    OutgoingEmail {
        to: admin_email.to_string(),
        subject: ADMIN_NOTIFICATION_SUBJECT.to_string(),
        html,
    }
}

pub fn submitter_confirmation(form: &NewContactForm) -> OutgoingEmail {
    let html = format!(
        "<h2>Thank you for contacting us, {}!</h2>\
         <p>We have received your message and will get back to you as soon as possible.</p>\
         <p>Here's a copy of your message:</p>\
         <p>{}</p>\
         <p>Best regards,<br>Portfolio</p>",
        clean_text(&form.name),
        clean_text(&form.message),
    );

    OutgoingEmail {
        to: form.email.clone(),
        subject: SUBMITTER_CONFIRMATION_SUBJECT.to_string(),
        html,
    }
}
