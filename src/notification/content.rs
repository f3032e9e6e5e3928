use chrono::{DateTime, Utc};

use crate::client::Email;

/// Render the expiration warning for one subscription.
///
/// The dispatcher only supplies the inputs (name, days remaining, end date)
/// and ships the result as an opaque subject/body pair.
pub fn expiration_warning(service_name: &str, days_left: i64, end_date: DateTime<Utc>) -> Email {
    let subject = match days_left {
        0 => format!("Your {} subscription expires today!", service_name),
        1 => format!("Your {} subscription expires tomorrow", service_name),
        n => format!("Your {} subscription expires in {} days", service_name, n),
    };

    let end_date = end_date.format("%B %-d, %Y");

    let text_body = format!(
        "Your {} subscription expires on {} ({}).\n\n\
         Renew it before then to avoid any interruption.\n\n\
         You are receiving this because expiration reminders are enabled \
         for this subscription.",
        service_name,
        end_date,
        remaining(days_left),
    );

    let html_body = format!(
        "<h2>Subscription expiring soon</h2>\
         <p>Your <strong>{}</strong> subscription expires on \
         <strong>{}</strong> ({}).</p>\
         <p>Renew it before then to avoid any interruption.</p>\
         <p style=\"color:#666;font-size:12px\">You are receiving this because \
         expiration reminders are enabled for this subscription.</p>",
        service_name, end_date, remaining(days_left),
    );

    Email {
        subject,
        html_body,
        text_body,
    }
}

fn remaining(days_left: i64) -> String {
    match days_left {
        0 => "today".into(),
        1 => "1 day left".into(),
        n => format!("{} days left", n),
    }
}
