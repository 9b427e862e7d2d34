use super::{escape_html, layout};
use chrono::NaiveDate;
use kernel::model::{
    event::{Event, EventDetails},
    id::EventId,
    registration::RegistrationOutcome,
};

pub fn render_event_list(events: &[Event]) -> String {
    let mut body = String::from("<h1>Events</h1>\n");
    if events.is_empty() {
        body.push_str("<p>No upcoming events.</p>\n");
    } else {
        body.push_str("<ul class=\"event-list\">\n");
        for event in events {
            body.push_str(&format!(
                "<li><a href=\"/events/{}\">{}</a></li>\n",
                event.event_id,
                escape_html(&event.title)
            ));
        }
        body.push_str("</ul>\n");
    }
    layout("Events", &body)
}

pub fn render_event_page(
    event: &Event,
    details: &EventDetails,
    registered_count: i64,
    today: NaiveDate,
    nonce: &str,
    flash: Option<RegistrationOutcome>,
) -> String {
    let content = append_event_details(
        &event.body,
        event.event_id,
        details,
        registered_count,
        today,
        nonce,
    );
    let banner = flash.map(outcome_notice).unwrap_or_default();
    let body = format!("<h1>{}</h1>\n{}{}", escape_html(&event.title), banner, content);
    layout(&event.title, &body)
}

// 本文の後ろにイベント詳細ブロックと登録フォーム（または締切・満席の案内）を
// 追記する。メタデータがひとつもなければ詳細ブロック自体を出さない
pub fn append_event_details(
    body: &str,
    event_id: EventId,
    details: &EventDetails,
    registered_count: i64,
    today: NaiveDate,
    nonce: &str,
) -> String {
    let mut out = String::from(body);

    if !details.is_empty() {
        out.push_str("\n<div class=\"event-details\">\n<h2>Event Details</h2>\n<ul>\n");
        if let Some(date) = details.date {
            out.push_str(&format!("<li>Date: {}</li>\n", date.format("%Y-%m-%d")));
        }
        if let Some(time) = &details.time {
            out.push_str(&format!("<li>Time: {}</li>\n", escape_html(time)));
        }
        if let Some(location) = &details.location {
            out.push_str(&format!("<li>Location: {}</li>\n", escape_html(location)));
        }
        if let Some(capacity) = details.capacity {
            let remaining = details.remaining_seats(registered_count).unwrap_or(0);
            out.push_str(&format!(
                "<li>Capacity: {} ({} seats remaining)</li>\n",
                capacity, remaining
            ));
        }
        out.push_str("</ul>\n</div>\n");
    }

    // 開催日を過ぎていれば締切。開催前でも満席ならフォームは出さない
    if details.is_past(today) {
        out.push_str("<p class=\"event-closed\">This event has already taken place.</p>\n");
    } else if details.is_full(registered_count) {
        out.push_str("<p class=\"event-full\">This event is fully booked.</p>\n");
    } else {
        out.push_str(&registration_form(event_id, nonce));
    }

    out
}

fn registration_form(event_id: EventId, nonce: &str) -> String {
    format!(
        concat!(
            "<form class=\"event-registration\" method=\"post\" action=\"/events/register\">\n",
            "<input type=\"hidden\" name=\"action\" value=\"en_register_event\" />\n",
            "<input type=\"hidden\" name=\"event_id\" value=\"{}\" />\n",
            "<input type=\"hidden\" name=\"en_registration_nonce\" value=\"{}\" />\n",
            "<p><label for=\"en_user_name\">Name</label> ",
            "<input type=\"text\" id=\"en_user_name\" name=\"en_user_name\" required /></p>\n",
            "<p><label for=\"en_user_email\">Email</label> ",
            "<input type=\"email\" id=\"en_user_email\" name=\"en_user_email\" required /></p>\n",
            "<p><button type=\"submit\">Register</button></p>\n",
            "</form>\n"
        ),
        event_id,
        escape_html(nonce)
    )
}

fn outcome_notice(outcome: RegistrationOutcome) -> String {
    let message = match outcome {
        RegistrationOutcome::Success => "Your registration has been received.",
        RegistrationOutcome::Duplicate => "You are already registered for this event.",
        RegistrationOutcome::Full => "This event is fully booked.",
        RegistrationOutcome::Error => "Registration failed. Please try again later.",
    };
    format!("<p class=\"notice notice-{}\">{}</p>\n", outcome, message)
}
