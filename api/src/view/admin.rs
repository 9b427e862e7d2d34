use super::{escape_html, layout};
use kernel::model::{
    event::{Event, EventDetails},
    registration::Registration,
};

pub fn render_new_event_form(nonce: &str) -> String {
    let body = format!(
        "<h1>Add New Event</h1>\n{}",
        event_form("/admin/events", "", "", &EventDetails::default(), nonce)
    );
    layout("Add New Event", &body)
}

pub fn render_edit_event_form(event: &Event, details: &EventDetails, nonce: &str) -> String {
    let body = format!(
        "<h1>Edit Event</h1>\n{}",
        event_form(
            &format!("/admin/events/{}", event.event_id),
            &event.title,
            &event.body,
            details,
            nonce
        )
    );
    layout("Edit Event", &body)
}

fn event_form(
    action_path: &str,
    title: &str,
    body: &str,
    details: &EventDetails,
    nonce: &str,
) -> String {
    let date = details
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let capacity = details.capacity.map(|c| c.to_string()).unwrap_or_default();
    format!(
        concat!(
            "<form method=\"post\" action=\"{}\">\n",
            "<input type=\"hidden\" name=\"en_event_nonce\" value=\"{}\" />\n",
            "<input type=\"hidden\" name=\"save_kind\" value=\"manual\" />\n",
            "<p><label for=\"title\">Title</label> ",
            "<input type=\"text\" id=\"title\" name=\"title\" value=\"{}\" /></p>\n",
            "<p><label for=\"body\">Body</label> ",
            "<textarea id=\"body\" name=\"body\">{}</textarea></p>\n",
            "<table class=\"form-table\">\n",
            "<tr><th><label for=\"en_event_date\">Event Date</label></th>",
            "<td><input type=\"date\" id=\"en_event_date\" name=\"en_event_date\" value=\"{}\" /></td></tr>\n",
            "<tr><th><label for=\"en_event_time\">Event Time</label></th>",
            "<td><input type=\"time\" id=\"en_event_time\" name=\"en_event_time\" value=\"{}\" /></td></tr>\n",
            "<tr><th><label for=\"en_event_location\">Location</label></th>",
            "<td><input type=\"text\" id=\"en_event_location\" name=\"en_event_location\" value=\"{}\" /></td></tr>\n",
            "<tr><th><label for=\"en_event_capacity\">Capacity</label></th>",
            "<td><input type=\"number\" id=\"en_event_capacity\" name=\"en_event_capacity\" value=\"{}\" /></td></tr>\n",
            "</table>\n",
            "<p><button type=\"submit\">Save Event</button></p>\n",
            "</form>\n"
        ),
        action_path,
        escape_html(nonce),
        escape_html(title),
        escape_html(body),
        date,
        escape_html(details.time.as_deref().unwrap_or("")),
        escape_html(details.location.as_deref().unwrap_or("")),
        capacity
    )
}

// 登録一覧。登録がなければ空のテーブルではなくメッセージを出す
pub fn render_registrations_page(registrations: &[Registration]) -> String {
    let mut body = String::from("<h1>Event Registrations</h1>\n");

    if registrations.is_empty() {
        body.push_str("<p>No registrations found.</p>\n");
        return layout("Event Registrations", &body);
    }

    body.push_str(concat!(
        "<table class=\"registrations\">\n",
        "<thead><tr><th>Event</th><th>Name</th><th>Email</th><th>Registered At</th></tr></thead>\n",
        "<tbody>\n"
    ));
    for registration in registrations {
        let title = registration
            .event
            .title
            .as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "(deleted event)".to_string());
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            title,
            escape_html(&registration.user_name),
            escape_html(&registration.user_email),
            registration.registration_date.format("%Y-%m-%d %H:%M")
        ));
    }
    body.push_str(&format!(
        "</tbody>\n<tfoot><tr><td colspan=\"4\">Total: {} registrations</td></tr></tfoot>\n</table>\n",
        registrations.len()
    ));

    layout("Event Registrations", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use kernel::model::id::{EventId, RegistrationId};
    use kernel::model::registration::RegistrationEvent;

    fn registration(title: Option<&str>, name: &str, email: &str) -> Registration {
        Registration {
            registration_id: RegistrationId::new(1),
            user_name: name.into(),
            user_email: email.into(),
            registration_date: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            event: RegistrationEvent {
                event_id: EventId::new(1),
                title: title.map(String::from),
            },
        }
    }

    #[test]
    fn empty_listing_shows_a_message_instead_of_a_table() {
        let page = render_registrations_page(&[]);
        assert!(page.contains("No registrations found."));
        assert!(!page.contains("<table"));
    }

    #[test]
    fn listing_renders_rows_and_total_footer() {
        let rows = vec![
            registration(Some("Meetup"), "Ann", "ann@x.com"),
            registration(None, "Bob <script>", "bob@x.com"),
        ];
        let page = render_registrations_page(&rows);
        assert!(page.contains("Meetup"));
        assert!(page.contains("(deleted event)"));
        assert!(page.contains("Bob &lt;script&gt;"));
        assert!(page.contains("Total: 2 registrations"));
    }

    #[test]
    fn edit_form_prefills_metadata_values() {
        let event = Event {
            event_id: EventId::new(7),
            title: "Meetup".into(),
            body: "Body".into(),
            created_at: Utc::now(),
        };
        let details = EventDetails::from_raw(
            Some("2030-05-01".into()),
            Some("18:00".into()),
            Some("Hall A".into()),
            Some("30".into()),
        );
        let page = render_edit_event_form(&event, &details, "tok");
        assert!(page.contains("action=\"/admin/events/7\""));
        assert!(page.contains("value=\"2030-05-01\""));
        assert!(page.contains("value=\"18:00\""));
        assert!(page.contains("value=\"Hall A\""));
        assert!(page.contains("value=\"30\""));
        assert!(page.contains("name=\"en_event_nonce\" value=\"tok\""));
    }
}
