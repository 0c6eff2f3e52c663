use chrono::{DateTime, TimeZone};

use crate::article::Article;

/// Default first line of every notification.
pub const DEFAULT_HEADER: &str = "Indodax Academy News Update:";

/// Renders the notification text sent for a new article.
///
/// Layout is a header line, a blank line, then the title, link, and the
/// local time the decision was made (`dd/mm/YYYY HH:MM:SS TZ`).
#[must_use]
pub fn format_notification<Tz>(header: &str, article: &Article, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{header}\n\n{}\n{}\nUpdated: {}",
        article.title,
        article.link,
        at.format("%d/%m/%Y %H:%M:%S %Z")
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Asia::Jakarta;

    use super::*;

    #[test]
    fn renders_title_link_and_local_time() {
        let article = Article::new(
            "101",
            Some("New Listing Announced".to_string()),
            Some("https://example.com/a/101".to_string()),
        );
        let at = Jakarta.with_ymd_and_hms(2025, 3, 4, 9, 5, 7).unwrap();

        let text = format_notification(DEFAULT_HEADER, &article, &at);

        assert_eq!(
            text,
            "Indodax Academy News Update:\n\nNew Listing Announced\nhttps://example.com/a/101\nUpdated: 04/03/2025 09:05:07 WIB"
        );
    }
}
