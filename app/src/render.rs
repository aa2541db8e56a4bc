//! Render the guestbook page as HTML.
use crate::guestbook::Entries;
use crate::guestbook::article::Article;
use jiff::Timestamp;
use jiff::tz::TimeZone;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Render the whole guestbook page: a submission form followed by the list of entries.
///
/// Article timestamps are displayed in `time_zone`.
pub fn page(entries: &Entries, time_zone: &TimeZone) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<title>Guestbook</title>
</head>
<body>
<h1>Guestbook</h1>
<form method=\"get\" action=\"/\">
<input type=\"text\" name=\"title\" placeholder=\"Title\">
<input type=\"text\" name=\"content\" placeholder=\"Content\">
<button type=\"submit\">Submit</button>
</form>
<ul>
",
    );
    match entries {
        Entries::Articles(articles) => {
            for article in articles {
                html.push_str(&article_item(article, time_zone));
                html.push('\n');
            }
        }
        Entries::Comments(comments) => {
            for comment in comments {
                html.push_str(&comment_item(comment));
                html.push('\n');
            }
        }
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

fn article_item(article: &Article, time_zone: &TimeZone) -> String {
    format!(
        "<li><span>{}</span>: 「<span>{}</span>」<span>{}</span></li>",
        format_timestamp(article.timestamp, time_zone),
        escape(&article.title),
        escape(&article.content),
    )
}

fn comment_item(comment: &str) -> String {
    format!("<li>{}</li>", escape(comment))
}

/// Format epoch milliseconds as a local date-time in `time_zone`.
///
/// Timestamps outside of the supported range are rendered as the raw number.
pub fn format_timestamp(millis: i64, time_zone: &TimeZone) -> String {
    match Timestamp::from_millisecond(millis) {
        Ok(ts) => ts
            .to_zoned(time_zone.clone())
            .strftime(TIMESTAMP_FORMAT)
            .to_string(),
        Err(_) => millis.to_string(),
    }
}

/// Escape the characters with a special meaning in HTML text and attribute values.
pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}
