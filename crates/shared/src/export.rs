use anyhow::Result;

use crate::models::NewsletterDraft;

/// Mail clients truncate or reject very long deep links; refuse past this.
pub const MAX_MAILTO_LEN: usize = 2000;

/// Render the draft as plain text for clipboard-style copying.
pub fn to_plain_text(draft: &NewsletterDraft) -> String {
    let links = draft
        .curated_links
        .iter()
        .map(|link| format!("{}\n{}\n{}", link.title, link.summary, link.url))
        .collect::<Vec<_>>()
        .join("\n\n");

    let trends = draft
        .trends_to_watch
        .iter()
        .map(|trend| format!("{}\n{}\n{}", trend.title, trend.explainer, trend.link))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Subject: {}\n\n{}\n\nCURATED LINKS\n\n{}\n\nTRENDS TO WATCH\n\n{}",
        draft.subject, draft.introduction, links, trends
    )
}

/// Render the draft as inline-styled HTML suitable for a mail body.
pub fn to_html(draft: &NewsletterDraft) -> String {
    let body_style = "font-family: -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, \
                      Helvetica, Arial, sans-serif; color: #1e293b; line-height: 1.6;";
    let h2_style = "font-size: 20px; font-weight: 600; margin-top: 24px; margin-bottom: 16px; \
                    border-bottom: 1px solid #e2e8f0; padding-bottom: 8px;";
    let h3_style = "font-size: 18px; font-weight: 600; margin-bottom: 4px; margin-top: 0;";
    let p_style = "margin-top: 0; margin-bottom: 16px;";
    let a_style = "color: #4f46e5; text-decoration: none;";
    let block_style = "margin-bottom: 24px;";

    let mut html = format!("<div style=\"{}\">", body_style);

    html.push_str(&format!(
        "<p style=\"{}\">{}</p>",
        p_style,
        escape_html(&draft.introduction).replace('\n', "<br>")
    ));

    html.push_str(&format!("<h2 style=\"{}\">Curated Links</h2>", h2_style));
    for link in &draft.curated_links {
        html.push_str(&format!("<div style=\"{}\">", block_style));
        html.push_str(&format!(
            "<h3 style=\"{}\">{}</h3>",
            h3_style,
            escape_html(&link.title)
        ));
        html.push_str(&format!(
            "<p style=\"{}\">{}</p>",
            p_style,
            escape_html(&link.summary)
        ));
        html.push_str(&format!(
            "<a href=\"{}\" style=\"{}\">{}</a>",
            link.url,
            a_style,
            escape_html(&link.url)
        ));
        html.push_str("</div>");
    }

    html.push_str(&format!("<h2 style=\"{}\">Trends to Watch</h2>", h2_style));
    for trend in &draft.trends_to_watch {
        html.push_str(&format!("<div style=\"{}\">", block_style));
        html.push_str(&format!(
            "<h3 style=\"{}\">{}</h3>",
            h3_style,
            escape_html(&trend.title)
        ));
        html.push_str(&format!(
            "<p style=\"{}\">{}</p>",
            p_style,
            escape_html(&trend.explainer)
        ));
        html.push_str(&format!(
            "<a href=\"{}\" style=\"{}\">{}</a>",
            trend.link,
            a_style,
            escape_html(&trend.link)
        ));
        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}

/// Build a mailto deep link carrying the HTML rendering as the body. Refused
/// when the result exceeds [`MAX_MAILTO_LEN`]; the caller should fall back to
/// the plain-text copy.
pub fn to_mailto(draft: &NewsletterDraft) -> Result<String> {
    let subject = urlencoding::encode(&draft.subject).into_owned();
    let body = urlencoding::encode(&to_html(draft)).into_owned();

    let mailto = format!("mailto:?subject={}&body={}", subject, body);

    if mailto.len() > MAX_MAILTO_LEN {
        anyhow::bail!(
            "The newsletter is too long to send directly ({} characters, limit {}). \
             Please use the plain-text export and paste it into your email client manually.",
            mailto.len(),
            MAX_MAILTO_LEN
        );
    }

    Ok(mailto)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
