// ============================================================
// Layer 5 — HTML Fragments
// ============================================================
// Question and feedback bodies are HTML wrapped in CDATA. Images
// become a centered <div><img></div>; tables become inline-styled
// <table>s, which survive Moodle's HTML cleaning.

use crate::domain::block::TableData;

/// Escape text placed in a plain XML element such as <name><text>.
pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Escape text placed in HTML content or a quoted attribute.
/// Wrap HTML in a CDATA section. A literal "]]>" would end the
/// section early, so it is split across two sections.
pub fn cdata(html: &str) -> String {
    format!("<![CDATA[{}]]>", html.replace("]]>", "]]]]><![CDATA[>"))
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Centered image block; empty when there is no source.
pub fn img_html(src: &str, alt: &str) -> String {
    if src.trim().is_empty() {
        return String::new();
    }
    format!(
        r#"<div style="text-align:center;margin:8px 0"><img src="{}" alt="{}"></div>"#,
        html_escape(src),
        html_escape(alt)
    )
}

pub fn table_html(table: &TableData) -> String {
    let mut out = String::new();
    out.push_str(r#"<div style="overflow-x:auto;margin:8px 0;">"#);
    out.push_str(
        r#"<table style="border-collapse:collapse;width:100%;max-width:720px;margin:auto;" border="1" cellpadding="6">"#,
    );

    if !table.headers.is_empty() {
        out.push_str("<thead><tr>");
        for h in &table.headers {
            out.push_str("<th style='text-align:center;font-weight:600;background:#f5f5f5'>");
            out.push_str(&html_escape(h));
            out.push_str("</th>");
        }
        out.push_str("</tr></thead>");
    }

    if !table.rows.is_empty() {
        out.push_str("<tbody>");
        for row in &table.rows {
            out.push_str("<tr>");
            for cell in row {
                out.push_str("<td style='text-align:center'>");
                out.push_str(&html_escape(cell));
                out.push_str("</td>");
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody>");
    }

    out.push_str("</table></div>");
    out
}

/// All tables of a part, concatenated.
pub fn tables_html(tables: &[TableData]) -> String {
    tables.iter().map(table_html).collect()
}
