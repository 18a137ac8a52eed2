//! Server-side HTML for the dashboard page.

use std::fmt::Write as _;

use crate::{
    charts::{ChartError, DEFAULT_SIZE, render_svg},
    config::AppConfig,
    input::FormState,
    render::RenderModel,
    table::{DATE, PriceTable},
};

const STYLE: &str = "body{font-family:sans-serif;margin:0;display:flex}\
aside{width:260px;padding:16px;background:#f0f2f6;min-height:100vh}\
main{flex:1;padding:16px 32px}\
table{border-collapse:collapse;margin:8px 0}\
td,th{border:1px solid #ddd;padding:2px 8px;text-align:right}\
.ok{background:#d4edda;padding:8px}.err{background:#f8d7da;padding:8px}";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders `` `x` `` spans in a message as `<code>x</code>`, escaping the rest.
fn inline_code(s: &str) -> String {
    s.split('`')
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                format!("<code>{}</code>", escape(part))
            } else {
                escape(part)
            }
        })
        .collect()
}

fn table_html(table: &PriceTable) -> String {
    let mut out = String::from("<table><thead><tr>");
    let _ = write!(out, "<th>{}</th>", escape(DATE));
    for name in table.column_names() {
        let _ = write!(out, "<th>{}</th>", escape(name));
    }
    out.push_str("</tr></thead><tbody>");
    for (date, values) in table.rows() {
        let _ = write!(out, "<tr><td>{date}</td>");
        for v in values {
            match v {
                Some(v) => {
                    let _ = write!(out, "<td>{v:.2}</td>");
                }
                None => out.push_str("<td></td>"),
            }
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

fn sidebar(form: &FormState, messages: &str) -> String {
    let mut options = String::new();
    for t in &form.tickers {
        let selected = if *t == form.ticker { " selected" } else { "" };
        let _ = write!(options, "<option{selected}>{}</option>", escape(t));
    }
    format!(
        r#"<aside><form method="get" action="/">
<label>Selected company<br><select name="ticker">{options}</select></label><br>
<label>Start date<br><input type="date" name="start" value="{start}"></label><br>
<label>End date<br><input type="date" name="end" value="{end}"></label><br>
<button type="submit">Update</button>
</form>{messages}</aside>"#,
        start = escape(&form.start),
        end = escape(&form.end),
    )
}

fn document(app: &AppConfig, aside: &str, main: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
<style>{STYLE}</style></head><body>{aside}<main><h1>{title}</h1><p>{description}</p>{main}</main></body></html>",
        title = escape(&app.title),
        description = escape(&app.description),
    )
}

/// The full dashboard page for a successful render.
pub fn dashboard_page(
    app: &AppConfig,
    form: &FormState,
    model: &RenderModel,
) -> Result<String, ChartError> {
    let messages = format!(
        r#"<div class="ok">{}</div>"#,
        model
            .sidebar
            .iter()
            .map(|line| inline_code(line))
            .collect::<Vec<_>>()
            .join("<br>")
    );

    let mut main = String::new();
    main.push_str("<h3>Dataset Head and Tail</h3>");
    main.push_str(&table_html(&model.head));
    main.push_str(&table_html(&model.tail));
    for chart in &model.charts {
        let _ = write!(main, "<h3>{}</h3>", escape(&chart.title));
        main.push_str(&render_svg(chart, DEFAULT_SIZE)?);
    }
    main.push_str("<h3>Recent data</h3>");
    main.push_str(&table_html(&model.recent));
    let _ = write!(main, "<p>{}</p>", model.download.to_html());

    Ok(document(app, &sidebar(form, &messages), &main))
}

/// The page with the sidebar error and no dashboard content.
pub fn error_page(app: &AppConfig, form: &FormState, message: &str) -> String {
    let messages = format!(r#"<div class="err">Error: {}</div>"#, escape(message));
    document(app, &sidebar(form, &messages), "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormState {
        FormState {
            tickers: vec!["BBRI.JK".into(), "<b>".into()],
            ticker: "BBRI.JK".into(),
            start: "2020-01-01\"><script>".into(),
            end: "2020-12-31".into(),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(inline_code("Start date: `2020-01-01`"), "Start date: <code>2020-01-01</code>");
    }

    #[test]
    fn error_page_keeps_the_form() {
        let page = error_page(
            &AppConfig::default(),
            &form(),
            "End date must fall after start date.",
        );
        assert!(page.contains("Error: End date must fall after start date."));
        assert!(page.contains("<option selected>BBRI.JK</option>"));
        assert!(page.contains("<option>&lt;b&gt;</option>"));
        assert!(!page.contains("<script>"));
        assert!(!page.contains("Dataset Head and Tail"));
    }

    #[test]
    fn tables_leave_missing_cells_empty() {
        let table = PriceTable::new(vec![chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()])
            .with_column("bb_h", vec![None])
            .unwrap()
            .with_column("Close", vec![Some(4100.0)])
            .unwrap();
        let html = table_html(&table);
        assert!(html.contains("<th>Date</th><th>bb_h</th><th>Close</th>"));
        assert!(html.contains("<tr><td>2020-01-02</td><td></td><td>4100.00</td></tr>"));
    }
}
