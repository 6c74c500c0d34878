//! HTML for the login and prediction pages.

use crate::presenter::ViewModel;
use serde_json::Value;

pub fn login_page(error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default();

    layout(
        "Sign in",
        &format!(
            r#"<h1>Leaf disease detection</h1>
{error}
<form method="post" action="/">
  <label>Username <input type="text" name="username" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Sign in</button>
</form>"#
        ),
    )
}

pub fn predict_page(view: &ViewModel) -> String {
    let message = view
        .message
        .as_deref()
        .map(|m| format!(r#"<p class="message">{}</p>"#, escape(m)))
        .unwrap_or_default();

    let image = view
        .result_image
        .as_deref()
        .filter(|img| !img.is_empty())
        .map(|img| {
            format!(
                r#"<img class="result" alt="Prediction result" src="data:image/jpeg;base64,{}">"#,
                escape(img)
            )
        })
        .unwrap_or_default();

    let details = view
        .disease_details
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(render_details)
        .unwrap_or_default();

    layout(
        "Predict",
        &format!(
            r#"<h1>Upload a leaf image</h1>
<p><a href="/logout">Log out</a></p>
<form method="post" action="/predict" enctype="multipart/form-data">
  <input type="file" name="image" accept="image/*">
  <button type="submit">Predict</button>
</form>
{message}
{image}
{details}"#
        ),
    )
}

pub fn not_found_page() -> String {
    layout(
        "Not found",
        r#"<h1>Page not found</h1>
<p><a href="/predict">Back to prediction</a></p>"#,
    )
}

fn render_details(details: &[Value]) -> String {
    let items: String = details
        .iter()
        .map(|record| format!("<li>{}</li>", render_record(record)))
        .collect();
    format!(r#"<ul class="disease-details">{items}</ul>"#)
}

fn render_record(record: &Value) -> String {
    match record {
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| {
                format!(
                    "<strong>{}</strong>: {}",
                    escape(key),
                    escape(&plain_text(value))
                )
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => escape(&plain_text(other)),
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{}</title></head>
<body>
{body}
</body>
</html>"#,
        escape(title)
    )
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
