//! HTML rendering for the advisor page.
//!
//! Produces a single self-contained document: header copy, the embedded
//! video, the parameter form in a two-column grid, and the result or failure
//! panel for the session's outcome.

use northstar_params::{CategoricalField, FormState, NumericField, PageCopy};
use northstar_pipeline::Label;
use pulldown_cmark::{html, Options, Parser};

use crate::invoker::Prediction;
use crate::session::Outcome;

/// How the page pulls in its stylesheet.
#[derive(Debug, Clone, Copy)]
pub enum Stylesheet<'a> {
    /// Inline `<style>` block.
    Inline(&'a str),
    /// `<link>` to an external file.
    Linked(&'a str),
}

/// Converts a Markdown fragment to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
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

/// Wraps `body` in the document shell.
pub fn render_page(title: &str, body: &str, stylesheet: Stylesheet<'_>) -> String {
    let style = match stylesheet {
        Stylesheet::Inline(css) => format!("<style>\n{}\n</style>", css),
        Stylesheet::Linked(href) => {
            format!(r#"<link rel="stylesheet" href="{}">"#, escape_html(href))
        }
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{style}
</head>
<body>
<main class="advisor">
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        style = style,
        body = body,
    )
}

/// Title, subtitle and description.
pub fn render_header(copy: &PageCopy) -> String {
    format!(
        "<header class=\"advisor-header\">\n<h1>{}</h1>\n<h3>{}</h3>\n\
        <p class=\"description\">{}</p>\n</header>\n",
        escape_html(copy.title),
        escape_html(copy.subtitle),
        escape_html(copy.description),
    )
}

/// The looping, muted video as a data URI.
pub fn render_video(video_base64: &str) -> String {
    format!(
        "<div class=\"video\">\n<video width=\"350\" autoplay loop muted playsinline>\n\
        <source src=\"data:video/mp4;base64,{}\" type=\"video/mp4\">\n</video>\n</div>\n",
        video_base64
    )
}

fn number_attr(value: f64) -> String {
    format!("{}", value)
}

fn render_numeric(field: &NumericField, value: f64) -> String {
    format!(
        r#"<div class="field">
<label for="{id}">{label}</label>
<input type="number" id="{id}"
name="{id}" min="{min}" max="{max}" step="{step}" value="{value}" required>
<small class="caption">{caption}</small>
</div>
"#,
        id = field.id,
        label = escape_html(field.label),
        min = number_attr(field.min),
        max = number_attr(field.max),
        step = number_attr(field.step),
        value = number_attr(value),
        caption = escape_html(field.caption),
    )
}

fn render_select(field: &CategoricalField, selected: &str) -> String {
    let options: String = field
        .options
        .iter()
        .map(|option| {
            let mark = if *option == selected { " selected" } else { "" };
            format!(
                "<option value=\"{v}\"{mark}>{v}</option>\n",
                v = escape_html(option),
                mark = mark
            )
        })
        .collect();
    format!(
        "<div class=\"field\">\n<label for=\"{id}\">{label}</label>\n\
        <select id=\"{id}\" name=\"{id}\">\n{options}</select>\n\
        <small class=\"caption\">{caption}</small>\n</div>\n",
        id = field.id,
        label = escape_html(field.label),
        options = options,
        caption = escape_html(field.caption),
    )
}

/// Both field groups and the trigger button.
pub fn render_form(form: &FormState, copy: &PageCopy) -> String {
    let catalog = form.catalog();
    let mut html = String::from("<form class=\"advisor-form\" method=\"get\">\n");

    html.push_str(&format!(
        "<section class=\"group\">\n<h2>{}</h2>\n<div class=\"grid\">\n",
        escape_html(copy.numeric_heading)
    ));
    for field in &catalog.numeric {
        let value = form.numeric(field.id).unwrap_or(field.default);
        html.push_str(&render_numeric(field, value));
    }
    html.push_str("</div>\n</section>\n");

    html.push_str(&format!(
        "<section class=\"group\">\n<h2>{}</h2>\n<div class=\"grid\">\n",
        escape_html(copy.categorical_heading)
    ));
    for field in &catalog.categorical {
        let selected = form
            .category(field.id)
            .unwrap_or_else(|| field.default_option());
        html.push_str(&render_select(field, selected));
    }
    html.push_str("</div>\n</section>\n");

    html.push_str(&format!(
        "<button type=\"submit\" class=\"predict\">{}</button>\n</form>\n",
        escape_html(copy.trigger_label)
    ));
    html
}

/// The SUCCESS/FAIL badge and the probability line.
pub fn render_result(prediction: &Prediction, precision: usize) -> String {
    let class = match prediction.label {
        Label::Success => "success-badge",
        Label::Fail => "fail-badge",
    };
    let line = markdown_to_html(&format!(
        "**Probability of SUCCESS:** `{}`",
        prediction.probability_text(precision)
    ));
    format!(
        "<section class=\"result\" aria-live=\"polite\">\n<h2>Prediction Result</h2>\n\
        <span class=\"{}\">{}</span>\n{}</section>\n",
        class,
        prediction.label.as_str(),
        line
    )
}

/// The generic error surface for a failed prediction.
pub fn render_failure(message: &str) -> String {
    format!(
        "<section class=\"result failure\" role=\"alert\">\n<h2>Prediction Failed</h2>\n\
        <pre>{}</pre>\n</section>\n",
        escape_html(message)
    )
}

/// The panel for `outcome`, or nothing when there is none.
pub fn render_outcome(outcome: Option<&Outcome>, precision: usize) -> String {
    match outcome {
        Some(Outcome::Predicted(prediction)) => render_result(prediction, precision),
        Some(Outcome::Failed(message)) => render_failure(message),
        None => String::new(),
    }
}
