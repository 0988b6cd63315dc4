use std::fmt::Write;

use crate::signup::dto::SignupForm;
use crate::signup::record::DEGREE_OPTIONS;
use crate::signup::theme::Theme;

/// Status banners shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Info(String),
    Success(String),
}

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

fn stylesheet(theme: Theme) -> String {
    let p = theme.palette();
    let background = p
        .gradient
        .map(|g| format!("background: {};", g))
        .unwrap_or_else(|| format!("background-color: {};", p.background));
    format!(
        r#"body {{ {background} color: {text}; font-family: Helvetica, sans-serif; margin: 0; }}
.container {{ max-width: 900px; margin: 0 auto; padding: 120px 1rem 2rem; }}
h1 {{ font-size: 3.5rem; margin-bottom: 0; line-height: 1.1; }}
h1 span {{ color: {accent}; }}
h3 {{ font-size: 1.8rem; font-weight: 300; margin-top: 5px; }}
.columns {{ display: flex; gap: 2rem; flex-wrap: wrap; }}
.columns > div {{ flex: 1; min-width: 260px; }}
label {{ display: block; margin-top: .8rem; }}
input[type=text] {{ width: 100%; padding: .5rem; color: #000; background: #fff; border: 0; border-radius: 4px; }}
.radio label {{ margin-top: .3rem; }}
button {{ background-color: {button}; color: #fff; border: 2px solid {button}; border-radius: 5px; height: 3em; width: 100%; font-weight: bold; font-size: 1.2rem; margin-top: 10px; }}
button:hover {{ background-color: {hover}; border-color: {hover}; color: {bg}; }}
.notice {{ padding: .75rem 1rem; border-radius: 5px; margin: .5rem 0; }}
.error {{ background: #ffdddd; color: #7a0000; }}
.info {{ background: #ddeeff; color: #003366; }}
.success {{ background: #ddffdd; color: #004400; }}"#,
        background = background,
        text = p.text,
        accent = p.accent,
        button = p.button,
        hover = p.button_hover,
        bg = p.background,
    )
}

fn text_input(out: &mut String, name: &str, label: &str, value: &str) {
    let _ = write!(
        out,
        r#"<label for="{name}">{label}</label><input type="text" id="{name}" name="{name}" value="{value}">"#,
        name = name,
        label = escape(label),
        value = escape(value),
    );
}

/// Render the whole page. `form` holds the values to pre-fill; pass a
/// default form to clear every input.
pub fn render(theme: Theme, form: &SignupForm, notices: &[Notice]) -> String {
    let mut body = String::new();

    for notice in notices {
        let (class, msg) = match notice {
            Notice::Error(m) => ("error", m),
            Notice::Info(m) => ("info", m),
            Notice::Success(m) => ("success", m),
        };
        let _ = write!(body, r#"<div class="notice {}">{}</div>"#, class, escape(msg));
    }

    body.push_str(r#"<form method="post" action="/"><div class="columns"><div><h2>Details</h2>"#);
    text_input(&mut body, "full_name", "Full Name", &form.full_name);
    text_input(&mut body, "student_number", "Student Number (8 digits)", &form.student_number);
    text_input(&mut body, "social_handle", "Facebook Handle", &form.social_handle);
    body.push_str(r#"</div><div><h2>Degree</h2><div class="radio">"#);

    let selected = if DEGREE_OPTIONS.contains(&form.degree_choice.as_str()) {
        form.degree_choice.as_str()
    } else {
        DEGREE_OPTIONS[0]
    };
    for option in DEGREE_OPTIONS {
        let checked = if option == selected { " checked" } else { "" };
        let _ = write!(
            body,
            r#"<label><input type="radio" name="degree_choice" value="{v}"{checked}> {v}</label>"#,
            v = escape(option),
            checked = checked,
        );
    }
    body.push_str("</div>");
    text_input(&mut body, "other_degree_text", "If 'Other', specify here:", &form.other_degree_text);
    body.push_str(r#"</div></div><button type="submit">Submit Application &#10148;</button></form>"#);

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>UWA Mining Club</title>
<style>{css}</style>
</head>
<body>
<div class="container">
<h1>Unearth Your <span>Future.</span></h1>
<h3>Join the UWA Mining Club Today</h3>
{body}
</div>
</body>
</html>
"#,
        css = stylesheet(theme),
        body = body,
    )
}

#[cfg(test)]
mod page_tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b>"O'Neil" & co</b>"#), "&lt;b&gt;&quot;O&#39;Neil&quot; &amp; co&lt;/b&gt;");
    }

    #[test]
    fn prefills_values_and_selects_degree() {
        let form = SignupForm {
            full_name: "Jane <Doe>".into(),
            degree_choice: "Geology".into(),
            ..Default::default()
        };
        let html = render(Theme::Navy, &form, &[Notice::Error("Missing Facebook handle.".into())]);
        assert!(html.contains(r#"value="Jane &lt;Doe&gt;""#));
        assert!(html.contains(r#"value="Geology" checked"#));
        assert!(html.contains("Missing Facebook handle."));
        assert!(html.contains("#001f3f"));
    }

    #[test]
    fn first_degree_preselected_by_default() {
        let html = render(Theme::Gold, &SignupForm::default(), &[]);
        assert!(html.contains(r#"value="Chemical Engineering" checked"#));
        assert!(html.contains("linear-gradient"));
    }
}
