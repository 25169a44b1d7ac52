//! HTML rendering of the single page.

use std::fmt::Write;

use serde::Serialize;

use crate::catalog::{field_name, FeatureSpec, FEATURES, SAMPLE_DATA};
use crate::dispatch::{Diagnosis, Outcome};
use crate::registry::ModelRegistry;

/// Everything the page shows for one response.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub features: &'static [FeatureSpec],
    pub models: Vec<String>,
    pub sample_data: Option<&'static [f64]>,
    pub error: Option<String>,
    pub values: Option<Vec<f64>>,
    pub selected_model: Option<String>,
    pub classification: Option<Diagnosis>,
}

impl PageContext {
    fn base(registry: &ModelRegistry) -> Self {
        Self {
            features: &FEATURES,
            models: registry.names().into_iter().map(String::from).collect(),
            sample_data: None,
            error: None,
            values: None,
            selected_model: None,
            classification: None,
        }
    }

    /// The landing page, pre-filled with sample measurements.
    pub fn home(registry: &ModelRegistry) -> Self {
        Self {
            sample_data: Some(&SAMPLE_DATA),
            ..Self::base(registry)
        }
    }

    pub fn from_outcome(registry: &ModelRegistry, outcome: Outcome) -> Self {
        match outcome {
            Ok(classification) => Self {
                values: Some(classification.values),
                selected_model: Some(classification.model),
                classification: Some(classification.diagnosis),
                ..Self::base(registry)
            },
            Err(err) => Self {
                error: Some(err.to_string()),
                ..Self::base(registry)
            },
        }
    }

    /// Value shown in the input for feature `index`.
    fn input_value(&self, index: usize) -> Option<f64> {
        self.values
            .as_deref()
            .or(self.sample_data)
            .and_then(|values| values.get(index).copied())
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;padding:0 1em}\
.grid{display:grid;grid-template-columns:repeat(3,1fr);gap:.75em}\
label{display:block;font-weight:bold}small{color:#666}\
input{width:100%}.error{color:#b00020}.result{font-size:1.4em}\
.Malignant{color:#b00020}.Benign{color:#1b5e20}";

/// Renders the full page. Writing to a `String` cannot fail, so results of `write!` are ignored.
pub fn render(ctx: &PageContext) -> String {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Breast Tumor Classification</title>\n");
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n<h1>Breast Tumor Classification</h1>\n");

    if let Some(error) = &ctx.error {
        let _ = writeln!(html, "<p class=\"error\" role=\"alert\">{}</p>", escape_html(error));
    }
    if let (Some(diagnosis), Some(model)) = (&ctx.classification, &ctx.selected_model) {
        let _ = writeln!(
            html,
            "<p class=\"result\">{} predicts: <strong class=\"{}\">{}</strong></p>",
            escape_html(model),
            diagnosis.as_str(),
            diagnosis.as_str()
        );
    }

    html.push_str("<form method=\"post\" action=\"/classify\">\n");
    html.push_str("<label for=\"model\">Model</label>\n<select id=\"model\" name=\"model\">\n");
    for model in &ctx.models {
        let selected = if ctx.selected_model.as_deref() == Some(model.as_str()) { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape_html(model),
            selected
        );
    }
    html.push_str("</select>\n<div class=\"grid\">\n");

    for (i, feature) in ctx.features.iter().enumerate() {
        let field = field_name(i);
        let value = ctx.input_value(i).map(|v| v.to_string()).unwrap_or_default();
        let _ = writeln!(
            html,
            "<div><label for=\"{field}\">{name}</label><small>{desc}</small>\
             <input type=\"text\" inputmode=\"decimal\" id=\"{field}\" name=\"{field}\" value=\"{value}\" required></div>",
            field = field,
            name = escape_html(feature.name),
            desc = escape_html(feature.description),
            value = escape_html(&value),
        );
    }

    html.push_str("</div>\n<p><button type=\"submit\">Classify</button></p>\n</form>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::catalog::FEATURE_COUNT;
    use crate::classifier::LinearSvc;
    use crate::dispatch::{Classification, ClassifyError};

    fn registry() -> ModelRegistry {
        ModelRegistry::builder()
            .add_model("SVC (Linear)", Arc::new(LinearSvc::new(vec![1.0; FEATURE_COUNT], 0.0, [0, 1]).unwrap()))
            .and_then(|b| b.add_model("KNN <fast>", Arc::new(LinearSvc::new(vec![1.0; FEATURE_COUNT], 0.0, [0, 1]).unwrap())))
            .and_then(|b| b.build())
            .unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#x27;");
        assert_eq!(escape_html("concave points_mean"), "concave points_mean");
    }

    #[test]
    fn test_home_is_prefilled() {
        let html = render(&PageContext::home(&registry()));
        assert!(html.contains("name=\"feature_0\" value=\"17.99\""));
        assert!(html.contains("name=\"feature_29\" value=\"0.1189\""));
        assert!(html.contains("<option value=\"SVC (Linear)\">SVC (Linear)</option>"));
        assert!(html.contains("KNN &lt;fast&gt;"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_error_page_has_no_values() {
        let ctx = PageContext::from_outcome(&registry(), Err(ClassifyError::InvalidModelSelection));
        assert_eq!(ctx.error.as_deref(), Some("Invalid model selection"));
        assert!(ctx.values.is_none());
        let html = render(&ctx);
        assert!(html.contains("Invalid model selection"));
        assert!(html.contains("name=\"feature_0\" value=\"\""));
    }

    #[test]
    fn test_result_page() {
        let outcome = Ok(Classification {
            model: "SVC (Linear)".into(),
            values: vec![2.0; FEATURE_COUNT],
            diagnosis: Diagnosis::Malignant,
        });
        let html = render(&PageContext::from_outcome(&registry(), outcome));
        assert!(html.contains("<strong class=\"Malignant\">Malignant</strong>"));
        assert!(html.contains("<option value=\"SVC (Linear)\" selected>"));
        assert!(html.contains("name=\"feature_7\" value=\"2\""));
    }
}
