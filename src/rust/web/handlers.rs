use std::collections::HashMap;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::response::Html;
use axum::Json;

use super::page::{render, PageContext};
use super::AppState;
use crate::catalog::{field_name, FEATURE_COUNT};
use crate::classifier::ClassifierInfo;

pub(crate) async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render(&PageContext::home(state.dispatcher.registry())))
}

/// Always answers with the page; validation failures are rendered, not raised.
///
/// A body that is not a urlencoded form is treated as an empty submission.
pub(crate) async fn classify(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Html<String> {
    let pairs = match form {
        Ok(Form(pairs)) => pairs,
        Err(e) => {
            log::warn!("Unreadable form submission: {}", e);
            Vec::new()
        }
    };
    let fields = first_values(&pairs);
    let model = fields.get("model").copied();
    let raw: Vec<Option<&str>> = (0..FEATURE_COUNT)
        .map(|i| fields.get(field_name(i).as_str()).copied())
        .collect();

    let outcome = state.dispatcher.classify(model, &raw);
    match &outcome {
        Ok(c) => log::info!("{} -> {}", c.model, c.diagnosis),
        Err(e) => log::warn!("Rejected classification request: {}", e),
    }
    Html(render(&PageContext::from_outcome(state.dispatcher.registry(), outcome)))
}

/// Field lookup where a repeated key keeps its first value.
fn first_values(pairs: &[(String, String)]) -> HashMap<&str, &str> {
    let mut fields = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        fields.entry(key.as_str()).or_insert(value.as_str());
    }
    fields
}

pub(crate) async fn models(State(state): State<AppState>) -> Json<Vec<ClassifierInfo>> {
    Json(state.dispatcher.registry().info())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::classifier::LinearSvc;
    use crate::dispatch::Dispatcher;
    use crate::registry::ModelRegistry;
    use crate::scaler::RobustScaler;

    fn state() -> AppState {
        let registry = ModelRegistry::builder()
            .add_model("SVC (Linear)", Arc::new(LinearSvc::new(vec![1.0; FEATURE_COUNT], -1.0, [0, 1]).unwrap()))
            .and_then(|b| b.build())
            .unwrap();
        AppState {
            dispatcher: Arc::new(Dispatcher::new(
                Arc::new(registry),
                Arc::new(RobustScaler::identity(FEATURE_COUNT)),
            )),
        }
    }

    fn form(model: &str, value: &str) -> Result<Form<Vec<(String, String)>>, FormRejection> {
        Ok(Form(pairs(model, value)))
    }

    fn pairs(model: &str, value: &str) -> Vec<(String, String)> {
        let mut pairs = vec![("model".to_string(), model.to_string())];
        pairs.extend((0..FEATURE_COUNT).map(|i| (field_name(i), value.to_string())));
        pairs
    }

    #[test]
    fn test_index_lists_models() {
        let Html(body) = tokio_test::block_on(index(State(state())));
        assert!(body.contains("SVC (Linear)"));
        assert!(body.contains("radius_mean"));
    }

    #[tokio::test]
    async fn test_classify_renders_result() {
        let Html(body) = classify(State(state()), form("SVC (Linear)", "1")).await;
        assert!(body.contains(">Malignant</strong>"));

        let Html(body) = classify(State(state()), form("SVC (Linear)", "0")).await;
        assert!(body.contains(">Benign</strong>"));
    }

    #[tokio::test]
    async fn test_classify_renders_error() {
        let Html(body) = classify(State(state()), form("bogus", "1")).await;
        assert!(body.contains("Invalid model selection"));

        let mut missing = pairs("SVC (Linear)", "1");
        missing.retain(|(key, _)| key != "feature_2");
        let Html(body) = classify(State(state()), Ok(Form(missing))).await;
        assert!(body.contains("Missing value for perimeter_mean"));
    }

    #[tokio::test]
    async fn test_repeated_fields_keep_first_value() {
        let mut repeated = pairs("SVC (Linear)", "1");
        repeated.push(("model".into(), "bogus".into()));
        repeated.push(("feature_4".into(), "abc".into()));
        let Html(body) = classify(State(state()), Ok(Form(repeated))).await;
        assert!(body.contains(">Malignant</strong>"));
    }

    #[test]
    fn test_first_values() {
        let pairs = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "3".to_string()),
        ];
        let fields = first_values(&pairs);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("a"), Some(&"1"));
        assert_eq!(fields.get("b"), Some(&"2"));
    }

    #[tokio::test]
    async fn test_models_listing() {
        let Json(info) = models(State(state())).await;
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].kind, "linear_svc");
    }
}
