use log::error;
use minijinja::{context, Environment};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::form::FormSnapshot;
use crate::models::PredictionResult;

const PAGE_TEMPLATE: &str = "index.html";

// The `.html` name turns on HTML auto-escaping for every interpolated value.
static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    if let Err(e) = env.add_template(PAGE_TEMPLATE, include_str!("../templates/index.html")) {
        error!("Invalid page template: {}", e);
    }
    env
});

#[derive(Serialize)]
struct FieldView {
    key: &'static str,
    label: &'static str,
    value: String,
}

#[derive(Serialize)]
struct MetricView {
    name: String,
    value: String,
}

pub fn render_page(snapshot: &FormSnapshot) -> Result<String, minijinja::Error> {
    let fields: Vec<FieldView> = snapshot
        .inputs
        .entries()
        .map(|(key, value)| FieldView {
            key: key.as_str(),
            label: key.label(),
            value: value.to_string(),
        })
        .collect();

    let (metrics, insights): (Vec<MetricView>, Vec<String>) = match &snapshot.result {
        Some(result) => (
            result
                .metrics
                .iter()
                .map(|(name, value)| MetricView {
                    name: name.clone(),
                    value: PredictionResult::format_value(*value),
                })
                .collect(),
            result
                .insights()
                .sentences()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    TEMPLATES.get_template(PAGE_TEMPLATE)?.render(context!(
        fields => fields,
        has_result => snapshot.result.is_some(),
        metrics => metrics,
        insights => insights,
        error => snapshot.error.as_deref()
    ))
}
