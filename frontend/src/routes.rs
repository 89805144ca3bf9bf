use std::collections::HashMap;

use actix_files::Files;
use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info};
use serde::Deserialize;

use crate::form::{FormSnapshot, FormState};
use crate::models::{ApiResponse, FieldKey, InputParameters};
use crate::render::render_page;

/// Stylesheet directory, independent of the working directory the binary starts in.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub value: String,
}

async fn index(state: web::Data<FormState>) -> impl Responder {
    match render_page(&state.snapshot()) {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            error!("Page rendering failed: {}", e);
            HttpResponse::InternalServerError().body("Page rendering failed")
        }
    }
}

async fn submit_form(
    state: web::Data<FormState>,
    form: web::Form<HashMap<String, String>>,
) -> impl Responder {
    let mut fields = form.into_inner();
    for key in FieldKey::ALL {
        if let Some(value) = fields.remove(key.as_str()) {
            state.update_field(key, value);
        }
    }
    for name in fields.keys() {
        debug!("Ignoring unknown form field {:?}", name);
    }

    info!("Form submitted");
    state.submit().await;

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

async fn api_state(state: web::Data<FormState>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(state.snapshot()))
}

async fn update_input(
    state: web::Data<FormState>,
    path: web::Path<String>,
    update: web::Json<FieldUpdate>,
) -> impl Responder {
    let name = path.into_inner();
    if state.update_field_by_name(&name, update.into_inner().value) {
        HttpResponse::Ok().json(ApiResponse::success(state.snapshot().inputs))
    } else {
        HttpResponse::NotFound().json(ApiResponse::<InputParameters>::error(&format!(
            "Unknown input parameter: {}",
            name
        )))
    }
}

async fn api_submit(state: web::Data<FormState>) -> impl Responder {
    state.submit().await;
    HttpResponse::Ok().json(ApiResponse::success(state.snapshot()))
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ApiResponse::<FormSnapshot>::error("Endpoint not found"))
}

/// Route table shared by `main` and the tests. `FormState` must already be registered as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/", web::post().to(submit_form))
        .route("/api/state", web::get().to(api_state))
        .route("/api/inputs/{key}", web::put().to(update_input))
        .route("/api/submit", web::post().to(api_submit))
        .service(Files::new("/static", STATIC_DIR).prefer_utf8(true))
        .default_service(web::route().to(not_found));
}
