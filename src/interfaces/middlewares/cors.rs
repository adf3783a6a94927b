use actix_cors::Cors;
use actix_web::{
    http::{header, Method},
    middleware::DefaultHeaders,
};

const ALLOWED_HEADERS: &str = "Authorization, Content-Type, Accept, X-Requested-With";
const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const MAX_AGE_SECS: &str = "86400";

fn is_wildcard(origins: &[String]) -> bool {
    origins.iter().any(|origin| origin == "*")
}

/// Checks `Origin` and tags cross-origin responses. Preflights are not
/// answered here: every `OPTIONS` reaches the route, which replies with an
/// empty 200 whether or not the probe carried an `Origin`.
pub fn cors_layer(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .disable_preflight()
        .allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(86_400);

    if is_wildcard(origins) {
        cors = cors.allow_any_origin().send_wildcard();
    } else {
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Permissive CORS headers on every response, including ones for requests
/// that carried no `Origin`. Headers the CORS layer already set are left alone.
pub fn cors_headers(origins: &[String]) -> DefaultHeaders {
    let headers = DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
        .add((header::ACCESS_CONTROL_MAX_AGE, MAX_AGE_SECS));

    if is_wildcard(origins) {
        headers.add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
    } else {
        headers
    }
}
