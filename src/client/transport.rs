use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::errors::SubmitError;

use super::validation::ContactFields;

/// How the form reaches the contact endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactTransport: Send + Sync {
    async fn send(&self, fields: &ContactFields) -> Result<(), SubmitError>;
}

/// Posts the form as JSON to the contact endpoint. Any non-2xx answer is a
/// failure; the body of an error response is not inspected.
#[derive(Debug, Clone)]
pub struct HttpContactClient {
    client: Client,
    endpoint: Url,
}

impl HttpContactClient {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        HttpContactClient { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ContactTransport for HttpContactClient {
    async fn send(&self, fields: &ContactFields) -> Result<(), SubmitError> {
        let response = self.client
            .post(self.endpoint.clone())
            .json(fields)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SubmitError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer};

    use super::*;

    // Answers with the status named in the path, once the JSON body has
    // arrived intact.
    async fn answer(code: web::Path<u16>, fields: web::Json<ContactFields>) -> HttpResponse {
        if fields.name != "Ada" || fields.email != "ada@example.com" {
            return HttpResponse::UnprocessableEntity().finish();
        }
        let status = StatusCode::from_u16(code.into_inner()).unwrap_or(StatusCode::IM_A_TEAPOT);
        HttpResponse::build(status).json(serde_json::json!({ "error": "ignored" }))
    }

    fn spawn_endpoint() -> SocketAddr {
        let server = HttpServer::new(|| App::new().route("/status/{code}", web::post().to(answer)))
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        addr
    }

    fn client_for(addr: SocketAddr, code: u16) -> HttpContactClient {
        HttpContactClient::new(Url::parse(&format!("http://{addr}/status/{code}")).unwrap())
    }

    fn fields() -> ContactFields {
        ContactFields::new("Ada", "ada@example.com", "Hello, I have a project for you.")
    }

    #[actix_web::test]
    async fn success_status_is_ok() {
        let addr = spawn_endpoint();

        assert!(client_for(addr, 200).send(&fields()).await.is_ok());
        assert!(client_for(addr, 201).send(&fields()).await.is_ok());
    }

    #[actix_web::test]
    async fn any_other_status_is_a_failure() {
        let addr = spawn_endpoint();

        for code in [400, 429, 500] {
            let err = client_for(addr, code).send(&fields()).await.unwrap_err();
            assert!(matches!(err, SubmitError::Status(c) if c == code), "{code}: {err}");
        }
    }

    #[actix_web::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let client = HttpContactClient::new(Url::parse("http://127.0.0.1:1/api/contact").unwrap());

        let err = client.send(&fields()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Network(_)));
    }
}
