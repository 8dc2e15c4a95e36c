pub mod echo;
mod logger;

use std::sync::Arc;

use graphql_handler::{Config, Handler, HandlerError};
use graphql_handler_config::{load_config, HandlerConfig};
use ntex::web::{self, Responder};
use tracing::info;

use crate::{echo::EchoExecutor, logger::configure_logging};

pub use graphql_handler;

pub async fn health_check_handler() -> impl Responder {
    web::HttpResponse::Ok()
}

pub async fn server_entrypoint() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("GRAPHQL_HANDLER_CONFIG_FILE_PATH").ok();
    let handler_config = load_config(config_path)?;
    configure_logging(&handler_config.log);
    info!("graphql-handler@{} starting...", env!("CARGO_PKG_VERSION"));

    let addr = handler_config.http.address();
    let graphql_endpoint = handler_config.http.graphql_endpoint.clone();
    let handler = Arc::new(build_handler(&handler_config)?);

    info!("serving GraphQL on {}{}", addr, graphql_endpoint);

    web::HttpServer::new(async move || {
        let graphql_endpoint = graphql_endpoint.clone();
        web::App::new()
            .state(handler.clone())
            .configure(move |service_config| {
                configure_ntex_app(service_config, &graphql_endpoint);
            })
    })
    .bind(addr)?
    .run()
    .await?;

    info!("server stopped");

    Ok(())
}

pub fn build_handler(
    handler_config: &HandlerConfig,
) -> Result<Handler<EchoExecutor>, HandlerError> {
    Handler::try_new(Config {
        executor: Some(Arc::new(EchoExecutor)),
        context: (),
        pretty: handler_config.response.pretty,
        strict_errors: handler_config.response.strict_errors,
        max_request_body_size: handler_config.http.max_request_body_size,
    })
}

pub fn configure_ntex_app(service_config: &mut web::ServiceConfig, graphql_endpoint: &str) {
    graphql_handler::configure_ntex_app::<EchoExecutor>(service_config, graphql_endpoint);
    service_config.route("/health", web::to(health_check_handler));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use graphql_handler_config::parse_yaml_config;
    use ntex::web::{self, test};
    use serde_json::json;

    use super::{build_handler, configure_ntex_app};

    async fn call(config_yaml: &str, req: test::TestRequest) -> (u16, serde_json::Value) {
        let handler_config = parse_yaml_config(config_yaml.to_string()).unwrap();
        let graphql_endpoint = handler_config.http.graphql_endpoint.clone();
        let handler = Arc::new(build_handler(&handler_config).unwrap());

        let app = test::init_service(
            web::App::new()
                .state(handler)
                .configure(|service_config| configure_ntex_app(service_config, &graphql_endpoint)),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status().as_u16();
        let body = test::read_body(resp).await;

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[ntex::test]
    async fn health_check() {
        let handler = Arc::new(build_handler(&Default::default()).unwrap());
        let app = test::init_service(
            web::App::new()
                .state(handler)
                .configure(|service_config| configure_ntex_app(service_config, "/graphql")),
        )
        .await;

        let req = test::TestRequest::with_uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
    }

    #[ntex::test]
    async fn echoes_form_requests_on_custom_endpoint() {
        let (status, body) = call(
            r#"
            http:
                graphql_endpoint: /custom
            "#,
            test::TestRequest::post()
                .uri("/custom")
                .header("content-type", "application/x-www-form-urlencoded")
                .set_payload("query=hello&operationName=Op&variables=%7B%22id%22%3A%224%22%7D"),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({
                "data": {
                    "query": "hello",
                    "variables": { "id": "4" },
                    "operationName": "Op"
                }
            })
        );
    }

    #[ntex::test]
    async fn missing_query_is_reported_in_the_payload() {
        let (status, body) = call(
            "",
            test::TestRequest::post()
                .uri("/graphql")
                .header("content-type", "application/json")
                .set_payload("{ not json"),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({
                "data": null,
                "errors": [{ "message": "Must provide an operation." }]
            })
        );
    }

    #[ntex::test]
    async fn missing_query_with_strict_errors() {
        let (status, body) = call(
            r#"
            response:
                strict_errors: true
            "#,
            test::TestRequest::with_uri("/graphql"),
        )
        .await;

        assert_eq!(status, 500);
        assert_eq!(
            body,
            json!({ "errors": [{ "message": "Must provide an operation." }] })
        );
    }
}
