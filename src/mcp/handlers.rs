//! Stateless HTTP transport for Actix-Web.
//!
//! Each POST carries one JSON-RPC message; no session or SSE stream is kept.

use actix_web::{web, HttpResponse, Responder};

use crate::mcp::rpc::OutboundResponse;
use crate::mcp::service::McpService;

/// RPC handler - POST /mcp
///
/// The body is taken raw so malformed JSON still gets a JSON-RPC error.
pub async fn rpc_handler(service: web::Data<McpService>, body: web::Bytes) -> impl Responder {
    log::info!("Received MCP request ({} bytes)", body.len());

    let response = match std::str::from_utf8(&body) {
        Ok(text) => service.handle_line(text).await,
        Err(err) => Some(OutboundResponse::parse_error(format!("Parse error: {err}"))),
    };

    if let Some(response) = response {
        return HttpResponse::Ok()
            .content_type("application/json")
            .json(response);
    }

    // Notifications return 202 Accepted
    HttpResponse::Accepted().finish()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/mcp").route(web::post().to(rpc_handler)));
}

/// Serves the MCP endpoint until the server is stopped.
pub async fn serve(service: McpService, addr: &str) -> std::io::Result<()> {
    let data = web::Data::new(service);
    log::info!("Starting MCP HTTP transport at http://{}/mcp", addr);

    actix_web::HttpServer::new(move || {
        actix_web::App::new()
            .app_data(data.clone())
            .configure(config)
    })
    .bind(addr)?
    .run()
    .await
}
