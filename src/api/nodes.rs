use actix_web::{HttpResponse, Responder, get, post, web};
use log::warn;

use super::models::{AppState, NodesResponse, RegisterNodesRequest, ResolveResponse};
use crate::node::consensus;

/// Register one or more peers (URL or host:port).
#[post("/nodes/register/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    let nodes = body.into_inner().nodes.unwrap_or_default();
    match state.node.register_peers(&nodes) {
        Ok(total_nodes) => HttpResponse::Created().json(NodesResponse {
            message: "New nodes have been added".to_string(),
            total_nodes,
        }),
        Err(e) => {
            warn!("POST /nodes/register/ - rejected: {e}");
            HttpResponse::BadRequest().body(format!("Error: {e}"))
        }
    }
}

#[get("/nodes/")]
pub async fn get_nodes(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(NodesResponse {
        message: "Known nodes".to_string(),
        total_nodes: state.node.peers(),
    })
}

/// Run consensus: adopt the longest valid peer chain if it beats ours.
#[get("/nodes/resolve/")]
pub async fn resolve(state: web::Data<AppState>) -> impl Responder {
    let replaced = consensus::resolve(&state.node, &state.peer_client).await;
    let chain = state.node.chain();
    let message = if replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };
    HttpResponse::Ok().json(ResolveResponse {
        message: message.to_string(),
        replaced,
        length: chain.len(),
        chain,
    })
}
