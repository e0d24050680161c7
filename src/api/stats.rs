use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let node = &state.node;
    let chain = node.chain();
    let height = chain.len();

    // seconds between the two most recent blocks
    let last_interval_secs = match chain.as_slice() {
        [.., older, newer] => Some((newer.timestamp - older.timestamp).max(0)),
        _ => None,
    };

    HttpResponse::Ok().json(StatsResponse {
        node_id: node.id().to_string(),
        height,
        difficulty: node.difficulty(),
        mempool_size: node.pending_len(),
        peers: node.peer_count(),
        last_interval_secs,
    })
}
