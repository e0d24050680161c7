use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, MempoolResponse, NewTransferResponse};
use crate::transaction::Transfer;

/// Submit a new transfer into the pending pool.
#[post("/transactions/new/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<Transfer>,
) -> impl Responder {
    let transfer = body.into_inner();
    match state.node.submit_transfer(transfer) {
        Ok(index) => {
            info!("POST /transactions/new/ - accepted for block #{index}");
            HttpResponse::Created().json(NewTransferResponse {
                message: format!("Transaction will be added to Block {index}"),
                index,
            })
        }
        Err(e) => {
            warn!("POST /transactions/new/ - rejected: {e}");
            HttpResponse::BadRequest().body(e.to_string())
        }
    }
}

/// List the pending pool.
#[get("/mempool/")]
pub async fn get_mempool(state: web::Data<AppState>) -> impl Responder {
    let transactions = state.node.pending();
    HttpResponse::Ok().json(MempoolResponse {
        size: transactions.len(),
        transactions,
    })
}
