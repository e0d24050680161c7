use actix_web::{HttpResponse, Responder, get, web};
use log::{error, warn};

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};
use crate::node::NodeError;

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.node.chain();
    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain,
    })
}

/// Validate the whole local chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ValidateResponse {
        valid: state.node.is_chain_valid(),
        length: state.node.chain_len(),
        difficulty: state.node.difficulty(),
    })
}

/// Mine a new block from the current pool:
/// - snapshot the pool and add the reward transfer
/// - run the PoW search on the blocking pool, outside the ledger lock
/// - append to the chain if the tip did not move, drain what was mined
#[get("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let worker = state.clone();
    let mined = match web::block(move || worker.node.mine()).await {
        Ok(mined) => mined,
        Err(e) => {
            error!("MINER - search worker failed: {e}");
            return HttpResponse::InternalServerError().body("mining worker failed");
        }
    };

    match mined {
        Ok(block) => HttpResponse::Ok().json(MineResponse::from(block)),
        Err(e) => mine_error_response(e),
    }
}

/// A search that lost the race (cancelled, or finished on a stale tip)
/// is a conflict; anything else is a server fault.
fn mine_error_response(e: NodeError) -> HttpResponse {
    match e {
        NodeError::StaleTip | NodeError::Mining(_) => {
            warn!("MINER - {e}");
            HttpResponse::Conflict().body(e.to_string())
        }
        e => {
            error!("MINER - {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}
