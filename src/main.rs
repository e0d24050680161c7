use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{info, warn};

use ledger_node::api::{self, AppState};
use ledger_node::config::NodeConfig;
use ledger_node::node::{HttpPeerClient, Node};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let cfg = NodeConfig::from_env();
    let node = Node::new(cfg.node_id.clone(), cfg.difficulty);
    if !cfg.peers.is_empty() {
        if let Err(e) = node.register_peers(&cfg.peers) {
            warn!("startup peers ignored: {e}");
        }
    }
    let peer_client = HttpPeerClient::new(cfg.peer_timeout).map_err(std::io::Error::other)?;

    println!(
        "⛓️ Starting ledger node {} at http://{}:{}",
        cfg.node_id, cfg.host, cfg.port
    );
    info!(
        "difficulty={} peers={:?} peer_timeout={:?}",
        cfg.difficulty,
        node.peers(),
        cfg.peer_timeout
    );

    let state = web::Data::new(AppState::new(node, peer_client));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((cfg.host.as_str(), cfg.port))?
    .run()
    .await
}
