use chess_engine::engine::Engine;
use chess_engine::uci;
use tracing_subscriber::EnvFilter;

fn main() {
    // stdout belongs to the protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut engine = Engine::default();
    uci::uci_loop(&mut engine);
}
