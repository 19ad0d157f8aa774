//! TCP front end: one worker per connection, each driving its own
//! [`Session`] over newline-delimited UTF-8.
//!
//! Accepting is async. Once accepted, a connection is handed to the blocking
//! pool as a std stream and runs [`session::drive`](crate::session::drive),
//! since every session step may wait on the store's guard.

mod config;

pub use config::{ClientConfig, ServerConfig};

use std::future::Future;
use std::io::{self, BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::session::{self, Session, StreamTransport};
use crate::store::BookStore;

/// Accept loop over an already bound listener. Runs until the process ends.
pub async fn serve_listener<S>(listener: TcpListener, store: Arc<S>) -> io::Result<()>
where
    S: BookStore + 'static,
{
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(%err, "accept failed");
                continue;
            }
        };

        let stream = match stream.into_std() {
            Ok(stream) => stream,
            Err(err) => {
                warn!(%peer, %err, "could not take over connection");
                continue;
            }
        };
        let session = Session::new(Arc::clone(&store)).with_peer(peer.to_string());
        tokio::task::spawn_blocking(move || {
            info!(%peer, "client connected");
            match run_connection(stream, session) {
                Ok(()) => info!(%peer, "client disconnected"),
                Err(err) => error!(%peer, %err, "connection closed with error"),
            }
        });
    }
}

/// Like [`serve_listener`], returning once `shutdown` resolves. Sessions
/// already running are left to finish on their own.
pub async fn serve_until<S, F>(listener: TcpListener, store: Arc<S>, shutdown: F) -> io::Result<()>
where
    S: BookStore + 'static,
    F: Future<Output = ()>,
{
    tokio::select! {
        served = serve_listener(listener, store) => served,
        () = shutdown => {
            info!("catalog server shutting down");
            Ok(())
        }
    }
}

fn run_connection<S: BookStore>(stream: TcpStream, mut session: Session<S>) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    let reader = BufReader::new(stream.try_clone()?);
    let mut transport = StreamTransport::new(reader, BufWriter::new(stream));
    session::drive(&mut session, &mut transport)
}
