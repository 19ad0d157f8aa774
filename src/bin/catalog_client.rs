use anyhow::Context;
use book_catalog::server::ClientConfig;
use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Relays stdin lines to the server and prints everything it sends back,
/// until either side closes.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::parse();
    let stream = TcpStream::connect(&config.addr)
        .await
        .with_context(|| format!("connecting to {}", config.addr))?;
    let (reader, mut writer) = stream.into_split();

    let mut from_server = tokio::spawn(async move {
        let mut reader = reader;
        let mut stdout = io::stdout();
        io::copy(&mut reader, &mut stdout).await?;
        stdout.flush().await
    });

    let mut stdin = BufReader::new(io::stdin()).lines();
    loop {
        tokio::select! {
            relayed = &mut from_server => {
                relayed.context("server relay task")??;
                break;
            }
            line = stdin.next_line() => match line? {
                Some(line) => {
                    writer.write_all(line.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await?;
                }
                None => {
                    writer.shutdown().await?;
                    (&mut from_server).await.context("server relay task")??;
                    break;
                }
            },
        }
    }
    Ok(())
}
