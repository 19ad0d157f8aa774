use std::io::{self, BufRead, Write};

use crate::store::BookStore;

use super::{Reply, Session};

/// Line-oriented, half-duplex channel to one client.
pub trait LineTransport {
    /// Next line without its terminator, or `None` once the peer is gone.
    fn recv_line(&mut self) -> io::Result<Option<String>>;

    /// Send one block of text followed by a newline, flushed.
    fn send_line(&mut self, line: &str) -> io::Result<()>;
}

/// [`LineTransport`] over any buffered reader and writer pair.
pub struct StreamTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> StreamTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        StreamTransport { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> LineTransport for StreamTransport<R, W> {
    fn recv_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

fn send<T: LineTransport>(transport: &mut T, reply: &Reply) -> io::Result<()> {
    for line in reply.lines() {
        transport.send_line(line)?;
    }
    Ok(())
}

/// Run `session` to completion over a blocking transport: greet, then answer
/// each line until the client exits or disconnects.
pub fn drive<S, T>(session: &mut Session<S>, transport: &mut T) -> io::Result<()>
where
    S: BookStore,
    T: LineTransport,
{
    send(transport, &session.greeting())?;
    while let Some(line) = transport.recv_line()? {
        let reply = session.handle_line(&line);
        send(transport, &reply)?;
        if reply.closes() {
            break;
        }
    }
    Ok(())
}
