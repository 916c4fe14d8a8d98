//! Blocking byte-stream transport.
//!
//! A connection is opened per exchange, the whole request is written once,
//! and the stream is handed to the response parser. Dropping the
//! [`Connection`] closes the socket, so every exit path releases it.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::time::Duration;

use log::debug;

use crate::error::Error;
use crate::http::{NetworkKind, Target};

/// An open plaintext stream to a peer.
#[derive(Debug)]
pub enum Connection {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Connection {
    /// Dial `target`. `timeout` bounds the connect and every later read and
    /// write; `None` blocks indefinitely.
    pub fn open(target: &Target, timeout: Option<Duration>) -> Result<Self, Error> {
        let address = target.address.as_str();
        let connection = match target.network {
            NetworkKind::Tcp => Connection::Tcp(connect_tcp(address, timeout)?),
            #[cfg(unix)]
            NetworkKind::Unix => {
                Connection::Unix(UnixStream::connect(address).map_err(|e| Error::io(address, e))?)
            }
            #[cfg(not(unix))]
            NetworkKind::Unix => {
                return Err(Error::io(
                    address,
                    io::Error::new(io::ErrorKind::Unsupported, "local stream sockets need unix"),
                ))
            }
        };
        connection
            .set_timeout(timeout)
            .map_err(|e| Error::io(address, e))?;
        Ok(connection)
    }

    fn set_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        match self {
            Connection::Tcp(stream) => {
                stream.set_read_timeout(timeout)?;
                stream.set_write_timeout(timeout)
            }
            #[cfg(unix)]
            Connection::Unix(stream) => {
                stream.set_read_timeout(timeout)?;
                stream.set_write_timeout(timeout)
            }
        }
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Connection::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Connection::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Connection::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.flush(),
        }
    }
}

/// Open a connection to `target` and write `request` to it in full.
pub fn send(target: &Target, request: &str, timeout: Option<Duration>) -> Result<Connection, Error> {
    let mut connection = Connection::open(target, timeout)?;
    connection
        .write_all(request.as_bytes())
        .and_then(|()| connection.flush())
        .map_err(|e| Error::io(&target.address, e))?;
    debug!("sent {} bytes to {}", request.len(), target.address);
    Ok(connection)
}

fn connect_tcp(address: &str, timeout: Option<Duration>) -> Result<TcpStream, Error> {
    let Some(timeout) = timeout else {
        return TcpStream::connect(address).map_err(|e| Error::io(address, e));
    };

    let mut last_error = io::Error::new(
        io::ErrorKind::InvalidInput,
        "address did not resolve to any socket address",
    );
    for socket_addr in address.to_socket_addrs().map_err(|e| Error::io(address, e))? {
        match TcpStream::connect_timeout(&socket_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = e,
        }
    }
    Err(Error::io(address, last_error))
}
