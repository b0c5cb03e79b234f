use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};

/// A connected shell channel - implements Read + Write.
///
/// Closing happens on drop; callers that need to half-close the write side
/// can use [`ShellStream::shutdown`].
pub struct ShellStream {
    inner: ShellStreamInner,
}

enum ShellStreamInner {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
}

impl Read for ShellStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            ShellStreamInner::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            ShellStreamInner::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for ShellStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            ShellStreamInner::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            ShellStreamInner::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            ShellStreamInner::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            ShellStreamInner::Unix(stream) => stream.flush(),
        }
    }
}

impl ShellStream {
    /// Connect to a shell listening on a TCP address (blocking).
    pub fn connect_tcp(addr: impl ToSocketAddrs + std::fmt::Display) -> Result<Self> {
        let target = addr.to_string();
        let stream = TcpStream::connect(&addr).map_err(|source| TransportError::Connect {
            target: target.clone(),
            source,
        })?;
        // Commands are single short lines; don't let Nagle hold them back.
        stream.set_nodelay(true)?;
        debug!(%target, "connected to tcp shell");
        Ok(Self::from_tcp(stream))
    }

    /// Connect to a shell listening on a Unix domain socket (blocking).
    #[cfg(unix)]
    pub fn connect_unix(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let stream = std::os::unix::net::UnixStream::connect(path).map_err(|source| {
            TransportError::Connect {
                target: path.display().to_string(),
                source,
            }
        })?;
        debug!(?path, "connected to unix shell");
        Ok(Self::from_unix(stream))
    }

    /// Wrap an already connected TCP stream.
    pub fn from_tcp(stream: TcpStream) -> Self {
        Self {
            inner: ShellStreamInner::Tcp(stream),
        }
    }

    /// Wrap an already connected Unix domain socket stream.
    #[cfg(unix)]
    pub fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: ShellStreamInner::Unix(stream),
        }
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        match &self.inner {
            ShellStreamInner::Tcp(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            ShellStreamInner::Unix(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
        }
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        match &self.inner {
            ShellStreamInner::Tcp(stream) => stream.set_write_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            ShellStreamInner::Unix(stream) => {
                stream.set_write_timeout(timeout).map_err(Into::into)
            }
        }
    }

    /// Try to clone this stream (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            ShellStreamInner::Tcp(stream) => Ok(Self::from_tcp(stream.try_clone()?)),
            #[cfg(unix)]
            ShellStreamInner::Unix(stream) => Ok(Self::from_unix(stream.try_clone()?)),
        }
    }

    /// Shut down the read, write, or both halves of the connection.
    pub fn shutdown(&self, how: Shutdown) -> Result<()> {
        match &self.inner {
            ShellStreamInner::Tcp(stream) => stream.shutdown(how).map_err(Into::into),
            #[cfg(unix)]
            ShellStreamInner::Unix(stream) => stream.shutdown(how).map_err(Into::into),
        }
    }
}

impl std::fmt::Debug for ShellStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            ShellStreamInner::Tcp(stream) => f
                .debug_struct("ShellStream")
                .field("type", &"tcp")
                .field("peer", &stream.peer_addr().ok())
                .finish(),
            #[cfg(unix)]
            ShellStreamInner::Unix(_) => {
                f.debug_struct("ShellStream").field("type", &"unix").finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    #[test]
    fn tcp_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut buf = [0u8; 5];
            conn.read_exact(&mut buf).unwrap();
            conn.write_all(&buf).unwrap();
        });

        let mut stream = ShellStream::connect_tcp(addr).unwrap();
        stream.write_all(b"hello").unwrap();
        let mut echoed = [0u8; 5];
        stream.read_exact(&mut echoed).unwrap();
        assert_eq!(&echoed, b"hello");

        server.join().unwrap();
    }

    #[test]
    fn connect_refused_reports_target() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = ShellStream::connect_tcp(addr).unwrap_err();
        match err {
            TransportError::Connect { target, .. } => assert_eq!(target, addr.to_string()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn unix_pair_round_trip() {
        let (left, mut right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut stream = ShellStream::from_unix(left);

        stream.write_all(b"ping").unwrap();
        let mut buf = [0u8; 4];
        right.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");

        stream.set_read_timeout(Some(Duration::from_millis(50))).unwrap();
        assert!(format!("{stream:?}").contains("unix"));
    }
}
