//! Blocking HTTP/1.1 transport
//!
//! Minimal GET-only HTTP client over a single `TcpStream`, enough for the
//! Tycoon RPC protocol: keep-alive connection, status line + headers parsing,
//! `Content-Length` bodies (the server always sends one) with a read-to-end
//! fallback when the server closes the connection. Chunked responses are not
//! produced by the server and are rejected.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use bytes::Bytes;

use crate::config::Config;
use crate::error::{Result, TycoonError};

use super::transport::{RawResponse, Transport};

/// HTTP/1.1 transport over one TCP connection
pub struct HttpTransport {
    /// Buffered read/write halves; `None` once closed
    stream: Option<Stream>,

    /// `host:port` for the `Host` header
    authority: String,
}

struct Stream {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl HttpTransport {
    /// Connect to the configured endpoint.
    ///
    /// Resolves the host, connects with the configured timeout, and applies
    /// read/write timeouts to the socket.
    pub fn connect(config: &Config) -> Result<Self> {
        let authority = config.authority();
        let addrs: Vec<_> = authority.to_socket_addrs()?.collect();
        let addr = addrs.first().ok_or_else(|| {
            TycoonError::Protocol(format!("no address resolved for {}", authority))
        })?;

        let stream = TcpStream::connect_timeout(addr, config.connect_timeout)?;
        stream.set_read_timeout(Some(config.read_timeout))?;
        stream.set_write_timeout(Some(config.write_timeout))?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("connected to {}", authority);

        Ok(Self {
            stream: Some(Stream {
                reader: BufReader::new(read_stream),
                writer: BufWriter::new(write_stream),
            }),
            authority,
        })
    }

    fn read_response(stream: &mut Stream) -> Result<RawResponse> {
        // Status line: HTTP/1.x <code> <reason>
        let status_line = read_line(&mut stream.reader)?;
        let mut parts = status_line.split_whitespace();
        let version = parts
            .next()
            .ok_or_else(|| TycoonError::Protocol("empty status line".to_string()))?;
        if !version.starts_with("HTTP/1.") {
            return Err(TycoonError::Protocol(format!(
                "unsupported HTTP version: {}",
                version
            )));
        }
        let status: u16 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                TycoonError::Protocol(format!("malformed status line: {}", status_line))
            })?;

        // Headers until the blank line
        let mut content_type = None;
        let mut content_length: Option<usize> = None;
        let mut connection_close = false;
        let mut chunked = false;
        loop {
            let line = read_line(&mut stream.reader)?;
            if line.is_empty() {
                break;
            }
            let Some((name, value)) = line.split_once(':') else {
                return Err(TycoonError::Protocol(format!("malformed header: {}", line)));
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            match name.as_str() {
                "content-type" => content_type = Some(value.to_string()),
                "content-length" => {
                    content_length = Some(value.parse().map_err(|_| {
                        TycoonError::Protocol(format!("bad content-length: {}", value))
                    })?);
                }
                "connection" => connection_close = value.eq_ignore_ascii_case("close"),
                "transfer-encoding" => chunked = value.eq_ignore_ascii_case("chunked"),
                _ => {}
            }
        }

        if chunked {
            return Err(TycoonError::Protocol(
                "chunked transfer encoding is not supported".to_string(),
            ));
        }

        // Drain the entire body before returning so the connection stays
        // reusable for the next call.
        let body = match content_length {
            Some(len) => {
                let mut body = vec![0u8; len];
                stream.reader.read_exact(&mut body)?;
                body
            }
            None if connection_close => {
                let mut body = Vec::new();
                stream.reader.read_to_end(&mut body)?;
                body
            }
            None => {
                return Err(TycoonError::Protocol(
                    "response has neither content-length nor connection: close".to_string(),
                ));
            }
        };

        Ok(RawResponse {
            status,
            content_type,
            body: Bytes::from(body),
        })
    }
}

impl Transport for HttpTransport {
    fn get(&mut self, target: &str) -> Result<RawResponse> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| TycoonError::Protocol("transport is closed".to_string()))?;

        write!(
            stream.writer,
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: keep-alive\r\n\r\n",
            target, self.authority
        )?;
        stream.writer.flush()?;

        Self::read_response(stream)
    }

    fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("closed connection to {}", self.authority);
        }
    }
}

impl Drop for HttpTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// Read one CRLF-terminated line, without the terminator
fn read_line(reader: &mut BufReader<TcpStream>) -> Result<String> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Err(TycoonError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed mid-response",
        )));
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}
