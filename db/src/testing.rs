//! Test helpers shared across modules.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

/// Base path every fake database URL ends with.
pub(crate) const DB_PATH: &str = "/v0/token";

// Read the request line and drain headers, returning the request target
fn read_target(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap_or(0);

    loop {
        let mut header = String::new();
        let read = reader.read_line(&mut header).unwrap_or(0);
        if read == 0 || header == "\r\n" {
            break;
        }
    }

    request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Start a local HTTP server answering every request with `respond(target)`.
///
/// Returns a database URL pointing at [`DB_PATH`] on that server. The server thread lives until
/// the test process exits.
pub(crate) fn serve<F>(respond: F) -> String
where
    F: Fn(&str) -> (u16, String) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}{}", listener.local_addr().unwrap(), DB_PATH);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(_) => break,
            };
            let target = read_target(&stream);
            let (status, body) = respond(&target);
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason(status),
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    url
}

/// Start a local HTTP server speaking the store protocol for `contents`.
///
/// Keys are listed in the map's order and each value is served as its JSON text. Unknown keys
/// produce `404`.
pub(crate) fn serve_contents(contents: serde_json::Value) -> String {
    let contents = contents.as_object().cloned().unwrap_or_default();
    serve(move |target| {
        let listing = format!("{}?", DB_PATH);
        let value_prefix = format!("{}/", DB_PATH);
        if target.starts_with(&listing) {
            let keys: Vec<String> = contents
                .keys()
                .map(|key| urlencoding::encode(key).into_owned())
                .collect();
            (200, keys.join("\n"))
        } else if let Some(encoded) = target.strip_prefix(&value_prefix) {
            let key = urlencoding::decode(encoded).unwrap().into_owned();
            match contents.get(&key) {
                Some(value) => (200, value.to_string()),
                None => (404, String::new()),
            }
        } else {
            (404, String::new())
        }
    })
}
