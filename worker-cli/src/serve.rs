// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! A local HTTP front door for the worker, the way the hosting platform
//! routes manual `/worker` calls to the function.

use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, StatusCode};
use hyper_util::rt::TokioIo;
use log::{debug, info, warn};
use serde_json::json;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use worker::prelude::*;
use worker::response::{APPLICATION_JSON, CONTENT_TYPE};

pub async fn command(matches: &ArgMatches, config: &WorkerConfig) -> Result<()> {
    let host = matches.value_of("host").unwrap_or(&config.host);
    let port = match matches.value_of("port") {
        Some(port) => port.parse::<u16>()?,
        None => config.port,
    };
    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;

    let listener = TcpListener::bind(addr).await?;
    info!(
        "Serving {} on http://{}{} (Ctrl-C to stop)",
        config.name,
        listener.local_addr()?,
        config.route
    );

    let worker = Arc::new(Worker::try_new(config)?);
    serve(listener, worker, config.route.clone(), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
        }
    })
    .await
}

pub fn command_args() -> Command<'static> {
    Command::new("serve")
        .about("Serves the worker over HTTP on the local machine")
        .arg(
            Arg::new("host")
                .short('H')
                .long("host")
                .value_name("HOST")
                .help("Sets the listen host [default: from the config file]")
                .takes_value(true),
        )
        .arg(
            Arg::new("port")
                .short('P')
                .long("port")
                .value_name("PORT")
                .help("Sets the listen port [default: from the config file]")
                .takes_value(true),
        )
}

/// Accepts connections until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    worker: Arc<Worker>,
    route: String,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let route = Arc::new(route);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                };

                let worker = worker.clone();
                let route = route.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                        let response = respond(&worker, &route, &req);
                        async move { Ok::<_, Infallible>(response) }
                    });
                    if let Err(e) = http1::Builder::new()
                        .title_case_headers(true)
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        debug!("Connection from {} closed: {}", peer, e);
                    }
                });
            }
            _ = &mut shutdown => {
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}

/// Answers one HTTP request. The request body is never read.
pub fn respond<B>(worker: &Worker, route: &str, req: &Request<B>) -> hyper::Response<Full<Bytes>> {
    let path = req.uri().path();
    let response = if path.trim_end_matches('/') == route.trim_end_matches('/') {
        info!("{} {}", req.method(), path);
        worker.handle(req)
    } else {
        debug!("{} {}: no such route", req.method(), path);
        not_found(path)
    };
    into_http(&response)
}

fn not_found(path: &str) -> Response {
    let mut headers = std::collections::BTreeMap::new();
    headers.insert(CONTENT_TYPE.to_owned(), APPLICATION_JSON.to_owned());
    Response {
        status_code: StatusCode::NOT_FOUND.as_u16(),
        headers,
        body: json!({"error": "not found", "path": path}).to_string(),
    }
}

fn into_http(response: &Response) -> hyper::Response<Full<Bytes>> {
    let mut builder = hyper::Response::builder().status(response.status_code);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
        .body(Full::new(Bytes::from(response.body.clone())))
        .unwrap_or_else(|e| {
            warn!("Invalid response: {}", e);
            let mut fallback = hyper::Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    const ALIVE_BODY: &str = "{\"status\": \"noop\", \"msg\": \"worker is alive 🔄\"}";

    fn worker() -> Worker {
        Worker::with_encoding(Encoding::Spaced).unwrap()
    }

    async fn body_of(response: hyper::Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn any_method_on_the_route() {
        let worker = worker();
        for (method, uri) in [("GET", "/worker"), ("POST", "/worker/"), ("PUT", "/worker?x=1")] {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .body("{\"document_id\": 9}")
                .unwrap();
            let response = respond(&worker, "/worker", &req);
            assert_eq!(StatusCode::OK, response.status());
            assert_eq!("application/json", response.headers()["content-type"]);
            assert_eq!(ALIVE_BODY, body_of(response).await);
        }
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let req = Request::builder().uri("/jobs").body(()).unwrap();
        let response = respond(&worker(), "/worker", &req);
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        assert_eq!(
            r#"{"error":"not found","path":"/jobs"}"#,
            body_of(response).await
        );
    }

    #[tokio::test]
    async fn serves_over_tcp() -> Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(
            listener,
            Arc::new(worker()),
            "/worker".to_owned(),
            async move {
                let _ = stopped.await;
            },
        ));

        let mut stream = TcpStream::connect(addr).await?;
        stream
            .write_all(b"GET /worker HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await?;
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await?;
        let raw = String::from_utf8(raw)?;

        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"), "{}", raw);
        assert!(raw.contains("\r\nContent-Type: application/json\r\n"), "{}", raw);
        assert!(raw.ends_with(ALIVE_BODY), "{}", raw);

        let _ = stop.send(());
        server.await??;
        Ok(())
    }
}
