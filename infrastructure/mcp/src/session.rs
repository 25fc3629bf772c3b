use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

use business::domain::mcp::errors::McpError;
use business::domain::mcp::model::{ServerInfo, Tool, ToolCallResult};
use business::domain::mcp::services::McpSession;
use business::domain::mcp::value_objects::ServerUrl;

use crate::jsonrpc::{
    IncomingMessage, JsonRpcNotification, JsonRpcReply, JsonRpcRequest, METHOD_NOT_FOUND,
};
use crate::protocol::{
    CallToolResult, Implementation, InitializeParams, InitializeResult, ListToolsResult,
};
use crate::sse::SseDecoder;

type PendingRequests = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, McpError>>>>>;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Bounds the TCP connect and the wait for the `endpoint` event.
    pub connect_timeout: Duration,
    /// Bounds each JSON-RPC request, from post to response event.
    pub request_timeout: Duration,
    pub client_name: String,
    pub client_version: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            client_name: "mcp-azure-assistant".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// MCP client session over the SSE transport.
///
/// Requests are posted to the endpoint announced by the server; responses
/// come back as `message` events on the stream and are matched by id.
pub struct SseMcpSession {
    http: Client,
    message_url: Url,
    pending: PendingRequests,
    closed: Arc<AtomicBool>,
    next_id: AtomicU64,
    request_timeout: Duration,
    server_info: ServerInfo,
    reader: JoinHandle<()>,
}

impl SseMcpSession {
    pub async fn connect(url: &ServerUrl, options: SessionOptions) -> Result<Self, McpError> {
        let sse_url = Url::parse(&url.sse_endpoint()).map_err(|_| McpError::InvalidUrl)?;

        // No total timeout: the event stream stays open for the whole session.
        let http = Client::builder()
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|err| McpError::ConnectionFailed(err.to_string()))?;

        // Headers must arrive within the connect timeout as well.
        let response = timeout(
            options.connect_timeout,
            http.get(sse_url.clone())
                .header(ACCEPT, "text/event-stream")
                .send(),
        )
        .await
        .map_err(|_| McpError::Timeout)?
        .map_err(|err| McpError::ConnectionFailed(err.to_string()))?;

        if !response.status().is_success() {
            return Err(McpError::ConnectionFailed(format!(
                "SSE endpoint returned {}",
                response.status()
            )));
        }

        let pending: PendingRequests = Arc::default();
        let closed = Arc::new(AtomicBool::new(false));
        let (endpoint_tx, endpoint_rx) = oneshot::channel();

        let reader = tokio::spawn(read_events(
            response,
            sse_url,
            http.clone(),
            options.request_timeout,
            pending.clone(),
            closed.clone(),
            endpoint_tx,
        ));

        let message_url = match timeout(options.connect_timeout, endpoint_rx).await {
            Ok(Ok(message_url)) => message_url,
            Ok(Err(_)) => {
                reader.abort();
                return Err(McpError::Closed);
            }
            Err(_) => {
                reader.abort();
                return Err(McpError::Timeout);
            }
        };

        debug!("MCP message endpoint: {}", message_url);

        let mut session = Self {
            http,
            message_url,
            pending,
            closed,
            next_id: AtomicU64::new(1),
            request_timeout: options.request_timeout,
            server_info: ServerInfo::default(),
            reader,
        };

        session.initialize(&options).await?;
        Ok(session)
    }

    async fn initialize(&mut self, options: &SessionOptions) -> Result<(), McpError> {
        let params = InitializeParams::new(Implementation {
            name: options.client_name.clone(),
            version: options.client_version.clone(),
        });
        let params = serde_json::to_value(params).map_err(protocol_error)?;

        let result = self.request("initialize", Some(params)).await?;
        let initialized: InitializeResult =
            serde_json::from_value(result).map_err(protocol_error)?;
        self.server_info = initialized.into();

        info!(
            "Initialized MCP session with {} {} (protocol {})",
            self.server_info.name, self.server_info.version, self.server_info.protocol_version
        );

        self.post(&JsonRpcNotification::new("notifications/initialized", None))
            .await
    }

    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, McpError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        {
            // Registered before posting: the response may beat the POST reply.
            // The reader flips `closed` under this lock before draining.
            let mut pending = self.pending.lock().await;
            if self.closed.load(Ordering::SeqCst) {
                return Err(McpError::Closed);
            }
            pending.insert(id, tx);
        }

        if let Err(err) = self.post(&JsonRpcRequest::new(id, method, params)).await {
            self.pending.lock().await.remove(&id);
            return Err(err);
        }

        match timeout(self.request_timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(McpError::Closed),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                warn!("MCP request {} ({}) timed out", id, method);
                Err(McpError::Timeout)
            }
        }
    }

    async fn post<T: Serialize>(&self, body: &T) -> Result<(), McpError> {
        let response = self
            .http
            .post(self.message_url.clone())
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| McpError::ConnectionFailed(err.to_string()))?;

        if !response.status().is_success() {
            return Err(McpError::Protocol(format!(
                "server rejected message with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

impl Drop for SseMcpSession {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl McpSession for SseMcpSession {
    fn server_info(&self) -> ServerInfo {
        self.server_info.clone()
    }

    async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let params = cursor.as_ref().map(|cursor| json!({ "cursor": cursor }));
            let result = self.request("tools/list", params).await?;
            let page: ListToolsResult = serde_json::from_value(result).map_err(protocol_error)?;

            tools.extend(page.tools.into_iter().map(Tool::from));

            match page.next_cursor {
                Some(next) if !next.is_empty() && cursor.as_deref() != Some(next.as_str()) => {
                    cursor = Some(next)
                }
                _ => break,
            }
        }

        Ok(tools)
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolCallResult, McpError> {
        let result = self
            .request(
                "tools/call",
                Some(json!({ "name": name, "arguments": arguments })),
            )
            .await?;

        let parsed: CallToolResult = serde_json::from_value(result).map_err(protocol_error)?;
        Ok(parsed.into())
    }
}

fn protocol_error(err: serde_json::Error) -> McpError {
    McpError::Protocol(err.to_string())
}

async fn read_events(
    response: reqwest::Response,
    sse_url: Url,
    http: Client,
    request_timeout: Duration,
    pending: PendingRequests,
    closed: Arc<AtomicBool>,
    endpoint_tx: oneshot::Sender<Url>,
) {
    let mut endpoint_tx = Some(endpoint_tx);
    let mut message_url: Option<Url> = None;
    let mut decoder = SseDecoder::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                warn!("MCP event stream failed: {}", err);
                break;
            }
        };

        for event in decoder.push(&chunk) {
            match event.event.as_str() {
                "endpoint" => match sse_url.join(event.data.trim()) {
                    Ok(url) => {
                        if let Some(tx) = endpoint_tx.take() {
                            let _ = tx.send(url.clone());
                        }
                        message_url = Some(url);
                    }
                    Err(err) => warn!("Invalid MCP endpoint {:?}: {}", event.data, err),
                },
                "message" => {
                    handle_message(
                        &event.data,
                        &pending,
                        &http,
                        message_url.as_ref(),
                        request_timeout,
                    )
                    .await
                }
                other => debug!("Ignoring SSE event {:?}", other),
            }
        }
    }

    debug!("MCP event stream closed");
    let mut pending = pending.lock().await;
    closed.store(true, Ordering::SeqCst);
    for (_, tx) in pending.drain() {
        let _ = tx.send(Err(McpError::Closed));
    }
}

async fn handle_message(
    data: &str,
    pending: &PendingRequests,
    http: &Client,
    message_url: Option<&Url>,
    request_timeout: Duration,
) {
    let message = match IncomingMessage::parse(data) {
        Ok(message) => message,
        Err(err) => {
            warn!("Discarding malformed MCP message: {} -- {}", err, data);
            return;
        }
    };

    match message {
        IncomingMessage::Response { id, outcome } => match pending.lock().await.remove(&id) {
            Some(tx) => {
                let outcome = outcome.map_err(|err| McpError::Rpc {
                    code: err.code,
                    message: err.message,
                });
                let _ = tx.send(outcome);
            }
            None => debug!("No pending request for response {}", id),
        },
        IncomingMessage::Request { id, method } => {
            let reply = if method == "ping" {
                JsonRpcReply::result(id, json!({}))
            } else {
                JsonRpcReply::error(
                    id,
                    METHOD_NOT_FOUND,
                    format!("method not supported: {}", method),
                )
            };

            match message_url {
                Some(url) => {
                    let request = http
                        .post(url.clone())
                        .timeout(request_timeout)
                        .json(&reply);
                    // Sent off the reader task: a stalled POST must not hold up responses.
                    tokio::spawn(async move {
                        if let Err(err) = request.send().await {
                            warn!("Failed to answer server request {}: {}", method, err);
                        }
                    });
                }
                None => warn!("Server request {} arrived before the endpoint", method),
            }
        }
        IncomingMessage::Notification { method } => debug!("MCP notification: {}", method),
        IncomingMessage::Unmatched(id) => debug!("Ignoring MCP message with id {}", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    fn session_against(server: &MockServer, request_timeout: Duration) -> SseMcpSession {
        SseMcpSession {
            http: Client::new(),
            message_url: Url::parse(&server.url("/message?sessionId=test")).unwrap(),
            pending: Arc::default(),
            closed: Arc::new(AtomicBool::new(false)),
            next_id: AtomicU64::new(1),
            request_timeout,
            server_info: ServerInfo::default(),
            reader: tokio::spawn(async {}),
        }
    }

    /// Answers pending requests the way the server's event stream would.
    fn respond_with(pending: PendingRequests, responses: Vec<(u64, &'static str)>) {
        tokio::spawn(async move {
            for (id, body) in responses {
                loop {
                    if pending.lock().await.contains_key(&id) {
                        handle_message(body, &pending, &Client::new(), None, TEST_TIMEOUT).await;
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        });
    }

    #[tokio::test]
    async fn should_route_response_to_waiting_request() {
        let pending: PendingRequests = Arc::default();
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(4, tx);

        handle_message(
            r#"{"jsonrpc":"2.0","id":4,"result":{"ok":true}}"#,
            &pending,
            &Client::new(),
            None,
            TEST_TIMEOUT,
        )
        .await;

        assert_eq!(rx.await.unwrap(), Ok(json!({"ok": true})));
        assert!(pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn should_map_rpc_errors() {
        let pending: PendingRequests = Arc::default();
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(9, tx);

        handle_message(
            r#"{"jsonrpc":"2.0","id":9,"error":{"code":-32602,"message":"Unknown tool"}}"#,
            &pending,
            &Client::new(),
            None,
            TEST_TIMEOUT,
        )
        .await;

        assert_eq!(
            rx.await.unwrap(),
            Err(McpError::Rpc {
                code: -32602,
                message: "Unknown tool".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn should_answer_server_ping() {
        let server = FakeSseServer::start(|_| None).await;
        let message_url = Url::parse(&server.url("/message?sessionId=abc")).unwrap();

        handle_message(
            r#"{"jsonrpc":"2.0","id":12,"method":"ping"}"#,
            &Arc::default(),
            &Client::new(),
            Some(&message_url),
            TEST_TIMEOUT,
        )
        .await;

        let posts = server.wait_for_posts(1).await;
        assert_eq!(posts[0].0, "/message?sessionId=abc");
        assert_eq!(posts[0].1, json!({"jsonrpc": "2.0", "id": 12, "result": {}}));
    }

    #[tokio::test]
    async fn should_reject_unknown_server_requests() {
        let server = FakeSseServer::start(|_| None).await;
        let message_url = Url::parse(&server.url("/message")).unwrap();

        handle_message(
            r#"{"jsonrpc":"2.0","id":"s-1","method":"sampling/createMessage"}"#,
            &Arc::default(),
            &Client::new(),
            Some(&message_url),
            TEST_TIMEOUT,
        )
        .await;

        let posts = server.wait_for_posts(1).await;
        assert_eq!(posts[0].1["id"], "s-1");
        assert_eq!(posts[0].1["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn should_keep_routing_while_ping_reply_is_stalled() {
        let silent = silent_listener().await;
        let message_url = Url::parse(&format!("http://{}/message", silent)).unwrap();
        let pending: PendingRequests = Arc::default();
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(3, tx);

        let routed = timeout(Duration::from_millis(500), async {
            handle_message(
                r#"{"jsonrpc":"2.0","id":12,"method":"ping"}"#,
                &pending,
                &Client::new(),
                Some(&message_url),
                TEST_TIMEOUT,
            )
            .await;
            handle_message(
                r#"{"jsonrpc":"2.0","id":3,"result":{}}"#,
                &pending,
                &Client::new(),
                Some(&message_url),
                TEST_TIMEOUT,
            )
            .await;
        })
        .await;

        assert!(routed.is_ok());
        assert_eq!(rx.await.unwrap(), Ok(json!({})));
    }

    #[tokio::test]
    async fn should_list_tools_across_pages() {
        let server = MockServer::start_async().await;
        let posts = server
            .mock_async(|when, then| {
                when.method(POST).path("/message");
                then.status(202);
            })
            .await;

        let session = session_against(&server, Duration::from_secs(5));
        respond_with(
            session.pending.clone(),
            vec![
                (
                    1,
                    r#"{"jsonrpc":"2.0","id":1,"result":{"tools":[{"name":"azmcp-subscription-list"}],"nextCursor":"page-2"}}"#,
                ),
                (
                    2,
                    r#"{"jsonrpc":"2.0","id":2,"result":{"tools":[{"name":"azmcp-group-list","description":"List resource groups"}]}}"#,
                ),
            ],
        );

        let tools = session.list_tools().await.unwrap();

        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["azmcp-subscription-list", "azmcp-group-list"]);
        posts.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn should_call_tool_with_name_and_arguments() {
        let server = MockServer::start_async().await;
        let call = server
            .mock_async(|when, then| {
                when.method(POST).path("/message").json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": "tools/call",
                    "params": {
                        "name": "azmcp-group-list",
                        "arguments": {"subscription": "sub-1"}
                    }
                }));
                then.status(202);
            })
            .await;

        let session = session_against(&server, Duration::from_secs(5));
        respond_with(
            session.pending.clone(),
            vec![(
                1,
                r#"{"jsonrpc":"2.0","id":1,"result":{"content":[{"type":"text","text":"rg-workshop"}]}}"#,
            )],
        );

        let result = session
            .call_tool("azmcp-group-list", json!({"subscription": "sub-1"}))
            .await
            .unwrap();

        assert_eq!(result.as_text(), "rg-workshop");
        assert!(!result.is_error);
        call.assert_async().await;
    }

    #[tokio::test]
    async fn should_time_out_and_forget_unanswered_request() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/message");
                then.status(202);
            })
            .await;

        let session = session_against(&server, Duration::from_millis(100));

        let result = session.list_tools().await;

        assert_eq!(result, Err(McpError::Timeout));
        assert!(session.pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn should_fail_fast_once_stream_closed() {
        let server = MockServer::start_async().await;
        let session = session_against(&server, Duration::from_secs(5));
        session.closed.store(true, Ordering::SeqCst);

        assert_eq!(session.list_tools().await, Err(McpError::Closed));
    }

    #[tokio::test]
    async fn should_report_rejected_posts() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/message");
                then.status(404);
            })
            .await;

        let session = session_against(&server, Duration::from_secs(5));

        let result = session.list_tools().await;

        assert!(matches!(result, Err(McpError::Protocol(_))));
        assert!(session.pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn should_fail_connect_when_sse_endpoint_is_missing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sse");
                then.status(404);
            })
            .await;

        let url = ServerUrl::parse(&server.base_url()).unwrap();
        let result = SseMcpSession::connect(&url, SessionOptions::default()).await;

        assert!(matches!(result, Err(McpError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn should_fail_connect_when_stream_ends_without_endpoint() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/sse")
                    .header("accept", "text/event-stream");
                then.status(200)
                    .header("content-type", "text/event-stream")
                    .body(": no endpoint here\n\n");
            })
            .await;

        let url = ServerUrl::parse(&server.url("/sse")).unwrap();
        let result = SseMcpSession::connect(&url, SessionOptions::default()).await;

        assert!(matches!(result, Err(McpError::Closed)));
    }

    #[tokio::test]
    async fn should_complete_handshake_over_live_stream() {
        let server = FakeSseServer::start(azure_mcp_server).await;
        let url = ServerUrl::parse(&server.url("/sse")).unwrap();

        let session = SseMcpSession::connect(&url, test_options()).await.unwrap();

        assert_eq!(
            session.server_info(),
            ServerInfo {
                name: "Azure MCP Server".to_string(),
                version: "0.0.10".to_string(),
                protocol_version: "2024-11-05".to_string(),
            }
        );
        assert_eq!(
            session.message_url.as_str(),
            server.url("/message?sessionId=abc")
        );

        let tools = session.list_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "azmcp-subscription-list");

        let posts = server.posts();
        let methods: Vec<_> = posts
            .iter()
            .map(|(_, body)| body["method"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(
            methods,
            vec!["initialize", "notifications/initialized", "tools/list"]
        );
        assert!(posts.iter().all(|(path, _)| path == "/message?sessionId=abc"));
        assert_eq!(posts[0].1["id"], 1);
        assert_eq!(posts[0].1["params"]["protocolVersion"], "2024-11-05");
        assert!(posts[1].1.get("id").is_none());
        assert_eq!(posts[2].1["id"], 2);
    }

    #[tokio::test]
    async fn should_fail_pending_requests_when_stream_closes() {
        let server = FakeSseServer::start(|message| match message["method"].as_str() {
            Some("initialize") => azure_mcp_server(message),
            _ => None,
        })
        .await;
        let url = ServerUrl::parse(&server.url("/sse")).unwrap();
        let session = SseMcpSession::connect(&url, test_options()).await.unwrap();

        let close_after_post = async {
            server.wait_for_posts(3).await;
            server.close_stream();
        };
        let (result, _) = tokio::join!(
            timeout(Duration::from_secs(2), session.list_tools()),
            close_after_post
        );

        assert_eq!(result.unwrap(), Err(McpError::Closed));
        assert_eq!(session.list_tools().await, Err(McpError::Closed));
        assert!(session.pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn should_time_out_when_server_never_sends_headers() {
        let silent = silent_listener().await;
        let url = ServerUrl::parse(&format!("http://{}/sse", silent)).unwrap();
        let options = SessionOptions {
            connect_timeout: Duration::from_millis(200),
            ..test_options()
        };

        let result = timeout(
            Duration::from_secs(2),
            SseMcpSession::connect(&url, options),
        )
        .await;

        assert!(matches!(result, Ok(Err(McpError::Timeout))));
    }

    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    fn test_options() -> SessionOptions {
        SessionOptions {
            connect_timeout: Duration::from_secs(2),
            request_timeout: TEST_TIMEOUT,
            ..SessionOptions::default()
        }
    }

    /// Replies the way the Azure MCP Server does for the handshake and tool listing.
    fn azure_mcp_server(message: &Value) -> Option<Value> {
        let id = message.get("id")?.clone();
        let result = match message["method"].as_str()? {
            "initialize" => json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "Azure MCP Server", "version": "0.0.10"}
            }),
            "tools/list" => json!({
                "tools": [{
                    "name": "azmcp-subscription-list",
                    "description": "List Azure subscriptions",
                    "inputSchema": {"type": "object", "properties": {}}
                }]
            }),
            _ => return None,
        };
        Some(json!({"jsonrpc": "2.0", "id": id, "result": result}))
    }

    /// Accepts connections and never answers them.
    async fn silent_listener() -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        addr
    }

    type Responder = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;
    type RecordedPosts = Arc<std::sync::Mutex<Vec<(String, Value)>>>;

    /// Minimal SSE transport: `GET /sse` streams events starting with
    /// `endpoint`, every POST is recorded, answered 202, and its reply (if
    /// any) pushed on the stream.
    struct FakeSseServer {
        addr: std::net::SocketAddr,
        posts: RecordedPosts,
        events: mpsc::UnboundedSender<Option<String>>,
    }

    impl FakeSseServer {
        async fn start(respond: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let (events, events_rx) = mpsc::unbounded_channel();
            let events_rx = Arc::new(Mutex::new(Some(events_rx)));
            let posts: RecordedPosts = Arc::default();
            let respond: Responder = Arc::new(respond);

            let server_events = events.clone();
            let server_posts = posts.clone();
            tokio::spawn(async move {
                while let Ok((socket, _)) = listener.accept().await {
                    tokio::spawn(serve_connection(
                        socket,
                        server_events.clone(),
                        events_rx.clone(),
                        server_posts.clone(),
                        respond.clone(),
                    ));
                }
            });

            Self {
                addr,
                posts,
                events,
            }
        }

        fn url(&self, path: &str) -> String {
            format!("http://{}{}", self.addr, path)
        }

        fn posts(&self) -> Vec<(String, Value)> {
            self.posts.lock().unwrap().clone()
        }

        async fn wait_for_posts(&self, count: usize) -> Vec<(String, Value)> {
            for _ in 0..200 {
                let posts = self.posts();
                if posts.len() >= count {
                    return posts;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            panic!("expected {} posts, got {:?}", count, self.posts());
        }

        fn close_stream(&self) {
            let _ = self.events.send(None);
        }
    }

    async fn serve_connection(
        mut socket: TcpStream,
        events: mpsc::UnboundedSender<Option<String>>,
        events_rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<Option<String>>>>>,
        posts: RecordedPosts,
        respond: Responder,
    ) {
        let Some((request_line, body)) = read_request(&mut socket).await else {
            return;
        };
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        if method == "GET" {
            let Some(mut rx) = events_rx.lock().await.take() else {
                return;
            };
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ncache-control: no-cache\r\n\r\n")
                .await;
            let _ = socket
                .write_all(b"event: endpoint\ndata: message?sessionId=abc\n\n")
                .await;
            while let Some(Some(event)) = rx.recv().await {
                if socket.write_all(event.as_bytes()).await.is_err() {
                    break;
                }
            }
            let _ = socket.shutdown().await;
        } else {
            let message: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            posts.lock().unwrap().push((path, message.clone()));
            let _ = socket
                .write_all(b"HTTP/1.1 202 Accepted\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await;
            if let Some(reply) = respond(&message) {
                let _ = events.send(Some(format!("event: message\ndata: {}\n\n", reply)));
            }
        }
    }

    async fn read_request(socket: &mut TcpStream) -> Option<(String, Vec<u8>)> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let head_end = loop {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            let read = socket.read(&mut chunk).await.ok()?;
            if read == 0 {
                return None;
            }
            buf.extend_from_slice(&chunk[..read]);
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < head_end + length {
            let read = socket.read(&mut chunk).await.ok()?;
            if read == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..read]);
        }

        Some((head.lines().next()?.to_string(), buf[head_end..].to_vec()))
    }
}
