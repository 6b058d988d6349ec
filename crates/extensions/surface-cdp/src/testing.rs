//! In-process fake Chrome: `/json/*` discovery over wiremock and a CDP
//! WebSocket answering from a scripted page model.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use parking_lot::{Mutex, MutexGuard};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub(crate) const PAGE_ID: &str = "page-1";
pub(crate) const SESSION_ID: &str = "session-1";
pub(crate) const SCREENSHOT: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAAB";

/// Box model JSON for an axis-aligned rectangle.
pub(crate) fn rect(x: f64, y: f64, width: f64, height: f64) -> Value {
    let quad = json!([x, y, x + width, y, x + width, y + height, x, y + height]);
    json!({
        "content": quad,
        "padding": quad,
        "border": quad,
        "margin": quad,
        "width": width as i64,
        "height": height as i64,
    })
}

/// Scripted page state the fake browser answers from.
#[derive(Default)]
pub(crate) struct FakePage {
    next_node: i64,
    nodes: HashMap<String, i64>,
    boxes: HashMap<i64, Value>,
    texts: HashMap<String, String>,
    pub navigate_error: Option<String>,
    /// Base64 payload returned by `Page.captureScreenshot`.
    pub screenshot: String,
    /// Methods that never get a reply.
    pub silent: HashSet<String>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            next_node: 10,
            screenshot: SCREENSHOT.to_string(),
            ..Default::default()
        }
    }

    /// Add a rendered element.
    pub fn with_element(mut self, selector: &str, model: Value) -> Self {
        self.add_element(selector, Some(model));
        self
    }

    /// Add an element that exists but has no layout box.
    pub fn with_hidden_element(mut self, selector: &str) -> Self {
        self.add_element(selector, None);
        self
    }

    pub fn set_text(&mut self, selector: &str, text: &str) {
        if !self.nodes.contains_key(selector) {
            self.add_element(selector, Some(rect(0.0, 0.0, 100.0, 20.0)));
        }
        self.texts.insert(selector.to_string(), text.to_string());
    }

    fn add_element(&mut self, selector: &str, model: Option<Value>) {
        self.next_node += 1;
        self.nodes.insert(selector.to_string(), self.next_node);
        if let Some(model) = model {
            self.boxes.insert(self.next_node, model);
        }
    }

    fn respond(&self, method: &str, params: &Value) -> Option<Result<Value, (i64, String)>> {
        if self.silent.contains(method) {
            return None;
        }
        Some(match method {
            "Target.attachToTarget" => Ok(json!({"sessionId": SESSION_ID})),
            "DOM.getDocument" => Ok(json!({"root": {"nodeId": 1, "nodeName": "#document"}})),
            "DOM.querySelector" => {
                let selector = params["selector"].as_str().unwrap_or_default();
                Ok(json!({"nodeId": self.nodes.get(selector).copied().unwrap_or(0)}))
            }
            "DOM.getBoxModel" => {
                let node = params["nodeId"].as_i64().unwrap_or_default();
                match self.boxes.get(&node) {
                    Some(model) => Ok(json!({"model": model})),
                    None => Err((-32000, "Could not compute box model.".to_string())),
                }
            }
            "Page.navigate" => Ok(match &self.navigate_error {
                Some(error) => json!({"frameId": "main", "errorText": error}),
                None => json!({"frameId": "main", "loaderId": "loader-1"}),
            }),
            "Page.captureScreenshot" => Ok(json!({"data": self.screenshot})),
            "Runtime.evaluate" => Ok(self.evaluate(params["expression"].as_str().unwrap_or_default())),
            _ => Ok(json!({})),
        })
    }

    fn evaluate(&self, expression: &str) -> Value {
        let value = |v: Value| json!({"result": {"type": "object", "value": v}});

        if expression.contains("throw") {
            return json!({
                "result": {"type": "object", "subtype": "error"},
                "exceptionDetails": {"exceptionId": 1, "text": "Uncaught", "lineNumber": 0, "columnNumber": 0}
            });
        }
        if expression == "document.readyState" {
            return value(json!("complete"));
        }
        let Some(selector) = queried_selector(expression) else {
            return value(Value::Null);
        };
        let present = self.nodes.contains_key(&selector);
        if expression.contains("translateX") {
            value(json!(present))
        } else if present {
            value(json!(self.texts.get(&selector).cloned().unwrap_or_default()))
        } else {
            value(Value::Null)
        }
    }
}

fn queried_selector(expression: &str) -> Option<String> {
    let start = expression.find("document.querySelector(")? + "document.querySelector(".len();
    serde_json::Deserializer::from_str(&expression[start..])
        .into_iter::<String>()
        .next()?
        .ok()
}

/// A CDP message received by the fake browser.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: String,
    pub params: Value,
    pub session_id: Option<String>,
}

pub(crate) struct MockBrowser {
    http: MockServer,
    page: Arc<Mutex<FakePage>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    ws_task: tokio::task::JoinHandle<()>,
}

impl MockBrowser {
    pub async fn start(page: FakePage) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let page = Arc::new(Mutex::new(page));
        let calls: Arc<Mutex<Vec<RecordedCall>>> = Arc::new(Mutex::new(Vec::new()));

        let ws_task = {
            let page = page.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let page = page.clone();
                    let calls = calls.clone();
                    tokio::spawn(async move {
                        let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
                            return;
                        };
                        let (mut tx, mut rx) = ws.split();
                        while let Some(Ok(msg)) = rx.next().await {
                            let Message::Text(text) = msg else { continue };
                            let request: Value = serde_json::from_str(&text).unwrap();
                            let method = request["method"].as_str().unwrap_or_default().to_string();
                            let params = request.get("params").cloned().unwrap_or(Value::Null);
                            let session_id = request["sessionId"].as_str().map(String::from);
                            calls.lock().push(RecordedCall {
                                method: method.clone(),
                                params: params.clone(),
                                session_id,
                            });

                            let outcome = page.lock().respond(&method, &params);
                            let Some(outcome) = outcome else { continue };
                            let mut reply = json!({"id": request["id"]});
                            match outcome {
                                Ok(result) => reply["result"] = result,
                                Err((code, message)) => {
                                    reply["error"] = json!({"code": code, "message": message})
                                }
                            }
                            if tx.send(Message::Text(reply.to_string().into())).await.is_err() {
                                break;
                            }
                        }
                    });
                }
            })
        };

        let http = MockServer::start().await;
        let page_info = json!({
            "id": PAGE_ID,
            "type": "page",
            "title": "",
            "url": "about:blank",
            "webSocketDebuggerUrl": format!("ws://{}/devtools/page/{}", addr, PAGE_ID),
        });
        Mock::given(method("GET"))
            .and(path("/json/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Browser": "Chrome/131.0.6778.86",
                "Protocol-Version": "1.3",
                "User-Agent": "Mozilla/5.0",
                "webSocketDebuggerUrl": format!("ws://{}/devtools/browser/test", addr),
            })))
            .mount(&http)
            .await;
        Mock::given(method("PUT"))
            .and(path("/json/new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_info.clone()))
            .mount(&http)
            .await;
        Mock::given(method("GET"))
            .and(path("/json/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([page_info])))
            .mount(&http)
            .await;

        Self {
            http,
            page,
            calls,
            ws_task,
        }
    }

    pub fn endpoint(&self) -> String {
        self.http.uri()
    }

    pub fn page(&self) -> MutexGuard<'_, FakePage> {
        self.page.lock()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

impl Drop for MockBrowser {
    fn drop(&mut self) {
        self.ws_task.abort();
    }
}
