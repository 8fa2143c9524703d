//! Connection tests against a local axum server standing in for a driver.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use wd_runtime::wd_protocol::{By, NewSessionRequest, ScriptRequest, WindowHandle};
use wd_runtime::{Command, Connection, Dialect, Error};

async fn spawn(router: Router) -> String {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, router).await.unwrap();
	});
	format!("http://{addr}")
}

fn w3c_driver() -> Router {
	Router::new()
		.route(
			"/session",
			post(|Json(body): Json<Value>| async move {
				let binary = body["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["binary"].clone();
				Json(json!({ "value": { "sessionId": "s-1", "capabilities": { "browserName": "chrome", "binary": binary } } }))
			}),
		)
		.route(
			"/session/{id}/title",
			get(|Path(id): Path<String>| async move { Json(json!({ "value": format!("title of {id}") })) }),
		)
		.route(
			"/session/{id}/window/handles",
			get(|| async { Json(json!({ "value": ["w1", "w2"] })) }),
		)
		.route(
			"/session/{id}/window",
			post(|Json(body): Json<Value>| async move {
				if body["handle"] == "gone" {
					(
						StatusCode::NOT_FOUND,
						Json(json!({ "value": { "error": "no such window", "message": "target window already closed" } })),
					)
				} else {
					(StatusCode::OK, Json(json!({ "value": null })))
				}
			}),
		)
		.route(
			"/session/{id}/elements",
			post(|Json(body): Json<Value>| async move {
				if body["value"] == "[id=\"cpu-info\"]" {
					Json(json!({ "value": [{ "element-6066-11e4-a52f-4d3b0c5f8d83": "el-1" }] }))
				} else {
					Json(json!({ "value": [] }))
				}
			}),
		)
		.route(
			"/session/{id}/execute/sync",
			post(|Json(body): Json<Value>| async move {
				let value = if body["script"] == "return 1+1;" { json!(2) } else { Value::Null };
				Json(json!({ "value": value }))
			}),
		)
		.route(
			"/session/{id}/execute/async",
			post(|| async {
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Json(json!({ "value": { "error": "script timeout", "message": "result was not received in 10 seconds", "stacktrace": "#0 0x55" } })),
				)
			}),
		)
}

fn legacy_driver() -> Router {
	Router::new()
		.route(
			"/session",
			post(|| async { Json(json!({ "sessionId": "L-7", "status": 0, "value": { "browserName": "chrome" } })) }),
		)
		.route(
			"/session/{id}/window_handles",
			get(|| async { Json(json!({ "sessionId": "L-7", "status": 0, "value": ["CDwindow-1"] })) }),
		)
		.route(
			"/session/{id}/execute_async",
			post(|| async { Json(json!({ "sessionId": "L-7", "status": 28, "value": { "message": "asynchronous script timeout" } })) }),
		)
		.route("/session/{id}/title", get(|| async { (StatusCode::BAD_GATEWAY, "<html>proxy error</html>") }))
}

fn chrome_caps() -> Map<String, Value> {
	json!({ "chromeOptions": { "binary": "RunOpenFin.bat" } }).as_object().cloned().unwrap()
}

#[tokio::test]
async fn w3c_session_roundtrip() {
	let url = spawn(w3c_driver()).await;
	let conn = Connection::new(&url, None).unwrap();

	let (created, dialect) = conn.new_session(NewSessionRequest::new(chrome_caps())).await.unwrap();
	assert_eq!(created.session_id, "s-1");
	assert_eq!(dialect, Dialect::W3c);
	assert_eq!(created.capabilities["binary"], "RunOpenFin.bat");

	let handles = conn.execute(dialect, "s-1", &Command::GetWindowHandles).await.unwrap();
	assert_eq!(handles, json!(["w1", "w2"]));

	let title = conn.execute(dialect, "s-1", &Command::GetTitle).await.unwrap();
	assert_eq!(title, "title of s-1");

	let found = conn
		.execute(dialect, "s-1", &Command::FindElements(By::id("cpu-info").to_locator()))
		.await
		.unwrap();
	assert_eq!(found[0]["element-6066-11e4-a52f-4d3b0c5f8d83"], "el-1");

	let sum = conn
		.execute(
			dialect,
			"s-1",
			&Command::ExecuteScript(ScriptRequest {
				script: "return 1+1;".into(),
				args: vec![],
			}),
		)
		.await
		.unwrap();
	assert_eq!(sum, json!(2));
}

#[tokio::test]
async fn w3c_errors_become_remote_errors() {
	let url = spawn(w3c_driver()).await;
	let conn = Connection::new(&url, None).unwrap();

	let err = conn
		.execute(Dialect::W3c, "s-1", &Command::SwitchToWindow(WindowHandle::new("gone")))
		.await
		.unwrap_err();
	assert!(err.is_no_such_window(), "unexpected error: {err:?}");

	let err = conn
		.execute(
			Dialect::W3c,
			"s-1",
			&Command::ExecuteAsyncScript(ScriptRequest {
				script: "arguments[0]();".into(),
				args: vec![],
			}),
		)
		.await
		.unwrap_err();
	assert!(err.is_timeout());
	assert_eq!(err.stack_trace(), Some("#0 0x55"));
}

#[tokio::test]
async fn legacy_driver_is_detected_and_status_errors_surface() {
	let url = spawn(legacy_driver()).await;
	let conn = Connection::new(&url, None).unwrap();

	let (created, dialect) = conn.new_session(NewSessionRequest::new(Map::new())).await.unwrap();
	assert_eq!(created.session_id, "L-7");
	assert_eq!(dialect, Dialect::Legacy);

	let handles = conn.execute(dialect, "L-7", &Command::GetWindowHandles).await.unwrap();
	assert_eq!(handles, json!(["CDwindow-1"]));

	let err = conn
		.execute(
			dialect,
			"L-7",
			&Command::ExecuteAsyncScript(ScriptRequest {
				script: "var cb = arguments[arguments.length - 1];".into(),
				args: vec![],
			}),
		)
		.await
		.unwrap_err();
	assert_eq!(err.error_name(), Some("script timeout"));
}

#[tokio::test]
async fn non_json_failures_are_protocol_errors() {
	let url = spawn(legacy_driver()).await;
	let conn = Connection::new(&url, None).unwrap();

	let err = conn.execute(Dialect::Legacy, "L-7", &Command::GetTitle).await.unwrap_err();
	match err {
		Error::ProtocolError(msg) => {
			assert!(msg.contains("502"), "message was: {msg}");
			assert!(msg.contains("proxy error"), "message was: {msg}");
		}
		other => panic!("expected ProtocolError, got {other:?}"),
	}
}

#[tokio::test]
async fn unreachable_endpoint_is_a_fatal_connection_failure() {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	drop(listener);

	let conn = Connection::new(&format!("http://{addr}"), None).unwrap();
	let err = conn.new_session(NewSessionRequest::new(Map::new())).await.unwrap_err();
	assert!(matches!(err, Error::ConnectionFailed(_)), "unexpected error: {err:?}");
	assert!(err.is_fatal());
}
