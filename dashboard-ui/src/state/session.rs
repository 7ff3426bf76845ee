//! Session Subscription
//!
//! Server-Sent Events from `/auth/events`: the server sends the current
//! session on connect and again after every change. The stream is closed when
//! the owning component is torn down.

use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, EventSourceInit, MessageEvent};

use super::global::{GlobalState, SessionView};

/// Event name used by the server for session frames
pub const SESSION_EVENT: &str = "session";

/// Decode one `session` frame
pub fn parse_session(data: &str) -> Result<SessionView, serde_json::Error> {
    serde_json::from_str(data)
}

/// Open the session stream and keep `state.session` in sync with it
pub fn subscribe_session(state: GlobalState, api_base: &str) {
    let url = format!("{}/auth/events", api_base);

    let init = EventSourceInit::new();
    // The session cookie must travel with the stream
    init.set_with_credentials(true);

    let source = match EventSource::new_with_event_source_init_dict(&url, &init) {
        Ok(source) => source,
        Err(e) => {
            web_sys::console::error_1(&format!("Session stream failed: {:?}", e).into());
            state.session.set(SessionView {
                loading: false,
                user: None,
            });
            state.show_error("Could not reach the sign-in service");
            return;
        }
    };

    let on_session = Closure::wrap(Box::new(move |event: MessageEvent| {
        let Some(data) = event.data().as_string() else {
            return;
        };
        match parse_session(&data) {
            Ok(view) => state.session.set(view),
            Err(e) => {
                web_sys::console::error_1(&format!("Bad session frame: {}", e).into());
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Err(e) =
        source.add_event_listener_with_callback(SESSION_EVENT, on_session.as_ref().unchecked_ref())
    {
        web_sys::console::error_1(&format!("Session listener failed: {:?}", e).into());
    }

    // EventSource reconnects on its own; only give up the loading state if the
    // first frame never arrived
    let on_error = Closure::wrap(Box::new(move |_: JsValue| {
        web_sys::console::log_1(&"Session stream interrupted".into());
        if state.session.get_untracked().loading {
            state.session.set(SessionView {
                loading: false,
                user: None,
            });
        }
    }) as Box<dyn FnMut(JsValue)>);
    source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    on_cleanup(move || {
        source.close();
        source.set_onerror(None);
        drop(on_session);
        drop(on_error);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signed_out_frame() {
        let view = parse_session(r#"{"loading":false,"user":null}"#).unwrap();
        assert_eq!(
            view,
            SessionView {
                loading: false,
                user: None
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_session("not json").is_err());
    }
}
