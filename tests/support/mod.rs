//! Shared fakes for behavior tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tipocambio_core::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Transport that replays scripted replies and records every request.
///
/// The last scripted reply is repeated once the script runs out.
pub struct ScriptedHttpClient {
    replies: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
}

impl ScriptedHttpClient {
    pub fn new(replies: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(reply: Result<HttpResponse, HttpError>) -> Self {
        Self::new(vec![reply])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("requests lock").push(request);

        let reply = {
            let mut replies = self.replies.lock().expect("replies lock");
            if replies.len() > 1 {
                replies.pop_front()
            } else {
                replies.front().cloned()
            }
        };

        Box::pin(async move { reply.unwrap_or_else(|| Err(HttpError::new("no scripted reply"))) })
    }
}

/// Builds a service reply wrapping `records` in the double-encoded envelope.
pub fn indicator_reply(records: &[(&str, &str)]) -> Vec<u8> {
    let inner: String = records
        .iter()
        .map(|(date, value)| {
            format!(
                "<INGC011_CAT_INDICADORECONOMIC>\
                 <COD_INDICADORINTERNO>317</COD_INDICADORINTERNO>\
                 <DES_FECHA>{date}</DES_FECHA>\
                 <NUM_VALOR>{value}</NUM_VALOR>\
                 </INGC011_CAT_INDICADORECONOMIC>"
            )
        })
        .collect();
    wrap_document(&format!(
        "<Datos_de_INGC011_CAT_INDICADORECONOMIC>{inner}</Datos_de_INGC011_CAT_INDICADORECONOMIC>"
    ))
}

/// Wraps an arbitrary inner document in the `<string>` envelope.
pub fn wrap_document(inner: &str) -> Vec<u8> {
    let escaped = inner
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <string xmlns=\"http://ws.sdde.bccr.fi.cr\">{escaped}</string>"
    )
    .into_bytes()
}
