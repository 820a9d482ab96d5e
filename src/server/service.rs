use super::request::parse_request;
use super::response::{write_response, Response};
use crate::app::AppInfo;
use crate::dispatcher::Dispatcher;
use may_minihttp::{HttpService, Request as RawRequest, Response as RawResponse};
use std::io;
use std::sync::Arc;

/// Transport adapter: implements `may_minihttp::HttpService` by parsing the
/// raw request, handing it to the dispatcher, and writing the resolved
/// response back. One request in, one response out.
///
/// The service is cloned per connection; all clones share the dispatcher
/// (read-only route table, lock-free fallback slot), so no locking is
/// needed on the hot path.
#[derive(Clone)]
pub struct AppService {
    pub dispatcher: Arc<Dispatcher>,
    pub info: Arc<AppInfo>,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>, info: Arc<AppInfo>) -> Self {
        Self { dispatcher, info }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: RawRequest, raw_res: &mut RawResponse) -> io::Result<()> {
        let mut request = parse_request(req);
        request.app = Some(Arc::clone(&self.info));

        let mut response = Response::new();
        self.dispatcher.handle(&mut request, &mut response);

        write_response(raw_res, &response);
        Ok(())
    }
}
