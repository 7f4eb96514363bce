//! Request helper extensions.

use salvo::prelude::Request;

pub(crate) trait RequestExt {
    /// IP address of the peer, when the connection has one.
    fn client_address(&self) -> Option<String>;
}

impl RequestExt for Request {
    fn client_address(&self) -> Option<String> {
        let addr = self.remote_addr();

        addr.as_ipv4()
            .map(|v4| v4.ip().to_string())
            .or_else(|| addr.as_ipv6().map(|v6| v6.ip().to_string()))
    }
}
