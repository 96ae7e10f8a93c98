use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

use crate::{services::session_service::ClientInfo, state::AppState};

/// Client address and user agent; never rejects.
pub struct ClientAddr(pub ClientInfo);

impl FromRequestParts<Arc<AppState>> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(client_info(
            parts,
            state.config.general.trust_proxy_headers,
        )))
    }
}

/// Forwarding headers are client-controlled, so they only count when
/// `trust_proxy_headers` is set; otherwise the socket peer is the address.
pub(crate) fn client_info(parts: &Parts, trust_proxy_headers: bool) -> ClientInfo {
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let forwarded = if trust_proxy_headers {
        forwarded_ip(&parts.headers)
    } else {
        None
    };

    ClientInfo {
        ip: forwarded.or(peer),
        user_agent: header_value(&parts.headers, header::USER_AGENT.as_str()),
    }
}

// first hop of x-forwarded-for, then x-real-ip
fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .and_then(|value| {
            value
                .split(',')
                .next()
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
                .map(str::to_string)
        })
        .or_else(|| header_value(headers, "x-real-ip"))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
