// ABOUTME: Test support utilities.
// ABOUTME: Scripted and simulated NRM transports plus session helpers.

use std::sync::Once;

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod scripted_nrm;
#[allow(dead_code)]
pub mod topology;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("oess_cm=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Control URL used by every test session.
#[allow(dead_code)]
pub const CONTROL_URL: &str = "http://oess.test/oess/";

/// Workgroup the scripted NRMs expose by default.
#[allow(dead_code)]
pub const WORKGROUP: &str = "NSI";

/// Pull the `action` parameter out of a request path; the bare control URL
/// is the handshake.
#[allow(dead_code)]
pub fn action_of(path_and_query: &str) -> String {
    query_values(path_and_query, "action")
        .into_iter()
        .next()
        .unwrap_or_else(|| "handshake".to_string())
}

/// Every value of `key` in the query string, in order.
#[allow(dead_code)]
pub fn query_values(path_and_query: &str, key: &str) -> Vec<String> {
    let Some((_, query)) = path_and_query.split_once('?') else {
        return Vec::new();
    };
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(k, _)| *k == key)
        .map(|(_, v)| urlencoding::decode(v).unwrap().into_owned())
        .collect()
}
