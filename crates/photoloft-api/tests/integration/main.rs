//! Integration tests for photoloft-api
//!
//! Uses wiremock to simulate a photo library server and verifies
//! end-to-end behavior of the full interceptor chain: session attach,
//! expiry detection, single-flight renewal and the typed services.

mod common;

mod test_services;
mod test_session_renewal;
