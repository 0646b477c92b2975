//! Generated gRPC protocol types
//!
//! Messages and service stubs compiled from `proto/urlfetcher.proto` by
//! `tonic-build`. The wire names (`Request`, `PendingFetch`, `Response`,
//! `curl_error`) are part of the public protocol and must not change.

tonic::include_proto!("urlfetcher");
