//! Fetcher tests against local mock HTTP servers.
