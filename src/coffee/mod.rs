//! # Coffee Shop API Module
//!
//! This module is the integration layer between brewscout and the coffee shop
//! challenge API. It owns every HTTP call the application makes and the rules
//! for recovering from the failures that API is known to produce.
//!
//! ## Architecture
//!
//! ```text
//! Management Layer (ShopFinder)
//!          ↓
//! Coffee Shop API Layer
//!     ├── Token Provider (POST /tokens)
//!     └── Shop Fetcher   (GET /coffee_shops, retries, token refresh)
//!          ↓
//! Bounded Invoker (one request, wall-clock bound)
//!          ↓
//! Transport (reqwest, or a scripted transport in tests)
//! ```
//!
//! ## Core Modules
//!
//! ### HTTP Module
//!
//! [`http`] - Request/response values, the [`http::Transport`] seam and the
//! [`http::BoundedInvoker`]:
//! - **One Call Per Invocation**: No retries happen at this level
//! - **Wall-Clock Bound**: Sending and reading the body share one timeout
//! - **Cancellation**: An expired request is dropped, never left running
//! - **Untouched Responses**: Status and body are passed through as received
//!
//! ### Authentication Module
//!
//! [`auth`] - Acquires bearer tokens:
//! - **Empty POST**: JSON `Content-Type` and `Accept` headers, no body
//! - **Uniform Failures**: Non-success status, timeout and network errors all
//!   surface as an authentication service error
//! - **Strict Body**: A success without a `token` string is a format error
//!
//! ### Shops Module
//!
//! [`shops`] - Retrieves the shop list and coordinates recovery:
//! - **Token Refresh**: A 401 triggers one fresh token and one more attempt
//! - **Outages**: A 503 is retried after a fixed backoff
//! - **Timeouts**: A client timeout or 504 is retried after a fixed backoff
//! - **Bounded Budgets**: Each failure class has its own budget, tracked in an
//!   explicit [`shops::RetryState`] value
//!
//! ## Status Codes
//!
//! | Status | Meaning | Policy |
//! |--------|---------|--------|
//! | 2xx | success | proceed |
//! | 401 | token invalid or expired | refresh token, retry |
//! | 406 | bad `Accept` header | fatal |
//! | 503 | service unavailable | retry after backoff |
//! | 504 | upstream timeout | retry after backoff, shares the timeout budget |
//! | other | unspecified | fatal |
//!
//! ## Concurrency
//!
//! Exactly one request is in flight at any time. The only suspension points
//! are awaiting a response and the backoff sleep, both driven by tokio's
//! clock so tests can run them on a paused clock.

pub mod auth;
pub mod http;
pub mod shops;
