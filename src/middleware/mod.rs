/*
 * Responsibility
 * - middlware の公開インターフェース (re-export)
 * - auth::identity / auth::namespace, cors, http, security_headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
