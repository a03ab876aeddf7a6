/*!
 * Caller identity extractor
 *
 * Responsibility:
 * - identity middleware が extensions に入れた CallerIdentity を handler / middleware に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は services::access に置く
 *
 * Public API:
 * - MaybeCaller
 */

mod core;

pub use core::MaybeCaller;
