//! Core business logic - framework-agnostic account, category, transaction,
//! budget, statistics, and CSV operations.
//!
//! Everything in here takes a database connection and plain data; nothing
//! knows about HTTP or mail transports. The alert dispatcher in
//! [`alerts`] is the explicit seam between transaction writes and their
//! side effects (logging, notification enqueue, cache invalidation).

/// User registration and default-category provisioning
pub mod account;
/// Post-write alert dispatch: evaluate, log, notify, invalidate
pub mod alerts;
/// Budget limit CRUD and the budget evaluator
pub mod budget;
/// Category CRUD with per-user name uniqueness
pub mod category;
/// CSV import and export of transactions
pub mod csv;
/// Period window calculation
pub mod period;
/// Monthly statistics aggregation behind the cache
pub mod stats;
/// Transaction CRUD and write-path validation
pub mod transaction;
