/*!
 * Monitoring
 * Tracing setup and operation spans
 */

mod tracer;

pub use tracer::{init_tracing, next_trace_id, span_operation, OperationSpan, ENV_TRACE_JSON};
