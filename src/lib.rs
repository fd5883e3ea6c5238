pub mod config;
pub mod hook;
pub mod rewrite;
pub mod site;

pub use crate::hook::{Binding, FilterPlan, HookPoint, ReadHook, Transform, WriteHook};
pub use crate::rewrite::{host_of, DomainRewriter};
pub use crate::site::{ExecutionContext, SiteShim};
