use std::fmt::{self, Display};

use serde::Deserialize;
use serde_json::Value;

use crate::hook::{FilterPlan, HookPoint, Transform};
use crate::rewrite::DomainRewriter;

/// Whether the current unit of work is serving readers or persisting writes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    Public,
    Admin,
}

impl Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ExecutionContext::Public => "public",
            ExecutionContext::Admin => "admin",
        })
    }
}

/// One site context's rewriter plus its hook bindings. Scope one instance
/// per concurrently active context; the switch event takes `&mut self`, so
/// a shared instance cannot be refreshed while in use.
#[derive(Debug)]
pub struct SiteShim {
    context: ExecutionContext,
    taxonomies: Vec<String>,
    rewriter: DomainRewriter,
    plan: FilterPlan,
}

impl SiteShim {
    /// An inert shim; nothing is bound until [`switch_site`](Self::switch_site)
    /// fires.
    pub fn new(context: ExecutionContext, taxonomies: Vec<String>) -> Self {
        SiteShim {
            context,
            taxonomies,
            rewriter: DomainRewriter::new("", ""),
            plan: FilterPlan::inactive(),
        }
    }

    /// The context-switch event: refreshes the rewriter and rebuilds the
    /// filter plan before returning, so no interception can observe a stale
    /// combination.
    pub fn switch_site(&mut self, current_url: &str, configured_url: &str) {
        self.rewriter.refresh(current_url, configured_url);
        self.plan = FilterPlan::build(self.rewriter.is_active(), self.context, &self.taxonomies);
        log::debug!(
            "switched site: served `{}`, stored `{}`, {} filter(s) bound",
            self.rewriter.served(),
            self.rewriter.stored(),
            self.plan.bindings().len()
        );
    }

    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    pub fn rewriter(&self) -> &DomainRewriter {
        &self.rewriter
    }

    pub fn plan(&self) -> &FilterPlan {
        &self.plan
    }

    /// Runs text through the transform bound at `point`, or passes it
    /// through unchanged if the point is unbound.
    pub fn apply_text(&self, point: &HookPoint, text: &str) -> String {
        match self.plan.lookup(point).map(|binding| binding.transform) {
            Some(Transform::Outbound) => self.rewriter.rewrite_outbound(text),
            Some(Transform::Inbound) | Some(Transform::InboundDeep) => {
                self.rewriter.rewrite_inbound(text)
            }
            None => text.to_owned(),
        }
    }

    /// Structured-value counterpart of [`apply_text`](Self::apply_text).
    /// Scalar transforms rewrite only a top-level string value.
    pub fn apply_value(&self, point: &HookPoint, value: Value) -> Value {
        match self.plan.lookup(point).map(|binding| binding.transform) {
            Some(Transform::InboundDeep) => self.rewriter.rewrite_inbound_deep(value),
            Some(Transform::Outbound) => match value {
                Value::String(text) => Value::String(self.rewriter.rewrite_outbound(&text)),
                value => value,
            },
            Some(Transform::Inbound) => match value {
                Value::String(text) => Value::String(self.rewriter.rewrite_inbound(&text)),
                value => value,
            },
            None => value,
        }
    }
}
