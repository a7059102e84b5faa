use crate::domain::entities::{audit_log::AuditContext, user::SessionUser};

/// Everything an operation needs to know about the caller.
///
/// Built once per request by the session middleware and passed explicitly
/// into use cases.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: SessionUser,
    pub user_agent: Option<String>,
    pub request_ip: Option<String>,
}

impl RequestContext {
    pub fn audit_context(&self) -> AuditContext {
        AuditContext {
            user_agent: self.user_agent.clone(),
            request_ip: self.request_ip.clone(),
        }
    }
}
