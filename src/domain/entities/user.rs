use uuid::Uuid;

/// The authenticated user behind a request, scoped to one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub company_id: Uuid,
}
