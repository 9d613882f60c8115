// CV document CRUD. Every query is scoped by the authenticated owner's id —
// never split into "find by id" then "check owner".

pub mod handlers;
pub mod store;
