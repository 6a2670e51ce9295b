pub mod attributes;
pub mod chain;
pub mod context;
pub mod filters;
pub mod layer;

pub use attributes::{RequestAttributes, SortDirection};
pub use chain::{Filter, FilterChain};
pub use context::RequestContext;
pub use filters::{
    EmployeeAuthenticate, OrganisationAuthenticate, Paginate, SessionAuthenticate, SortFilter,
};
pub use layer::filter_chain_middleware;
