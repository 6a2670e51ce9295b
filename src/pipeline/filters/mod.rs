pub mod employee;
pub mod organisation;
pub mod paginate;
pub mod session;
pub mod sort;

pub use employee::EmployeeAuthenticate;
pub use organisation::OrganisationAuthenticate;
pub use paginate::Paginate;
pub use session::SessionAuthenticate;
pub use sort::SortFilter;
