pub mod context;
pub mod decision;
pub mod response;
