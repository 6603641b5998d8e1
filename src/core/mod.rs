pub mod engine;
pub mod grouper;
pub mod mapper;
pub mod transformer;
pub mod validator;

pub use crate::domain::model::{Partition, RawRow, RunSummary, TransformedRecord};
pub use crate::domain::ports::{ConfigProvider, CrmSink, MemberSource};
pub use crate::utils::error::Result;
