pub mod aggregate;
pub mod analysis;
pub mod etl;
pub mod markup;
pub mod pipeline;

pub use crate::domain::model::{
    Entry, HotCold, Level, MarkupFormat, Phase, PhaseEntries, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
