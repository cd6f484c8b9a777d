use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("cannot parse {field} value {value:?} in data row {row} with format {format}")]
    Parse {
        field: String,
        value: String,
        format: String,
        /// 1-based, counting data rows below the header.
        row: usize,
    },

    #[error("unexpected data shape: {0}")]
    DataShape(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
