pub mod logging;
pub mod tensor;

pub use logging::{
    default_level, init_file_logger, init_file_logger_with_level, init_stdout_logger,
    init_stdout_logger_with_level, level_from_name, FileLogger, StdoutLogger,
};
pub use tensor::{Tensor, TensorError};

// Re-export log crate so downstream crates can use deli_base::log::*
pub use log;
