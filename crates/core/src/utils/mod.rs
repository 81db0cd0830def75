pub mod deadline_utils;
pub mod decimal_utils;
pub mod time_utils;
