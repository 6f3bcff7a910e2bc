/// terminal and file logging set up with simplelog
pub mod logger;
